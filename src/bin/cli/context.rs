// {{{ Imports
extern crate osurec;
use osurec::commands::chat::MessageContext;
use osurec::context::{Error, UserContext};
// }}}

/// Similar in scope to the mock context used by the tests,
/// except replies are printed to the standard output.
pub struct CliContext {
	pub user: String,
	pub data: UserContext,
}

impl CliContext {
	pub fn new(data: UserContext, user: impl Into<String>) -> Self {
		Self {
			data,
			user: user.into(),
		}
	}
}

impl MessageContext for CliContext {
	fn data(&self) -> &UserContext {
		&self.data
	}

	fn author(&self) -> &str {
		&self.user
	}

	async fn reply(&mut self, text: &str) -> Result<(), Error> {
		println!("[Reply] {text}");
		Ok(())
	}
}
