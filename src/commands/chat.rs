use crate::context::{Error, TaggedError, UserContext};

// {{{ Trait
pub trait MessageContext {
	/// Get the user context held by the message
	fn data(&self) -> &UserContext;

	/// Name of the player who sent the message
	fn author(&self) -> &str;

	/// Reply to the current message
	async fn reply(&mut self, text: &str) -> Result<(), Error>;

	/// Turns the error of a command into a reply.
	///
	/// User errors are shown verbatim. Internal errors are logged, and the user
	/// only gets a short notice.
	async fn handle_error<V>(&mut self, res: Result<V, TaggedError>) -> Result<Option<V>, Error> {
		match res {
			Ok(v) => Ok(Some(v)),
			Err(err) if err.is_user_facing() => {
				tracing::info!(user = self.author(), "{}", err.error);
				self.reply(&format!("{}", err.error)).await?;
				Ok(None)
			}
			Err(err) => {
				tracing::error!(user = self.author(), "{:?}", err.error);
				self.reply(&format!("An internal error occurred: {}", err.error))
					.await?;
				Ok(None)
			}
		}
	}
}
// }}}
// {{{ Testing context
#[cfg(test)]
pub mod mock {
	use super::*;

	/// Collects every reply instead of sending it anywhere.
	pub struct MockContext {
		pub user: String,
		pub data: UserContext,
		pub messages: Vec<String>,
	}

	impl MockContext {
		pub fn new(data: UserContext, user: &str) -> Self {
			Self {
				data,
				user: user.to_owned(),
				messages: vec![],
			}
		}

		/// Pretend the next messages come from someone else.
		pub fn as_user(&mut self, user: &str) -> &mut Self {
			self.user = user.to_owned();
			self
		}

		pub fn last_message(&self) -> &str {
			self.messages.last().map(String::as_str).unwrap_or_default()
		}
	}

	impl MessageContext for MockContext {
		fn data(&self) -> &UserContext {
			&self.data
		}

		fn author(&self) -> &str {
			&self.user
		}

		async fn reply(&mut self, text: &str) -> Result<(), Error> {
			self.messages.push(text.to_owned());
			Ok(())
		}
	}
}
// }}}
