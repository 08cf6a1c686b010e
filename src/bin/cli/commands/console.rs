// {{{ Imports
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::context::CliContext;
use osurec::commands::handle_message;
use osurec::context::{Error, UserContext};
// }}}

#[derive(clap::Args)]
pub struct Args {
	/// Name the messages are sent under
	#[arg(long, default_value = "console")]
	sender: String,
}

/// Feeds every line of the standard input to the bot, until `exit`.
pub async fn run(args: Args) -> Result<(), Error> {
	let mut ctx = CliContext::new(UserContext::new()?, args.sender);
	let mut lines = BufReader::new(tokio::io::stdin()).lines();

	while let Some(line) = lines.next_line().await? {
		let line = line.trim();
		if line == "exit" {
			break;
		}

		handle_message(&mut ctx, line).await?;
	}

	Ok(())
}
