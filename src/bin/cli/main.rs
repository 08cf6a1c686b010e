use clap::Parser;
use command::{Cli, Command};
use osurec::context::paths::OsurecPaths;
use osurec::context::Error;
use osurec::logs::init_tracing;

mod command;
mod commands;
mod context;

#[tokio::main]
async fn main() -> Result<(), Error> {
	let paths = OsurecPaths::new()?;
	init_tracing(Some(paths.log_dir().as_path()))?;

	let cli = Cli::parse();
	match cli.command {
		Command::Console(args) => {
			commands::console::run(args).await?;
		}
		Command::Pp(args) => {
			commands::pp::run(args).await?;
		}
		Command::Recommend(args) => {
			commands::recommend::run(args).await?;
		}
	}

	Ok(())
}
