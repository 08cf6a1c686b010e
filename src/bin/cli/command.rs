#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
	/// Chat with the bot through the standard input
	Console(crate::commands::console::Args),

	/// Show the pp a beatmap gives at the usual accuracies
	Pp(crate::commands::pp::Args),

	/// Recommend a beatmap to a player
	Recommend(crate::commands::recommend::Args),
}
