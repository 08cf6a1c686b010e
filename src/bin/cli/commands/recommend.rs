// {{{ Imports
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::context::CliContext;
use osurec::commands::chat::MessageContext;
use osurec::commands::recommend::recommend_impl;
use osurec::context::{Error, UserContext};
// }}}

#[derive(clap::Args)]
pub struct Args {
	/// Player to recommend a beatmap to
	user: String,

	/// Tags and mods, like `aim HDDT`
	params: Vec<String>,

	/// Seed for the random pick, for reproducible runs
	#[arg(long)]
	seed: Option<u64>,
}

pub async fn run(args: Args) -> Result<(), Error> {
	let mut ctx = CliContext::new(UserContext::new()?, args.user);
	let mut rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_entropy(),
	};

	let params: Vec<&str> = args.params.iter().map(String::as_str).collect();
	let res = recommend_impl(&mut ctx, &params, &mut rng).await;
	ctx.handle_error(res).await?;
	Ok(())
}
