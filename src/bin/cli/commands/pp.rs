// {{{ Imports
use crate::context::CliContext;
use osurec::commands::chat::MessageContext;
use osurec::commands::pp::pp_impl;
use osurec::context::{Error, TaggedError, UserContext};
use osurec::osu::mods::Mods;
// }}}

#[derive(clap::Args)]
pub struct Args {
	beatmap_id: u32,

	/// Mods to apply, in any form the chat commands accept
	mods: Vec<String>,
}

pub async fn run(args: Args) -> Result<(), Error> {
	let mut ctx = CliContext::new(UserContext::new()?, "cli");
	let res = match Mods::decode(&args.mods) {
		Ok(mods) => pp_impl(&mut ctx, args.beatmap_id, mods).await,
		Err(err) => Err(TaggedError::from(err)),
	};

	ctx.handle_error(res).await?;
	Ok(())
}
