// {{{ Imports
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::context::{Error, TaggedError};

use self::chat::MessageContext;
// }}}

pub mod chat;
pub mod fc;
pub mod np;
pub mod pp;
pub mod recommend;

// {{{ Help
pub const HELP: &str = "\
!pp <beatmap id> [mods]: pp of a beatmap at 95/98/99/100% accuracy | \
/np: same as !pp, for the map you are playing | \
!with <mods>: recompute the last map with other mods | \
!r [tags] [mods]: recommend a map close to your level (tags: aim, speed, nm, consistency, tech) | \
!fc: pp your most recent play would have been worth as a full combo | \
!help: show this message";

async fn help_impl<C: MessageContext>(ctx: &mut C) -> Result<(), TaggedError> {
	ctx.reply(HELP).await?;
	Ok(())
}
// }}}
// {{{ Dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
	Pp,
	With,
	Recommend,
	FullCombo,
	Help,
	NowPlaying,
	Unknown(&'a str),
}

/// Figures out what a chat message asks for, along with its arguments.
///
/// Returns [None] for messages the bot should not react to.
pub fn classify<'a>(prefix: &str, text: &'a str) -> Option<(Command<'a>, Vec<&'a str>)> {
	let text = text.trim();

	let Some(rest) = text.strip_prefix(prefix) else {
		return np::is_now_playing(text).then(|| (Command::NowPlaying, vec![]));
	};

	let mut words = rest.split_whitespace();
	let name = words.next()?;
	let command = match name.to_lowercase().as_str() {
		"pp" => Command::Pp,
		"with" => Command::With,
		"r" | "rec" | "recommend" => Command::Recommend,
		"fc" => Command::FullCombo,
		"help" | "h" => Command::Help,
		_ => Command::Unknown(name),
	};

	Some((command, words.collect()))
}

/// Runs whatever a chat message asks for, replying through the context.
///
/// Command errors become replies, so the only errors left are the ones
/// raised while replying.
pub async fn handle_message<C: MessageContext>(ctx: &mut C, text: &str) -> Result<(), Error> {
	let prefix = ctx.data().config.command_prefix.clone();
	let Some((command, args)) = classify(&prefix, text) else {
		return Ok(());
	};

	tracing::info!(user = ctx.author(), ?command, ?args, "Handling message");

	let res = match command {
		Command::Pp => pp::pp_command(ctx, &args).await.map(|_| ()),
		Command::With => pp::with_command(ctx, &args).await.map(|_| ()),
		Command::NowPlaying => np::np_impl(ctx, text).await.map(|_| ()),
		Command::Recommend => {
			let mut rng = StdRng::from_entropy();
			recommend::recommend_impl(ctx, &args, &mut rng)
				.await
				.map(|_| ())
		}
		Command::FullCombo => fc::fc_impl(ctx).await.map(|_| ()),
		Command::Help => help_impl(ctx).await,
		Command::Unknown(name) => {
			ctx.reply(&format!("Unknown command: {name}")).await?;
			Ok(())
		}
	};

	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
