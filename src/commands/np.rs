//! Handles the "now playing" messages osu! sends when a player types `/np`.
//!
//! They look like `* alice is listening to [https://osu.ppy.sh/beatmapsets/1#/75
//! Artist - Title [Version]] +Hidden +DoubleTime`, and get wrapped in a CTCP
//! `ACTION` over IRC.

// {{{ Imports
use std::sync::LazyLock;

use regex::Regex;

use crate::context::TaggedError;
use crate::osu::mods::Mods;

use super::chat::MessageContext;
use super::pp::pp_impl;
// }}}

// {{{ Parsing
static NOW_PLAYING: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?x)
		\[?
		https?://osu\.ppy\.sh/
		(?:
			beatmapsets/(?P<beatmapset_id>\d+)
			(?:\#(?:osu|taiko|fruits|mania)?/(?P<beatmap_id>\d+))?
			| b/(?P<short_id>\d+)
		)
		(?:\s+(?P<title>.*?))?
		\]?
		(?P<mods>(?:\s*[-+][A-Za-z]+)*)
		\s*$",
	)
	.expect("the now playing regex is valid")
});

const NOW_PLAYING_MARKERS: [&str; 4] = [
	"is listening to",
	"is playing",
	"is watching",
	"is editing",
];

/// Whether a message is an osu! now playing notification.
#[inline]
pub fn is_now_playing(text: &str) -> bool {
	let text = strip_action(text);
	text.starts_with("/np") || NOW_PLAYING_MARKERS.iter().any(|m| text.contains(m))
}

fn strip_action(text: &str) -> &str {
	let text = text.trim().trim_matches('\x01');
	text.strip_prefix("ACTION").unwrap_or(text).trim()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
	pub beatmap_id: u32,
	pub mods: Mods,
}

/// Extracts the beatmap and mods from a now playing message.
///
/// Links to a whole beatmapset fall back to the set id.
pub fn parse_now_playing(text: &str) -> Option<Result<NowPlaying, TaggedError>> {
	let captures = NOW_PLAYING.captures(strip_action(text))?;

	let id = captures
		.name("beatmap_id")
		.or_else(|| captures.name("short_id"))
		.or_else(|| captures.name("beatmapset_id"))?;
	let beatmap_id = id.as_str().parse().ok()?;

	// Mods may be glued together, as in `+Hidden+DoubleTime`
	let mods = captures
		.name("mods")
		.map_or("", |m| m.as_str())
		.split(|c: char| c == '+' || c == '-' || c.is_whitespace());

	Some(
		Mods::decode(mods)
			.map(|mods| NowPlaying { beatmap_id, mods })
			.map_err(TaggedError::from),
	)
}
// }}}
// {{{ Command
/// Looks the announced map up, like `!pp` would.
///
/// Messages that merely look like a notification are ignored.
pub async fn np_impl<C: MessageContext>(
	ctx: &mut C,
	text: &str,
) -> Result<Option<String>, TaggedError> {
	let Some(now_playing) = parse_now_playing(text) else {
		tracing::warn!(text, "Could not find a beatmap link in now playing message");
		return Ok(None);
	};

	let NowPlaying { beatmap_id, mods } = now_playing?;
	tracing::debug!(beatmap_id, mods = %mods, "Parsed now playing message");

	let message = pp_impl(ctx, beatmap_id, mods).await?;

	Ok(Some(message))
}
// }}}
