// {{{ Imports
use crate::context::{CoreError, TaggedError};
use crate::osu::performance::{estimate_full_combo_delta, FullComboEstimate, PerformanceQuery};
use crate::osu::player::RecentPlay;

use super::chat::MessageContext;
use super::pp::{map_link, mods_label};
// }}}

// {{{ Full combo
/// `!fc`: how much pp the author's most recent play would have been worth as
/// a full combo. Also makes that map the active one.
pub async fn fc_impl<C: MessageContext>(ctx: &mut C) -> Result<FullComboEstimate, TaggedError> {
	let data = ctx.data();
	let user = ctx.author();

	let raw = data
		.players
		.recent_play(user)?
		.ok_or_else(|| CoreError::NoRecentPlay(user.to_owned()))?;
	let play = RecentPlay::parse(&raw)?;

	let path = data.beatmaps.beatmap_path(play.beatmap_id)?;
	let info = data.beatmaps.beatmap_info(play.beatmap_id)?;

	let map_max_combo = match info.max_combo {
		Some(combo) => combo,
		None => {
			data.engine
				.calculate(&path, play.mods, PerformanceQuery::default())?
				.max_combo
		}
	};

	let estimate = estimate_full_combo_delta(data.engine.as_ref(), &path, &play, map_max_combo)?;
	data.sessions.record(user, play.beatmap_id, play.mods);

	let message = format!(
		"{} {} | {:.2}% {}/{}x {}❌: {:.0}pp | FC {:.2}%: {:.0}pp (+{:.0}pp)",
		map_link(&info.url(), &info.artist, &info.title, &info.version),
		mods_label(play.mods),
		estimate.accuracy,
		play.max_combo,
		map_max_combo,
		play.counts.misses,
		estimate.pp,
		estimate.fc_accuracy,
		estimate.fc_pp,
		estimate.delta(),
	);

	ctx.reply(&message).await?;
	Ok(estimate)
}
// }}}
// {{{ Tests
#[cfg(test)]
mod fc_tests {
	use super::*;
	use crate::commands::handle_message;
	use crate::context::testing::get_mock_context;
	use crate::context::Error;
	use crate::osu::mods::{Mod, Mods};

	#[tokio::test]
	async fn estimates_the_most_recent_play() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;

		let estimate = fc_impl(&mut ctx).await.map_err(|e| e.error)?;
		assert!((estimate.accuracy - 94.135802).abs() < 1e-4);
		assert!((estimate.fc_accuracy - 96.913580).abs() < 1e-4);
		assert!(estimate.delta() > 0.0);

		let reply = ctx.last_message();
		assert!(reply.starts_with(
			"[https://osu.ppy.sh/beatmapsets/900001#osu/2000001 Camellia - Ghost [Extra]] +HD | 94.14% 321/500x 3❌:"
		), "{reply}");
		assert!(reply.contains("| FC 96.91%: "));

		Ok(())
	}

	#[tokio::test]
	async fn fc_selects_the_played_map() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;

		handle_message(&mut ctx, "!fc").await?;
		let entry = ctx.data.sessions.resolve("alice")?;
		assert_eq!(entry.beatmap_id, 2_000_001);
		assert_eq!(entry.mods, Mods::from(Mod::Hidden));

		Ok(())
	}

	#[tokio::test]
	async fn players_without_plays_are_told_so() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;

		handle_message(ctx.as_user("bob"), "!fc").await?;
		assert_eq!(ctx.last_message(), "No recent plays found for 'bob'.");

		handle_message(ctx.as_user("carol"), "!fc").await?;
		assert_eq!(
			ctx.last_message(),
			"Player 'carol' not found or no scores available."
		);

		Ok(())
	}
}
// }}}
