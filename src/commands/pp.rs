// {{{ Imports
use anyhow::anyhow;

use crate::context::{ErrorKind, TagError, TaggedError};
use crate::osu::beatmap::BeatmapInfo;
use crate::osu::difficulty::scale_bpm;
use crate::osu::mods::Mods;
use crate::osu::performance::{pp_at_accuracies, PerformanceResult};

use super::chat::MessageContext;
// }}}

// {{{ Formatting
/// `+HDDT`, or `NoMod` when nothing is enabled.
#[inline]
pub fn mods_label(mods: Mods) -> String {
	if mods.is_empty() {
		mods.encode()
	} else {
		format!("+{}", mods.encode())
	}
}

/// The `[link Artist - Title [Version]]` part every map reply starts with.
#[inline]
pub fn map_link(url: &str, artist: &str, title: &str, version: &str) -> String {
	format!("[{url} {artist} - {title} [{version}]]")
}

fn format_pp_message(
	info: &BeatmapInfo,
	mods: Mods,
	attrs: &PerformanceResult,
	table: &[(u8, f64)],
) -> String {
	let pp = table
		.iter()
		.map(|(acc, pp)| format!("{acc}%: {pp:.0}pp"))
		.collect::<Vec<_>>()
		.join(", ");

	format!(
		"{} {} | {:.2}★ | ♫:{} | AR:{:.1} OD:{:.1} CS:{:.1} HP:{:.1} | PP: {}",
		map_link(&info.url(), &info.artist, &info.title, &info.version),
		mods_label(mods),
		attrs.stars,
		scale_bpm(info.bpm, mods).round(),
		attrs.ar,
		attrs.od,
		attrs.cs,
		attrs.hp,
		pp
	)
}
// }}}
// {{{ Pp lookup
/// Replies with the pp a map gives at the configured accuracies, and
/// remembers the map as the author's active one.
pub async fn pp_impl<C: MessageContext>(
	ctx: &mut C,
	beatmap_id: u32,
	mods: Mods,
) -> Result<String, TaggedError> {
	let data = ctx.data();
	let path = data.beatmaps.beatmap_path(beatmap_id)?;
	let info = data.beatmaps.beatmap_info(beatmap_id)?;
	let (attrs, table) = pp_at_accuracies(
		data.engine.as_ref(),
		&path,
		mods,
		&data.config.accuracies,
	)?;

	data.sessions.record(ctx.author(), beatmap_id, mods);

	let message = format_pp_message(&info, mods, &attrs, &table);
	ctx.reply(&message).await?;

	Ok(message)
}

/// `!pp <beatmap id> [mods]`
pub async fn pp_command<C: MessageContext>(
	ctx: &mut C,
	args: &[&str],
) -> Result<String, TaggedError> {
	let Some((id, mods)) = args.split_first() else {
		return Err(anyhow!("Usage: !pp <beatmap id> [mods]").tag(ErrorKind::User));
	};

	let beatmap_id = parse_beatmap_id(id)?;
	let mods = Mods::decode(mods)?;

	pp_impl(ctx, beatmap_id, mods).await
}

/// Accepts either a bare id, or a link ending in one.
fn parse_beatmap_id(raw: &str) -> Result<u32, TaggedError> {
	raw.trim_end_matches('/')
		.rsplit(['/', '#'])
		.next()
		.and_then(|id| id.parse().ok())
		.ok_or_else(|| anyhow!("'{raw}' is not a valid beatmap id").tag(ErrorKind::User))
}
// }}}
// {{{ With
/// `!with <mods>`: recomputes the active map under different mods.
pub async fn with_command<C: MessageContext>(
	ctx: &mut C,
	args: &[&str],
) -> Result<String, TaggedError> {
	let entry = ctx.data().sessions.resolve(ctx.author())?;
	if args.is_empty() {
		return Err(anyhow!("Please specify mods. Example: !with HDDT").tag(ErrorKind::User));
	}

	let mods = Mods::decode(args)?;
	pp_impl(ctx, entry.beatmap_id, mods).await
}
// }}}
// {{{ Tests
#[cfg(test)]
mod pp_tests {
	use super::*;
	use crate::commands::handle_message;
	use crate::context::testing::{get_mock_context, FakeEngine};
	use crate::context::Error;
	use crate::osu::mods::Mod;

	#[tokio::test]
	async fn pp_replies_with_the_accuracy_table() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		handle_message(&mut ctx, "!pp 2000001").await?;

		let reply = ctx.last_message();
		assert!(reply.starts_with(
			"[https://osu.ppy.sh/beatmapsets/900001#osu/2000001 Camellia - Ghost [Extra]] NoMod"
		));
		assert!(reply.contains("| 5.00★ | ♫:180 | AR:9.0 OD:8.0 CS:4.0 HP:6.0 |"));
		assert!(reply.contains("PP: 95%: "));
		assert!(reply.ends_with("100%: 200pp"));

		Ok(())
	}

	#[tokio::test]
	async fn pp_applies_mods() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		handle_message(&mut ctx, "!pp 2000001 HDDT").await?;

		let reply = ctx.last_message();
		assert!(reply.contains("] +DTHD | 7.00★ | ♫:270 |"), "{reply}");

		let entry = ctx.data.sessions.resolve("alice")?;
		assert_eq!(entry.beatmap_id, 2_000_001);
		assert_eq!(entry.mods, Mods::from(Mod::Hidden) | Mod::DoubleTime);

		Ok(())
	}

	#[tokio::test]
	async fn pp_asks_for_one_calculation_per_accuracy() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		let engine = std::sync::Arc::new(FakeEngine::default());
		ctx.data.engine = engine.clone();

		pp_impl(&mut ctx, 2_000_002, Mods::NOMOD).await.map_err(|e| e.error)?;

		let accuracies: Vec<_> = engine.calls().iter().map(|q| q.accuracy).collect();
		assert_eq!(
			accuracies,
			vec![None, Some(95.0), Some(98.0), Some(99.0), Some(100.0)]
		);

		Ok(())
	}

	#[test]
	fn pp_accepts_links() -> Result<(), Error> {
		assert_eq!(parse_beatmap_id("75").map_err(|e| e.error)?, 75);
		assert_eq!(
			parse_beatmap_id("https://osu.ppy.sh/beatmapsets/1#osu/75").map_err(|e| e.error)?,
			75
		);
		assert_eq!(
			parse_beatmap_id("https://osu.ppy.sh/b/75/").map_err(|e| e.error)?,
			75
		);
		assert!(parse_beatmap_id("seventy-five").is_err());

		Ok(())
	}

	#[tokio::test]
	async fn pp_reports_bad_input() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;

		handle_message(&mut ctx, "!pp 2000001 XX").await?;
		assert_eq!(ctx.last_message(), "Unknown mod: XX");

		handle_message(&mut ctx, "!pp").await?;
		assert_eq!(ctx.last_message(), "Usage: !pp <beatmap id> [mods]");

		handle_message(&mut ctx, "!pp 999").await?;
		assert_eq!(
			ctx.last_message(),
			"An internal error occurred: Beatmap file 999.osu is not available"
		);

		// Failed lookups never select a map
		assert!(ctx.data.sessions.resolve("alice").is_err());

		Ok(())
	}

	#[tokio::test]
	async fn with_reuses_the_active_map() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;

		handle_message(&mut ctx, "!with HR").await?;
		assert_eq!(ctx.last_message(), "First use /np or !pp to select a map.");

		handle_message(&mut ctx, "!pp 2000002 DT").await?;
		handle_message(&mut ctx, "!with HR").await?;

		let reply = ctx.last_message();
		assert!(reply.contains("Tremendous"));
		assert!(reply.contains("] +HR | 5.50★ | ♫:180 | AR:10.0"), "{reply}");
		assert_eq!(
			ctx.data.sessions.resolve("alice")?.mods,
			Mods::from(Mod::HardRock)
		);

		handle_message(&mut ctx, "!with").await?;
		assert_eq!(ctx.last_message(), "Please specify mods. Example: !with HDDT");

		Ok(())
	}

	#[tokio::test]
	async fn sessions_are_per_user() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;

		handle_message(&mut ctx, "!pp 2000001").await?;
		handle_message(ctx.as_user("bob"), "!with HD").await?;
		assert_eq!(ctx.last_message(), "First use /np or !pp to select a map.");

		Ok(())
	}
}
// }}}
