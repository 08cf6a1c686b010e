// {{{ Imports
use rand::Rng;

use crate::context::{CoreError, TaggedError};
use crate::osu::beatmap::BeatmapCandidate;
use crate::osu::mods::Mods;
use crate::osu::performance::estimate_target_performance;
use crate::osu::player::TopScore;
use crate::osu::recommend::{recommend, RecommendQuery};

use super::chat::MessageContext;
use super::pp::{map_link, mods_label};
// }}}

pub const NO_MATCH: &str = "No suitable beatmaps found for you with these parameters ;(";

// {{{ Formatting
fn format_recommendation(candidate: &BeatmapCandidate, mods: Mods) -> String {
	let profile = candidate.profile.with_mods(mods);
	let pp = candidate
		.pp_for(mods)
		.map(|row| {
			row.values()
				.iter()
				.map(|(acc, pp)| format!("{acc}%: {pp:.2}pp"))
				.collect::<Vec<_>>()
				.join(", ")
		})
		.unwrap_or_default();

	format!(
		"{} {} | {:.2}★ | ♫:{:.0} | AR:{:.2} OD:{:.2} CS:{:.1} HP:{:.1} | PP: {}",
		map_link(
			&candidate.url(),
			&candidate.artist,
			&candidate.title,
			&candidate.version
		),
		mods_label(mods),
		profile.stars,
		profile.bpm,
		profile.ar,
		profile.od,
		profile.cs,
		profile.hp,
		pp
	)
}
// }}}
// {{{ Recommend
/// `!r [tags] [mods]`: suggests a map close to the author's level, never
/// suggesting the same map twice.
///
/// Returns the id of the suggested map, if any.
pub async fn recommend_impl<C: MessageContext, R: Rng + ?Sized>(
	ctx: &mut C,
	params: &[&str],
	rng: &mut R,
) -> Result<Option<u32>, TaggedError> {
	let data = ctx.data();
	let user = ctx.author();

	let mut tags = Vec::new();
	let mut mod_tokens = Vec::new();
	for param in params {
		if data.config.is_tag(param) {
			tags.push(*param);
		} else {
			mod_tokens.push(*param);
		}
	}

	let mods = Mods::decode(mod_tokens)?;

	let top_scores = data.players.top_scores(user, data.config.top_scores)?;
	if top_scores.is_empty() {
		return Err(CoreError::UnknownPlayer(user.to_owned()).into());
	}

	let top_scores = top_scores
		.iter()
		.map(TopScore::parse)
		.collect::<Result<Vec<_>, _>>()?;
	let target_pp = estimate_target_performance(&top_scores);

	let corpus = data.corpus.load()?;
	let query = RecommendQuery::new(target_pp, mods)
		.with_tags(tags)
		.with_window(data.config.pp_window);
	let excluded = data.history.excluded(user);

	let (message, chosen) = match recommend(&corpus, &query, &excluded, rng) {
		Some(candidate) => {
			data.history.record(user, candidate.id);
			tracing::info!(user, beatmap_id = candidate.id, target_pp, "Recommended beatmap");
			(format_recommendation(candidate, mods), Some(candidate.id))
		}
		None => (NO_MATCH.to_owned(), None),
	};

	ctx.reply(&message).await?;
	Ok(chosen)
}
// }}}
