use std::collections::HashSet;

use dashmap::DashMap;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::osu::beatmap::BeatmapCandidate;
use crate::osu::mods::Mods;

/// Default distance (in pp) a recommendation may be from the player's level.
pub const PP_WINDOW: f64 = 100.0;

// {{{ Query
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendQuery {
	pub target_pp: f64,
	pub mods: Mods,
	pub tags: Vec<String>,
	pub window: f64,
}

impl RecommendQuery {
	#[inline]
	pub fn new(target_pp: f64, mods: Mods) -> Self {
		Self {
			target_pp,
			mods,
			tags: Vec::new(),
			window: PP_WINDOW,
		}
	}

	#[inline]
	pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.tags = tags.into_iter().map(|t| t.into().to_lowercase()).collect();
		self
	}

	#[inline]
	pub fn with_window(mut self, window: f64) -> Self {
		self.window = window;
		self
	}

	/// Whether a single candidate passes every filter.
	pub fn accepts(&self, candidate: &BeatmapCandidate, excluded: &HashSet<u32>) -> bool {
		if excluded.contains(&candidate.id) {
			return false;
		}

		// No fallback to the nomod row here: the exact combination must be baked in.
		let Some(row) = candidate.pp_for(self.mods) else {
			return false;
		};

		if !self.tags.iter().all(|tag| candidate.has_tag(tag)) {
			return false;
		}

		(self.target_pp - self.window..=self.target_pp + self.window).contains(&row.acc99)
	}
}
// }}}
// {{{ Matching
/// Picks a random candidate among the ones accepted by the query.
///
/// Survivors are not ranked; `None` simply means nothing fits.
pub fn recommend<'a, R: Rng + ?Sized>(
	corpus: &'a [BeatmapCandidate],
	query: &RecommendQuery,
	excluded: &HashSet<u32>,
	rng: &mut R,
) -> Option<&'a BeatmapCandidate> {
	let survivors: Vec<_> = corpus
		.iter()
		.filter(|candidate| query.accepts(candidate, excluded))
		.collect();

	tracing::debug!(
		survivors = survivors.len(),
		target_pp = query.target_pp,
		mods = %query.mods,
		"Filtered recommendation corpus"
	);

	survivors.choose(rng).copied()
}
// }}}
// {{{ History
/// Beatmaps already recommended to each user, for as long as the process lives.
#[derive(Debug, Default)]
pub struct RecommendationHistory {
	seen: DashMap<String, HashSet<u32>>,
}

impl RecommendationHistory {
	#[inline]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&self, user: &str, beatmap_id: u32) {
		self.seen.entry(user.to_owned()).or_default().insert(beatmap_id);
	}

	/// A snapshot of the maps the user has already been given.
	pub fn excluded(&self, user: &str) -> HashSet<u32> {
		self.seen
			.get(user)
			.map(|seen| seen.value().clone())
			.unwrap_or_default()
	}

	pub fn clear(&self, user: &str) {
		self.seen.remove(user);
	}
}
// }}}
