//! Everything that asks the performance engine for numbers.
//!
//! The engine itself is opaque: we hand it a beatmap file, a set of mods and
//! optionally an accuracy / combo / miss count, and it hands back pp together with
//! the mod-adjusted difficulty attributes.

use std::path::Path;

use anyhow::Context;

use crate::context::{CoreError, Error};
use crate::osu::mods::Mods;
use crate::osu::player::{RecentPlay, TopScore};

// {{{ Engine interface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerformanceQuery {
	/// Accuracy in percent (`0..=100`)
	pub accuracy: Option<f64>,
	pub combo: Option<u32>,
	pub misses: Option<u32>,
}

impl PerformanceQuery {
	#[inline]
	pub fn at_accuracy(accuracy: f64) -> Self {
		Self {
			accuracy: Some(accuracy),
			..Default::default()
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceResult {
	pub pp: f64,
	pub stars: f64,
	pub ar: f64,
	pub od: f64,
	pub cs: f64,
	pub hp: f64,
	pub max_combo: u32,
}

pub trait PerformanceEngine: Send + Sync {
	fn calculate(
		&self,
		beatmap: &Path,
		mods: Mods,
		query: PerformanceQuery,
	) -> Result<PerformanceResult, Error>;
}
// }}}
// {{{ rosu-pp engine
/// [PerformanceEngine] backed by rosu-pp.
#[derive(Debug, Clone, Copy, Default)]
pub struct RosuEngine;

impl PerformanceEngine for RosuEngine {
	fn calculate(
		&self,
		beatmap: &Path,
		mods: Mods,
		query: PerformanceQuery,
	) -> Result<PerformanceResult, Error> {
		let map = rosu_pp::Beatmap::from_path(beatmap)
			.with_context(|| format!("Could not parse beatmap file {beatmap:?}"))?;

		let mut performance = rosu_pp::Performance::new(&map).mods(mods.bits());

		if let Some(accuracy) = query.accuracy {
			performance = performance.accuracy(accuracy);
		}

		if let Some(combo) = query.combo {
			performance = performance.combo(combo);
		}

		if let Some(misses) = query.misses {
			performance = performance.misses(misses);
		}

		let attrs = performance.calculate();
		let map_attrs = map.attributes().mods(mods.bits()).build();

		Ok(PerformanceResult {
			pp: attrs.pp(),
			stars: attrs.stars(),
			ar: map_attrs.ar,
			od: map_attrs.od,
			cs: map_attrs.cs,
			hp: map_attrs.hp,
			max_combo: attrs.max_combo(),
		})
	}
}
// }}}
// {{{ Accuracy table
/// Runs the engine once without a target accuracy (for the difficulty attributes),
/// and once per requested accuracy.
pub fn pp_at_accuracies(
	engine: &dyn PerformanceEngine,
	beatmap: &Path,
	mods: Mods,
	accuracies: &[u8],
) -> Result<(PerformanceResult, Vec<(u8, f64)>), Error> {
	let base = engine.calculate(beatmap, mods, PerformanceQuery::default())?;
	let table = accuracies
		.iter()
		.map(|acc| {
			let res = engine.calculate(beatmap, mods, PerformanceQuery::at_accuracy(*acc as f64))?;
			Ok((*acc, res.pp))
		})
		.collect::<Result<Vec<_>, Error>>()?;

	Ok((base, table))
}
// }}}
// {{{ Target performance
/// The pp level we try to match recommendations against.
pub fn estimate_target_performance(top_scores: &[TopScore]) -> f64 {
	if top_scores.is_empty() {
		return 0.0;
	}

	top_scores.iter().map(|s| s.pp).sum::<f64>() / top_scores.len() as f64
}
// }}}
// {{{ Full combo estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FullComboEstimate {
	pub accuracy: f64,
	pub fc_accuracy: f64,
	pub pp: f64,
	pub fc_pp: f64,
}

impl FullComboEstimate {
	#[inline]
	pub fn delta(&self) -> f64 {
		self.fc_pp - self.pp
	}
}

/// Compares the pp of a play against the pp the same play would have given,
/// had every miss been a 300 instead.
pub fn estimate_full_combo_delta(
	engine: &dyn PerformanceEngine,
	beatmap: &Path,
	play: &RecentPlay,
	map_max_combo: u32,
) -> Result<FullComboEstimate, Error> {
	let counts = play.counts;
	if counts.total() == 0 {
		return Err(CoreError::InvalidMapData("play has no hits".to_owned()).into());
	}

	let accuracy = counts.accuracy();
	let fc_accuracy = counts.full_combo().accuracy();

	let fc = engine.calculate(
		beatmap,
		play.mods,
		PerformanceQuery {
			accuracy: Some(fc_accuracy),
			combo: Some(map_max_combo),
			misses: Some(0),
		},
	)?;

	let actual = engine.calculate(
		beatmap,
		play.mods,
		PerformanceQuery {
			accuracy: Some(accuracy),
			combo: Some(play.max_combo),
			misses: Some(counts.misses),
		},
	)?;

	Ok(FullComboEstimate {
		accuracy,
		fc_accuracy,
		pp: actual.pp,
		fc_pp: fc.pp,
	})
}
// }}}
