use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use crate::context::{CoreError, Error};
use crate::osu::mods::Mods;

// {{{ Hit counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitCounts {
	pub n300: u32,
	pub n100: u32,
	pub n50: u32,
	pub misses: u32,
}

impl HitCounts {
	/// Summed as `u64`, so no four counts can overflow it.
	#[inline]
	pub fn total(&self) -> u64 {
		self.n300 as u64 + self.n100 as u64 + self.n50 as u64 + self.misses as u64
	}

	/// Accuracy in percent. Zero when there are no hits at all.
	pub fn accuracy(&self) -> f64 {
		let total = self.total();
		if total == 0 {
			return 0.0;
		}

		let weighted = 300 * self.n300 as u64 + 100 * self.n100 as u64 + 50 * self.n50 as u64;
		100.0 * weighted as f64 / (300 * total) as f64
	}

	/// The same play with every miss turned into a 300.
	#[inline]
	pub fn full_combo(&self) -> Self {
		Self {
			n300: self.n300.saturating_add(self.misses),
			misses: 0,
			..*self
		}
	}
}
// }}}
// {{{ Plays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopScore {
	pub pp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecentPlay {
	pub beatmap_id: u32,
	pub counts: HitCounts,
	pub max_combo: u32,
	pub mods: Mods,
}

/// Score data the way the game api hands it out: every number is a string.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScore {
	pub beatmap_id: Option<String>,
	pub pp: Option<String>,
	#[serde(default)]
	pub count300: String,
	#[serde(default)]
	pub count100: String,
	#[serde(default)]
	pub count50: String,
	#[serde(default)]
	pub countmiss: String,
	#[serde(default)]
	pub maxcombo: String,
	#[serde(default)]
	pub enabled_mods: String,
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, CoreError> {
	value
		.trim()
		.parse()
		.map_err(|_| CoreError::InvalidMapData(format!("{name} is not a number: '{value}'")))
}

impl TopScore {
	pub fn parse(raw: &RawScore) -> Result<Self, CoreError> {
		let pp = raw
			.pp
			.as_deref()
			.ok_or_else(|| CoreError::InvalidMapData("score has no pp value".to_owned()))?;

		Ok(Self {
			pp: parse_field("pp", pp)?,
		})
	}
}

impl RecentPlay {
	pub fn parse(raw: &RawScore) -> Result<Self, CoreError> {
		let beatmap_id = raw
			.beatmap_id
			.as_deref()
			.ok_or_else(|| CoreError::InvalidMapData("play has no beatmap id".to_owned()))?;

		let counts = HitCounts {
			n300: parse_field("count300", &raw.count300)?,
			n100: parse_field("count100", &raw.count100)?,
			n50: parse_field("count50", &raw.count50)?,
			misses: parse_field("countmiss", &raw.countmiss)?,
		};

		if counts.total() == 0 {
			return Err(CoreError::InvalidMapData("play has no hits".to_owned()));
		}

		// Every hit has to fit in a single count once misses turn into 300s
		if counts.total() > u32::MAX as u64 {
			return Err(CoreError::InvalidMapData(format!(
				"hit counts add up to more than {}",
				u32::MAX
			)));
		}

		Ok(Self {
			beatmap_id: parse_field("beatmap_id", beatmap_id)?,
			counts,
			max_combo: parse_field("maxcombo", &raw.maxcombo)?,
			mods: Mods::from_bits_truncate(parse_field("enabled_mods", &raw.enabled_mods)?),
		})
	}
}
// }}}
// {{{ History source
pub trait PlayerHistory: Send + Sync {
	/// The best plays of a player, best first.
	fn top_scores(&self, username: &str, limit: usize) -> Result<Vec<RawScore>, Error>;

	/// The most recent play of a player, if any.
	fn recent_play(&self, username: &str) -> Result<Option<RawScore>, Error>;
}

#[derive(Debug, Deserialize)]
struct PlayerSnapshot {
	#[serde(default)]
	best: Vec<RawScore>,
	#[serde(default)]
	recent: Vec<RawScore>,
}

/// Reads `<dir>/<username>.json` snapshots, each holding a `best` and a `recent`
/// list of scores.
#[derive(Debug, Clone)]
pub struct JsonHistory {
	dir: PathBuf,
}

impl JsonHistory {
	#[inline]
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// `None` for names that could reach outside the snapshot directory.
	fn snapshot_path(&self, username: &str) -> Option<PathBuf> {
		let valid = !username.is_empty()
			&& username != "."
			&& username != ".."
			&& !username.contains(['/', '\\', '\0']);

		valid.then(|| self.dir.join(format!("{}.json", username.to_lowercase())))
	}

	fn read(&self, username: &str) -> Result<PlayerSnapshot, Error> {
		let path = self
			.snapshot_path(username)
			.filter(|path| path.exists())
			.ok_or_else(|| CoreError::UnknownPlayer(username.to_owned()))?;

		let file =
			std::fs::File::open(&path).with_context(|| format!("Could not open {path:?}"))?;
		let snapshot = serde_json::from_reader(std::io::BufReader::new(file))
			.with_context(|| format!("Could not parse player snapshot {path:?}"))?;

		Ok(snapshot)
	}
}

impl PlayerHistory for JsonHistory {
	fn top_scores(&self, username: &str, limit: usize) -> Result<Vec<RawScore>, Error> {
		let mut best = self.read(username)?.best;
		best.truncate(limit);
		Ok(best)
	}

	fn recent_play(&self, username: &str) -> Result<Option<RawScore>, Error> {
		Ok(self.read(username)?.recent.into_iter().next())
	}
}
// }}}
