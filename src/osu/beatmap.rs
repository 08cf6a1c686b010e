use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::context::Error;
use crate::osu::difficulty::DifficultyProfile;
use crate::osu::mods::Mods;
use crate::timed;

// {{{ Pp rows
/// Pre-computed pp values at the accuracies the corpus is baked with.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PpRow {
	#[serde(rename = "95")]
	pub acc95: f64,
	#[serde(rename = "98")]
	pub acc98: f64,
	#[serde(rename = "99")]
	pub acc99: f64,
	#[serde(rename = "100")]
	pub acc100: f64,
}

impl PpRow {
	pub const ACCURACIES: [u8; 4] = [95, 98, 99, 100];

	#[inline]
	pub fn values(&self) -> [(u8, f64); 4] {
		[
			(95, self.acc95),
			(98, self.acc98),
			(99, self.acc99),
			(100, self.acc100),
		]
	}
}

/// Keys go through the mod codec, so `"DTHD"` and `"HDDT"` land on the same entry.
pub type PpTable = HashMap<Mods, PpRow>;
// }}}
// {{{ Candidate
#[derive(Debug, Clone, PartialEq)]
pub struct BeatmapCandidate {
	pub id: u32,
	pub artist: String,
	pub title: String,
	pub version: String,
	pub profile: DifficultyProfile,
	pub pp: PpTable,
	pub tags: BTreeSet<String>,
}

impl BeatmapCandidate {
	#[inline]
	pub fn url(&self) -> String {
		format!("https://osu.ppy.sh/beatmaps/{}", self.id)
	}

	#[inline]
	pub fn pp_for(&self, mods: Mods) -> Option<&PpRow> {
		self.pp.get(&mods)
	}

	#[inline]
	pub fn has_tag(&self, tag: &str) -> bool {
		self.tags.contains(&tag.to_lowercase())
	}
}

/// Corpus files are json arrays of these.
#[derive(Deserialize)]
struct CorpusEntry {
	id: u32,
	artist: String,
	title: String,
	version: String,

	#[serde(rename = "AR")]
	ar: f64,
	#[serde(rename = "OD")]
	od: f64,
	#[serde(rename = "CS")]
	cs: f64,
	#[serde(rename = "HP")]
	hp: f64,
	#[serde(rename = "BPM")]
	bpm: f64,
	#[serde(rename = "difficulty")]
	stars: f64,

	#[serde(rename = "PP")]
	pp: PpTable,

	#[serde(default)]
	tags: Vec<String>,
}

impl From<CorpusEntry> for BeatmapCandidate {
	fn from(entry: CorpusEntry) -> Self {
		Self {
			id: entry.id,
			artist: entry.artist,
			title: entry.title,
			version: entry.version,
			profile: DifficultyProfile {
				ar: entry.ar,
				od: entry.od,
				cs: entry.cs,
				hp: entry.hp,
				bpm: entry.bpm,
				stars: entry.stars,
			},
			pp: entry.pp,
			tags: entry.tags.into_iter().map(|t| t.to_lowercase()).collect(),
		}
	}
}
// }}}
// {{{ Corpus loading
pub trait CorpusLoader: Send + Sync {
	fn load(&self) -> Result<Vec<BeatmapCandidate>, Error>;
}

/// Loads every `*.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct JsonCorpus {
	dir: PathBuf,
}

impl JsonCorpus {
	#[inline]
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}
}

impl CorpusLoader for JsonCorpus {
	fn load(&self) -> Result<Vec<BeatmapCandidate>, Error> {
		timed!("load_corpus", {
			let mut files = std::fs::read_dir(&self.dir)
				.with_context(|| format!("Could not read corpus directory {:?}", self.dir))?
				.map(|entry| Ok(entry?.path()))
				.collect::<Result<Vec<_>, std::io::Error>>()?;

			files.retain(|path| path.extension().is_some_and(|ext| ext == "json"));
			files.sort();

			let mut candidates = Vec::new();
			for path in files {
				let file = std::fs::File::open(&path)?;
				let entries: Vec<CorpusEntry> =
					serde_json::from_reader(std::io::BufReader::new(file))
						.with_context(|| format!("Could not parse corpus file {path:?}"))?;

				candidates.extend(entries.into_iter().map(BeatmapCandidate::from));
			}

			tracing::debug!(count = candidates.len(), "Loaded recommendation corpus");
			Ok(candidates)
		})
	}
}

impl CorpusLoader for Vec<BeatmapCandidate> {
	fn load(&self) -> Result<Vec<BeatmapCandidate>, Error> {
		Ok(self.clone())
	}
}
// }}}
// {{{ Beatmap files
/// Metadata about a single beatmap difficulty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BeatmapInfo {
	pub beatmap_id: u32,
	pub beatmapset_id: u32,
	pub artist: String,
	pub title: String,
	pub version: String,
	pub bpm: f64,
	#[serde(default)]
	pub max_combo: Option<u32>,
}

impl BeatmapInfo {
	#[inline]
	pub fn url(&self) -> String {
		format!(
			"https://osu.ppy.sh/beatmapsets/{}#osu/{}",
			self.beatmapset_id, self.beatmap_id
		)
	}
}

pub trait BeatmapSource: Send + Sync {
	/// Path to the `.osu` file of a beatmap.
	fn beatmap_path(&self, beatmap_id: u32) -> Result<PathBuf, Error>;

	fn beatmap_info(&self, beatmap_id: u32) -> Result<BeatmapInfo, Error>;
}

/// Reads `<dir>/<id>.osu` files, with their metadata stored next to them as
/// `<dir>/<id>.json`.
#[derive(Debug, Clone)]
pub struct LocalBeatmaps {
	dir: PathBuf,
}

impl LocalBeatmaps {
	#[inline]
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}
}

impl BeatmapSource for LocalBeatmaps {
	fn beatmap_path(&self, beatmap_id: u32) -> Result<PathBuf, Error> {
		let path = self.dir.join(format!("{beatmap_id}.osu"));
		if !path.exists() {
			return Err(anyhow!("Beatmap file {beatmap_id}.osu is not available"));
		}

		Ok(path)
	}

	fn beatmap_info(&self, beatmap_id: u32) -> Result<BeatmapInfo, Error> {
		let path = self.dir.join(format!("{beatmap_id}.json"));
		let file = std::fs::File::open(&path)
			.with_context(|| format!("Could not find info for beatmap {beatmap_id}"))?;

		let info = serde_json::from_reader(std::io::BufReader::new(file))
			.with_context(|| format!("Could not parse beatmap info {path:?}"))?;

		Ok(info)
	}
}
// }}}
