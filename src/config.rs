use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::osu::beatmap::PpRow;
use crate::osu::recommend::PP_WINDOW;

/// Settings read from `config.toml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
	/// Prefix every command starts with
	pub command_prefix: String,

	/// How far (in pp) a recommendation may be from the player's level
	pub pp_window: f64,

	/// How many top plays make up a player's level
	pub top_scores: usize,

	/// Accuracies shown by the pp lookup
	pub accuracies: Vec<u8>,

	/// Words `!r` treats as tags rather than mods
	pub tags: Vec<String>,
}

impl Default for BotConfig {
	fn default() -> Self {
		Self {
			command_prefix: "!".to_owned(),
			pp_window: PP_WINDOW,
			top_scores: 10,
			accuracies: PpRow::ACCURACIES.to_vec(),
			tags: ["aim", "speed", "nm", "consistency", "tech"]
				.map(str::to_owned)
				.to_vec(),
		}
	}
}

impl BotConfig {
	/// Reads the config file, falling back to the defaults when there is none.
	pub fn read(path: &Path) -> anyhow::Result<Self> {
		if !path.exists() {
			tracing::info!(?path, "No config file found, using defaults");
			return Ok(Self::default());
		}

		let raw = std::fs::read_to_string(path)
			.with_context(|| format!("Could not read config file {path:?}"))?;
		let config =
			toml::from_str(&raw).with_context(|| format!("Invalid config file {path:?}"))?;

		Ok(config)
	}

	#[inline]
	pub fn is_tag(&self, word: &str) -> bool {
		self.tags.iter().any(|tag| tag.eq_ignore_ascii_case(word))
	}
}

#[cfg(test)]
mod config_tests {
	use super::*;

	#[test]
	fn missing_file_gives_defaults() -> anyhow::Result<()> {
		let dir = tempfile::tempdir()?;
		let config = BotConfig::read(&dir.path().join("config.toml"))?;
		assert_eq!(config, BotConfig::default());
		Ok(())
	}

	#[test]
	fn partial_files_keep_other_defaults() -> anyhow::Result<()> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join("config.toml");
		std::fs::write(&path, "pp_window = 50.0\ntags = [\"aim\", \"jumps\"]\n")?;

		let config = BotConfig::read(&path)?;
		assert_eq!(config.pp_window, 50.0);
		assert!(config.is_tag("Jumps"));
		assert!(!config.is_tag("speed"));
		assert_eq!(config.top_scores, 10);
		assert_eq!(config.command_prefix, "!");

		Ok(())
	}

	#[test]
	fn malformed_files_are_errors() -> anyhow::Result<()> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join("config.toml");
		std::fs::write(&path, "pp_window = \"wide\"")?;

		assert!(BotConfig::read(&path).is_err());
		Ok(())
	}
}
