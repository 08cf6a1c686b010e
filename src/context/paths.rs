//! This module provides helpers for working with environment
//! variables and paths, together with a struct
//! that keeps track of all the runtime-relevant paths.

use anyhow::Context;
use std::{path::Path, path::PathBuf, str::FromStr};

/// Wrapper around [std::env::var] which adds [anyhow] context around errors.
pub fn get_var(name: &str) -> anyhow::Result<String> {
	std::env::var(name).with_context(|| format!("Missing ${name} environment variable"))
}

/// Reads an environment variable containing a directory path,
/// creating the directory if it doesn't exist.
pub fn get_env_dir_path(name: &str, default_to: Option<&str>) -> anyhow::Result<PathBuf> {
	let var = get_var(name);
	let var = match default_to {
		None => var?,
		Some(other) => var.or(get_var(other))?,
	};

	let path = PathBuf::from_str(&var).with_context(|| format!("${name} is not a valid path"))?;
	ensure_dir(&path).with_context(|| format!("Could not create ${name}"))?;

	Ok(path)
}

#[inline]
fn ensure_dir(path: &Path) -> anyhow::Result<()> {
	if !path.exists() {
		std::fs::create_dir_all(path)?;
	}

	Ok(())
}

#[derive(Clone, Debug)]
pub struct OsurecPaths {
	/// This directory contains the beatmap files, the recommendation
	/// corpus, player snapshots and the config file.
	data_dir: PathBuf,

	/// This directory contains logs and other debugging info.
	log_dir: PathBuf,
}

impl OsurecPaths {
	/// Gets all the standard paths from the environment,
	/// creating every involved directory in the process.
	pub fn new() -> anyhow::Result<Self> {
		let res = Self {
			data_dir: get_env_dir_path("OSUREC_DATA_DIR", Some("STATE_DIRECTORY"))?,
			log_dir: get_env_dir_path("OSUREC_LOG_DIR", Some("LOGS_DIRECTORY"))?,
		};

		res.ensure_layout()?;
		Ok(res)
	}

	/// Lays every directory out under a single root.
	pub fn from_root(root: &Path) -> anyhow::Result<Self> {
		let res = Self {
			data_dir: root.to_path_buf(),
			log_dir: root.join("logs"),
		};

		ensure_dir(&res.log_dir)?;
		res.ensure_layout()?;
		Ok(res)
	}

	fn ensure_layout(&self) -> anyhow::Result<()> {
		for dir in [
			self.maps_path(),
			self.recommendations_path(),
			self.players_path(),
		] {
			ensure_dir(&dir).with_context(|| format!("Could not create `{dir:?}`"))?;
		}

		Ok(())
	}

	pub fn data_dir(&self) -> &PathBuf {
		&self.data_dir
	}

	pub fn log_dir(&self) -> &PathBuf {
		&self.log_dir
	}

	pub fn maps_path(&self) -> PathBuf {
		self.data_dir.join("maps")
	}

	pub fn recommendations_path(&self) -> PathBuf {
		self.data_dir.join("recommendations")
	}

	pub fn players_path(&self) -> PathBuf {
		self.data_dir.join("players")
	}

	pub fn config_path(&self) -> PathBuf {
		self.data_dir.join("config.toml")
	}
}

#[cfg(test)]
mod paths_tests {
	use super::*;

	#[test]
	fn root_layout_is_created() -> anyhow::Result<()> {
		let dir = tempfile::tempdir()?;
		let paths = OsurecPaths::from_root(dir.path())?;

		assert!(paths.maps_path().is_dir());
		assert!(paths.recommendations_path().is_dir());
		assert!(paths.players_path().is_dir());
		assert!(paths.log_dir().is_dir());
		assert_eq!(paths.config_path(), dir.path().join("config.toml"));

		Ok(())
	}
}
