use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::context::Error;

pub const LOG_FILE: &str = "osurec.log";

/// Opens the log file inside the log directory, appending to earlier runs.
pub fn open_log_file(log_dir: &Path) -> Result<File, Error> {
	let path = log_dir.join(LOG_FILE);
	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(&path)
		.with_context(|| format!("Could not open log file {path:?}"))?;

	Ok(file)
}

/// Installs the global subscriber. Verbosity comes from `RUST_LOG`,
/// defaulting to `info`.
///
/// Events go to stderr, and to [LOG_FILE] inside `log_dir` when one is given.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<(), Error> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	let file_layer = match log_dir {
		Some(dir) => Some(
			fmt::layer()
				.with_ansi(false)
				.with_writer(Mutex::new(open_log_file(dir)?)),
		),
		None => None,
	};

	let res = tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(file_layer)
		.try_init();

	if res.is_err() {
		tracing::warn!("Tracing subscriber was already installed");
	}

	Ok(())
}

#[cfg(test)]
mod logs_tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn log_file_is_appended_to() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;

		writeln!(open_log_file(dir.path())?, "first")?;
		writeln!(open_log_file(dir.path())?, "second")?;

		let contents = std::fs::read_to_string(dir.path().join(LOG_FILE))?;
		assert_eq!(contents, "first\nsecond\n");

		Ok(())
	}

	#[test]
	fn missing_log_dirs_are_errors() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;
		assert!(init_tracing(Some(dir.path().join("nope").as_path())).is_err());
		Ok(())
	}
}
