// {{{ Imports
use std::sync::Arc;

use crate::config::BotConfig;
use crate::context::paths::OsurecPaths;
use crate::osu::beatmap::{BeatmapSource, CorpusLoader, JsonCorpus, LocalBeatmaps};
use crate::osu::performance::{PerformanceEngine, RosuEngine};
use crate::osu::player::{JsonHistory, PlayerHistory};
use crate::osu::recommend::RecommendationHistory;
use crate::session::SessionState;
use crate::timed;
// }}}

pub mod paths;

// {{{ Common types
pub type Error = anyhow::Error;
// }}}
// {{{ Error handling
/// Faults caused by what the user asked for, rather than by the bot itself.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
	#[error("Unknown mod: {0}")]
	InvalidModifier(String),

	#[error("First use /np or !pp to select a map.")]
	NoActiveMap,

	#[error("Invalid map data: {0}")]
	InvalidMapData(String),

	#[error("Player '{0}' not found or no scores available.")]
	UnknownPlayer(String),

	#[error("No recent plays found for '{0}'.")]
	NoRecentPlay(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	User,
	Internal,
}

#[derive(Debug)]
pub struct TaggedError {
	pub kind: ErrorKind,
	pub error: Error,
}

impl TaggedError {
	#[inline]
	pub fn new(kind: ErrorKind, error: Error) -> Self {
		Self { kind, error }
	}

	/// Whether the message can be shown to the user as-is.
	///
	/// [CoreError]s always count, even when they bubbled up through `?`
	/// and ended up tagged as internal.
	#[inline]
	pub fn is_user_facing(&self) -> bool {
		self.kind == ErrorKind::User || self.error.downcast_ref::<CoreError>().is_some()
	}
}

impl<E: Into<Error>> From<E> for TaggedError {
	fn from(value: E) -> Self {
		Self::new(ErrorKind::Internal, value.into())
	}
}

pub trait TagError {
	fn tag(self, tag: ErrorKind) -> TaggedError;
}

impl TagError for Error {
	fn tag(self, tag: ErrorKind) -> TaggedError {
		TaggedError::new(tag, self)
	}
}
// }}}
// {{{ UserContext
/// Shared state handed to every command.
#[derive(Clone)]
pub struct UserContext {
	pub paths: OsurecPaths,
	pub config: BotConfig,

	pub engine: Arc<dyn PerformanceEngine>,
	pub beatmaps: Arc<dyn BeatmapSource>,
	pub corpus: Arc<dyn CorpusLoader>,
	pub players: Arc<dyn PlayerHistory>,

	pub sessions: Arc<SessionState>,
	pub history: Arc<RecommendationHistory>,
}

impl UserContext {
	#[inline]
	pub fn new() -> Result<Self, Error> {
		Self::from_paths(OsurecPaths::new()?)
	}

	/// Wires the file-backed sources found under the given paths.
	pub fn from_paths(paths: OsurecPaths) -> Result<Self, Error> {
		timed!("create_context", {
			let config = BotConfig::read(&paths.config_path())?;

			Ok(Self {
				engine: Arc::new(RosuEngine),
				beatmaps: Arc::new(LocalBeatmaps::new(paths.maps_path())),
				corpus: Arc::new(JsonCorpus::new(paths.recommendations_path())),
				players: Arc::new(JsonHistory::new(paths.players_path())),
				sessions: Arc::new(SessionState::new()),
				history: Arc::new(RecommendationHistory::new()),
				config,
				paths,
			})
		})
	}
}
// }}}
