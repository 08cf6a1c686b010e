use dashmap::DashMap;

use crate::context::CoreError;
use crate::osu::mods::Mods;

/// The beatmap a user last looked at, together with the mods they asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEntry {
	pub beatmap_id: u32,
	pub mods: Mods,
}

/// Per-user [SessionEntry] cache. Entries are never evicted, and the last write wins.
#[derive(Debug, Default)]
pub struct SessionState {
	entries: DashMap<String, SessionEntry>,
}

impl SessionState {
	#[inline]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&self, user: &str, beatmap_id: u32, mods: Mods) {
		tracing::debug!(user, beatmap_id, mods = %mods, "Recorded session");
		self.entries
			.insert(user.to_owned(), SessionEntry { beatmap_id, mods });
	}

	pub fn resolve(&self, user: &str) -> Result<SessionEntry, CoreError> {
		self.entries
			.get(user)
			.map(|entry| *entry.value())
			.ok_or(CoreError::NoActiveMap)
	}
}

// {{{ Tests
#[cfg(test)]
mod session_tests {
	use super::*;
	use crate::osu::mods::Mod;

	#[test]
	fn unknown_users_have_no_active_map() {
		let sessions = SessionState::new();
		assert!(matches!(
			sessions.resolve("peppy"),
			Err(CoreError::NoActiveMap)
		));
	}

	#[test]
	fn last_write_wins() {
		let sessions = SessionState::new();
		sessions.record("peppy", 1, Mods::from(Mod::Hidden));
		sessions.record("peppy", 2, Mods::NOMOD);

		assert_eq!(
			sessions.resolve("peppy").unwrap(),
			SessionEntry {
				beatmap_id: 2,
				mods: Mods::NOMOD,
			}
		);
	}

	#[test]
	fn users_do_not_share_entries() {
		let sessions = SessionState::new();
		sessions.record("peppy", 1, Mods::NOMOD);
		assert!(sessions.resolve("cookiezi").is_err());
	}
}
// }}}
