use serde::{Deserialize, Serialize};

use super::mods::{Mod, Mods};

/// HardRock never pushes a gameplay stat past this.
pub const STAT_CAP: f64 = 10.0;

// {{{ Hit windows
/// Converts an approach rate into the preempt time, in milliseconds.
#[inline]
pub fn ar_to_ms(ar: f64) -> f64 {
	if ar <= 5.0 {
		1800.0 - 120.0 * ar
	} else {
		1200.0 - 150.0 * (ar - 5.0)
	}
}

/// The inverse of [ar_to_ms].
#[inline]
pub fn ms_to_ar(ms: f64) -> f64 {
	if ms >= 1200.0 {
		(1800.0 - ms) / 120.0
	} else {
		5.0 + (1200.0 - ms) / 150.0
	}
}

/// Converts an overall difficulty into the 300 hit window, in milliseconds.
#[inline]
pub fn od_to_ms(od: f64) -> f64 {
	80.0 - 6.0 * od
}

/// The inverse of [od_to_ms].
#[inline]
pub fn ms_to_od(ms: f64) -> f64 {
	(80.0 - ms) / 6.0
}
// }}}
// {{{ Scalar transforms
/// Rough star rating under some mods. Only used when no beatmap file is
/// around for the performance engine to compute the real value.
pub fn scale_stars(stars: f64, mods: Mods) -> f64 {
	let mut stars = stars;

	if mods.speeds_up() {
		stars *= 1.4;
	}

	if mods.slows_down() {
		stars *= 0.5;
	}

	if mods.contains(Mod::HardRock) {
		stars *= 1.1;
	}

	if mods.contains(Mod::Easy) {
		stars *= 0.5;
	}

	stars
}

#[inline]
pub fn clock_rate(mods: Mods) -> f64 {
	if mods.speeds_up() {
		1.5
	} else if mods.slows_down() {
		0.75
	} else {
		1.0
	}
}

#[inline]
pub fn scale_bpm(bpm: f64, mods: Mods) -> f64 {
	bpm * clock_rate(mods)
}
// }}}
// {{{ Difficulty profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
	pub ar: f64,
	pub od: f64,
	pub cs: f64,
	pub hp: f64,
	pub bpm: f64,
	pub stars: f64,
}

impl DifficultyProfile {
	/// Applies the rate-changing mods first, then HardRock / Easy.
	///
	/// DoubleTime (or Nightcore) wins over HalfTime, and HardRock wins over Easy,
	/// when a mask carries both.
	pub fn with_mods(&self, mods: Mods) -> Self {
		let mut ar = self.ar;
		let mut od = self.od;
		let mut cs = self.cs;
		let mut hp = self.hp;

		// {{{ Rate
		let window_scale = if mods.speeds_up() {
			Some(2.0 / 3.0)
		} else if mods.slows_down() {
			Some(4.0 / 3.0)
		} else {
			None
		};

		if let Some(scale) = window_scale {
			ar = ms_to_ar(ar_to_ms(ar) * scale);
			od = ms_to_od(od_to_ms(od) * scale);
		}
		// }}}
		// {{{ Stat scaling
		if mods.contains(Mod::HardRock) {
			ar = (ar * 1.4).min(STAT_CAP);
			od = (od * 1.4).min(STAT_CAP);
			cs = (cs * 1.3).min(STAT_CAP);
			hp = (hp * 1.4).min(STAT_CAP);
		} else if mods.contains(Mod::Easy) {
			ar *= 0.5;
			od *= 0.5;
			cs *= 0.5;
			hp *= 0.5;
		}
		// }}}

		Self {
			ar,
			od,
			cs,
			hp,
			bpm: scale_bpm(self.bpm, mods),
			stars: scale_stars(self.stars, mods),
		}
	}
}
// }}}
// {{{ Tests
#[cfg(test)]
mod difficulty_tests {
	use proptest::prelude::*;

	use super::*;

	fn profile(ar: f64, od: f64, cs: f64, hp: f64) -> DifficultyProfile {
		DifficultyProfile {
			ar,
			od,
			cs,
			hp,
			bpm: 180.0,
			stars: 5.0,
		}
	}

	#[test]
	fn ar_breakpoints() {
		assert_eq!(ar_to_ms(0.0), 1800.0);
		assert_eq!(ar_to_ms(5.0), 1200.0);
		assert_eq!(ar_to_ms(10.0), 450.0);
		assert_eq!(ms_to_ar(1200.0), 5.0);
		assert_eq!(ms_to_ar(450.0), 10.0);
	}

	#[test]
	fn doubletime_speeds_windows_up() {
		let dt = profile(9.0, 8.0, 4.0, 5.0).with_mods(Mods::from(Mod::DoubleTime));
		// 600ms * 2/3 = 400ms
		assert!((dt.ar - (5.0 + 800.0 / 150.0)).abs() < 1e-9);
		// 32ms * 2/3 = 21.33ms
		assert!((dt.od - (80.0 - 32.0 * 2.0 / 3.0) / 6.0).abs() < 1e-9);
		assert_eq!(dt.cs, 4.0);
		assert_eq!(dt.bpm, 270.0);
		assert!((dt.stars - 7.0).abs() < 1e-9);
	}

	#[test]
	fn nightcore_matches_doubletime() {
		let base = profile(8.0, 7.0, 4.0, 5.0);
		let dt = base.with_mods(Mods::from(Mod::DoubleTime));
		let nc = base.with_mods(Mods::from(Mod::Nightcore));
		assert_eq!(dt, nc);
	}

	#[test]
	fn halftime_slows_windows_down() {
		let ht = profile(5.0, 5.0, 4.0, 5.0).with_mods(Mods::from(Mod::HalfTime));
		// 1200ms * 4/3 = 1600ms
		assert!((ht.ar - 200.0 / 120.0).abs() < 1e-9);
		assert!((ht.od - (80.0 - 50.0 * 4.0 / 3.0) / 6.0).abs() < 1e-9);
		assert_eq!(ht.bpm, 135.0);
		assert_eq!(ht.stars, 2.5);
	}

	#[test]
	fn hardrock_applies_after_rate_change() {
		let mods = Mods::from(Mod::HalfTime) | Mod::HardRock;
		let base = profile(5.0, 5.0, 4.0, 5.0);
		let ht = base.with_mods(Mods::from(Mod::HalfTime));
		let both = base.with_mods(mods);
		assert!((both.ar - ht.ar * 1.4).abs() < 1e-9);
		assert!((both.cs - 5.2).abs() < 1e-9);
	}

	#[test]
	fn easy_is_never_clamped_and_halves() {
		let ez = profile(9.0, 8.0, 4.0, 6.0).with_mods(Mods::from(Mod::Easy));
		assert_eq!(ez, DifficultyProfile {
			ar: 4.5,
			od: 4.0,
			cs: 2.0,
			hp: 3.0,
			bpm: 180.0,
			stars: 2.5,
		});
	}

	#[test]
	fn hardrock_wins_over_easy() {
		let mods = Mods::from(Mod::Easy) | Mod::HardRock;
		let both = profile(5.0, 5.0, 4.0, 5.0).with_mods(mods);
		assert!((both.ar - 7.0).abs() < 1e-9);
		// stars still pick up both factors
		assert!((both.stars - 5.0 * 1.1 * 0.5).abs() < 1e-9);
	}

	#[test]
	fn nomod_is_identity() {
		let base = profile(9.3, 8.5, 4.2, 6.0);
		assert_eq!(base.with_mods(Mods::NOMOD), base);
	}

	proptest! {
		#[test]
		fn ar_conversions_are_inverse(ar in 0.0f64..=10.0) {
			prop_assert!((ms_to_ar(ar_to_ms(ar)) - ar).abs() < 1e-9);
		}

		#[test]
		fn od_conversions_are_inverse(od in 0.0f64..=10.0) {
			prop_assert!((ms_to_od(od_to_ms(od)) - od).abs() < 1e-9);
		}

		#[test]
		fn hardrock_respects_the_cap(
			ar in 0.0f64..=1000.0,
			od in 0.0f64..=1000.0,
			cs in 0.0f64..=1000.0,
			hp in 0.0f64..=1000.0,
		) {
			let hr = profile(ar, od, cs, hp).with_mods(Mods::from(Mod::HardRock));
			prop_assert!(hr.ar <= STAT_CAP);
			prop_assert!(hr.od <= STAT_CAP);
			prop_assert!(hr.cs <= STAT_CAP);
			prop_assert!(hr.hp <= STAT_CAP);
		}

		#[test]
		fn easy_halves_without_clamping(
			ar in 0.0f64..=1000.0,
			cs in 0.0f64..=1000.0,
		) {
			let ez = profile(ar, 5.0, cs, 5.0).with_mods(Mods::from(Mod::Easy));
			prop_assert_eq!(ez.ar, ar * 0.5);
			prop_assert_eq!(ez.cs, cs * 0.5);
		}
	}
}
// }}}
