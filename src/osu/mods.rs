use std::fmt::Display;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::context::CoreError;

// {{{ Mod
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mod {
	Easy,
	NoFail,
	HalfTime,
	HardRock,
	SuddenDeath,
	DoubleTime,
	Nightcore,
	Hidden,
	Flashlight,
	SpunOut,
	Autopilot,
	Perfect,
}

impl Mod {
	pub const MODS: [Self; 12] = [
		Self::Easy,
		Self::NoFail,
		Self::HalfTime,
		Self::HardRock,
		Self::SuddenDeath,
		Self::DoubleTime,
		Self::Nightcore,
		Self::Hidden,
		Self::Flashlight,
		Self::SpunOut,
		Self::Autopilot,
		Self::Perfect,
	];

	pub const MOD_SHORTHANDS: [&'static str; 12] = [
		"EZ", "NF", "HT", "HR", "SD", "DT", "NC", "HD", "FL", "SO", "AP", "PF",
	];

	pub const MOD_STRINGS: [&'static str; 12] = [
		"Easy",
		"NoFail",
		"HalfTime",
		"HardRock",
		"SuddenDeath",
		"DoubleTime",
		"Nightcore",
		"Hidden",
		"Flashlight",
		"SpunOut",
		"Autopilot",
		"Perfect",
	];

	/// Bits used by the game's own api, so masks coming from score
	/// data can be read without translation.
	pub const MOD_BITS: [u32; 12] = [
		1 << 1,
		1 << 0,
		1 << 8,
		1 << 4,
		1 << 5,
		1 << 6,
		1 << 9,
		1 << 3,
		1 << 10,
		1 << 12,
		1 << 13,
		1 << 14,
	];

	#[inline]
	pub fn to_index(self) -> usize {
		self as usize
	}

	#[inline]
	pub fn bit(self) -> u32 {
		Self::MOD_BITS[self.to_index()]
	}

	#[inline]
	pub fn shorthand(self) -> &'static str {
		Self::MOD_SHORTHANDS[self.to_index()]
	}

	/// Case insensitive lookup by two-letter code.
	pub fn from_shorthand(code: &str) -> Option<Self> {
		Self::MOD_SHORTHANDS
			.iter()
			.position(|s| s.eq_ignore_ascii_case(code))
			.map(|i| Self::MODS[i])
	}

	/// Case insensitive lookup by full name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::MOD_STRINGS
			.iter()
			.position(|s| s.eq_ignore_ascii_case(name))
			.map(|i| Self::MODS[i])
	}
}

impl Display for Mod {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", Self::MOD_STRINGS[self.to_index()])
	}
}
// }}}
// {{{ Mods
/// A set of mods, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mods(u32);

impl Mods {
	pub const NOMOD: Self = Self(0);

	/// Builds a mask from raw bits, dropping bits no [Mod] claims.
	#[inline]
	pub fn from_bits_truncate(bits: u32) -> Self {
		let known = Mod::MOD_BITS.iter().fold(0, |acc, bit| acc | bit);
		Self(bits & known)
	}

	#[inline]
	pub fn bits(self) -> u32 {
		self.0
	}

	#[inline]
	pub fn is_empty(self) -> bool {
		self.0 == 0
	}

	#[inline]
	pub fn contains(self, m: Mod) -> bool {
		self.0 & m.bit() != 0
	}

	#[inline]
	pub fn with(self, m: Mod) -> Self {
		Self(self.0 | m.bit())
	}

	/// Iterates over the contained mods in declaration order.
	pub fn iter(self) -> impl Iterator<Item = Mod> {
		Mod::MODS.into_iter().filter(move |m| self.contains(*m))
	}

	/// DoubleTime and Nightcore share the same rate change.
	#[inline]
	pub fn speeds_up(self) -> bool {
		self.contains(Mod::DoubleTime) || self.contains(Mod::Nightcore)
	}

	#[inline]
	pub fn slows_down(self) -> bool {
		self.contains(Mod::HalfTime)
	}

	// {{{ Decoding
	/// Parses user supplied mod tokens.
	///
	/// Tokens may carry a leading `+` or `-`, may use either the two-letter code or the
	/// full name of a mod, and may chain several codes together (`HDDT`). `NM`, `NoMod`
	/// and empty tokens contribute nothing.
	pub fn decode<S: AsRef<str>>(tokens: impl IntoIterator<Item = S>) -> Result<Self, CoreError> {
		let mut mods = Self::NOMOD;

		for token in tokens {
			let token = token.as_ref().trim().trim_start_matches(['+', '-']);

			if token.is_empty()
				|| token.eq_ignore_ascii_case("NM")
				|| token.eq_ignore_ascii_case("NoMod")
			{
				continue;
			}

			if let Some(m) = Mod::from_shorthand(token).or_else(|| Mod::from_name(token)) {
				mods = mods.with(m);
				continue;
			}

			let chars: Vec<char> = token.chars().collect();
			if chars.len() <= 2 {
				return Err(CoreError::InvalidModifier(token.to_owned()));
			}

			for chunk in chars.chunks(2) {
				let code: String = chunk.iter().collect();
				let m = Mod::from_shorthand(&code).ok_or(CoreError::InvalidModifier(code))?;
				mods = mods.with(m);
			}
		}

		Ok(mods)
	}
	// }}}
	// {{{ Encoding
	/// Canonical string form. The same mask always yields the same string.
	pub fn encode(self) -> String {
		if self.is_empty() {
			return "NoMod".to_owned();
		}

		self.iter().map(Mod::shorthand).collect()
	}
	// }}}
}

impl From<Mod> for Mods {
	fn from(value: Mod) -> Self {
		Self(value.bit())
	}
}

impl BitOr<Mod> for Mods {
	type Output = Self;

	fn bitor(self, rhs: Mod) -> Self::Output {
		self.with(rhs)
	}
}

impl BitOr for Mods {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self::Output {
		Self(self.0 | rhs.0)
	}
}

impl FromStr for Mods {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::decode(s.split_whitespace())
	}
}

impl Display for Mods {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.encode())
	}
}
// }}}
// {{{ Serde
impl Serialize for Mods {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.encode())
	}
}

impl<'de> Deserialize<'de> for Mods {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(serde::de::Error::custom)
	}
}
// }}}
