//! Colors as stored in the design document (`#RRGGBB` / `#AARRGGBB`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque-by-default ARGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Creates a fully opaque color from a `0xRRGGBB` value.
    pub const fn rgb(rgb: u32) -> Self {
        Self(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }

    /// Creates a color from a `0xAARRGGBB` value.
    pub const fn argb(argb: u32) -> Self {
        Self(argb)
    }

    /// Returns the packed `0xAARRGGBB` value.
    pub fn as_argb(&self) -> u32 {
        self.0
    }

    /// Returns the alpha channel.
    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }
}

/// Error returned when a color string is not `#RRGGBB` or `#AARRGGBB`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}' (expected #RRGGBB or #AARRGGBB)", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let hex = raw.trim().trim_start_matches('#');
        let err = || ParseColorError(raw.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| err())?;
        match hex.len() {
            6 => Ok(Color::rgb(value)),
            8 => Ok(Color::argb(value)),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha() == 0xFF {
            write!(f, "#{:06x}", self.0 & 0x00FF_FFFF)
        } else {
            write!(f, "#{:08x}", self.0)
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({self})")
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
