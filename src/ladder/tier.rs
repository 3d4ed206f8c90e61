// EMC JobGen Resolution Tiers
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output vertical resolution in pixels (234, 432, 720, 1080, ...).
///
/// Ordering is numeric; the order a ladder is *walked* in comes from the
/// caller's tier list, never from sorting tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResolutionTier(u32);

impl ResolutionTier {
    pub const fn new(height: u32) -> Self {
        Self(height)
    }

    pub const fn height(self) -> u32 {
        self.0
    }

    /// 16:9 frame width, floored.
    pub const fn frame_width(self) -> u32 {
        // u64 keeps tier * 16 from overflowing on absurd inputs
        ((self.0 as u64 * 16) / 9) as u32
    }
}

impl From<u32> for ResolutionTier {
    fn from(height: u32) -> Self {
        Self(height)
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResolutionTier {
    type Err = String;

    /// Accepts `720` or `720p`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix('p')
            .or_else(|| trimmed.strip_suffix('P'))
            .unwrap_or(trimmed);
        match digits.parse::<u32>() {
            Ok(0) => Err(format!("tier must be positive: '{}'", s)),
            Ok(h) => Ok(Self(h)),
            Err(_) => Err(format!("invalid resolution tier: '{}'", s)),
        }
    }
}

// Map keys reach us as strings ("1080") when buffered, so accept both forms.
impl<'de> Deserialize<'de> for ResolutionTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TierVisitor;

        impl<'de> Visitor<'de> for TierVisitor {
            type Value = ResolutionTier;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a positive frame height such as 1080 or \"1080p\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                match u32::try_from(v) {
                    Ok(0) | Err(_) => Err(E::custom(format!("tier out of range: {}", v))),
                    Ok(h) => Ok(ResolutionTier(h)),
                }
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                match u64::try_from(v) {
                    Ok(v) => self.visit_u64(v),
                    Err(_) => Err(E::custom(format!("tier out of range: {}", v))),
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(TierVisitor)
    }
}

/// Convenience for building tier lists from literal heights.
pub fn tiers(heights: &[u32]) -> Vec<ResolutionTier> {
    heights.iter().copied().map(ResolutionTier::new).collect()
}
