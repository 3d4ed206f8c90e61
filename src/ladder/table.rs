// EMC JobGen Ladder Table - Resolution-Indexed Bitrate Lookup
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Tables are hand-authored per job profile and may omit tiers on purpose.
// A lookup miss is an error, never a silent fallback.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::tier::ResolutionTier;
use crate::codec::CodecFamily;
use crate::error::{Error, Result};

/// VBR headroom applied to target-only tables: peak = floor(target * 1.45).
pub const VP9_HEADROOM_PERCENT: u64 = 145;

/// Ceiling for any ladder bitrate; the service rejects `MaxBitrate` above it.
pub const MAX_BITRATE: u64 = 1_152_000_000;

/// Peak bitrate for a target under a percentage headroom ratio.
///
/// Integer arithmetic, so the result is an exact floor. `None` on overflow.
pub fn derive_peak(target: u64, headroom_percent: u64) -> Option<u64> {
    target.checked_mul(headroom_percent).map(|scaled| scaled / 100)
}

/// Target and peak bitrate for one tier, in bits per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderEntry {
    pub target: u64,
    pub peak: u64,
}

impl LadderEntry {
    pub fn new(target: u64, peak: u64) -> Self {
        Self { target, peak }
    }

    pub fn from_target(target: u64, headroom_percent: u64) -> Option<Self> {
        derive_peak(target, headroom_percent).map(|peak| Self { target, peak })
    }

    /// Both values halved (floored).
    pub fn halved(self) -> Self {
        Self {
            target: self.target / 2,
            peak: self.peak / 2,
        }
    }
}

/// How a table is written down in a profile file.
///
/// Either explicit `[target, peak]` pairs, or targets only with a headroom
/// ratio that derives the peaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LadderTableSpec {
    Explicit {
        name: String,
        entries: BTreeMap<ResolutionTier, (u64, u64)>,
    },
    Derived {
        name: String,
        targets: BTreeMap<ResolutionTier, u64>,
        #[serde(default = "default_headroom")]
        headroom_percent: u64,
    },
}

fn default_headroom() -> u64 {
    VP9_HEADROOM_PERCENT
}

/// A resolution-indexed bitrate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LadderTableSpec", into = "LadderTableSpec")]
pub struct LadderTable {
    name: String,
    entries: BTreeMap<ResolutionTier, LadderEntry>,
}

impl LadderTable {
    /// Build a table from explicit `(tier, target, peak)` rows.
    pub fn explicit(name: impl Into<String>, rows: &[(u32, u64, u64)]) -> Result<Self> {
        let name = name.into();
        let mut entries = BTreeMap::new();
        for &(tier, target, peak) in rows {
            entries.insert(ResolutionTier::new(tier), LadderEntry::new(target, peak));
        }
        Self::checked(name, entries)
    }

    /// Build a table from `(tier, target)` rows, deriving each peak.
    pub fn from_targets(
        name: impl Into<String>,
        rows: &[(u32, u64)],
        headroom_percent: u64,
    ) -> Result<Self> {
        let targets = rows
            .iter()
            .map(|&(tier, target)| (ResolutionTier::new(tier), target))
            .collect();
        Self::derived(name.into(), targets, headroom_percent)
    }

    /// Tables compiled into the binary. Rows are checked in debug builds.
    pub(crate) fn builtin(name: &str, rows: &[(u32, u64, u64)]) -> Self {
        let entries: BTreeMap<_, _> = rows
            .iter()
            .map(|&(tier, target, peak)| (ResolutionTier::new(tier), LadderEntry::new(target, peak)))
            .collect();
        debug_assert!(entries.values().all(|e| e.peak >= e.target));
        Self {
            name: name.to_string(),
            entries,
        }
    }

    fn derived(
        name: String,
        targets: BTreeMap<ResolutionTier, u64>,
        headroom_percent: u64,
    ) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (tier, target) in targets {
            let entry = LadderEntry::from_target(target, headroom_percent).ok_or_else(|| {
                Error::Profile {
                    profile: name.clone(),
                    message: format!(
                        "ladder '{}' tier {}p: target {} x {}% overflows",
                        name, tier, target, headroom_percent
                    ),
                }
            })?;
            entries.insert(tier, entry);
        }
        Self::checked(name, entries)
    }

    fn checked(name: String, entries: BTreeMap<ResolutionTier, LadderEntry>) -> Result<Self> {
        for (tier, entry) in &entries {
            let problem = if entry.peak < entry.target {
                format!("peak {} below target {}", entry.peak, entry.target)
            } else if entry.peak > MAX_BITRATE {
                format!("peak {} above the {} bps ceiling", entry.peak, MAX_BITRATE)
            } else {
                continue;
            };
            return Err(Error::Profile {
                profile: name.clone(),
                message: format!("ladder '{}' tier {}p has {}", name, tier, problem),
            });
        }
        Ok(Self { name, entries })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base (target, peak) pair for a tier.
    pub fn lookup(&self, tier: ResolutionTier) -> Result<LadderEntry> {
        self.entries.get(&tier).copied().ok_or_else(|| {
            debug!("[LADDER] Miss: {}p not in '{}'", tier, self.name);
            Error::UnknownTier {
                tier: tier.height(),
                codec: None,
                table: self.name.clone(),
            }
        })
    }

    /// Same as [`lookup`](Self::lookup) but names the codec in the error.
    pub fn lookup_for(&self, tier: ResolutionTier, codec: CodecFamily) -> Result<LadderEntry> {
        self.lookup(tier).map_err(|e| match e {
            Error::UnknownTier { tier, table, .. } => Error::UnknownTier {
                tier,
                codec: Some(codec),
                table,
            },
            other => other,
        })
    }

    pub fn contains(&self, tier: ResolutionTier) -> bool {
        self.entries.contains_key(&tier)
    }

    pub fn tiers(&self) -> impl Iterator<Item = ResolutionTier> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<LadderTableSpec> for LadderTable {
    type Error = Error;

    fn try_from(spec: LadderTableSpec) -> Result<Self> {
        match spec {
            LadderTableSpec::Explicit { name, entries } => {
                let entries = entries
                    .into_iter()
                    .map(|(tier, (target, peak))| (tier, LadderEntry::new(target, peak)))
                    .collect();
                Self::checked(name, entries)
            }
            LadderTableSpec::Derived {
                name,
                targets,
                headroom_percent,
            } => Self::derived(name, targets, headroom_percent),
        }
    }
}

impl From<LadderTable> for LadderTableSpec {
    fn from(table: LadderTable) -> Self {
        LadderTableSpec::Explicit {
            name: table.name,
            entries: table
                .entries
                .into_iter()
                .map(|(tier, e)| (tier, (e.target, e.peak)))
                .collect(),
        }
    }
}
