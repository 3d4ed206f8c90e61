// EMC JobGen VP9 Profile
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use serde::{Deserialize, Serialize};

use super::settings::{CodecSettingsBlock, QualityTuningLevel, RateControlMode, Vp9Settings};
use super::{CodecFamily, CodecProfile};
use crate::error::Result;
use crate::ladder::{LadderEntry, LadderTable, QualityThresholds, ResolutionTier};

/// Where VP9 bitrates come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vp9Ladder {
    /// The profile's base table with target and peak halved.
    HalvedBase,
    /// A dedicated VP9 table (usually targets with derived 1.45 peaks).
    Dedicated(LadderTable),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vp9Tuning {
    pub ladder: Vp9Ladder,
    pub quality_tuning: QualityTuningLevel,
    pub excluded_tiers: Vec<ResolutionTier>,
}

impl Default for Vp9Tuning {
    fn default() -> Self {
        Self {
            ladder: Vp9Ladder::HalvedBase,
            quality_tuning: QualityTuningLevel::MultiPassHq,
            excluded_tiers: Vec::new(),
        }
    }
}

pub struct Vp9Profile {
    tuning: Vp9Tuning,
}

impl Vp9Profile {
    pub fn new(tuning: Vp9Tuning) -> Self {
        Self { tuning }
    }
}

impl CodecProfile for Vp9Profile {
    fn family(&self) -> CodecFamily {
        CodecFamily::Vp9
    }

    fn is_supported(&self, tier: ResolutionTier) -> bool {
        !self.tuning.excluded_tiers.contains(&tier)
    }

    fn base_entry(&self, tier: ResolutionTier, ladder: &LadderTable) -> Result<LadderEntry> {
        match &self.tuning.ladder {
            Vp9Ladder::HalvedBase => Ok(ladder.lookup_for(tier, CodecFamily::Vp9)?.halved()),
            Vp9Ladder::Dedicated(table) => table.lookup_for(tier, CodecFamily::Vp9),
        }
    }

    fn derive_settings(
        &self,
        _tier: ResolutionTier,
        base: LadderEntry,
        _quality: &QualityThresholds,
    ) -> CodecSettingsBlock {
        CodecSettingsBlock::Vp9Settings(Vp9Settings {
            rate_control_mode: RateControlMode::Vbr,
            max_bitrate: base.peak,
            bitrate: base.target,
            quality_tuning_level: self.tuning.quality_tuning,
        })
    }
}
