// EMC JobGen QVBR Quality Step Function
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use serde::{Deserialize, Serialize};

use super::tier::ResolutionTier;

/// Which side of the SD/HD boundaries a tier falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityBand {
    Low,
    Mid,
    High,
}

/// Tier → QVBR quality level, as a three-step function.
///
/// `tier < sd_floor` is low, `sd_floor..=hd_ceiling` is mid, above is high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub sd_floor: u32,
    pub hd_ceiling: u32,
    pub low: u8,
    pub mid: u8,
    pub high: u8,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            sd_floor: 720,
            hd_ceiling: 1080,
            low: 4,
            mid: 7,
            high: 9,
        }
    }
}

impl QualityThresholds {
    /// One level for every tier.
    pub fn flat(level: u8) -> Self {
        Self {
            low: level,
            mid: level,
            high: level,
            ..Self::default()
        }
    }

    pub fn band(&self, tier: ResolutionTier) -> QualityBand {
        let h = tier.height();
        if h < self.sd_floor {
            QualityBand::Low
        } else if h <= self.hd_ceiling {
            QualityBand::Mid
        } else {
            QualityBand::High
        }
    }

    pub fn level(&self, tier: ResolutionTier) -> u8 {
        match self.band(tier) {
            QualityBand::Low => self.low,
            QualityBand::Mid => self.mid,
            QualityBand::High => self.high,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.sd_floor > self.hd_ceiling {
            return Err(format!(
                "quality sd_floor {} is above hd_ceiling {}",
                self.sd_floor, self.hd_ceiling
            ));
        }
        if [self.low, self.mid, self.high]
            .iter()
            .any(|l| !(1..=10).contains(l))
        {
            return Err("QVBR quality levels must be within 1..=10".to_string());
        }
        Ok(())
    }
}
