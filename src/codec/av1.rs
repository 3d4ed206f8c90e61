// EMC JobGen AV1 Profile
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// AV1 GOP structure differs the most between job variants, so every
// constant here comes from the profile.

use serde::{Deserialize, Serialize};

use super::settings::{
    AdaptiveQuantization, Av1Settings, CodecSettingsBlock, QvbrSettings, RateControlMode, Toggle,
};
use super::{CodecFamily, CodecProfile};
use crate::ladder::{LadderEntry, QualityThresholds, ResolutionTier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Av1Tuning {
    pub halve_peak: bool,
    /// GOP length in frames.
    pub gop_size: u32,
    pub b_frames: u32,
    pub slices: u32,
    pub adaptive_quantization: AdaptiveQuantization,
    pub excluded_tiers: Vec<ResolutionTier>,
}

impl Default for Av1Tuning {
    fn default() -> Self {
        Self {
            halve_peak: true,
            gop_size: 60,
            b_frames: 15,
            slices: 4,
            adaptive_quantization: AdaptiveQuantization::Medium,
            excluded_tiers: Vec::new(),
        }
    }
}

pub struct Av1Profile {
    tuning: Av1Tuning,
}

impl Av1Profile {
    pub fn new(tuning: Av1Tuning) -> Self {
        Self { tuning }
    }
}

impl CodecProfile for Av1Profile {
    fn family(&self) -> CodecFamily {
        CodecFamily::Av1
    }

    fn is_supported(&self, tier: ResolutionTier) -> bool {
        !self.tuning.excluded_tiers.contains(&tier)
    }

    fn derive_settings(
        &self,
        tier: ResolutionTier,
        base: LadderEntry,
        quality: &QualityThresholds,
    ) -> CodecSettingsBlock {
        let t = &self.tuning;
        CodecSettingsBlock::Av1Settings(Av1Settings {
            gop_size: t.gop_size,
            number_b_frames_between_reference_frames: t.b_frames,
            slices: t.slices,
            rate_control_mode: RateControlMode::Qvbr,
            qvbr_settings: QvbrSettings {
                qvbr_quality_level: quality.level(tier),
            },
            max_bitrate: if t.halve_peak { base.peak / 2 } else { base.peak },
            adaptive_quantization: t.adaptive_quantization,
            spatial_adaptive_quantization: Toggle::Enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(tuning: Av1Tuning, tier: u32) -> Av1Settings {
        match Av1Profile::new(tuning).derive_settings(
            ResolutionTier::new(tier),
            LadderEntry::new(9_000_000, 15_000_001),
            &QualityThresholds::default(),
        ) {
            CodecSettingsBlock::Av1Settings(s) => s,
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn test_default_constants() {
        let s = derive(Av1Tuning::default(), 2160);
        assert_eq!(s.gop_size, 60);
        assert_eq!(s.number_b_frames_between_reference_frames, 15);
        assert_eq!(s.slices, 4);
        assert_eq!(s.max_bitrate, 7_500_000);
        assert_eq!(s.qvbr_settings.qvbr_quality_level, 9);
    }

    #[test]
    fn test_constants_come_from_tuning() {
        let tuning = Av1Tuning {
            gop_size: 129,
            slices: 1,
            halve_peak: false,
            ..Av1Tuning::default()
        };
        let s = derive(tuning, 720);
        assert_eq!(s.gop_size, 129);
        assert_eq!(s.slices, 1);
        assert_eq!(s.max_bitrate, 15_000_001);
    }
}
