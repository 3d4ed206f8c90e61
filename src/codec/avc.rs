// EMC JobGen AVC (H.264) Profile
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use serde::{Deserialize, Serialize};

use super::settings::{
    AdaptiveQuantization, CodecSettingsBlock, H264CodecProfile, H264Settings, QualityTuningLevel,
    QvbrSettings, RateControlMode, Toggle,
};
use super::{CodecFamily, CodecProfile};
use crate::ladder::{tiers, LadderEntry, QualityThresholds, ResolutionTier};

/// How the H.264 codec profile is picked per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AvcProfileRule {
    /// `MAIN` below `high_from`, `HIGH` at or above it.
    ByTier { high_from: u32 },
    AlwaysHigh,
}

impl AvcProfileRule {
    pub fn profile_for(self, tier: ResolutionTier) -> H264CodecProfile {
        match self {
            Self::ByTier { high_from } if tier.height() < high_from => H264CodecProfile::Main,
            _ => H264CodecProfile::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvcTuning {
    pub halve_peak: bool,
    pub gop_size: u32,
    pub b_frames: u32,
    pub slices: u32,
    pub profile_rule: AvcProfileRule,
    pub quality_tuning: QualityTuningLevel,
    /// Tiers this family never renders (decoder/profile limits).
    pub excluded_tiers: Vec<ResolutionTier>,
}

impl Default for AvcTuning {
    fn default() -> Self {
        Self {
            halve_peak: false,
            gop_size: 3,
            b_frames: 3,
            slices: 4,
            profile_rule: AvcProfileRule::ByTier { high_from: 1080 },
            quality_tuning: QualityTuningLevel::MultiPassHq,
            excluded_tiers: tiers(&[1440, 2160]),
        }
    }
}

pub struct AvcProfile {
    tuning: AvcTuning,
}

impl AvcProfile {
    pub fn new(tuning: AvcTuning) -> Self {
        Self { tuning }
    }
}

impl CodecProfile for AvcProfile {
    fn family(&self) -> CodecFamily {
        CodecFamily::Avc
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
        let max_bitrate = if t.halve_peak { base.peak / 2 } else { base.peak };

        CodecSettingsBlock::H264Settings(H264Settings {
            interlace_mode: "PROGRESSIVE",
            number_reference_frames: 3,
            syntax: "DEFAULT",
            gop_closed_cadence: 1,
            hrd_buffer_initial_fill_percentage: 90,
            gop_size: t.gop_size,
            slices: t.slices,
            gop_b_reference: Toggle::Enabled,
            hrd_buffer_size: max_bitrate.saturating_mul(2),
            max_bitrate,
            spatial_adaptive_quantization: Toggle::Enabled,
            temporal_adaptive_quantization: Toggle::Enabled,
            flicker_adaptive_quantization: Toggle::Enabled,
            entropy_encoding: "CABAC",
            rate_control_mode: RateControlMode::Qvbr,
            qvbr_settings: QvbrSettings {
                qvbr_quality_level: quality.level(tier),
            },
            codec_profile: t.profile_rule.profile_for(tier),
            min_i_interval: 0,
            adaptive_quantization: AdaptiveQuantization::High,
            codec_level: "AUTO",
            field_encoding: "PAFF",
            scene_change_detect: Toggle::Enabled,
            quality_tuning_level: t.quality_tuning,
            unregistered_sei_timecode: Toggle::Disabled,
            gop_size_units: "SECONDS",
            number_b_frames_between_reference_frames: t.b_frames,
            repeat_pps: Toggle::Disabled,
            dynamic_sub_gop: "ADAPTIVE",
        })
    }
}
