// EMC JobGen HEVC (H.265) Profile
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use serde::{Deserialize, Serialize};

use super::settings::{
    AdaptiveQuantization, CodecSettingsBlock, H265CodecLevel, H265Settings, QualityTuningLevel,
    QvbrSettings, RateControlMode, Toggle,
};
use super::{CodecFamily, CodecProfile};
use crate::ladder::{LadderEntry, QualityThresholds, ResolutionTier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HevcTuning {
    pub halve_peak: bool,
    pub gop_size: u32,
    pub b_frames: u32,
    pub slices: u32,
    /// Slice count for tiers below `small_tier_below`.
    pub small_tier_slices: u32,
    pub small_tier_below: u32,
    /// Tiers at or above this pin `pinned_level` instead of `AUTO`.
    pub pinned_level_from: u32,
    pub pinned_level: H265CodecLevel,
    pub quality_tuning: QualityTuningLevel,
    pub excluded_tiers: Vec<ResolutionTier>,
}

impl Default for HevcTuning {
    fn default() -> Self {
        Self {
            halve_peak: true,
            gop_size: 3,
            b_frames: 3,
            slices: 2,
            small_tier_slices: 4,
            small_tier_below: 720,
            pinned_level_from: 2160,
            pinned_level: H265CodecLevel::Level5,
            quality_tuning: QualityTuningLevel::MultiPassHq,
            excluded_tiers: Vec::new(),
        }
    }
}

pub struct HevcProfile {
    tuning: HevcTuning,
}

impl HevcProfile {
    pub fn new(tuning: HevcTuning) -> Self {
        Self { tuning }
    }

    fn codec_level(&self, tier: ResolutionTier) -> H265CodecLevel {
        if tier.height() >= self.tuning.pinned_level_from {
            self.tuning.pinned_level
        } else {
            H265CodecLevel::Auto
        }
    }

    fn slices(&self, tier: ResolutionTier) -> u32 {
        if tier.height() < self.tuning.small_tier_below {
            self.tuning.small_tier_slices
        } else {
            self.tuning.slices
        }
    }
}

impl CodecProfile for HevcProfile {
    fn family(&self) -> CodecFamily {
        CodecFamily::Hevc
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

        CodecSettingsBlock::H265Settings(H265Settings {
            interlace_mode: "PROGRESSIVE",
            number_reference_frames: 3,
            gop_closed_cadence: 1,
            alternate_transfer_function_sei: Toggle::Disabled,
            hrd_buffer_initial_fill_percentage: 90,
            gop_size: t.gop_size,
            slices: self.slices(tier),
            gop_b_reference: Toggle::Enabled,
            hrd_buffer_size: max_bitrate.saturating_mul(2),
            max_bitrate,
            spatial_adaptive_quantization: Toggle::Enabled,
            temporal_adaptive_quantization: Toggle::Enabled,
            flicker_adaptive_quantization: Toggle::Enabled,
            rate_control_mode: RateControlMode::Qvbr,
            qvbr_settings: QvbrSettings {
                qvbr_quality_level: quality.level(tier),
            },
            codec_profile: "MAIN_MAIN",
            tiles: Toggle::Enabled,
            min_i_interval: 0,
            adaptive_quantization: AdaptiveQuantization::High,
            codec_level: self.codec_level(tier),
            scene_change_detect: Toggle::Enabled,
            quality_tuning_level: t.quality_tuning,
            unregistered_sei_timecode: Toggle::Disabled,
            gop_size_units: "SECONDS",
            number_b_frames_between_reference_frames: t.b_frames,
            temporal_ids: Toggle::Disabled,
            sample_adaptive_offset_filter_mode: "ADAPTIVE",
            write_mp4_packaging_type: "HVC1",
            dynamic_sub_gop: "ADAPTIVE",
        })
    }
}
