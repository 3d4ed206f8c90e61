// EMC JobGen Codec Settings Blocks
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Wire shapes of the per-codec settings objects. Field order here is the
// field order in the written document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Toggle {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateControlMode {
    Qvbr,
    Vbr,
    Cbr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTuningLevel {
    SinglePass,
    SinglePassHq,
    MultiPassHq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdaptiveQuantization {
    Off,
    Low,
    Medium,
    High,
    Higher,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum H264CodecProfile {
    Baseline,
    Main,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum H265CodecLevel {
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "LEVEL_4_1")]
    Level4_1,
    #[serde(rename = "LEVEL_5")]
    Level5,
    #[serde(rename = "LEVEL_5_1")]
    Level5_1,
    #[serde(rename = "LEVEL_5_2")]
    Level5_2,
    #[serde(rename = "LEVEL_6")]
    Level6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QvbrSettings {
    pub qvbr_quality_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct H265Settings {
    pub interlace_mode: &'static str,
    pub number_reference_frames: u32,
    pub gop_closed_cadence: u32,
    pub alternate_transfer_function_sei: Toggle,
    pub hrd_buffer_initial_fill_percentage: u32,
    pub gop_size: u32,
    pub slices: u32,
    pub gop_b_reference: Toggle,
    pub hrd_buffer_size: u64,
    pub max_bitrate: u64,
    pub spatial_adaptive_quantization: Toggle,
    pub temporal_adaptive_quantization: Toggle,
    pub flicker_adaptive_quantization: Toggle,
    pub rate_control_mode: RateControlMode,
    pub qvbr_settings: QvbrSettings,
    pub codec_profile: &'static str,
    pub tiles: Toggle,
    pub min_i_interval: u32,
    pub adaptive_quantization: AdaptiveQuantization,
    pub codec_level: H265CodecLevel,
    pub scene_change_detect: Toggle,
    pub quality_tuning_level: QualityTuningLevel,
    pub unregistered_sei_timecode: Toggle,
    pub gop_size_units: &'static str,
    pub number_b_frames_between_reference_frames: u32,
    pub temporal_ids: Toggle,
    pub sample_adaptive_offset_filter_mode: &'static str,
    pub write_mp4_packaging_type: &'static str,
    pub dynamic_sub_gop: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct H264Settings {
    pub interlace_mode: &'static str,
    pub number_reference_frames: u32,
    pub syntax: &'static str,
    pub gop_closed_cadence: u32,
    pub hrd_buffer_initial_fill_percentage: u32,
    pub gop_size: u32,
    pub slices: u32,
    pub gop_b_reference: Toggle,
    pub hrd_buffer_size: u64,
    pub max_bitrate: u64,
    pub spatial_adaptive_quantization: Toggle,
    pub temporal_adaptive_quantization: Toggle,
    pub flicker_adaptive_quantization: Toggle,
    pub entropy_encoding: &'static str,
    pub rate_control_mode: RateControlMode,
    pub qvbr_settings: QvbrSettings,
    pub codec_profile: H264CodecProfile,
    pub min_i_interval: u32,
    pub adaptive_quantization: AdaptiveQuantization,
    pub codec_level: &'static str,
    pub field_encoding: &'static str,
    pub scene_change_detect: Toggle,
    pub quality_tuning_level: QualityTuningLevel,
    pub unregistered_sei_timecode: Toggle,
    pub gop_size_units: &'static str,
    pub number_b_frames_between_reference_frames: u32,
    pub repeat_pps: Toggle,
    pub dynamic_sub_gop: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vp9Settings {
    pub rate_control_mode: RateControlMode,
    pub max_bitrate: u64,
    pub bitrate: u64,
    pub quality_tuning_level: QualityTuningLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Av1Settings {
    pub gop_size: u32,
    pub number_b_frames_between_reference_frames: u32,
    pub slices: u32,
    pub rate_control_mode: RateControlMode,
    pub qvbr_settings: QvbrSettings,
    pub max_bitrate: u64,
    pub adaptive_quantization: AdaptiveQuantization,
    pub spatial_adaptive_quantization: Toggle,
}

/// The family-specific block, keyed by its settings name on the wire
/// (`H265Settings`, `H264Settings`, `Vp9Settings`, `Av1Settings`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CodecSettingsBlock {
    H264Settings(H264Settings),
    H265Settings(H265Settings),
    Vp9Settings(Vp9Settings),
    Av1Settings(Av1Settings),
}

impl CodecSettingsBlock {
    pub fn rate_control_mode(&self) -> RateControlMode {
        match self {
            Self::H264Settings(s) => s.rate_control_mode,
            Self::H265Settings(s) => s.rate_control_mode,
            Self::Vp9Settings(s) => s.rate_control_mode,
            Self::Av1Settings(s) => s.rate_control_mode,
        }
    }

    pub fn max_bitrate(&self) -> u64 {
        match self {
            Self::H264Settings(s) => s.max_bitrate,
            Self::H265Settings(s) => s.max_bitrate,
            Self::Vp9Settings(s) => s.max_bitrate,
            Self::Av1Settings(s) => s.max_bitrate,
        }
    }

    /// Average bitrate; only bitrate-driven (VBR) blocks carry one.
    pub fn target_bitrate(&self) -> Option<u64> {
        match self {
            Self::Vp9Settings(s) => Some(s.bitrate),
            _ => None,
        }
    }

    /// QVBR quality level, for quality-driven blocks.
    pub fn qvbr_level(&self) -> Option<u8> {
        match self {
            Self::H264Settings(s) => Some(s.qvbr_settings.qvbr_quality_level),
            Self::H265Settings(s) => Some(s.qvbr_settings.qvbr_quality_level),
            Self::Av1Settings(s) => Some(s.qvbr_settings.qvbr_quality_level),
            Self::Vp9Settings(_) => None,
        }
    }
}

/// `CodecSettings` object of a video description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodecSettings {
    pub codec: &'static str,
    #[serde(flatten)]
    pub block: CodecSettingsBlock,
}
