// EMC JobGen Job Profiles
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// A profile is everything that used to differ between the job-generation
// variants: ladder tables, quality thresholds, per-family GOP constants and
// exclusions, walk order, overlay and packaging switches. Variants are
// data, the generator is shared.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::codec::settings::QualityTuningLevel;
use crate::codec::{AvcProfileRule, AvcTuning, Av1Tuning, CodecFamily, HevcTuning, Vp9Tuning};
use crate::error::{Error, Result};
use crate::generator::IterationOrder;
use crate::ladder::{tiers, LadderTable, QualityThresholds, ResolutionTier};

/// Placement of the per-rendition badge overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// File name under the badge base path; `{codec}` and `{tier}` are
    /// replaced with the lowercase codec name and the tier height.
    pub file_template: String,
    pub image_x: u32,
    pub image_y: u32,
    pub layer: u32,
    pub opacity: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            file_template: "{codec}-{tier}p.png".to_string(),
            image_x: 0,
            image_y: 0,
            layer: 2,
            opacity: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccelerationMode {
    Disabled,
    Enabled,
    Preferred,
}

/// CMAF output-group packaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingProfile {
    pub custom_name: String,
    pub group_name: String,
    pub segment_length: u32,
    pub min_final_segment_length: u32,
    pub fragment_length: u32,
    pub stream_inf_resolution: bool,
    pub iframe_only_manifest: bool,
    pub acceleration: AccelerationMode,
}

impl Default for PackagingProfile {
    fn default() -> Self {
        Self {
            custom_name: "multi-codec".to_string(),
            group_name: "CMAF".to_string(),
            segment_length: 6,
            min_final_segment_length: 2,
            fragment_length: 2,
            stream_inf_resolution: true,
            iframe_only_manifest: true,
            acceleration: AccelerationMode::Preferred,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptionSourceType {
    Webvtt,
    Scc,
}

/// Timecode window of the source to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipWindow {
    pub start: String,
    pub end: String,
}

/// Input-side selector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputProfile {
    pub caption_source: CaptionSourceType,
    /// Select the audio track by language code when set.
    pub audio_language: Option<String>,
    pub clipping: Option<ClipWindow>,
    /// Caption timecode correction, in seconds.
    pub caption_time_delta_secs: Option<i32>,
}

impl Default for InputProfile {
    fn default() -> Self {
        Self {
            caption_source: CaptionSourceType::Webvtt,
            audio_language: Some("ENG".to_string()),
            clipping: None,
            caption_time_delta_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub order: IterationOrder,
    /// Default tier walk, in preference order.
    pub tiers: Vec<ResolutionTier>,
    /// Default codec walk, in preference order.
    pub codecs: Vec<CodecFamily>,
    pub ladder: LadderTable,
    #[serde(default)]
    pub quality: QualityThresholds,
    #[serde(default)]
    pub hevc: HevcTuning,
    #[serde(default)]
    pub avc: AvcTuning,
    #[serde(default)]
    pub vp9: Vp9Tuning,
    #[serde(default)]
    pub av1: Av1Tuning,
    #[serde(default)]
    pub overlay: Option<OverlayStyle>,
    #[serde(default)]
    pub packaging: PackagingProfile,
    #[serde(default)]
    pub input: InputProfile,
}

impl Profile {
    /// 4K proof-of-concept ladder: tier-major walk, graded QVBR levels,
    /// AVC capped at 1080p, multi-pass HEVC.
    pub fn poc_4k() -> Self {
        Self {
            name: "poc-4k".to_string(),
            description: "4K CMAF ladder, tier-major, AVC capped at 1080p".to_string(),
            order: IterationOrder::TierMajor,
            tiers: tiers(&[720, 234, 432, 1080, 1440, 2160]),
            codecs: vec![CodecFamily::Hevc, CodecFamily::Avc],
            ladder: LadderTable::builtin(
                "poc-4k-vbr",
                &[
                    (2160, 9_000_000, 15_000_000),
                    (1440, 7_500_000, 11_000_000),
                    (1080, 4_000_000, 7_500_000),
                    (960, 5_000_000, 7_000_000),
                    (720, 2_500_000, 4_500_000),
                    (432, 900_000, 1_100_000),
                    (360, 600_000, 800_000),
                    (234, 200_000, 400_000),
                ],
            ),
            quality: QualityThresholds::default(),
            hevc: HevcTuning::default(),
            avc: AvcTuning::default(),
            vp9: Vp9Tuning::default(),
            av1: Av1Tuning::default(),
            overlay: Some(OverlayStyle::default()),
            packaging: PackagingProfile::default(),
            input: InputProfile::default(),
        }
    }

    /// Four-codec comparison ladder: codec-major walk, flat QVBR 9,
    /// single-pass HEVC, long-GOP single-slice AV1, 30 second debug clip.
    pub fn multicodec() -> Self {
        Self {
            name: "multicodec".to_string(),
            description: "VP9/HEVC/AVC/AV1 comparison ladder, codec-major".to_string(),
            order: IterationOrder::CodecMajor,
            tiers: tiers(&[2160, 1440, 1080, 960, 720, 432, 360, 234]),
            codecs: vec![
                CodecFamily::Vp9,
                CodecFamily::Hevc,
                CodecFamily::Avc,
                CodecFamily::Av1,
            ],
            ladder: LadderTable::builtin(
                "multicodec-vbr",
                &[
                    (2160, 20_000_000, 40_000_000),
                    (1440, 12_000_000, 14_000_000),
                    (1080, 8_000_000, 10_000_000),
                    (960, 5_000_000, 7_000_000),
                    (720, 2_500_000, 4_500_000),
                    (432, 900_000, 1_100_000),
                    (360, 600_000, 800_000),
                    (234, 200_000, 400_000),
                ],
            ),
            quality: QualityThresholds::flat(9),
            hevc: HevcTuning {
                quality_tuning: QualityTuningLevel::SinglePass,
                ..HevcTuning::default()
            },
            avc: AvcTuning {
                profile_rule: AvcProfileRule::AlwaysHigh,
                quality_tuning: QualityTuningLevel::SinglePass,
                excluded_tiers: Vec::new(),
                ..AvcTuning::default()
            },
            vp9: Vp9Tuning::default(),
            av1: Av1Tuning {
                halve_peak: false,
                gop_size: 129,
                b_frames: 15,
                slices: 1,
                ..Av1Tuning::default()
            },
            overlay: Some(OverlayStyle::default()),
            packaging: PackagingProfile {
                stream_inf_resolution: false,
                iframe_only_manifest: false,
                acceleration: AccelerationMode::Enabled,
                ..PackagingProfile::default()
            },
            input: InputProfile {
                caption_source: CaptionSourceType::Scc,
                audio_language: None,
                clipping: Some(ClipWindow {
                    start: "00:00:00:00".to_string(),
                    end: "00:00:30:00".to_string(),
                }),
                caption_time_delta_secs: None,
            },
        }
    }

    pub fn builtins() -> Vec<Profile> {
        vec![Self::poc_4k(), Self::multicodec()]
    }

    /// Load a single profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read profile file {:?}: {}", path, e))
        })?;
        let profile: Profile = serde_json::from_str(&content).map_err(|e| Error::Profile {
            profile: path.display().to_string(),
            message: e.to_string(),
        })?;
        profile.validate()?;
        info!("[PROFILE] Loaded profile '{}' from {:?}", profile.name, path);
        Ok(profile)
    }

    /// Structural checks a hand-written profile can get wrong.
    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| Error::Profile {
            profile: self.name.clone(),
            message,
        };

        if self.tiers.is_empty() {
            return Err(fail("no tiers configured".to_string()));
        }
        if self.codecs.is_empty() {
            return Err(fail("no codecs configured".to_string()));
        }
        check_unique(&self.tiers, "tier").map_err(fail)?;
        check_unique(&self.codecs, "codec").map_err(fail)?;
        self.quality.validate().map_err(fail)?;

        let gops = [
            ("HEVC", self.hevc.gop_size),
            ("AVC", self.avc.gop_size),
            ("AV1", self.av1.gop_size),
        ];
        if let Some((family, _)) = gops.iter().find(|(_, gop)| *gop == 0) {
            return Err(fail(format!("{} GOP size must be positive", family)));
        }
        if let Some(overlay) = &self.overlay {
            if overlay.opacity > 100 {
                return Err(fail(format!("overlay opacity {} above 100", overlay.opacity)));
            }
        }
        Ok(())
    }
}

/// Reject repeated entries; a repeat would produce duplicate name modifiers.
pub(crate) fn check_unique<T: Ord + std::fmt::Display>(
    items: &[T],
    what: &str,
) -> std::result::Result<(), String> {
    let mut seen = BTreeSet::new();
    for item in items {
        if !seen.insert(item) {
            return Err(format!("{} {} listed more than once", what, item));
        }
    }
    Ok(())
}

/// Built-in profiles plus any loaded from disk. Later entries shadow
/// earlier ones with the same name.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: Vec<Profile>,
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self {
            profiles: Profile::builtins(),
        }
    }
}

impl ProfileCatalog {
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn with_file(self, path: &Path) -> Result<Self> {
        Ok(self.with_profile(Profile::load(path)?))
    }

    pub fn get(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .rev()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown profile '{}' (available: {})",
                    name,
                    self.names().join(", ")
                ))
            })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.profiles
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}
