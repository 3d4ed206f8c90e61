// EMC JobGen Codec Families
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// One `CodecProfile` per family. The matrix generator only talks to the
// trait; everything family-specific lives behind it.

pub mod av1;
pub mod avc;
pub mod hevc;
pub mod settings;
pub mod vp9;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::ladder::{LadderEntry, LadderTable, QualityThresholds, ResolutionTier};
use crate::profile::Profile;

pub use av1::{Av1Profile, Av1Tuning};
pub use avc::{AvcProfile, AvcProfileRule, AvcTuning};
pub use hevc::{HevcProfile, HevcTuning};
pub use settings::{CodecSettings, CodecSettingsBlock};
pub use vp9::{Vp9Ladder, Vp9Profile, Vp9Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CodecFamily {
    #[serde(alias = "avc", alias = "H_264")]
    Avc,
    #[serde(alias = "hevc", alias = "H_265")]
    Hevc,
    #[serde(alias = "vp9")]
    Vp9,
    #[serde(alias = "av1")]
    Av1,
}

impl CodecFamily {
    pub const ALL: [CodecFamily; 4] = [Self::Avc, Self::Hevc, Self::Vp9, Self::Av1];

    /// Internal name, as used in job names (`HEVC_AVC`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Avc => "AVC",
            Self::Hevc => "HEVC",
            Self::Vp9 => "VP9",
            Self::Av1 => "AV1",
        }
    }

    /// The `Codec` value the transcoding service expects.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Avc => "H_264",
            Self::Hevc => "H_265",
            Self::Vp9 => "VP9",
            Self::Av1 => "AV1",
        }
    }

    /// Lowercase name for name modifiers and badge paths.
    pub fn lowercase(self) -> &'static str {
        match self {
            Self::Avc => "avc",
            Self::Hevc => "hevc",
            Self::Vp9 => "vp9",
            Self::Av1 => "av1",
        }
    }
}

impl fmt::Display for CodecFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodecFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVC" | "H264" | "H_264" => Ok(Self::Avc),
            "HEVC" | "H265" | "H_265" => Ok(Self::Hevc),
            "VP9" => Ok(Self::Vp9),
            "AV1" => Ok(Self::Av1),
            other => Err(format!(
                "unknown codec '{}' (expected one of AVC, HEVC, VP9, AV1)",
                other
            )),
        }
    }
}

/// Per-family encoder parameter derivation.
pub trait CodecProfile: Send + Sync {
    fn family(&self) -> CodecFamily;

    /// Whether this family renders `tier` at all. Unsupported pairs are
    /// skipped by the generator, not reported as errors.
    fn is_supported(&self, tier: ResolutionTier) -> bool;

    /// The (target, peak) pair the derivation starts from.
    fn base_entry(&self, tier: ResolutionTier, ladder: &LadderTable) -> Result<LadderEntry> {
        ladder.lookup_for(tier, self.family())
    }

    fn derive_settings(
        &self,
        tier: ResolutionTier,
        base: LadderEntry,
        quality: &QualityThresholds,
    ) -> CodecSettingsBlock;
}

/// The codec profiles of one job profile, keyed by family.
pub struct CodecRegistry {
    profiles: BTreeMap<CodecFamily, Box<dyn CodecProfile>>,
}

impl CodecRegistry {
    pub fn for_profile(profile: &Profile) -> Self {
        let mut profiles: BTreeMap<CodecFamily, Box<dyn CodecProfile>> = BTreeMap::new();
        profiles.insert(CodecFamily::Avc, Box::new(AvcProfile::new(profile.avc.clone())));
        profiles.insert(CodecFamily::Hevc, Box::new(HevcProfile::new(profile.hevc.clone())));
        profiles.insert(CodecFamily::Vp9, Box::new(Vp9Profile::new(profile.vp9.clone())));
        profiles.insert(CodecFamily::Av1, Box::new(Av1Profile::new(profile.av1.clone())));
        Self { profiles }
    }

    pub fn get(&self, family: CodecFamily) -> &dyn CodecProfile {
        // every family is registered in for_profile
        self.profiles[&family].as_ref()
    }
}
