// EMC JobGen Rendition Matrix Generator
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Walks tiers x codecs in the profile's order, skips pairs a family does
// not support, and derives one rendition descriptor per remaining pair.
// Pure: no clock, no I/O, no hash-ordered containers.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codec::{CodecFamily, CodecRegistry, CodecSettings};
use crate::error::{Error, Result};
use crate::ladder::ResolutionTier;
use crate::profile::{check_unique, OverlayStyle, Profile};

/// Nesting of the tier/codec walk. Output order is player priority order,
/// so it is never re-sorted after generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationOrder {
    /// Outer loop over tiers, inner over codecs.
    TierMajor,
    /// Outer loop over codecs, inner over tiers.
    CodecMajor,
}

impl IterationOrder {
    /// Every (tier, codec) pair in walk order.
    pub fn pairs(
        self,
        codecs: &[CodecFamily],
        tiers: &[ResolutionTier],
    ) -> Vec<(ResolutionTier, CodecFamily)> {
        let mut pairs = Vec::with_capacity(codecs.len() * tiers.len());
        match self {
            Self::TierMajor => {
                for &tier in tiers {
                    for &codec in codecs {
                        pairs.push((tier, codec));
                    }
                }
            }
            Self::CodecMajor => {
                for &codec in codecs {
                    for &tier in tiers {
                        pairs.push((tier, codec));
                    }
                }
            }
        }
        pairs
    }
}

/// Badge image burned into a rendition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayImage {
    pub uri: String,
    pub x: u32,
    pub y: u32,
    pub layer: u32,
    pub opacity: u32,
}

impl OverlayImage {
    fn compose(style: &OverlayStyle, base: &str, codec: CodecFamily, tier: ResolutionTier) -> Self {
        let file = style
            .file_template
            .replace("{codec}", codec.lowercase())
            .replace("{tier}", &tier.to_string());
        Self {
            uri: format!("{}{}", base, file),
            x: style.image_x,
            y: style.image_y,
            layer: style.layer,
            opacity: style.opacity,
        }
    }
}

/// One video output of the job.
#[derive(Debug, Clone, PartialEq)]
pub struct RenditionDescriptor {
    pub tier: ResolutionTier,
    pub codec: CodecFamily,
    pub width: u32,
    pub height: u32,
    pub codec_settings: CodecSettings,
    /// `-{codec}-{tier}`, unique within a job.
    pub name_modifier: String,
    pub overlay: Option<OverlayImage>,
}

pub fn name_modifier(codec: CodecFamily, tier: ResolutionTier) -> String {
    format!("-{}-{}", codec.lowercase(), tier)
}

pub struct RenditionMatrixGenerator<'a> {
    profile: &'a Profile,
    registry: CodecRegistry,
    badge_base: Option<&'a str>,
}

impl<'a> RenditionMatrixGenerator<'a> {
    /// `badge_base` is the overlay image prefix; overlays are only attached
    /// when both it and the profile's overlay style are present.
    pub fn new(profile: &'a Profile, badge_base: Option<&'a str>) -> Self {
        Self {
            profile,
            registry: CodecRegistry::for_profile(profile),
            badge_base,
        }
    }

    pub fn order(&self) -> IterationOrder {
        self.profile.order
    }

    /// Generate the rendition sequence with the profile's default walk.
    pub fn generate_default(&self) -> Result<Vec<RenditionDescriptor>> {
        self.generate(&self.profile.codecs, &self.profile.tiers)
    }

    /// Generate the ordered rendition sequence for `codecs` x `tiers`.
    ///
    /// Any pair without a ladder entry fails the whole call; no partial
    /// sequence is returned.
    pub fn generate(
        &self,
        codecs: &[CodecFamily],
        tiers: &[ResolutionTier],
    ) -> Result<Vec<RenditionDescriptor>> {
        let invalid = |message: String| Error::Profile {
            profile: self.profile.name.clone(),
            message,
        };
        check_unique(codecs, "codec").map_err(invalid)?;
        check_unique(tiers, "tier").map_err(invalid)?;

        let mut renditions = Vec::new();
        for (tier, codec) in self.order().pairs(codecs, tiers) {
            let codec_profile = self.registry.get(codec);
            if !codec_profile.is_supported(tier) {
                debug!("[MATRIX] Skipping {} at {}p (excluded)", codec, tier);
                continue;
            }

            let base = codec_profile.base_entry(tier, &self.profile.ladder)?;
            let block = codec_profile.derive_settings(tier, base, &self.profile.quality);

            let overlay = match (&self.profile.overlay, self.badge_base) {
                (Some(style), Some(base)) => Some(OverlayImage::compose(style, base, codec, tier)),
                _ => None,
            };

            renditions.push(RenditionDescriptor {
                tier,
                codec,
                width: tier.frame_width(),
                height: tier.height(),
                codec_settings: CodecSettings {
                    codec: codec.wire_name(),
                    block,
                },
                name_modifier: name_modifier(codec, tier),
                overlay,
            });
        }

        info!(
            "[MATRIX] Profile '{}' ({:?}): {} renditions from {} codecs x {} tiers",
            self.profile.name,
            self.order(),
            renditions.len(),
            codecs.len(),
            tiers.len()
        );
        Ok(renditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::settings::CodecSettingsBlock;
    use crate::ladder::tiers;

    #[test]
    fn test_pairs_tier_major() {
        let pairs = IterationOrder::TierMajor.pairs(
            &[CodecFamily::Hevc, CodecFamily::Avc],
            &tiers(&[720, 1080]),
        );
        let expected = vec![
            (ResolutionTier::new(720), CodecFamily::Hevc),
            (ResolutionTier::new(720), CodecFamily::Avc),
            (ResolutionTier::new(1080), CodecFamily::Hevc),
            (ResolutionTier::new(1080), CodecFamily::Avc),
        ];
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_pairs_codec_major() {
        let pairs = IterationOrder::CodecMajor.pairs(
            &[CodecFamily::Hevc, CodecFamily::Avc],
            &tiers(&[720, 1080]),
        );
        let expected = vec![
            (ResolutionTier::new(720), CodecFamily::Hevc),
            (ResolutionTier::new(1080), CodecFamily::Hevc),
            (ResolutionTier::new(720), CodecFamily::Avc),
            (ResolutionTier::new(1080), CodecFamily::Avc),
        ];
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_avc_excluded_at_top_tiers() {
        let profile = Profile::poc_4k();
        let generator = RenditionMatrixGenerator::new(&profile, None);
        let renditions = generator
            .generate(
                &[CodecFamily::Avc, CodecFamily::Hevc],
                &tiers(&[720, 1080, 1440, 2160]),
            )
            .unwrap();

        let modifiers: Vec<&str> = renditions.iter().map(|r| r.name_modifier.as_str()).collect();
        assert_eq!(
            modifiers,
            vec![
                "-avc-720",
                "-hevc-720",
                "-avc-1080",
                "-hevc-1080",
                "-hevc-1440",
                "-hevc-2160",
            ]
        );
    }

    #[test]
    fn test_geometry_and_wire_name() {
        let profile = Profile::poc_4k();
        let generator = RenditionMatrixGenerator::new(&profile, None);
        let renditions = generator
            .generate(&[CodecFamily::Hevc], &tiers(&[432]))
            .unwrap();
        let r = &renditions[0];
        assert_eq!((r.width, r.height), (768, 432));
        assert_eq!(r.codec_settings.codec, "H_265");
        assert!(r.overlay.is_none());
    }

    #[test]
    fn test_overlay_uri() {
        let profile = Profile::poc_4k();
        let generator = RenditionMatrixGenerator::new(&profile, Some("https://cdn.test/badges/"));
        let renditions = generator
            .generate(&[CodecFamily::Vp9], &tiers(&[1080]))
            .unwrap();
        let overlay = renditions[0].overlay.as_ref().unwrap();
        assert_eq!(overlay.uri, "https://cdn.test/badges/vp9-1080p.png");
        assert_eq!(overlay.layer, 2);
        assert_eq!(overlay.opacity, 50);
    }

    #[test]
    fn test_unknown_tier_aborts_generation() {
        let profile = Profile::poc_4k();
        let generator = RenditionMatrixGenerator::new(&profile, None);
        let err = generator
            .generate(&[CodecFamily::Hevc], &tiers(&[720, 540]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownTier { tier: 540, codec: Some(CodecFamily::Hevc), .. }
        ));
    }

    #[test]
    fn test_excluded_pair_with_unknown_tier_is_not_an_error() {
        let mut profile = Profile::poc_4k();
        profile.avc.excluded_tiers.push(ResolutionTier::new(4320));
        let generator = RenditionMatrixGenerator::new(&profile, None);
        let renditions = generator
            .generate(&[CodecFamily::Avc], &tiers(&[4320, 720]))
            .unwrap();
        assert_eq!(renditions.len(), 1);
    }

    #[test]
    fn test_duplicate_codec_rejected() {
        let profile = Profile::poc_4k();
        let generator = RenditionMatrixGenerator::new(&profile, None);
        assert!(generator
            .generate(&[CodecFamily::Hevc, CodecFamily::Hevc], &tiers(&[720]))
            .is_err());
    }

    #[test]
    fn test_multicodec_default_walk() {
        let profile = Profile::multicodec();
        let generator = RenditionMatrixGenerator::new(&profile, None);
        assert_eq!(generator.order(), IterationOrder::CodecMajor);

        let renditions = generator.generate_default().unwrap();
        assert_eq!(renditions.len(), 32);
        assert_eq!(renditions[0].name_modifier, "-vp9-2160");
        assert_eq!(renditions[31].name_modifier, "-av1-234");

        match &renditions[0].codec_settings.block {
            CodecSettingsBlock::Vp9Settings(s) => {
                assert_eq!(s.bitrate, 10_000_000);
                assert_eq!(s.max_bitrate, 20_000_000);
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }
}
