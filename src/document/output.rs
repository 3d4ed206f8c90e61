// EMC JobGen Output Descriptions
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Wire shapes of the outputs inside the CMAF output group. Field order
// follows the service console export.

use serde::Serialize;

use crate::codec::CodecSettings;
use crate::generator::{OverlayImage, RenditionDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Video(VideoOutput),
    Audio(AudioOutput),
    Caption(CaptionOutput),
}

impl Output {
    pub fn name_modifier(&self) -> &str {
        match self {
            Output::Video(v) => &v.name_modifier,
            Output::Audio(a) => a.name_modifier,
            Output::Caption(c) => c.name_modifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSettings {
    pub container: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmfc_settings: Option<CmfcSettings>,
}

impl ContainerSettings {
    pub fn cmfc() -> Self {
        Self {
            container: "CMFC",
            cmfc_settings: None,
        }
    }

    pub fn cmfc_with_iframe_manifest() -> Self {
        Self {
            container: "CMFC",
            cmfc_settings: Some(CmfcSettings {
                i_frame_only_manifest: "INCLUDE",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmfcSettings {
    #[serde(rename = "IFrameOnlyManifest")]
    pub i_frame_only_manifest: &'static str,
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoOutput {
    pub container_settings: ContainerSettings,
    pub video_description: VideoDescription,
    pub name_modifier: String,
}

impl VideoOutput {
    pub fn from_rendition(rendition: &RenditionDescriptor, iframe_only_manifest: bool) -> Self {
        let container_settings = if iframe_only_manifest {
            ContainerSettings::cmfc_with_iframe_manifest()
        } else {
            ContainerSettings::cmfc()
        };

        Self {
            container_settings,
            video_description: VideoDescription {
                width: rendition.width,
                scaling_behavior: "DEFAULT",
                height: rendition.height,
                video_preprocessors: rendition.overlay.as_ref().map(VideoPreprocessors::overlay),
                timecode_insertion: "DISABLED",
                anti_alias: "ENABLED",
                sharpness: 100,
                codec_settings: rendition.codec_settings.clone(),
                afd_signaling: "NONE",
                drop_frame_timecode: "ENABLED",
                respond_to_afd: "NONE",
                color_metadata: "INSERT",
            },
            name_modifier: rendition.name_modifier.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoDescription {
    pub width: u32,
    pub scaling_behavior: &'static str,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_preprocessors: Option<VideoPreprocessors>,
    pub timecode_insertion: &'static str,
    pub anti_alias: &'static str,
    pub sharpness: u32,
    pub codec_settings: CodecSettings,
    pub afd_signaling: &'static str,
    pub drop_frame_timecode: &'static str,
    pub respond_to_afd: &'static str,
    pub color_metadata: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoPreprocessors {
    pub image_inserter: ImageInserter,
}

impl VideoPreprocessors {
    fn overlay(image: &OverlayImage) -> Self {
        Self {
            image_inserter: ImageInserter {
                insertable_images: vec![InsertableImage {
                    image_x: image.x,
                    image_y: image.y,
                    layer: image.layer,
                    image_inserter_input: image.uri.clone(),
                    opacity: image.opacity,
                }],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageInserter {
    pub insertable_images: Vec<InsertableImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InsertableImage {
    pub image_x: u32,
    pub image_y: u32,
    pub layer: u32,
    pub image_inserter_input: String,
    pub opacity: u32,
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

pub const AUDIO_SELECTOR_NAME: &str = "Audio Selector 1";
pub const AUDIO_NAME_MODIFIER: &str = "-aac-192k";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioOutput {
    pub audio_descriptions: Vec<AudioDescription>,
    pub container_settings: ContainerSettings,
    pub name_modifier: &'static str,
}

/// Stereo AAC-LC 192 kbps, loudness normalised to -23 LKFS.
impl Default for AudioOutput {
    fn default() -> Self {
        Self {
            audio_descriptions: vec![AudioDescription {
                audio_type_control: "FOLLOW_INPUT",
                audio_source_name: AUDIO_SELECTOR_NAME,
                codec_settings: AudioCodecSettings {
                    codec: "AAC",
                    aac_settings: AacSettings {
                        audio_description_broadcaster_mix: "NORMAL",
                        bitrate: 192_000,
                        rate_control_mode: "CBR",
                        codec_profile: "LC",
                        coding_mode: "CODING_MODE_2_0",
                        raw_format: "NONE",
                        sample_rate: 48_000,
                        specification: "MPEG4",
                    },
                },
                language_code_control: "USE_CONFIGURED",
                audio_type: 0,
                language_code: "ENG",
                stream_name: "English",
                audio_normalization_settings: AudioNormalizationSettings {
                    algorithm: "ITU_BS_1770_3",
                    target_lkfs: -23,
                },
            }],
            container_settings: ContainerSettings::cmfc(),
            name_modifier: AUDIO_NAME_MODIFIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioDescription {
    pub audio_type_control: &'static str,
    pub audio_source_name: &'static str,
    pub codec_settings: AudioCodecSettings,
    pub language_code_control: &'static str,
    pub audio_type: u32,
    pub language_code: &'static str,
    pub stream_name: &'static str,
    pub audio_normalization_settings: AudioNormalizationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioCodecSettings {
    pub codec: &'static str,
    pub aac_settings: AacSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AacSettings {
    pub audio_description_broadcaster_mix: &'static str,
    pub bitrate: u32,
    pub rate_control_mode: &'static str,
    pub codec_profile: &'static str,
    pub coding_mode: &'static str,
    pub raw_format: &'static str,
    pub sample_rate: u32,
    pub specification: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioNormalizationSettings {
    pub algorithm: &'static str,
    pub target_lkfs: i32,
}

// ---------------------------------------------------------------------------
// Captions
// ---------------------------------------------------------------------------

pub const CAPTION_SELECTOR_NAME: &str = "Captions Selector 1";
pub const CAPTION_NAME_MODIFIER: &str = "-captions";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptionOutput {
    pub container_settings: ContainerSettings,
    pub name_modifier: &'static str,
    pub caption_descriptions: Vec<CaptionDescription>,
}

/// English WebVTT sidecar from the first caption selector.
impl Default for CaptionOutput {
    fn default() -> Self {
        Self {
            container_settings: ContainerSettings::cmfc(),
            name_modifier: CAPTION_NAME_MODIFIER,
            caption_descriptions: vec![CaptionDescription {
                caption_selector_name: CAPTION_SELECTOR_NAME,
                destination_settings: CaptionDestinationSettings {
                    destination_type: "WEBVTT",
                    webvtt_destination_settings: WebvttDestinationSettings {},
                },
                language_code: "ENG",
                language_description: "English",
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptionDescription {
    pub caption_selector_name: &'static str,
    pub destination_settings: CaptionDestinationSettings,
    pub language_code: &'static str,
    pub language_description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptionDestinationSettings {
    pub destination_type: &'static str,
    pub webvtt_destination_settings: WebvttDestinationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebvttDestinationSettings {}
