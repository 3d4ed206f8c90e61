// EMC JobGen Job Document
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// The document submitted to the transcoding service. Built once per job from
// the rendition sequence, serialized immediately, never read back.

pub mod input;
pub mod output;

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::Settings;
use crate::error::Result;
use crate::generator::RenditionDescriptor;
use crate::naming::destination_uri;
use crate::profile::{AccelerationMode, PackagingProfile, Profile};

pub use input::Input;
pub use output::{AudioOutput, CaptionOutput, ContainerSettings, Output, VideoOutput};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobDocument {
    pub queue: String,
    pub user_metadata: BTreeMap<String, String>,
    pub role: String,
    pub settings: JobSettings,
    pub billing_tags_source: &'static str,
    pub acceleration_settings: AccelerationSettings,
    pub status_update_interval: &'static str,
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobSettings {
    pub timecode_config: TimecodeConfig,
    pub output_groups: Vec<OutputGroup>,
    pub follow_source: u32,
    pub inputs: Vec<Input>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimecodeConfig {
    pub source: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccelerationSettings {
    pub mode: AccelerationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputGroup {
    pub custom_name: String,
    pub name: String,
    pub outputs: Vec<Output>,
    pub output_group_settings: OutputGroupSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputGroupSettings {
    #[serde(rename = "Type")]
    pub kind: &'static str,
    pub cmaf_group_settings: CmafGroupSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CmafGroupSettings {
    pub target_duration_compatibility_mode: &'static str,
    pub write_dash_manifest: &'static str,
    pub segment_length: u32,
    pub min_final_segment_length: u32,
    pub segment_control: &'static str,
    pub manifest_duration_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_inf_resolution: Option<&'static str>,
    pub destination: String,
    pub destination_settings: DestinationSettings,
    pub fragment_length: u32,
    pub codec_specification: &'static str,
}

impl CmafGroupSettings {
    fn new(packaging: &PackagingProfile, destination: String) -> Self {
        Self {
            target_duration_compatibility_mode: "SPEC_COMPLIANT",
            write_dash_manifest: "DISABLED",
            segment_length: packaging.segment_length,
            min_final_segment_length: packaging.min_final_segment_length,
            segment_control: "SEGMENTED_FILES",
            manifest_duration_format: "FLOATING_POINT",
            stream_inf_resolution: packaging.stream_inf_resolution.then_some("INCLUDE"),
            destination,
            destination_settings: DestinationSettings {
                s3_settings: S3Settings {
                    access_control: AccessControl {
                        canned_acl: "BUCKET_OWNER_FULL_CONTROL",
                    },
                },
            },
            fragment_length: packaging.fragment_length,
            codec_specification: "RFC_6381",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DestinationSettings {
    #[serde(rename = "S3Settings")]
    pub s3_settings: S3Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3Settings {
    pub access_control: AccessControl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessControl {
    pub canned_acl: &'static str,
}

/// Serialized document and its SHA-256.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub json: String,
    pub digest: String,
}

impl JobDocument {
    /// Pretty JSON with 2-space indentation.
    pub fn render(&self) -> Result<RenderedDocument> {
        let json = serde_json::to_string_pretty(self)?;
        let digest = format!("{:x}", Sha256::digest(json.as_bytes()));
        Ok(RenderedDocument { json, digest })
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Output> {
        self.settings
            .output_groups
            .iter()
            .flat_map(|group| group.outputs.iter())
    }
}

/// Merges a rendition sequence with the fixed audio/caption outputs and
/// the run settings.
pub struct JobAssembler<'a> {
    settings: &'a Settings,
    profile: &'a Profile,
}

impl<'a> JobAssembler<'a> {
    pub fn new(settings: &'a Settings, profile: &'a Profile) -> Self {
        Self { settings, profile }
    }

    pub fn assemble(&self, job_name: &str, renditions: &[RenditionDescriptor]) -> JobDocument {
        let packaging = &self.profile.packaging;

        let mut outputs: Vec<Output> = renditions
            .iter()
            .map(|r| Output::Video(VideoOutput::from_rendition(r, packaging.iframe_only_manifest)))
            .collect();
        outputs.push(Output::Audio(AudioOutput::default()));
        outputs.push(Output::Caption(CaptionOutput::default()));

        debug!(
            "[DOCUMENT] '{}': {} outputs ({} video)",
            job_name,
            outputs.len(),
            renditions.len()
        );

        let destination = destination_uri(&self.settings.destination_path, job_name);

        JobDocument {
            queue: self.settings.queue_arn.clone(),
            user_metadata: BTreeMap::new(),
            role: self.settings.role_arn.clone(),
            settings: JobSettings {
                timecode_config: TimecodeConfig { source: "ZEROBASED" },
                output_groups: vec![OutputGroup {
                    custom_name: packaging.custom_name.clone(),
                    name: packaging.group_name.clone(),
                    outputs,
                    output_group_settings: OutputGroupSettings {
                        kind: "CMAF_GROUP_SETTINGS",
                        cmaf_group_settings: CmafGroupSettings::new(packaging, destination),
                    },
                }],
                follow_source: 1,
                inputs: vec![Input::from_profile(self.settings, &self.profile.input)],
            },
            billing_tags_source: "JOB",
            acceleration_settings: AccelerationSettings {
                mode: packaging.acceleration,
            },
            status_update_interval: "SECONDS_60",
            priority: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecFamily;
    use crate::config::sample_settings;
    use crate::generator::RenditionMatrixGenerator;
    use crate::ladder::tiers;
    use serde_json::json;

    fn assemble(profile: &Profile, job_name: &str) -> JobDocument {
        let settings = sample_settings();
        let generator = RenditionMatrixGenerator::new(profile, Some(&settings.badge_base_path));
        let renditions = generator
            .generate(
                &[CodecFamily::Hevc, CodecFamily::Avc],
                &tiers(&[720, 1080, 1440, 2160]),
            )
            .unwrap();
        JobAssembler::new(&settings, profile).assemble(job_name, &renditions)
    }

    #[test]
    fn test_outputs_end_with_audio_and_captions() {
        let doc = assemble(&Profile::poc_4k(), "job1");
        let modifiers: Vec<&str> = doc.outputs().map(|o| o.name_modifier()).collect();
        assert_eq!(modifiers.len(), 8);
        assert_eq!(&modifiers[6..], &["-aac-192k", "-captions"]);
    }

    #[test]
    fn test_top_level_shape() {
        let doc = assemble(&Profile::poc_4k(), "job1");
        let v: serde_json::Value = serde_json::from_str(&doc.render().unwrap().json).unwrap();

        assert_eq!(v["Queue"], "arn:aws:mediaconvert:us-east-1:000000000000:queues/Default");
        assert_eq!(v["UserMetadata"], json!({}));
        assert_eq!(v["BillingTagsSource"], "JOB");
        assert_eq!(v["AccelerationSettings"], json!({ "Mode": "PREFERRED" }));
        assert_eq!(v["StatusUpdateInterval"], "SECONDS_60");
        assert_eq!(v["Priority"], 0);
        assert_eq!(v["Settings"]["FollowSource"], 1);
        assert_eq!(v["Settings"]["TimecodeConfig"], json!({ "Source": "ZEROBASED" }));

        let group = &v["Settings"]["OutputGroups"][0];
        assert_eq!(group["CustomName"], "multi-codec");
        assert_eq!(group["Name"], "CMAF");
        assert_eq!(group["OutputGroupSettings"]["Type"], "CMAF_GROUP_SETTINGS");
        let cmaf = &group["OutputGroupSettings"]["CmafGroupSettings"];
        assert_eq!(cmaf["Destination"], "s3://bucket/4k/job1/$fn$");
        assert_eq!(cmaf["StreamInfResolution"], "INCLUDE");
        assert_eq!(cmaf["SegmentLength"], 6);
        assert_eq!(
            cmaf["DestinationSettings"]["S3Settings"]["AccessControl"]["CannedAcl"],
            "BUCKET_OWNER_FULL_CONTROL"
        );
    }

    #[test]
    fn test_multicodec_packaging_switches() {
        let doc = assemble(&Profile::multicodec(), "");
        let v = serde_json::to_value(&doc).unwrap();
        let cmaf = &v["Settings"]["OutputGroups"][0]["OutputGroupSettings"]["CmafGroupSettings"];

        assert!(cmaf.get("StreamInfResolution").is_none());
        assert_eq!(cmaf["Destination"], "s3://bucket/4k/multicodec10/$fn$");
        assert_eq!(v["AccelerationSettings"]["Mode"], "ENABLED");
        assert_eq!(
            v["Settings"]["OutputGroups"][0]["Outputs"][0]["ContainerSettings"],
            json!({ "Container": "CMFC" })
        );
    }

    #[test]
    fn test_render_is_pretty_and_digest_stable() {
        let doc = assemble(&Profile::poc_4k(), "job1");
        let first = doc.render().unwrap();
        let second = doc.render().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.digest.len(), 64);
        assert!(first.json.starts_with("{\n  \"Queue\""));
    }
}
