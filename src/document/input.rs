// EMC JobGen Input Description
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use serde::Serialize;
use std::collections::BTreeMap;

use super::output::{AUDIO_SELECTOR_NAME, CAPTION_SELECTOR_NAME};
use crate::config::Settings;
use crate::profile::{CaptionSourceType, InputProfile};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Input {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input_clippings: Vec<InputClipping>,
    pub audio_selectors: BTreeMap<&'static str, AudioSelector>,
    pub video_selector: VideoSelector,
    pub timecode_source: &'static str,
    pub caption_selectors: BTreeMap<&'static str, CaptionSelector>,
    pub file_input: String,
}

impl Input {
    /// Source video plus caption sidecar, shaped by the profile's input switches.
    pub fn from_profile(settings: &Settings, input: &InputProfile) -> Self {
        let input_clippings = input
            .clipping
            .iter()
            .map(|clip| InputClipping {
                end_timecode: clip.end.clone(),
                start_timecode: clip.start.clone(),
            })
            .collect();

        let audio_selector = AudioSelector {
            default_selection: "DEFAULT",
            audio_duration_correction: "AUTO",
            selector_type: input.audio_language.as_ref().map(|_| "LANGUAGE_CODE"),
            language_code: input.audio_language.clone(),
        };

        let caption_selector = CaptionSelector {
            source_settings: CaptionSourceSettings {
                source_type: input.caption_source,
                file_source_settings: FileSourceSettings {
                    source_file: settings.caption_file_uri.clone(),
                    time_delta: input.caption_time_delta_secs,
                    time_delta_units: input.caption_time_delta_secs.map(|_| "SECONDS"),
                },
            },
        };

        Self {
            input_clippings,
            audio_selectors: BTreeMap::from([(AUDIO_SELECTOR_NAME, audio_selector)]),
            video_selector: VideoSelector {},
            timecode_source: "ZEROBASED",
            caption_selectors: BTreeMap::from([(CAPTION_SELECTOR_NAME, caption_selector)]),
            file_input: settings.video_file_uri.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InputClipping {
    pub end_timecode: String,
    pub start_timecode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioSelector {
    pub default_selection: &'static str,
    pub audio_duration_correction: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSelector {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptionSelector {
    pub source_settings: CaptionSourceSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptionSourceSettings {
    pub source_type: CaptionSourceType,
    pub file_source_settings: FileSourceSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileSourceSettings {
    pub source_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_delta: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_delta_units: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sample_settings;
    use crate::profile::ClipWindow;
    use serde_json::json;

    #[test]
    fn test_default_input() {
        let input = Input::from_profile(&sample_settings(), &InputProfile::default());
        let v = serde_json::to_value(&input).unwrap();

        assert!(v.get("InputClippings").is_none());
        assert_eq!(v["FileInput"], "s3://ingest/source.mp4");
        assert_eq!(v["VideoSelector"], json!({}));
        assert_eq!(
            v["AudioSelectors"]["Audio Selector 1"],
            json!({
                "DefaultSelection": "DEFAULT",
                "AudioDurationCorrection": "AUTO",
                "SelectorType": "LANGUAGE_CODE",
                "LanguageCode": "ENG"
            })
        );
        assert_eq!(
            v["CaptionSelectors"]["Captions Selector 1"]["SourceSettings"],
            json!({
                "SourceType": "WEBVTT",
                "FileSourceSettings": { "SourceFile": "s3://ingest/source.vtt" }
            })
        );
    }

    #[test]
    fn test_clipped_scc_input_with_time_delta() {
        let profile = InputProfile {
            caption_source: CaptionSourceType::Scc,
            audio_language: None,
            clipping: Some(ClipWindow {
                start: "00:00:00:00".to_string(),
                end: "00:00:30:00".to_string(),
            }),
            caption_time_delta_secs: Some(-3603),
        };
        let v = serde_json::to_value(Input::from_profile(&sample_settings(), &profile)).unwrap();

        assert_eq!(
            v["InputClippings"],
            json!([{ "EndTimecode": "00:00:30:00", "StartTimecode": "00:00:00:00" }])
        );
        assert!(v["AudioSelectors"]["Audio Selector 1"].get("SelectorType").is_none());
        let source = &v["CaptionSelectors"]["Captions Selector 1"]["SourceSettings"];
        assert_eq!(source["SourceType"], "SCC");
        assert_eq!(source["FileSourceSettings"]["TimeDelta"], -3603);
        assert_eq!(source["FileSourceSettings"]["TimeDeltaUnits"], "SECONDS");
    }
}
