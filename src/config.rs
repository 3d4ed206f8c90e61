// EMC JobGen Configuration
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Static settings come from an opaque key lookup. The JSON file source reads
// the `env.json` the job scripts have always used; the environment can
// override any key.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const QUEUE_ARN_KEY: &str = "MEDIACONVERT_QUEUE_ARN";
pub const ROLE_ARN_KEY: &str = "MEDIACONVERT_ROLE_ARN";
pub const DESTINATION_PATH_KEY: &str = "S3_DESTINATION_PATH";
pub const VIDEO_FILE_URI_KEY: &str = "S3_VIDEO_FILE_URI";
pub const CAPTION_FILE_URI_KEY: &str = "S3_CAPTION_FILE_URI";
pub const BADGE_PATH_KEY: &str = "S3_FRAMESIZE_BADGE_PATH";

pub const REQUIRED_KEYS: [&str; 6] = [
    QUEUE_ARN_KEY,
    ROLE_ARN_KEY,
    DESTINATION_PATH_KEY,
    VIDEO_FILE_URI_KEY,
    CAPTION_FILE_URI_KEY,
    BADGE_PATH_KEY,
];

/// Opaque key -> value lookup.
pub trait SettingsSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Short label for log lines.
    fn describe(&self) -> String;
}

/// Flat JSON object of string values.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileSource {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {:?}: {}", path, e)))?;
        let values: BTreeMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("{:?} is not a flat JSON object of strings: {}", path, e)))?;
        debug!("[CONFIG] Read {} keys from {:?}", values.len(), path);
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }
}

impl SettingsSource for JsonFileSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn describe(&self) -> String {
        format!("{}", self.path.display())
    }
}

/// Process environment (after `.env` has been loaded).
#[derive(Debug, Clone, Default)]
pub struct EnvSource;

impl SettingsSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn describe(&self) -> String {
        "environment".to_string()
    }
}

/// In-memory source.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl SettingsSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// First layer holding a key wins.
pub struct LayeredSource {
    layers: Vec<Box<dyn SettingsSource>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn push(mut self, layer: impl SettingsSource + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl Default for LayeredSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsSource for LayeredSource {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.layers.iter().map(|l| l.describe()).collect();
        names.join(" > ")
    }
}

/// Immutable run settings, built once and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub queue_arn: String,
    pub role_arn: String,
    /// Bucket and prefix, without scheme; job directories are appended.
    pub destination_path: String,
    pub video_file_uri: String,
    pub caption_file_uri: String,
    /// Prefix for per-rendition overlay badge images.
    pub badge_base_path: String,
}

impl Settings {
    /// Resolve every required key. All missing or empty keys are reported
    /// in one error.
    pub fn from_source(source: &dyn SettingsSource) -> Result<Self> {
        let mut missing = Vec::new();
        let mut fetch = |key: &str| match source.get(key) {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                missing.push(key.to_string());
                String::new()
            }
        };

        let settings = Settings {
            queue_arn: fetch(QUEUE_ARN_KEY),
            role_arn: fetch(ROLE_ARN_KEY),
            destination_path: fetch(DESTINATION_PATH_KEY),
            video_file_uri: fetch(VIDEO_FILE_URI_KEY),
            caption_file_uri: fetch(CAPTION_FILE_URI_KEY),
            badge_base_path: fetch(BADGE_PATH_KEY),
        };

        if !missing.is_empty() {
            return Err(Error::config(format!(
                "missing required settings in {}: {}",
                source.describe(),
                missing.join(", ")
            )));
        }

        info!("[CONFIG] Settings resolved from {}", source.describe());
        Ok(settings)
    }

    /// Environment over `env.json` when the file exists, else environment only.
    pub fn discover(config_path: &Path) -> Result<Self> {
        let mut layers = LayeredSource::new().push(EnvSource);
        if config_path.exists() {
            layers = layers.push(JsonFileSource::load(config_path)?);
        } else {
            debug!("[CONFIG] {:?} not found, using environment only", config_path);
        }
        Self::from_source(&layers)
    }
}

#[cfg(test)]
pub(crate) fn sample_settings() -> Settings {
    Settings {
        queue_arn: "arn:aws:mediaconvert:us-east-1:000000000000:queues/Default".to_string(),
        role_arn: "arn:aws:iam::000000000000:role/MediaConvert".to_string(),
        destination_path: "bucket/4k/".to_string(),
        video_file_uri: "s3://ingest/source.mp4".to_string(),
        caption_file_uri: "s3://ingest/source.vtt".to_string(),
        badge_base_path: "https://cdn.test/badges/".to_string(),
    }
}
