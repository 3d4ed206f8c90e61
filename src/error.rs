// EMC JobGen Error Types
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecFamily;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown tier {tier}p in ladder table '{table}'{}", codec_suffix(.codec))]
    UnknownTier {
        tier: u32,
        codec: Option<CodecFamily>,
        table: String,
    },

    #[error("Invalid profile '{profile}': {message}")]
    Profile { profile: String, message: String },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize job document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Job '{job}' failed: {source}")]
    Job {
        job: String,
        #[source]
        source: Box<Error>,
    },
}

fn codec_suffix(codec: &Option<CodecFamily>) -> String {
    match codec {
        Some(c) => format!(" (codec {})", c.name()),
        None => String::new(),
    }
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Attach the job name to an error raised while building that job.
    pub fn in_job(self, job: impl Into<String>) -> Self {
        Error::Job {
            job: job.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
