// EMC JobGen Library
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Generates MediaConvert job documents from a bitrate ladder and a
// codec/resolution rendition matrix.

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod io_shield;
pub mod ladder;
pub mod naming;
pub mod profile;
pub mod report;
pub mod runner;

pub use error::{Error, Result};
