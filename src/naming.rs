// EMC JobGen Job Naming
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use chrono::{DateTime, Local, TimeZone};

use crate::codec::CodecFamily;

/// Output directory used when a job has no name.
pub const FALLBACK_OUTPUT_DIR: &str = "multicodec10";

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Render a job-name template. `{codecs}` becomes the internal codec names
/// joined by `_`, `{formatted_datetime}` the timestamp as `yyyyMMdd_HHmmss`.
/// Unknown placeholders are left as written.
pub fn render_job_name<Tz: TimeZone>(
    template: &str,
    codecs: &[CodecFamily],
    at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let codec_list: Vec<&str> = codecs.iter().map(|c| c.name()).collect();
    template
        .replace("{codecs}", &codec_list.join("_"))
        .replace("{formatted_datetime}", &at.format(TIMESTAMP_FORMAT).to_string())
}

/// `render_job_name` against the local clock.
pub fn job_name_now(template: &str, codecs: &[CodecFamily]) -> String {
    render_job_name(template, codecs, &Local::now())
}

/// `s3://{destination}{job}/$fn$`, with the fallback directory for an empty job name.
pub fn destination_uri(destination_path: &str, job_name: &str) -> String {
    let dir = if job_name.is_empty() {
        FALLBACK_OUTPUT_DIR
    } else {
        job_name
    };
    format!("s3://{}{}/$fn$", destination_path, dir)
}

/// File name of the written document.
pub fn document_file_name(job_name: &str) -> String {
    let stem = if job_name.is_empty() {
        FALLBACK_OUTPUT_DIR
    } else {
        job_name
    };
    format!("{}.json", stem)
}
