// EMC JobGen Bitrate Report
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use crate::codec::settings::RateControlMode;
use crate::generator::RenditionDescriptor;

pub const REPORT_HEADER: &str = "codec\t\ttarget bitrate\tmax bitrate";

/// `{:.2} Mbps` at or above one megabit, `{:.2} Kbps` below.
pub fn bps_to_human_readable(bps: u64) -> String {
    if bps >= 1_000_000 {
        format!("{:.2} Mbps", bps as f64 / 1_000_000.0)
    } else {
        format!("{:.2} Kbps", bps as f64 / 1000.0)
    }
}

/// `{name_modifier}\t{target}\t{max}`. The target column is the readable
/// target bitrate for VBR renditions and `qvbr {level}` for QVBR ones.
pub fn report_line(rendition: &RenditionDescriptor) -> String {
    let block = &rendition.codec_settings.block;
    let target = match (block.rate_control_mode(), block.target_bitrate(), block.qvbr_level()) {
        (RateControlMode::Qvbr, _, Some(level)) => format!("qvbr {}", level),
        (_, Some(bitrate), _) => bps_to_human_readable(bitrate),
        _ => "N/A".to_string(),
    };
    format!(
        "{}\t{}\t{}",
        rendition.name_modifier,
        target,
        bps_to_human_readable(block.max_bitrate())
    )
}

pub fn report_lines(renditions: &[RenditionDescriptor]) -> Vec<String> {
    renditions.iter().map(report_line).collect()
}

/// Console report for one job.
pub fn print_report(job_name: &str, renditions: &[RenditionDescriptor]) {
    println!("------------------");
    println!("Generating job for {}", job_name);
    println!("{}", REPORT_HEADER);
    for line in report_lines(renditions) {
        println!("{}", line);
    }
    println!("------------------");
}
