//! End-to-end job generation: settings → matrix → document → disk.

use chrono::{DateTime, FixedOffset, TimeZone};
use emc_jobgen::codec::CodecFamily;
use emc_jobgen::config::{
    MapSource, Settings, BADGE_PATH_KEY, CAPTION_FILE_URI_KEY, DESTINATION_PATH_KEY,
    QUEUE_ARN_KEY, ROLE_ARN_KEY, VIDEO_FILE_URI_KEY,
};
use emc_jobgen::io_shield::ShadowFileWriter;
use emc_jobgen::ladder::tiers;
use emc_jobgen::profile::ProfileCatalog;
use emc_jobgen::runner::{JobRunner, JobSpec};
use emc_jobgen::Error;
use serde_json::Value;
use std::fs;

fn settings() -> Settings {
    let source = MapSource::new()
        .with(QUEUE_ARN_KEY, "arn:aws:mediaconvert:us-east-1:111111111111:queues/Default")
        .with(ROLE_ARN_KEY, "arn:aws:iam::111111111111:role/MediaConvert_Default_Role")
        .with(DESTINATION_PATH_KEY, "video-dev/4k/")
        .with(VIDEO_FILE_URI_KEY, "s3://ingest/UHD_2398.mp4")
        .with(CAPTION_FILE_URI_KEY, "s3://ingest/UHD_2398.vtt")
        .with(BADGE_PATH_KEY, "https://static.test/framesizebadges/");
    Settings::from_source(&source).unwrap()
}

fn at() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 10, 19, 14, 30, 0)
        .unwrap()
}

fn hevc_avc_job() -> JobSpec {
    let mut spec = JobSpec::new(
        "Tst4k_AABR-AVC_{codecs}_{formatted_datetime}",
        vec![CodecFamily::Hevc, CodecFamily::Avc],
    );
    spec.tiers = Some(tiers(&[720, 1080, 1440, 2160]));
    spec
}

#[test]
fn test_hevc_avc_four_tier_job_has_eight_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings();
    let catalog = ProfileCatalog::default();
    let writer = ShadowFileWriter::new(dir.path());
    let runner = JobRunner::new(&settings, &catalog, &writer, "poc-4k").at(at());

    let report = runner.run_job(&hevc_avc_job()).unwrap();
    assert_eq!(report.job_name, "Tst4k_AABR-AVC_HEVC_AVC_20261019_143000");
    assert_eq!(report.renditions.len(), 6);
    assert_eq!(report.output_count, 8);

    let doc: Value = serde_json::from_str(&fs::read_to_string(&report.path).unwrap()).unwrap();
    let outputs = doc["Settings"]["OutputGroups"][0]["Outputs"].as_array().unwrap();
    let modifiers: Vec<&str> = outputs
        .iter()
        .map(|o| o["NameModifier"].as_str().unwrap())
        .collect();
    assert_eq!(
        modifiers,
        vec![
            "-hevc-720",
            "-avc-720",
            "-hevc-1080",
            "-avc-1080",
            "-hevc-1440",
            "-hevc-2160",
            "-aac-192k",
            "-captions",
        ]
    );

    let hevc_2160 = &outputs[5]["VideoDescription"];
    assert_eq!(hevc_2160["Width"], 3840);
    assert_eq!(hevc_2160["CodecSettings"]["H265Settings"]["CodecLevel"], "LEVEL_5");
    assert_eq!(hevc_2160["CodecSettings"]["H265Settings"]["MaxBitrate"], 7_500_000);
    assert_eq!(
        hevc_2160["VideoPreprocessors"]["ImageInserter"]["InsertableImages"][0]["ImageInserterInput"],
        "https://static.test/framesizebadges/hevc-2160p.png"
    );

    let avc_720 = &outputs[1]["VideoDescription"]["CodecSettings"]["H264Settings"];
    assert_eq!(avc_720["CodecProfile"], "MAIN");
    assert_eq!(avc_720["MaxBitrate"], 4_500_000);
    assert_eq!(avc_720["HrdBufferSize"], 9_000_000);

    assert_eq!(
        doc["Settings"]["OutputGroups"][0]["OutputGroupSettings"]["CmafGroupSettings"]["Destination"],
        "s3://video-dev/4k/Tst4k_AABR-AVC_HEVC_AVC_20261019_143000/$fn$"
    );
    assert_eq!(doc["Settings"]["Inputs"][0]["FileInput"], "s3://ingest/UHD_2398.mp4");
}

#[test]
fn test_retry_after_failed_write_produces_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("static");
    fs::write(&out_dir, b"blocks the output directory").unwrap();

    let settings = settings();
    let catalog = ProfileCatalog::default();
    let writer = ShadowFileWriter::new(&out_dir);
    let runner = JobRunner::new(&settings, &catalog, &writer, "poc-4k").at(at());

    match runner.run_job(&hevc_avc_job()) {
        Err(Error::Job { source, .. }) => assert!(matches!(*source, Error::Write { .. })),
        other => panic!("expected write failure, got {:?}", other),
    }

    fs::remove_file(&out_dir).unwrap();
    let first = runner.run_job(&hevc_avc_job()).unwrap();
    let first_bytes = fs::read(&first.path).unwrap();

    let second = runner.run_job(&hevc_avc_job()).unwrap();
    assert_eq!(first.digest, second.digest);
    assert_eq!(first_bytes, fs::read(&second.path).unwrap());
}

#[test]
fn test_batch_keeps_job_order() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings();
    let catalog = ProfileCatalog::default();
    let writer = ShadowFileWriter::new(dir.path());
    let runner = JobRunner::new(&settings, &catalog, &writer, "poc-4k").at(at());

    let specs: Vec<JobSpec> = (0..8)
        .map(|i| JobSpec::new(format!("job{}_{{codecs}}", i), vec![CodecFamily::Vp9]))
        .collect();
    let names: Vec<String> = runner
        .run_all(&specs)
        .into_iter()
        .map(|r| r.unwrap().job_name)
        .collect();
    let expected: Vec<String> = (0..8).map(|i| format!("job{}_VP9", i)).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_multicodec_profile_job() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings();
    let catalog = ProfileCatalog::default();
    let writer = ShadowFileWriter::new(dir.path());
    let runner = JobRunner::new(&settings, &catalog, &writer, "multicodec").at(at());

    let report = runner.run_job(&JobSpec::new("", Vec::new())).unwrap();
    assert_eq!(report.path, dir.path().join("multicodec10.json"));
    assert_eq!(report.renditions.len(), 32);

    let doc: Value = serde_json::from_str(&fs::read_to_string(&report.path).unwrap()).unwrap();
    let input = &doc["Settings"]["Inputs"][0];
    assert_eq!(input["InputClippings"][0]["EndTimecode"], "00:00:30:00");
    assert_eq!(
        input["CaptionSelectors"]["Captions Selector 1"]["SourceSettings"]["SourceType"],
        "SCC"
    );

    let av1 = doc["Settings"]["OutputGroups"][0]["Outputs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["NameModifier"] == "-av1-2160")
        .unwrap();
    let settings = &av1["VideoDescription"]["CodecSettings"]["Av1Settings"];
    assert_eq!(settings["GopSize"], 129);
    assert_eq!(settings["Slices"], 1);
    assert_eq!(settings["MaxBitrate"], 40_000_000);
    assert_eq!(settings["QvbrSettings"]["QvbrQualityLevel"], 9);
}

#[test]
fn test_same_named_batch_reports_every_collision() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings();
    let catalog = ProfileCatalog::default();
    let writer = ShadowFileWriter::new(dir.path());
    let runner = JobRunner::new(&settings, &catalog, &writer, "poc-4k").at(at());

    let specs: Vec<JobSpec> = (0..8)
        .map(|i| {
            let mut spec = JobSpec::new("same", vec![CodecFamily::Hevc]);
            if i % 2 == 1 {
                spec.profile = Some("multicodec".to_string());
            }
            spec
        })
        .collect();

    let results = runner.run_all(&specs);
    assert!(results[0].is_ok());
    let failed = results[1..]
        .iter()
        .filter(|r| matches!(r, Err(Error::Job { job, .. }) if job == "same"))
        .count();
    assert_eq!(failed, 7);

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("same.json")]);

    // the document on disk is the first job's (poc-4k, tier-major)
    let body = fs::read_to_string(dir.path().join("same.json")).unwrap();
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["Settings"]["OutputGroups"][0]["Outputs"][0]["NameModifier"], "-hevc-720");
}
