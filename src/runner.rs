// EMC JobGen Job Runner
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Jobs share no mutable state, so a batch fans out over the rayon pool.
// Outcomes come back in job order and one failed job never stops the rest.

use chrono::{DateTime, FixedOffset, Local};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::codec::CodecFamily;
use crate::config::Settings;
use crate::document::JobAssembler;
use crate::error::{Error, Result};
use crate::generator::{RenditionDescriptor, RenditionMatrixGenerator};
use crate::io_shield::DocumentWriter;
use crate::ladder::ResolutionTier;
use crate::naming::{document_file_name, render_job_name};
use crate::profile::{Profile, ProfileCatalog};

/// One entry of a job list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Name template; see `naming::render_job_name`.
    pub job_name: String,
    /// Empty means the profile's codec walk.
    #[serde(default, alias = "codecs_to_use")]
    pub codecs: Vec<CodecFamily>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub tiers: Option<Vec<ResolutionTier>>,
}

impl JobSpec {
    pub fn new(job_name: impl Into<String>, codecs: Vec<CodecFamily>) -> Self {
        Self {
            job_name: job_name.into(),
            codecs,
            profile: None,
            tiers: None,
        }
    }

    /// A JSON array of job entries.
    pub fn load_list(path: &Path) -> Result<Vec<JobSpec>> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read job list {:?}: {}", path, e)))?;
        let jobs: Vec<JobSpec> = serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("invalid job list {:?}: {}", path, e)))?;
        if jobs.is_empty() {
            return Err(Error::config(format!("job list {:?} is empty", path)));
        }
        Ok(jobs)
    }
}

/// Outcome of one written job.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_name: String,
    pub profile: String,
    pub path: PathBuf,
    /// SHA-256 of the written document.
    pub digest: String,
    pub renditions: Vec<RenditionDescriptor>,
    pub output_count: usize,
}

pub struct JobRunner<'a> {
    settings: &'a Settings,
    catalog: &'a ProfileCatalog,
    writer: &'a dyn DocumentWriter,
    default_profile: String,
    timestamp: DateTime<FixedOffset>,
}

impl<'a> JobRunner<'a> {
    pub fn new(
        settings: &'a Settings,
        catalog: &'a ProfileCatalog,
        writer: &'a dyn DocumentWriter,
        default_profile: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            catalog,
            writer,
            default_profile: default_profile.into(),
            timestamp: Local::now().fixed_offset(),
        }
    }

    /// Pin the clock used for `{formatted_datetime}`; every job of the run
    /// shares it.
    pub fn at(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn resolve<'s>(&'s self, spec: &'s JobSpec) -> Result<ResolvedJob<'s>> {
        let profile_name = spec.profile.as_deref().unwrap_or(&self.default_profile);
        let profile = self
            .catalog
            .get(profile_name)
            .map_err(|e| e.in_job(&spec.job_name))?;

        let codecs = if spec.codecs.is_empty() {
            profile.codecs.as_slice()
        } else {
            spec.codecs.as_slice()
        };
        let tiers = spec.tiers.as_deref().unwrap_or(&profile.tiers);
        let job_name = render_job_name(&spec.job_name, codecs, &self.timestamp);
        let file_name = document_file_name(&job_name);

        Ok(ResolvedJob {
            profile,
            codecs,
            tiers,
            job_name,
            file_name,
        })
    }

    fn execute(&self, job: &ResolvedJob<'_>) -> Result<JobReport> {
        let ResolvedJob {
            profile,
            codecs,
            tiers,
            job_name,
            file_name,
        } = job;

        let build = || -> Result<JobReport> {
            let generator =
                RenditionMatrixGenerator::new(profile, Some(&self.settings.badge_base_path));
            let renditions = generator.generate(codecs, tiers)?;

            let document = JobAssembler::new(self.settings, profile).assemble(job_name, &renditions);
            let output_count = document.outputs().count();
            let rendered = document.render()?;
            let path = self.writer.write(file_name, &rendered.json)?;

            info!(
                "[RUNNER] ✅ '{}' ({}): {} outputs → {:?} sha256={}",
                job_name, profile.name, output_count, path, rendered.digest
            );

            Ok(JobReport {
                job_name: job_name.clone(),
                profile: profile.name.clone(),
                path,
                digest: rendered.digest,
                renditions,
                output_count,
            })
        };

        build().map_err(|e| {
            error!("[RUNNER] ❌ '{}' failed: {}", job_name, e);
            e.in_job(job_name)
        })
    }

    /// Generate, assemble, serialize and write one job.
    pub fn run_job(&self, spec: &JobSpec) -> Result<JobReport> {
        self.execute(&self.resolve(spec)?)
    }

    /// Run every job in parallel; results are in `specs` order.
    ///
    /// Names are resolved up front. A job whose document file name was
    /// already claimed earlier in the batch fails instead of overwriting it.
    pub fn run_all(&self, specs: &[JobSpec]) -> Vec<Result<JobReport>> {
        info!("[RUNNER] Dispatching {} job(s)", specs.len());

        let mut claimed = BTreeSet::new();
        let resolved: Vec<Result<ResolvedJob<'_>>> = specs
            .iter()
            .map(|spec| {
                let job = self.resolve(spec)?;
                if !claimed.insert(job.file_name.clone()) {
                    error!(
                        "[RUNNER] ❌ '{}' collides with an earlier job ({})",
                        job.job_name, job.file_name
                    );
                    return Err(Error::config(format!(
                        "document '{}' is already written by an earlier job in this run",
                        job.file_name
                    ))
                    .in_job(&job.job_name));
                }
                Ok(job)
            })
            .collect();

        resolved
            .into_par_iter()
            .map(|job| job.and_then(|job| self.execute(&job)))
            .collect()
    }
}

/// A job spec with its profile, walk and rendered name pinned.
struct ResolvedJob<'s> {
    profile: &'s Profile,
    codecs: &'s [CodecFamily],
    tiers: &'s [ResolutionTier],
    job_name: String,
    file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sample_settings;
    use crate::io_shield::ShadowFileWriter;
    use chrono::TimeZone;
    use std::io::Write;

    fn fixed_time() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 7, 9, 5, 2)
            .unwrap()
    }

    #[test]
    fn test_run_job_writes_named_document() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sample_settings();
        let catalog = ProfileCatalog::default();
        let writer = ShadowFileWriter::new(dir.path());
        let runner = JobRunner::new(&settings, &catalog, &writer, "poc-4k").at(fixed_time());

        let spec = JobSpec::new(
            "Tst4k_{codecs}_{formatted_datetime}",
            vec![CodecFamily::Hevc, CodecFamily::Avc],
        );
        let report = runner.run_job(&spec).unwrap();

        assert_eq!(report.job_name, "Tst4k_HEVC_AVC_20260307_090502");
        assert_eq!(report.path, dir.path().join("Tst4k_HEVC_AVC_20260307_090502.json"));
        assert_eq!(report.renditions.len(), 10);
        assert_eq!(report.output_count, 12);
        assert!(report.path.exists());
    }

    #[test]
    fn test_failed_job_carries_name_and_others_still_run() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sample_settings();
        let catalog = ProfileCatalog::default();
        let writer = ShadowFileWriter::new(dir.path());
        let runner = JobRunner::new(&settings, &catalog, &writer, "poc-4k").at(fixed_time());

        let mut bad = JobSpec::new("bad", vec![CodecFamily::Hevc]);
        bad.tiers = Some(crate::ladder::tiers(&[540]));
        let good = JobSpec::new("good", vec![CodecFamily::Vp9]);

        let results = runner.run_all(&[bad, good]);
        assert_eq!(results.len(), 2);
        match &results[0] {
            Err(Error::Job { job, source }) => {
                assert_eq!(job, "bad");
                assert!(matches!(**source, Error::UnknownTier { tier: 540, .. }));
            }
            other => panic!("expected job error, got {:?}", other),
        }
        assert!(!dir.path().join("bad.json").exists());
        assert_eq!(results[1].as_ref().unwrap().job_name, "good");
    }

    #[test]
    fn test_same_named_jobs_in_one_batch() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sample_settings();
        let catalog = ProfileCatalog::default();
        let writer = ShadowFileWriter::new(dir.path());
        let runner = JobRunner::new(&settings, &catalog, &writer, "poc-4k").at(fixed_time());

        let first = JobSpec::new("same", vec![CodecFamily::Hevc]);
        let mut second = JobSpec::new("same", vec![CodecFamily::Hevc]);
        second.profile = Some("multicodec".to_string());

        let results = runner.run_all(&[first, second]);
        let kept = results[0].as_ref().unwrap();
        assert_eq!(kept.profile, "poc-4k");
        match &results[1] {
            Err(Error::Job { job, source }) => {
                assert_eq!(job, "same");
                assert!(matches!(**source, Error::Configuration { .. }));
            }
            other => panic!("expected job error, got {:?}", other),
        }

        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        let on_disk = fs::read_to_string(&kept.path).unwrap();
        assert!(on_disk.contains("-hevc-234"));
    }

    #[test]
    fn test_empty_name_collides_with_fallback_name() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sample_settings();
        let catalog = ProfileCatalog::default();
        let writer = ShadowFileWriter::new(dir.path());
        let runner = JobRunner::new(&settings, &catalog, &writer, "poc-4k").at(fixed_time());

        let results = runner.run_all(&[
            JobSpec::new("", vec![CodecFamily::Vp9]),
            JobSpec::new("multicodec10", vec![CodecFamily::Vp9]),
        ]);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::Job { .. })));
    }

    #[test]
    fn test_unknown_profile_is_job_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sample_settings();
        let catalog = ProfileCatalog::default();
        let writer = ShadowFileWriter::new(dir.path());
        let runner = JobRunner::new(&settings, &catalog, &writer, "poc-4k");

        let mut spec = JobSpec::new("x", vec![CodecFamily::Hevc]);
        spec.profile = Some("missing".to_string());
        assert!(matches!(runner.run_job(&spec), Err(Error::Job { .. })));
    }

    #[test]
    fn test_load_job_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{ "job_name": "Tst4k_{{codecs}}", "codecs_to_use": ["HEVC", "AVC"] }},
                {{ "job_name": "all", "profile": "multicodec", "tiers": [1080, 720] }}
            ]"#
        )
        .unwrap();

        let jobs = JobSpec::load_list(file.path()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].codecs, vec![CodecFamily::Hevc, CodecFamily::Avc]);
        assert!(jobs[1].codecs.is_empty());
        assert_eq!(jobs[1].tiers.as_ref().unwrap()[0], ResolutionTier::new(1080));
    }
}
