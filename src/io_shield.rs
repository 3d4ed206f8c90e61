// EMC JobGen I/O Shield: Shadow Write & Atomic Move
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Documents are written to a uniquely named `.emc_tmp` shadow file in the
// output directory and renamed into place only once the write has completed.
// Concurrent writers never share a shadow. A failed or interrupted write
// leaves the previous document (if any) intact and never a truncated one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Suffix of in-flight shadow files.
pub const SHADOW_SUFFIX: &str = ".emc_tmp";

/// Persists a text blob under a name.
pub trait DocumentWriter: Send + Sync {
    /// Write `contents` as `name` and return the final path.
    fn write(&self, name: &str, contents: &str) -> Result<PathBuf>;
}

/// Writes into a directory through a shadow file and an atomic rename.
#[derive(Debug, Clone)]
pub struct ShadowFileWriter {
    out_dir: PathBuf,
}

impl ShadowFileWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Fresh shadow next to the final path, e.g. `static/.job.json.a1B2c3.emc_tmp`.
    fn write_shadow(&self, name: &str, contents: &str) -> std::io::Result<NamedTempFile> {
        let mut shadow = tempfile::Builder::new()
            .prefix(&format!(".{}.", name))
            .suffix(SHADOW_SUFFIX)
            .tempfile_in(&self.out_dir)?;
        shadow.write_all(contents.as_bytes())?;
        shadow.as_file().sync_all()?;
        Ok(shadow)
    }

    /// Move a completed shadow to its final path. The shadow is removed
    /// when the rename fails.
    fn commit(shadow: NamedTempFile, final_path: &Path) -> Result<()> {
        let tmp_path = shadow.path().to_path_buf();
        shadow.persist(final_path).map_err(|e| {
            warn!("[IO_SHIELD] Rename failed, discarding shadow {:?}", tmp_path);
            Error::Write {
                path: final_path.to_path_buf(),
                source: e.error,
            }
        })?;
        info!("[IO_SHIELD] ✅ Atomic rename: {:?} → {:?}", tmp_path, final_path);
        Ok(())
    }
}

impl DocumentWriter for ShadowFileWriter {
    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let final_path = self.out_dir.join(name);
        let write_err = |source| Error::Write {
            path: final_path.clone(),
            source,
        };

        fs::create_dir_all(&self.out_dir).map_err(write_err)?;
        // a shadow that fails mid-write is deleted when dropped
        let shadow = self.write_shadow(name, contents).map_err(write_err)?;

        Self::commit(shadow, &final_path)?;
        Ok(final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_creates_dir_and_leaves_no_shadow() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("static");
        let writer = ShadowFileWriter::new(&out_dir);

        let path = writer.write("job.json", "{}").unwrap();
        assert_eq!(path, out_dir.join("job.json"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert_eq!(entries(&out_dir), vec!["job.json"]);
    }

    #[test]
    fn test_overwrite_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ShadowFileWriter::new(dir.path());
        writer.write("job.json", "a much longer first document").unwrap();
        let path = writer.write("job.json", "short").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "short");
    }

    #[test]
    fn test_concurrent_writers_never_tear_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Arc::new(ShadowFileWriter::new(dir.path()));
        let bodies: Vec<String> = (0..8).map(|i| format!("{}", i).repeat(64 * 1024)).collect();

        let handles: Vec<_> = bodies
            .iter()
            .cloned()
            .map(|body| {
                let writer = Arc::clone(&writer);
                thread::spawn(move || writer.write("job.json", &body).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let on_disk = fs::read_to_string(dir.path().join("job.json")).unwrap();
        assert!(bodies.contains(&on_disk));
        assert_eq!(entries(dir.path()), vec!["job.json"]);
    }

    #[test]
    fn test_unwritable_destination_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where the output directory should be
        let blocker = dir.path().join("static");
        fs::write(&blocker, b"not a directory").unwrap();

        let writer = ShadowFileWriter::new(&blocker);
        let err = writer.write("job.json", "{}").unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
