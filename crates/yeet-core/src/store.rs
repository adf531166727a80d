//! Durable record store backed by a single JSON document.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::record::RecordSet;

/// The store file. Loading never repairs anything: a document that does not
/// parse is reported as corrupt and left untouched on disk.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scratch file for [`save`](Self::save): the store's file name plus
    /// `.tmp`, in the same directory.
    #[must_use]
    pub fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write an empty mapping if the store file does not exist yet.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&RecordSet::new())?;
        tracing::debug!(path = %self.path.display(), "Created empty record store");
        Ok(true)
    }

    pub fn load(&self) -> Result<RecordSet> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;
        let records: RecordSet =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                details: e.to_string(),
            })?;
        Ok(records)
    }

    /// Replace the store contents via a temp file and rename, so a failed
    /// write never truncates the existing document.
    pub fn save(&self, records: &RecordSet) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content).map_err(|source| StoreError::WriteFailed {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::WriteFailed {
                path: self.path.clone(),
                source,
            }
        })?;

        tracing::trace!(path = %self.path.display(), records = records.len(), "Saved record store");
        Ok(())
    }
}
