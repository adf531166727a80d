//! On-disk layout of the bin.
//!
//! ```text
//! ~/.yeet/
//! ├── yeeted.json      record store
//! └── bin/             holding directory, one entry per record
//! ```
//!
//! Older versions kept held entries directly under the root, next to the
//! store. [`BinLayout::initialize`] moves any such entry the store still
//! tracks into `bin/`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, expand_tilde};
use crate::error::{ConfigError, Result};
use crate::fsops;
use crate::store::RecordStore;

/// Environment variable overriding the bin root.
pub const HOME_ENV: &str = "YEET_HOME";

const DEFAULT_ROOT_NAME: &str = ".yeet";
const HOLDING_DIR_NAME: &str = "bin";
const STORE_FILE_NAME: &str = "yeeted.json";
/// Where a legacy entry named `bin` waits while the holding directory is
/// created in its place.
const LEGACY_STAGING_NAME: &str = ".bin.legacy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinLayout {
    pub root: PathBuf,
    pub holding_dir: PathBuf,
    pub store_path: PathBuf,
}

impl BinLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            holding_dir: root.join(HOLDING_DIR_NAME),
            store_path: root.join(STORE_FILE_NAME),
            root,
        }
    }

    /// Pick the root: `env_override`, then `general.root_dir`, then `~/.yeet`.
    pub fn resolve(config: &Config, env_override: Option<&str>) -> Result<Self> {
        if let Some(root) = env_override.filter(|r| !r.is_empty()) {
            return Ok(Self::new(expand_tilde(root)));
        }
        if let Some(root) = config.general.root_dir.as_deref() {
            return Ok(Self::new(expand_tilde(root)));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::new(home.join(DEFAULT_ROOT_NAME)))
    }

    /// Where a held entry named `name` lives.
    #[must_use]
    pub fn held_path(&self, name: &str) -> PathBuf {
        self.holding_dir.join(name)
    }

    #[must_use]
    pub fn store(&self) -> RecordStore {
        RecordStore::new(&self.store_path)
    }

    /// Create the holding directory and an empty store if either is missing,
    /// then adopt entries left under the root by older versions.
    ///
    /// Safe to call on every invocation. An existing store is never
    /// rewritten and entries already in `bin/` are never moved.
    pub fn initialize(&self) -> Result<()> {
        let staging = self.root.join(LEGACY_STAGING_NAME);
        if fsops::entry_exists(&self.holding_dir) && !self.holding_dir.is_dir() {
            fs::rename(&self.holding_dir, &staging)?;
        }

        fs::create_dir_all(&self.holding_dir)?;
        if self.store().ensure_exists()? {
            tracing::info!(root = %self.root.display(), "Initialized yeet bin");
        }

        let bin_entry = self.held_path(HOLDING_DIR_NAME);
        if fsops::entry_exists(&staging) && !fsops::entry_exists(&bin_entry) {
            fsops::move_entry(&staging, &bin_entry)?;
        }
        self.adopt_legacy_entries()?;
        Ok(())
    }

    /// Move tracked entries that sit directly under the root into the
    /// holding directory. Returns how many were moved.
    fn adopt_legacy_entries(&self) -> Result<usize> {
        // A corrupt store is reported by the sweep.
        let store = self.store();
        let Ok(records) = store.load() else {
            return Ok(0);
        };

        let reserved = [
            self.holding_dir.clone(),
            self.store_path.clone(),
            store.tmp_path(),
            self.root.join(LEGACY_STAGING_NAME),
        ];

        let mut adopted = 0;
        for record in &records {
            let legacy = self.root.join(&record.name);
            let held = self.held_path(&record.name);
            if reserved.contains(&legacy)
                || !fsops::entry_exists(&legacy)
                || fsops::entry_exists(&held)
            {
                continue;
            }
            fsops::move_entry(&legacy, &held)?;
            tracing::info!(name = %record.name, "Moved legacy entry into holding directory");
            adopted += 1;
        }
        Ok(adopted)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
