//! Trash operations: yeet, restore, empty.
//!
//! Every operation checks its preconditions before touching the disk, then
//! moves the file and only afterwards rewrites the store. A crash between
//! the two steps leaves an untracked file in the bin rather than a record
//! pointing at nothing.
//!
//! There is no locking. Two invocations racing on the same bin can lose
//! each other's store writes.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, TrashError};
use crate::fsops;
use crate::layout::BinLayout;
use crate::record::{RecordSet, TrashRecord};
use crate::sweep::{SweepReport, sweep_expired};

/// Outcome of a successful yeet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YeetOutcome {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub expires_at: i64,
}

/// Outcome of a successful restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub name: String,
    pub destination: PathBuf,
}

/// Outcome of emptying the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyOutcome {
    /// Records dropped.
    pub removed: usize,
}

/// An initialized bin, pinned to the "now" of one invocation.
#[derive(Debug, Clone)]
pub struct TrashBin {
    layout: BinLayout,
    now: i64,
}

impl TrashBin {
    /// Initialize the layout if needed and bind it to `now`.
    pub fn open(layout: BinLayout, now: i64) -> Result<Self> {
        layout.initialize()?;
        Ok(Self { layout, now })
    }

    #[must_use]
    pub fn layout(&self) -> &BinLayout {
        &self.layout
    }

    /// Run the expiry sweep against this bin's "now".
    pub fn sweep(&self) -> Result<SweepReport> {
        sweep_expired(&self.layout, self.now)
    }

    /// Current records, in insertion order.
    pub fn records(&self) -> Result<RecordSet> {
        self.layout.store().load()
    }

    /// Move `name` (relative to `cwd`, or absolute) into the bin.
    pub fn yeet(&self, cwd: &Path, name: &str) -> Result<YeetOutcome> {
        if !matches!(Path::new(name).components().next_back(), Some(Component::Normal(_))) {
            return Err(TrashError::InvalidName(name.to_string()).into());
        }
        let source = absolutize(cwd, Path::new(name));
        let key = source
            .file_name()
            .and_then(OsStr::to_str)
            .map(str::to_owned)
            .ok_or_else(|| TrashError::InvalidName(name.to_string()))?;

        if !fsops::entry_exists(&source) {
            return Err(TrashError::NotFound(source).into());
        }
        if self.layout.root.starts_with(&source) {
            return Err(TrashError::ContainsBin(source).into());
        }
        if source.starts_with(&self.layout.root) {
            return Err(TrashError::InsideBin(source).into());
        }

        let store = self.layout.store();
        let mut records = store.load()?;
        let destination = self.layout.held_path(&key);
        if records.contains(&key) || fsops::entry_exists(&destination) {
            return Err(TrashError::AlreadyTracked(key).into());
        }

        fsops::move_entry(&source, &destination)?;

        let record = TrashRecord::new(key.clone(), source.clone(), self.now);
        let expires_at = record.expires_at;
        records.insert(record)?;
        store.save(&records)?;

        tracing::info!(
            name = %key,
            path = %source.display(),
            expires_at,
            "Yeeted file"
        );

        Ok(YeetOutcome {
            name: key,
            source,
            destination,
            expires_at,
        })
    }

    /// Move a held entry back to where it came from.
    pub fn restore(&self, name: &str) -> Result<RestoreOutcome> {
        let store = self.layout.store();
        let mut records = store.load()?;

        let destination = match records.get(name) {
            Some(record) => record.original_path.clone(),
            None => return Err(TrashError::NotTracked(name.to_string()).into()),
        };

        if fsops::entry_exists(&destination) {
            return Err(TrashError::DestinationOccupied {
                name: name.to_string(),
                path: destination,
            }
            .into());
        }

        fsops::move_entry(&self.layout.held_path(name), &destination)?;

        records.remove(name);
        store.save(&records)?;

        tracing::info!(name, path = %destination.display(), "Restored file");

        Ok(RestoreOutcome {
            name: name.to_string(),
            destination,
        })
    }

    /// Delete every held entry and forget every record.
    pub fn empty(&self) -> Result<EmptyOutcome> {
        let store = self.layout.store();
        // A corrupt store is still wiped; the count is informational only.
        let removed = store.load().map_or(0, |records| records.len());

        fsops::remove_entry(&self.layout.holding_dir)?;
        self.layout.initialize()?;
        store.save(&RecordSet::new())?;

        tracing::info!(removed, "Emptied yeet bin");
        Ok(EmptyOutcome { removed })
    }
}

/// Join `path` onto `cwd` and fold `.`/`..` lexically, without consulting
/// the filesystem (symlinks in `cwd` are kept as-is).
fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    let joined = cwd.join(path);
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
