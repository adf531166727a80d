//! Trash records and their on-disk document shape.
//!
//! The store document is a JSON object keyed by file name:
//!
//! ```text
//! {
//!   "notes.txt": { "original_path": "/home/u/proj/notes.txt", "expires": 1700604800 }
//! }
//! ```
//!
//! Document order is insertion order, which is also the listing order.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TrashError;

/// How long a yeeted file is held before the sweep deletes it.
pub const RETENTION_SECS: i64 = 60 * 60 * 24 * 7;

/// One held file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashRecord {
    /// Base name of the file when it was yeeted; the key in the store.
    pub name: String,
    /// Absolute path the file was moved from.
    pub original_path: PathBuf,
    /// UTC seconds since epoch at which the record expires.
    pub expires_at: i64,
}

impl TrashRecord {
    /// Record for a file yeeted at `yeeted_at`.
    #[must_use]
    pub fn new(name: impl Into<String>, original_path: impl Into<PathBuf>, yeeted_at: i64) -> Self {
        Self {
            name: name.into(),
            original_path: original_path.into(),
            expires_at: yeeted_at.saturating_add(RETENTION_SECS),
        }
    }

    /// A record expires at exactly its `expires_at` second.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// Whether `name` can key a record.
///
/// A key is exactly one normal path component, so `<holding_dir>/<name>`
/// always names an entry directly inside the holding directory. Empty
/// names, `.`/`..`, separators and absolute paths are all rejected.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part == OsStr::new(name),
        _ => false,
    }
}

/// All records of a store, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<TrashRecord>,
}

impl RecordSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TrashRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append a record. An existing name is never overwritten.
    pub fn insert(&mut self, record: TrashRecord) -> Result<(), TrashError> {
        if !is_valid_name(&record.name) {
            return Err(TrashError::InvalidName(record.name));
        }
        if self.contains(&record.name) {
            return Err(TrashError::AlreadyTracked(record.name));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<TrashRecord> {
        let idx = self.records.iter().position(|r| r.name == name)?;
        Some(self.records.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrashRecord> {
        self.records.iter()
    }

    /// Remove and return every record expired at `now`.
    ///
    /// Both the returned records and the ones left behind keep their
    /// relative order.
    pub fn split_expired(&mut self, now: i64) -> Vec<TrashRecord> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| r.is_expired(now));
        self.records = kept;
        expired
    }

    /// Insert or replace by name, keeping the position of an existing entry.
    fn upsert(&mut self, record: TrashRecord) {
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a TrashRecord;
    type IntoIter = std::slice::Iter<'a, TrashRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Serialize)]
struct EntryRef<'a> {
    original_path: &'a Path,
    expires: i64,
}

#[derive(Deserialize)]
struct Entry {
    #[serde(alias = "path")]
    original_path: PathBuf,
    #[serde(deserialize_with = "deserialize_expires")]
    expires: i64,
}

impl Serialize for RecordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(
                &record.name,
                &EntryRef {
                    original_path: &record.original_path,
                    expires: record.expires_at,
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RecordSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordSetVisitor;

        impl<'de> Visitor<'de> for RecordSetVisitor {
            type Value = RecordSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of yeeted file names to records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RecordSet, A::Error> {
                let mut set = RecordSet::new();
                while let Some((name, entry)) = access.next_entry::<String, Entry>()? {
                    if !is_valid_name(&name) {
                        return Err(de::Error::custom(format!(
                            "record name {name:?} is not a plain file name"
                        )));
                    }
                    set.upsert(TrashRecord {
                        name,
                        original_path: entry.original_path,
                        expires_at: entry.expires,
                    });
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(RecordSetVisitor)
    }
}

/// Older stores wrote fractional seconds; round those up so a record never
/// expires before the time that was written.
fn deserialize_expires<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    struct ExpiresVisitor;

    impl Visitor<'_> for ExpiresVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an expiry timestamp in seconds")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            Ok(i64::try_from(v).unwrap_or(i64::MAX))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() {
                Ok(v.ceil() as i64)
            } else {
                Err(E::custom("expiry timestamp is not finite"))
            }
        }
    }

    deserializer.deserialize_any(ExpiresVisitor)
}
