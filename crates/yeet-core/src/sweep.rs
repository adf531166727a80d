//! Expiry sweep.
//!
//! Runs before every requested operation. Expired records are dropped and
//! their held entries deleted; the store is written back once at the end.

use crate::error::Result;
use crate::fsops;
use crate::layout::BinLayout;

/// Result of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Names whose records were dropped, in store order.
    pub expired: Vec<String>,
    /// Names whose held entry could not be deleted. The record is dropped
    /// regardless.
    pub removal_failures: Vec<String>,
}

impl SweepReport {
    /// Whether any record expired.
    #[must_use]
    pub fn any_expired(&self) -> bool {
        !self.expired.is_empty()
    }
}

/// Drop every record with `expires_at <= now` and delete its held entry.
pub fn sweep_expired(layout: &BinLayout, now: i64) -> Result<SweepReport> {
    let store = layout.store();
    let mut records = store.load()?;
    let expired = records.split_expired(now);

    let mut report = SweepReport::default();
    for record in expired {
        let held = layout.held_path(&record.name);
        match fsops::remove_entry(&held) {
            Ok(true) => {}
            Ok(false) => tracing::debug!(
                name = %record.name,
                path = %held.display(),
                "Expired entry was already gone"
            ),
            Err(e) => {
                tracing::warn!(
                    name = %record.name,
                    path = %held.display(),
                    error = %e,
                    "Failed to remove expired entry"
                );
                report.removal_failures.push(record.name.clone());
            }
        }
        report.expired.push(record.name);
    }

    store.save(&records)?;

    if report.any_expired() {
        tracing::info!(
            expired = report.expired.len(),
            remaining = records.len(),
            now,
            "Swept expired records"
        );
    }

    Ok(report)
}
