//! yeet-core: Core library for yeet
//!
//! `yeet` moves files into a holding bin, remembers where they came from,
//! and deletes them for good once they have sat there for seven days.
//!
//! # Architecture
//!
//! ```text
//! CLI → open bin (initialize) → sweep expired → yeet | restore | list | empty
//!                                    ↓                ↓
//!                              Record Store  ←→  holding directory
//! ```
//!
//! # Modules
//!
//! - `record`: typed records and the JSON document shape
//! - `store`: load/save of the record document
//! - `layout`: where the bin lives on disk
//! - `sweep`: expiry sweep run before every operation
//! - `trash`: yeet, restore and empty
//! - `listing`: human-readable rendering
//! - `fsops`: move/delete primitives that never follow symlinks
//! - `clock`: injectable time source
//! - `config`: `yeet.toml` loading
//! - `logging`: tracing subscriber setup
//!
//! # Safety
//!
//! This crate forbids unsafe code.

#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod error;
pub mod fsops;
pub mod layout;
pub mod listing;
pub mod logging;
pub mod record;
pub mod store;
pub mod sweep;
pub mod trash;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{ConfigError, Error, Remediation, Result, StoreError, TrashError};
pub use layout::BinLayout;
pub use record::{RETENTION_SECS, RecordSet, TrashRecord};
pub use store::RecordStore;
pub use sweep::{SweepReport, sweep_expired};
pub use trash::{EmptyOutcome, RestoreOutcome, TrashBin, YeetOutcome};

/// Version string (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
