//! Time source for expiry decisions.
//!
//! An invocation reads the clock once and threads the value through the
//! sweep and the requested operation, so every comparison in a run sees the
//! same "now".

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of UTC seconds since the Unix epoch.
pub trait Clock {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64)
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
