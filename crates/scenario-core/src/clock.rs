//! Wall-clock time for save receipts, event timestamps and UUIDv7 ids.

use chrono::{DateTime, Utc};

/// Source of the current time. Tests pin it with a fixed clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads `Utc::now`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
