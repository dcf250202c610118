//! Id generation abstraction for determinism.
//!
//! Scenes, beats and responses receive fresh ids at creation time. In
//! production the ids are timestamp-derived UUIDv7 values read through the
//! injected [`Clock`]; tests inject a sequential generator.

use std::sync::Arc;

use uuid::{NoContext, Timestamp, Uuid};

use crate::clock::Clock;

/// Source of fresh entity ids.
pub trait IdGenerator: Send + Sync {
    /// Returns an id that has not been returned before by this generator.
    fn next_id(&mut self) -> String;
}

/// Timestamp-derived ids (UUIDv7) built from the injected clock.
///
/// The random tail of a v7 UUID keeps ids unique even when the clock is
/// pinned or two entities are created within the same millisecond.
pub struct TimestampIdGenerator {
    clock: Arc<dyn Clock>,
}

impl TimestampIdGenerator {
    /// Creates a generator reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl std::fmt::Debug for TimestampIdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimestampIdGenerator").finish_non_exhaustive()
    }
}

impl IdGenerator for TimestampIdGenerator {
    #[allow(clippy::cast_sign_loss)]
    fn next_id(&mut self) -> String {
        let now = self.clock.now();
        let seconds = now.timestamp().max(0) as u64;
        let ts = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());
        Uuid::new_v7(ts).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use std::collections::HashSet;

    #[test]
    fn test_timestamp_ids_are_unique() {
        let mut ids = TimestampIdGenerator::new(Arc::new(SystemClock));

        let generated: HashSet<String> = (0..100).map(|_| ids.next_id()).collect();

        assert_eq!(generated.len(), 100);
    }

    #[test]
    fn test_timestamp_ids_are_version_7() {
        let mut ids = TimestampIdGenerator::new(Arc::new(SystemClock));

        let id = Uuid::parse_str(&ids.next_id()).unwrap();

        assert_eq!(id.get_version_num(), 7);
    }
}
