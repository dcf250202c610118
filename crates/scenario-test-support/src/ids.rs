//! Test ids — deterministic `IdGenerator` implementation for tests.

use scenario_core::id::IdGenerator;

/// Returns `"<prefix>-1"`, `"<prefix>-2"`, … in order.
#[derive(Debug, Clone)]
pub struct SequenceIds {
    prefix: String,
    next: u64,
}

impl SequenceIds {
    /// Create a new generator whose ids start with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequenceIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
