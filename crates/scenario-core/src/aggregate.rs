//! Event-recording aggregates.
//!
//! A playback session is the one aggregate in the engine: every learner
//! choice and transition is recorded as an event, and replaying those events
//! through `apply` rebuilds the session.

use uuid::Uuid;

use crate::event::DomainEvent;

/// A state machine whose changes are recorded as events.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Number of events applied so far.
    fn version(&self) -> i64;

    /// Folds one recorded event into the state.
    fn apply(&mut self, event: &Self::Event);

    /// Events recorded since the host last collected them.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Forgets collected events. Hosts call this after logging them so a long
    /// or looping session does not accumulate history.
    fn clear_uncommitted_events(&mut self);
}
