//! Recorded playback events.
//!
//! Events are not persisted; the host drains them after each step and
//! writes them to the log, keyed by `event_type` and `sequence_number`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope shared by every recorded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: Uuid,
    /// e.g. `playback.beat_entered`.
    pub event_type: String,
    /// The playback session that recorded the event.
    pub aggregate_id: Uuid,
    /// Session version after this event, starting at 1.
    pub sequence_number: i64,
    pub correlation_id: Uuid,
    /// The request that caused the event. Playback events are caused
    /// directly by a learner action, so this equals `correlation_id`.
    pub causation_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Envelope for the event following `version` in session `aggregate_id`,
    /// caused directly by the request `correlation_id`.
    #[must_use]
    pub fn next(
        event_type: &str,
        aggregate_id: Uuid,
        version: i64,
        correlation_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            aggregate_id,
            sequence_number: version + 1,
            correlation_id,
            causation_id: correlation_id,
            occurred_at,
        }
    }
}

/// A recorded event with a JSON payload for the log.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    fn metadata(&self) -> &EventMetadata;
}
