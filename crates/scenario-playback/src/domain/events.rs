//! Domain events for playback.

use scenario_core::event::{DomainEvent, EventMetadata};
use scenario_document::domain::ids::{BeatId, ResponseId};
use scenario_document::domain::position::Position;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PLAYBACK_STARTED_EVENT_TYPE: &str = "playback.started";
pub const RESPONSE_SELECTED_EVENT_TYPE: &str = "playback.response_selected";
pub const BEAT_ENTERED_EVENT_TYPE: &str = "playback.beat_entered";
pub const SCENARIO_COMPLETED_EVENT_TYPE: &str = "playback.scenario_completed";
pub const PLAYBACK_RESTARTED_EVENT_TYPE: &str = "playback.restarted";

/// Emitted when a learner starts a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStarted {
    /// The playback session.
    pub session_id: Uuid,
    /// The first beat shown.
    pub beat_id: BeatId,
    pub position: Position,
}

/// Emitted when a learner picks a response; the feedback pause begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSelected {
    /// The playback session.
    pub session_id: Uuid,
    /// The beat the response belongs to.
    pub beat_id: BeatId,
    /// The chosen response.
    pub response_id: ResponseId,
}

/// Emitted when the feedback pause ends and the cursor moves to a beat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatEntered {
    /// The playback session.
    pub session_id: Uuid,
    /// The beat now shown.
    pub beat_id: BeatId,
    pub position: Position,
}

/// Emitted when the cursor reaches the terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioCompleted {
    /// The playback session.
    pub session_id: Uuid,
    /// The beat whose response ended the run.
    pub last_beat_id: BeatId,
}

/// Emitted when the learner restarts from the first beat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackRestarted {
    /// The playback session.
    pub session_id: Uuid,
    /// The first beat shown again.
    pub beat_id: BeatId,
    pub position: Position,
}

/// Event payload variants for playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackEventKind {
    /// Playback has started.
    PlaybackStarted(PlaybackStarted),
    /// A response has been selected.
    ResponseSelected(ResponseSelected),
    /// A beat has been entered.
    BeatEntered(BeatEntered),
    /// The scenario has been completed.
    ScenarioCompleted(ScenarioCompleted),
    /// Playback has been restarted.
    PlaybackRestarted(PlaybackRestarted),
}

impl PlaybackEventKind {
    /// Returns the routing name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PlaybackStarted(_) => PLAYBACK_STARTED_EVENT_TYPE,
            Self::ResponseSelected(_) => RESPONSE_SELECTED_EVENT_TYPE,
            Self::BeatEntered(_) => BEAT_ENTERED_EVENT_TYPE,
            Self::ScenarioCompleted(_) => SCENARIO_COMPLETED_EVENT_TYPE,
            Self::PlaybackRestarted(_) => PLAYBACK_RESTARTED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for playback.
#[derive(Debug, Clone)]
pub struct PlaybackEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaybackEventKind,
}

impl DomainEvent for PlaybackEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("PlaybackEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
