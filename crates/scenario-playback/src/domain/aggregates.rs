//! Aggregate root for a learner's playback session.

use std::collections::BTreeSet;

use scenario_core::aggregate::AggregateRoot;
use scenario_core::clock::Clock;
use scenario_core::error::DomainError;
use scenario_core::event::EventMetadata;
use scenario_document::domain::ids::ResponseId;
use scenario_document::domain::model::{Beat, Scenario};
use scenario_document::domain::position::{BeatIndex, Position};
use serde::Serialize;
use uuid::Uuid;

use super::events::{
    BeatEntered, PlaybackEvent, PlaybackEventKind, PlaybackRestarted, PlaybackStarted,
    ResponseSelected, ScenarioCompleted,
};
use super::navigation::{Cursor, advance, beat_at, initial_position};
use super::progress::progress_ratio;

/// Playback phase state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    NotStarted,
    /// A beat is shown and waits for a choice.
    Presenting,
    /// A choice is held visible until the feedback pause ends.
    AwaitingFeedback,
    Complete,
}

/// The aggregate root for a playback session.
///
/// Events are applied as soon as they are recorded, so the in-memory state is
/// always current; `uncommitted_events` holds them until an observer drains
/// them.
#[derive(Debug)]
pub struct PlaybackSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) phase: PlaybackPhase,
    /// `None` before start and once complete.
    pub(crate) cursor: Option<Position>,
    /// Response held during the feedback pause.
    pub(crate) selected: Option<ResponseId>,
    /// Distinct beats shown since the last (re)start.
    pub(crate) visited: BTreeSet<Position>,
    /// Events not yet drained by an observer.
    uncommitted_events: Vec<PlaybackEvent>,
}

impl PlaybackSession {
    /// Creates a new, not yet started, playback session.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            phase: PlaybackPhase::NotStarted,
            cursor: None,
            selected: None,
            visited: BTreeSet::new(),
            uncommitted_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// The playback cursor.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        match (self.phase, self.cursor) {
            (PlaybackPhase::Complete, _) | (_, None) => Cursor::Complete,
            (_, Some(position)) => Cursor::At(position),
        }
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.cursor
    }

    #[must_use]
    pub fn selected_response(&self) -> Option<&ResponseId> {
        self.selected.as_ref()
    }

    /// Number of distinct beats shown since the last (re)start.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Progress through a document of `total_beats` beats.
    #[must_use]
    pub fn progress(&self, total_beats: usize) -> f64 {
        progress_ratio(
            self.visited.len(),
            total_beats,
            self.phase == PlaybackPhase::Complete,
        )
    }

    fn record(&mut self, kind: PlaybackEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = PlaybackEvent {
            metadata: EventMetadata::next(
                kind.event_type(),
                self.id,
                self.version,
                correlation_id,
                clock.now(),
            ),
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    fn current_beat<'a>(&self, document: &'a Scenario) -> Result<&'a Beat, DomainError> {
        self.cursor
            .and_then(|position| beat_at(document, position))
            .ok_or_else(|| {
                DomainError::InvalidPlaybackState("cursor does not address a beat".to_owned())
            })
    }

    /// Starts playback at the first beat, producing a `PlaybackStarted` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPlaybackState` if already started and
    /// `DomainError::NotPlayable` if the document has no beats.
    pub fn start(
        &mut self,
        document: &Scenario,
        index: &BeatIndex,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase != PlaybackPhase::NotStarted {
            return Err(DomainError::InvalidPlaybackState(
                "playback has already started".to_owned(),
            ));
        }
        let (position, beat) = first_beat(document, index)?;
        self.record(
            PlaybackEventKind::PlaybackStarted(PlaybackStarted {
                session_id: self.id,
                beat_id: beat.id.clone(),
                position,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Holds a response of the current beat, producing a `ResponseSelected`
    /// event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPlaybackState` unless a beat is being
    /// presented (not before start, not during a pending feedback pause, not
    /// after completion). Returns `DomainError::NotFound` if the current beat
    /// has no such response.
    pub fn select_response(
        &mut self,
        document: &Scenario,
        response_id: &ResponseId,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase != PlaybackPhase::Presenting {
            let phase = self.phase;
            return Err(DomainError::InvalidPlaybackState(format!(
                "cannot select a response while {phase:?}"
            )));
        }
        let beat = self.current_beat(document)?;
        if beat.response(response_id).is_none() {
            return Err(DomainError::not_found("response", response_id.as_str()));
        }
        self.record(
            PlaybackEventKind::ResponseSelected(ResponseSelected {
                session_id: self.id,
                beat_id: beat.id.clone(),
                response_id: response_id.clone(),
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Applies the held response once the feedback pause ends, producing a
    /// `BeatEntered` or `ScenarioCompleted` event. Returns the new cursor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPlaybackState` if no response is held and
    /// `DomainError::MissingJumpTarget` if the held response jumps to a beat
    /// that does not exist (the session stays paused on the current beat).
    pub fn complete_transition(
        &mut self,
        document: &Scenario,
        index: &BeatIndex,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Cursor, DomainError> {
        if self.phase != PlaybackPhase::AwaitingFeedback {
            return Err(DomainError::InvalidPlaybackState(
                "no response is awaiting its transition".to_owned(),
            ));
        }
        let (Some(position), Some(selected)) = (self.cursor, self.selected.clone()) else {
            return Err(DomainError::InvalidPlaybackState(
                "awaiting feedback without a held response".to_owned(),
            ));
        };
        let beat = self.current_beat(document)?;
        let response = beat
            .response(&selected)
            .ok_or_else(|| DomainError::not_found("response", selected.as_str()))?;

        let next = advance(index, position, response).map_err(|err| match err {
            DomainError::MissingJumpTarget {
                response_id,
                target,
                ..
            } => DomainError::MissingJumpTarget {
                beat_id: beat.id.to_string(),
                response_id,
                target,
            },
            other => other,
        })?;

        let kind = match next {
            Cursor::At(next_position) => {
                let entered = beat_at(document, next_position).ok_or_else(|| {
                    DomainError::InvalidPlaybackState("transition left the document".to_owned())
                })?;
                PlaybackEventKind::BeatEntered(BeatEntered {
                    session_id: self.id,
                    beat_id: entered.id.clone(),
                    position: next_position,
                })
            }
            Cursor::Complete => PlaybackEventKind::ScenarioCompleted(ScenarioCompleted {
                session_id: self.id,
                last_beat_id: beat.id.clone(),
            }),
        };
        self.record(kind, correlation_id, clock);
        Ok(next)
    }

    /// Returns to the first beat and forgets visited beats, producing a
    /// `PlaybackRestarted` event. Any held response is dropped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPlaybackState` if playback never started.
    pub fn restart(
        &mut self,
        document: &Scenario,
        index: &BeatIndex,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase == PlaybackPhase::NotStarted {
            return Err(DomainError::InvalidPlaybackState(
                "cannot restart before starting".to_owned(),
            ));
        }
        let (position, beat) = first_beat(document, index)?;
        self.record(
            PlaybackEventKind::PlaybackRestarted(PlaybackRestarted {
                session_id: self.id,
                beat_id: beat.id.clone(),
                position,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Hands the recorded events to the caller.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

fn first_beat<'a>(
    document: &'a Scenario,
    index: &BeatIndex,
) -> Result<(Position, &'a Beat), DomainError> {
    initial_position(index)
        .and_then(|position| beat_at(document, position).map(|beat| (position, beat)))
        .ok_or_else(|| DomainError::NotPlayable("scenario has no beats".to_owned()))
}

impl AggregateRoot for PlaybackSession {
    type Event = PlaybackEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            PlaybackEventKind::PlaybackStarted(payload) => {
                self.phase = PlaybackPhase::Presenting;
                self.cursor = Some(payload.position);
                self.selected = None;
                self.visited.insert(payload.position);
            }
            PlaybackEventKind::ResponseSelected(payload) => {
                self.phase = PlaybackPhase::AwaitingFeedback;
                self.selected = Some(payload.response_id.clone());
            }
            PlaybackEventKind::BeatEntered(payload) => {
                self.phase = PlaybackPhase::Presenting;
                self.cursor = Some(payload.position);
                self.selected = None;
                self.visited.insert(payload.position);
            }
            PlaybackEventKind::ScenarioCompleted(_) => {
                self.phase = PlaybackPhase::Complete;
                self.cursor = None;
                self.selected = None;
            }
            PlaybackEventKind::PlaybackRestarted(payload) => {
                self.phase = PlaybackPhase::Presenting;
                self.cursor = Some(payload.position);
                self.selected = None;
                self.visited.clear();
                self.visited.insert(payload.position);
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::event::DomainEvent;
    use scenario_document::domain::ids::BeatId;
    use scenario_document::domain::model::NextAction;
    use scenario_test_support::{FixedClock, SequenceIds};

    use crate::domain::events::{
        BEAT_ENTERED_EVENT_TYPE, PLAYBACK_RESTARTED_EVENT_TYPE, PLAYBACK_STARTED_EVENT_TYPE,
        RESPONSE_SELECTED_EVENT_TYPE, SCENARIO_COMPLETED_EVENT_TYPE,
    };

    /// Two beats in one scene; each beat has one `next-content` response.
    fn document() -> Scenario {
        let mut ids = SequenceIds::new("id");
        let mut document = Scenario::starter("t", &mut ids);
        let beat = scenario_document::domain::factory::create_beat(&document.scenes[0], &mut ids);
        document.scenes[0].push_beat(beat);
        document
    }

    fn first_response(document: &Scenario, position: Position) -> ResponseId {
        beat_at(document, position).unwrap().responses[0].id.clone()
    }

    fn started(document: &Scenario, index: &BeatIndex) -> PlaybackSession {
        let mut session = PlaybackSession::new(Uuid::new_v4());
        session
            .start(document, index, Uuid::new_v4(), &FixedClock::standard())
            .unwrap();
        session
    }

    #[test]
    fn test_start_produces_playback_started_event() {
        // Arrange
        let document = document();
        let index = BeatIndex::build(&document);
        let session_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock::standard();
        let mut session = PlaybackSession::new(session_id);

        // Act
        session.start(&document, &index, correlation_id, &clock).unwrap();

        // Assert
        let events = session.uncommitted_events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.event_type(), PLAYBACK_STARTED_EVENT_TYPE);
        let meta = event.metadata();
        assert_eq!(meta.aggregate_id, session_id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, clock.0);
        assert_eq!(session.cursor(), Cursor::At(Position::START));
        assert_eq!(session.phase(), PlaybackPhase::Presenting);
        assert_eq!(session.visited_count(), 1);
    }

    #[test]
    fn test_start_twice_returns_error() {
        let document = document();
        let index = BeatIndex::build(&document);
        let mut session = started(&document, &index);

        let result = session.start(&document, &index, Uuid::new_v4(), &FixedClock::standard());

        match result.unwrap_err() {
            DomainError::InvalidPlaybackState(msg) => {
                assert_eq!(msg, "playback has already started");
            }
            other => panic!("expected InvalidPlaybackState, got {other:?}"),
        }
    }

    #[test]
    fn test_start_on_empty_document_returns_not_playable() {
        let document = Scenario::new("empty");
        let index = BeatIndex::build(&document);
        let mut session = PlaybackSession::new(Uuid::new_v4());

        let result = session.start(&document, &index, Uuid::new_v4(), &FixedClock::standard());

        assert!(matches!(result, Err(DomainError::NotPlayable(_))));
        assert_eq!(session.phase(), PlaybackPhase::NotStarted);
    }

    #[test]
    fn test_select_then_complete_transition_moves_cursor() {
        // Arrange
        let document = document();
        let index = BeatIndex::build(&document);
        let clock = FixedClock::standard();
        let mut session = started(&document, &index);
        let response_id = first_response(&document, Position::START);
        let correlation_id = Uuid::new_v4();

        // Act
        session
            .select_response(&document, &response_id, correlation_id, &clock)
            .unwrap();
        let held = session.selected_response().cloned();
        let cursor = session
            .complete_transition(&document, &index, correlation_id, &clock)
            .unwrap();

        // Assert
        assert_eq!(held, Some(response_id));
        assert_eq!(cursor, Cursor::At(Position::new(0, 1)));
        assert_eq!(session.phase(), PlaybackPhase::Presenting);
        assert!(session.selected_response().is_none());
        let types: Vec<&str> = session
            .uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect();
        assert_eq!(
            types,
            vec![
                PLAYBACK_STARTED_EVENT_TYPE,
                RESPONSE_SELECTED_EVENT_TYPE,
                BEAT_ENTERED_EVENT_TYPE
            ]
        );
        let sequence: Vec<i64> = session
            .uncommitted_events()
            .iter()
            .map(|e| e.metadata().sequence_number)
            .collect();
        assert_eq!(sequence, vec![1, 2, 3]);
    }

    #[test]
    fn test_second_selection_during_feedback_is_rejected() {
        let document = document();
        let index = BeatIndex::build(&document);
        let clock = FixedClock::standard();
        let mut session = started(&document, &index);
        let response_id = first_response(&document, Position::START);
        session
            .select_response(&document, &response_id, Uuid::new_v4(), &clock)
            .unwrap();

        let result = session.select_response(&document, &response_id, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::InvalidPlaybackState(_))));
    }

    #[test]
    fn test_select_unknown_response_returns_not_found() {
        let document = document();
        let index = BeatIndex::build(&document);
        let mut session = started(&document, &index);

        let result = session.select_response(
            &document,
            &ResponseId::from("ghost"),
            Uuid::new_v4(),
            &FixedClock::standard(),
        );

        match result.unwrap_err() {
            DomainError::NotFound { kind, id } => {
                assert_eq!(kind, "response");
                assert_eq!(id, "ghost");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_transition_without_selection_returns_error() {
        let document = document();
        let index = BeatIndex::build(&document);
        let mut session = started(&document, &index);

        let result =
            session.complete_transition(&document, &index, Uuid::new_v4(), &FixedClock::standard());

        assert!(matches!(result, Err(DomainError::InvalidPlaybackState(_))));
    }

    #[test]
    fn test_end_scenario_completes_and_reports_full_progress() {
        // Arrange
        let mut document = document();
        document.scenes[0].beats[0].responses[0].next_action = NextAction::EndScenario;
        let index = BeatIndex::build(&document);
        let clock = FixedClock::standard();
        let mut session = started(&document, &index);
        let response_id = first_response(&document, Position::START);

        // Act
        session
            .select_response(&document, &response_id, Uuid::new_v4(), &clock)
            .unwrap();
        let cursor = session
            .complete_transition(&document, &index, Uuid::new_v4(), &clock)
            .unwrap();

        // Assert
        assert_eq!(cursor, Cursor::Complete);
        assert_eq!(session.cursor(), Cursor::Complete);
        assert_eq!(session.phase(), PlaybackPhase::Complete);
        assert!((session.progress(index.total_beats()) - 1.0).abs() < f64::EPSILON);
        let last = session.uncommitted_events().last().unwrap();
        assert_eq!(last.event_type(), SCENARIO_COMPLETED_EVENT_TYPE);
    }

    #[test]
    fn test_dangling_jump_surfaces_error_with_beat_id() {
        let mut document = document();
        let response = &mut document.scenes[0].beats[0].responses[0];
        response.next_action = NextAction::SpecificContent;
        response.next_content_id = Some(BeatId::from("gone"));
        let beat_id = document.scenes[0].beats[0].id.to_string();
        let index = BeatIndex::build(&document);
        let clock = FixedClock::standard();
        let mut session = started(&document, &index);
        let response_id = first_response(&document, Position::START);
        session
            .select_response(&document, &response_id, Uuid::new_v4(), &clock)
            .unwrap();

        let result = session.complete_transition(&document, &index, Uuid::new_v4(), &clock);

        match result.unwrap_err() {
            DomainError::MissingJumpTarget {
                beat_id: reported,
                target,
                ..
            } => {
                assert_eq!(reported, beat_id);
                assert_eq!(target, "gone");
            }
            other => panic!("expected MissingJumpTarget, got {other:?}"),
        }
        assert_eq!(session.phase(), PlaybackPhase::AwaitingFeedback);
    }

    #[test]
    fn test_restart_clears_visited_and_returns_to_start() {
        // Arrange
        let document = document();
        let index = BeatIndex::build(&document);
        let clock = FixedClock::standard();
        let mut session = started(&document, &index);
        let response_id = first_response(&document, Position::START);
        session
            .select_response(&document, &response_id, Uuid::new_v4(), &clock)
            .unwrap();
        session
            .complete_transition(&document, &index, Uuid::new_v4(), &clock)
            .unwrap();
        assert_eq!(session.visited_count(), 2);

        // Act
        session
            .restart(&document, &index, Uuid::new_v4(), &clock)
            .unwrap();

        // Assert
        assert_eq!(session.cursor(), Cursor::At(Position::START));
        assert_eq!(session.visited_count(), 1);
        let last = session.uncommitted_events().last().unwrap();
        assert_eq!(last.event_type(), PLAYBACK_RESTARTED_EVENT_TYPE);
    }

    #[test]
    fn test_restart_before_start_returns_error() {
        let document = document();
        let index = BeatIndex::build(&document);
        let mut session = PlaybackSession::new(Uuid::new_v4());

        let result = session.restart(&document, &index, Uuid::new_v4(), &FixedClock::standard());

        assert!(matches!(result, Err(DomainError::InvalidPlaybackState(_))));
    }

    #[test]
    fn test_apply_replays_recorded_history() {
        // Arrange
        let document = document();
        let index = BeatIndex::build(&document);
        let clock = FixedClock::standard();
        let mut live = started(&document, &index);
        let response_id = first_response(&document, Position::START);
        live.select_response(&document, &response_id, Uuid::new_v4(), &clock)
            .unwrap();
        live.complete_transition(&document, &index, Uuid::new_v4(), &clock)
            .unwrap();

        // Act
        let mut replayed = PlaybackSession::new(live.id);
        for event in live.uncommitted_events() {
            replayed.apply(event);
        }

        // Assert
        assert_eq!(replayed.version(), live.version());
        assert_eq!(replayed.cursor(), live.cursor());
        assert_eq!(replayed.visited_count(), live.visited_count());
    }

    #[test]
    fn test_drain_events_empties_buffer() {
        let document = document();
        let index = BeatIndex::build(&document);
        let mut session = started(&document, &index);

        let drained = session.drain_events();

        assert_eq!(drained.len(), 1);
        assert!(session.uncommitted_events().is_empty());
    }
}
