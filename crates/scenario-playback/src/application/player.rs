//! The Playback Shell: owns a document while it is played and drives the
//! playback session through learner choices and feedback pauses.

use std::sync::Arc;
use std::time::Duration;

use scenario_core::clock::Clock;
use scenario_core::error::DomainError;
use scenario_document::domain::ids::ResponseId;
use scenario_document::domain::model::Scenario;
use scenario_document::domain::position::BeatIndex;
use scenario_document::domain::validation::check_playable;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::feedback::{FeedbackTimer, PlaybackMessage};
use crate::application::query_handlers::{PlaybackView, playback_view};
use crate::domain::aggregates::{PlaybackPhase, PlaybackSession};
use crate::domain::events::PlaybackEvent;
use crate::domain::navigation::Cursor;

/// How long a chosen response stays visible before playback moves on.
pub const DEFAULT_FEEDBACK_INTERVAL: Duration = Duration::from_millis(1500);

/// Runtime settings for the playback shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub feedback_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            feedback_interval: DEFAULT_FEEDBACK_INTERVAL,
        }
    }
}

/// A document the shell refused to play, handed back to the caller.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected {
    #[source]
    pub error: DomainError,
    pub document: Scenario,
}

/// Plays one scenario document.
///
/// The shell has exclusive ownership of the document for its lifetime; `close`
/// hands it back. Feedback pauses report through the `PlaybackMessage` channel
/// given to `start`, and the host passes each message to `handle`.
pub struct PlaybackShell {
    document: Scenario,
    index: BeatIndex,
    session: PlaybackSession,
    timer: FeedbackTimer,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PlaybackShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackShell")
            .field("session", &self.session)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl PlaybackShell {
    /// Validates `document` and shows its first beat.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` carrying `DomainError::NotPlayable` for a document
    /// without scenes or beats, or `DomainError::MissingJumpTarget` for one
    /// with a dangling `specific-content` jump. The document is returned
    /// inside the rejection.
    pub fn start(
        document: Scenario,
        config: PlaybackConfig,
        clock: Arc<dyn Clock>,
        messages: UnboundedSender<PlaybackMessage>,
    ) -> Result<Self, Rejected> {
        if let Err(error) = check_playable(&document) {
            warn!(%error, title = %document.title, "playback rejected");
            return Err(Rejected { error, document });
        }

        let index = BeatIndex::build(&document);
        let mut session = PlaybackSession::new(Uuid::new_v4());
        if let Err(error) = session.start(&document, &index, Uuid::new_v4(), clock.as_ref()) {
            warn!(%error, title = %document.title, "playback rejected");
            return Err(Rejected { error, document });
        }

        info!(
            session_id = %session.id,
            title = %document.title,
            total_beats = index.total_beats(),
            "playback started"
        );
        Ok(Self {
            document,
            index,
            session,
            timer: FeedbackTimer::new(config.feedback_interval, messages),
            clock,
        })
    }

    /// The document being played.
    #[must_use]
    pub fn document(&self) -> &Scenario {
        &self.document
    }

    #[must_use]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.session.cursor()
    }

    /// Progress ratio in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.session.progress(self.index.total_beats())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.phase() == PlaybackPhase::Complete
    }

    /// Whether a feedback pause is running.
    #[must_use]
    pub fn is_awaiting_feedback(&self) -> bool {
        self.session.phase() == PlaybackPhase::AwaitingFeedback
    }

    /// What the learner currently sees.
    #[must_use]
    pub fn current_view(&self) -> PlaybackView {
        playback_view(&self.document, &self.session)
    }

    /// Holds `response_id` visible and schedules the feedback pause. Returns
    /// the pause's generation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPlaybackState` while another pause is
    /// pending or after completion, and `DomainError::NotFound` if the current
    /// beat has no such response.
    pub fn select_response(&mut self, response_id: &ResponseId) -> Result<u64, DomainError> {
        self.session.select_response(
            &self.document,
            response_id,
            Uuid::new_v4(),
            self.clock.as_ref(),
        )?;
        let generation = self.timer.schedule();
        debug!(
            session_id = %self.session.id,
            response_id = %response_id,
            generation,
            "feedback pause scheduled"
        );
        Ok(generation)
    }

    /// Handles a message from the feedback timer.
    ///
    /// Returns the new cursor when the message ends the pending pause, or
    /// `None` for a stale message (cancelled or superseded pause), which is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingJumpTarget` if the held response jumps to
    /// a beat that does not exist. The pause then stays pending, so the same
    /// message can be retried; `restart` abandons it.
    pub fn handle(&mut self, message: PlaybackMessage) -> Result<Option<Cursor>, DomainError> {
        match message {
            PlaybackMessage::FeedbackElapsed { generation } => {
                if !self.timer.is_current(generation) {
                    debug!(
                        generation,
                        current = self.timer.generation(),
                        "discarding stale feedback timer"
                    );
                    return Ok(None);
                }
                let cursor = self.session.complete_transition(
                    &self.document,
                    &self.index,
                    Uuid::new_v4(),
                    self.clock.as_ref(),
                )?;
                self.timer.acknowledge();
                match cursor {
                    Cursor::At(position) => debug!(
                        session_id = %self.session.id,
                        scene_index = position.scene_index,
                        beat_index = position.beat_index,
                        "beat entered"
                    ),
                    Cursor::Complete => info!(
                        session_id = %self.session.id,
                        visited = self.session.visited_count(),
                        "scenario completed"
                    ),
                }
                Ok(Some(cursor))
            }
        }
    }

    /// Discards any pending pause and returns to the first beat.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` only if the document has lost every beat, which
    /// cannot happen while the shell owns it.
    pub fn restart(&mut self) -> Result<(), DomainError> {
        self.timer.cancel();
        self.session.restart(
            &self.document,
            &self.index,
            Uuid::new_v4(),
            self.clock.as_ref(),
        )?;
        info!(session_id = %self.session.id, "playback restarted");
        Ok(())
    }

    /// Events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.session.drain_events()
    }

    /// Cancels any pending pause and hands the document back.
    #[must_use]
    pub fn close(mut self) -> Scenario {
        self.timer.cancel();
        info!(session_id = %self.session.id, "playback closed");
        self.document
    }
}
