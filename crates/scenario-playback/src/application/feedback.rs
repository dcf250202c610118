//! The feedback pause: a cancellable timer that posts a message back to the
//! playback shell when the chosen response has been shown long enough.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Messages delivered to the playback shell from outside a learner action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMessage {
    /// The feedback pause numbered `generation` ran to completion.
    FeedbackElapsed { generation: u64 },
}

/// Schedules at most one pending feedback pause at a time.
///
/// Every schedule bumps the generation; a message carrying an older generation
/// is stale and must be ignored by the receiver. Scheduling must happen inside
/// a Tokio runtime.
#[derive(Debug)]
pub struct FeedbackTimer {
    interval: Duration,
    messages: UnboundedSender<PlaybackMessage>,
    generation: u64,
    token: Option<CancellationToken>,
}

impl FeedbackTimer {
    #[must_use]
    pub fn new(interval: Duration, messages: UnboundedSender<PlaybackMessage>) -> Self {
        Self {
            interval,
            messages,
            generation: 0,
            token: None,
        }
    }

    /// Generation of the most recently scheduled pause.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a pause is scheduled and has been neither cancelled nor
    /// acknowledged.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.token.is_some()
    }

    /// Whether `generation` names the pending pause.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_pending() && generation == self.generation
    }

    /// Cancels any pending pause and starts a new one. Returns its generation.
    pub fn schedule(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let messages = self.messages.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            tokio::select! {
                () = cancelled.cancelled() => {
                    debug!(generation, "feedback pause cancelled");
                }
                () = tokio::time::sleep(interval) => {
                    // The receiver may already be gone if the shell was closed.
                    let _ = messages.send(PlaybackMessage::FeedbackElapsed { generation });
                }
            }
        });

        self.token = Some(token);
        generation
    }

    /// Marks the pending pause as delivered without cancelling anything.
    pub fn acknowledge(&mut self) {
        self.token = None;
    }

    /// Cancels the pending pause, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

impl Drop for FeedbackTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
