//! Query handlers for the Playback Shell.
//!
//! Builds the read-only view DTO a front end renders for the current cursor.

use scenario_document::domain::ids::{BeatId, ResponseId};
use scenario_document::domain::model::{AvatarExpression, Scenario};
use serde::Serialize;

use crate::domain::aggregates::{PlaybackPhase, PlaybackSession};
use crate::domain::navigation::{Cursor, beat_at};
use crate::domain::progress::progress_percent;

/// One selectable response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseView {
    pub response_id: ResponseId,
    pub text: String,
}

/// The beat under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatView {
    pub beat_id: BeatId,
    pub title: String,
    /// Text shown to the learner.
    pub heading: String,
    pub image: Option<String>,
    /// The beat's expression, or the held response's reaction during the
    /// feedback pause.
    pub avatar_expression: AvatarExpression,
    pub responses: Vec<ResponseView>,
    /// Response held during the feedback pause.
    pub selected_response_id: Option<ResponseId>,
}

/// Read-only view of a playback session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackView {
    pub title: String,
    /// Opaque media URL; empty when unset.
    pub background_image: String,
    /// Opaque media URL; empty when unset.
    pub avatar_image: String,
    pub cursor: Cursor,
    /// `None` once the scenario is complete.
    pub beat: Option<BeatView>,
    /// Progress ratio in `[0, 1]`.
    pub progress: f64,
    /// Progress as a whole percentage.
    pub progress_percent: u8,
    pub complete: bool,
    pub awaiting_feedback: bool,
}

/// Builds the view of `session` over `document`.
#[must_use]
pub fn playback_view(document: &Scenario, session: &PlaybackSession) -> PlaybackView {
    let cursor = session.cursor();
    let selected = session.selected_response();

    let beat = match cursor {
        Cursor::At(position) => beat_at(document, position).map(|beat| {
            let held = selected.and_then(|id| beat.response(id));
            BeatView {
                beat_id: beat.id.clone(),
                title: beat.title.clone(),
                heading: beat.heading.clone(),
                image: beat.image.clone(),
                avatar_expression: held
                    .map_or(beat.avatar_expression, |response| response.avatar_reaction),
                responses: beat
                    .responses
                    .iter()
                    .map(|response| ResponseView {
                        response_id: response.id.clone(),
                        text: response.text.clone(),
                    })
                    .collect(),
                selected_response_id: held.map(|response| response.id.clone()),
            }
        }),
        Cursor::Complete => None,
    };

    let progress = session.progress(document.total_beats());
    PlaybackView {
        title: document.title.clone(),
        background_image: document.background_image.clone(),
        avatar_image: document.avatar_image.clone(),
        cursor,
        beat,
        progress,
        progress_percent: progress_percent(progress),
        complete: session.phase() == PlaybackPhase::Complete,
        awaiting_feedback: session.phase() == PlaybackPhase::AwaitingFeedback,
    }
}
