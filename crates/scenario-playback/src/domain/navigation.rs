//! The Navigation Engine: a pure transition function over the scenario graph.
//!
//! Implicit edges run beat-to-beat and scene-to-scene; explicit edges are
//! `specific-content` jumps resolved through the [`BeatIndex`]. Jumps may form
//! cycles; revisiting a beat is valid scenario design.

use scenario_core::error::DomainError;
use scenario_document::domain::model::{Beat, NextAction, Response, Scenario};
use scenario_document::domain::position::{BeatIndex, Position};
use serde::Serialize;

/// The playback cursor: a beat position, or the terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum Cursor {
    At(Position),
    Complete,
}

/// Where playback begins: the first beat of the first scene that has one.
///
/// For any document satisfying the one-beat-per-scene invariant this is
/// `{0, 0}`. Returns `None` for a document with no beats.
#[must_use]
pub fn initial_position(index: &BeatIndex) -> Option<Position> {
    first_beat_from(index, 0)
}

/// First beat at or after scene `scene_index`, skipping empty scenes.
fn first_beat_from(index: &BeatIndex, scene_index: usize) -> Option<Position> {
    (scene_index..index.scene_count())
        .find(|&s| index.scene_len(s).is_some_and(|len| len > 0))
        .map(|s| Position::new(s, 0))
}

fn next_scene(index: &BeatIndex, position: Position) -> Cursor {
    first_beat_from(index, position.scene_index + 1).map_or(Cursor::Complete, Cursor::At)
}

/// Computes where `response`, chosen at `position`, leads.
///
/// # Errors
///
/// Returns `DomainError::InvalidPlaybackState` if `position` does not address
/// a beat, and `DomainError::MissingJumpTarget` if a `specific-content`
/// response has no resolvable target.
pub fn advance(
    index: &BeatIndex,
    position: Position,
    response: &Response,
) -> Result<Cursor, DomainError> {
    let Some(scene_len) = index
        .scene_len(position.scene_index)
        .filter(|&len| position.beat_index < len)
    else {
        return Err(DomainError::InvalidPlaybackState(format!(
            "no beat at scene {} beat {}",
            position.scene_index, position.beat_index
        )));
    };

    match response.next_action {
        NextAction::NextContent => {
            if position.beat_index + 1 < scene_len {
                Ok(Cursor::At(Position::new(
                    position.scene_index,
                    position.beat_index + 1,
                )))
            } else {
                Ok(next_scene(index, position))
            }
        }
        NextAction::NextScene => Ok(next_scene(index, position)),
        NextAction::SpecificContent => response
            .next_content_id
            .as_ref()
            .and_then(|target| index.position_of(target))
            .map(Cursor::At)
            .ok_or_else(|| DomainError::MissingJumpTarget {
                beat_id: format!("scene {} beat {}", position.scene_index, position.beat_index),
                response_id: response.id.to_string(),
                target: response
                    .next_content_id
                    .as_ref()
                    .map_or_else(|| "<unset>".to_owned(), ToString::to_string),
            }),
        NextAction::EndScenario => Ok(Cursor::Complete),
    }
}

/// The beat at `position`, if any.
#[must_use]
pub fn beat_at(document: &Scenario, position: Position) -> Option<&Beat> {
    document
        .scenes
        .get(position.scene_index)?
        .beats
        .get(position.beat_index)
}
