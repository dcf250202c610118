//! Playability checks.
//!
//! Authoring never blocks on these; they run when a document is saved and
//! again before playback starts.

use scenario_core::error::DomainError;

use super::ids::{BeatId, ResponseId};
use super::model::{NextAction, Scenario};
use super::position::BeatIndex;

/// A `specific-content` response whose target is missing or unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingJump {
    pub beat_id: BeatId,
    pub response_id: ResponseId,
    /// `None` when the author picked `specific-content` but no target.
    pub target: Option<BeatId>,
}

impl From<DanglingJump> for DomainError {
    fn from(jump: DanglingJump) -> Self {
        Self::MissingJumpTarget {
            beat_id: jump.beat_id.to_string(),
            response_id: jump.response_id.to_string(),
            target: jump
                .target
                .map_or_else(|| "<unset>".to_owned(), |t| t.to_string()),
        }
    }
}

/// At least one scene and at least one beat overall.
#[must_use]
pub fn is_playable(scenario: &Scenario) -> bool {
    !scenario.scenes.is_empty() && scenario.total_beats() > 0
}

/// Beats a learner could never leave: they offer no response at all.
#[must_use]
pub fn beats_without_responses(scenario: &Scenario) -> Vec<BeatId> {
    scenario
        .beats_in_order()
        .filter(|beat| beat.responses.is_empty())
        .map(|beat| beat.id.clone())
        .collect()
}

/// Every `specific-content` response whose target does not resolve.
#[must_use]
pub fn validate_jump_targets(scenario: &Scenario) -> Vec<DanglingJump> {
    let index = BeatIndex::build(scenario);
    let mut dangling = Vec::new();
    for beat in scenario.beats_in_order() {
        for response in &beat.responses {
            if response.next_action != NextAction::SpecificContent {
                continue;
            }
            let resolves = response
                .next_content_id
                .as_ref()
                .is_some_and(|target| index.contains(target));
            if !resolves {
                dangling.push(DanglingJump {
                    beat_id: beat.id.clone(),
                    response_id: response.id.clone(),
                    target: response.next_content_id.clone(),
                });
            }
        }
    }
    dangling
}

/// Checks the document can enter playback.
///
/// # Errors
///
/// Returns `DomainError::NotPlayable` for a document without scenes or beats
/// or with a beat that has no responses, and `DomainError::MissingJumpTarget`
/// for the first dangling jump.
pub fn check_playable(scenario: &Scenario) -> Result<(), DomainError> {
    if scenario.scenes.is_empty() {
        return Err(DomainError::NotPlayable("scenario has no scenes".to_owned()));
    }
    if scenario.total_beats() == 0 {
        return Err(DomainError::NotPlayable("scenario has no beats".to_owned()));
    }
    if let Some(beat_id) = beats_without_responses(scenario).first() {
        return Err(DomainError::NotPlayable(format!("beat {beat_id} has no responses")));
    }
    check_jump_targets(scenario)
}

/// Checks that every jump target resolves.
///
/// # Errors
///
/// Returns `DomainError::MissingJumpTarget` for the first dangling jump.
pub fn check_jump_targets(scenario: &Scenario) -> Result<(), DomainError> {
    match validate_jump_targets(scenario).into_iter().next() {
        Some(jump) => Err(jump.into()),
        None => Ok(()),
    }
}
