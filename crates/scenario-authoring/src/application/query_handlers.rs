//! Query handlers for the Authoring Controller.
//!
//! Read-only views the editor renders from: the scene/beat outline, the
//! pick-list of jump targets, and reloading a saved document.

use scenario_core::error::DomainError;
use scenario_core::repository::DocumentRepository;
use scenario_document::domain::ids::{BeatId, SceneId};
use scenario_document::domain::model::Scenario;
use serde::Serialize;
use uuid::Uuid;

/// One beat row of the editor outline.
#[derive(Debug, Clone, Serialize)]
pub struct BeatOutline {
    pub beat_id: BeatId,
    pub title: String,
    pub order: usize,
    pub response_count: usize,
}

/// One scene of the editor outline.
#[derive(Debug, Clone, Serialize)]
pub struct SceneOutline {
    pub scene_id: SceneId,
    pub title: String,
    pub order: usize,
    pub expanded: bool,
    pub beats: Vec<BeatOutline>,
}

/// The scene/beat tree shown in the editor sidebar.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutline {
    pub title: String,
    pub total_beats: usize,
    pub scenes: Vec<SceneOutline>,
}

/// An entry of the `specific-content` target pick-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JumpTarget {
    pub beat_id: BeatId,
    /// `"<scene title> › <beat title>"`.
    pub label: String,
}

/// Builds the editor outline.
#[must_use]
pub fn scenario_outline(document: &Scenario) -> ScenarioOutline {
    ScenarioOutline {
        title: document.title.clone(),
        total_beats: document.total_beats(),
        scenes: document
            .scenes
            .iter()
            .map(|scene| SceneOutline {
                scene_id: scene.id.clone(),
                title: scene.title.clone(),
                order: scene.order,
                expanded: scene.expanded,
                beats: scene
                    .beats
                    .iter()
                    .map(|beat| BeatOutline {
                        beat_id: beat.id.clone(),
                        title: beat.title.clone(),
                        order: beat.order,
                        response_count: beat.responses.len(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Every beat a `specific-content` response may target, in scene-then-beat order.
#[must_use]
pub fn jump_targets(document: &Scenario) -> Vec<JumpTarget> {
    document
        .scenes
        .iter()
        .flat_map(|scene| {
            scene.beats.iter().map(move |beat| JumpTarget {
                beat_id: beat.id.clone(),
                label: format!("{} › {}", scene.title, beat.title),
            })
        })
        .collect()
}

/// Reloads the most recently saved document.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if nothing was saved under `document_id`.
/// Returns `DomainError::Infrastructure` if the payload does not deserialize
/// or the repository fails.
pub async fn load_scenario(
    document_id: Uuid,
    repo: &dyn DocumentRepository,
) -> Result<Scenario, DomainError> {
    let stored = repo
        .load(document_id)
        .await?
        .ok_or_else(|| DomainError::not_found("document", document_id.to_string()))?;
    serde_json::from_value(stored.payload)
        .map_err(|e| DomainError::Infrastructure(format!("document deserialization failed: {e}")))
}
