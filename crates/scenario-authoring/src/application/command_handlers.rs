//! Command handlers for the Authoring Controller.
//!
//! Structural edits are synchronous and total: they take the document and
//! return the edited one. Saving and media attachment talk to external
//! collaborators and therefore return `Result`.

use chrono::{DateTime, Utc};
use scenario_core::clock::Clock;
use scenario_core::command::Command;
use scenario_core::error::DomainError;
use scenario_core::id::IdGenerator;
use scenario_core::media::MediaResolver;
use scenario_core::repository::{DocumentRepository, StoredDocument};
use scenario_document::domain::hash::content_hash;
use scenario_document::domain::model::Scenario;
use scenario_document::domain::validation::check_jump_targets;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::commands::{
    AttachMedia, AuthoringCommand, AuthoringRequest, MediaTarget, SaveScenario,
};
use crate::domain::operations;

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveReceipt {
    /// The content block the scenario was saved under.
    pub document_id: Uuid,
    /// Hex SHA-256 of the saved payload.
    pub version_hash: String,
    /// When the save happened.
    pub saved_at: DateTime<Utc>,
}

/// Applies one structural edit and returns the edited document.
///
/// Never fails: unknown ids leave the document unchanged.
#[must_use]
#[instrument(
    skip_all,
    fields(command_type = request.command_type(), correlation_id = %request.correlation_id)
)]
pub fn handle_authoring_command(
    document: Scenario,
    request: &AuthoringRequest,
    ids: &mut dyn IdGenerator,
) -> Scenario {
    debug!("applying authoring command");
    match &request.command {
        AuthoringCommand::AddScene => operations::add_scene(document, ids),
        AuthoringCommand::RemoveScene { scene_id } => operations::remove_scene(document, scene_id),
        AuthoringCommand::RenameScene { scene_id, title } => {
            operations::rename_scene(document, scene_id, title)
        }
        AuthoringCommand::MoveScene { scene_id, to_index } => {
            operations::move_scene(document, scene_id, *to_index)
        }
        AuthoringCommand::ToggleSceneExpanded { scene_id } => {
            operations::toggle_scene_expanded(document, scene_id)
        }
        AuthoringCommand::AddBeat { scene_id } => operations::add_beat(document, scene_id, ids),
        AuthoringCommand::RemoveBeat { scene_id, beat_id } => {
            operations::remove_beat(document, scene_id, beat_id)
        }
        AuthoringCommand::MoveBeat {
            scene_id,
            beat_id,
            to_index,
        } => operations::move_beat(document, scene_id, beat_id, *to_index),
        AuthoringCommand::UpdateBeat { beat_id, patch } => {
            operations::update_beat(document, beat_id, patch)
        }
        AuthoringCommand::AddResponse { beat_id } => {
            operations::add_response(document, beat_id, ids)
        }
        AuthoringCommand::UpdateResponse {
            beat_id,
            response_id,
            patch,
        } => operations::update_response(document, beat_id, response_id, patch),
        AuthoringCommand::RemoveResponse {
            beat_id,
            response_id,
        } => operations::remove_response(document, beat_id, response_id),
        AuthoringCommand::UpdateScenario { patch } => operations::update_scenario(document, patch),
    }
}

/// Handles the `SaveScenario` command: validates jump targets, serializes the
/// document and hands it to the persistence collaborator.
///
/// # Errors
///
/// Returns `DomainError::MissingJumpTarget` if any `specific-content` response
/// targets a missing beat (the save is rejected and nothing is persisted).
/// Returns `DomainError::Infrastructure` if serialization or the repository fails.
#[instrument(
    skip_all,
    fields(document_id = %command.document_id, correlation_id = %command.correlation_id)
)]
pub async fn handle_save_scenario(
    document: &Scenario,
    command: &SaveScenario,
    clock: &dyn Clock,
    repo: &dyn DocumentRepository,
) -> Result<SaveReceipt, DomainError> {
    if let Err(err) = check_jump_targets(document) {
        warn!(error = %err, "save rejected");
        return Err(err);
    }

    let payload = serde_json::to_value(document)
        .map_err(|e| DomainError::Infrastructure(format!("document serialization failed: {e}")))?;
    let version_hash = content_hash(&payload);
    let saved_at = clock.now();

    let stored = StoredDocument {
        document_id: command.document_id,
        payload,
        version_hash: version_hash.clone(),
        correlation_id: command.correlation_id,
        saved_at,
    };
    repo.save(&stored).await?;

    info!(%version_hash, "scenario saved");

    Ok(SaveReceipt {
        document_id: command.document_id,
        version_hash,
        saved_at,
    })
}

/// Handles the `AttachMedia` command: asks the media collaborator for a URL
/// and stores it verbatim in the targeted field. Returns the URL.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the target beat does not exist (the
/// resolver is not called). Propagates resolver errors unchanged.
#[instrument(
    skip_all,
    fields(file_name = %command.file.file_name, correlation_id = %command.correlation_id)
)]
pub async fn handle_attach_media(
    document: &mut Scenario,
    command: &AttachMedia,
    resolver: &dyn MediaResolver,
) -> Result<String, DomainError> {
    if let MediaTarget::BeatImage(beat_id) = &command.target {
        if !document.contains_beat(beat_id) {
            return Err(DomainError::not_found("beat", beat_id.as_str()));
        }
    }

    let url = resolver.resolve(&command.file).await?;

    match &command.target {
        MediaTarget::Background => document.background_image.clone_from(&url),
        MediaTarget::Avatar => document.avatar_image.clone_from(&url),
        MediaTarget::BeatImage(beat_id) => {
            if let Some(beat) = document.beat_mut(beat_id) {
                beat.image = Some(url.clone());
            }
        }
    }
    debug!("media attached");
    Ok(url)
}
