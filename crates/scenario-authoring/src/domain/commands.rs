//! Commands for the Authoring Controller.

use scenario_core::command::Command;
use scenario_core::media::MediaFile;
use scenario_document::domain::ids::{BeatId, ResponseId, SceneId};
use uuid::Uuid;

use super::patches::{BeatPatch, ResponsePatch, ScenarioPatch};

/// A synchronous structural edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthoringCommand {
    AddScene,
    RemoveScene {
        scene_id: SceneId,
    },
    RenameScene {
        scene_id: SceneId,
        title: String,
    },
    MoveScene {
        scene_id: SceneId,
        to_index: usize,
    },
    ToggleSceneExpanded {
        scene_id: SceneId,
    },
    AddBeat {
        scene_id: SceneId,
    },
    RemoveBeat {
        scene_id: SceneId,
        beat_id: BeatId,
    },
    MoveBeat {
        scene_id: SceneId,
        beat_id: BeatId,
        to_index: usize,
    },
    UpdateBeat {
        beat_id: BeatId,
        patch: BeatPatch,
    },
    AddResponse {
        beat_id: BeatId,
    },
    UpdateResponse {
        beat_id: BeatId,
        response_id: ResponseId,
        patch: ResponsePatch,
    },
    RemoveResponse {
        beat_id: BeatId,
        response_id: ResponseId,
    },
    UpdateScenario {
        patch: ScenarioPatch,
    },
}

/// Envelope routing an [`AuthoringCommand`] from the editor.
#[derive(Debug, Clone)]
pub struct AuthoringRequest {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The edit to apply.
    pub command: AuthoringCommand,
}

impl AuthoringRequest {
    /// Wraps `command` with a fresh correlation id.
    #[must_use]
    pub fn new(command: AuthoringCommand) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            command,
        }
    }
}

impl Command for AuthoringRequest {
    fn command_type(&self) -> &'static str {
        match &self.command {
            AuthoringCommand::AddScene => "authoring.add_scene",
            AuthoringCommand::RemoveScene { .. } => "authoring.remove_scene",
            AuthoringCommand::RenameScene { .. } => "authoring.rename_scene",
            AuthoringCommand::MoveScene { .. } => "authoring.move_scene",
            AuthoringCommand::ToggleSceneExpanded { .. } => "authoring.toggle_scene_expanded",
            AuthoringCommand::AddBeat { .. } => "authoring.add_beat",
            AuthoringCommand::RemoveBeat { .. } => "authoring.remove_beat",
            AuthoringCommand::MoveBeat { .. } => "authoring.move_beat",
            AuthoringCommand::UpdateBeat { .. } => "authoring.update_beat",
            AuthoringCommand::AddResponse { .. } => "authoring.add_response",
            AuthoringCommand::UpdateResponse { .. } => "authoring.update_response",
            AuthoringCommand::RemoveResponse { .. } => "authoring.remove_response",
            AuthoringCommand::UpdateScenario { .. } => "authoring.update_scenario",
        }
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to hand the whole document to the persistence collaborator.
#[derive(Debug, Clone)]
pub struct SaveScenario {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The content block the scenario lives inside.
    pub document_id: Uuid,
}

impl Command for SaveScenario {
    fn command_type(&self) -> &'static str {
        "authoring.save_scenario"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Where an attached media URL is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaTarget {
    /// `Scenario::background_image`.
    Background,
    /// `Scenario::avatar_image`.
    Avatar,
    /// `Beat::image` of the given beat.
    BeatImage(BeatId),
}

/// Command to resolve a picked file to a URL and store it on the document.
#[derive(Debug, Clone)]
pub struct AttachMedia {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Field receiving the URL.
    pub target: MediaTarget,
    /// The picked file.
    pub file: MediaFile,
}

impl Command for AttachMedia {
    fn command_type(&self) -> &'static str {
        "authoring.attach_media"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
