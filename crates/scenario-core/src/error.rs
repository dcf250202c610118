//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Authoring mutations never produce these; unknown ids there are no-ops.
/// Errors surface from saving, media attachment and playback.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An entity addressed by id does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"scene"`, `"beat"`, `"response"`, `"document"`.
        kind: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// The document cannot be played (no scenes, or no beats).
    #[error("scenario is not playable: {0}")]
    NotPlayable(String),

    /// A `specific-content` response points at a beat that does not exist.
    #[error(
        "jump target not found: response {response_id} on beat {beat_id} targets missing beat {target}"
    )]
    MissingJumpTarget {
        /// Beat carrying the response.
        beat_id: String,
        /// The offending response.
        response_id: String,
        /// The missing target beat id.
        target: String,
    },

    /// The playback shell was asked to do something its current state forbids.
    #[error("invalid playback state: {0}")]
    InvalidPlaybackState(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a [`DomainError::NotFound`].
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
