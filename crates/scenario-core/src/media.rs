//! Media resource abstraction (the media collaborator).
//!
//! Turns a user-selected file into an opaque URL string. The engine stores the
//! returned string verbatim and never inspects its encoding.

use async_trait::async_trait;

use crate::error::DomainError;

/// A file picked by the author.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Original file name, including extension.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Resolves a media file to an opaque URL (object URL, data URL, file URL…).
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Returns the URL under which `file` can be displayed.
    async fn resolve(&self, file: &MediaFile) -> Result<String, DomainError>;
}
