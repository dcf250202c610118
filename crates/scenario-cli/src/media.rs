//! File-backed media collaborator.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use scenario_core::error::DomainError;
use scenario_core::media::{MediaFile, MediaResolver};
use tracing::debug;
use url::Url;

/// Copies media into a directory and hands back a `file://` URL to the copy.
#[derive(Debug, Clone)]
pub struct FileUrlMediaResolver {
    dir: PathBuf,
}

impl FileUrlMediaResolver {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The media directory that sits next to a scenario file.
    #[must_use]
    pub fn beside(scenario_path: &Path) -> Self {
        let parent = scenario_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(parent.join("media"))
    }
}

/// Keeps the final path component only, so a file name cannot escape the
/// media directory.
fn sanitized_name(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
}

#[async_trait]
impl MediaResolver for FileUrlMediaResolver {
    async fn resolve(&self, file: &MediaFile) -> Result<String, DomainError> {
        let name = sanitized_name(&file.file_name).ok_or_else(|| {
            DomainError::Validation(format!("unusable media file name: {:?}", file.file_name))
        })?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::Infrastructure(format!("cannot create {}: {e}", self.dir.display()))
        })?;

        let target = self.dir.join(name);
        tokio::fs::write(&target, &file.bytes).await.map_err(|e| {
            DomainError::Infrastructure(format!("cannot write {}: {e}", target.display()))
        })?;
        let absolute = tokio::fs::canonicalize(&target).await.map_err(|e| {
            DomainError::Infrastructure(format!("cannot resolve {}: {e}", target.display()))
        })?;

        let url = Url::from_file_path(&absolute).map_err(|()| {
            DomainError::Infrastructure(format!("no file URL for {}", absolute.display()))
        })?;

        debug!(%url, content_type = %file.content_type, "media stored");
        Ok(url.into())
    }
}

/// Guesses a MIME type from a file extension.
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
