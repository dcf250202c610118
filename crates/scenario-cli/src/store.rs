//! File-backed persistence collaborator.
//!
//! A scenario lives in one file on disk. `.yaml`/`.yml` files hold YAML,
//! anything else holds pretty-printed JSON. The repository is bound to a
//! single path, so the document id only labels what was loaded or saved.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scenario_core::error::DomainError;
use scenario_core::repository::{DocumentRepository, StoredDocument};
use scenario_document::domain::hash::content_hash;
use scenario_document::domain::model::Scenario;
use tracing::debug;
use uuid::Uuid;

/// On-disk encoding of a scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the file extension.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }

    fn decode(self, text: &str) -> Result<serde_json::Value, DomainError> {
        match self {
            Self::Json => serde_json::from_str(text)
                .map_err(|e| DomainError::Infrastructure(format!("invalid JSON scenario: {e}"))),
            Self::Yaml => serde_yaml::from_str(text)
                .map_err(|e| DomainError::Infrastructure(format!("invalid YAML scenario: {e}"))),
        }
    }

    fn encode(self, payload: &serde_json::Value) -> Result<String, DomainError> {
        match self {
            Self::Json => serde_json::to_string_pretty(payload)
                .map(|mut text| {
                    text.push('\n');
                    text
                })
                .map_err(|e| DomainError::Infrastructure(format!("JSON encoding failed: {e}"))),
            Self::Yaml => serde_yaml::to_string(payload)
                .map_err(|e| DomainError::Infrastructure(format!("YAML encoding failed: {e}"))),
        }
    }
}

/// Reads and writes one scenario file.
#[derive(Debug, Clone)]
pub struct FileDocumentRepository {
    path: PathBuf,
}

impl FileDocumentRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> DocumentFormat {
        DocumentFormat::for_path(&self.path)
    }
}

#[async_trait]
impl DocumentRepository for FileDocumentRepository {
    async fn load(&self, document_id: Uuid) -> Result<Option<StoredDocument>, DomainError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::Infrastructure(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let saved_at = tokio::fs::metadata(&self.path)
            .await
            .and_then(|meta| meta.modified())
            .map_or_else(|_| Utc::now(), DateTime::<Utc>::from);

        let payload = self.format().decode(&text)?;
        debug!(path = %self.path.display(), "scenario file read");
        Ok(Some(StoredDocument {
            document_id,
            version_hash: content_hash(&payload),
            payload,
            correlation_id: Uuid::new_v4(),
            saved_at,
        }))
    }

    async fn save(&self, document: &StoredDocument) -> Result<(), DomainError> {
        let text = self.format().encode(&document.payload)?;
        tokio::fs::write(&self.path, text).await.map_err(|e| {
            DomainError::Infrastructure(format!("cannot write {}: {e}", self.path.display()))
        })?;
        debug!(
            path = %self.path.display(),
            version_hash = %document.version_hash,
            "scenario file written"
        );
        Ok(())
    }
}

/// Loads the scenario stored at `path`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the file does not exist and
/// `DomainError::Infrastructure` if it cannot be read or parsed.
pub async fn read_scenario(path: &Path) -> Result<Scenario, DomainError> {
    let repo = FileDocumentRepository::new(path);
    let stored = repo
        .load(Uuid::new_v4())
        .await?
        .ok_or_else(|| DomainError::not_found("scenario file", path.display().to_string()))?;
    serde_json::from_value(stored.payload)
        .map_err(|e| DomainError::Infrastructure(format!("{}: {e}", path.display())))
}
