//! Document repository abstraction (the persistence collaborator).
//!
//! The engine never persists autonomously: an explicit save hands the whole
//! serialized scenario to an implementation of [`DocumentRepository`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a serialized scenario document.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    /// Identifier of the content block the scenario lives inside.
    pub document_id: Uuid,
    /// Plain nested records of the full scenario.
    pub payload: serde_json::Value,
    /// Hex SHA-256 of the canonical payload.
    pub version_hash: String,
    /// Correlation ID of the save command.
    pub correlation_id: Uuid,
    /// Timestamp of the save.
    pub saved_at: chrono::DateTime<chrono::Utc>,
}

/// Repository trait for saving and loading scenario documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Load the most recently saved document, or `None` if nothing was saved.
    async fn load(&self, document_id: Uuid) -> Result<Option<StoredDocument>, DomainError>;

    /// Persist a full document, replacing any previous version.
    async fn save(&self, document: &StoredDocument) -> Result<(), DomainError>;
}
