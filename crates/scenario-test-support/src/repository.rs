//! Test repositories — mock `DocumentRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use scenario_core::error::DomainError;
use scenario_core::repository::{DocumentRepository, StoredDocument};
use uuid::Uuid;

/// A document repository that records every `save` call and serves the most
/// recently saved document from `load`.
#[derive(Debug, Default)]
pub struct RecordingDocumentRepository {
    saved: Mutex<Vec<StoredDocument>>,
}

impl RecordingDocumentRepository {
    /// Create an empty recording repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all documents that were saved.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved_documents(&self) -> Vec<StoredDocument> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentRepository for RecordingDocumentRepository {
    async fn load(&self, document_id: Uuid) -> Result<Option<StoredDocument>, DomainError> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|d| d.document_id == document_id)
            .cloned())
    }

    async fn save(&self, document: &StoredDocument) -> Result<(), DomainError> {
        self.saved.lock().unwrap().push(document.clone());
        Ok(())
    }
}

/// A document repository that never holds anything and silently accepts
/// saves.
#[derive(Debug)]
pub struct EmptyDocumentRepository;

#[async_trait]
impl DocumentRepository for EmptyDocumentRepository {
    async fn load(&self, _document_id: Uuid) -> Result<Option<StoredDocument>, DomainError> {
        Ok(None)
    }

    async fn save(&self, _document: &StoredDocument) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A document repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingDocumentRepository;

#[async_trait]
impl DocumentRepository for FailingDocumentRepository {
    async fn load(&self, _document_id: Uuid) -> Result<Option<StoredDocument>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save(&self, _document: &StoredDocument) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
