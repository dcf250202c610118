//! Test media resolvers — mock `MediaResolver` implementations for tests.

use async_trait::async_trait;
use scenario_core::error::DomainError;
use scenario_core::media::{MediaFile, MediaResolver};

/// Resolves every file to `"<base>/<file_name>"`.
#[derive(Debug)]
pub struct StaticMediaResolver {
    base: String,
}

impl StaticMediaResolver {
    /// Create a resolver that prefixes file names with `base`.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl MediaResolver for StaticMediaResolver {
    async fn resolve(&self, file: &MediaFile) -> Result<String, DomainError> {
        Ok(format!("{}/{}", self.base, file.file_name))
    }
}

/// A media resolver that always fails. Useful for testing error paths.
#[derive(Debug)]
pub struct FailingMediaResolver;

#[async_trait]
impl MediaResolver for FailingMediaResolver {
    async fn resolve(&self, _file: &MediaFile) -> Result<String, DomainError> {
        Err(DomainError::Infrastructure("upload rejected".into()))
    }
}
