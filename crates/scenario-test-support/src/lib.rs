//! Shared test mocks and utilities for the branching scenario engine.

mod clock;
mod ids;
mod media;
mod repository;

pub use clock::FixedClock;
pub use ids::SequenceIds;
pub use media::{FailingMediaResolver, StaticMediaResolver};
pub use repository::{
    EmptyDocumentRepository, FailingDocumentRepository, RecordingDocumentRepository,
};
