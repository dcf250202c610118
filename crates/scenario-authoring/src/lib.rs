//! Branching scenario engine — Authoring Controller.
//!
//! Responsible for structural edits to a scenario document (scenes, beats,
//! responses, re-ordering), explicit saves through the persistence
//! collaborator, and media attachment through the media collaborator.

pub mod application;
pub mod domain;
