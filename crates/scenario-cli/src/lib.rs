//! Scenario CLI — terminal host for the branching scenario engine.
//!
//! Provides the file-backed persistence and media collaborators, Markdown
//! heading rendering, and the interactive terminal player behind the
//! `scenario` binary.

pub mod commands;
pub mod config;
pub mod error;
pub mod media;
pub mod render;
pub mod store;
pub mod terminal;
