//! Domain layer for the Authoring Controller.

pub mod commands;
pub mod operations;
pub mod patches;
