//! Application layer for the Authoring Controller.

pub mod command_handlers;
pub mod query_handlers;
