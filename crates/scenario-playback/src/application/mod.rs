//! Application layer for playback.

pub mod feedback;
pub mod player;
pub mod query_handlers;
