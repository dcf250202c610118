//! Domain layer for playback.

pub mod aggregates;
pub mod events;
pub mod navigation;
pub mod progress;
