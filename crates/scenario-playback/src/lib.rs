//! Branching scenario engine — Navigation Engine and Playback Shell.
//!
//! Responsible for the pure transition function over a scenario graph, the
//! learner's playback session (cursor, visited beats, progress), and the
//! timed feedback pause between choosing a response and moving on.

pub mod application;
pub mod domain;
