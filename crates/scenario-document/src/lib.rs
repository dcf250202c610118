//! Branching scenario engine — Scenario Document Model.
//!
//! Scenes, beats and responses, the construction helpers that hand out fresh
//! ids and keep `order` fields dense, the id→position index used for jumps,
//! and the playability checks run before a document may be played or saved.

pub mod domain;
