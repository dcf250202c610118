//! Domain layer for the Scenario Document Model.

pub mod factory;
pub mod hash;
pub mod ids;
pub mod model;
pub mod position;
pub mod validation;
