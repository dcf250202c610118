//! Editor and player requests.
//!
//! Each request names itself (`authoring.add_beat`, `authoring.save_scenario`)
//! and carries a correlation id that follows it into tracing spans and into
//! the metadata of any event it produces.

use uuid::Uuid;

/// A request routed to a command handler.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted name used as the `command_type` span field.
    fn command_type(&self) -> &'static str;

    fn correlation_id(&self) -> Uuid;
}
