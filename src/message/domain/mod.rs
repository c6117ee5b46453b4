//! Domain types for the message subsystem.
//!
//! This module contains pure domain types with no infrastructure
//! dependencies. All types are immutable after construction.

mod listener;
mod message;
mod message_type;
mod payload;

pub use listener::Listener;
pub use message::Message;
pub use message_type::{MessageType, ParseMessageTypeError};
pub use payload::{ListenerInfo, ListenerTelemetry, ListenerTime, Payload};
