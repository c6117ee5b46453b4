//! Listener identity and message validation.
//!
//! This module implements the validation and coercion engine that turns
//! reports from untrusted ground stations into canonical records.
//!
//! # Architecture
//!
//! - **Domain**: immutable value types ([`domain::Listener`],
//!   [`domain::Message`], [`domain::MessageType`], [`domain::Payload`])
//! - **Coercion**: strict field coercions and the per-type rules that
//!   canonicalise payloads ([`coercion`])
//! - **Services**: the envelope intake used by the ingestion layer
//!   ([`services::MessageIntake`])
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use telemetry_intake::message::domain::{Listener, Message, MessageType};
//!
//! let source = Arc::new(Listener::new("M0ZDR", "1.2.3.4").expect("valid listener"));
//! let message = Message::new(
//!     source,
//!     MessageType::ListenerTelem,
//!     1_700_000_000,
//!     1_700_000_002,
//!     Some(json!({
//!         "time": {"hour": 12, "minute": "40", "second": "7"},
//!         "latitude": "-35.11",
//!         "longitude": "137.567",
//!         "altitude": "12"
//!     })),
//! )
//! .expect("valid message");
//!
//! let telemetry = message
//!     .data()
//!     .and_then(|payload| payload.as_listener_telem())
//!     .expect("listener telemetry");
//! assert_eq!(telemetry.time.minute, 40);
//! ```

pub mod coercion;
pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
mod tests;
