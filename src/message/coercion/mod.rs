//! Payload coercion engine.
//!
//! Turns loosely-typed payloads supplied by listeners into the canonical
//! [`Payload`](crate::message::domain::Payload) records stored on messages.
//! Field-level coercions live in [`fields`]; the per-type rules and the
//! dispatcher that selects between them live in [`rules`].

mod config;
pub mod fields;
pub mod rules;

pub use config::CoercionConfig;
pub use rules::coerce_payload;
