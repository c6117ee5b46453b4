//! Telemetry intake: validation and coercion of listener reports.
//!
//! Ground stations ("listeners") tracking a broadcasting source send in
//! raw telemetry, decoded telemetry, their own position and their station
//! profile. This crate decides which of those reports are acceptable and
//! normalises them into canonical, strictly-typed records.
//!
//! # Modules
//!
//! - [`message`]: listener identity, message types, payload coercion and
//!   the intake service

pub mod message;
