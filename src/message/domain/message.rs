//! The validated message envelope.
//!
//! A message either exists fully validated or not at all; there is no
//! partially constructed state and no mutation after construction.

use super::{Listener, MessageType, Payload, listener::downcast_listener};
use crate::message::{
    coercion::{CoercionConfig, coerce_payload, fields::coerce_integer},
    error::{MessageError, MessageResult},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A typed, timestamped report from a listener.
///
/// # Invariants
///
/// - `source` is a validated [`Listener`]
/// - `data`, when present, is the canonical output of the coercion rule
///   for `kind`
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use serde_json::json;
/// use telemetry_intake::message::domain::{Listener, Message, MessageType};
///
/// let source = Arc::new(Listener::new("M0ZDR", "1.2.3.4").expect("valid listener"));
/// let message = Message::new(
///     source,
///     MessageType::ReceivedTelem,
///     18_297_895,
///     1_238_702,
///     Some(json!("SSBrbm93IHdoZXJlIHlvdSBsaXZlLgo=")),
/// )
/// .expect("valid message");
///
/// assert_eq!(
///     message.to_string(),
///     "<Message (RECEIVED_TELEM) from <Listener M0ZDR at 1.2.3.4>>",
/// );
/// ```
#[derive(Clone, PartialEq, Serialize)]
pub struct Message {
    source: Arc<Listener>,
    #[serde(rename = "type")]
    kind: MessageType,
    time_created: i64,
    time_received: i64,
    data: Option<Payload>,
}

impl Message {
    /// Creates a message, coercing `data` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the coercion rule for `kind`.
    pub fn new(
        source: Arc<Listener>,
        kind: MessageType,
        time_created: i64,
        time_received: i64,
        data: Option<Value>,
    ) -> MessageResult<Self> {
        Self::new_with_config(
            source,
            kind,
            time_created,
            time_received,
            data,
            &CoercionConfig::default(),
        )
    }

    /// Creates a message, coercing `data` with `config`.
    ///
    /// A `data` of `None` or JSON `null` is accepted for every type.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the coercion rule for `kind`.
    pub fn new_with_config(
        source: Arc<Listener>,
        kind: MessageType,
        time_created: i64,
        time_received: i64,
        data: Option<Value>,
        config: &CoercionConfig,
    ) -> MessageResult<Self> {
        let data = match data {
            None | Some(Value::Null) => None,
            Some(value) => Some(coerce_payload(kind, value, config)?),
        };

        Ok(Self {
            source,
            kind,
            time_created,
            time_received,
            data,
        })
    }

    /// Creates a message from loosely-typed parts.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// source, type, creation time, receipt time, then payload.
    ///
    /// An `Arc<Listener>` source is shared with the new message. A bare
    /// [`Listener`] is copied into a fresh `Arc`, so callers that build many
    /// messages from one listener should pass the shared handle.
    ///
    /// # Errors
    ///
    /// - [`MessageError::TypeMismatch`] if `source` is not a [`Listener`] or
    ///   `Arc<Listener>`, or `time_created` is absent or not an integer
    /// - [`MessageError::InvalidValue`] if `kind` is not a known type code
    ///   or `time_received` cannot be read as an integer
    /// - whatever the coercion rule for the type returns
    pub fn from_values(
        source: &dyn Any,
        kind: &Value,
        time_created: &Value,
        time_received: &Value,
        data: Option<Value>,
        config: &CoercionConfig,
    ) -> MessageResult<Self> {
        let source = shared_listener(source)
            .ok_or_else(|| MessageError::type_mismatch("source", "a Listener"))?;
        let kind = MessageType::validate(kind)?;
        let time_created = time_created
            .as_i64()
            .ok_or_else(|| MessageError::type_mismatch("time_created", "an integer timestamp"))?;
        let time_received = coerce_integer("time_received", time_received)?;

        Self::new_with_config(source, kind, time_created, time_received, data, config)
    }

    /// Returns the listener that sent this message.
    #[must_use]
    pub const fn source(&self) -> &Arc<Listener> {
        &self.source
    }

    /// Returns the message type.
    #[must_use]
    pub const fn kind(&self) -> MessageType {
        self.kind
    }

    /// Returns the creation timestamp in Unix seconds.
    #[must_use]
    pub const fn time_created(&self) -> i64 {
        self.time_created
    }

    /// Returns the receipt timestamp in Unix seconds.
    #[must_use]
    pub const fn time_received(&self) -> i64 {
        self.time_received
    }

    /// Returns the canonical payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    /// Returns the creation time, if it is a representable instant.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time_created, 0)
    }

    /// Returns the receipt time, if it is a representable instant.
    #[must_use]
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time_received, 0)
    }
}

/// Shares an `Arc<Listener>` source, or copies a bare listener into a new one.
fn shared_listener(value: &dyn Any) -> Option<Arc<Listener>> {
    value
        .downcast_ref::<Arc<Listener>>()
        .cloned()
        .or_else(|| downcast_listener(value).map(|listener| Arc::new(listener.clone())))
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Message ({}) from {}>", self.kind.name(), self.source)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
