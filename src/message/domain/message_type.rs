//! The closed registry of message kinds.

use crate::message::error::{MessageError, MessageResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of a message, identified by a stable integer code.
///
/// Codes are contiguous from zero. Downstream storage persists the code, so
/// existing codes must never be renumbered.
///
/// # Examples
///
/// ```
/// use telemetry_intake::message::domain::MessageType;
///
/// assert_eq!(MessageType::from_code(2), Some(MessageType::ListenerTelem));
/// assert_eq!(MessageType::ListenerTelem.name(), "LISTENER_TELEM");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum MessageType {
    /// Raw telemetry as received over the air, base64 encoded.
    ReceivedTelem = 0,
    /// A listener's self-reported profile.
    ListenerInfo = 1,
    /// A listener's self-reported position and time.
    ListenerTelem = 2,
    /// Telemetry already decoded by an external parser.
    Telem = 3,
}

impl MessageType {
    /// Every message type, ordered by code; the index of each entry is its
    /// code.
    pub const ALL: [Self; 4] = [
        Self::ReceivedTelem,
        Self::ListenerInfo,
        Self::ListenerTelem,
        Self::Telem,
    ];

    /// Returns the integer code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the upper snake case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReceivedTelem => "RECEIVED_TELEM",
            Self::ListenerInfo => "LISTENER_INFO",
            Self::ListenerTelem => "LISTENER_TELEM",
            Self::Telem => "TELEM",
        }
    }

    /// Looks up a message type by its integer code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Looks up a message type by its name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Checks that a loosely-typed value is a known message type code.
    ///
    /// Only membership is checked. A value that is not an integer at all is
    /// still reported as [`MessageError::InvalidValue`].
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidValue`] unless `value` is an integer
    /// naming a code in the registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use telemetry_intake::message::domain::MessageType;
    ///
    /// assert!(MessageType::validate(&json!(3)).is_ok());
    /// assert!(MessageType::validate(&json!(951)).is_err());
    /// assert!(MessageType::validate(&json!("asdf")).is_err());
    /// ```
    pub fn validate(value: &Value) -> MessageResult<Self> {
        value
            .as_u64()
            .and_then(|code| u8::try_from(code).ok())
            .and_then(Self::from_code)
            .ok_or_else(|| {
                MessageError::invalid_value("type", format!("unknown message type {value}"))
            })
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> Self {
        kind.code()
    }
}

impl TryFrom<u8> for MessageType {
    type Error = ParseMessageTypeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| ParseMessageTypeError(code.to_string()))
    }
}

impl TryFrom<&str> for MessageType {
    type Error = ParseMessageTypeError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::from_name(name).ok_or_else(|| ParseMessageTypeError(name.to_owned()))
    }
}

/// Error returned when a code or name is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message type: {0}")]
pub struct ParseMessageTypeError(pub String);
