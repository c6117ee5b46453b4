//! Error types for listener and message construction.
//!
//! Every construction failure is one of two kinds. A
//! [`MessageError::TypeMismatch`] means the caller handed over a value of the
//! wrong shape entirely and is treated as a bug at the call site. A
//! [`MessageError::InvalidValue`] means the shape was right but the content
//! supplied by a listener was unacceptable.

use std::fmt;
use thiserror::Error;

/// Result type for listener and message construction.
pub type MessageResult<T> = Result<T, MessageError>;

/// Errors that can occur while building a [`Listener`] or [`Message`].
///
/// [`Listener`]: crate::message::domain::Listener
/// [`Message`]: crate::message::domain::Message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The value has the wrong fundamental kind for the field.
    #[error("{field}: expected {expected}")]
    TypeMismatch {
        /// Dotted path of the offending field.
        field: String,
        /// Description of the kind that was expected.
        expected: &'static str,
    },

    /// The value has the right kind but unacceptable content.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// Description of the validation failure.
        reason: String,
    },
}

impl MessageError {
    /// Creates a type mismatch error for `field`.
    #[must_use]
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
        }
    }

    /// Creates an invalid value error for `field`.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns which of the two error kinds this is.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::InvalidValue { .. } => ErrorKind::InvalidValue,
        }
    }

    /// Returns the dotted path of the field that failed.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::TypeMismatch { field, .. } | Self::InvalidValue { field, .. } => field,
        }
    }

    /// Prefixes the field path with `parent`, so an error raised while
    /// coercing `hour` inside `time` reports `time.hour`.
    #[must_use]
    pub(crate) fn nested_in(self, parent: &str) -> Self {
        match self {
            Self::TypeMismatch { field, expected } => Self::TypeMismatch {
                field: format!("{parent}.{field}"),
                expected,
            },
            Self::InvalidValue { field, reason } => Self::InvalidValue {
                field: format!("{parent}.{field}"),
                reason,
            },
        }
    }
}

/// The two kinds of construction failure callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structurally wrong input; a programming error at the call site.
    TypeMismatch,
    /// Correctly shaped input with bad content from an external source.
    InvalidValue,
}

impl ErrorKind {
    /// Returns a stable lowercase name for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TypeMismatch => "type_mismatch",
            Self::InvalidValue => "invalid_value",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
