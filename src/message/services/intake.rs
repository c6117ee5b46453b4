//! Intake of loosely-typed report envelopes.
//!
//! The `MessageIntake` service is the entry point the ingestion layer calls
//! once it has framed a report into JSON. It builds the [`Listener`] and
//! [`Message`] for the report, stamps the receipt time when the envelope
//! does not carry one, and logs the outcome.

use crate::message::{
    coercion::CoercionConfig,
    domain::{Listener, Message},
    error::MessageResult,
};
use mockable::Clock;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// A report as framed by the network layer, before any validation.
///
/// Every field is kept as raw JSON so that each one is judged by the same
/// rules as a direct [`Message::from_values`] call.
///
/// # Examples
///
/// ```
/// use telemetry_intake::message::services::ReportEnvelope;
///
/// let envelope: ReportEnvelope = serde_json::from_str(
///     r#"{"callsign": "M0ZDR", "address": "1.2.3.4", "type": 3, "time_created": 10}"#,
/// )
/// .expect("well-formed JSON");
/// assert!(envelope.time_received.is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportEnvelope {
    /// Callsign of the reporting station.
    #[serde(default)]
    pub callsign: Value,
    /// Network address the report arrived from.
    #[serde(default)]
    pub address: Value,
    /// Message type code.
    #[serde(default, rename = "type")]
    pub kind: Value,
    /// When the listener created the report.
    #[serde(default)]
    pub time_created: Value,
    /// When the report was received; stamped by the intake when absent.
    #[serde(default)]
    pub time_received: Option<Value>,
    /// Payload, interpreted according to `kind`.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Builds validated messages from report envelopes.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mockable::DefaultClock;
/// use serde_json::json;
/// use telemetry_intake::message::services::{MessageIntake, ReportEnvelope};
///
/// let intake = MessageIntake::new(Arc::new(DefaultClock));
/// let envelope = ReportEnvelope {
///     callsign: json!("M0ZDR"),
///     address: json!("1.2.3.4"),
///     kind: json!(3),
///     time_created: json!(1_700_000_000),
///     ..ReportEnvelope::default()
/// };
///
/// let message = intake.accept(envelope).expect("valid report");
/// assert_eq!(message.source().callsign(), "M0ZDR");
/// ```
#[derive(Debug, Clone)]
pub struct MessageIntake<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    config: CoercionConfig,
}

impl<C> MessageIntake<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an intake using the default coercion configuration.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self::with_config(clock, CoercionConfig::default())
    }

    /// Creates an intake using `config`.
    #[must_use]
    pub const fn with_config(clock: Arc<C>, config: CoercionConfig) -> Self {
        Self { clock, config }
    }

    /// Returns the coercion configuration in use.
    #[must_use]
    pub const fn config(&self) -> &CoercionConfig {
        &self.config
    }

    /// Validates an envelope and builds its message.
    ///
    /// # Errors
    ///
    /// Returns the first [`MessageError`](crate::message::error::MessageError)
    /// raised while building the listener or the message.
    pub fn accept(&self, envelope: ReportEnvelope) -> MessageResult<Message> {
        let callsign = envelope.callsign.clone();
        let result = self.build(envelope);

        match &result {
            Ok(message) => debug!(
                callsign = message.source().callsign(),
                message_type = message.kind().name(),
                time_received = message.time_received(),
                "accepted message"
            ),
            Err(err) => warn!(
                callsign = %callsign,
                error_kind = %err.kind(),
                error = %err,
                "rejected report"
            ),
        }

        result
    }

    fn build(&self, envelope: ReportEnvelope) -> MessageResult<Message> {
        let listener = Arc::new(Listener::from_values(
            &envelope.callsign,
            &envelope.address,
        )?);
        let time_received = envelope
            .time_received
            .unwrap_or_else(|| Value::from(self.clock.utc().timestamp()));

        Message::from_values(
            &listener,
            &envelope.kind,
            &envelope.time_created,
            &time_received,
            envelope.data,
            &self.config,
        )
    }
}
