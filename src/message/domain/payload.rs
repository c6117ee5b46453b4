//! Canonical payload records stored on a [`Message`](super::Message).
//!
//! Each variant is the output of one coercion rule. Serialising a payload
//! yields the JSON shape downstream consumers expect, without a variant tag.

use serde::Serialize;
use serde_json::{Map, Value};

/// The canonicalised payload of a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Raw telemetry, re-encoded as canonical base64 text.
    ReceivedTelem(String),
    /// A listener's profile, reduced to the four profile fields.
    ListenerInfo(ListenerInfo),
    /// A listener's position and time report.
    ListenerTelem(ListenerTelemetry),
    /// Decoded telemetry, stored exactly as supplied.
    Telem(Value),
}

impl Payload {
    /// Renders the payload as a JSON value.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use telemetry_intake::message::domain::Payload;
    ///
    /// let payload = Payload::ReceivedTelem("aGk=".to_owned());
    /// assert_eq!(payload.to_value(), json!("aGk="));
    /// ```
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::ReceivedTelem(text) => Value::String(text.clone()),
            Self::ListenerInfo(info) => info.to_value(),
            Self::ListenerTelem(telemetry) => telemetry.to_value(),
            Self::Telem(value) => value.clone(),
        }
    }

    /// Returns the base64 text of a received telemetry payload.
    #[must_use]
    pub fn as_received_telem(&self) -> Option<&str> {
        match self {
            Self::ReceivedTelem(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the listener profile, if this is one.
    #[must_use]
    pub const fn as_listener_info(&self) -> Option<&ListenerInfo> {
        match self {
            Self::ListenerInfo(info) => Some(info),
            _ => None,
        }
    }

    /// Returns the listener telemetry, if this is one.
    #[must_use]
    pub const fn as_listener_telem(&self) -> Option<&ListenerTelemetry> {
        match self {
            Self::ListenerTelem(telemetry) => Some(telemetry),
            _ => None,
        }
    }

    /// Returns the opaque telemetry value, if this is one.
    #[must_use]
    pub const fn as_telem(&self) -> Option<&Value> {
        match self {
            Self::Telem(value) => Some(value),
            _ => None,
        }
    }
}

/// A listener's self-reported station profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerInfo {
    /// Operator name.
    pub name: String,
    /// Free-form station location.
    pub location: String,
    /// Receiver description.
    pub radio: String,
    /// Antenna description.
    pub antenna: String,
}

impl ListenerInfo {
    /// Field names every profile must carry.
    pub const REQUIRED_KEYS: [&'static str; 4] = ["name", "location", "radio", "antenna"];

    /// Renders the profile as a JSON object with exactly the four fields.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_owned(), Value::String(self.name.clone()));
        map.insert("location".to_owned(), Value::String(self.location.clone()));
        map.insert("radio".to_owned(), Value::String(self.radio.clone()));
        map.insert("antenna".to_owned(), Value::String(self.antenna.clone()));
        Value::Object(map)
    }
}

/// Time of day reported by a listener, in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerTime {
    /// Hour of day.
    pub hour: i64,
    /// Minute of hour.
    pub minute: i64,
    /// Second of minute.
    pub second: i64,
    /// Any other keys sent inside `time`, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListenerTime {
    /// Field names every time entry must carry.
    pub const REQUIRED_KEYS: [&'static str; 3] = ["hour", "minute", "second"];
}

/// A listener's self-reported position and time.
///
/// Keys beyond the required ones are kept in `extra` (or, inside `time`, in
/// [`ListenerTime::extra`]) and serialised back alongside the required
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListenerTelemetry {
    /// Time of the fix.
    pub time: ListenerTime,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Altitude in metres.
    pub altitude: f64,
    /// Any other keys the listener sent, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListenerTelemetry {
    /// Renders the telemetry as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut time = self.time.extra.clone();
        time.insert("hour".to_owned(), Value::from(self.time.hour));
        time.insert("minute".to_owned(), Value::from(self.time.minute));
        time.insert("second".to_owned(), Value::from(self.time.second));

        let mut map = self.extra.clone();
        map.insert("time".to_owned(), Value::Object(time));
        map.insert("latitude".to_owned(), Value::from(self.latitude));
        map.insert("longitude".to_owned(), Value::from(self.longitude));
        map.insert("altitude".to_owned(), Value::from(self.altitude));
        Value::Object(map)
    }
}
