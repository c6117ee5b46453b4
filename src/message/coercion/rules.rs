//! Per-type payload coercion rules.
//!
//! The rule is chosen by the message type alone, never by inspecting the
//! payload's shape. Field paths in errors are rooted at `data`.

use super::{
    config::CoercionConfig,
    fields::{
        check_float_range, check_integer_range, coerce_float, coerce_integer, coerce_text,
        require_key, require_object,
    },
};
use crate::message::{
    domain::{ListenerInfo, ListenerTelemetry, ListenerTime, MessageType, Payload},
    error::{MessageError, MessageResult},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};

const PAYLOAD_FIELD: &str = "data";
const TELEMETRY_KEYS: [&str; 4] = ["time", "latitude", "longitude", "altitude"];

/// Coerces a payload according to the rule for `kind`.
///
/// # Errors
///
/// Returns whatever error the selected rule produces; see the individual
/// rule functions.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use telemetry_intake::message::coercion::{CoercionConfig, rules::coerce_payload};
/// use telemetry_intake::message::domain::MessageType;
///
/// let payload = coerce_payload(
///     MessageType::ReceivedTelem,
///     json!("SSBrbm93IHdoZXJlIHlvdSBsaXZlLgo="),
///     &CoercionConfig::default(),
/// )
/// .expect("valid base64");
/// assert_eq!(payload.as_received_telem(), Some("SSBrbm93IHdoZXJlIHlvdSBsaXZlLgo="));
/// ```
pub fn coerce_payload(
    kind: MessageType,
    data: Value,
    config: &CoercionConfig,
) -> MessageResult<Payload> {
    match kind {
        MessageType::ReceivedTelem => {
            coerce_received_telem(&data, config).map(Payload::ReceivedTelem)
        }
        MessageType::ListenerInfo => {
            coerce_listener_info(&data, config).map(Payload::ListenerInfo)
        }
        MessageType::ListenerTelem => {
            coerce_listener_telem(data, config).map(Payload::ListenerTelem)
        }
        MessageType::Telem => Ok(Payload::Telem(data)),
    }
}

/// Re-encodes raw telemetry as canonical base64.
///
/// Strings are decoded as they are; any other value is decoded from its
/// JSON text, so `1234` or `true` are accepted as the bytes that text
/// encodes while `null` or `12345` are not.
///
/// # Errors
///
/// Returns [`MessageError::InvalidValue`] if the text is not standard
/// padded base64 or decodes to more than the configured size.
pub fn coerce_received_telem(data: &Value, config: &CoercionConfig) -> MessageResult<String> {
    let text = match data {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };

    let raw = STANDARD.decode(text.as_bytes()).map_err(|e| {
        MessageError::invalid_value(PAYLOAD_FIELD, format!("invalid base64: {e}"))
    })?;

    if raw.len() > config.max_received_telem_bytes {
        return Err(MessageError::invalid_value(
            PAYLOAD_FIELD,
            format!(
                "decoded telemetry is {} bytes, exceeds limit of {}",
                raw.len(),
                config.max_received_telem_bytes
            ),
        ));
    }

    Ok(STANDARD.encode(raw))
}

/// Reduces a listener profile to its four text fields.
///
/// Keys outside [`ListenerInfo::REQUIRED_KEYS`] are dropped.
///
/// # Errors
///
/// Returns [`MessageError::TypeMismatch`] if the payload is not a mapping,
/// and [`MessageError::InvalidValue`] if a required key is missing or its
/// value cannot be read as text.
pub fn coerce_listener_info(data: &Value, config: &CoercionConfig) -> MessageResult<ListenerInfo> {
    let map = require_object(PAYLOAD_FIELD, data)?;
    read_listener_info(map, config).map_err(|e| e.nested_in(PAYLOAD_FIELD))
}

/// Coerces a listener's position and time report.
///
/// Required fields are parsed into their numeric kinds; every other key,
/// at the top level or inside `time`, is carried over unchanged.
///
/// # Errors
///
/// Returns [`MessageError::TypeMismatch`] if the payload or its `time`
/// entry is not a mapping, and [`MessageError::InvalidValue`] if a required
/// key is missing, does not parse, or (with range checks on) lies outside
/// its physical range.
pub fn coerce_listener_telem(
    data: Value,
    config: &CoercionConfig,
) -> MessageResult<ListenerTelemetry> {
    let Value::Object(mut map) = data else {
        return Err(MessageError::type_mismatch(PAYLOAD_FIELD, "a mapping"));
    };

    let (time, latitude, longitude, altitude) =
        read_position(&map, config).map_err(|e| e.nested_in(PAYLOAD_FIELD))?;

    for key in TELEMETRY_KEYS {
        map.remove(key);
    }

    Ok(ListenerTelemetry {
        time,
        latitude,
        longitude,
        altitude,
        extra: map,
    })
}

fn read_listener_info(
    map: &Map<String, Value>,
    config: &CoercionConfig,
) -> MessageResult<ListenerInfo> {
    let [name, location, radio, antenna] = ListenerInfo::REQUIRED_KEYS
        .map(|key| coerce_text(key, require_key(map, key)?, config.require_text_profile));

    Ok(ListenerInfo {
        name: name?,
        location: location?,
        radio: radio?,
        antenna: antenna?,
    })
}

fn read_position(
    map: &Map<String, Value>,
    config: &CoercionConfig,
) -> MessageResult<(ListenerTime, f64, f64, f64)> {
    let time_map = require_object("time", require_key(map, "time")?)?;
    let time = read_time(time_map, config).map_err(|e| e.nested_in("time"))?;

    let latitude = coerce_float("latitude", require_key(map, "latitude")?)?;
    let longitude = coerce_float("longitude", require_key(map, "longitude")?)?;
    let altitude = coerce_float("altitude", require_key(map, "altitude")?)?;

    if config.check_ranges {
        check_float_range("latitude", latitude, -90.0, 90.0)?;
        check_float_range("longitude", longitude, -180.0, 180.0)?;
    }

    Ok((time, latitude, longitude, altitude))
}

fn read_time(map: &Map<String, Value>, config: &CoercionConfig) -> MessageResult<ListenerTime> {
    let hour = coerce_integer("hour", require_key(map, "hour")?)?;
    let minute = coerce_integer("minute", require_key(map, "minute")?)?;
    let second = coerce_integer("second", require_key(map, "second")?)?;

    if config.check_ranges {
        check_integer_range("hour", hour, 0, 23)?;
        check_integer_range("minute", minute, 0, 59)?;
        check_integer_range("second", second, 0, 59)?;
    }

    let mut extra = map.clone();
    for key in ListenerTime::REQUIRED_KEYS {
        extra.remove(key);
    }

    Ok(ListenerTime {
        hour,
        minute,
        second,
        extra,
    })
}
