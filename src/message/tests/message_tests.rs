//! Unit tests for message construction and display.

use super::fixtures::{
    B64_INVALID, B64_VALID, build, build_with, listener_info_valid, listener_telem_canonical,
    listener_telem_valid, source, telem_data,
};
use crate::message::{
    coercion::CoercionConfig,
    domain::{Listener, Message, MessageType},
    error::ErrorKind,
};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn from_values(
    source: &dyn std::any::Any,
    kind: Value,
    time_created: Value,
    time_received: Value,
    data: Option<Value>,
) -> Result<Message, ErrorKind> {
    Message::from_values(
        source,
        &kind,
        &time_created,
        &time_received,
        data,
        &CoercionConfig::default(),
    )
    .map_err(|e| e.kind())
}

// ============================================================================
// construction
// ============================================================================

#[rstest]
fn new_stores_all_fields(source: Arc<Listener>) {
    let message = Message::new(
        Arc::clone(&source),
        MessageType::ReceivedTelem,
        18_297_895,
        1_238_702,
        Some(json!(B64_VALID)),
    )
    .expect("valid message");

    assert_eq!(message.source(), &source);
    assert!(Arc::ptr_eq(message.source(), &source));
    assert_eq!(message.kind(), MessageType::ReceivedTelem);
    assert_eq!(message.time_created(), 18_297_895);
    assert_eq!(message.time_received(), 1_238_702);
    assert_eq!(
        message.data().and_then(|data| data.as_received_telem()),
        Some(B64_VALID)
    );
}

#[rstest]
fn from_values_rejects_garbage_source() {
    let result = from_values(&"asdf", json!(0), json!(123_456), json!(123_456), None);
    assert_eq!(result.err(), Some(ErrorKind::TypeMismatch));
}

#[rstest]
fn from_values_rejects_null_source() {
    let result = from_values(&Value::Null, json!(0), json!(123_456), json!(123_456), None);
    assert_eq!(result.err(), Some(ErrorKind::TypeMismatch));

    let absent: Option<Arc<Listener>> = None;
    let result = from_values(&absent, json!(0), json!(123_456), json!(123_456), None);
    assert_eq!(result.err(), Some(ErrorKind::TypeMismatch));
}

#[rstest]
fn from_values_accepts_owned_and_shared_listeners(source: Arc<Listener>) {
    let owned = Listener::clone(&source);
    let copied = Message::from_values(
        &owned,
        &json!(3),
        &json!(1),
        &json!(2),
        None,
        &CoercionConfig::default(),
    )
    .expect("valid message");
    assert_eq!(**copied.source(), owned);
    assert!(!Arc::ptr_eq(copied.source(), &source));

    let message = Message::from_values(
        &source,
        &json!(3),
        &json!(1),
        &json!(2),
        None,
        &CoercionConfig::default(),
    )
    .expect("valid message");
    assert!(Arc::ptr_eq(message.source(), &source));
}

#[rstest]
#[case(json!(951))]
#[case(json!("asdf"))]
#[case(json!(null))]
fn from_values_rejects_invalid_type(source: Arc<Listener>, #[case] kind: Value) {
    let result = from_values(&source, kind, json!(123_456), json!(123_456), None);
    assert_eq!(result.err(), Some(ErrorKind::InvalidValue));
}

#[rstest]
#[case(json!(null))]
#[case(json!("123456"))]
#[case(json!(1.5))]
fn from_values_rejects_garbage_time_created(source: Arc<Listener>, #[case] time_created: Value) {
    let result = from_values(&source, json!(3), time_created, json!(123_456), None);
    assert_eq!(result.err(), Some(ErrorKind::TypeMismatch));
}

#[rstest]
#[case(json!("lolol"))]
#[case(json!(null))]
#[case(json!(12.5))]
#[case(json!({"t": 1}))]
fn from_values_rejects_garbage_time_received(source: Arc<Listener>, #[case] received: Value) {
    let result = from_values(&source, json!(3), json!(1_235_123), received, Some(json!("asdf")));
    assert_eq!(result.err(), Some(ErrorKind::InvalidValue));
}

#[rstest]
#[case(json!("1238702"), 1_238_702)]
#[case(json!(1_238_702.0), 1_238_702)]
fn from_values_coerces_time_received(
    source: Arc<Listener>,
    #[case] received: Value,
    #[case] expected: i64,
) {
    let message = from_values(&source, json!(3), json!(1), received, None).expect("valid message");
    assert_eq!(message.time_received(), expected);
}

#[rstest]
fn from_values_checks_in_order(source: Arc<Listener>) {
    // Bad source wins over a bad type.
    let result = from_values(&0_u8, json!(951), json!(null), json!("x"), None);
    assert_eq!(result.err(), Some(ErrorKind::TypeMismatch));

    // Bad type wins over a missing creation time.
    let result = from_values(&source, json!(951), json!(null), json!("x"), None);
    assert_eq!(result.err(), Some(ErrorKind::InvalidValue));

    // Missing creation time wins over a bad receipt time.
    let result = from_values(&source, json!(2), json!(null), json!("x"), None);
    assert_eq!(result.err(), Some(ErrorKind::TypeMismatch));

    // Bad receipt time wins over a bad payload.
    let result = from_values(&source, json!(1), json!(1), json!("x"), Some(json!(123)));
    assert_eq!(result.err(), Some(ErrorKind::InvalidValue));
}

#[rstest]
fn allows_no_data_for_every_type(source: Arc<Listener>) {
    for kind in MessageType::ALL {
        let message = Message::new(Arc::clone(&source), kind, 123_456, 123_456, None)
            .expect("absent data is always valid");
        assert!(message.data().is_none());

        let message = build(&source, kind, Value::Null).expect("null data is always valid");
        assert!(message.data().is_none());
    }
}

// ============================================================================
// payload coercion through the constructor
// ============================================================================

#[rstest]
fn coerces_received_telem(source: Arc<Listener>) {
    let message = build(&source, MessageType::ReceivedTelem, json!(B64_VALID)).expect("valid");
    assert_eq!(message.data().map(|d| d.to_value()), Some(json!(B64_VALID)));

    let err = build(&source, MessageType::ReceivedTelem, json!(B64_INVALID))
        .expect_err("invalid base64");
    assert_eq!(err.kind(), ErrorKind::InvalidValue);

    let err = build(
        &source,
        MessageType::ReceivedTelem,
        json!({"lol, a dict?": "asdffsa"}),
    )
    .expect_err("garbage");
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[rstest]
fn coerces_listener_info(source: Arc<Listener>) {
    let message = build(&source, MessageType::ListenerInfo, listener_info_valid()).expect("valid");
    assert_eq!(message.data().map(|d| d.to_value()), Some(listener_info_valid()));

    let mut extra = listener_info_valid();
    extra["badkey"] = json!(true);
    let message = build(&source, MessageType::ListenerInfo, extra).expect("valid");
    assert_eq!(message.data().map(|d| d.to_value()), Some(listener_info_valid()));

    let mut missing = listener_info_valid();
    missing.as_object_mut().expect("mapping").remove("antenna");
    let err = build(&source, MessageType::ListenerInfo, missing).expect_err("missing antenna");
    assert_eq!(err.kind(), ErrorKind::InvalidValue);

    let err = build(&source, MessageType::ListenerInfo, json!(123)).expect_err("not a mapping");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[rstest]
fn coerces_listener_telem(source: Arc<Listener>) {
    let message =
        build(&source, MessageType::ListenerTelem, listener_telem_valid()).expect("valid");
    assert_eq!(message.data().map(|d| d.to_value()), Some(listener_telem_canonical()));

    let err = build(&source, MessageType::ListenerTelem, json!(123)).expect_err("not a mapping");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    let mut out_of_range = listener_telem_valid();
    out_of_range["time"]["minute"] = json!(90);
    let err = build(&source, MessageType::ListenerTelem, out_of_range.clone())
        .expect_err("minute out of range");
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert!(
        build_with(
            &source,
            MessageType::ListenerTelem,
            out_of_range,
            &CoercionConfig::lenient()
        )
        .is_ok()
    );
}

#[rstest]
fn leaves_telem_untouched(source: Arc<Listener>) {
    let input = telem_data();
    let message = build(&source, MessageType::Telem, input.clone()).expect("valid");
    let stored = message.data().and_then(|d| d.as_telem()).expect("telem payload");

    let input_map = input.as_object().expect("mapping");
    for (key, value) in input_map {
        assert_eq!(stored.get(key), Some(value));
    }
    assert_eq!(stored.as_object().map(serde_json::Map::len), Some(input_map.len()));
}

// ============================================================================
// display, timestamps and serialisation
// ============================================================================

#[rstest]
fn display_names_type_and_source(source: Arc<Listener>) {
    for kind in MessageType::ALL {
        let message = Message::new(Arc::clone(&source), kind, 123_345, 123_435, None)
            .expect("valid message");
        let expected = format!("<Message ({}) from {}>", kind.name(), source);
        assert_eq!(message.to_string(), expected);
        assert_eq!(format!("{message:?}"), expected);
    }
}

#[rstest]
fn exposes_timestamps_as_instants(source: Arc<Listener>) {
    let message = Message::new(source, MessageType::Telem, 1_700_000_000, 1_700_000_005, None)
        .expect("valid message");
    assert_eq!(
        message.created_at(),
        Utc.timestamp_opt(1_700_000_000, 0).single()
    );
    assert_eq!(
        message.received_at(),
        Utc.timestamp_opt(1_700_000_005, 0).single()
    );
}

#[rstest]
fn serialises_for_downstream_consumers(source: Arc<Listener>) {
    let message = build(&source, MessageType::ListenerInfo, listener_info_valid()).expect("valid");
    let value = serde_json::to_value(&message).expect("serialise");

    assert_eq!(
        value,
        json!({
            "source": {"callsign": "M0ZDR", "address": "1.2.3.4"},
            "type": 1,
            "time_created": 123_345,
            "time_received": 123_435,
            "data": listener_info_valid()
        })
    );
}
