//! Reporting ground stations and their identity rules.

use crate::message::error::{MessageError, MessageResult};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// Maximum number of digits accepted in one dotted-quad segment.
const MAX_SEGMENT_DIGITS: usize = 3;

/// A ground station reporting telemetry.
///
/// Identity follows the operator, not their network location: two listeners
/// with the same callsign are equal whatever their addresses.
///
/// # Examples
///
/// ```
/// use telemetry_intake::message::domain::Listener;
///
/// let a = Listener::new("M0RND", "1.2.3.4").expect("valid listener");
/// let b = Listener::new("m0rnd", "001.2.003.5").expect("valid listener");
///
/// assert_eq!(a, b);
/// assert_eq!(b.to_string(), "<Listener M0RND at 1.2.3.5>");
/// ```
#[derive(Clone, Serialize)]
pub struct Listener {
    callsign: String,
    address: IpAddr,
}

impl Listener {
    /// Creates a listener from a callsign and a textual network address.
    ///
    /// The callsign is uppercased and must consist only of `A-Z`, `0-9`,
    /// `_` and `/`. Dotted-quad addresses may carry leading zeros in any
    /// segment; they are stored without them.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidValue`] if the callsign is empty or
    /// contains other characters, or if the address does not parse.
    pub fn new(callsign: &str, address: &str) -> MessageResult<Self> {
        Ok(Self {
            callsign: normalize_callsign(callsign)?,
            address: parse_address(address)?,
        })
    }

    /// Creates a listener from loosely-typed values.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::TypeMismatch`] if `callsign` is not text, and
    /// otherwise fails as [`Listener::new`] does. An address that is not
    /// text is reported as [`MessageError::InvalidValue`].
    pub fn from_values(callsign: &Value, address: &Value) -> MessageResult<Self> {
        let Some(callsign) = callsign.as_str() else {
            return Err(MessageError::type_mismatch("callsign", "text"));
        };
        let Some(address) = address.as_str() else {
            return Err(MessageError::invalid_value(
                "address",
                format!("{address} is not a network address"),
            ));
        };
        Self::new(callsign, address)
    }

    /// Returns the uppercased callsign.
    #[must_use]
    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    /// Returns the canonical network address.
    #[must_use]
    pub const fn address(&self) -> IpAddr {
        self.address
    }

    /// Compares against a value of any kind.
    ///
    /// Returns `true` only when `other` is a [`Listener`] (or a shared
    /// `Arc<Listener>`) with the same callsign.
    ///
    /// ```
    /// use telemetry_intake::message::domain::Listener;
    ///
    /// let listener = Listener::new("M0ZDR", "1.2.3.4").expect("valid listener");
    /// assert!(!listener.equals(&0_i32));
    /// ```
    #[must_use]
    pub fn equals(&self, other: &dyn Any) -> bool {
        downcast_listener(other).is_some_and(|listener| listener == self)
    }
}

/// Recovers a listener from a dynamically typed value.
pub(crate) fn downcast_listener(value: &dyn Any) -> Option<&Listener> {
    value
        .downcast_ref::<Listener>()
        .or_else(|| value.downcast_ref::<Arc<Listener>>().map(|shared| &**shared))
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.callsign == other.callsign
    }
}

impl Eq for Listener {}

impl Hash for Listener {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.callsign.hash(state);
    }
}

impl PartialOrd for Listener {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Listener {
    fn cmp(&self, other: &Self) -> Ordering {
        self.callsign.cmp(&other.callsign)
    }
}

impl fmt::Display for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Listener {} at {}>", self.callsign, self.address)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn normalize_callsign(raw: &str) -> MessageResult<String> {
    let callsign = raw.to_ascii_uppercase();

    if callsign.is_empty() {
        return Err(MessageError::invalid_value(
            "callsign",
            "callsign must not be empty",
        ));
    }

    let is_valid = callsign
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '/');

    if !is_valid {
        return Err(MessageError::invalid_value(
            "callsign",
            format!("'{raw}' contains characters outside [A-Z0-9_/]"),
        ));
    }

    Ok(callsign)
}

fn parse_address(raw: &str) -> MessageResult<IpAddr> {
    let invalid =
        || MessageError::invalid_value("address", format!("'{raw}' is not a network address"));

    if raw.contains(':') {
        return raw
            .parse::<Ipv6Addr>()
            .map(IpAddr::V6)
            .map_err(|_| invalid());
    }

    let mut octets = [0_u8; 4];
    let mut segments = raw.split('.');
    for octet in &mut octets {
        let segment = segments.next().ok_or_else(invalid)?;
        *octet = parse_octet(segment).ok_or_else(invalid)?;
    }
    if segments.next().is_some() {
        return Err(invalid());
    }

    Ok(IpAddr::V4(Ipv4Addr::from(octets)))
}

/// Parses one decimal dotted-quad segment, tolerating leading zeros.
fn parse_octet(segment: &str) -> Option<u8> {
    let well_formed = !segment.is_empty()
        && segment.len() <= MAX_SEGMENT_DIGITS
        && segment.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return None;
    }
    segment.parse().ok()
}
