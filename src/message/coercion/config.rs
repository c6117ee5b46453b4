//! Configuration for payload coercion.

use serde::Deserialize;

/// Tunables for the coercion rules.
///
/// Deserialises with every field optional, so hosts can load it from
/// whatever configuration format they already use.
///
/// # Examples
///
/// ```
/// use telemetry_intake::message::coercion::CoercionConfig;
///
/// let config = CoercionConfig::default();
/// assert!(config.check_ranges);
///
/// let lenient = CoercionConfig::lenient();
/// assert!(!lenient.check_ranges);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoercionConfig {
    /// Reject listener telemetry whose time or position is out of range.
    pub check_ranges: bool,
    /// Reject listener profile values that are numbers or booleans rather
    /// than text.
    pub require_text_profile: bool,
    /// Maximum decoded size of received telemetry in bytes.
    pub max_received_telem_bytes: usize,
}

impl Default for CoercionConfig {
    fn default() -> Self {
        Self {
            check_ranges: true,
            require_text_profile: false,
            max_received_telem_bytes: 1024 * 1024, // 1 MiB
        }
    }
}

impl CoercionConfig {
    /// Creates a configuration that only enforces numeric parseability.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            check_ranges: false,
            ..Default::default()
        }
    }

    /// Creates a configuration with tighter limits.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            check_ranges: true,
            require_text_profile: true,
            max_received_telem_bytes: 256 * 1024, // 256 KiB
        }
    }
}
