//! Configuration error types.
//!
//! The flight core itself never fails: degenerate vectors and quaternion drift
//! are corrected in place.  Errors only exist at the configuration boundary,
//! where a hand-edited `assets/flight.toml` can be unreadable, malformed, or
//! carry values the tick cannot work with.

use thiserror::Error;

/// Everything that can go wrong while loading or validating a
/// [`FlightConfig`](crate::config::FlightConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has a field of the wrong type.
    #[error("failed to parse flight config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside the range the flight tick can handle.
    #[error("'{name}' = {value} is outside safe range {safe_range}")]
    OutOfRange {
        /// Name of the field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value > 0`.
pub fn require_positive(name: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value >= 0`.
pub fn require_non_negative(name: &'static str, value: f32) -> ConfigResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}

/// Returns an error unless `value <= max`.
pub fn require_at_most(
    name: &'static str,
    value: u32,
    max: u32,
    safe_range: &'static str,
) -> ConfigResult<()> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value: value as f32,
            safe_range,
        })
    }
}
