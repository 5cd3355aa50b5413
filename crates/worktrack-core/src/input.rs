//! Input normalization helpers.
//!
//! Timestamps arrive from upstream records as either 10-digit second or
//! 13-digit millisecond values, sometimes as strings. Anything else is
//! rejected outright rather than coerced.

use crate::error::ValidationError;

/// Normalize a raw timestamp to Unix seconds.
///
/// Accepts 10-digit (seconds) and 13-digit (milliseconds) representations.
///
/// # Errors
/// Returns [`ValidationError::BadTimestamp`] for any other width.
pub fn parse_unix_timestamp(input: i64) -> Result<i64, ValidationError> {
    let digits = input.abs().to_string().len();
    match digits {
        10 => Ok(input),
        13 => Ok(input / 1000),
        _ => Err(ValidationError::BadTimestamp(input.to_string())),
    }
}

/// Normalize a string-typed timestamp to Unix seconds.
pub fn parse_unix_timestamp_str(input: &str) -> Result<i64, ValidationError> {
    let raw: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::BadTimestamp(input.to_string()))?;
    parse_unix_timestamp(raw)
}

/// Round to 2 decimal places, half away from zero.
///
/// `f64::round` already rounds half away from zero; this pins it to the
/// monetary precision used everywhere in the engine.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
