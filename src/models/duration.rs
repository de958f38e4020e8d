//! Duration normalization.
//!
//! Upstream sources report video lengths inconsistently: integer seconds,
//! fractional seconds, colon-separated clock strings, or nothing at all.
//! Everything is normalized to whole seconds at the boundary so the
//! scheduler never branches on representation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from duration normalization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("Invalid duration format: {0}")]
    InvalidFormat(String),
}

/// A raw duration as it arrives from a caller: either a numeric seconds
/// value or a clock string like `"1:02:30"` / `"12:30"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(f64),
    Clock(String),
}

/// Normalize a raw duration to whole seconds.
///
/// A missing value means the upstream source didn't know the length; it
/// becomes zero rather than an error. Clock strings are read right-to-left
/// as seconds, minutes, hours.
pub fn normalize_duration(value: Option<&DurationValue>) -> Result<u32, DurationError> {
    match value {
        None => Ok(0),
        Some(DurationValue::Seconds(s)) => {
            if *s < 0.0 {
                return Err(DurationError::InvalidFormat(format!(
                    "negative duration: {}",
                    s
                )));
            }
            Ok(s.trunc() as u32)
        }
        Some(DurationValue::Clock(text)) => parse_clock(text),
    }
}

fn parse_clock(text: &str) -> Result<u32, DurationError> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return Err(DurationError::InvalidFormat(format!(
            "too many clock segments: {:?}",
            text
        )));
    }

    let mut total: u64 = 0;
    for (i, part) in parts.iter().rev().enumerate() {
        let n: u64 = part
            .trim()
            .parse()
            .map_err(|_| DurationError::InvalidFormat(format!("not a clock string: {:?}", text)))?;
        let weight = [1, 60, 3600][i];
        total = n
            .checked_mul(weight)
            .and_then(|s| total.checked_add(s))
            .ok_or_else(|| {
                DurationError::InvalidFormat(format!("duration out of range: {:?}", text))
            })?;
    }

    u32::try_from(total)
        .map_err(|_| DurationError::InvalidFormat(format!("duration out of range: {:?}", text)))
}

/// Render seconds as `H:MM:SS`, the format the API exposes to clients.
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}
