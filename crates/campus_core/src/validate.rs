//! Input checks for callers.
//!
//! The registry accepts any score, credit-hour count or name. Forms and
//! command-line front ends use these helpers to reject bad input before it
//! reaches the registry.

use std::fmt;

/// Lowest accepted score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest accepted score.
pub const MAX_SCORE: f64 = 4.0;

/// A rejected input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalid {
    /// Name of the field.
    pub field: &'static str,
    /// Why the value was rejected.
    pub reason: String,
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for Invalid {}

fn invalid(field: &'static str, reason: impl Into<String>) -> Invalid {
    Invalid {
        field,
        reason: reason.into(),
    }
}

/// Checks that `value` is a finite score between 0.0 and 4.0.
///
/// # Errors
///
/// Returns `Invalid` for anything outside the range, or NaN.
pub fn score(value: f64) -> Result<f64, Invalid> {
    if (MIN_SCORE..=MAX_SCORE).contains(&value) {
        Ok(value)
    } else {
        Err(invalid("score", format!("{value} is outside {MIN_SCORE}..={MAX_SCORE}")))
    }
}

/// Checks that a course carries at least one credit hour.
///
/// # Errors
///
/// Returns `Invalid` for zero.
pub fn credit_hours(value: u32) -> Result<u32, Invalid> {
    if value == 0 {
        Err(invalid("credit hours", "must be at least 1"))
    } else {
        Ok(value)
    }
}

/// Checks that a required text field is not blank and returns it trimmed.
///
/// # Errors
///
/// Returns `Invalid` for empty or whitespace-only text.
pub fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, Invalid> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(invalid(field, "is required"))
    } else {
        Ok(trimmed)
    }
}
