//! Error types for structured error handling.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `PeriodError`: Errors from period parsing and construction
//! - `ConventionError`: Errors from resolving convention and calendar names
//!
//! All errors are raised at construction time. Arithmetic and adjustment on
//! already constructed values never fails.

use thiserror::Error;

use super::serial::{MAX_YEAR, MIN_YEAR};

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `OutOfRange`: Year outside the supported range
/// - `Parse`: Failed to parse a date string or compound expression
///
/// # Examples
/// ```
/// use busdate_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Year outside the supported range.
    #[error("Year {year} outside supported range [{}, {}]", MIN_YEAR, MAX_YEAR)]
    OutOfRange {
        /// The offending year
        year: i32,
    },

    /// Failed to parse a date string.
    #[error("Date parse error: {0}")]
    Parse(String),
}

/// Period-related errors.
///
/// # Examples
/// ```
/// use busdate_core::types::PeriodError;
///
/// let err = PeriodError::Parse { input: "2B2D".to_string(), reason: "token after business days".to_string() };
/// assert!(format!("{}", err).contains("2B2D"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// Empty period string where a period is required.
    #[error("Empty period string")]
    Empty,

    /// Period string could not be parsed.
    #[error("Unable to parse '{input}' as period: {reason}")]
    Parse {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Both a period string and explicit components were supplied.
    #[error("Either period string '{0}' or explicit components, not both")]
    ConflictingInput(String),
}

impl PeriodError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        PeriodError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convention and calendar name resolution errors.
///
/// # Examples
/// ```
/// use busdate_core::types::ConventionError;
///
/// let err = ConventionError::UnknownBusinessDay("XYZ".to_string());
/// assert_eq!(format!("{}", err), "Unknown business day convention: XYZ");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConventionError {
    /// Unknown business day convention name.
    #[error("Unknown business day convention: {0}")]
    UnknownBusinessDay(String),

    /// Unknown day count convention name.
    #[error("Unknown day count convention: {0}")]
    UnknownDayCount(String),

    /// Unknown holiday calendar name.
    #[error("Unknown calendar: {0}")]
    UnknownCalendar(String),
}

impl From<PeriodError> for DateError {
    fn from(err: PeriodError) -> Self {
        DateError::Parse(err.to_string())
    }
}

impl From<ConventionError> for DateError {
    fn from(err: ConventionError) -> Self {
        DateError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_error_display() {
        let err = DateError::InvalidDate {
            year: 2023,
            month: 2,
            day: 29,
        };
        assert_eq!(format!("{}", err), "Invalid date: 2023-2-29");

        let err = DateError::OutOfRange { year: 1850 };
        assert_eq!(
            format!("{}", err),
            "Year 1850 outside supported range [1900, 9999]"
        );
    }

    #[test]
    fn test_period_error_display() {
        let err = PeriodError::parse("1X", "unknown unit 'X'");
        assert_eq!(
            format!("{}", err),
            "Unable to parse '1X' as period: unknown unit 'X'"
        );
        assert_eq!(format!("{}", PeriodError::Empty), "Empty period string");
    }

    #[test]
    fn test_conversion_into_date_error() {
        let err: DateError = PeriodError::Empty.into();
        assert!(matches!(err, DateError::Parse(_)));

        let err: DateError = ConventionError::UnknownCalendar("XX".to_string()).into();
        assert_eq!(format!("{}", err), "Date parse error: Unknown calendar: XX");
    }
}
