//! Range and schedule error types.

use busdate_core::types::{Date, DateError, Period, PeriodError};
use thiserror::Error;

/// Errors that can occur during range or schedule generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The step moves no date.
    #[error("Step period must not be zero")]
    ZeroStep,

    /// The step mixes signs, so the grid would not be monotone.
    #[error("Step period {step} mixes positive and negative components")]
    InvalidStep {
        /// The rejected step.
        step: Period,
    },

    /// Start date after end date.
    #[error("Start date {start} must not be after end date {end}")]
    InvalidDateRange {
        /// The start date.
        start: Date,
        /// The end date.
        end: Date,
    },

    /// Missing required field in builder.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Unknown frequency name.
    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),

    /// A date argument could not be constructed.
    #[error(transparent)]
    Date(#[from] DateError),

    /// A step argument could not be parsed.
    #[error(transparent)]
    Period(#[from] PeriodError),
}
