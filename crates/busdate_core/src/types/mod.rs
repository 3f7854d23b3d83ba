//! Core date, period and convention types.
//!
//! This module provides:
//! - `serial`: Day-number representation and Gregorian calendar rules
//! - `period`: Business periods and their grammar
//! - `time`: The `Date` type with calendar and business-day arithmetic
//! - `convention`: Business day adjustment conventions
//! - `day_count`: Day count conventions
//! - `compound`: Compound date expressions such as `"0BMODFLW20171231"`
//! - `clock`: Sources of "today"
//! - `error`: Structured error types for dates, periods and convention names
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level.

pub mod clock;
pub mod compound;
pub mod convention;
pub mod day_count;
pub mod error;
pub mod period;
pub mod serial;
pub mod time;

// Re-export commonly used types at module level
pub use clock::{Clock, FixedClock, SystemClock};
pub use compound::{DateExpression, Instruction};
pub use convention::BusinessDayConvention;
pub use day_count::DayCountConvention;
pub use error::{ConventionError, DateError, PeriodError};
pub use period::Period;
pub use serial::SerialDate;
pub use time::Date;
