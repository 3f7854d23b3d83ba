//! # busdate_schedules: Date Ranges and Schedules
//!
//! Ordered date sequences generated from a roll anchor and a step period:
//!
//! - [`DateRange`]: the grid `roll + k * step`, sliced to `[start, stop)`
//! - [`Schedule`]: a range that always contains both end dates, with stub
//!   merging
//! - [`Frequency`]: named steps (annual, quarterly, ...)
//!
//! ## Design Principles
//!
//! - **Grid first, slice second**: dates never drift, since calendar steps
//!   are computed from the roll anchor directly
//! - **Builder pattern** for ergonomic construction with sensible defaults
//! - **Explicit clock** for the "today" default of open-ended ranges and
//!   schedules
//!
//! ## Usage Examples
//!
//! ```rust
//! use busdate_core::types::{Date, Period};
//! use busdate_schedules::{DateRange, Schedule};
//!
//! let start = Date::from_int(20151231).unwrap();
//! let stop = Date::from_int(20160630).unwrap();
//!
//! let range = DateRange::new(start, stop, Period::from_months(1), start).unwrap();
//! assert_eq!(range.len(), 6);
//! assert_eq!(range.dates()[2], Date::from_int(20160229).unwrap());
//!
//! let schedule = Schedule::new(start, stop, Period::from_months(1), Some(start)).unwrap();
//! assert_eq!(schedule.last(), Some(stop));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

mod error;
mod frequency;
mod range;
mod schedule;

pub use error::ScheduleError;
pub use frequency::Frequency;
pub use range::{DateRange, DateRangeBuilder};
pub use schedule::{Schedule, ScheduleBuilder};
