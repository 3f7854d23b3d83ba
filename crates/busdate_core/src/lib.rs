//! # busdate_core: Business Date Arithmetic
//!
//! ## Foundation Layer Role
//!
//! busdate_core is the bottom layer of the workspace, providing:
//! - Serial day numbers and Gregorian rules (`types::serial`)
//! - Business periods such as `"1Y6M"` or `"-2B"` (`types::period`)
//! - The `Date` type with period and business-day arithmetic (`types::time`)
//! - Business day and day count conventions (`types::convention`, `types::day_count`)
//! - Compound date expressions (`types::compound`)
//! - Holiday calendars including TARGET2 (`calendar`)
//! - Explicit date context: clock, calendar and default conventions (`config`)
//!
//! Schedule generation lives in `busdate_schedules`, which builds on this
//! crate only.
//!
//! ## Usage Examples
//!
//! ```rust
//! use busdate_core::calendar::TargetCalendar;
//! use busdate_core::types::{BusinessDayConvention, Date, DayCountConvention, Period};
//!
//! let start = Date::from_ymd(2015, 12, 31).unwrap();
//! let spot = start.add_period(&Period::parse("2B").unwrap(), &TargetCalendar);
//! assert_eq!(spot, Date::from_ymd(2016, 1, 5).unwrap());
//!
//! let maturity = (spot + Period::parse("3M").unwrap())
//!     .adjust(BusinessDayConvention::ModifiedFollowing, &TargetCalendar);
//! assert_eq!(maturity.to_string(), "20160405");
//!
//! let yf = DayCountConvention::Act360.year_fraction(spot, maturity);
//! assert!((yf - 91.0 / 360.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialisation for Date, Period, conventions and
//!   Holidays, and TOML loading for `config::DateConfig`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod calendar;
pub mod config;
pub mod types;
