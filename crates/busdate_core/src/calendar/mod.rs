//! Holiday calendars and the business-day predicate.
//!
//! This module provides:
//! - [`HolidayCalendar`]: the set-membership capability every business-day
//!   computation consumes
//! - [`NoHolidays`]: weekends only, the calendar used by period arithmetic
//! - [`Holidays`]: an immutable, hash-backed set of holiday dates
//! - [`TargetCalendar`], [`easter_sunday`], [`target_days`]: the rule-based
//!   TARGET2 calendar
//! - [`Calendar`]: a closed, nameable choice among the above
//!
//! # Examples
//!
//! ```
//! use busdate_core::calendar::{Calendar, HolidayCalendar};
//! use busdate_core::types::Date;
//!
//! let new_year = Date::from_ymd(2016, 1, 1).unwrap();
//! assert!(Calendar::WeekendOnly.is_business_day(new_year));
//! assert!(!Calendar::Target.is_business_day(new_year));
//! ```

mod holidays;
mod target;

pub use holidays::Holidays;
pub use target::{easter_sunday, target_days, TargetCalendar};

use std::fmt;
use std::str::FromStr;

use crate::types::error::ConventionError;
use crate::types::Date;

/// A set of non-business dates on top of the Saturday/Sunday weekend.
///
/// Implementors only answer membership. The weekend rule lives in the
/// provided [`is_business_day`](HolidayCalendar::is_business_day).
pub trait HolidayCalendar {
    /// True if `date` is a holiday of this calendar.
    fn is_holiday(&self, date: Date) -> bool;

    /// True unless `date` falls on a weekend or is a holiday.
    #[inline]
    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.is_holiday(date)
    }
}

impl<C: HolidayCalendar + ?Sized> HolidayCalendar for &C {
    fn is_holiday(&self, date: Date) -> bool {
        (**self).is_holiday(date)
    }
}

/// Calendar with no holidays; only weekends are non-business days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    #[inline]
    fn is_holiday(&self, _date: Date) -> bool {
        false
    }
}

/// Closed set of calendars selectable by name.
///
/// # Examples
///
/// ```
/// use busdate_core::calendar::Calendar;
///
/// let cal: Calendar = "target".parse().unwrap();
/// assert_eq!(cal, Calendar::Target);
/// assert_eq!(cal.name(), "TARGET");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Calendar {
    /// Weekends only.
    WeekendOnly,
    /// TARGET2 settlement calendar.
    #[default]
    Target,
    /// Explicit holiday list.
    Custom(Holidays),
}

impl Calendar {
    /// Returns the calendar name. Custom calendars report `"CUSTOM"`.
    pub fn name(&self) -> &'static str {
        match self {
            Calendar::WeekendOnly => "WEEKEND",
            Calendar::Target => "TARGET",
            Calendar::Custom(_) => "CUSTOM",
        }
    }
}

impl HolidayCalendar for Calendar {
    fn is_holiday(&self, date: Date) -> bool {
        match self {
            Calendar::WeekendOnly => false,
            Calendar::Target => TargetCalendar.is_holiday(date),
            Calendar::Custom(holidays) => holidays.is_holiday(date),
        }
    }
}

impl From<Holidays> for Calendar {
    fn from(holidays: Holidays) -> Self {
        Calendar::Custom(holidays)
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Calendar {
    type Err = ConventionError;

    /// Parses a named calendar (case-insensitive).
    ///
    /// - Target: "TARGET", "TARGET2", "TAR"
    /// - WeekendOnly: "WEEKEND", "WEEKENDONLY", "NONE", ""
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '_', '-'], "").as_str() {
            "TARGET" | "TARGET2" | "TAR" => Ok(Calendar::Target),
            "WEEKEND" | "WEEKENDONLY" | "NONE" | "" => Ok(Calendar::WeekendOnly),
            _ => Err(ConventionError::UnknownCalendar(s.to_string())),
        }
    }
}
