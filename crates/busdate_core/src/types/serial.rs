//! Day-number representation of calendar dates.
//!
//! A [`SerialDate`] counts days from 1899-12-30 (serial 0) on the proleptic
//! Gregorian calendar. For every date from 1900-03-01 onwards the serial
//! agrees with spreadsheet date serials, e.g. `42371` is 2016-01-02.
//!
//! Conversion in both directions is closed-form integer arithmetic
//! (civil-day algorithm), so every comparison and shift built on top of it
//! stays O(1).
//!
//! # Examples
//!
//! ```
//! use busdate_core::types::serial::SerialDate;
//!
//! let s = SerialDate::from_ymd(2016, 1, 2).unwrap();
//! assert_eq!(s.value(), 42371);
//! assert_eq!(s.to_ymd(), (2016, 1, 2));
//! ```

use std::fmt;
use std::ops::{Add, Sub};

use super::error::DateError;

/// Smallest supported year.
pub const MIN_YEAR: i32 = 1900;

/// Largest supported year.
pub const MAX_YEAR: i32 = 9999;

/// Days from 0000-03-01 to 1970-01-01 in the civil-day algorithm.
const UNIX_EPOCH_SHIFT: i64 = 719_468;

/// Days from 1899-12-30 to 1970-01-01.
const SERIAL_EPOCH_SHIFT: i64 = 25_569;

/// Days in a 400-year Gregorian era.
const DAYS_PER_ERA: i64 = 146_097;

/// Day number of a calendar date, counted from 1899-12-30.
///
/// Only the constructors validate. Shifting a serial by an integer is plain
/// integer arithmetic that saturates at the `i32` bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SerialDate(i32);

impl SerialDate {
    /// Wraps a raw serial number without validation.
    #[inline]
    pub const fn new(serial: i32) -> Self {
        SerialDate(serial)
    }

    /// Creates a serial from year, month and day.
    ///
    /// # Errors
    /// - `DateError::OutOfRange` if the year is outside `[MIN_YEAR, MAX_YEAR]`
    /// - `DateError::InvalidDate` if month or day do not form a calendar date
    ///
    /// # Examples
    ///
    /// ```
    /// use busdate_core::types::serial::SerialDate;
    ///
    /// assert!(SerialDate::from_ymd(2016, 2, 29).is_ok());
    /// assert!(SerialDate::from_ymd(2015, 2, 29).is_err());
    /// assert!(SerialDate::from_ymd(1850, 1, 1).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::OutOfRange { year });
        }
        if !is_valid_ymd(year, month, day) {
            return Err(DateError::InvalidDate { year, month, day });
        }
        Ok(Self::from_civil(year, month, day))
    }

    /// Serial of a (year, month, day) triple that is known to be a calendar
    /// date. The year range is not checked.
    pub(crate) fn from_civil(year: i32, month: u32, day: u32) -> Self {
        let y = i64::from(year) - i64::from(month <= 2);
        let m = i64::from(month);
        let d = i64::from(day);
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let mp = if m > 2 { m - 3 } else { m + 9 };
        let doy = (153 * mp + 2) / 5 + d - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        let days = era * DAYS_PER_ERA + doe - UNIX_EPOCH_SHIFT;
        SerialDate((days + SERIAL_EPOCH_SHIFT) as i32)
    }

    /// Returns the raw serial number.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Converts back to `(year, month, day)`.
    pub fn to_ymd(self) -> (i32, u32, u32) {
        let z = i64::from(self.0) - SERIAL_EPOCH_SHIFT + UNIX_EPOCH_SHIFT;
        let era = z.div_euclid(DAYS_PER_ERA);
        let doe = z - era * DAYS_PER_ERA;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);
        (year as i32, month as u32, day as u32)
    }

    /// Day of week with Monday = 0 through Sunday = 6.
    #[inline]
    pub fn weekday(self) -> u32 {
        // serial 0 was a Saturday
        (self.0 + 5).rem_euclid(7) as u32
    }

    /// True on Saturday and Sunday.
    #[inline]
    pub fn is_weekend(self) -> bool {
        self.weekday() >= 5
    }
}

impl From<SerialDate> for i32 {
    fn from(s: SerialDate) -> Self {
        s.0
    }
}

impl Add<i32> for SerialDate {
    type Output = SerialDate;

    fn add(self, days: i32) -> SerialDate {
        SerialDate(self.0.saturating_add(days))
    }
}

impl Sub<i32> for SerialDate {
    type Output = SerialDate;

    fn sub(self, days: i32) -> SerialDate {
        SerialDate(self.0.saturating_sub(days))
    }
}

impl Sub for SerialDate {
    type Output = i32;

    fn sub(self, other: SerialDate) -> i32 {
        self.0.saturating_sub(other.0)
    }
}

impl fmt::Display for SerialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gregorian leap-year rule.
///
/// ```
/// use busdate_core::types::serial::is_leap_year;
///
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2016));
/// ```
#[inline]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given year.
#[inline]
pub fn days_in_year(year: i32) -> i32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Number of days in the given month, or 0 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// True if `(year, month, day)` is a calendar date within the supported range.
pub fn is_valid_ymd(year: i32, month: u32, day: u32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
        && (1..=12).contains(&month)
        && day >= 1
        && day <= days_in_month(year, month)
}
