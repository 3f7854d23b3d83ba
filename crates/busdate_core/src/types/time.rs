//! Business date type.
//!
//! This module provides:
//! - `Date`: Copy value wrapping a [`SerialDate`]
//! - Calendar-month and business-day arithmetic
//! - Construction from serials, `YYYYMMDD` integers and the common textual
//!   formats
//!
//! Adjustment conventions live in [`convention`](super::convention), day
//! counts in [`day_count`](super::day_count) and the compound expression
//! language in [`compound`](super::compound).
//!
//! # Examples
//!
//! ```
//! use busdate_core::types::{Date, Period};
//!
//! let start = Date::from_ymd(2016, 2, 29).unwrap();
//! let end = start + Period::parse("1Y").unwrap();
//! assert_eq!(end, Date::from_ymd(2017, 2, 28).unwrap());
//! assert_eq!(end.to_string(), "20170228");
//! ```

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use super::clock::{Clock, SystemClock};
use super::error::DateError;
use super::period::Period;
use super::serial::{self, SerialDate};
use crate::calendar::{HolidayCalendar, NoHolidays, TargetCalendar};

/// Smallest integer read as `YYYYMMDD` by [`Date::from_int`].
const YYYYMMDD_THRESHOLD: i64 = 10_000_101;

/// Calendar date backed by a serial day number.
///
/// Equality and ordering are those of the serial. All operations return new
/// values. Arithmetic saturates at [`Date::MIN`] and [`Date::MAX`], so every
/// computed date renders as a `YYYYMMDD` string that parses back.
///
/// # Examples
///
/// ```
/// use busdate_core::types::Date;
///
/// let date = Date::from_ymd(2016, 1, 2).unwrap();
/// assert_eq!(date.to_serial(), 42371);
/// assert_eq!(Date::from_int(20160102).unwrap(), date);
/// assert_eq!(Date::from_int(42371).unwrap(), date);
/// assert_eq!("01/02/2016".parse::<Date>().unwrap(), date);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(SerialDate);

impl Date {
    /// 1900-01-01, the earliest supported date.
    pub const MIN: Date = Date(SerialDate::new(2));

    /// 9999-12-31, the latest supported date.
    pub const MAX: Date = Date(SerialDate::new(2_958_465));

    /// Creates a Date from year, month, and day components.
    ///
    /// # Errors
    /// `DateError::InvalidDate` for an impossible date, `DateError::OutOfRange`
    /// for a year outside the supported range.
    ///
    /// # Examples
    ///
    /// ```
    /// use busdate_core::types::Date;
    ///
    /// assert!(Date::from_ymd(2016, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2017, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        SerialDate::from_ymd(year, month, day).map(Date)
    }

    /// Creates a Date from a serial day number (0 is 1899-12-30).
    ///
    /// # Errors
    /// `DateError::OutOfRange` if the serial lies outside the supported years.
    pub fn from_serial(serial: i32) -> Result<Self, DateError> {
        let s = SerialDate::new(serial);
        let (year, _, _) = s.to_ymd();
        if (serial::MIN_YEAR..=serial::MAX_YEAR).contains(&year) {
            Ok(Date(s))
        } else {
            Err(DateError::OutOfRange { year })
        }
    }

    /// Creates a Date from a fractional serial, dropping the fraction.
    pub fn from_float(value: f64) -> Result<Self, DateError> {
        if !value.is_finite() || value.abs() > f64::from(i32::MAX) {
            return Err(DateError::Parse(format!("{} is not a date serial", value)));
        }
        Date::from_serial(value.floor() as i32)
    }

    /// Creates a Date from an integer.
    ///
    /// Values from 10000101 upwards are read as `YYYYMMDD`, smaller values as
    /// a serial day number.
    pub fn from_int(value: i64) -> Result<Self, DateError> {
        if value >= YYYYMMDD_THRESHOLD {
            let year = value / 10_000;
            let month = (value / 100 % 100) as u32;
            let day = (value % 100) as u32;
            let year = i32::try_from(year).map_err(|_| DateError::OutOfRange { year: i32::MAX })?;
            Date::from_ymd(year, month, day)
        } else {
            let serial = i32::try_from(value)
                .map_err(|_| DateError::Parse(format!("{} is not a date serial", value)))?;
            Date::from_serial(serial)
        }
    }

    pub(crate) const fn from_serial_date(serial: SerialDate) -> Self {
        Date(serial)
    }

    fn saturating_from_serial(serial: i64) -> Self {
        let lo = i64::from(Date::MIN.0.value());
        let hi = i64::from(Date::MAX.0.value());
        Date(SerialDate::new(serial.clamp(lo, hi) as i32))
    }

    /// Today's date from the system clock.
    pub fn today() -> Self {
        SystemClock.today()
    }

    /// Today's date as reported by `clock`.
    ///
    /// ```
    /// use busdate_core::types::{Date, FixedClock};
    ///
    /// let clock = FixedClock::new(Date::from_ymd(2016, 1, 1).unwrap());
    /// assert_eq!(Date::today_with(&clock), Date::from_ymd(2016, 1, 1).unwrap());
    /// ```
    pub fn today_with<K: Clock + ?Sized>(clock: &K) -> Self {
        clock.today()
    }

    /// Parses a plain date string.
    ///
    /// Accepted formats: `YYYYMMDD`, `YYYY-MM-DD`, `MM/DD/YYYY`, `DD.MM.YYYY`.
    /// Compound expressions are handled by [`Date::parse_expr`].
    ///
    /// # Examples
    ///
    /// ```
    /// use busdate_core::types::Date;
    ///
    /// let d = Date::from_ymd(2016, 3, 31).unwrap();
    /// assert_eq!(Date::parse("20160331").unwrap(), d);
    /// assert_eq!(Date::parse("2016-03-31").unwrap(), d);
    /// assert_eq!(Date::parse("03/31/2016").unwrap(), d);
    /// assert_eq!(Date::parse("31.03.2016").unwrap(), d);
    /// assert!(Date::parse("2016-13-01").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let s = s.trim();
        if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
            let value: i64 = s
                .parse()
                .map_err(|e| DateError::Parse(format!("{}: {}", s, e)))?;
            return Date::from_int(value);
        }
        for format in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"] {
            if let Ok(naive) = NaiveDate::parse_from_str(s, format) {
                return Date::try_from(naive);
            }
        }
        Err(DateError::Parse(format!("unrecognised date format '{}'", s)))
    }

    /// Returns the underlying serial.
    #[inline]
    pub fn serial(self) -> SerialDate {
        self.0
    }

    /// Returns the serial day number.
    #[inline]
    pub fn to_serial(self) -> i32 {
        self.0.value()
    }

    /// Returns `(year, month, day)`.
    #[inline]
    pub fn to_ymd(self) -> (i32, u32, u32) {
        self.0.to_ymd()
    }

    /// Returns the year component.
    #[inline]
    pub fn year(self) -> i32 {
        self.to_ymd().0
    }

    /// Returns the month component (1-12).
    #[inline]
    pub fn month(self) -> u32 {
        self.to_ymd().1
    }

    /// Returns the day-of-month component (1-31).
    #[inline]
    pub fn day(self) -> u32 {
        self.to_ymd().2
    }

    /// Day of week, Monday = 0 through Sunday = 6.
    #[inline]
    pub fn weekday(self) -> u32 {
        self.0.weekday()
    }

    /// True on Saturday and Sunday.
    #[inline]
    pub fn is_weekend(self) -> bool {
        self.0.is_weekend()
    }

    /// True if the date's year is a leap year.
    pub fn is_leap_year(self) -> bool {
        serial::is_leap_year(self.year())
    }

    /// Number of days in the date's year.
    pub fn days_in_year(self) -> i32 {
        serial::days_in_year(self.year())
    }

    /// Number of days in the date's month.
    pub fn days_in_month(self) -> u32 {
        let (y, m, _) = self.to_ymd();
        serial::days_in_month(y, m)
    }

    /// Last calendar day of the date's month.
    pub fn end_of_month(self) -> Date {
        let (y, m, _) = self.to_ymd();
        Date(SerialDate::from_civil(y, m, serial::days_in_month(y, m)))
    }

    /// Last calendar day of the date's quarter.
    ///
    /// ```
    /// use busdate_core::types::Date;
    ///
    /// let d = Date::from_ymd(2016, 5, 10).unwrap();
    /// assert_eq!(d.end_of_quarter(), Date::from_ymd(2016, 6, 30).unwrap());
    /// ```
    pub fn end_of_quarter(self) -> Date {
        let (y, m, _) = self.to_ymd();
        let m = m.div_ceil(3) * 3;
        Date(SerialDate::from_civil(y, m, serial::days_in_month(y, m)))
    }

    /// True if the date is a business day of `calendar`.
    pub fn is_business_day<C: HolidayCalendar + ?Sized>(self, calendar: &C) -> bool {
        calendar.is_business_day(self)
    }

    /// Shifts by a number of calendar days.
    #[inline]
    pub fn add_days(self, days: i32) -> Date {
        Date::saturating_from_serial(i64::from(self.0.value()) + i64::from(days))
    }

    /// Shifts by calendar months, clamping the day to the target month's end.
    pub fn add_months(self, months: i32) -> Date {
        self.add_ymd(0, months, 0)
    }

    /// Shifts by calendar years, clamping 29 February to 28 February.
    pub fn add_years(self, years: i32) -> Date {
        self.add_ymd(years, 0, 0)
    }

    /// Shifts by years and months (with carry and one end-of-month clamp),
    /// then by flat days.
    ///
    /// ```
    /// use busdate_core::types::Date;
    ///
    /// let d = Date::from_ymd(2016, 1, 31).unwrap();
    /// assert_eq!(d.add_ymd(0, 1, 0), Date::from_ymd(2016, 2, 29).unwrap());
    /// assert_eq!(d.add_ymd(1, 1, 1), Date::from_ymd(2017, 3, 1).unwrap());
    /// ```
    pub fn add_ymd(self, years: i32, months: i32, days: i32) -> Date {
        let (y, m, d) = self.to_ymd();
        let total = i64::from(y) * 12 + i64::from(m) - 1 + i64::from(years) * 12 + i64::from(months);
        let shifted = if total < i64::from(serial::MIN_YEAR) * 12 {
            Date::MIN
        } else if total > i64::from(serial::MAX_YEAR) * 12 + 11 {
            Date::MAX
        } else {
            let year = total.div_euclid(12) as i32;
            let month = total.rem_euclid(12) as u32 + 1;
            let day = d.min(serial::days_in_month(year, month));
            Date(SerialDate::from_civil(year, month, day))
        };
        shifted.add_days(days)
    }

    /// Moves `n` business days of `calendar`, stepping one calendar day at a
    /// time in the direction of `n`.
    ///
    /// `n == 0` returns the date unchanged, business day or not. The walk
    /// stops early at [`Date::MIN`] or [`Date::MAX`]. Otherwise the search
    /// has no step cap; a calendar that marks every weekday as a holiday
    /// never terminates.
    ///
    /// ```
    /// use busdate_core::calendar::{NoHolidays, TargetCalendar};
    /// use busdate_core::types::Date;
    ///
    /// let d = Date::from_ymd(2015, 12, 31).unwrap();
    /// assert_eq!(d.add_business_days(2, &NoHolidays), Date::from_ymd(2016, 1, 4).unwrap());
    /// assert_eq!(d.add_business_days(2, &TargetCalendar), Date::from_ymd(2016, 1, 5).unwrap());
    /// ```
    pub fn add_business_days<C: HolidayCalendar + ?Sized>(self, n: i32, calendar: &C) -> Date {
        let step = n.signum();
        let mut remaining = n.unsigned_abs();
        let mut current = self;
        while remaining > 0 {
            let next = current.add_days(step);
            if next == current {
                break;
            }
            current = next;
            if calendar.is_business_day(current) {
                remaining -= 1;
            }
        }
        current
    }

    /// Applies a period: years and months with one end-of-month clamp, then
    /// flat days, then business days on `calendar`.
    ///
    /// ```
    /// use busdate_core::calendar::NoHolidays;
    /// use busdate_core::types::{Date, Period};
    ///
    /// let d = Date::from_ymd(2016, 2, 29).unwrap();
    /// let p = Period::parse("1Y1M").unwrap();
    /// assert_eq!(d.add_period(&p, &NoHolidays), Date::from_ymd(2017, 3, 29).unwrap());
    /// ```
    pub fn add_period<C: HolidayCalendar + ?Sized>(self, period: &Period, calendar: &C) -> Date {
        self.add_ymd(period.years(), period.months(), period.days())
            .add_business_days(period.business_days(), calendar)
    }

    /// Signed number of calendar days from `self` to `other`.
    #[inline]
    pub fn days_until(self, other: Date) -> i64 {
        i64::from(other.0 - self.0)
    }

    /// Decomposes the distance to `end` into years, months and days.
    ///
    /// Years and months are taken as large as possible without passing
    /// `end`; the remainder is days. A reversed pair yields the negated
    /// decomposition of the forward pair.
    pub fn diff_in_ymd(self, end: Date) -> Period {
        if end < self {
            return -end.diff_in_ymd(self);
        }
        let (sy, sm, _) = self.to_ymd();
        let (ey, em, _) = end.to_ymd();
        let mut years = ey - sy;
        let mut months = em as i32 - sm as i32;
        if months < 0 {
            years -= 1;
            months += 12;
        }
        loop {
            let days = end.0 - self.add_ymd(years, months, 0).0;
            if days >= 0 {
                return Period::new(years, months, days, 0);
            }
            months -= 1;
            if months < 0 {
                years -= 1;
                months += 12;
            }
        }
    }

    /// Converts to a `chrono::NaiveDate` if chrono can represent the year.
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        let (y, m, d) = self.to_ymd();
        NaiveDate::from_ymd_opt(y, m, d)
    }
}

impl Default for Date {
    /// [`Date::MIN`].
    fn default() -> Self {
        Date::MIN
    }
}

impl Add<Period> for Date {
    type Output = Date;

    /// Adds a period using the weekend-only calendar for business days.
    fn add(self, period: Period) -> Date {
        self.add_period(&period, &NoHolidays)
    }
}

impl Add<&Period> for Date {
    type Output = Date;

    fn add(self, period: &Period) -> Date {
        self.add_period(period, &NoHolidays)
    }
}

impl Sub<Period> for Date {
    type Output = Date;

    fn sub(self, period: Period) -> Date {
        self.add_period(&-period, &NoHolidays)
    }
}

impl Sub<&Period> for Date {
    type Output = Date;

    fn sub(self, period: &Period) -> Date {
        self.add_period(&-*period, &NoHolidays)
    }
}

impl Sub for Date {
    type Output = Period;

    /// Years, months and days from `other` to `self`.
    ///
    /// ```
    /// use busdate_core::types::{Date, Period};
    ///
    /// let start = Date::from_ymd(2016, 1, 31).unwrap();
    /// let end = Date::from_ymd(2017, 11, 1).unwrap();
    /// assert_eq!(end - start, Period::parse("1Y9M1D").unwrap());
    /// ```
    fn sub(self, other: Date) -> Period {
        other.diff_in_ymd(self)
    }
}

impl TryFrom<NaiveDate> for Date {
    type Error = DateError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Date::from_ymd(value.year(), value.month(), value.day())
    }
}

impl TryFrom<Date> for NaiveDate {
    type Error = DateError;

    fn try_from(value: Date) -> Result<Self, Self::Error> {
        value.to_naive_date().ok_or(DateError::OutOfRange { year: value.year() })
    }
}

impl From<SerialDate> for Date {
    fn from(serial: SerialDate) -> Self {
        Date(serial)
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses a plain date, falling back to a compound expression evaluated
    /// against the system clock and the TARGET calendar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s).or_else(|_| Date::parse_expr(s, &SystemClock, &TargetCalendar))
    }
}

impl fmt::Display for Date {
    /// Renders `YYYYMMDD`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (y, m, d) = self.to_ymd();
        write!(f, "{:04}{:02}{:02}", y, m, d)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Date;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    impl Serialize for Date {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    struct DateVisitor;

    impl de::Visitor<'_> for DateVisitor {
        type Value = Date;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a date string or a YYYYMMDD / serial integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Date, E> {
            Date::parse(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Date, E> {
            Date::from_int(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Date, E> {
            let v = i64::try_from(v).map_err(E::custom)?;
            Date::from_int(v).map_err(E::custom)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(DateVisitor)
        }
    }
}
