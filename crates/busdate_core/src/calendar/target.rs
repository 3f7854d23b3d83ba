//! TARGET2 settlement calendar.
//!
//! Holidays are New Year's Day, Good Friday, Easter Monday, Labour Day,
//! Christmas Day and Boxing Day. Easter is computed with the anonymous
//! Gregorian algorithm, so the calendar answers for any year without a
//! precomputed table.

use super::{HolidayCalendar, Holidays};
use crate::types::serial::SerialDate;
use crate::types::Date;

/// Western (Gregorian) Easter Sunday of `year`.
///
/// # Examples
///
/// ```
/// use busdate_core::calendar::easter_sunday;
/// use busdate_core::types::Date;
///
/// assert_eq!(easter_sunday(2016), Date::from_ymd(2016, 3, 27).unwrap());
/// ```
pub fn easter_sunday(year: i32) -> Date {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    Date::from_serial_date(SerialDate::from_civil(year, month as u32, day as u32))
}

/// The six TARGET holidays of `year` as an explicit set.
///
/// ```
/// use busdate_core::calendar::target_days;
/// use busdate_core::types::Date;
///
/// let days = target_days(2016);
/// assert_eq!(days.len(), 6);
/// assert!(days.contains(Date::from_ymd(2016, 3, 25).unwrap())); // Good Friday
/// ```
pub fn target_days(year: i32) -> Holidays {
    let easter = easter_sunday(year);
    let fixed = [(1, 1), (5, 1), (12, 25), (12, 26)]
        .into_iter()
        .map(|(m, d)| Date::from_serial_date(SerialDate::from_civil(year, m, d)));
    Holidays::new(fixed.chain([easter.add_days(-2), easter.add_days(1)]))
}

/// Rule-based TARGET2 calendar valid for every year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TargetCalendar;

impl HolidayCalendar for TargetCalendar {
    fn is_holiday(&self, date: Date) -> bool {
        let (year, month, day) = date.to_ymd();
        if matches!((month, day), (1, 1) | (5, 1) | (12, 25) | (12, 26)) {
            return true;
        }
        // Easter-anchored holidays fall in March or April
        if !matches!(month, 3 | 4) {
            return false;
        }
        let easter = easter_sunday(year);
        date == easter.add_days(-2) || date == easter.add_days(1)
    }
}
