//! Source of "today".
//!
//! Everything that defaults to the current date takes a [`Clock`] so that
//! results are reproducible under a [`FixedClock`].

use chrono::{Datelike, Local};

use super::serial::SerialDate;
use super::time::Date;

/// Supplies the current date.
pub trait Clock {
    /// Today's date.
    fn today(&self) -> Date;
}

impl<K: Clock + ?Sized> Clock for &K {
    fn today(&self) -> Date {
        (**self).today()
    }
}

/// Local system clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        let now = Local::now().date_naive();
        Date::from_serial_date(SerialDate::from_civil(now.year(), now.month(), now.day()))
    }
}

/// Clock pinned to one date.
///
/// ```
/// use busdate_core::types::{Clock, Date, FixedClock};
///
/// let d = Date::from_ymd(2016, 1, 1).unwrap();
/// assert_eq!(FixedClock::new(d).today(), d);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedClock(Date);

impl FixedClock {
    /// Creates a clock that always reports `date`.
    pub const fn new(date: Date) -> Self {
        FixedClock(date)
    }

    /// The pinned date.
    pub const fn date(&self) -> Date {
        self.0
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_matches_chrono() {
        let expected = Local::now().date_naive();
        let today = SystemClock.today();
        // tolerate a midnight rollover between the two reads
        let diff = i64::from(today.to_serial())
            - i64::from(Date::try_from(expected).unwrap().to_serial());
        assert!((0..=1).contains(&diff));
    }

    #[test]
    fn test_fixed_clock() {
        let d = Date::from_ymd(2016, 2, 29).unwrap();
        let clock = FixedClock::new(d);
        assert_eq!(clock.today(), d);
        assert_eq!(clock.date(), d);
        assert_eq!(Date::today_with(&clock), d);
        let dyn_clock: &dyn Clock = &clock;
        assert_eq!(dyn_clock.today(), d);
    }
}
