//! Immutable holiday set.

use std::collections::HashSet;
use std::iter::FromIterator;

use tracing::debug;

use super::HolidayCalendar;
use crate::types::error::DateError;
use crate::types::serial::SerialDate;
use crate::types::Date;

/// Immutable set of holiday dates with O(1) membership.
///
/// Empty by default. Once built a `Holidays` value is never mutated, so it
/// can be shared freely between threads and computations.
///
/// # Examples
///
/// ```
/// use busdate_core::calendar::{HolidayCalendar, Holidays};
/// use busdate_core::types::Date;
///
/// let holidays = Holidays::try_from_strs(["20160704", "2016-12-26"]).unwrap();
/// assert_eq!(holidays.len(), 2);
/// assert!(holidays.is_holiday(Date::from_ymd(2016, 7, 4).unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Holidays {
    days: HashSet<SerialDate>,
}

impl Holidays {
    /// Builds a holiday set from dates.
    pub fn new<I: IntoIterator<Item = Date>>(dates: I) -> Self {
        let days: HashSet<SerialDate> = dates.into_iter().map(Date::serial).collect();
        debug!(count = days.len(), "built holiday set");
        Holidays { days }
    }

    /// Builds a holiday set from raw serial numbers.
    pub fn from_serials<I: IntoIterator<Item = i32>>(serials: I) -> Self {
        Holidays {
            days: serials.into_iter().map(SerialDate::new).collect(),
        }
    }

    /// Builds a holiday set from date strings in any plain format accepted by
    /// [`Date::parse`].
    ///
    /// # Errors
    /// Returns the first parse failure.
    pub fn try_from_strs<I, S>(texts: I) -> Result<Self, DateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dates = texts
            .into_iter()
            .map(|s| Date::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Holidays::new(dates))
    }

    /// True if `date` is in the set.
    #[inline]
    pub fn contains(&self, date: Date) -> bool {
        self.days.contains(&date.serial())
    }

    /// Number of holidays in the set.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// True if the set holds no holidays.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Holidays in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Date> {
        let mut serials: Vec<SerialDate> = self.days.iter().copied().collect();
        serials.sort_unstable();
        serials.into_iter().map(Date::from_serial_date)
    }

    /// Returns a new set containing the holidays of both sets.
    ///
    /// ```
    /// use busdate_core::calendar::{target_days, Holidays};
    ///
    /// let both = target_days(2016).union(&target_days(2017));
    /// assert_eq!(both.len(), 12);
    /// ```
    pub fn union(&self, other: &Holidays) -> Holidays {
        Holidays {
            days: self.days.union(&other.days).copied().collect(),
        }
    }
}

impl HolidayCalendar for Holidays {
    #[inline]
    fn is_holiday(&self, date: Date) -> bool {
        self.contains(date)
    }
}

impl FromIterator<Date> for Holidays {
    fn from_iter<I: IntoIterator<Item = Date>>(iter: I) -> Self {
        Holidays::new(iter)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Holidays;
    use crate::types::Date;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Holidays {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_seq(self.iter())
        }
    }

    impl<'de> Deserialize<'de> for Holidays {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let dates = Vec::<Date>::deserialize(deserializer)?;
            Ok(Holidays::new(dates))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_default_is_empty() {
        let holidays = Holidays::default();
        assert!(holidays.is_empty());
        assert_eq!(holidays.len(), 0);
        assert!(!holidays.contains(ymd(2016, 1, 1)));
    }

    #[test]
    fn test_construction_paths_agree() {
        let from_dates = Holidays::new([ymd(2016, 1, 1), ymd(2016, 12, 25)]);
        let from_strs = Holidays::try_from_strs(["20160101", "12/25/2016"]).unwrap();
        let from_serials = Holidays::from_serials([
            ymd(2016, 1, 1).to_serial(),
            ymd(2016, 12, 25).to_serial(),
        ]);
        assert_eq!(from_dates, from_strs);
        assert_eq!(from_dates, from_serials);
    }

    #[test]
    fn test_try_from_strs_rejects_garbage() {
        assert!(Holidays::try_from_strs(["20160101", "not a date"]).is_err());
    }

    #[test]
    fn test_duplicates_collapse() {
        let holidays: Holidays = [ymd(2016, 1, 1), ymd(2016, 1, 1)].into_iter().collect();
        assert_eq!(holidays.len(), 1);
    }

    #[test]
    fn test_iter_is_ascending() {
        let holidays = Holidays::new([ymd(2016, 12, 25), ymd(2016, 1, 1), ymd(2016, 5, 1)]);
        let dates: Vec<Date> = holidays.iter().collect();
        assert_eq!(dates, vec![ymd(2016, 1, 1), ymd(2016, 5, 1), ymd(2016, 12, 25)]);
    }

    #[test]
    fn test_union() {
        let a = Holidays::new([ymd(2016, 1, 1)]);
        let b = Holidays::new([ymd(2016, 1, 1), ymd(2016, 7, 4)]);
        let u = a.union(&b);
        assert_eq!(u.len(), 2);
        assert!(u.contains(ymd(2016, 7, 4)));
        // operands are untouched
        assert_eq!(a.len(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_sorted_date_list() {
        let holidays = Holidays::new([ymd(2016, 12, 25), ymd(2016, 1, 1)]);
        let json = serde_json::to_string(&holidays).unwrap();
        assert_eq!(json, r#"["20160101","20161225"]"#);
        let parsed: Holidays = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, holidays);
    }
}
