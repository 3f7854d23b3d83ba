//! Day count conventions (year fractions).

use std::fmt;
use std::str::FromStr;

use super::convention::normalise_name;
use super::error::ConventionError;
use super::time::Date;

/// Day Count Convention (year fraction convention).
///
/// # Variants
/// - `Thirty360`: 30/360 US bond basis
/// - `ThirtyE360`: 30E/360 Eurobond basis
/// - `Act360`: actual days / 360
/// - `Act365`: actual days / 365
/// - `Act36525`: actual days / 365.25 (the default)
/// - `ActAct`: actual days / days in the year starting at the start date
///
/// Year fractions are signed: swapping start and end negates the result.
///
/// # Usage
///
/// ```
/// use busdate_core::types::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2016, 1, 1).unwrap();
/// let end = Date::from_ymd(2016, 3, 31).unwrap();
///
/// let yf = DayCountConvention::Thirty360.year_fraction(start, end);
/// assert!((yf - 0.25).abs() < 1e-12);
/// assert!((start.get_act_act(end) - 90.0 / 366.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCountConvention {
    /// 30/360 US Bond Basis
    ///
    /// A start day of 31 becomes 30. An end day of 31 becomes 30 only when
    /// the adjusted start day is 30.
    Thirty360,

    /// 30E/360: both day-of-month values are capped at 30.
    ThirtyE360,

    /// Actual/360: actual_days / 360.0
    Act360,

    /// Actual/365 Fixed: actual_days / 365.0
    Act365,

    /// Actual/365.25: actual_days / 365.25
    #[default]
    Act36525,

    /// Actual/Actual: actual_days / days in `[start, start + 1Y)`.
    ActAct,
}

impl DayCountConvention {
    /// Every convention, in declaration order.
    pub const ALL: [DayCountConvention; 6] = [
        DayCountConvention::Thirty360,
        DayCountConvention::ThirtyE360,
        DayCountConvention::Act360,
        DayCountConvention::Act365,
        DayCountConvention::Act36525,
        DayCountConvention::ActAct,
    ];

    /// Returns the standard convention name.
    ///
    /// # Examples
    ///
    /// ```
    /// use busdate_core::types::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::Act365.name(), "ACT/365");
    /// assert_eq!(DayCountConvention::Act36525.name(), "ACT/365.25");
    /// assert_eq!(DayCountConvention::Thirty360.name(), "30/360");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Thirty360 => "30/360",
            DayCountConvention::ThirtyE360 => "30E/360",
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365 => "ACT/365",
            DayCountConvention::Act36525 => "ACT/365.25",
            DayCountConvention::ActAct => "ACT/ACT",
        }
    }

    /// Calculates the year fraction between two dates.
    ///
    /// Returns a negative value when `start > end` instead of panicking.
    ///
    /// # Examples
    ///
    /// ```
    /// use busdate_core::types::{Date, DayCountConvention};
    ///
    /// let start = Date::from_ymd(2017, 1, 1).unwrap();
    /// let end = Date::from_ymd(2018, 1, 1).unwrap();
    ///
    /// let yf = DayCountConvention::Act36525.year_fraction(start, end);
    /// assert_eq!(yf, 365.0 / 365.25);
    /// assert_eq!(DayCountConvention::Act36525.year_fraction(end, start), -yf);
    /// ```
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        let days = start.days_until(end) as f64;
        match self {
            DayCountConvention::Act360 => days / 360.0,
            DayCountConvention::Act365 => days / 365.0,
            DayCountConvention::Act36525 => days / 365.25,
            DayCountConvention::ActAct => {
                let year = start.days_until(start.add_years(1)) as f64;
                days / year
            }
            DayCountConvention::Thirty360 | DayCountConvention::ThirtyE360 => {
                let (first, last, sign) = if start <= end {
                    (start, end, 1.0)
                } else {
                    (end, start, -1.0)
                };
                sign * self.thirty_360_days(first, last) as f64 / 360.0
            }
        }
    }

    fn thirty_360_days(&self, start: Date, end: Date) -> i32 {
        let (y1, m1, d1) = start.to_ymd();
        let (y2, m2, d2) = end.to_ymd();

        let (d1_adj, d2_adj) = match self {
            DayCountConvention::ThirtyE360 => (d1.min(30), d2.min(30)),
            _ => {
                let d1_adj = if d1 == 31 { 30 } else { d1 };
                let d2_adj = if d2 == 31 && d1_adj == 30 { 30 } else { d2 };
                (d1_adj, d2_adj)
            }
        };

        360 * (y2 - y1) + 30 * (m2 as i32 - m1 as i32) + (d2_adj as i32 - d1_adj as i32)
    }
}

impl Date {
    /// Year fraction from this date to `end` under `convention`.
    pub fn day_count(self, end: Date, convention: DayCountConvention) -> f64 {
        convention.year_fraction(self, end)
    }

    /// 30/360 year fraction to `end`.
    pub fn get_30_360(self, end: Date) -> f64 {
        DayCountConvention::Thirty360.year_fraction(self, end)
    }

    /// 30E/360 year fraction to `end`.
    pub fn get_30e_360(self, end: Date) -> f64 {
        DayCountConvention::ThirtyE360.year_fraction(self, end)
    }

    /// ACT/360 year fraction to `end`.
    pub fn get_act_360(self, end: Date) -> f64 {
        DayCountConvention::Act360.year_fraction(self, end)
    }

    /// ACT/365 year fraction to `end`.
    pub fn get_act_365(self, end: Date) -> f64 {
        DayCountConvention::Act365.year_fraction(self, end)
    }

    /// ACT/365.25 year fraction to `end`.
    pub fn get_act_36525(self, end: Date) -> f64 {
        DayCountConvention::Act36525.year_fraction(self, end)
    }

    /// ACT/ACT year fraction to `end`.
    pub fn get_act_act(self, end: Date) -> f64 {
        DayCountConvention::ActAct.year_fraction(self, end)
    }
}

impl FromStr for DayCountConvention {
    type Err = ConventionError;

    /// Parses day count convention from string (case-insensitive, ignoring
    /// `/ - _ .` and blanks).
    ///
    /// Supports multiple aliases for each convention:
    /// - 30/360: "30/360", "30_360", "Thirty360", "30U/360"
    /// - 30E/360: "30E/360", "ThirtyE360", "Eurobond"
    /// - ACT/360: "ACT/360", "Actual/360", "A360"
    /// - ACT/365: "ACT/365", "Actual/365", "A365", "ACT/365F"
    /// - ACT/365.25: "ACT/365.25", "ACT_36525", "A36525"
    /// - ACT/ACT: "ACT/ACT", "Actual/Actual", "AA"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_name(s).as_str() {
            "30360" | "THIRTY360" | "30U360" => Ok(DayCountConvention::Thirty360),
            "30E360" | "THIRTYE360" | "EUROBOND" => Ok(DayCountConvention::ThirtyE360),
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::Act360),
            "ACT365" | "ACTUAL365" | "A365" | "ACT365F" | "ACT365FIXED" => {
                Ok(DayCountConvention::Act365)
            }
            "ACT36525" | "ACTUAL36525" | "A36525" => Ok(DayCountConvention::Act36525),
            "ACTACT" | "ACTUALACTUAL" | "AA" => Ok(DayCountConvention::ActAct),
            _ => Err(ConventionError::UnknownDayCount(s.to_string())),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::DayCountConvention;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for DayCountConvention {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for DayCountConvention {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            DayCountConvention::from_str(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_quarter_from_new_year() {
        let jan01 = ymd(2016, 1, 1);
        let mar31 = ymd(2016, 3, 31);
        let delta = 90.0;
        let total = 366.0;

        assert_relative_eq!(jan01.day_count(mar31, DayCountConvention::default()), delta / 365.25);
        assert_relative_eq!(jan01.get_30_360(mar31), 90.0 / 360.0);
        assert_relative_eq!(jan01.get_act_360(mar31), delta / 360.0);
        assert_relative_eq!(jan01.get_act_365(mar31), delta / 365.0);
        assert_relative_eq!(jan01.get_act_36525(mar31), delta / 365.25);
        assert_relative_eq!(jan01.get_act_act(mar31), delta / total);
    }

    #[test]
    fn test_act_36525_full_year() {
        let yf = ymd(2017, 1, 1).get_act_36525(ymd(2018, 1, 1));
        assert_eq!(yf, 365.0 / 365.25);
    }

    #[test]
    fn test_thirty_360_with_31st_days() {
        // start on the 31st: both ends treated as 30
        let yf = DayCountConvention::Thirty360.year_fraction(ymd(2024, 1, 31), ymd(2024, 3, 31));
        assert_relative_eq!(yf, 60.0 / 360.0);
        // end on the 31st with an ordinary start keeps 31
        let yf = DayCountConvention::Thirty360.year_fraction(ymd(2024, 1, 15), ymd(2024, 3, 31));
        assert_relative_eq!(yf, 76.0 / 360.0);
        // 30E/360 always caps
        let yf = DayCountConvention::ThirtyE360.year_fraction(ymd(2024, 1, 15), ymd(2024, 3, 31));
        assert_relative_eq!(yf, 75.0 / 360.0);
    }

    #[test]
    fn test_reversed_dates_are_negative() {
        let a = ymd(2016, 1, 31);
        let b = ymd(2016, 7, 31);
        for dcc in DayCountConvention::ALL {
            let forward = dcc.year_fraction(a, b);
            assert!(forward > 0.0, "{}", dcc);
            if dcc != DayCountConvention::ActAct {
                assert_relative_eq!(dcc.year_fraction(b, a), -forward);
            }
        }
    }

    #[test]
    fn test_same_date_returns_zero() {
        let d = ymd(2024, 6, 15);
        for dcc in DayCountConvention::ALL {
            assert_eq!(dcc.year_fraction(d, d), 0.0);
        }
    }

    #[test]
    fn test_dcc_from_str() {
        let cases = [
            ("30/360", DayCountConvention::Thirty360),
            ("30_360", DayCountConvention::Thirty360),
            ("30E/360", DayCountConvention::ThirtyE360),
            ("act/360", DayCountConvention::Act360),
            ("Actual/365", DayCountConvention::Act365),
            ("ACT/365.25", DayCountConvention::Act36525),
            ("ACT_36525", DayCountConvention::Act36525),
            ("act_act", DayCountConvention::ActAct),
        ];
        for (text, expected) in cases {
            assert_eq!(text.parse::<DayCountConvention>().unwrap(), expected, "{}", text);
        }
        for dcc in DayCountConvention::ALL {
            assert_eq!(dcc.name().parse::<DayCountConvention>().unwrap(), dcc);
        }
        assert!(matches!(
            "ACT/999".parse::<DayCountConvention>(),
            Err(ConventionError::UnknownDayCount(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_dcc_serde() {
        for dcc in DayCountConvention::ALL {
            let json = serde_json::to_string(&dcc).unwrap();
            let parsed: DayCountConvention = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, dcc);
        }
        let parsed: DayCountConvention = serde_json::from_str("\"Actual/360\"").unwrap();
        assert_eq!(parsed, DayCountConvention::Act360);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn date_strategy() -> impl Strategy<Value = Date> {
            (2000i32..2100i32, 1u32..13u32, 1u32..29u32)
                .prop_filter_map("valid date", |(y, m, d)| Date::from_ymd(y, m, d).ok())
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(1000))]

            #[test]
            fn test_year_fraction_sign_follows_order(
                start in date_strategy(),
                end in date_strategy(),
            ) {
                for dcc in DayCountConvention::ALL {
                    let yf = dcc.year_fraction(start, end);
                    prop_assert!(yf.is_finite());
                    if start <= end {
                        prop_assert!(yf >= 0.0, "{} {} {} = {}", dcc, start, end, yf);
                    } else {
                        prop_assert!(yf <= 0.0, "{} {} {} = {}", dcc, start, end, yf);
                    }
                }
            }

            #[test]
            fn test_act_365_vs_act_360_ratio(
                start in date_strategy(),
                end in date_strategy(),
            ) {
                if start != end {
                    let ratio = start.get_act_365(end) / start.get_act_360(end);
                    assert_relative_eq!(ratio, 360.0 / 365.0, epsilon = 1e-10);
                }
            }
        }
    }
}
