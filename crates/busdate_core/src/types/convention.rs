//! Business day conventions for date adjustment.
//!
//! Each convention is a direct rule over a date and a [`HolidayCalendar`].
//! All conventions except `Imm` and `CdsImm` are idempotent once a business
//! day is reached.

use std::fmt;
use std::str::FromStr;

use super::error::ConventionError;
use super::serial::SerialDate;
use super::time::Date;
use crate::calendar::HolidayCalendar;

/// Business Day Convention for date adjustments.
///
/// Defines how to adjust dates that fall on non-business days (weekends, holidays).
///
/// # Examples
///
/// ```
/// use busdate_core::calendar::TargetCalendar;
/// use busdate_core::types::{BusinessDayConvention, Date};
///
/// let new_year = Date::from_ymd(2016, 1, 1).unwrap();
/// let conv: BusinessDayConvention = "modfollow".parse().unwrap();
/// assert_eq!(conv, BusinessDayConvention::ModifiedFollowing);
/// assert_eq!(conv.adjust(new_year, &TargetCalendar), Date::from_ymd(2016, 1, 4).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BusinessDayConvention {
    /// Do not adjust the date.
    #[default]
    Unadjusted,

    /// Move to the next business day.
    Following,

    /// Move to the previous business day.
    Preceding,

    /// Move to the next business day, unless it crosses a month boundary.
    ///
    /// If moving forward would cross into a new month, move backward
    /// to the previous business day instead.
    ModifiedFollowing,

    /// Move to the previous business day, unless it crosses a month boundary.
    ///
    /// If moving backward would cross into a previous month, move forward
    /// to the next business day instead.
    ModifiedPreceding,

    /// First business day of the date's month.
    StartOfMonth,

    /// Last business day of the date's month.
    EndOfMonth,

    /// Third Wednesday of the date's month, regardless of holidays.
    Imm,

    /// The 20th of the date's month, regardless of holidays.
    CdsImm,
}

/// Accepted spellings after upper-casing and removing `/ - _ .` and blanks.
pub(crate) const ALIASES: &[(&str, BusinessDayConvention)] = &[
    ("NO", BusinessDayConvention::Unadjusted),
    ("NONE", BusinessDayConvention::Unadjusted),
    ("UNADJUSTED", BusinessDayConvention::Unadjusted),
    ("U", BusinessDayConvention::Unadjusted),
    ("FOLLOW", BusinessDayConvention::Following),
    ("FOLLOWING", BusinessDayConvention::Following),
    ("FLW", BusinessDayConvention::Following),
    ("F", BusinessDayConvention::Following),
    ("PREVIOUS", BusinessDayConvention::Preceding),
    ("PREV", BusinessDayConvention::Preceding),
    ("PRV", BusinessDayConvention::Preceding),
    ("PRECEDING", BusinessDayConvention::Preceding),
    ("P", BusinessDayConvention::Preceding),
    ("MODFOLLOW", BusinessDayConvention::ModifiedFollowing),
    ("MODFOLLOWING", BusinessDayConvention::ModifiedFollowing),
    ("MODFLW", BusinessDayConvention::ModifiedFollowing),
    ("MODIFIEDFOLLOWING", BusinessDayConvention::ModifiedFollowing),
    ("MF", BusinessDayConvention::ModifiedFollowing),
    ("MODPREVIOUS", BusinessDayConvention::ModifiedPreceding),
    ("MODPREV", BusinessDayConvention::ModifiedPreceding),
    ("MODPRV", BusinessDayConvention::ModifiedPreceding),
    ("MODIFIEDPRECEDING", BusinessDayConvention::ModifiedPreceding),
    ("MODPRECEDING", BusinessDayConvention::ModifiedPreceding),
    ("MP", BusinessDayConvention::ModifiedPreceding),
    ("STARTOFMONTH", BusinessDayConvention::StartOfMonth),
    ("SOM", BusinessDayConvention::StartOfMonth),
    ("ENDOFMONTH", BusinessDayConvention::EndOfMonth),
    ("EOM", BusinessDayConvention::EndOfMonth),
    ("IMM", BusinessDayConvention::Imm),
    ("CDSIMM", BusinessDayConvention::CdsImm),
    ("CDS", BusinessDayConvention::CdsImm),
];

/// Upper-cases and drops the separators ignored in convention names.
pub(crate) fn normalise_name(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '/' | '-' | '_' | '.' | ' '))
        .collect::<String>()
        .to_uppercase()
}

impl BusinessDayConvention {
    /// Every convention, in declaration order.
    pub const ALL: [BusinessDayConvention; 9] = [
        BusinessDayConvention::Unadjusted,
        BusinessDayConvention::Following,
        BusinessDayConvention::Preceding,
        BusinessDayConvention::ModifiedFollowing,
        BusinessDayConvention::ModifiedPreceding,
        BusinessDayConvention::StartOfMonth,
        BusinessDayConvention::EndOfMonth,
        BusinessDayConvention::Imm,
        BusinessDayConvention::CdsImm,
    ];

    /// Returns the standard name for this convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use busdate_core::types::BusinessDayConvention;
    ///
    /// assert_eq!(BusinessDayConvention::Following.name(), "Following");
    /// assert_eq!(BusinessDayConvention::ModifiedFollowing.name(), "Modified Following");
    /// ```
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
            BusinessDayConvention::StartOfMonth => "Start of Month",
            BusinessDayConvention::EndOfMonth => "End of Month",
            BusinessDayConvention::Imm => "IMM",
            BusinessDayConvention::CdsImm => "CDS IMM",
        }
    }

    /// Returns a short code for this convention.
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            BusinessDayConvention::Unadjusted => "U",
            BusinessDayConvention::Following => "F",
            BusinessDayConvention::Preceding => "P",
            BusinessDayConvention::ModifiedFollowing => "MF",
            BusinessDayConvention::ModifiedPreceding => "MP",
            BusinessDayConvention::StartOfMonth => "SOM",
            BusinessDayConvention::EndOfMonth => "EOM",
            BusinessDayConvention::Imm => "IMM",
            BusinessDayConvention::CdsImm => "CDS",
        }
    }

    /// Adjusts `date` under this convention on `calendar`.
    pub fn adjust<C: HolidayCalendar + ?Sized>(&self, date: Date, calendar: &C) -> Date {
        match self {
            BusinessDayConvention::Unadjusted => date,
            BusinessDayConvention::Following => following(date, calendar),
            BusinessDayConvention::Preceding => preceding(date, calendar),
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = following(date, calendar);
                if adjusted.month() == date.month() {
                    adjusted
                } else {
                    preceding(date, calendar)
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = preceding(date, calendar);
                if adjusted.month() == date.month() {
                    adjusted
                } else {
                    following(date, calendar)
                }
            }
            BusinessDayConvention::StartOfMonth => following(first_of_month(date), calendar),
            BusinessDayConvention::EndOfMonth => preceding(date.end_of_month(), calendar),
            BusinessDayConvention::Imm => {
                let first = first_of_month(date);
                // Monday = 0, Wednesday = 2
                let to_wednesday = (2 - first.weekday() as i32).rem_euclid(7);
                first.add_days(to_wednesday + 14)
            }
            BusinessDayConvention::CdsImm => {
                let (y, m, _) = date.to_ymd();
                Date::from_serial_date(SerialDate::from_civil(y, m, 20))
            }
        }
    }
}

fn first_of_month(date: Date) -> Date {
    let (y, m, _) = date.to_ymd();
    Date::from_serial_date(SerialDate::from_civil(y, m, 1))
}

fn following<C: HolidayCalendar + ?Sized>(mut date: Date, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(1);
    }
    date
}

fn preceding<C: HolidayCalendar + ?Sized>(mut date: Date, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(-1);
    }
    date
}

impl Date {
    /// Adjusts the date under `convention` on `calendar`.
    pub fn adjust<C: HolidayCalendar + ?Sized>(
        self,
        convention: BusinessDayConvention,
        calendar: &C,
    ) -> Date {
        convention.adjust(self, calendar)
    }

    /// Next business day on or after the date.
    pub fn adjust_follow<C: HolidayCalendar + ?Sized>(self, calendar: &C) -> Date {
        following(self, calendar)
    }

    /// Previous business day on or before the date.
    pub fn adjust_previous<C: HolidayCalendar + ?Sized>(self, calendar: &C) -> Date {
        preceding(self, calendar)
    }

    /// Modified following adjustment.
    pub fn adjust_mod_follow<C: HolidayCalendar + ?Sized>(self, calendar: &C) -> Date {
        BusinessDayConvention::ModifiedFollowing.adjust(self, calendar)
    }

    /// Modified preceding adjustment.
    pub fn adjust_mod_previous<C: HolidayCalendar + ?Sized>(self, calendar: &C) -> Date {
        BusinessDayConvention::ModifiedPreceding.adjust(self, calendar)
    }
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BusinessDayConvention {
    type Err = ConventionError;

    /// Parses a business day convention (case-insensitive, ignoring
    /// `/ - _ .` and blanks).
    ///
    /// Standard names and codes are accepted as well as the short forms
    /// used in date expressions, e.g. `"MODFLW"`, `"PREV"`, `"CDS"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalise_name(s);
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, conv)| *conv)
            .ok_or_else(|| ConventionError::UnknownBusinessDay(s.to_string()))
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::BusinessDayConvention;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for BusinessDayConvention {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for BusinessDayConvention {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            BusinessDayConvention::from_str(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Holidays, NoHolidays, TargetCalendar};

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_adjust_new_year_on_target() {
        use BusinessDayConvention::*;
        let jan01 = ymd(2016, 1, 1);
        let cal = TargetCalendar;
        assert_eq!(Unadjusted.adjust(jan01, &cal), jan01);
        assert_eq!(Following.adjust(jan01, &cal), ymd(2016, 1, 4));
        assert_eq!(ModifiedFollowing.adjust(jan01, &cal), ymd(2016, 1, 4));
        assert_eq!(Preceding.adjust(jan01, &cal), ymd(2015, 12, 31));
        assert_eq!(ModifiedPreceding.adjust(jan01, &cal), ymd(2016, 1, 4));
        assert_eq!(StartOfMonth.adjust(jan01, &cal), ymd(2016, 1, 4));
        assert_eq!(EndOfMonth.adjust(jan01, &cal), ymd(2016, 1, 29));
        assert_eq!(Imm.adjust(jan01, &cal), ymd(2016, 1, 20));
        assert_eq!(CdsImm.adjust(jan01, &cal), ymd(2016, 1, 20));
    }

    #[test]
    fn test_modified_following_stays_in_month() {
        // 2016-04-30 is a Saturday
        let d = ymd(2016, 4, 30);
        assert_eq!(d.adjust_follow(&NoHolidays), ymd(2016, 5, 2));
        assert_eq!(d.adjust_mod_follow(&NoHolidays), ymd(2016, 4, 29));
        assert_eq!(ymd(2016, 3, 12).adjust_mod_follow(&TargetCalendar), ymd(2016, 3, 14));
    }

    #[test]
    fn test_modified_preceding_stays_in_month() {
        // 2016-05-01 is a Sunday
        let d = ymd(2016, 5, 1);
        assert_eq!(d.adjust_previous(&NoHolidays), ymd(2016, 4, 29));
        assert_eq!(d.adjust_mod_previous(&NoHolidays), ymd(2016, 5, 2));
    }

    #[test]
    fn test_imm_is_third_wednesday() {
        for month in 1..=12 {
            let imm = ymd(2017, month, 9).adjust(BusinessDayConvention::Imm, &NoHolidays);
            assert_eq!(imm.weekday(), 2);
            assert!((15..=21).contains(&imm.day()));
            assert_eq!(imm.month(), month);
        }
        assert_eq!(
            ymd(2016, 3, 31).adjust(BusinessDayConvention::Imm, &NoHolidays),
            ymd(2016, 3, 16)
        );
    }

    #[test]
    fn test_adjustment_is_idempotent() {
        let cal = Holidays::new([ymd(2016, 12, 30), ymd(2017, 1, 2)]);
        let mut date = ymd(2016, 12, 1);
        while date < ymd(2017, 2, 1) {
            for conv in BusinessDayConvention::ALL {
                let once = conv.adjust(date, &cal);
                assert_eq!(conv.adjust(once, &cal), once, "{} on {}", conv, date);
            }
            date = date.add_days(1);
        }
    }

    #[test]
    fn test_bdc_name_and_code() {
        assert_eq!(BusinessDayConvention::Preceding.name(), "Preceding");
        assert_eq!(BusinessDayConvention::EndOfMonth.code(), "EOM");
        assert_eq!(format!("{}", BusinessDayConvention::CdsImm), "CDS IMM");
    }

    #[test]
    fn test_bdc_from_str_aliases() {
        use BusinessDayConvention::*;
        let cases = [
            ("NO", Unadjusted),
            ("none", Unadjusted),
            ("follow", Following),
            ("FLW", Following),
            ("F", Following),
            ("previous", Preceding),
            ("PREV", Preceding),
            ("prv", Preceding),
            ("MODFLW", ModifiedFollowing),
            ("modfollow", ModifiedFollowing),
            ("Modified Following", ModifiedFollowing),
            ("mod_previous", ModifiedPreceding),
            ("MP", ModifiedPreceding),
            ("start_of_month", StartOfMonth),
            ("eom", EndOfMonth),
            ("IMM", Imm),
            ("cds", CdsImm),
            ("CDS-IMM", CdsImm),
        ];
        for (text, expected) in cases {
            assert_eq!(text.parse::<BusinessDayConvention>().unwrap(), expected, "{}", text);
        }
    }

    #[test]
    fn test_bdc_names_parse_back() {
        for conv in BusinessDayConvention::ALL {
            assert_eq!(conv.name().parse::<BusinessDayConvention>().unwrap(), conv);
            assert_eq!(conv.code().parse::<BusinessDayConvention>().unwrap(), conv);
        }
    }

    #[test]
    fn test_bdc_from_str_invalid() {
        assert_eq!(
            "XYZ".parse::<BusinessDayConvention>(),
            Err(ConventionError::UnknownBusinessDay("XYZ".to_string()))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_bdc_serde_round_trip() {
        for conv in BusinessDayConvention::ALL {
            let json = serde_json::to_string(&conv).unwrap();
            let parsed: BusinessDayConvention = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, conv);
        }
        let parsed: BusinessDayConvention = serde_json::from_str("\"MF\"").unwrap();
        assert_eq!(parsed, BusinessDayConvention::ModifiedFollowing);
    }
}
