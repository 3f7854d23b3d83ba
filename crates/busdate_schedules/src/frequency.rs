//! Payment frequency enumeration.

use std::fmt;
use std::str::FromStr;

use busdate_core::types::Period;

use super::error::ScheduleError;

/// Named step for ranges and schedules.
///
/// # Examples
///
/// ```
/// use busdate_core::types::Period;
/// use busdate_schedules::Frequency;
///
/// let freq = Frequency::Quarterly;
/// assert_eq!(freq.periods_per_year(), 4);
/// assert_eq!(freq.step(), Period::from_months(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    /// Once per year.
    #[default]
    Annual,
    /// Twice per year.
    SemiAnnual,
    /// Four times per year.
    Quarterly,
    /// Twelve times per year.
    Monthly,
    /// Every seven days.
    Weekly,
    /// Every calendar day.
    Daily,
}

impl Frequency {
    /// Returns the number of periods per year.
    #[inline]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::Weekly => 52,
            Frequency::Daily => 365,
        }
    }

    /// The step period between two grid dates.
    ///
    /// ```
    /// use busdate_schedules::Frequency;
    ///
    /// assert_eq!(Frequency::Annual.step().to_string(), "1Y");
    /// assert_eq!(Frequency::SemiAnnual.step().to_string(), "6M");
    /// assert_eq!(Frequency::Weekly.step().to_string(), "7D");
    /// ```
    pub fn step(&self) -> Period {
        match self {
            Frequency::Annual => Period::from_years(1),
            Frequency::SemiAnnual => Period::from_months(6),
            Frequency::Quarterly => Period::from_months(3),
            Frequency::Monthly => Period::from_months(1),
            Frequency::Weekly => Period::from_days(7),
            Frequency::Daily => Period::from_days(1),
        }
    }

    /// Returns the standard name for this frequency.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
        }
    }
}

impl From<Frequency> for Period {
    fn from(frequency: Frequency) -> Self {
        frequency.step()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    /// Parses frequency from string (case-insensitive).
    ///
    /// Supported formats:
    /// - Annual: "annual", "1y", "yearly", "12m"
    /// - SemiAnnual: "semi-annual", "semiannual", "6m"
    /// - Quarterly: "quarterly", "3m", "1q"
    /// - Monthly: "monthly", "1m"
    /// - Weekly: "weekly", "1w", "7d"
    /// - Daily: "daily", "1d"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "annual" | "1y" | "yearly" | "12m" => Ok(Frequency::Annual),
            "semiannual" | "6m" => Ok(Frequency::SemiAnnual),
            "quarterly" | "3m" | "1q" => Ok(Frequency::Quarterly),
            "monthly" | "1m" => Ok(Frequency::Monthly),
            "weekly" | "1w" | "7d" => Ok(Frequency::Weekly),
            "daily" | "1d" => Ok(Frequency::Daily),
            _ => Err(ScheduleError::UnknownFrequency(s.to_string())),
        }
    }
}
