//! Business periods: signed years, months, days and business days.
//!
//! # Grammar
//!
//! ```text
//! period := 'ON' | 'TN' | 'DD' | token+
//! token  := sign? digits unit
//! unit   := 'Y' | 'Q' | 'M' | 'W' | 'D' | 'B'   (or YEARS, QUARTERS, MONTHS, ...)
//! ```
//!
//! Parsing ignores case and blanks. `Q` adds three months and `W` seven days.
//! The business-day token must come last and carries its own sign. Within
//! the year/month/day group an unsigned token takes the sign of the group's
//! first token, so `"-1Y6M"` reads as minus one year and six months while
//! `"1Y-6M"` stays mixed.
//!
//! # Examples
//!
//! ```
//! use busdate_core::types::Period;
//!
//! let p: Period = "1y6m".parse().unwrap();
//! assert_eq!(p, Period::new(1, 6, 0, 0));
//! assert_eq!(p.to_string(), "1Y6M");
//!
//! assert_eq!(Period::parse("18M").unwrap(), Period::new(0, 18, 0, 0));
//! assert_eq!(Period::parse("2Q").unwrap().to_string(), "6M");
//! assert_eq!(Period::parse("ON").unwrap(), Period::from_business_days(1));
//! assert!(Period::parse("2B2D").is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use super::error::PeriodError;
use super::serial::SerialDate;
use super::time::Date;
use crate::calendar::NoHolidays;

/// Signed calendar period.
///
/// Equality and hashing compare `(12 * years + months, days, business_days)`,
/// so `12M == 1Y` while the stored split is kept as constructed.
///
/// Components are `i32`. Parsing rejects amounts that do not fit, and the
/// `Add`, `Sub`, `Neg` and `Mul` operators saturate at the `i32` bounds.
///
/// Ordering is partial and approximate: both periods are applied to
/// 2000-01-01 with the weekend-only calendar and the resulting dates are
/// compared. Periods that land on the same date without being equal (for
/// instance `1M` and `31D`) are incomparable.
///
/// ```
/// use busdate_core::types::Period;
///
/// let p = |s: &str| Period::parse(s).unwrap();
/// assert!(p("2Y") < p("10Y"));
/// assert!(p("2Y") < p("1M") * 24 + p("1D"));
/// assert!(!(p("3Y") < p("1Y")));
/// assert_eq!(p("1M").partial_cmp(&p("31D")), None);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Period {
    years: i32,
    months: i32,
    days: i32,
    business_days: i32,
}

/// 2000-01-01.
const REFERENCE_DATE: Date = Date::from_serial_date(SerialDate::new(36526));

impl Period {
    /// Creates a period from explicit components. Months are not carried
    /// into years.
    #[inline]
    pub const fn new(years: i32, months: i32, days: i32, business_days: i32) -> Self {
        Period {
            years,
            months,
            days,
            business_days,
        }
    }

    /// `n` years.
    pub const fn from_years(n: i32) -> Self {
        Period::new(n, 0, 0, 0)
    }

    /// `n` months.
    pub const fn from_months(n: i32) -> Self {
        Period::new(0, n, 0, 0)
    }

    /// `n` calendar days.
    pub const fn from_days(n: i32) -> Self {
        Period::new(0, 0, n, 0)
    }

    /// `n` business days.
    pub const fn from_business_days(n: i32) -> Self {
        Period::new(0, 0, 0, n)
    }

    /// Builds a period from either a period string or explicit components.
    ///
    /// A blank `text` means no string was given.
    ///
    /// # Errors
    /// `PeriodError::ConflictingInput` if both a string and non-zero
    /// components are supplied, or any parse error of `text`.
    ///
    /// ```
    /// use busdate_core::types::Period;
    ///
    /// assert_eq!(Period::try_new("1Y", Period::default()).unwrap(), Period::from_years(1));
    /// assert_eq!(Period::try_new("", Period::from_days(3)).unwrap(), Period::from_days(3));
    /// assert!(Period::try_new("1Y", Period::from_days(3)).is_err());
    /// ```
    pub fn try_new(text: &str, components: Period) -> Result<Self, PeriodError> {
        let blank = text.trim().is_empty();
        match (blank, components.is_zero()) {
            (true, _) => Ok(components),
            (false, true) => Period::parse(text),
            (false, false) => Err(PeriodError::ConflictingInput(text.to_string())),
        }
    }

    /// Parses a period string.
    ///
    /// # Errors
    /// `PeriodError::Empty` for blank input and `PeriodError::Parse` for
    /// anything outside the grammar or any component that does not fit an
    /// `i32` once units are scaled and months reduced.
    pub fn parse(text: &str) -> Result<Self, PeriodError> {
        let cleaned: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        match cleaned.as_str() {
            "" => return Err(PeriodError::Empty),
            "ON" => return Ok(Period::from_business_days(1)),
            "TN" => return Ok(Period::from_business_days(2)),
            "DD" => return Ok(Period::from_business_days(3)),
            _ => {}
        }

        // accumulated as (years, months, days) in i64, narrowed at the end
        let mut totals = [0i64; 3];
        let mut business_days = 0i64;
        let mut group_sign: Option<i64> = None;
        let mut seen_business_days = false;
        let overflow = || PeriodError::parse(text, "amount out of range");

        for token in Tokens::new(&cleaned) {
            let Token { sign, amount, unit } = token.map_err(|reason| PeriodError::parse(text, reason))?;
            if seen_business_days {
                return Err(PeriodError::parse(text, "business days must be the last token"));
            }
            let amount = i64::from(amount);
            if unit == Unit::BusinessDays {
                business_days = sign.unwrap_or(1) * amount;
                seen_business_days = true;
                continue;
            }
            let group = *group_sign.get_or_insert(sign.unwrap_or(1));
            let value = sign.unwrap_or(group) * amount;
            let (slot, scale) = match unit {
                Unit::Years => (0, 1),
                Unit::Quarters => (1, 3),
                Unit::Months => (1, 1),
                Unit::Weeks => (2, 7),
                Unit::Days | Unit::BusinessDays => (2, 1),
            };
            totals[slot] = value
                .checked_mul(scale)
                .and_then(|v| totals[slot].checked_add(v))
                .ok_or_else(overflow)?;
        }

        let [mut years, mut months, days] = totals;
        // strings are reduced on ingestion
        if months.abs() >= 12 {
            years = years.checked_add(months / 12).ok_or_else(overflow)?;
            months %= 12;
        }
        let narrow = |v: i64| i32::try_from(v).map_err(|_| overflow());
        Ok(Period::new(
            narrow(years)?,
            narrow(months)?,
            narrow(days)?,
            narrow(business_days)?,
        ))
    }

    /// Year component.
    #[inline]
    pub const fn years(&self) -> i32 {
        self.years
    }

    /// Month component.
    #[inline]
    pub const fn months(&self) -> i32 {
        self.months
    }

    /// Calendar-day component.
    #[inline]
    pub const fn days(&self) -> i32 {
        self.days
    }

    /// Business-day component.
    #[inline]
    pub const fn business_days(&self) -> i32 {
        self.business_days
    }

    /// `12 * years + months`, widened so it cannot overflow.
    #[inline]
    pub const fn total_months(&self) -> i64 {
        12 * self.years as i64 + self.months as i64
    }

    /// True if every component is zero.
    pub const fn is_zero(&self) -> bool {
        self.total_months() == 0 && self.days == 0 && self.business_days == 0
    }

    /// Componentwise absolute value.
    pub fn abs(&self) -> Period {
        Period::new(
            self.years.saturating_abs(),
            self.months.saturating_abs(),
            self.days.saturating_abs(),
            self.business_days.saturating_abs(),
        )
    }

    fn key(&self) -> (i64, i32, i32) {
        (self.total_months(), self.days, self.business_days)
    }
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Period {}

impl Hash for Period {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        let lhs = REFERENCE_DATE.add_period(self, &NoHolidays);
        let rhs = REFERENCE_DATE.add_period(other, &NoHolidays);
        match lhs.cmp(&rhs) {
            Ordering::Equal => None,
            ordering => Some(ordering),
        }
    }
}

impl Add for Period {
    type Output = Period;

    fn add(self, rhs: Period) -> Period {
        Period::new(
            self.years.saturating_add(rhs.years),
            self.months.saturating_add(rhs.months),
            self.days.saturating_add(rhs.days),
            self.business_days.saturating_add(rhs.business_days),
        )
    }
}

impl Sub for Period {
    type Output = Period;

    fn sub(self, rhs: Period) -> Period {
        self + -rhs
    }
}

impl Neg for Period {
    type Output = Period;

    fn neg(self) -> Period {
        Period::new(
            self.years.saturating_neg(),
            self.months.saturating_neg(),
            self.days.saturating_neg(),
            self.business_days.saturating_neg(),
        )
    }
}

impl Mul<i32> for Period {
    type Output = Period;

    fn mul(self, n: i32) -> Period {
        Period::new(
            self.years.saturating_mul(n),
            self.months.saturating_mul(n),
            self.days.saturating_mul(n),
            self.business_days.saturating_mul(n),
        )
    }
}

impl Mul<Period> for i32 {
    type Output = Period;

    fn mul(self, period: Period) -> Period {
        period * self
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s)
    }
}

impl fmt::Display for Period {
    /// Renders the grammar form, e.g. `1Y6M`, `-1Y6M`, `1Y-6M3D`, `3M2B`.
    ///
    /// A later year/month/day part only shows its sign when it differs from
    /// the first part's, so the output parses back to the same period.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<(i32, char)> = [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')]
            .into_iter()
            .filter(|(n, _)| *n != 0)
            .collect();

        if let Some(&(first, _)) = parts.first() {
            for (i, (n, unit)) in parts.iter().enumerate() {
                if i == 0 {
                    write!(f, "{}{}", n, unit)?;
                } else if n.signum() != first.signum() {
                    write!(f, "{:+}{}", n, unit)?;
                } else {
                    write!(f, "{}{}", n.unsigned_abs(), unit)?;
                }
            }
        }

        if self.business_days != 0 {
            write!(f, "{}B", self.business_days)?;
        } else if parts.is_empty() {
            f.write_str("0D")?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Period;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Period {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Period {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Period::parse(&s).map_err(de::Error::custom)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Years,
    Quarters,
    Months,
    Weeks,
    Days,
    BusinessDays,
}

impl Unit {
    fn from_word(word: &str) -> Option<Unit> {
        match word {
            "Y" | "YEAR" | "YEARS" => Some(Unit::Years),
            "Q" | "QUARTER" | "QUARTERS" => Some(Unit::Quarters),
            "M" | "MONTH" | "MONTHS" => Some(Unit::Months),
            "W" | "WEEK" | "WEEKS" => Some(Unit::Weeks),
            "D" | "DAY" | "DAYS" => Some(Unit::Days),
            "B" | "BD" | "BUSINESSDAY" | "BUSINESSDAYS" => Some(Unit::BusinessDays),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Token {
    sign: Option<i64>,
    amount: i32,
    unit: Unit,
}

/// Splits a cleaned, upper-case period string into signed tokens.
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens { rest: text }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map_or(self.rest.len(), |(i, _)| i);
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        head
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let sign = match self.rest.chars().next() {
            Some('+') => Some(1),
            Some('-') => Some(-1),
            _ => None,
        };
        if sign.is_some() {
            self.rest = &self.rest[1..];
        }
        let digits = self.take_while(|c| c.is_ascii_digit());
        let word = self.take_while(|c| c.is_ascii_alphabetic());

        let token = if digits.is_empty() {
            Err(if word.is_empty() {
                format!("unexpected character at '{}'", self.rest)
            } else {
                format!("unit '{}' without amount", word)
            })
        } else if word.is_empty() {
            Err(format!("amount '{}' without unit", digits))
        } else {
            match (digits.parse::<i32>(), Unit::from_word(word)) {
                (Ok(amount), Some(unit)) => Ok(Token { sign, amount, unit }),
                (Err(e), _) => Err(format!("invalid amount '{}': {}", digits, e)),
                (_, None) => Err(format!("unknown unit '{}'", word)),
            }
        };
        if token.is_err() {
            // stop after the first error
            self.rest = "";
        }
        Some(token)
    }
}
