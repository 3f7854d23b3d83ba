//! Compound date expressions.
//!
//! An expression is a run of period and convention tokens followed by an
//! optional `YYYYMMDD` anchor date, e.g. `"0B3DMODFOLLOW20171231"`. Tokens
//! are applied to the anchor (or to today) from right to left: periods via
//! [`Date::add_period`] on the weekend-only calendar, conventions via
//! [`BusinessDayConvention::adjust`] on the adjustment calendar. The
//! money-market shorthands `ON`, `TN` and `DD` count as period tokens when
//! no digit or sign precedes them.
//!
//! [`DateExpression::scan`] only tokenizes; [`DateExpression::evaluate`]
//! folds the instructions.
//!
//! # Examples
//!
//! ```
//! use busdate_core::calendar::TargetCalendar;
//! use busdate_core::types::{Date, FixedClock};
//!
//! let clock = FixedClock::new(Date::from_ymd(2017, 12, 31).unwrap());
//! let d = Date::parse_expr("3DMODFLW", &clock, &TargetCalendar).unwrap();
//! assert_eq!(d, Date::from_ymd(2018, 1, 1).unwrap());
//! ```

use tracing::{debug, trace};

use super::clock::Clock;
use super::convention::{BusinessDayConvention, ALIASES};
use super::error::DateError;
use super::period::Period;
use super::time::Date;
use crate::calendar::{HolidayCalendar, NoHolidays};

/// One step of a compound expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Add a period on the weekend-only calendar.
    Shift(Period),
    /// Adjust under a business day convention.
    Adjust(BusinessDayConvention),
}

/// Tokenized compound expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateExpression {
    anchor: Option<Date>,
    /// Nearest to the anchor first.
    instructions: Vec<Instruction>,
}

impl DateExpression {
    /// Splits `text` into an anchor date and instructions.
    ///
    /// # Errors
    /// `DateError::Parse` for empty input or any unrecognised token, and the
    /// anchor's own error if the trailing eight digits are not a date.
    ///
    /// ```
    /// use busdate_core::types::{BusinessDayConvention, DateExpression, Instruction, Period};
    ///
    /// let expr = DateExpression::scan("1Y2BMF").unwrap();
    /// assert!(expr.anchor().is_none());
    /// assert_eq!(
    ///     expr.instructions(),
    ///     &[
    ///         Instruction::Adjust(BusinessDayConvention::ModifiedFollowing),
    ///         Instruction::Shift(Period::new(1, 0, 0, 2)),
    ///     ]
    /// );
    /// ```
    pub fn scan(text: &str) -> Result<Self, DateError> {
        let upper: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        if upper.is_empty() {
            return Err(DateError::Parse("empty date expression".to_string()));
        }

        let mut rest = upper.as_str();
        let mut anchor = None;
        if rest.len() >= 8 && rest.as_bytes()[rest.len() - 8..].iter().all(u8::is_ascii_digit) {
            let (head, digits) = rest.split_at(rest.len() - 8);
            anchor = Some(Date::parse(digits)?);
            rest = head;
        }

        let mut instructions = Vec::new();
        while !rest.is_empty() {
            if let Some((alias, conv)) = longest_convention_suffix(rest) {
                instructions.push(Instruction::Adjust(conv));
                rest = &rest[..rest.len() - alias.len()];
                continue;
            }

            if let Some(code) = shorthand_suffix(rest) {
                instructions.push(Instruction::Shift(Period::parse(code)?));
                rest = &rest[..rest.len() - code.len()];
                continue;
            }

            let start = period_run_start(rest);
            let run = &rest[start..];
            if run.is_empty() {
                return Err(DateError::Parse(format!(
                    "unknown token '{}' in '{}'",
                    rest, text
                )));
            }
            // runs are split after each business-day token
            let mut pieces: Vec<&str> = run.split_inclusive('B').collect();
            pieces.reverse();
            for piece in pieces {
                instructions.push(Instruction::Shift(Period::parse(piece)?));
            }
            rest = &rest[..start];
        }

        trace!(input = text, ?anchor, ?instructions, "scanned date expression");
        Ok(DateExpression {
            anchor,
            instructions,
        })
    }

    /// The literal anchor date, if the expression ends with one.
    pub fn anchor(&self) -> Option<Date> {
        self.anchor
    }

    /// Instructions, nearest to the anchor first.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Folds the instructions over the anchor, or over `clock`'s today when
    /// no anchor was given.
    pub fn evaluate<K, C>(&self, clock: &K, calendar: &C) -> Date
    where
        K: Clock + ?Sized,
        C: HolidayCalendar + ?Sized,
    {
        let start = self.anchor.unwrap_or_else(|| clock.today());
        let result = self
            .instructions
            .iter()
            .fold(start, |date, instruction| match instruction {
                Instruction::Shift(period) => date.add_period(period, &NoHolidays),
                Instruction::Adjust(conv) => conv.adjust(date, calendar),
            });
        debug!(%start, %result, steps = self.instructions.len(), "evaluated date expression");
        result
    }
}

/// Longest convention alias that `text` ends with.
fn longest_convention_suffix(text: &str) -> Option<(&'static str, BusinessDayConvention)> {
    ALIASES
        .iter()
        .filter(|(alias, _)| text.ends_with(alias))
        .max_by_key(|(alias, _)| alias.len())
        .copied()
}

/// `ON`, `TN` or `DD` at the end of `text`, unless an amount precedes it.
fn shorthand_suffix(text: &str) -> Option<&'static str> {
    ["ON", "TN", "DD"].into_iter().find(|code| {
        text.strip_suffix(code).is_some_and(|head| {
            !head.ends_with(|c: char| c.is_ascii_digit() || c == '+' || c == '-')
        })
    })
}

/// Start of the maximal trailing run of period characters, moved forward so
/// the run begins with a digit or a sign.
fn period_run_start(text: &str) -> usize {
    let is_period_char = |c: char| c.is_ascii_digit() || "+-YQMWDB".contains(c);
    let mut start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_period_char(*c))
        .last()
        .map_or(text.len(), |(i, _)| i);
    while let Some(c) = text[start..].chars().next() {
        if c.is_ascii_digit() || c == '+' || c == '-' {
            break;
        }
        start += c.len_utf8();
    }
    start
}

impl Date {
    /// Evaluates a compound expression such as `"0B3DMODFOLLOW20171231"`.
    ///
    /// Expressions without an anchor start from `clock`'s today. Convention
    /// tokens adjust on `calendar`.
    ///
    /// # Examples
    ///
    /// ```
    /// use busdate_core::calendar::TargetCalendar;
    /// use busdate_core::types::{Date, SystemClock};
    ///
    /// let d = Date::parse_expr("1W20171231", &SystemClock, &TargetCalendar).unwrap();
    /// assert_eq!(d, Date::from_ymd(2018, 1, 7).unwrap());
    /// assert!(Date::parse_expr("0X3D", &SystemClock, &TargetCalendar).is_err());
    /// ```
    pub fn parse_expr<K, C>(text: &str, clock: &K, calendar: &C) -> Result<Date, DateError>
    where
        K: Clock + ?Sized,
        C: HolidayCalendar + ?Sized,
    {
        Ok(DateExpression::scan(text)?.evaluate(clock, calendar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::TargetCalendar;
    use crate::types::clock::FixedClock;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn eval(text: &str) -> Date {
        let clock = FixedClock::new(ymd(2016, 1, 1));
        Date::parse_expr(text, &clock, &TargetCalendar).unwrap()
    }

    #[test]
    fn test_anchor_only() {
        assert_eq!(eval("20171231"), ymd(2017, 12, 31));
    }

    #[test]
    fn test_convention_tokens() {
        let d = ymd(2017, 12, 31);
        let modf = d.adjust_mod_follow(&TargetCalendar);
        assert_eq!(modf, ymd(2017, 12, 29));
        assert_eq!(eval("0BMODFLW20171231"), modf);
        assert_eq!(eval("0BMODFOLLOW20171231"), modf);
        assert_eq!(eval("MODFOLLOWING20171231"), modf);
        assert_eq!(eval("PREV20171231"), eval("PREVIOUS20171231"));
        assert_eq!(eval("prv20171231"), ymd(2017, 12, 29));
    }

    #[test]
    fn test_period_then_convention() {
        let modf = ymd(2017, 12, 31).adjust_mod_follow(&TargetCalendar);
        assert_eq!(eval("0B3DMODFOLLOW20171231"), modf + Period::from_days(3));
        assert_eq!(eval("0B3D0BMODFOLLOW20171231"), modf + Period::from_days(3));
        assert_eq!(eval("1w20171231"), ymd(2018, 1, 7));
        assert_eq!(eval("-1D20171231"), ymd(2017, 12, 30));
    }

    #[test]
    fn test_convention_after_period() {
        // 2017-12-31 + 1D = 2018-01-01, a TARGET holiday
        assert_eq!(eval("FOLLOW1D20171231"), ymd(2018, 1, 2));
        assert_eq!(eval("EOM1M20171231"), ymd(2018, 1, 31));
    }

    #[test]
    fn test_default_anchor_is_clock_today() {
        assert_eq!(eval("1D"), ymd(2016, 1, 2));
        assert_eq!(eval("MODFLW"), ymd(2016, 1, 4));
        assert_eq!(eval("2B"), ymd(2016, 1, 5));
    }

    #[test]
    fn test_shift_ignores_adjustment_calendar() {
        // 2B from a Thursday on the weekend-only calendar skips 2016-01-01
        // even though TARGET treats it as a holiday
        assert_eq!(eval("2B20151231"), ymd(2016, 1, 4));
    }

    #[test]
    fn test_scan_splits_after_business_days() {
        let expr = DateExpression::scan("0B3D0B20171231").unwrap();
        assert_eq!(expr.anchor(), Some(ymd(2017, 12, 31)));
        assert_eq!(
            expr.instructions(),
            &[
                Instruction::Shift(Period::new(0, 0, 3, 0)),
                Instruction::Shift(Period::default()),
            ]
        );
    }

    #[test]
    fn test_money_market_shorthands() {
        // weekend-only shifts: Sunday 2017-12-31 + 2B is Tuesday
        assert_eq!(eval("TN20171231"), ymd(2018, 1, 2));
        assert_eq!(eval("on20151231"), ymd(2016, 1, 1));
        assert_eq!(eval("0BTN20171231"), ymd(2018, 1, 2));
        assert_eq!(eval("DDMODFLW20171231"), ymd(2018, 1, 3));
        assert_eq!(eval("1YON20151231"), ymd(2017, 1, 1));

        let expr = DateExpression::scan("TN").unwrap();
        assert_eq!(expr.instructions(), &[Instruction::Shift(Period::from_business_days(2))]);
        assert!(DateExpression::scan("3DD20171231").is_err());
    }

    #[test]
    fn test_rejects_unknown_tokens() {
        let clock = FixedClock::new(ymd(2016, 1, 1));
        for bad in ["0X3D", "", "  ", "HELLO20171231", "1D20171331", "3", "1Y!"] {
            assert!(
                Date::parse_expr(bad, &clock, &TargetCalendar).is_err(),
                "'{}' should be rejected",
                bad
            );
        }
    }
}
