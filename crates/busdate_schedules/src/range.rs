//! Roll-anchored date ranges.
//!
//! The roll date and the step define the infinite grid `roll + k * step`
//! (calendar steps are computed from the roll date, so month-end clamping
//! never accumulates). The grid is then sliced to `[start, stop)`.

use busdate_core::calendar::HolidayCalendar;
use busdate_core::types::{BusinessDayConvention, Clock, Date, Period, SystemClock};
use tracing::debug;

use super::error::ScheduleError;
use super::frequency::Frequency;

/// Ascending, duplicate-free sequence of dates on a roll grid.
///
/// # Examples
///
/// ```
/// use busdate_core::types::{Date, Period};
/// use busdate_schedules::DateRange;
///
/// let start = Date::from_int(20151231).unwrap();
/// let stop = Date::from_int(20201231).unwrap();
///
/// // roll on the stop date, stepping backwards: same grid
/// let a = DateRange::new(start, stop, Period::from_years(1), start).unwrap();
/// let b = DateRange::new(start, stop, Period::from_years(-1), stop).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 5);
/// assert_eq!(a.last(), Some(Date::from_int(20191231).unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DateRange {
    dates: Vec<Date>,
}

impl DateRange {
    /// Builds the grid through `roll` with spacing `step`, keeping the dates
    /// in `[start, stop)`.
    ///
    /// The sign of `step` does not matter.
    ///
    /// # Errors
    ///
    /// - `ScheduleError::ZeroStep` if `step` is zero
    /// - `ScheduleError::InvalidStep` if `step` mixes signs
    pub fn new(start: Date, stop: Date, step: Period, roll: Date) -> Result<Self, ScheduleError> {
        let dates = roll_grid(start, stop, step, roll)?;
        debug!(%start, %stop, %step, %roll, count = dates.len(), "generated date range");
        Ok(DateRange { dates })
    }

    /// Creates a builder with the default step (one year).
    pub fn builder() -> DateRangeBuilder {
        DateRangeBuilder::new()
    }

    /// Builds a range from textual arguments.
    ///
    /// Dates use any plain format of [`Date::parse`], the step uses the
    /// period grammar. `roll` defaults to `start`.
    ///
    /// ```
    /// use busdate_schedules::DateRange;
    ///
    /// let range = DateRange::from_strs("20151231", "20160531", "-1M", Some("20160531")).unwrap();
    /// assert_eq!(range.first().unwrap().to_string(), "20151231");
    /// assert_eq!(range.len(), 5);
    /// ```
    pub fn from_strs(
        start: &str,
        stop: &str,
        step: &str,
        roll: Option<&str>,
    ) -> Result<Self, ScheduleError> {
        let start = Date::parse(start)?;
        let stop = Date::parse(stop)?;
        let step = Period::parse(step)?;
        let roll = roll.map(Date::parse).transpose()?.unwrap_or(start);
        DateRange::new(start, stop, step, roll)
    }

    /// The dates in ascending order.
    #[inline]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the number of dates.
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns whether the range is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Earliest date.
    pub fn first(&self) -> Option<Date> {
        self.dates.first().copied()
    }

    /// Latest date.
    pub fn last(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// True if `date` is in the range.
    pub fn contains(&self, date: Date) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    /// Returns an iterator over the dates.
    pub fn iter(&self) -> impl Iterator<Item = Date> + '_ {
        self.dates.iter().copied()
    }

    /// Adjusts every date under `convention` on `calendar`, in place.
    ///
    /// Dates that collapse onto the same business day are kept once.
    pub fn adjust<C>(&mut self, convention: BusinessDayConvention, calendar: &C) -> &mut Self
    where
        C: HolidayCalendar + ?Sized,
    {
        adjust_sorted(&mut self.dates, convention, calendar);
        self
    }

    /// Consumes the range, returning the dates.
    pub fn into_vec(self) -> Vec<Date> {
        self.dates
    }
}

impl AsRef<[Date]> for DateRange {
    fn as_ref(&self) -> &[Date] {
        &self.dates
    }
}

impl IntoIterator for DateRange {
    type Item = Date;
    type IntoIter = std::vec::IntoIter<Date>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.into_iter()
    }
}

impl<'a> IntoIterator for &'a DateRange {
    type Item = Date;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Date>>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter().copied()
    }
}

/// Builder for [`DateRange`].
///
/// Defaults:
/// - no `stop`: the given start becomes the stop and the clock's today the
///   start
/// - no `step`: one year
/// - no `roll`: the (resolved) start
///
/// # Examples
///
/// ```
/// use busdate_core::types::{Date, FixedClock};
/// use busdate_schedules::{DateRange, Frequency};
///
/// let clock = FixedClock::new(Date::from_int(20160115).unwrap());
/// let range = DateRange::builder()
///     .start(Date::from_int(20160415).unwrap())
///     .frequency(Frequency::Monthly)
///     .build_with(&clock)
///     .unwrap();
///
/// let dates: Vec<String> = range.iter().map(|d| d.to_string()).collect();
/// assert_eq!(dates, ["20160115", "20160215", "20160315"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DateRangeBuilder {
    start: Option<Date>,
    stop: Option<Date>,
    step: Period,
    roll: Option<Date>,
}

impl Default for DateRangeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DateRangeBuilder {
    /// Creates a new builder with a one year step.
    pub fn new() -> Self {
        Self {
            start: None,
            stop: None,
            step: Frequency::Annual.step(),
            roll: None,
        }
    }

    /// Sets the first date of the range (inclusive).
    pub fn start(mut self, date: Date) -> Self {
        self.start = Some(date);
        self
    }

    /// Sets the date the range stops before (exclusive).
    pub fn stop(mut self, date: Date) -> Self {
        self.stop = Some(date);
        self
    }

    /// Sets the step period.
    pub fn step(mut self, step: Period) -> Self {
        self.step = step;
        self
    }

    /// Sets the step from a frequency.
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.step = frequency.step();
        self
    }

    /// Sets the roll anchor.
    pub fn roll(mut self, date: Date) -> Self {
        self.roll = Some(date);
        self
    }

    /// Builds the range, reading "today" from the system clock if needed.
    pub fn build(self) -> Result<DateRange, ScheduleError> {
        self.build_with(&SystemClock)
    }

    /// Builds the range, reading "today" from `clock` if needed.
    ///
    /// # Errors
    ///
    /// - `ScheduleError::MissingField` if no start was set
    /// - the step errors of [`DateRange::new`]
    pub fn build_with<K: Clock + ?Sized>(self, clock: &K) -> Result<DateRange, ScheduleError> {
        let given = self
            .start
            .ok_or(ScheduleError::MissingField { field: "start" })?;
        let (start, stop) = match self.stop {
            Some(stop) => (given, stop),
            None => (clock.today(), given),
        };
        DateRange::new(start, stop, self.step, self.roll.unwrap_or(start))
    }
}

/// Rejects zero and mixed-sign steps and turns the step forward.
fn forward_step(step: Period) -> Result<Period, ScheduleError> {
    if step.is_zero() {
        return Err(ScheduleError::ZeroStep);
    }
    let components = [step.years(), step.months(), step.days(), step.business_days()];
    let positive = components.iter().any(|n| *n > 0);
    let negative = components.iter().any(|n| *n < 0);
    if positive && negative {
        return Err(ScheduleError::InvalidStep { step });
    }
    Ok(if negative { -step } else { step })
}

/// Grid dates `roll + k * step` in `[start, stop)`, ascending.
///
/// Walks backward from `roll` and then forward. A pure business-day step
/// moves from the previous grid date, which equals `roll + k * step` and
/// keeps a distant roll linear.
pub(crate) fn roll_grid(
    start: Date,
    stop: Date,
    step: Period,
    roll: Date,
) -> Result<Vec<Date>, ScheduleError> {
    let step = forward_step(step)?;
    let business_only = step.total_months() == 0 && step.days() == 0;
    let point = |previous: Date, k: i32| {
        if business_only {
            previous + step * k.signum()
        } else {
            roll + step * k
        }
    };

    let mut dates = Vec::new();
    let mut date = roll;
    let mut k = 0;
    while date >= start {
        if date < stop {
            dates.push(date);
        }
        let next = point(date, k - 1);
        // saturated at Date::MIN
        if next == date {
            break;
        }
        k -= 1;
        date = next;
    }
    dates.reverse();

    let mut date = roll;
    let mut k = 0;
    loop {
        let next = point(date, k + 1);
        if next >= stop || next == date {
            break;
        }
        k += 1;
        date = next;
        if date >= start {
            dates.push(date);
        }
    }
    Ok(dates)
}

/// Adjusts `dates` in place, keeping them ascending and unique.
pub(crate) fn adjust_sorted<C>(dates: &mut Vec<Date>, convention: BusinessDayConvention, calendar: &C)
where
    C: HolidayCalendar + ?Sized,
{
    for date in dates.iter_mut() {
        *date = convention.adjust(*date, calendar);
    }
    dates.sort_unstable();
    dates.dedup();
}
