//! Schedule and ScheduleBuilder implementation.

use busdate_core::calendar::HolidayCalendar;
use busdate_core::types::{BusinessDayConvention, Clock, Date, DayCountConvention, Period, SystemClock};
use tracing::debug;

use super::error::ScheduleError;
use super::frequency::Frequency;
use super::range::{adjust_sorted, roll_grid};

/// Roll-grid dates between two end dates, both ends included.
///
/// The dates strictly inside `(start, end)` come from the grid
/// `roll + k * step`; `start` and `end` are added when the grid misses
/// them, which leaves an irregular stub period at either end.
///
/// # Examples
///
/// ```
/// use busdate_schedules::Schedule;
///
/// let schedule = Schedule::from_strs("20150331", "20160930", "3M", Some("20160415")).unwrap();
/// let dates: Vec<String> = schedule.iter().map(|d| d.to_string()).collect();
/// assert_eq!(
///     dates,
///     ["20150331", "20150415", "20150715", "20151015", "20160115", "20160415", "20160715", "20160930"]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Schedule {
    dates: Vec<Date>,
}

impl Schedule {
    /// Creates a schedule from `start` to `end` rolling on `roll`.
    ///
    /// `roll` defaults to `start`, so a schedule without an explicit roll has
    /// its stub at the back.
    ///
    /// # Errors
    ///
    /// - `ScheduleError::InvalidDateRange` if `start` is after `end`
    /// - `ScheduleError::ZeroStep` / `ScheduleError::InvalidStep` for an
    ///   unusable step
    pub fn new(
        start: Date,
        end: Date,
        step: Period,
        roll: Option<Date>,
    ) -> Result<Self, ScheduleError> {
        if start > end {
            return Err(ScheduleError::InvalidDateRange { start, end });
        }
        let roll = roll.unwrap_or(start);
        let mut dates = roll_grid(start, end, step, roll)?;
        if dates.first() != Some(&start) {
            dates.insert(0, start);
        }
        if dates.last() != Some(&end) {
            dates.push(end);
        }
        debug!(%start, %end, %step, %roll, count = dates.len(), "generated schedule");
        Ok(Schedule { dates })
    }

    /// Creates a builder with the default step (one year).
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::new()
    }

    /// Builds a schedule from textual arguments.
    pub fn from_strs(
        start: &str,
        end: &str,
        step: &str,
        roll: Option<&str>,
    ) -> Result<Self, ScheduleError> {
        let roll = roll.map(Date::parse).transpose()?;
        Schedule::new(Date::parse(start)?, Date::parse(end)?, Period::parse(step)?, roll)
    }

    /// Merges the first two periods into one long first stub.
    ///
    /// Schedules with fewer than three dates are left unchanged.
    ///
    /// ```
    /// use busdate_schedules::Schedule;
    ///
    /// let mut schedule = Schedule::from_strs("20150331", "20160930", "3M", Some("20160415")).unwrap();
    /// schedule.first_stub_long();
    /// assert_eq!(schedule.dates()[1].to_string(), "20150715");
    /// ```
    pub fn first_stub_long(&mut self) -> &mut Self {
        if self.dates.len() > 2 {
            self.dates.remove(1);
        }
        self
    }

    /// Merges the last two periods into one long last stub.
    ///
    /// Schedules with fewer than three dates are left unchanged.
    pub fn last_stub_long(&mut self) -> &mut Self {
        let len = self.dates.len();
        if len > 2 {
            self.dates.remove(len - 2);
        }
        self
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

    /// Returns whether the schedule is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First date, the schedule start.
    pub fn first(&self) -> Option<Date> {
        self.dates.first().copied()
    }

    /// Last date, the schedule end.
    pub fn last(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// Returns an iterator over the dates.
    pub fn iter(&self) -> impl Iterator<Item = Date> + '_ {
        self.dates.iter().copied()
    }

    /// Consecutive `(start, end)` pairs.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }

    /// Year fraction of each period under `day_count`.
    pub fn year_fractions(&self, day_count: DayCountConvention) -> Vec<f64> {
        self.periods()
            .map(|(start, end)| day_count.year_fraction(start, end))
            .collect()
    }

    /// Calculates the total year fraction of all periods.
    ///
    /// # Examples
    ///
    /// ```
    /// use busdate_core::types::{Date, DayCountConvention};
    /// use busdate_schedules::{Frequency, Schedule};
    ///
    /// let schedule = Schedule::builder()
    ///     .start(Date::from_ymd(2024, 1, 15).unwrap())
    ///     .end(Date::from_ymd(2026, 1, 15).unwrap())
    ///     .frequency(Frequency::SemiAnnual)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(schedule.len(), 5);
    /// assert!((schedule.total_year_fraction(DayCountConvention::Thirty360) - 2.0).abs() < 1e-12);
    /// ```
    pub fn total_year_fraction(&self, day_count: DayCountConvention) -> f64 {
        self.year_fractions(day_count).iter().sum()
    }

    /// Consumes the schedule, returning the dates.
    pub fn into_vec(self) -> Vec<Date> {
        self.dates
    }
}

impl AsRef<[Date]> for Schedule {
    fn as_ref(&self) -> &[Date] {
        &self.dates
    }
}

impl IntoIterator for Schedule {
    type Item = Date;
    type IntoIter = std::vec::IntoIter<Date>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.into_iter()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = Date;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Date>>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter().copied()
    }
}

/// Builder for constructing schedules.
///
/// `start` is required. Without an `end` the given start becomes the end and
/// the clock's today the start. The step defaults to one year and the roll
/// date to the resolved start.
///
/// ```
/// use busdate_core::types::{Date, FixedClock};
/// use busdate_schedules::{Frequency, Schedule};
///
/// let clock = FixedClock::new(Date::from_ymd(2016, 1, 15).unwrap());
/// let schedule = Schedule::builder()
///     .start(Date::from_ymd(2017, 1, 15).unwrap())
///     .frequency(Frequency::SemiAnnual)
///     .build_with(&clock)
///     .unwrap();
/// let dates: Vec<String> = schedule.iter().map(|d| d.to_string()).collect();
/// assert_eq!(dates, ["20160115", "20160715", "20170115"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScheduleBuilder {
    start_date: Option<Date>,
    end_date: Option<Date>,
    step: Period,
    roll: Option<Date>,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleBuilder {
    /// Creates a new schedule builder with a one year step.
    pub fn new() -> Self {
        Self {
            start_date: None,
            end_date: None,
            step: Frequency::Annual.step(),
            roll: None,
        }
    }

    /// Sets the start date of the schedule.
    pub fn start(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the end date of the schedule.
    pub fn end(mut self, date: Date) -> Self {
        self.end_date = Some(date);
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

    /// Sets the roll date.
    pub fn roll(mut self, date: Date) -> Self {
        self.roll = Some(date);
        self
    }

    /// Builds the schedule, reading "today" from the system clock if needed.
    pub fn build(self) -> Result<Schedule, ScheduleError> {
        self.build_with(&SystemClock)
    }

    /// Builds the schedule, reading "today" from `clock` if no end was set.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Start date is missing
    /// - Start date is after end date
    /// - The step is zero or mixes signs
    pub fn build_with<K: Clock + ?Sized>(self, clock: &K) -> Result<Schedule, ScheduleError> {
        let given = self
            .start_date
            .ok_or(ScheduleError::MissingField { field: "start" })?;
        let (start, end) = match self.end_date {
            Some(end) => (given, end),
            None => (clock.today(), given),
        };
        Schedule::new(start, end, self.step, self.roll)
    }
}
