//! `TradingDate` — one trading day bound to the calendar it belongs to.
//!
//! A `TradingDate` is always a member of its calendar: it can only be
//! obtained from a [`DaySet`] lookup or snap, and arithmetic only ever lands
//! on other members.  Many dates share one calendar; each holds a cheap,
//! shared handle to it.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::date::Date;
use crate::date_like::{Canonical, DateLike, Ymd};
use crate::date_range::DateRange;
use crate::day_set::DaySet;
use crate::view::{CalendarView, Unit};
use crate::weekday::Weekday;
use td_core::errors::Result;
use td_core::utilities::data_formatters::{compact, format_compact};

/// A trading day of a specific calendar.
#[derive(Clone)]
pub struct TradingDate {
    year: u16,
    month: u8,
    day: u8,
    calendar: DaySet,
}

impl TradingDate {
    /// Bind a key already known to be in `calendar` to its full calendar.
    pub(crate) fn bind(calendar: &DaySet, (year, month, day): Ymd) -> Self {
        let calendar = calendar.full();
        debug_assert!(calendar.has((year, month, day)));
        Self {
            year,
            month,
            day,
            calendar: calendar.clone(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The year.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// The month (1–12).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The day of the month.
    pub fn day(&self) -> u8 {
        self.day
    }

    /// The owning calendar.
    pub fn calendar(&self) -> &DaySet {
        &self.calendar
    }

    /// The date as a `yyyymmdd` integer.
    pub fn as_int(&self) -> i64 {
        compact(self.year, self.month, self.day)
    }

    /// The date as a `"yyyymmdd"` string.
    pub fn as_str(&self) -> String {
        format_compact(self.year, self.month, self.day)
    }

    /// The plain Gregorian date.
    pub fn to_date(&self) -> Date {
        // Members of a day set are validated Gregorian dates.
        Date::from_ymd(self.year, self.month, self.day).unwrap_or(Date::MIN)
    }

    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        self.to_date().weekday()
    }

    fn key(&self) -> Ymd {
        (self.year, self.month, self.day)
    }

    // ── Trading-day arithmetic ────────────────────────────────────────────────

    /// Move `n` trading days forward (backward for negative `n`).
    ///
    /// Walks the current month's day list and rolls into the first day of the
    /// following month whenever the list runs out.
    ///
    /// # Errors
    /// `OutOfRange` if the walk passes the calendar's last day.
    pub fn add_days(&self, n: i64) -> Result<Self> {
        if n < 0 {
            return self.step_back(n.unsigned_abs(), || format!("{self} + {n}"));
        }
        self.step_forward(n as u64, || format!("{self} + {n}"))
    }

    /// Move `n` trading days backward (forward for negative `n`).
    ///
    /// # Errors
    /// `OutOfRange` if the walk passes the calendar's first day.
    pub fn sub_days(&self, n: i64) -> Result<Self> {
        if n < 0 {
            return self.step_forward(n.unsigned_abs(), || format!("{self} - {n}"));
        }
        self.step_back(n as u64, || format!("{self} - {n}"))
    }

    fn step_forward(&self, n: u64, requested: impl Fn() -> String) -> Result<Self> {
        let cal = &self.calendar;
        let (mut y, mut m, mut d) = self.key();
        let mut remaining = n;
        loop {
            let days = cal.days(y, m);
            let idx = days.partition_point(|&x| x < d);
            let room = (days.len() - 1 - idx) as u64;
            if remaining <= room {
                return Ok(Self::bind(cal, (y, m, days[idx + remaining as usize])));
            }
            // `room` steps to the month's last day, one more into the next.
            remaining -= room + 1;
            let next_month = if m == 12 { (y + 1, 1, 1) } else { (y, m + 1, 1) };
            (y, m, d) = cal
                .first_on_or_after(next_month)
                .ok_or_else(|| cal.out_of_range(requested()))?;
        }
    }

    fn step_back(&self, n: u64, requested: impl Fn() -> String) -> Result<Self> {
        let cal = &self.calendar;
        let (mut y, mut m, mut d) = self.key();
        let mut remaining = n;
        loop {
            let days = cal.days(y, m);
            let idx = days.partition_point(|&x| x < d);
            let room = idx as u64;
            if remaining <= room {
                return Ok(Self::bind(cal, (y, m, days[idx - remaining as usize])));
            }
            remaining -= room + 1;
            let prev_month = match (y, m) {
                (1, 1) => return Err(cal.out_of_range(requested())),
                (_, 1) => (y - 1, 12, 31),
                _ => (y, m - 1, 31),
            };
            (y, m, d) = cal
                .last_on_or_before(prev_month)
                .ok_or_else(|| cal.out_of_range(requested()))?;
        }
    }

    /// The first trading day after this one, found by stepping one calendar
    /// day and snapping forward.
    ///
    /// # Errors
    /// `OutOfRange` at the calendar's last day.
    pub fn next(&self) -> Result<Self> {
        let cal = &self.calendar;
        let requested = || cal.out_of_range(format!("trading day after {self}"));
        let raw = self.to_date().add_days(1).map_err(|_| requested())?;
        cal.first_on_or_after(raw.ymd())
            .map(|ymd| Self::bind(cal, ymd))
            .ok_or_else(requested)
    }

    /// The last trading day before this one, found by stepping one calendar
    /// day back and snapping backward.
    ///
    /// # Errors
    /// `OutOfRange` at the calendar's first day.
    pub fn last(&self) -> Result<Self> {
        let cal = &self.calendar;
        let requested = || cal.out_of_range(format!("trading day before {self}"));
        let raw = self.to_date().add_days(-1).map_err(|_| requested())?;
        cal.last_on_or_before(raw.ymd())
            .map(|ymd| Self::bind(cal, ymd))
            .ok_or_else(requested)
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    /// The year containing this date.
    pub fn year_view(&self) -> CalendarView {
        CalendarView::around(self, Unit::Year)
    }

    /// The month containing this date.
    pub fn month_view(&self) -> CalendarView {
        CalendarView::around(self, Unit::Month)
    }

    /// The Monday–Sunday week containing this date.
    pub fn week_view(&self) -> CalendarView {
        CalendarView::around(self, Unit::Week)
    }

    /// This date as a single-day view.
    pub fn day_view(&self) -> CalendarView {
        CalendarView::around(self, Unit::Day)
    }

    /// The view of the given unit containing this date.
    pub fn view(&self, unit: Unit) -> CalendarView {
        CalendarView::around(self, unit)
    }

    // ── Ranges ────────────────────────────────────────────────────────────────

    /// Range from this date towards `stop` by `step`.
    ///
    /// # Errors
    /// `InvalidArgument` if `step` is zero or `stop` is malformed.
    pub fn iterate_until(
        &self,
        stop: impl Into<DateLike>,
        step: i64,
        inclusive: bool,
    ) -> Result<DateRange> {
        DateRange::new(self.clone(), stop, step, inclusive)
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

impl std::ops::Add<i64> for &TradingDate {
    type Output = Result<TradingDate>;
    fn add(self, rhs: i64) -> Result<TradingDate> {
        self.add_days(rhs)
    }
}

impl std::ops::Sub<i64> for &TradingDate {
    type Output = Result<TradingDate>;
    fn sub(self, rhs: i64) -> Result<TradingDate> {
        self.sub_days(rhs)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────────

impl Canonical for TradingDate {
    fn canonical(&self) -> i64 {
        self.as_int()
    }
}

impl PartialEq for TradingDate {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for TradingDate {}

impl PartialOrd for TradingDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TradingDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl Hash for TradingDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl PartialEq<i64> for TradingDate {
    fn eq(&self, other: &i64) -> bool {
        self.canonical() == *other
    }
}

impl PartialOrd<i64> for TradingDate {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.canonical().cmp(other))
    }
}

/// Malformed strings compare unequal and unordered.
impl PartialEq<&str> for TradingDate {
    fn eq(&self, other: &&str) -> bool {
        DateLike::from(*other).compact().ok() == Some(self.canonical())
    }
}

impl PartialOrd<&str> for TradingDate {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        let other = DateLike::from(*other).compact().ok()?;
        Some(self.canonical().cmp(&other))
    }
}

impl PartialEq<CalendarView> for TradingDate {
    fn eq(&self, other: &CalendarView) -> bool {
        self.canonical() == other.canonical()
    }
}

impl PartialOrd<CalendarView> for TradingDate {
    fn partial_cmp(&self, other: &CalendarView) -> Option<Ordering> {
        Some(self.canonical().cmp(&other.canonical()))
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for TradingDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl std::fmt::Debug for TradingDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TradingDate({}, {})", self.as_str(), self.calendar.id())
    }
}
