//! `DateRange` — a lazy, restartable walk over trading days.

use crate::date_like::DateLike;
use crate::trading_date::TradingDate;
use crate::view::{dedup_sorted, CalendarView};
use td_core::ensure;
use td_core::errors::Result;

/// Trading days from `start` towards `stop`, `step` trading days apart.
///
/// The range holds only its parameters; every call to [`iter`](Self::iter)
/// starts a fresh walk.  The walk ends at the first date that reaches
/// `stop` (or passes it when `inclusive`), or when a step would leave the
/// calendar.
#[derive(Debug, Clone)]
pub struct DateRange {
    start: TradingDate,
    stop: i64,
    step: i64,
    inclusive: bool,
}

impl DateRange {
    /// Create a range.  A negative `step` walks backward.
    ///
    /// # Errors
    /// `InvalidArgument` if `step` is zero or `stop` is malformed.
    pub fn new(
        start: TradingDate,
        stop: impl Into<DateLike>,
        step: i64,
        inclusive: bool,
    ) -> Result<Self> {
        ensure!(step != 0, "date range step must be non-zero");
        let stop = stop.into().compact()?;
        Ok(Self {
            start,
            stop,
            step,
            inclusive,
        })
    }

    /// The first date of the walk.
    pub fn start(&self) -> &TradingDate {
        &self.start
    }

    /// The stop bound as `yyyymmdd`.
    pub fn stop(&self) -> i64 {
        self.stop
    }

    /// Trading days between consecutive elements.
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Whether `stop` itself is yielded when reached.
    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    /// Start a fresh walk.
    pub fn iter(&self) -> DateRangeIter {
        DateRangeIter {
            current: Some(self.start.clone()),
            stop: self.stop,
            step: self.step,
            inclusive: self.inclusive,
        }
    }

    /// Collect the walk.
    pub fn to_vec(&self) -> Vec<TradingDate> {
        self.iter().collect()
    }

    /// Distinct years touched by the walk, ascending.
    pub fn years(&self) -> Vec<CalendarView> {
        dedup_sorted(self.iter().map(|d| d.year_view()))
    }

    /// Distinct months touched by the walk, ascending.
    pub fn months(&self) -> Vec<CalendarView> {
        dedup_sorted(self.iter().map(|d| d.month_view()))
    }

    /// Distinct weeks touched by the walk, ascending.
    pub fn weeks(&self) -> Vec<CalendarView> {
        dedup_sorted(self.iter().map(|d| d.week_view()))
    }
}

impl<'a> IntoIterator for &'a DateRange {
    type Item = TradingDate;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> DateRangeIter {
        self.iter()
    }
}

/// One walk over a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateRangeIter {
    current: Option<TradingDate>,
    stop: i64,
    step: i64,
    inclusive: bool,
}

impl DateRangeIter {
    fn within(&self, date: &TradingDate) -> bool {
        let v = date.as_int();
        match (self.step > 0, self.inclusive) {
            (true, false) => v < self.stop,
            (true, true) => v <= self.stop,
            (false, false) => v > self.stop,
            (false, true) => v >= self.stop,
        }
    }

    fn advance(&self, date: &TradingDate) -> Option<TradingDate> {
        let next = match self.step {
            1 => date.next(),
            -1 => date.last(),
            n => date.add_days(n),
        };
        next.ok()
    }
}

impl Iterator for DateRangeIter {
    type Item = TradingDate;

    fn next(&mut self) -> Option<TradingDate> {
        let current = self.current.take()?;
        if !self.within(&current) {
            return None;
        }
        self.current = self.advance(&current);
        Some(current)
    }
}

impl std::iter::FusedIterator for DateRangeIter {}
