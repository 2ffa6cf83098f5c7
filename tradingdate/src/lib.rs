//! # tradingdate
//!
//! Calendar-aware date arithmetic over named sets of trading days.
//!
//! A calendar is the set of days on which a market trades.  Dates resolved
//! against a calendar are [`TradingDate`]s: adding `n` moves `n` trading
//! days, and a date can be broken down into the year, month, week or day
//! around it as a [`CalendarView`].
//!
//! This crate is a **façade** over `td-core` and `td-time`.  The free
//! functions below work on the process-wide [`CalendarRegistry::global`];
//! build a [`CalendarRegistry`] of your own for isolated state.
//!
//! ```rust
//! use tradingdate::{make_calendar, MissingPolicy};
//!
//! make_calendar("doc", [20250102, 20250103, 20250106]).unwrap();
//! let d = tradingdate::date(20250104, Some("doc"), MissingPolicy::UseNext).unwrap();
//! assert_eq!(d.as_int(), 20250106);
//! assert_eq!((&d - 2).unwrap().as_int(), 20250102);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Errors and settings.
pub use td_core as core;

/// Calendars, trading dates, views, and ranges.
pub use td_time as time;

pub use td_core::{Error, Result, Settings};
pub use td_time::{
    CalendarRegistry, CalendarView, DateLike, DateRange, DaySet, MissingPolicy, Scope,
    TradingDate, Unit,
};

fn resolve_id(id: Option<&str>) -> String {
    id.map(str::to_string)
        .unwrap_or_else(|| Settings::instance().default_calendar())
}

/// Resolve `raw` against calendar `calendar_id` (default calendar when
/// `None`), snapping per `missing`.
///
/// # Errors
/// See [`CalendarRegistry::date`].
pub fn date(
    raw: impl Into<DateLike>,
    calendar_id: Option<&str>,
    missing: MissingPolicy,
) -> Result<TradingDate> {
    CalendarRegistry::global().date(raw, &resolve_id(calendar_id), missing)
}

/// A range over calendar `calendar_id` (default calendar when `None`).
///
/// # Errors
/// See [`CalendarRegistry::date_range`].
pub fn date_range(
    start: Option<DateLike>,
    end: Option<DateLike>,
    step: i64,
    calendar_id: Option<&str>,
    include_end: bool,
) -> Result<DateRange> {
    CalendarRegistry::global().date_range(start, end, step, &resolve_id(calendar_id), include_end)
}

/// The calendar named `calendar_id` (default calendar when `None`).
///
/// # Errors
/// `InvalidArgument` for an unknown id.
pub fn get_calendar(calendar_id: Option<&str>) -> Result<DaySet> {
    CalendarRegistry::global().get(&resolve_id(calendar_id))
}

/// Register `dates` under `calendar_id` in the global registry and return
/// the new calendar.
///
/// # Errors
/// `InvalidArgument` for an empty id, an empty list, or a malformed date.
pub fn make_calendar<I, D>(calendar_id: &str, dates: I) -> Result<DaySet>
where
    I: IntoIterator<Item = D>,
    D: Into<DateLike>,
{
    CalendarRegistry::global().register(calendar_id, dates)
}
