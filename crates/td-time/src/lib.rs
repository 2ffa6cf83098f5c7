//! # td-time
//!
//! Trading-day calendars: day sets, trading dates, calendar views, date
//! ranges, and the registry that names and caches calendars.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Concrete workday providers (country / exchange specific).
pub mod calendars;

/// `Date` — a plain Gregorian day.
pub mod date;

/// Raw date inputs and the canonical integer encoding.
pub mod date_like;

/// `DateRange` — lazy walks over trading days.
pub mod date_range;

/// `DaySet` — the trading days of one calendar.
pub mod day_set;

/// What to do with a date that is not a trading day.
pub mod missing_policy;

/// `WorkdayProvider` trait and rule-based providers.
pub mod provider;

/// `CalendarRegistry` — named calendars.
pub mod registry;

/// `TradingDate` — a trading day bound to its calendar.
pub mod trading_date;

/// `CalendarView` — year / month / week / day restrictions.
pub mod view;

/// `Weekday` — day of the week.
pub mod weekday;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use calendars::China;
pub use date::Date;
pub use date_like::{Canonical, DateLike};
pub use date_range::{DateRange, DateRangeIter};
#[cfg(feature = "serde")]
pub use day_set::DaySetRecord;
pub use day_set::{DayMap, DaySet, DaySetIter};
pub use missing_policy::MissingPolicy;
pub use provider::{WeekendsOnly, WorkdayProvider};
pub use registry::CalendarRegistry;
pub use trading_date::TradingDate;
pub use view::{CalendarView, Scope, Unit};
pub use weekday::Weekday;
