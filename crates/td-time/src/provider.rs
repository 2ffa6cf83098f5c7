//! `WorkdayProvider` trait and the rule-based providers that seed day sets.
//!
//! A provider knows which calendar days are business days.  The registry
//! asks it once for every business day in a window and freezes the answer
//! into a [`DaySet`](crate::day_set::DaySet); after that the provider is
//! never consulted again.

use crate::date::Date;

/// A source of business days.
pub trait WorkdayProvider: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"China (SSE)"`).
    fn name(&self) -> &str;

    /// Return `true` if `date` is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Return `true` if `date` is a weekend according to this provider.
    ///
    /// Most providers consider Saturday and Sunday as weekends.
    fn is_weekend(&self, date: Date) -> bool {
        date.weekday().is_weekend()
    }

    /// Return every business day in `[from, to]`, ascending.
    ///
    /// Returns an empty list when `from > to`.
    fn workdays(&self, from: Date, to: Date) -> Vec<Date> {
        let mut days = Vec::new();
        let mut d = from;
        while d <= to {
            if self.is_business_day(d) {
                days.push(d);
            }
            match d.add_days(1) {
                Ok(next) => d = next,
                Err(_) => break,
            }
        }
        days
    }
}

/// A provider that treats only Saturdays and Sundays as non-business days.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl WorkdayProvider for WeekendsOnly {
    fn name(&self) -> &str {
        "Weekends Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !self.is_weekend(date)
    }
}
