//! Raw date inputs and the canonical integer encoding.
//!
//! Anything a caller may hand in as "a date" converts into [`DateLike`]:
//! `yyyymmdd` integers, `"yyyymmdd"` / `"yyyy-mm-dd"` strings, plain
//! [`Date`]s and [`TradingDate`]s.  Ordering and equality between dates and
//! calendar views go through [`Canonical`].

use crate::date::Date;
use crate::trading_date::TradingDate;
use td_core::errors::{Error, Result};
use td_core::utilities::data_formatters::compact;
use td_core::utilities::data_parsers::{parse_date, split_compact};

/// A `(year, month, day)` key into a day set.
pub(crate) type Ymd = (u16, u8, u8);

/// A value that can be resolved to a `(year, month, day)` triple.
#[derive(Debug, Clone)]
pub enum DateLike {
    /// A `yyyymmdd` integer.
    Int(i64),
    /// A `"yyyymmdd"` or `"yyyy-mm-dd"` string.
    Str(String),
    /// A Gregorian date.
    Date(Date),
    /// A date already resolved against some calendar.
    Trading(TradingDate),
}

impl DateLike {
    /// Decompose into `(year, month, day)`.
    ///
    /// The day is checked against `1..=31` only, not against the month's
    /// length, so that a snap can start from an impossible date.
    pub fn ymd(&self) -> Result<(u16, u8, u8)> {
        match self {
            DateLike::Int(v) => split_compact(*v)
                .ok_or_else(|| Error::InvalidArgument(format!("{v} is not a yyyymmdd date"))),
            DateLike::Str(s) => parse_date(s)
                .ok_or_else(|| Error::InvalidArgument(format!("{s:?} is not a date"))),
            DateLike::Date(d) => Ok(d.ymd()),
            DateLike::Trading(t) => Ok((t.year(), t.month(), t.day())),
        }
    }

    /// Return the `yyyymmdd` encoding.
    pub fn compact(&self) -> Result<i64> {
        let (y, m, d) = self.ymd()?;
        Ok(compact(y, m, d))
    }
}

impl From<i64> for DateLike {
    fn from(v: i64) -> Self {
        DateLike::Int(v)
    }
}

impl From<i32> for DateLike {
    fn from(v: i32) -> Self {
        DateLike::Int(v as i64)
    }
}

impl From<u32> for DateLike {
    fn from(v: u32) -> Self {
        DateLike::Int(v as i64)
    }
}

impl From<&str> for DateLike {
    fn from(s: &str) -> Self {
        DateLike::Str(s.to_string())
    }
}

impl From<String> for DateLike {
    fn from(s: String) -> Self {
        DateLike::Str(s)
    }
}

impl From<Date> for DateLike {
    fn from(d: Date) -> Self {
        DateLike::Date(d)
    }
}

impl From<TradingDate> for DateLike {
    fn from(t: TradingDate) -> Self {
        DateLike::Trading(t)
    }
}

impl From<&TradingDate> for DateLike {
    fn from(t: &TradingDate) -> Self {
        DateLike::Trading(t.clone())
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDate> for DateLike {
    fn from(d: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        DateLike::Int(d.year() as i64 * 10_000 + d.month() as i64 * 100 + d.day() as i64)
    }
}

/// The integer that orders and equates dates and calendar views.
///
/// The encoding concatenates the value's scope markers: `yyyy` for a year,
/// `yyyymm` for a month, `yyyymmdd` for a day.  A week encodes as the
/// `yyyymmdd` of its Monday.
pub trait Canonical {
    /// Return the canonical encoding.
    fn canonical(&self) -> i64;
}

impl Canonical for i64 {
    fn canonical(&self) -> i64 {
        *self
    }
}

impl Canonical for Date {
    fn canonical(&self) -> i64 {
        self.to_compact()
    }
}
