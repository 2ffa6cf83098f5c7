//! `Date` — a plain Gregorian calendar day.
//!
//! Trading-day arithmetic is defined over a sparse day set, but a few
//! operations still need ordinary calendar days: stepping one raw day before
//! re-snapping (`TradingDate::next`), finding the Monday of a week, and
//! enumerating a provider's business days.  `Date` covers those.
//!
//! # Serial number convention
//! * Serial 1 = January 1, year 1 (proleptic Gregorian, a Monday).
//! * The valid date range is 0001-01-01 to 9999-12-31.

use crate::weekday::Weekday;
use td_core::errors::{Error, Result};
use td_core::utilities::data_formatters::{compact, format_iso};
use td_core::utilities::data_parsers::split_compact;

/// A calendar date represented as a serial day number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(i32);

// ── Constants ─────────────────────────────────────────────────────────────────

/// Days from 1970-01-01 to 0001-01-01, negated, plus one.
const SERIAL_OFFSET: i64 = 719_163;

impl Date {
    /// Minimum valid date: January 1, year 1.
    pub const MIN: Date = Date(1);

    /// Maximum valid date: December 31, 9999.
    pub const MAX: Date = Date(3_652_059);

    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from a serial number.
    pub fn from_serial(serial: i32) -> Result<Self> {
        let d = Date(serial);
        if d < Self::MIN || d > Self::MAX {
            return Err(Error::InvalidArgument(format!(
                "serial {serial} outside [{}, {}]",
                Self::MIN.0,
                Self::MAX.0
            )));
        }
        Ok(d)
    }

    /// Create a date from year (1–9999), month (1–12), and day-of-month.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self> {
        if !(1..=9999).contains(&year) {
            return Err(Error::InvalidArgument(format!(
                "year {year} out of range [1, 9999]"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidArgument(format!(
                "month {month} out of range [1, 12]"
            )));
        }
        let days_in = days_in_month(year, month);
        if day == 0 || day > days_in {
            return Err(Error::InvalidArgument(format!(
                "day {day} out of range [1, {days_in}] for {year}-{month:02}"
            )));
        }
        Ok(Date(serial_from_ymd(year as i64, month as i64, day as i64)))
    }

    /// Create a date from a `yyyymmdd` integer.
    pub fn from_compact(value: i64) -> Result<Self> {
        let (y, m, d) = split_compact(value)
            .ok_or_else(|| Error::InvalidArgument(format!("{value} is not a yyyymmdd date")))?;
        Self::from_ymd(y, m, d)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Return the serial number.
    pub fn serial(&self) -> i32 {
        self.0
    }

    /// Return `(year, month, day)`.
    pub fn ymd(&self) -> (u16, u8, u8) {
        ymd_from_serial(self.0)
    }

    /// Return the year (1–9999).
    pub fn year(&self) -> u16 {
        self.ymd().0
    }

    /// Return the month (1–12).
    pub fn month(&self) -> u8 {
        self.ymd().1
    }

    /// Return the day of the month (1–31).
    pub fn day_of_month(&self) -> u8 {
        self.ymd().2
    }

    /// Return the day of the year (1–366).
    pub fn day_of_year(&self) -> u16 {
        let y = self.year() as i64;
        (self.0 as i64 - serial_from_ymd(y, 1, 1) as i64 + 1) as u16
    }

    /// Return the weekday.
    pub fn weekday(&self) -> Weekday {
        // Serial 1 (0001-01-01) is a Monday.
        let w = ((self.0 - 1).rem_euclid(7) + 1) as u8;
        Weekday::from_ordinal(w).unwrap_or(Weekday::Monday)
    }

    /// Return the ISO-8601 `(week-year, week)` of this date.
    ///
    /// Weeks start on Monday; week 1 is the week holding the year's first
    /// Thursday, so early-January days may belong to the previous week-year.
    pub fn iso_week(&self) -> (u16, u8) {
        let year = self.year() as i64;
        let wd = self.weekday().ordinal() as i64;
        let week = (self.day_of_year() as i64 - wd + 10) / 7;
        if week < 1 {
            ((year - 1) as u16, iso_weeks_in_year(year - 1))
        } else if week > iso_weeks_in_year(year) as i64 {
            ((year + 1) as u16, 1)
        } else {
            (year as u16, week as u8)
        }
    }

    /// Return the date as a `yyyymmdd` integer.
    pub fn to_compact(&self) -> i64 {
        let (y, m, d) = self.ymd();
        compact(y, m, d)
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Advance by `n` calendar days.  Returns an error if the result leaves
    /// the valid range.
    pub fn add_days(self, n: i64) -> Result<Self> {
        let serial = self.0 as i64 + n;
        if serial < Self::MIN.0 as i64 || serial > Self::MAX.0 as i64 {
            return Err(Error::InvalidArgument(format!(
                "{self} + {n} days leaves the Gregorian range"
            )));
        }
        Ok(Date(serial as i32))
    }

    /// Return the Monday on or before this date, clamped to [`Date::MIN`].
    pub fn week_start(self) -> Self {
        let back = self.weekday().ordinal() as i32 - 1;
        Date((self.0 - back).max(Self::MIN.0))
    }

    /// Return the number of calendar days between `self` and `other`.
    /// Positive if `other > self`.
    pub fn days_between(self, other: Date) -> i32 {
        other.0 - self.0
    }

    /// Return the last day of the month containing this date.
    pub fn end_of_month(self) -> Self {
        let (y, m, _) = self.ymd();
        Date(serial_from_ymd(y as i64, m as i64, days_in_month(y, m) as i64))
    }
}

impl std::ops::Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> i32 {
        self.0 - rhs.0
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (y, m, d) = self.ymd();
        f.write_str(&format_iso(y, m, d))
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date({self})")
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Whether a given year is a leap year.
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month/year.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn iso_weeks_in_year(year: i64) -> u8 {
    // 53 weeks iff Jan 1 is a Thursday, or a Wednesday in a leap year.
    let jan1 = (serial_from_ymd(year, 1, 1) as i64 - 1).rem_euclid(7) + 1;
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    if jan1 == 4 || (leap && jan1 == 3) {
        53
    } else {
        52
    }
}

/// Serial number of a (year, month, day) triple; serial 1 = 0001-01-01.
fn serial_from_ymd(year: i64, month: i64, day: i64) -> i32 {
    // Days since 1970-01-01 in the proleptic Gregorian calendar, computed
    // over 400-year eras with March as the first month of the shifted year.
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    let unix_days = era * 146_097 + doe - 719_468;
    (unix_days + SERIAL_OFFSET) as i32
}

/// Decompose a serial number into (year, month, day).
fn ymd_from_serial(serial: i32) -> (u16, u8, u8) {
    let z = serial as i64 - SERIAL_OFFSET + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + i64::from(m <= 2);
    (y as u16, m as u8, d as u8)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        let d = Date::from_ymd(1, 1, 1).unwrap();
        assert_eq!(d, Date::MIN);
        assert_eq!(d.weekday(), Weekday::Monday);
        assert_eq!(Date::from_ymd(9999, 12, 31).unwrap(), Date::MAX);
    }

    #[test]
    fn test_roundtrip() {
        let dates = [
            (1, 1, 1),
            (1900, 2, 28),
            (1900, 3, 1),
            (2000, 2, 29), // leap
            (2100, 2, 28), // non-leap century
            (2024, 12, 31),
            (9999, 12, 31),
        ];
        for (y, m, d) in dates {
            let date = Date::from_ymd(y, m, d).unwrap();
            assert_eq!(date.ymd(), (y, m, d), "mismatch for {y}-{m:02}-{d:02}");
        }
    }

    #[test]
    fn test_invalid_components() {
        assert!(Date::from_ymd(0, 1, 1).is_err());
        assert!(Date::from_ymd(2023, 2, 29).is_err());
        assert!(Date::from_ymd(2023, 13, 1).is_err());
        assert!(Date::from_compact(20250230).is_err());
    }

    #[test]
    fn test_weekday() {
        // 2024-01-01 is a Monday, 1970-01-01 a Thursday.
        assert_eq!(Date::from_ymd(2024, 1, 1).unwrap().weekday(), Weekday::Monday);
        assert_eq!(Date::from_ymd(2024, 1, 6).unwrap().weekday(), Weekday::Saturday);
        assert_eq!(Date::from_ymd(1970, 1, 1).unwrap().weekday(), Weekday::Thursday);
    }

    #[test]
    fn test_iso_week() {
        // 2025-01-01 (Wednesday) is in week 1 of 2025.
        assert_eq!(Date::from_ymd(2025, 1, 1).unwrap().iso_week(), (2025, 1));
        // 2021-01-03 (Sunday) belongs to week 53 of 2020.
        assert_eq!(Date::from_ymd(2021, 1, 3).unwrap().iso_week(), (2020, 53));
        // 2024-12-30 (Monday) is week 1 of 2025.
        assert_eq!(Date::from_ymd(2024, 12, 30).unwrap().iso_week(), (2025, 1));
        assert_eq!(Date::from_ymd(2025, 1, 6).unwrap().iso_week(), (2025, 2));
    }

    #[test]
    fn test_week_start() {
        let sun = Date::from_ymd(2025, 1, 5).unwrap();
        assert_eq!(sun.week_start(), Date::from_ymd(2024, 12, 30).unwrap());
        let mon = Date::from_ymd(2025, 1, 6).unwrap();
        assert_eq!(mon.week_start(), mon);
    }

    #[test]
    fn test_arithmetic() {
        let d = Date::from_ymd(2023, 1, 31).unwrap();
        assert_eq!(d.add_days(1).unwrap(), Date::from_ymd(2023, 2, 1).unwrap());
        assert_eq!(d.add_days(-31).unwrap(), Date::from_ymd(2022, 12, 31).unwrap());
        assert_eq!(Date::from_ymd(2023, 3, 1).unwrap() - d, 29);
        assert!(Date::MAX.add_days(1).is_err());
        assert!(Date::MIN.add_days(-1).is_err());
    }

    #[test]
    fn test_compact() {
        let d = Date::from_compact(20240229).unwrap();
        assert_eq!(d.to_compact(), 20240229);
        assert_eq!(d.day_of_year(), 60);
        assert_eq!(d.end_of_month().day_of_month(), 29);
        assert_eq!(d.to_string(), "2024-02-29");
    }
}
