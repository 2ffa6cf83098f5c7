//! China (SSE — Shanghai Stock Exchange) workday provider.
//!
//! **Note:** the lunar holidays (Spring Festival, Dragon Boat, Mid-Autumn)
//! move from year to year.  Spring Festival is covered through a table of
//! lunar new year dates; Qingming uses the solar-term approximation; Dragon
//! Boat and Mid-Autumn are not modelled.  Exchange-announced bridge days are
//! not modelled either, so a calendar built from this provider is a close
//! approximation rather than the official SSE list.

use crate::date::Date;
use crate::provider::WorkdayProvider;

/// Lunar new year's day, `(year, month, day)`.
const SPRING_FESTIVAL: &[(u16, u8, u8)] = &[
    (2004, 1, 22),
    (2005, 2, 9),
    (2006, 1, 29),
    (2007, 2, 18),
    (2008, 2, 7),
    (2009, 1, 26),
    (2010, 2, 14),
    (2011, 2, 3),
    (2012, 1, 23),
    (2013, 2, 10),
    (2014, 1, 31),
    (2015, 2, 19),
    (2016, 2, 8),
    (2017, 1, 28),
    (2018, 2, 16),
    (2019, 2, 5),
    (2020, 1, 25),
    (2021, 2, 12),
    (2022, 2, 1),
    (2023, 1, 22),
    (2024, 2, 10),
    (2025, 1, 29),
];

/// China (SSE) provider.
///
/// Weekends and the following holidays are observed:
/// * New Year's Day (Jan 1)
/// * Spring Festival (eve through the fifth day, table years only)
/// * Qingming Festival (solar term, Apr 4 or 5)
/// * Labour Day (May 1-3)
/// * National Day (Oct 1-7)
#[derive(Debug, Clone, Copy, Default)]
pub struct China;

impl China {
    fn is_spring_festival(date: Date) -> bool {
        let year = date.year();
        SPRING_FESTIVAL
            .iter()
            .filter(|(y, _, _)| *y == year)
            .filter_map(|&(y, m, d)| Date::from_ymd(y, m, d).ok())
            .any(|ny| (-1..=5).contains(&(date - ny)))
    }

    /// Qingming falls on the solar term "Pure Brightness": Apr 4 or 5 in
    /// the 20th and 21st centuries.
    fn qingming_day(year: u16) -> u8 {
        let c = if year >= 2000 { 4.81 } else { 5.59 };
        let y = (year % 100) as f64;
        ((y * 0.2422 + c).floor() - (y / 4.0).floor()) as u8
    }
}

impl WorkdayProvider for China {
    fn name(&self) -> &str {
        "China (SSE)"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if self.is_weekend(date) {
            return false;
        }
        let (y, m, d) = date.ymd();

        if // New Year's Day
           (d == 1 && m == 1)
            // Qingming Festival
            || (m == 4 && d == Self::qingming_day(y))
            // Labour Day
            || (m == 5 && (1..=3).contains(&d))
            // National Day
            || (m == 10 && (1..=7).contains(&d))
        {
            return false;
        }
        !Self::is_spring_festival(date)
    }
}
