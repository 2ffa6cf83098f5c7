//! `CalendarView` — a day set restricted to one year, month, week, or day.
//!
//! A view owns a copy of its slice of the calendar, so it behaves as a small
//! calendar in its own right (`start`, `end`, `iter`, `contains`).  The dates
//! it hands out still belong to the full calendar, so arithmetic on them is
//! not confined to the view.  To step beyond its slice (`next`, `last`,
//! `shift`) it re-resolves the full calendar by id through the registry that
//! issued it, and therefore always sees the data currently registered under
//! that id.  Restricting a view's calendar again keeps the same origin.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::date::Date;
use crate::date_like::{Canonical, DateLike, Ymd};
use crate::day_set::{DayMap, DaySet, DaySetIter};
use crate::registry::Origin;
use crate::trading_date::TradingDate;
use td_core::errors::{Error, Result};
use td_core::utilities::data_formatters::compact;

/// The unit a view spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// A calendar year.
    Year,
    /// A calendar month.
    Month,
    /// A Monday–Sunday week.
    Week,
    /// A single day.
    Day,
}

/// Which slice of the calendar a view covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One year.
    Year(u16),
    /// One `(year, month)`.
    Month(u16, u8),
    /// The week starting on the given Monday.
    Week(Date),
    /// One `(year, month, day)`.
    Day(u16, u8, u8),
}

impl Scope {
    /// The unit of this scope.
    pub fn unit(&self) -> Unit {
        match self {
            Scope::Year(_) => Unit::Year,
            Scope::Month(..) => Unit::Month,
            Scope::Week(_) => Unit::Week,
            Scope::Day(..) => Unit::Day,
        }
    }
}

/// A restriction of a calendar to one year, month, week, or day.
#[derive(Clone)]
pub struct CalendarView {
    scope: Scope,
    slice: DaySet,
    origin: Origin,
}

impl CalendarView {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// The view of `unit` around a member of `calendar`.
    fn derive(calendar: &DaySet, anchor: Ymd, unit: Unit) -> Self {
        let (y, m, d) = anchor;
        let mut days = DayMap::new();
        let scope = match unit {
            Unit::Year => {
                if let Some(months) = calendar.day_map().get(&y) {
                    days.insert(y, months.clone());
                }
                Scope::Year(y)
            }
            Unit::Month => {
                days.entry(y)
                    .or_default()
                    .insert(m, calendar.days(y, m).to_vec());
                Scope::Month(y, m)
            }
            Unit::Week => {
                let monday = Date::from_ymd(y, m, d).unwrap_or(Date::MIN).week_start();
                for key in week_window(monday) {
                    if calendar.has(key) {
                        let (wy, wm, wd) = key;
                        days.entry(wy).or_default().entry(wm).or_default().push(wd);
                    }
                }
                Scope::Week(monday)
            }
            Unit::Day => {
                days.entry(y).or_default().insert(m, vec![d]);
                Scope::Day(y, m, d)
            }
        };
        Self {
            scope,
            slice: calendar.restricted_around(days, anchor),
            origin: calendar.origin(),
        }
    }

    pub(crate) fn around(date: &TradingDate, unit: Unit) -> Self {
        Self::derive(
            date.calendar(),
            (date.year(), date.month(), date.day()),
            unit,
        )
    }

    /// Restrict `calendar` (or a view's [`calendar`](Self::calendar)) to one
    /// year.
    ///
    /// # Errors
    /// `NotOnCalendar` if the year holds no trading day.
    pub fn of_year(calendar: &DaySet, year: u16) -> Result<Self> {
        let anchor = calendar
            .first_on_or_after((year, 1, 1))
            .filter(|&(y, _, _)| y == year)
            .ok_or_else(|| missing(calendar, year as i64))?;
        Ok(Self::derive(calendar, anchor, Unit::Year))
    }

    /// Restrict `calendar` to one month.
    ///
    /// # Errors
    /// `NotOnCalendar` if the month holds no trading day.
    pub fn of_month(calendar: &DaySet, year: u16, month: u8) -> Result<Self> {
        let first = calendar
            .days(year, month)
            .first()
            .copied()
            .ok_or_else(|| missing(calendar, year as i64 * 100 + month as i64))?;
        Ok(Self::derive(calendar, (year, month, first), Unit::Month))
    }

    /// Restrict `calendar` to the Monday–Sunday week containing `date`.
    ///
    /// `date` itself need not be a trading day.
    ///
    /// # Errors
    /// `NotOnCalendar` if the week holds no trading day; `InvalidArgument` if
    /// `date` is not a real date.
    pub fn of_week(calendar: &DaySet, date: impl Into<DateLike>) -> Result<Self> {
        let (y, m, d) = date.into().ymd()?;
        let monday = Date::from_ymd(y, m, d)?.week_start();
        let anchor = week_window(monday)
            .find(|&key| calendar.has(key))
            .ok_or_else(|| missing(calendar, monday.to_compact()))?;
        Ok(Self::derive(calendar, anchor, Unit::Week))
    }

    /// Restrict `calendar` to one trading day.
    ///
    /// # Errors
    /// `NotOnCalendar` if `date` is not a trading day.
    pub fn of_day(calendar: &DaySet, date: impl Into<DateLike>) -> Result<Self> {
        Ok(calendar.get(date)?.day_view())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The covered slice.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// The unit this view spans.
    pub fn unit(&self) -> Unit {
        self.scope.unit()
    }

    /// Id of the calendar this view was cut from.
    pub fn id(&self) -> &str {
        self.slice.id()
    }

    /// The view's own days as a calendar.
    pub fn calendar(&self) -> &DaySet {
        &self.slice
    }

    /// The first trading day in the view.
    pub fn start(&self) -> TradingDate {
        self.slice.start()
    }

    /// The last trading day in the view.
    pub fn end(&self) -> TradingDate {
        self.slice.end()
    }

    /// Number of trading days in the view.
    pub fn len(&self) -> usize {
        self.slice.len()
    }

    /// Always `false`: a view holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the view's trading days.
    pub fn iter(&self) -> DaySetIter {
        self.slice.iter()
    }

    /// Return `true` if `date` is a trading day inside the view.
    pub fn contains(&self, date: impl Into<DateLike>) -> bool {
        self.slice.contains(date)
    }

    /// The full calendar, as currently registered under this view's id.
    pub fn full_calendar(&self) -> Result<DaySet> {
        self.origin.resolve()
    }

    /// The view's own unit as a number: `yyyy` for a year, `mm` for a month,
    /// the ISO week number of the Monday for a week, `dd` for a day.
    pub fn as_int(&self) -> i64 {
        match self.scope {
            Scope::Year(y) => y as i64,
            Scope::Month(_, m) => m as i64,
            Scope::Week(monday) => monday.iso_week().1 as i64,
            Scope::Day(_, _, d) => d as i64,
        }
    }

    /// [`as_int`](Self::as_int) as text, zero-padded.
    pub fn as_str(&self) -> String {
        match self.scope {
            Scope::Year(y) => format!("{y:04}"),
            _ => format!("{:02}", self.as_int()),
        }
    }

    // ── Stepping ──────────────────────────────────────────────────────────────

    /// The following view of the same unit that holds a trading day.
    ///
    /// # Errors
    /// `OutOfRange` past the calendar's last day.
    pub fn next(&self) -> Result<Self> {
        let full = self.origin.resolve()?;
        let past = match self.scope {
            Scope::Year(y) => Some((y + 1, 1, 1)),
            Scope::Month(y, 12) => Some((y + 1, 1, 1)),
            Scope::Month(y, m) => Some((y, m + 1, 1)),
            Scope::Week(monday) => monday.add_days(7).ok().map(|d| d.ymd()),
            Scope::Day(y, m, d) => Some((y, m, d + 1)),
        };
        past.and_then(|key| full.first_on_or_after(key))
            .map(|found| Self::derive(&full, found, self.unit()))
            .ok_or_else(|| full.out_of_range(format!("{self} + 1")))
    }

    /// The preceding view of the same unit that holds a trading day.
    ///
    /// # Errors
    /// `OutOfRange` before the calendar's first day.
    pub fn last(&self) -> Result<Self> {
        let full = self.origin.resolve()?;
        let before = match self.scope {
            Scope::Year(1) | Scope::Month(1, 1) => None,
            Scope::Year(y) | Scope::Month(y, 1) => Some((y - 1, 12, 31)),
            Scope::Month(y, m) => Some((y, m - 1, 31)),
            Scope::Week(monday) => monday.add_days(-1).ok().map(|d| d.ymd()),
            Scope::Day(y, m, d) => Some((y, m, d - 1)),
        };
        before
            .and_then(|key| full.last_on_or_before(key))
            .map(|found| Self::derive(&full, found, self.unit()))
            .ok_or_else(|| full.out_of_range(format!("{self} - 1")))
    }

    /// Move `n` units (negative: backward) across the full calendar,
    /// counting only units that hold a trading day.
    ///
    /// # Errors
    /// `OutOfRange` if fewer than `|n|` such units remain; `NotOnCalendar` if
    /// this view's unit no longer exists in the registered calendar.
    pub fn shift(&self, n: i64) -> Result<Self> {
        if n == 0 {
            return Ok(self.clone());
        }
        let full = self.origin.resolve()?;
        let requested = || full.out_of_range(format!("{self} + {n}"));
        match self.scope {
            Scope::Year(y) => {
                let years: Vec<u16> = full.years().collect();
                let pos = years
                    .binary_search(&y)
                    .map_err(|_| missing(&full, y as i64))?;
                let target = offset(pos, n, years.len()).ok_or_else(requested)?;
                Self::of_year(&full, years[target])
            }
            Scope::Month(y, m) => {
                let months: Vec<(u16, u8)> = full
                    .day_map()
                    .iter()
                    .flat_map(|(&yr, ms)| ms.keys().map(move |&mo| (yr, mo)))
                    .collect();
                let pos = months
                    .binary_search(&(y, m))
                    .map_err(|_| missing(&full, y as i64 * 100 + m as i64))?;
                let target = offset(pos, n, months.len()).ok_or_else(requested)?;
                let (ty, tm) = months[target];
                Self::of_month(&full, ty, tm)
            }
            Scope::Week(_) => {
                // Week boundaries are computed, not stored: walk one at a time.
                let mut view = self.clone();
                for _ in 0..n.unsigned_abs() {
                    let step = if n > 0 { view.next() } else { view.last() };
                    view = step.map_err(|_| requested())?;
                }
                Ok(view)
            }
            Scope::Day(y, m, d) => {
                let date = full.get(compact(y, m, d))?;
                Ok(date.add_days(n)?.day_view())
            }
        }
    }
}

fn week_window(monday: Date) -> impl Iterator<Item = Ymd> {
    (0..7).filter_map(move |i| monday.add_days(i).ok().map(|d| d.ymd()))
}

fn offset(pos: usize, n: i64, len: usize) -> Option<usize> {
    let target = pos as i64 + n;
    (0..len as i64).contains(&target).then_some(target as usize)
}

fn missing(calendar: &DaySet, encoded: i64) -> Error {
    Error::NotOnCalendar {
        date: encoded,
        calendar: calendar.id().to_string(),
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

impl std::ops::Add<i64> for &CalendarView {
    type Output = Result<CalendarView>;
    fn add(self, rhs: i64) -> Result<CalendarView> {
        self.shift(rhs)
    }
}

impl std::ops::Sub<i64> for &CalendarView {
    type Output = Result<CalendarView>;
    fn sub(self, rhs: i64) -> Result<CalendarView> {
        let n = rhs.checked_neg().ok_or_else(|| {
            Error::InvalidArgument(format!("{self} - {rhs}: step count overflows"))
        })?;
        self.shift(n)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────────

impl Canonical for CalendarView {
    fn canonical(&self) -> i64 {
        match self.scope {
            Scope::Year(y) => y as i64,
            Scope::Month(y, m) => y as i64 * 100 + m as i64,
            Scope::Week(monday) => monday.to_compact(),
            Scope::Day(y, m, d) => compact(y, m, d),
        }
    }
}

impl PartialEq for CalendarView {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for CalendarView {}

impl PartialOrd for CalendarView {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarView {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl Hash for CalendarView {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl PartialEq<i64> for CalendarView {
    fn eq(&self, other: &i64) -> bool {
        self.canonical() == *other
    }
}

impl PartialOrd<i64> for CalendarView {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.canonical().cmp(other))
    }
}

impl PartialEq<TradingDate> for CalendarView {
    fn eq(&self, other: &TradingDate) -> bool {
        self.canonical() == other.canonical()
    }
}

impl PartialOrd<TradingDate> for CalendarView {
    fn partial_cmp(&self, other: &TradingDate) -> Option<Ordering> {
        Some(self.canonical().cmp(&other.canonical()))
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for CalendarView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.scope {
            Scope::Year(y) => write!(f, "{y:04}"),
            Scope::Month(y, m) => write!(f, "{y:04}-{m:02}"),
            Scope::Week(monday) => {
                let (wy, w) = monday.iso_week();
                write!(f, "{wy:04}-W{w:02}")
            }
            Scope::Day(y, m, d) => write!(f, "{y:04}-{m:02}-{d:02}"),
        }
    }
}

impl std::fmt::Debug for CalendarView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CalendarView({:?} {self}, {})", self.unit(), self.id())
    }
}

/// Sort views by canonical encoding and drop duplicates.
pub(crate) fn dedup_sorted(views: impl IntoIterator<Item = CalendarView>) -> Vec<CalendarView> {
    views
        .into_iter()
        .map(|v| (v.canonical(), v))
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal() -> DaySet {
        // 2024-12-30 is a Monday.
        DaySet::from_dates(
            "v",
            [20241230, 20241231, 20250102, 20250103, 20250106, 20250203],
        )
        .unwrap()
    }

    #[test]
    fn week_straddles_year_end() {
        let c = cal();
        let w = c.get(20250102).unwrap().week_view();
        assert_eq!(w.scope(), Scope::Week(Date::from_ymd(2024, 12, 30).unwrap()));
        assert_eq!(w.calendar().to_compact_dates(), vec![20241230, 20241231, 20250102, 20250103]);
        assert_eq!(w.as_int(), 1);
        assert_eq!(w.to_string(), "2025-W01");
        assert!(w == 20241230_i64);
    }

    #[test]
    fn year_and_month_slices() {
        let c = cal();
        let d = c.get(20250103).unwrap();
        let y = d.year_view();
        assert_eq!(y.calendar().to_compact_dates(), vec![20250102, 20250103, 20250106, 20250203]);
        assert_eq!((y.as_int(), y.as_str()), (2025, "2025".to_string()));
        let m = d.month_view();
        assert_eq!(m.len(), 3);
        assert_eq!(m.as_str(), "01");
        assert_eq!(m.canonical(), 202501);
        let day = d.day_view();
        assert_eq!(day.as_int(), 3);
        assert!(day == d);
    }

    #[test]
    fn explicit_constructors() {
        let c = cal();
        assert_eq!(CalendarView::of_year(&c, 2024).unwrap().len(), 2);
        assert!(CalendarView::of_year(&c, 2023).unwrap_err().is_not_on_calendar());
        assert_eq!(CalendarView::of_month(&c, 2025, 2).unwrap().start().as_int(), 20250203);
        assert!(CalendarView::of_month(&c, 2025, 3).is_err());
        // Sunday 2025-01-05 belongs to the week of Monday 2024-12-30.
        assert_eq!(CalendarView::of_week(&c, 20250105).unwrap().canonical(), 20241230);
        assert!(CalendarView::of_week(&c, 20250115).is_err());
        assert!(CalendarView::of_day(&c, 20250104).is_err());
        // A view's own calendar can be restricted further.
        let y = CalendarView::of_year(&c, 2025).unwrap();
        assert_eq!(CalendarView::of_month(y.calendar(), 2025, 1).unwrap().len(), 3);
    }

    #[test]
    fn view_dates_step_past_the_view() {
        let c = cal();
        let jan = c.get(20250102).unwrap().month_view();
        assert_eq!(jan.end().calendar().len(), 6);
        assert_eq!((&jan.end() + 1).unwrap().as_int(), 20250203);
        let first = jan.iter().next().unwrap();
        assert_eq!(first.last().unwrap().as_int(), 20241231);
    }

    #[test]
    fn restricted_view_keeps_full_calendar() {
        let c = cal();
        let y = CalendarView::of_year(&c, 2025).unwrap();
        let jan = CalendarView::of_month(y.calendar(), 2025, 1).unwrap();
        assert_eq!(jan.last().unwrap().canonical(), 202412);
        assert_eq!(jan.full_calendar().unwrap().len(), 6);
    }

    #[test]
    fn subtracting_min_step_is_rejected() {
        let m = cal().get(20250102).unwrap().month_view();
        assert!(matches!(&m - i64::MIN, Err(Error::InvalidArgument(_))));
        assert_eq!((&m - 1).unwrap().canonical(), 202412);
    }

    #[test]
    fn views_order_by_encoding() {
        let c = cal();
        let a = c.get(20241231).unwrap().month_view();
        let b = c.get(20250106).unwrap().month_view();
        assert!(a < b);
        assert_eq!(dedup_sorted([b.clone(), a.clone(), b.clone()]), vec![a, b]);
    }
}
