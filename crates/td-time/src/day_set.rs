//! `DaySet` — the sparse, ordered set of trading days of one calendar.
//!
//! Days are grouped by year, then month, then kept as an ascending list of
//! day-of-month numbers.  Lookups and snaps walk the year and month maps with
//! ordered range queries and binary-search a single month's list, so their
//! cost follows the size of a month rather than the length of the history.
//!
//! A `DaySet` is immutable once built and cheap to clone: clones share the
//! same day data.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use crate::date::{days_in_month, Date};
use crate::date_like::{Canonical, DateLike, Ymd};
use crate::registry::{Origin, RegistryState};
use crate::trading_date::TradingDate;
use td_core::errors::{Error, Result};
use td_core::utilities::data_formatters::compact;
use td_core::{ensure, mismatch};

/// `{year: {month: [day, ...]}}`, ascending at every level.
pub type DayMap = BTreeMap<u16, BTreeMap<u8, Vec<u8>>>;

/// The full collection of trading days for one named calendar.
#[derive(Clone)]
pub struct DaySet {
    id: Arc<str>,
    days: Arc<DayMap>,
    first: Ymd,
    last: Ymd,
    registry: Option<Weak<RegistryState>>,
    /// The full calendar a restricted set was cut from; `None` for a full one.
    parent: Option<Arc<DaySet>>,
}

impl DaySet {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Build a day set from a nested `{year: {month: [day]}}` map.
    ///
    /// # Errors
    /// `InvalidArgument` if the map is empty, holds an empty year or month,
    /// a day list that is not strictly ascending, or a day that does not
    /// exist in the Gregorian calendar.
    pub fn new(id: impl Into<String>, days: DayMap) -> Result<Self> {
        let id = id.into();
        ensure!(!days.is_empty(), "calendar '{id}' has no days");
        for (&year, months) in &days {
            ensure!(
                (1..=9999).contains(&year),
                "calendar '{id}': year {year} out of range [1, 9999]"
            );
            ensure!(!months.is_empty(), "calendar '{id}': year {year} has no months");
            for (&month, list) in months {
                ensure!(
                    (1..=12).contains(&month),
                    "calendar '{id}': month {month} of {year} out of range [1, 12]"
                );
                ensure!(!list.is_empty(), "calendar '{id}': {year}-{month:02} has no days");
                ensure!(
                    list.windows(2).all(|w| w[0] < w[1]),
                    "calendar '{id}': days of {year}-{month:02} are not strictly ascending"
                );
                let max = days_in_month(year, month);
                ensure!(
                    list.iter().all(|&d| (1..=max).contains(&d)),
                    "calendar '{id}': {year}-{month:02} holds a day outside [1, {max}]"
                );
            }
        }
        let first = first_in(&days, (1, 1, 1));
        let last = last_in(&days, (9999, 12, 31));
        match (first, last) {
            (Some(first), Some(last)) => Ok(Self {
                id: id.into(),
                days: Arc::new(days),
                first,
                last,
                registry: None,
                parent: None,
            }),
            _ => Err(Error::InvalidArgument(format!("calendar '{id}' has no days"))),
        }
    }

    /// Build a day set from any list of date-like values.
    ///
    /// Order does not matter and duplicates collapse.
    ///
    /// # Errors
    /// `InvalidArgument` if the list is empty or a value is not a real date.
    pub fn from_dates<I, D>(id: impl Into<String>, dates: I) -> Result<Self>
    where
        I: IntoIterator<Item = D>,
        D: Into<DateLike>,
    {
        let id = id.into();
        let mut days = DayMap::new();
        for raw in dates {
            let (y, m, d) = raw.into().ymd()?;
            Date::from_ymd(y, m, d)?;
            days.entry(y).or_default().entry(m).or_default().push(d);
        }
        for list in days.values_mut().flat_map(|months| months.values_mut()) {
            list.sort_unstable();
            list.dedup();
        }
        Self::new(id, days)
    }

    pub(crate) fn bound_to(mut self, registry: Weak<RegistryState>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Copy of this set restricted to `days`, a non-empty subset of its own
    /// data that contains `anchor`.  The copy remembers the full calendar,
    /// however many restrictions deep.
    pub(crate) fn restricted_around(&self, days: DayMap, anchor: Ymd) -> Self {
        let first = first_in(&days, (1, 1, 1)).unwrap_or(anchor);
        let last = last_in(&days, (9999, 12, 31)).unwrap_or(anchor);
        let parent = match &self.parent {
            Some(parent) => parent.clone(),
            None => Arc::new(self.clone()),
        };
        Self {
            id: self.id.clone(),
            days: Arc::new(days),
            first,
            last,
            registry: self.registry.clone(),
            parent: Some(parent),
        }
    }

    /// The full calendar: `self` unless this set is a restriction.
    pub(crate) fn full(&self) -> &DaySet {
        self.parent.as_deref().unwrap_or(self)
    }

    pub(crate) fn origin(&self) -> Origin {
        let full = self.full();
        match &full.registry {
            Some(registry) => Origin::Registry {
                id: full.id.clone(),
                registry: registry.clone(),
            },
            None => Origin::Detached(full.clone()),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The calendar name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The nested day map.
    pub fn day_map(&self) -> &DayMap {
        &self.days
    }

    /// Number of trading days.
    pub fn len(&self) -> usize {
        self.days
            .values()
            .flat_map(|months| months.values())
            .map(Vec::len)
            .sum()
    }

    /// Always `false`: a day set holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Years holding at least one trading day, ascending.
    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        self.days.keys().copied()
    }

    /// Months of `year` holding at least one trading day, ascending.
    pub fn months(&self, year: u16) -> Vec<u8> {
        self.days
            .get(&year)
            .map(|months| months.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Trading days of `year`-`month`, ascending; empty if none.
    pub fn days(&self, year: u16, month: u8) -> &[u8] {
        self.days
            .get(&year)
            .and_then(|months| months.get(&month))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every trading day as a `yyyymmdd` integer, ascending.
    pub fn to_compact_dates(&self) -> Vec<i64> {
        self.iter().map(|t| t.as_int()).collect()
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// Return `true` if `date` is a trading day of this calendar.
    ///
    /// Malformed input is simply not contained.
    pub fn contains(&self, date: impl Into<DateLike>) -> bool {
        date.into()
            .ymd()
            .map(|ymd| self.has(ymd))
            .unwrap_or(false)
    }

    pub(crate) fn has(&self, (y, m, d): Ymd) -> bool {
        self.days(y, m).binary_search(&d).is_ok()
    }

    /// The first trading day.
    ///
    /// Dates handed out by a restricted set belong to the full calendar.
    pub fn start(&self) -> TradingDate {
        TradingDate::bind(self, self.first)
    }

    /// The last trading day.
    pub fn end(&self) -> TradingDate {
        TradingDate::bind(self, self.last)
    }

    /// Resolve `date` exactly.
    ///
    /// # Errors
    /// `NotOnCalendar` if `date` is not a trading day; `InvalidArgument` if it
    /// is malformed.
    pub fn get(&self, date: impl Into<DateLike>) -> Result<TradingDate> {
        let ymd = date.into().ymd()?;
        if self.has(ymd) {
            Ok(TradingDate::bind(self, ymd))
        } else {
            Err(Error::NotOnCalendar {
                date: compact(ymd.0, ymd.1, ymd.2),
                calendar: self.id.to_string(),
            })
        }
    }

    /// Return `date` if it is a trading day, else the first trading day after
    /// it.
    ///
    /// # Errors
    /// `OutOfRange` if no trading day follows `date`.
    pub fn nearest_after(&self, date: impl Into<DateLike>) -> Result<TradingDate> {
        let ymd = date.into().ymd()?;
        self.first_on_or_after(ymd)
            .map(|found| TradingDate::bind(self, found))
            .ok_or_else(|| self.out_of_range(format!("first trading day on or after {}", encode(ymd))))
    }

    /// Return `date` if it is a trading day, else the last trading day before
    /// it.
    ///
    /// # Errors
    /// `OutOfRange` if no trading day precedes `date`.
    pub fn nearest_before(&self, date: impl Into<DateLike>) -> Result<TradingDate> {
        let ymd = date.into().ymd()?;
        self.last_on_or_before(ymd)
            .map(|found| TradingDate::bind(self, found))
            .ok_or_else(|| self.out_of_range(format!("last trading day on or before {}", encode(ymd))))
    }

    pub(crate) fn first_on_or_after(&self, ymd: Ymd) -> Option<Ymd> {
        first_in(&self.days, ymd)
    }

    pub(crate) fn last_on_or_before(&self, ymd: Ymd) -> Option<Ymd> {
        last_in(&self.days, ymd)
    }

    pub(crate) fn out_of_range(&self, requested: impl Into<String>) -> Error {
        Error::OutOfRange {
            requested: requested.into(),
            start: compact(self.first.0, self.first.1, self.first.2),
            end: compact(self.last.0, self.last.1, self.last.2),
            calendar: self.id.to_string(),
        }
    }

    // ── Iteration ─────────────────────────────────────────────────────────────

    /// Iterate every trading day in ascending order.
    ///
    /// Each call starts a fresh walk from the first day.
    pub fn iter(&self) -> DaySetIter {
        DaySetIter {
            set: self.clone(),
            next: Some(self.first),
        }
    }

    // ── Comparison ────────────────────────────────────────────────────────────

    /// The canonical encoding of the calendar as a whole, derived from its
    /// data: `yyyy` when it spans a single year, `yyyymm` for a single month,
    /// `yyyymmdd` for a single day.
    ///
    /// # Errors
    /// `TypeMismatch` when the calendar spans several years and so has no
    /// single encoding.
    pub fn canonical(&self) -> Result<i64> {
        let (fy, fm, fd) = self.first;
        let (ly, lm, ld) = self.last;
        if fy != ly {
            mismatch!(
                "calendar '{}' spans {fy}..={ly} and has no date encoding",
                self.id
            );
        }
        Ok(if fm != lm {
            fy as i64
        } else if fd != ld {
            fy as i64 * 100 + fm as i64
        } else {
            compact(fy, fm, fd)
        })
    }

    /// Order this calendar against a date or view by canonical encoding.
    ///
    /// # Errors
    /// `TypeMismatch` if this calendar has no canonical encoding.
    pub fn try_cmp<C: Canonical + ?Sized>(&self, other: &C) -> Result<Ordering> {
        Ok(self.canonical()?.cmp(&other.canonical()))
    }

    /// Compare two whole calendars.
    ///
    /// Whole calendars are equal when they carry the same id; they have no
    /// order, so two different calendars are a `TypeMismatch`.
    pub fn try_cmp_calendar(&self, other: &DaySet) -> Result<Ordering> {
        if self == other {
            return Ok(Ordering::Equal);
        }
        mismatch!(
            "calendars '{}' and '{}' cannot be ordered against each other",
            self.id,
            other.id
        )
    }
}

/// Whole calendars compare by id.
impl PartialEq for DaySet {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DaySet {}

impl std::fmt::Debug for DaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaySet")
            .field("id", &self.id)
            .field("start", &encode(self.first))
            .field("end", &encode(self.last))
            .finish()
    }
}

impl<'a> IntoIterator for &'a DaySet {
    type Item = TradingDate;
    type IntoIter = DaySetIter;

    fn into_iter(self) -> DaySetIter {
        self.iter()
    }
}

/// Ascending walk over a [`DaySet`].
#[derive(Debug, Clone)]
pub struct DaySetIter {
    set: DaySet,
    next: Option<Ymd>,
}

impl Iterator for DaySetIter {
    type Item = TradingDate;

    fn next(&mut self) -> Option<TradingDate> {
        let current = self.next?;
        let (y, m, d) = current;
        self.next = self.set.first_on_or_after((y, m, d + 1));
        Some(TradingDate::bind(&self.set, current))
    }
}

impl std::iter::FusedIterator for DaySetIter {}

/// The stored form of a day set: its id and `{year: {month: [day]}}` map.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DaySetRecord {
    /// Calendar id.
    pub id: String,
    /// The nested day map.
    pub days: DayMap,
}

#[cfg(feature = "serde")]
impl From<&DaySet> for DaySetRecord {
    fn from(set: &DaySet) -> Self {
        Self {
            id: set.id().to_string(),
            days: set.day_map().clone(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<DaySetRecord> for DaySet {
    type Error = Error;

    fn try_from(record: DaySetRecord) -> Result<Self> {
        DaySet::new(record.id, record.days)
    }
}

// ── Search helpers ──────────────────────────────────────────────────────────

fn encode((y, m, d): Ymd) -> i64 {
    compact(y, m, d)
}

/// Smallest key `>= (y, m, d)`: the rest of the month first, then the first
/// day of the following month, then of the following year.
fn first_in(days: &DayMap, (y, m, d): Ymd) -> Option<Ymd> {
    for (&year, months) in days.range(y..) {
        let from_month = if year == y { m } else { 1 };
        for (&month, list) in months.range(from_month..) {
            let from_day = if year == y && month == m { d } else { 1 };
            let i = list.partition_point(|&x| x < from_day);
            if let Some(&day) = list.get(i) {
                return Some((year, month, day));
            }
        }
    }
    None
}

/// Largest key `<= (y, m, d)`, searching backward the same way.
fn last_in(days: &DayMap, (y, m, d): Ymd) -> Option<Ymd> {
    for (&year, months) in days.range(..=y).rev() {
        let to_month = if year == y { m } else { 12 };
        for (&month, list) in months.range(..=to_month).rev() {
            let to_day = if year == y && month == m { d } else { 31 };
            let i = list.partition_point(|&x| x <= to_day);
            if i > 0 {
                return Some((year, month, list[i - 1]));
            }
        }
    }
    None
}
