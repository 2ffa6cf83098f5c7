//! `CalendarRegistry` — the named-calendar store.
//!
//! A registry maps calendar ids to [`DaySet`]s.  Entries come from two
//! places: explicit registration of a day list, or a [`WorkdayProvider`]
//! attached under an id, which is asked once for its business days over the
//! seeding window the first time the id is requested.  The result is cached
//! for the registry's lifetime.
//!
//! All access is serialized: lookups share a read lock, builds and
//! registrations take the write lock, and a provider is never run twice for
//! the same id.  A registry handle is cheap to clone; clones share state.
//!
//! [`CalendarRegistry::global`] is the process-wide instance, with the
//! built-in providers attached.  Tests should build their own instance.

use std::collections::HashMap;
use std::sync::{
    Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};

use tracing::{debug, info, warn};

use crate::calendars::China;
use crate::date::Date;
use crate::date_like::DateLike;
use crate::date_range::DateRange;
use crate::day_set::{DayMap, DaySet};
use crate::missing_policy::MissingPolicy;
use crate::provider::WorkdayProvider;
use crate::trading_date::TradingDate;
use td_core::ensure;
use td_core::errors::{Error, Result};
use td_core::settings::Settings;

/// Id under which the China (SSE) provider is attached by
/// [`CalendarRegistry::with_builtin`].
pub const CHINESE: &str = "chinese";

pub(crate) struct RegistryState {
    calendars: RwLock<HashMap<String, DaySet>>,
    providers: RwLock<HashMap<String, Arc<dyn WorkdayProvider>>>,
    span: RwLock<Option<(i64, i64)>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// A thread-safe store of named calendars.
#[derive(Clone)]
pub struct CalendarRegistry {
    inner: Arc<RegistryState>,
}

static GLOBAL: OnceLock<CalendarRegistry> = OnceLock::new();

impl Default for CalendarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarRegistry {
    /// An empty registry with no providers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryState {
                calendars: RwLock::new(HashMap::new()),
                providers: RwLock::new(HashMap::new()),
                span: RwLock::new(None),
            }),
        }
    }

    /// An empty registry with the built-in providers attached
    /// (`"chinese"` → [`China`]).
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.set_provider(CHINESE, China);
        registry
    }

    /// The process-wide registry, created with [`with_builtin`](Self::with_builtin)
    /// on first use.
    pub fn global() -> &'static CalendarRegistry {
        GLOBAL.get_or_init(Self::with_builtin)
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    /// Attach `provider` under `id`.  Takes effect the next time `id` is
    /// built; an already cached calendar is kept until removed.
    pub fn set_provider(&self, id: impl Into<String>, provider: impl WorkdayProvider + 'static) {
        let id = id.into();
        debug!(calendar = %id, provider = provider.name(), "attaching workday provider");
        write(&self.inner.providers).insert(id, Arc::new(provider));
    }

    /// The `(from, to)` window, as `yyyymmdd`, used to seed provider-backed
    /// calendars.  Falls back to [`Settings::builtin_span`].
    pub fn span(&self) -> (i64, i64) {
        (*read(&self.inner.span)).unwrap_or_else(|| Settings::instance().builtin_span())
    }

    /// Override the seeding window for this registry.
    pub fn set_span(&self, from: i64, to: i64) {
        *write(&self.inner.span) = Some((from.min(to), from.max(to)));
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// Return the calendar registered under `id`, building it from the
    /// attached provider on first use.
    ///
    /// # Errors
    /// `InvalidArgument` if `id` is unknown, the seeding window is malformed,
    /// or the provider yields no business day in it.
    pub fn get(&self, id: &str) -> Result<DaySet> {
        if let Some(set) = read(&self.inner.calendars).get(id) {
            debug!(calendar = id, "calendar cache hit");
            return Ok(set.clone());
        }
        let provider = read(&self.inner.providers).get(id).cloned().ok_or_else(|| {
            Error::InvalidArgument(format!("unknown calendar id '{id}'"))
        })?;

        let mut calendars = write(&self.inner.calendars);
        // Another caller may have built it while we waited for the lock.
        if let Some(set) = calendars.get(id) {
            return Ok(set.clone());
        }
        debug!(calendar = id, "calendar cache miss");
        let (from, to) = self.span();
        let days = provider.workdays(Date::from_compact(from)?, Date::from_compact(to)?);
        ensure!(
            !days.is_empty(),
            "provider for '{id}' yields no business day in {from}..={to}"
        );
        let set = DaySet::from_dates(id, days)?.bound_to(Arc::downgrade(&self.inner));
        info!(
            calendar = id,
            provider = provider.name(),
            n_days = set.len(),
            from,
            to,
            "built calendar from provider"
        );
        calendars.insert(id.to_string(), set.clone());
        Ok(set)
    }

    /// Return `true` if `id` is cached or can be built from a provider.
    pub fn contains(&self, id: &str) -> bool {
        read(&self.inner.calendars).contains_key(id) || read(&self.inner.providers).contains_key(id)
    }

    /// Ids of every cached calendar, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = read(&self.inner.calendars).keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    // ── Registration ──────────────────────────────────────────────────────────

    /// Validate `dates` and store them under `id`, replacing any previous
    /// entry.  Dates and views already handed out keep their old data; views
    /// that step across units pick up the new data.
    ///
    /// # Errors
    /// `InvalidArgument` if `id` is empty, `dates` is empty, or a value is not
    /// a real date.
    pub fn register<I, D>(&self, id: &str, dates: I) -> Result<DaySet>
    where
        I: IntoIterator<Item = D>,
        D: Into<DateLike>,
    {
        ensure!(!id.is_empty(), "calendar id must not be empty");
        self.store(DaySet::from_dates(id, dates)?)
    }

    /// Store a prebuilt `{year: {month: [day]}}` map under `id`.
    ///
    /// # Errors
    /// As [`DaySet::new`].
    pub fn register_map(&self, id: &str, days: DayMap) -> Result<DaySet> {
        ensure!(!id.is_empty(), "calendar id must not be empty");
        self.store(DaySet::new(id, days)?)
    }

    fn store(&self, set: DaySet) -> Result<DaySet> {
        let set = set.bound_to(Arc::downgrade(&self.inner));
        let id = set.id().to_string();
        let n_days = set.len();
        if write(&self.inner.calendars).insert(id.clone(), set.clone()).is_some() {
            warn!(calendar = %id, n_days, "replaced existing calendar");
        } else {
            info!(calendar = %id, n_days, "registered calendar");
        }
        Ok(set)
    }

    /// Drop the cached calendar `id`, returning it.  A provider attached
    /// under the same id rebuilds it on the next [`get`](Self::get).
    pub fn remove(&self, id: &str) -> Option<DaySet> {
        write(&self.inner.calendars).remove(id)
    }

    /// Drop every cached calendar.  Providers stay attached.
    pub fn reset(&self) {
        write(&self.inner.calendars).clear();
    }

    // ── Entry points ──────────────────────────────────────────────────────────

    /// Resolve a raw date against calendar `id`.
    ///
    /// # Errors
    /// `NotOnCalendar` under [`MissingPolicy::Raise`] for a non-trading day;
    /// `OutOfRange` when no trading day lies in the snap direction;
    /// `InvalidArgument` for an unknown id or malformed input.
    pub fn date(
        &self,
        raw: impl Into<DateLike>,
        id: &str,
        missing: MissingPolicy,
    ) -> Result<TradingDate> {
        let calendar = self.get(id)?;
        match missing {
            MissingPolicy::UseNext => calendar.nearest_after(raw),
            MissingPolicy::UseBefore => calendar.nearest_before(raw),
            MissingPolicy::Raise => calendar.get(raw),
        }
    }

    /// A range over calendar `id`.
    ///
    /// Without `start` the walk begins at the calendar's first day (last day
    /// for a negative `step`); a given `start` snaps to the first trading day
    /// on or after it.  Without `end` the walk runs to the calendar's edge,
    /// which is yielded only when `include_end` is set.
    ///
    /// # Errors
    /// `InvalidArgument` for an unknown id, malformed bounds, or a zero step;
    /// `OutOfRange` if `start` lies after the calendar's last day.
    pub fn date_range(
        &self,
        start: Option<DateLike>,
        end: Option<DateLike>,
        step: i64,
        id: &str,
        include_end: bool,
    ) -> Result<DateRange> {
        let calendar = self.get(id)?;
        let start = match start {
            Some(raw) => calendar.nearest_after(raw)?,
            None if step < 0 => calendar.end(),
            None => calendar.start(),
        };
        let end = match end {
            Some(raw) => raw,
            None if step < 0 => calendar.start().into(),
            None => calendar.end().into(),
        };
        DateRange::new(start, end, step, include_end)
    }
}

impl std::fmt::Debug for CalendarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut providers: Vec<String> = read(&self.inner.providers).keys().cloned().collect();
        providers.sort_unstable();
        f.debug_struct("CalendarRegistry")
            .field("calendars", &self.ids())
            .field("providers", &providers)
            .finish()
    }
}

/// Where a view goes back to for its full calendar.
#[derive(Clone)]
pub(crate) enum Origin {
    /// Re-resolve `id` through the registry that issued it.
    Registry {
        id: Arc<str>,
        registry: Weak<RegistryState>,
    },
    /// A calendar built outside any registry is its own source.
    Detached(DaySet),
}

impl Origin {
    pub(crate) fn resolve(&self) -> Result<DaySet> {
        match self {
            Origin::Registry { id, registry } => {
                let inner = registry.upgrade().ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "the registry that issued calendar '{id}' has been dropped"
                    ))
                })?;
                CalendarRegistry { inner }.get(id)
            }
            Origin::Detached(set) => Ok(set.clone()),
        }
    }
}
