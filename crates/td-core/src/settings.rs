//! Global library settings.
//!
//! [`Settings`] holds the defaults consulted when a caller does not say
//! otherwise: which calendar id to use, and the window of days a
//! provider-backed calendar is seeded with.  It is a process-wide singleton
//! accessed via a `std::sync::OnceLock`.
//!
//! Thread safety: every value sits behind its own `Mutex`.  A test that
//! changes a setting should restore it with the matching `reset_*` method.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Calendar id used when none is given.
pub const DEFAULT_CALENDAR: &str = "chinese";

/// Default seeding window for provider-backed calendars, `yyyymmdd`, inclusive.
pub const DEFAULT_BUILTIN_SPAN: (i64, i64) = (20040101, 20250101);

/// Process-wide settings used by tradingdate-rs.
pub struct Settings {
    default_calendar: Mutex<String>,
    builtin_span: Mutex<(i64, i64)>,
}

static INSTANCE: OnceLock<Settings> = OnceLock::new();

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Settings {
    /// Return a reference to the global singleton.
    pub fn instance() -> &'static Settings {
        INSTANCE.get_or_init(|| Settings {
            default_calendar: Mutex::new(DEFAULT_CALENDAR.to_string()),
            builtin_span: Mutex::new(DEFAULT_BUILTIN_SPAN),
        })
    }

    /// Return the id of the calendar used when a caller names none.
    pub fn default_calendar(&self) -> String {
        lock(&self.default_calendar).clone()
    }

    /// Change the default calendar id.
    pub fn set_default_calendar(&self, id: impl Into<String>) {
        *lock(&self.default_calendar) = id.into();
    }

    /// Restore the default calendar id to [`DEFAULT_CALENDAR`].
    pub fn reset_default_calendar(&self) {
        self.set_default_calendar(DEFAULT_CALENDAR);
    }

    /// Return the `(from, to)` window, as `yyyymmdd`, that provider-backed
    /// calendars are built over.
    pub fn builtin_span(&self) -> (i64, i64) {
        *lock(&self.builtin_span)
    }

    /// Change the provider seeding window.  Only calendars built after the
    /// change are affected; cached calendars keep the span they were built
    /// with.
    pub fn set_builtin_span(&self, from: i64, to: i64) {
        *lock(&self.builtin_span) = (from.min(to), from.max(to));
    }

    /// Restore the seeding window to [`DEFAULT_BUILTIN_SPAN`].
    pub fn reset_builtin_span(&self) {
        *lock(&self.builtin_span) = DEFAULT_BUILTIN_SPAN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_is_ordered() {
        // Only this test touches the span.
        let s = Settings::instance();
        s.set_builtin_span(20250101, 20240101);
        assert_eq!(s.builtin_span(), (20240101, 20250101));
        s.reset_builtin_span();
        assert_eq!(s.builtin_span(), DEFAULT_BUILTIN_SPAN);
    }

    #[test]
    fn default_calendar_is_chinese() {
        assert_eq!(Settings::instance().default_calendar(), DEFAULT_CALENDAR);
    }
}
