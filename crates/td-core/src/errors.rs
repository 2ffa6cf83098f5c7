//! Error types for tradingdate-rs.
//!
//! Every fallible operation in the workspace returns [`Result`], whose error
//! side is the single `thiserror`-derived [`Error`] enum below.  Failures are
//! surfaced synchronously to the immediate caller; nothing is retried, since
//! lookup and arithmetic over an immutable day set are deterministic.

use thiserror::Error;

/// The top-level error type used throughout tradingdate-rs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A date was required to be an exact member of a calendar but is absent.
    #[error("date {date} is not on calendar '{calendar}'")]
    NotOnCalendar {
        /// The requested date (`yyyymmdd`).
        date: i64,
        /// Id of the calendar that was searched.
        calendar: String,
    },

    /// The result of an operation, or an input date, lies outside the
    /// registered calendar.
    #[error("{requested} is out of range for calendar '{calendar}' ({start}:{end})")]
    OutOfRange {
        /// Description of what was requested (a date, or a step from a date).
        requested: String,
        /// First day of the calendar (`yyyymmdd`).
        start: i64,
        /// Last day of the calendar (`yyyymmdd`).
        end: i64,
        /// Id of the calendar.
        calendar: String,
    },

    /// Invalid calendar id, policy token, step, raw date, or day list.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two values of incompatible categories were compared or combined.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
}

impl Error {
    /// Return `true` for [`Error::OutOfRange`].
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }

    /// Return `true` for [`Error::NotOnCalendar`].
    pub fn is_not_on_calendar(&self) -> bool {
        matches!(self, Error::NotOnCalendar { .. })
    }
}

/// Shorthand `Result` type used throughout tradingdate-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::InvalidArgument(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use td_core::{ensure, errors::Error};
/// fn non_zero(step: i64) -> td_core::errors::Result<i64> {
///     ensure!(step != 0, "step must be non-zero");
///     Ok(step)
/// }
/// assert!(non_zero(1).is_ok());
/// assert_eq!(
///     non_zero(0),
///     Err(Error::InvalidArgument("step must be non-zero".into()))
/// );
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidArgument(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::TypeMismatch(...))` immediately.
///
/// # Example
/// ```
/// use td_core::{mismatch, errors::Error};
/// fn never() -> td_core::errors::Result<()> {
///     mismatch!("cannot order {} and {}", "a", "b");
/// }
/// assert_eq!(never(), Err(Error::TypeMismatch("cannot order a and b".into())));
/// ```
#[macro_export]
macro_rules! mismatch {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::TypeMismatch(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_echoes_bounds() {
        let err = Error::OutOfRange {
            requested: "20250121 + 1".into(),
            start: 20250101,
            end: 20250121,
            calendar: "test".into(),
        };
        assert_eq!(
            err.to_string(),
            "20250121 + 1 is out of range for calendar 'test' (20250101:20250121)"
        );
        assert!(err.is_out_of_range());
        assert!(!err.is_not_on_calendar());
    }

    #[test]
    fn not_on_calendar_message() {
        let err = Error::NotOnCalendar {
            date: 20250105,
            calendar: "chinese".into(),
        };
        assert_eq!(err.to_string(), "date 20250105 is not on calendar 'chinese'");
        assert!(err.is_not_on_calendar());
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<Error>();
    }
}
