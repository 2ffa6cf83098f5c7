//! What to do when a raw date is not on the calendar.

use std::str::FromStr;

use td_core::errors::Error;

/// How to resolve a raw date that is not a member of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MissingPolicy {
    /// Choose the first trading day on or after the given date.
    UseNext,
    /// Choose the last trading day on or before the given date.
    #[default]
    UseBefore,
    /// Fail with `NotOnCalendar`.
    Raise,
}

impl MissingPolicy {
    /// The token that [`FromStr`] accepts for this policy.
    pub fn token(&self) -> &'static str {
        match self {
            MissingPolicy::UseNext => "use_next",
            MissingPolicy::UseBefore => "use_before",
            MissingPolicy::Raise => "raise",
        }
    }
}

impl FromStr for MissingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "use_next" => Ok(MissingPolicy::UseNext),
            "use_before" => Ok(MissingPolicy::UseBefore),
            "raise" => Ok(MissingPolicy::Raise),
            other => Err(Error::InvalidArgument(format!(
                "invalid missing policy {other:?}, expected one of \"use_next\", \"use_before\", \"raise\""
            ))),
        }
    }
}

impl std::fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_parse() {
        for p in [MissingPolicy::UseNext, MissingPolicy::UseBefore, MissingPolicy::Raise] {
            assert_eq!(p.token().parse::<MissingPolicy>().unwrap(), p);
        }
        assert_eq!(MissingPolicy::default(), MissingPolicy::UseBefore);
    }

    #[test]
    fn bad_token_is_invalid_argument() {
        let err = "nearest".parse::<MissingPolicy>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
