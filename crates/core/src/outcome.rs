//! Three-way result for operations with a documented fallback path.
//!
//! `Result` only distinguishes success from failure. Several steps of a turn
//! have a third, expected outcome: the primary path was skipped and a fallback
//! took over (speech model unavailable, arguments unparseable, memory miss).
//! `Outcome` names that case so callers and tests can match on it directly.

use crate::error::Error;

#[derive(Debug)]
pub enum Outcome<T, E = Error> {
    /// The primary path produced a value.
    Ok(T),
    /// The primary path was skipped; the string says why.
    Degraded(String),
    /// Neither the primary nor the fallback path worked.
    Fail(E),
}

impl<T, E> Outcome<T, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(_))
    }

    /// The degradation reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Degraded(reason) => Some(reason),
            _ => None,
        }
    }

    /// The value of the primary path, discarding degradation and failure.
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Degraded(reason) => Outcome::Degraded(reason),
            Outcome::Fail(err) => Outcome::Fail(err),
        }
    }

    /// Collapse into a `Result`, treating degradation as success with `fallback`.
    pub fn or_fallback(self, fallback: impl FnOnce(&str) -> T) -> Result<T, E> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Degraded(reason) => Ok(fallback(&reason)),
            Outcome::Fail(err) => Err(err),
        }
    }
}
