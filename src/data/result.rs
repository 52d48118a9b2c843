//! Extensions for `Result<T, String>`, the crate's fallible container.
//!
//! Failures are plain strings. Blank messages are replaced by
//! [`UNKNOWN_ERROR`] wherever a failure is created through [`failure`].

use std::fmt;

use super::attempt::Try;
use super::exception::Exception;
#[cfg(feature = "effect")]
use crate::effect::IO;
#[cfg(feature = "async")]
use crate::effect::TaskResult;

/// Message substituted for a blank or missing error.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Returns `message`, or [`UNKNOWN_ERROR`] if it is blank.
///
/// # Examples
///
/// ```rust
/// use effectkit::data::normalize_error;
///
/// assert_eq!(normalize_error("broken"), "broken");
/// assert_eq!(normalize_error("  "), "Unknown error");
/// ```
pub fn normalize_error(message: impl Into<String>) -> String {
    let message = message.into();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Builds a failed result, normalizing a blank message.
pub fn failure<T>(message: impl Into<String>) -> Result<T, String> {
    Err(normalize_error(message))
}

/// Combinators for `Result<T, String>` beyond those in the standard library.
///
/// `fmap`, `flat_map`, `apply` and `alt` come from the
/// [`Functor`](crate::typeclass::Functor), [`Monad`](crate::typeclass::Monad),
/// [`Applicative`](crate::typeclass::Applicative) and
/// [`Alternative`](crate::typeclass::Alternative) implementations for `Result`.
pub trait ResultExt<T>: Sized {
    /// Replaces a failure with `Ok(function(error))`.
    fn recover<F>(self, function: F) -> Result<T, String>
    where
        F: FnOnce(String) -> T;

    /// Replaces a failure with the result of `function(error)`.
    fn recover_with<F>(self, function: F) -> Result<T, String>
    where
        F: FnOnce(String) -> Result<T, String>;

    /// Evaluates `fallback` only on failure.
    fn or_else_with<F>(self, fallback: F) -> Result<T, String>
    where
        F: FnOnce() -> Result<T, String>;

    /// Runs `function` on the success value and returns `self` unchanged.
    #[must_use]
    fn tap<F>(self, function: F) -> Self
    where
        F: FnOnce(&T);

    /// Runs `function` on the error and returns `self` unchanged.
    #[must_use]
    fn tap_error<F>(self, function: F) -> Self
    where
        F: FnOnce(&str);

    /// Eliminates the result into a single value.
    fn match_with<B, S, E>(self, on_success: S, on_failure: E) -> B
    where
        S: FnOnce(T) -> B,
        E: FnOnce(String) -> B;

    /// Turns a success into a failure when `predicate` rejects the value.
    fn ensure<P>(self, predicate: P, error: impl Into<String>) -> Result<T, String>
    where
        P: FnOnce(&T) -> bool;

    /// Discards the error.
    fn to_option(self) -> Option<T>;

    /// Promotes the error message into an [`Exception`].
    fn to_try(self) -> Try<T>;

    /// Defers the result into an `IO` that panics with the error when run.
    #[cfg(feature = "effect")]
    fn to_io(self) -> IO<T>
    where
        T: 'static;

    /// Lifts the result into an already-resolved `TaskResult`.
    #[cfg(feature = "async")]
    fn to_task_result(self) -> TaskResult<T>
    where
        T: Send + 'static;
}

impl<T> ResultExt<T> for Result<T, String> {
    fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(String) -> T,
    {
        self.or_else(|error| Ok(function(error)))
    }

    fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(String) -> Self,
    {
        self.or_else(function)
    }

    fn or_else_with<F>(self, fallback: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        self.or_else(|_| fallback())
    }

    fn tap<F>(self, function: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Ok(value) = &self {
            function(value);
        }
        self
    }

    fn tap_error<F>(self, function: F) -> Self
    where
        F: FnOnce(&str),
    {
        if let Err(error) = &self {
            function(error);
        }
        self
    }

    fn match_with<B, S, E>(self, on_success: S, on_failure: E) -> B
    where
        S: FnOnce(T) -> B,
        E: FnOnce(String) -> B,
    {
        match self {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    }

    fn ensure<P>(self, predicate: P, error: impl Into<String>) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Ok(value) if predicate(&value) => Ok(value),
            Ok(_) => failure(error),
            Err(existing) => Err(existing),
        }
    }

    fn to_option(self) -> Option<T> {
        self.ok()
    }

    fn to_try(self) -> Try<T> {
        match self {
            Ok(value) => Try::Success(value),
            Err(error) => Try::Failure(Exception::msg(error)),
        }
    }

    #[cfg(feature = "effect")]
    fn to_io(self) -> IO<T>
    where
        T: 'static,
    {
        IO::new(move || match self {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        })
    }

    #[cfg(feature = "async")]
    fn to_task_result(self) -> TaskResult<T>
    where
        T: Send + 'static,
    {
        TaskResult::from_result(self)
    }
}

/// Formats a result as `Ok(value)` or `Error(message)`.
pub struct DisplayResult<'a, T>(pub &'a Result<T, String>);

impl<T: fmt::Display> fmt::Display for DisplayResult<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Ok(value) => write!(formatter, "Ok({value})"),
            Err(error) => write!(formatter, "Error({error})"),
        }
    }
}

/// Borrows a result for display.
///
/// ```rust
/// use effectkit::data::display_result;
///
/// let ok: Result<i32, String> = Ok(3);
/// assert_eq!(display_result(&ok).to_string(), "Ok(3)");
/// ```
pub const fn display_result<T>(result: &Result<T, String>) -> DisplayResult<'_, T> {
    DisplayResult(result)
}
