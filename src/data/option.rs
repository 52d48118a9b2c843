//! Extensions for `Option<T>`.
//!
//! `fmap`, `flat_map`, `apply` and `alt` come from the type class
//! implementations for `Option`; this trait adds elimination and the
//! conversions into the other containers.

use super::attempt::Try;
use super::exception::Exception;
#[cfg(feature = "effect")]
use crate::effect::IO;
#[cfg(feature = "async")]
use crate::effect::TaskResult;

/// Message used by [`OptionExt::to_io`] when the option is empty.
pub const OPTION_HAD_NO_VALUE: &str = "Option had no value.";

/// Conversions and elimination for `Option<T>`.
pub trait OptionExt<T>: Sized {
    /// Eliminates the option: `on_some(value)` or `on_none()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effectkit::data::OptionExt;
    ///
    /// assert_eq!(Some(2).match_with(|x| x * 10, || 0), 20);
    /// assert_eq!(None::<i32>.match_with(|x| x * 10, || 0), 0);
    /// ```
    fn match_with<B, S, N>(self, on_some: S, on_none: N) -> B
    where
        S: FnOnce(T) -> B,
        N: FnOnce() -> B;

    /// Runs `function` on the value and returns `self` unchanged.
    #[must_use]
    fn tap<F>(self, function: F) -> Self
    where
        F: FnOnce(&T);

    /// `self` if it holds a value, otherwise `fallback()`.
    #[must_use]
    fn alt_with<F>(self, fallback: F) -> Self
    where
        F: FnOnce() -> Self;

    /// The value, or `default` when empty.
    fn value_or(self, default: T) -> T;

    /// The value, or `factory()` when empty.
    fn value_or_else<F>(self, factory: F) -> T
    where
        F: FnOnce() -> T;

    /// `Ok(value)` or `Err(error)`.
    fn to_result(self, error: impl Into<String>) -> Result<T, String>;

    /// `Ok(value)` or `Err(factory())`, evaluating the factory only when empty.
    fn to_result_with<F>(self, factory: F) -> Result<T, String>
    where
        F: FnOnce() -> String;

    /// `Success(value)` or `Failure(factory())`.
    fn to_try<F>(self, factory: F) -> Try<T>
    where
        F: FnOnce() -> Exception;

    /// Defers the option into an `IO` that panics with
    /// [`OPTION_HAD_NO_VALUE`] when run on `None`.
    #[cfg(feature = "effect")]
    fn to_io(self) -> IO<T>
    where
        T: 'static;

    /// Lifts into a resolved `TaskResult`, failing with `error` when empty.
    #[cfg(feature = "async")]
    fn to_task_result(self, error: impl Into<String>) -> TaskResult<T>
    where
        T: Send + 'static;

    /// Like [`OptionExt::to_task_result`], building the error lazily.
    #[cfg(feature = "async")]
    fn to_task_result_with<F>(self, factory: F) -> TaskResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> String;
}

impl<T> OptionExt<T> for Option<T> {
    fn match_with<B, S, N>(self, on_some: S, on_none: N) -> B
    where
        S: FnOnce(T) -> B,
        N: FnOnce() -> B,
    {
        match self {
            Some(value) => on_some(value),
            None => on_none(),
        }
    }

    fn tap<F>(self, function: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Some(value) = &self {
            function(value);
        }
        self
    }

    fn alt_with<F>(self, fallback: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        self.or_else(fallback)
    }

    fn value_or(self, default: T) -> T {
        self.unwrap_or(default)
    }

    fn value_or_else<F>(self, factory: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.unwrap_or_else(factory)
    }

    fn to_result(self, error: impl Into<String>) -> Result<T, String> {
        self.ok_or_else(|| error.into())
    }

    fn to_result_with<F>(self, factory: F) -> Result<T, String>
    where
        F: FnOnce() -> String,
    {
        self.ok_or_else(factory)
    }

    fn to_try<F>(self, factory: F) -> Try<T>
    where
        F: FnOnce() -> Exception,
    {
        match self {
            Some(value) => Try::Success(value),
            None => Try::Failure(factory()),
        }
    }

    #[cfg(feature = "effect")]
    fn to_io(self) -> IO<T>
    where
        T: 'static,
    {
        IO::new(move || match self {
            Some(value) => value,
            None => panic!("{OPTION_HAD_NO_VALUE}"),
        })
    }

    #[cfg(feature = "async")]
    fn to_task_result(self, error: impl Into<String>) -> TaskResult<T>
    where
        T: Send + 'static,
    {
        TaskResult::from_result(self.to_result(error))
    }

    #[cfg(feature = "async")]
    fn to_task_result_with<F>(self, factory: F) -> TaskResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> String,
    {
        TaskResult::from_result(self.to_result_with(factory))
    }
}
