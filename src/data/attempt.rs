//! `Try`: a result whose failure side is a captured [`Exception`].

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use super::exception::Exception;
#[cfg(feature = "effect")]
use crate::effect::IO;
#[cfg(feature = "async")]
use crate::effect::TaskResult;

/// The outcome of a computation that may have failed with an exception.
///
/// `Try` is `Result`'s structured sibling: instead of a message it keeps the
/// whole [`Exception`], so callers can inspect or downcast the error.
/// [`Try::run`] captures panics, which makes it the bridge from code that
/// panics on failure into the value world.
///
/// # Examples
///
/// ```rust
/// use effectkit::data::Try;
///
/// let parsed = Try::run(|| "42".parse::<i32>().unwrap_or_else(|error| panic!("{error}")));
/// assert_eq!(parsed.fmap(|x| x + 1).value(), Some(&43));
///
/// let failed: Try<i32> = Try::run(|| panic!("broken"));
/// assert_eq!(failed.to_result(), Err("broken".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Try<T> {
    /// The computation produced a value.
    Success(T),
    /// The computation failed.
    Failure(Exception),
}

impl<T> Try<T> {
    /// Runs `function`, capturing a panic as a failure.
    pub fn run<F>(function: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match catch_unwind(AssertUnwindSafe(function)) {
            Ok(value) => Self::Success(value),
            Err(payload) => Self::Failure(Exception::from_panic(payload)),
        }
    }

    /// Runs a fallible `function`, capturing both its error and a panic.
    pub fn run_fallible<F, E>(function: F) -> Self
    where
        F: FnOnce() -> Result<T, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Try::run(function).flat_map(|result| match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(Exception::new(error)),
        })
    }

    /// A successful `Try`.
    pub const fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// A failed `Try`.
    pub const fn failure(exception: Exception) -> Self {
        Self::Failure(exception)
    }

    /// Returns `true` for `Success`.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for `Failure`.
    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The success value, if any.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// The captured exception, if any.
    pub const fn exception(&self) -> Option<&Exception> {
        match self {
            Self::Success(_) => None,
            Self::Failure(exception) => Some(exception),
        }
    }

    /// Transforms the success value.
    pub fn fmap<B, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(T) -> B,
    {
        match self {
            Self::Success(value) => Try::Success(function(value)),
            Self::Failure(exception) => Try::Failure(exception),
        }
    }

    /// Chains a computation that may itself fail.
    pub fn flat_map<B, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(T) -> Try<B>,
    {
        match self {
            Self::Success(value) => function(value),
            Self::Failure(exception) => Try::Failure(exception),
        }
    }

    /// Alias for [`Try::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(T) -> Try<B>,
    {
        self.flat_map(function)
    }

    /// Binds and then combines the original value with the bound one.
    pub fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> Try<C>
    where
        T: Clone,
        F: FnOnce(T) -> Try<B>,
        P: FnOnce(T, B) -> C,
    {
        self.flat_map(|value| {
            let intermediate = binder(value.clone());
            intermediate.fmap(|bound| projector(value, bound))
        })
    }

    /// Picks the first success.
    #[must_use]
    pub fn alt(self, other: Self) -> Self {
        match self {
            Self::Success(value) => Self::Success(value),
            Self::Failure(_) => other,
        }
    }

    /// Replaces a failure with a value computed from the exception.
    #[must_use]
    pub fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(&Exception) -> T,
    {
        match self {
            Self::Success(value) => Self::Success(value),
            Self::Failure(exception) => Self::Success(function(&exception)),
        }
    }

    /// Replaces a failure with another `Try`.
    #[must_use]
    pub fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(Exception) -> Self,
    {
        match self {
            Self::Success(value) => Self::Success(value),
            Self::Failure(exception) => function(exception),
        }
    }

    /// Eliminates the `Try` into a single value.
    pub fn match_with<B, S, E>(self, on_success: S, on_failure: E) -> B
    where
        S: FnOnce(T) -> B,
        E: FnOnce(Exception) -> B,
    {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(exception) => on_failure(exception),
        }
    }

    /// Returns the value or resumes the failure as a panic.
    ///
    /// # Panics
    ///
    /// Panics with the exception's message when `self` is `Failure`.
    pub fn get_or_throw(self) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(exception) => exception.resume(),
        }
    }

    /// Demotes the exception to its message.
    pub fn to_result(self) -> Result<T, String> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(exception) => Err(exception.message()),
        }
    }

    /// Discards the exception.
    pub fn to_option(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Defers the outcome into an `IO` that panics on failure when run.
    #[cfg(feature = "effect")]
    pub fn to_io(self) -> IO<T>
    where
        T: 'static,
    {
        IO::new(move || self.get_or_throw())
    }

    /// Lifts the outcome into an already-resolved `TaskResult`.
    #[cfg(feature = "async")]
    pub fn to_task_result(self) -> TaskResult<T>
    where
        T: Send + 'static,
    {
        TaskResult::from_result(self.to_result())
    }
}

impl<F> Try<F> {
    /// Applies a wrapped function to a wrapped value.
    ///
    /// The function side is inspected first, so its failure wins when both
    /// sides failed.
    pub fn apply<B, Output>(self, value: Try<B>) -> Try<Output>
    where
        F: FnOnce(B) -> Output,
    {
        match (self, value) {
            (Self::Success(function), Try::Success(argument)) => Try::Success(function(argument)),
            (Self::Failure(exception), _) | (Self::Success(_), Try::Failure(exception)) => {
                Try::Failure(exception)
            }
        }
    }
}

impl<T> From<Result<T, Exception>> for Try<T> {
    fn from(result: Result<T, Exception>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(exception) => Self::Failure(exception),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Try<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(formatter, "Success({value})"),
            Self::Failure(exception) => write!(formatter, "Failure({exception})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn run_captures_success_and_panic() {
        let attempt = Try::run(|| 5);
        assert!(attempt.is_success());
        assert_eq!(attempt.clone().get_or_throw(), 5);
        assert!(attempt.to_string().contains("Success"));

        let failure: Try<i32> = Try::run(|| panic!("broken"));
        assert!(failure.is_failure());
        assert_eq!(failure.exception().map(Exception::message), Some("broken".to_string()));
        assert_eq!(failure.to_string(), "Failure(broken)");
    }

    #[rstest]
    fn combinators_follow_success() {
        let attempt = Try::success(5);
        assert_eq!(attempt.clone().fmap(|x| x * 2), Try::Success(10));
        assert_eq!(attempt.clone().flat_map(|x| Try::success(x + 10)), Try::Success(15));
        assert_eq!(
            attempt.clone().flat_map_with(|x| Try::success(x + 1), |value, inner| value + inner),
            Try::Success(11)
        );
        assert_eq!(attempt.match_with(|x| x, |_| 0), 5);
    }

    #[rstest]
    fn recover_and_alt_handle_failures() {
        let failure: Try<i32> = Try::failure(Exception::msg("nope"));
        assert_eq!(failure.clone().recover(|_| 5), Try::Success(5));
        assert!(failure.clone().recover_with(|_| Try::success(5)).is_success());
        assert_eq!(failure.alt(Try::success(7)), Try::Success(7));
    }

    #[rstest]
    fn apply_is_left_biased() {
        let function: Try<fn(i32) -> i32> = Try::failure(Exception::msg("function"));
        let value: Try<i32> = Try::failure(Exception::msg("value"));
        assert_eq!(
            function.apply(value).exception().map(Exception::message),
            Some("function".to_string())
        );

        let add_one: Try<fn(i32) -> i32> = Try::success(|x| x + 1);
        assert_eq!(add_one.apply(Try::success(5)), Try::Success(6));
    }

    #[rstest]
    fn curried_apply_chains() {
        let add = Try::success(|x: i32| move |y: i32| x + y);
        assert_eq!(add.apply(Try::success(2)).apply(Try::success(3)), Try::Success(5));
    }

    #[rstest]
    fn run_fallible_keeps_typed_error() {
        let attempt: Try<i32> = Try::run_fallible(|| "x".parse::<i32>());
        assert!(attempt.exception().is_some_and(|exception| {
            exception.downcast_ref::<std::num::ParseIntError>().is_some()
        }));
    }

    #[rstest]
    fn conversions() {
        let failure: Try<i32> = Try::run(|| panic!("lost"));
        assert_eq!(failure.clone().to_result(), Err("lost".to_string()));
        assert_eq!(failure.to_option(), None);
        assert_eq!(Try::success(1).to_option(), Some(1));
    }

    #[rstest]
    #[should_panic(expected = "resumed")]
    fn get_or_throw_resumes_failure() {
        let failure: Try<i32> = Try::failure(Exception::msg("resumed"));
        let _ = failure.get_or_throw();
    }
}
