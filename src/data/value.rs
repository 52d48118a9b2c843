//! Lifting plain values into the crate's containers.

#[cfg(feature = "effect")]
use crate::effect::IO;
#[cfg(feature = "async")]
use crate::effect::TaskResult;

/// Helpers available on every value once the trait is in scope.
///
/// # Examples
///
/// ```rust
/// use effectkit::data::ValueExt;
///
/// let mut printed = Vec::new();
/// let value = 21_i32.pipe_into(|x| printed.push(x.to_string())) * 2;
/// assert_eq!(value, 42);
/// assert_eq!(printed, vec!["21"]);
///
/// assert_eq!(5_i32.some_if(|x| *x > 3), Some(5));
/// assert_eq!(
///     (-1_i32).validate_with(|x| *x >= 0, |x| format!("{x} is negative")),
///     Err("-1 is negative".to_string())
/// );
/// ```
pub trait ValueExt: Sized {
    /// Hands a reference to `sink` and returns the value unchanged.
    fn pipe_into<F>(self, sink: F) -> Self
    where
        F: FnOnce(&Self),
    {
        sink(&self);
        self
    }

    /// Wraps the value in `Some`.
    fn into_some(self) -> Option<Self> {
        Some(self)
    }

    /// `Some(self)` when `predicate` accepts the value.
    fn some_if<P>(self, predicate: P) -> Option<Self>
    where
        P: FnOnce(&Self) -> bool,
    {
        if predicate(&self) { Some(self) } else { None }
    }

    /// Wraps the value in `Ok`.
    fn into_ok(self) -> Result<Self, String> {
        Ok(self)
    }

    /// `Ok(self)` when `predicate` accepts the value, otherwise the error
    /// built from it.
    fn validate_with<P, E>(self, predicate: P, error_factory: E) -> Result<Self, String>
    where
        P: FnOnce(&Self) -> bool,
        E: FnOnce(&Self) -> String,
    {
        if predicate(&self) {
            Ok(self)
        } else {
            Err(error_factory(&self))
        }
    }

    /// Wraps the value in a pure `IO`.
    #[cfg(feature = "effect")]
    fn into_io(self) -> IO<Self>
    where
        Self: 'static,
    {
        IO::pure(self)
    }

    /// Wraps the value in a successful `TaskResult`.
    #[cfg(feature = "async")]
    fn into_task_result(self) -> TaskResult<Self>
    where
        Self: Send + 'static,
    {
        TaskResult::pure(self)
    }
}

impl<T> ValueExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pipe_into_feeds_the_sink() {
        let mut sink = String::new();
        let value = "hello".pipe_into(|text| sink.push_str(text));
        assert_eq!(value, "hello");
        assert_eq!(sink, "hello");
    }

    #[rstest]
    #[case(4, Some(4))]
    #[case(1, None)]
    fn some_if_filters(#[case] input: i32, #[case] expected: Option<i32>) {
        assert_eq!(input.some_if(|x| *x > 2), expected);
    }

    #[rstest]
    fn lifts() {
        assert_eq!(3_i32.into_some(), Some(3));
        assert_eq!(3_i32.into_ok(), Ok(3));
        assert_eq!(3_i32.validate_with(|x| *x == 3, |_| "unused".into()), Ok(3));
    }

    #[cfg(feature = "effect")]
    #[rstest]
    fn into_io_is_pure() {
        assert_eq!(7_i32.into_io().run_unsafe(), 7);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn into_task_result_succeeds() {
        assert_eq!(7_i32.into_task_result().await, Ok(7));
    }
}
