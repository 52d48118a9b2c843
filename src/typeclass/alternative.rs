//! Alternative type class - choice between computations.
//!
//! `alt` keeps the first successful side. The right-hand side is already
//! evaluated when passed by value; use the container's lazy fallback
//! (`Option::or_else`, `ResultExt::or_else_with`) when it is expensive.

use super::applicative::Applicative;
use crate::data::{Exception, Try, UNKNOWN_ERROR};

/// An applicative with an empty element and a choice operator.
///
/// # Examples
///
/// ```rust
/// use effectkit::typeclass::Alternative;
///
/// assert_eq!(None.alt(Some(5)), Some(5));
/// assert_eq!(Some(1).alt(Some(5)), Some(1));
/// assert_eq!(Option::choice([None, Some(2), Some(3)]), Some(2));
/// ```
pub trait Alternative: Applicative {
    /// The failing element.
    fn empty<A>() -> Self::WithType<A>
    where
        A: 'static;

    /// `self` if it succeeded, otherwise `alternative`.
    #[must_use]
    fn alt(self, alternative: Self) -> Self;

    /// `pure(())` when `condition` holds, otherwise `empty()`.
    #[inline]
    #[must_use]
    fn guard(condition: bool) -> Self::WithType<()>
    where
        Self: Sized,
    {
        if condition {
            Self::pure(())
        } else {
            Self::empty::<()>()
        }
    }

    /// The first success among `alternatives`, or `empty()` if none.
    fn choice<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
        Self::Inner: 'static;
}

// =============================================================================
// Option<A> Implementation
// =============================================================================

impl<A> Alternative for Option<A> {
    #[inline]
    fn empty<B>() -> Option<B>
    where
        B: 'static,
    {
        None
    }

    #[inline]
    fn alt(self, alternative: Self) -> Self {
        self.or(alternative)
    }

    #[inline]
    fn choice<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        Self::Inner: 'static,
    {
        alternatives.into_iter().find(Self::is_some).flatten()
    }
}

// =============================================================================
// Result<T, String> Implementation
// =============================================================================

impl<T> Alternative for Result<T, String> {
    #[inline]
    fn empty<B>() -> Result<B, String>
    where
        B: 'static,
    {
        Err(UNKNOWN_ERROR.to_string())
    }

    #[inline]
    fn alt(self, alternative: Self) -> Self {
        self.or(alternative)
    }

    fn choice<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        Self::Inner: 'static,
    {
        let mut last_failure = None;
        for candidate in alternatives {
            match candidate {
                Ok(value) => return Ok(value),
                Err(error) => last_failure = Some(error),
            }
        }
        last_failure.map_or_else(Self::empty, Err)
    }
}

// =============================================================================
// Try<T> Implementation
// =============================================================================

impl<T> Alternative for Try<T> {
    #[inline]
    fn empty<B>() -> Try<B>
    where
        B: 'static,
    {
        Try::Failure(Exception::msg(UNKNOWN_ERROR))
    }

    #[inline]
    fn alt(self, alternative: Self) -> Self {
        Self::alt(self, alternative)
    }

    fn choice<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        Self::Inner: 'static,
    {
        let mut last_failure = None;
        for candidate in alternatives {
            match candidate {
                Self::Success(value) => return Self::Success(value),
                Self::Failure(exception) => last_failure = Some(exception),
            }
        }
        last_failure.map_or_else(Self::empty, Self::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn option_guard() {
        assert_eq!(<Option<()>>::guard(true), Some(()));
        assert_eq!(<Option<()>>::guard(false), None);
    }

    #[rstest]
    fn result_alt_picks_first_success() {
        let fail = |message: &str| Err::<i32, String>(message.to_string());
        assert_eq!(fail("a").alt(fail("b")), fail("b"));
        assert_eq!(fail("a").alt(Ok(5)), Ok(5));
        assert_eq!(Ok::<i32, String>(1).alt(Ok(5)), Ok(1));
    }

    #[rstest]
    #[case(vec![], Err(UNKNOWN_ERROR.to_string()))]
    #[case(vec![Err("x".to_string()), Ok(2), Ok(3)], Ok(2))]
    #[case(vec![Err("x".to_string()), Err("y".to_string())], Err("y".to_string()))]
    fn result_choice(#[case] candidates: Vec<Result<i32, String>>, #[case] expected: Result<i32, String>) {
        assert_eq!(Result::choice(candidates), expected);
    }

    #[rstest]
    fn try_choice_returns_last_failure_when_all_fail() {
        let chosen = Try::<i32>::choice([
            Try::failure(Exception::msg("first")),
            Try::failure(Exception::msg("second")),
        ]);
        assert_eq!(chosen.to_result(), Err("second".to_string()));
    }

    #[rstest]
    fn try_choice_of_nothing_is_unknown_error() {
        let chosen = Try::<i32>::choice(Vec::new());
        assert_eq!(chosen.to_result(), Err(UNKNOWN_ERROR.to_string()));
    }

    #[rstest]
    fn try_alt_prefers_success() {
        let failure: Try<i32> = Try::failure(Exception::msg("left"));
        assert_eq!(Alternative::alt(failure, Try::success(3)), Try::Success(3));
    }
}
