//! Applicative type class - applying wrapped functions to wrapped values.
//!
//! # Laws
//!
//! ```text
//! pure(id).apply(v) == v
//! pure(f).apply(pure(x)) == pure(f(x))
//! ```
//!
//! For the fallible containers the function side is inspected first: when
//! both sides failed, the function's failure is the one reported.

use super::functor::Functor;
use crate::data::Try;

/// A functor that can lift values and combine independent computations.
///
/// # Examples
///
/// ```rust
/// use effectkit::typeclass::Applicative;
///
/// let x: Option<i32> = <Option<()>>::pure(42);
/// assert_eq!(x, Some(42));
///
/// let add_one: Result<fn(i32) -> i32, String> = Ok(|x| x + 1);
/// assert_eq!(add_one.apply(Ok(1)), Ok(2));
/// ```
pub trait Applicative: Functor {
    /// Lifts a plain value.
    fn pure<B>(value: B) -> Self::WithType<B>;

    /// Combines two independent values with `function`.
    fn map2<B, C, F>(self, other: Self::WithType<B>, function: F) -> Self::WithType<C>
    where
        F: FnOnce(Self::Inner, B) -> C;

    /// Pairs two independent values.
    #[inline]
    fn product<B>(self, other: Self::WithType<B>) -> Self::WithType<(Self::Inner, B)>
    where
        Self: Sized,
    {
        self.map2::<B, _, _>(other, |a, b| (a, b))
    }

    /// Applies the wrapped function in `self` to the wrapped value in `other`.
    fn apply<B, Output>(self, other: Self::WithType<B>) -> Self::WithType<Output>
    where
        Self: Sized,
        Self::Inner: FnOnce(B) -> Output;
}

// =============================================================================
// Option<A> Implementation
// =============================================================================

impl<A> Applicative for Option<A> {
    #[inline]
    fn pure<B>(value: B) -> Option<B> {
        Some(value)
    }

    #[inline]
    fn map2<B, C, F>(self, other: Option<B>, function: F) -> Option<C>
    where
        F: FnOnce(A, B) -> C,
    {
        match (self, other) {
            (Some(a), Some(b)) => Some(function(a, b)),
            _ => None,
        }
    }

    #[inline]
    fn apply<B, Output>(self, other: Option<B>) -> Option<Output>
    where
        A: FnOnce(B) -> Output,
    {
        self.map2(other, |function, argument| function(argument))
    }
}

// =============================================================================
// Result<T, E> Implementation
// =============================================================================

impl<T, E: Clone> Applicative for Result<T, E> {
    #[inline]
    fn pure<B>(value: B) -> Result<B, E> {
        Ok(value)
    }

    #[inline]
    fn map2<B, C, F>(self, other: Result<B, E>, function: F) -> Result<C, E>
    where
        F: FnOnce(T, B) -> C,
    {
        match (self, other) {
            (Ok(a), Ok(b)) => Ok(function(a, b)),
            (Err(error), _) | (_, Err(error)) => Err(error),
        }
    }

    #[inline]
    fn apply<B, Output>(self, other: Result<B, E>) -> Result<Output, E>
    where
        T: FnOnce(B) -> Output,
    {
        self.map2(other, |function, argument| function(argument))
    }
}

// =============================================================================
// Try<T> Implementation
// =============================================================================

impl<T> Applicative for Try<T> {
    #[inline]
    fn pure<B>(value: B) -> Try<B> {
        Try::Success(value)
    }

    #[inline]
    fn map2<B, C, F>(self, other: Try<B>, function: F) -> Try<C>
    where
        F: FnOnce(T, B) -> C,
    {
        match (self, other) {
            (Self::Success(a), Try::Success(b)) => Try::Success(function(a, b)),
            (Self::Failure(exception), _) | (_, Try::Failure(exception)) => {
                Try::Failure(exception)
            }
        }
    }

    #[inline]
    fn apply<B, Output>(self, other: Try<B>) -> Try<Output>
    where
        T: FnOnce(B) -> Output,
    {
        Self::apply(self, other)
    }
}
