//! Functor type class - mapping over container values.
//!
//! # Laws
//!
//! ```text
//! fa.fmap(|x| x) == fa
//! fa.fmap(f).fmap(g) == fa.fmap(|x| g(f(x)))
//! ```
//!
//! # Examples
//!
//! ```rust
//! use effectkit::typeclass::Functor;
//!
//! let some_value: Option<i32> = Some(5);
//! assert_eq!(some_value.fmap(|n| n.to_string()), Some("5".to_string()));
//!
//! let failed: Result<i32, String> = Err("bad".to_string());
//! assert_eq!(failed.fmap(|n| n * 2), Err("bad".to_string()));
//! ```

use super::higher::TypeConstructor;
use crate::data::Try;

/// A type whose contents can be transformed without changing its shape.
pub trait Functor: TypeConstructor {
    /// Applies `function` to the contained value.
    fn fmap<B, F>(self, function: F) -> Self::WithType<B>
    where
        F: FnOnce(Self::Inner) -> B + 'static,
        B: 'static;

    /// Applies `function` to a reference to the contained value.
    fn fmap_ref<B, F>(&self, function: F) -> Self::WithType<B>
    where
        F: FnOnce(&Self::Inner) -> B + 'static,
        B: 'static;

    /// Replaces the contained value.
    #[inline]
    fn replace<B>(self, value: B) -> Self::WithType<B>
    where
        Self: Sized,
        B: 'static,
    {
        self.fmap(|_| value)
    }

    /// Discards the contained value.
    #[inline]
    fn void(self) -> Self::WithType<()>
    where
        Self: Sized,
    {
        self.replace(())
    }
}

// =============================================================================
// Option<A> Implementation
// =============================================================================

impl<A> Functor for Option<A> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Option<B>
    where
        F: FnOnce(A) -> B,
    {
        self.map(function)
    }

    #[inline]
    fn fmap_ref<B, F>(&self, function: F) -> Option<B>
    where
        F: FnOnce(&A) -> B,
    {
        self.as_ref().map(function)
    }
}

// =============================================================================
// Result<T, E> Implementation
// =============================================================================

impl<T, E: Clone> Functor for Result<T, E> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Result<B, E>
    where
        F: FnOnce(T) -> B,
    {
        self.map(function)
    }

    #[inline]
    fn fmap_ref<B, F>(&self, function: F) -> Result<B, E>
    where
        F: FnOnce(&T) -> B,
    {
        match self {
            Ok(value) => Ok(function(value)),
            Err(error) => Err(error.clone()),
        }
    }
}

// =============================================================================
// Try<T> Implementation
// =============================================================================

impl<T> Functor for Try<T> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(T) -> B,
    {
        Self::fmap(self, function)
    }

    #[inline]
    fn fmap_ref<B, F>(&self, function: F) -> Try<B>
    where
        F: FnOnce(&T) -> B,
    {
        match self {
            Self::Success(value) => Try::Success(function(value)),
            Self::Failure(exception) => Try::Failure(exception.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Exception;
    use rstest::rstest;

    #[rstest]
    #[case(Some(2), Some(4))]
    #[case(None, None)]
    fn option_fmap(#[case] input: Option<i32>, #[case] expected: Option<i32>) {
        assert_eq!(Functor::fmap(input, |x| x * 2), expected);
    }

    #[rstest]
    fn result_fmap_ref_keeps_original() {
        let value: Result<i32, String> = Ok(3);
        assert_eq!(value.fmap_ref(|x| x + 1), Ok(4));
        assert_eq!(value, Ok(3));
    }

    #[rstest]
    fn try_void_and_replace() {
        let failure: Try<i32> = Try::failure(Exception::msg("gone"));
        assert!(Functor::void(failure).is_failure());
        assert_eq!(Functor::replace(Try::success(1), "x"), Try::Success("x"));
    }
}
