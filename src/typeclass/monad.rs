//! Monad type class - sequencing dependent computations.
//!
//! # Laws
//!
//! ```text
//! pure(a).flat_map(f) == f(a)
//! m.flat_map(pure) == m
//! m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))
//! ```
//!
//! The `flat_map` of every container short-circuits: once a step fails, the
//! remaining steps never run.

use super::applicative::Applicative;
use crate::data::Try;

/// An applicative whose next step may depend on the previous value.
///
/// # Examples
///
/// ```rust
/// use effectkit::typeclass::Monad;
///
/// let halve = |x: i32| if x % 2 == 0 { Some(x / 2) } else { None };
/// assert_eq!(Some(8).flat_map(halve).flat_map(halve), Some(2));
/// assert_eq!(Some(6).flat_map(halve).flat_map(halve), None);
/// ```
pub trait Monad: Applicative {
    /// Feeds the contained value into `function`.
    fn flat_map<B, F>(self, function: F) -> Self::WithType<B>
    where
        F: FnOnce(Self::Inner) -> Self::WithType<B>;

    /// Alias for [`Monad::flat_map`].
    #[inline]
    fn and_then<B, F>(self, function: F) -> Self::WithType<B>
    where
        Self: Sized,
        F: FnOnce(Self::Inner) -> Self::WithType<B>,
    {
        self.flat_map::<B, F>(function)
    }

    /// Sequences `next` after `self`, discarding `self`'s value.
    #[inline]
    fn then<B>(self, next: Self::WithType<B>) -> Self::WithType<B>
    where
        Self: Sized,
    {
        self.flat_map::<B, _>(|_| next)
    }

    /// Binds `binder`, then combines the original value with the bound one.
    ///
    /// This is the three-argument comprehension form
    /// (`from x in m from y in binder(x) select projector(x, y)`).
    #[inline]
    fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> Self::WithType<C>
    where
        Self: Sized,
        Self::Inner: Clone,
        Self::WithType<B>: Monad<Inner = B, WithType<C> = Self::WithType<C>>,
        F: FnOnce(Self::Inner) -> Self::WithType<B>,
        P: FnOnce(Self::Inner, B) -> C + 'static,
        C: 'static,
    {
        self.flat_map::<C, _>(|value| {
            let bound = binder(value.clone());
            bound.flat_map::<C, _>(move |intermediate| {
                <Self::WithType<B> as Applicative>::pure::<C>(projector(value, intermediate))
            })
        })
    }
}

// =============================================================================
// Option<A> Implementation
// =============================================================================

impl<A> Monad for Option<A> {
    #[inline]
    fn flat_map<B, F>(self, function: F) -> Option<B>
    where
        F: FnOnce(A) -> Option<B>,
    {
        Self::and_then(self, function)
    }
}

// =============================================================================
// Result<T, E> Implementation
// =============================================================================

impl<T, E: Clone> Monad for Result<T, E> {
    #[inline]
    fn flat_map<B, F>(self, function: F) -> Result<B, E>
    where
        F: FnOnce(T) -> Result<B, E>,
    {
        Self::and_then(self, function)
    }
}

// =============================================================================
// Try<T> Implementation
// =============================================================================

impl<T> Monad for Try<T> {
    #[inline]
    fn flat_map<B, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(T) -> Try<B>,
    {
        Self::flat_map(self, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(text: &str) -> Result<i32, String> {
        text.parse::<i32>().map_err(|error| error.to_string())
    }

    #[rstest]
    fn result_short_circuits_on_first_failure() {
        let mut calls = 0;
        let result = parse("x").flat_map(|value| {
            calls += 1;
            Ok::<i32, String>(value)
        });
        assert!(result.is_err());
        assert_eq!(calls, 0);
    }

    #[rstest]
    fn flat_map_with_projects_both_values() {
        let projected = Some(10).flat_map_with(|x| Some(x + 1), |value, inner| value + inner);
        assert_eq!(projected, Some(21));

        let failed: Result<i32, String> = Err("bad".to_string());
        assert_eq!(
            failed.flat_map_with(|x| Ok::<i32, String>(x), |value, inner| value + inner),
            Err("bad".to_string())
        );
    }

    #[rstest]
    fn then_discards_left_value() {
        assert_eq!(Some(1).then(Some("next")), Some("next"));
        assert_eq!(None::<i32>.then(Some("next")), None);
    }
}
