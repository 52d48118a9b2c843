//! `Validation` - an applicative that accumulates every error.
//!
//! Unlike `Result`, combining two invalid values keeps the errors of both,
//! in order. `fmap` never adds errors. There is deliberately no `flat_map`:
//! binding would have to stop at the first failure.
//!
//! # Examples
//!
//! ```rust
//! use effectkit::validation::Validation;
//!
//! let name = Validation::valid("Ada".to_string()).ensure(|name| !name.is_empty(), "Name required");
//! let age = Validation::valid(15).ensure(|age| *age >= 18, "Must be adult");
//!
//! let person = name.combine(age, |name, age| format!("{name} ({age})"));
//! assert_eq!(person.to_string(), "Invalid([Must be adult])");
//! ```

use std::fmt;

use crate::data::failure;
#[cfg(feature = "async")]
use crate::effect::TaskResult;
use crate::typeclass::{Applicative, Functor, TypeConstructor};

/// A value, or the list of everything that was wrong with it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Validation<T> {
    /// A valid value.
    Valid(T),
    /// Accumulated errors. May be empty.
    Invalid(Vec<String>),
}

impl<T> Validation<T> {
    /// A valid value.
    pub const fn valid(value: T) -> Self {
        Self::Valid(value)
    }

    /// An invalid value carrying `errors`.
    pub fn invalid<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        Self::Invalid(errors.into_iter().map(Into::into).collect())
    }

    /// An invalid value carrying a single error.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Invalid(vec![error.into()])
    }

    /// `Valid(value)` when `errors` is empty, otherwise `Invalid(errors)`.
    pub fn from<I, E>(value: T, errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        let errors: Vec<String> = errors.into_iter().map(Into::into).collect();
        if errors.is_empty() { Self::Valid(value) } else { Self::Invalid(errors) }
    }

    /// Returns `true` for `Valid`.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns `true` for `Invalid`.
    pub const fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// The valid value, if any.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    /// The accumulated errors; empty for `Valid`.
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Transforms the valid value; errors are kept as they are.
    pub fn fmap<B, F>(self, function: F) -> Validation<B>
    where
        F: FnOnce(T) -> B,
    {
        match self {
            Self::Valid(value) => Validation::Valid(function(value)),
            Self::Invalid(errors) => Validation::Invalid(errors),
        }
    }

    /// Combines two validations; when either is invalid, the errors of
    /// `self` come first, then those of `other`.
    pub fn combine<B, C, F>(self, other: Validation<B>, function: F) -> Validation<C>
    where
        F: FnOnce(T, B) -> C,
    {
        match (self, other) {
            (Self::Valid(left), Validation::Valid(right)) => Validation::Valid(function(left, right)),
            (Self::Valid(_), Validation::Invalid(errors)) | (Self::Invalid(errors), Validation::Valid(_)) => {
                Validation::Invalid(errors)
            }
            (Self::Invalid(mut left), Validation::Invalid(right)) => {
                left.extend(right);
                Validation::Invalid(left)
            }
        }
    }

    /// Appends `error` when `predicate` rejects the value.
    ///
    /// An already invalid validation has no value to test, so `error` is
    /// appended after the errors it already carries.
    #[must_use]
    pub fn ensure<P>(self, predicate: P, error: impl Into<String>) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        self.ensure_with(predicate, || error.into())
    }

    /// Like [`Validation::ensure`], building the error lazily.
    #[must_use]
    pub fn ensure_with<P, E>(self, predicate: P, error_factory: E) -> Self
    where
        P: FnOnce(&T) -> bool,
        E: FnOnce() -> String,
    {
        match self {
            Self::Valid(value) if predicate(&value) => Self::Valid(value),
            Self::Valid(_) => Self::Invalid(vec![error_factory()]),
            Self::Invalid(mut errors) => {
                errors.push(error_factory());
                Self::Invalid(errors)
            }
        }
    }

    /// The valid value, discarding errors.
    pub fn to_option(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    /// `Ok(value)`, or `Err` with the errors joined by `", "`.
    ///
    /// # Errors
    ///
    /// Returns the joined errors (`"Unknown error"` when there are none).
    pub fn to_result(self) -> Result<T, String> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(errors) => failure(errors.join(", ")),
        }
    }

    /// `Ok(value)`, or `Err(message)` regardless of the individual errors.
    ///
    /// # Errors
    ///
    /// Returns `message` when invalid.
    pub fn to_result_with(self, message: impl Into<String>) -> Result<T, String> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(_) => failure(message),
        }
    }

    /// A resolved `TaskResult`; the failure is `message` when given,
    /// otherwise the joined errors.
    #[cfg(feature = "async")]
    pub fn to_task_result(self, message: Option<String>) -> TaskResult<T>
    where
        T: Send + 'static,
    {
        let result = match message {
            Some(message) => self.to_result_with(message),
            None => self.to_result(),
        };
        TaskResult::from_result(result)
    }
}

impl<F> Validation<F> {
    /// Applies the wrapped function to the wrapped value, accumulating the
    /// function's errors first, then the value's.
    pub fn apply<B, Output>(self, value: Validation<B>) -> Validation<Output>
    where
        F: FnOnce(B) -> Output,
    {
        self.combine(value, |function, argument| function(argument))
    }
}

impl<T: fmt::Display> fmt::Display for Validation<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(value) => write!(formatter, "Valid({value})"),
            Self::Invalid(errors) => write!(formatter, "Invalid([{}])", errors.join(", ")),
        }
    }
}

// =============================================================================
// Type class implementations
// =============================================================================

impl<T> TypeConstructor for Validation<T> {
    type Inner = T;
    type WithType<B> = Validation<B>;
}

impl<T> Functor for Validation<T> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Validation<B>
    where
        F: FnOnce(T) -> B + 'static,
        B: 'static,
    {
        Self::fmap(self, function)
    }

    #[inline]
    fn fmap_ref<B, F>(&self, function: F) -> Validation<B>
    where
        F: FnOnce(&T) -> B + 'static,
        B: 'static,
    {
        match self {
            Self::Valid(value) => Validation::Valid(function(value)),
            Self::Invalid(errors) => Validation::Invalid(errors.clone()),
        }
    }
}

impl<T> Applicative for Validation<T> {
    #[inline]
    fn pure<B>(value: B) -> Validation<B> {
        Validation::Valid(value)
    }

    #[inline]
    fn map2<B, C, F>(self, other: Validation<B>, function: F) -> Validation<C>
    where
        F: FnOnce(T, B) -> C,
    {
        self.combine(other, function)
    }

    #[inline]
    fn apply<B, Output>(self, other: Validation<B>) -> Validation<Output>
    where
        T: FnOnce(B) -> Output,
    {
        Self::apply(self, other)
    }
}
