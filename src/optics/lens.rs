//! Path-carrying lenses.
//!
//! A [`Lens<S, T>`] focuses on a `T` inside an `S`: `get` reads it, `set`
//! returns a new `S` with the focus replaced. Every lens may carry a path
//! (`"address.city"`), which composition joins with `.` and which the
//! validation layer uses to prefix error messages.
//!
//! # Laws
//!
//! 1. **GetPut**: `lens.set(source.clone(), lens.get(&source)) == source`
//! 2. **PutGet**: `lens.get(&lens.set(source, value.clone())) == value`
//! 3. **PutPut**: `lens.set(lens.set(source, v1), v2) == lens.set(source, v2)`
//!
//! # Examples
//!
//! ```
//! use effectkit::lens;
//! use effectkit::optics::Lens;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Address { city: String }
//! #[derive(Clone, Debug, PartialEq)]
//! struct Person { name: String, address: Address }
//!
//! let address = lens!(Person, address);
//! let city = lens!(Address, city);
//! let person_city = address.compose(&city).unwrap();
//!
//! let person = Person { name: "Dana".into(), address: Address { city: "Paris".into() } };
//! assert_eq!(person_city.get(&person), "Paris");
//! assert_eq!(person_city.describe(), "address.city");
//! assert_eq!(person_city.set(person, "Lyon".into()).address.city, "Lyon");
//! ```

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// The path of [`Lens::identity`] and of compositions without any named
/// operand.
pub const IDENTITY_PATH: &str = "$";

/// Errors raised by lens operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LensError {
    /// The lens was created with `Lens::default()` and has no accessors.
    #[error("lens is not initialized")]
    Uninitialized,
    /// An operand of a lens operation was unusable.
    #[error("invalid lens argument: {0}")]
    InvalidArgument(String),
}

type Getter<S, T> = Arc<dyn Fn(&S) -> T + Send + Sync>;
type Setter<S, T> = Arc<dyn Fn(S, T) -> S + Send + Sync>;

/// A getter/setter pair focusing on a `T` inside an `S`.
pub struct Lens<S, T> {
    accessors: Option<(Getter<S, T>, Setter<S, T>)>,
    path: Option<String>,
}

impl<S, T> Lens<S, T> {
    /// Creates an unnamed lens.
    pub fn new<G, St>(getter: G, setter: St) -> Self
    where
        G: Fn(&S) -> T + Send + Sync + 'static,
        St: Fn(S, T) -> S + Send + Sync + 'static,
    {
        Self {
            accessors: Some((Arc::new(getter), Arc::new(setter))),
            path: None,
        }
    }

    /// Creates a lens carrying `path`.
    pub fn named<G, St>(getter: G, setter: St, path: impl Into<String>) -> Self
    where
        G: Fn(&S) -> T + Send + Sync + 'static,
        St: Fn(S, T) -> S + Send + Sync + 'static,
    {
        Self {
            path: Some(path.into()),
            ..Self::new(getter, setter)
        }
    }

    /// Returns `true` unless the lens came from `Lens::default()`.
    pub const fn is_initialized(&self) -> bool {
        self.accessors.is_some()
    }

    /// The path, if one was given.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn accessors(&self) -> Result<&(Getter<S, T>, Setter<S, T>), LensError> {
        self.accessors.as_ref().ok_or(LensError::Uninitialized)
    }

    /// Reads the focus.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Uninitialized`] for a default lens.
    pub fn try_get(&self, source: &S) -> Result<T, LensError> {
        self.accessors().map(|(getter, _)| getter(source))
    }

    /// Replaces the focus.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Uninitialized`] for a default lens.
    pub fn try_set(&self, source: S, value: T) -> Result<S, LensError> {
        self.accessors().map(|(_, setter)| setter(source, value))
    }

    /// Reads the focus.
    ///
    /// # Panics
    ///
    /// Panics when the lens is uninitialized.
    pub fn get(&self, source: &S) -> T {
        match self.try_get(source) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Replaces the focus.
    ///
    /// # Panics
    ///
    /// Panics when the lens is uninitialized.
    pub fn set(&self, source: S, value: T) -> S {
        match self.try_set(source, value) {
            Ok(updated) => updated,
            Err(error) => panic!("{error}"),
        }
    }

    /// Replaces the focus with `function` applied to it.
    ///
    /// # Panics
    ///
    /// Panics when the lens is uninitialized.
    pub fn over<F>(&self, source: S, function: F) -> S
    where
        F: FnOnce(T) -> T,
    {
        let current = self.get(&source);
        self.set(source, function(current))
    }

    /// Focuses further through `child`.
    ///
    /// The composed path is `"parent.child"` when both are named, the single
    /// name when only one is, and `"$"` when neither is. The identity path
    /// counts as unnamed.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidArgument`] when either lens is
    /// uninitialized.
    pub fn compose<U>(&self, child: &Lens<T, U>) -> Result<Lens<S, U>, LensError>
    where
        S: 'static,
        T: 'static,
        U: 'static,
    {
        let (parent_get, parent_set) = self
            .accessors()
            .map_err(|_| LensError::InvalidArgument("parent lens is not initialized".to_string()))?
            .clone();
        let (child_get, child_set) = child
            .accessors()
            .map_err(|_| LensError::InvalidArgument("child lens is not initialized".to_string()))?
            .clone();

        let getter_parent = Arc::clone(&parent_get);
        Ok(Lens::named(
            move |source: &S| child_get(&getter_parent(source)),
            move |source: S, value: U| {
                let inner = parent_get(&source);
                parent_set(source, child_set(inner, value))
            },
            compose_paths(self.path(), child.path()),
        ))
    }

    /// The path, or `"{S}.{T}"` short type names when the lens is unnamed.
    pub fn describe(&self) -> String {
        self.path
            .clone()
            .unwrap_or_else(|| format!("{}.{}", short_type_name::<S>(), short_type_name::<T>()))
    }
}

impl<S: Clone + 'static> Lens<S, S> {
    /// The lens focusing on the whole value, with path `"$"`.
    pub fn identity() -> Self {
        Self::named(S::clone, |_, value| value, IDENTITY_PATH)
    }
}

impl<S, T> Default for Lens<S, T> {
    /// An uninitialized lens.
    fn default() -> Self {
        Self {
            accessors: None,
            path: None,
        }
    }
}

impl<S, T> Clone for Lens<S, T> {
    fn clone(&self) -> Self {
        Self {
            accessors: self.accessors.clone(),
            path: self.path.clone(),
        }
    }
}

impl<S, T> fmt::Display for Lens<S, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(formatter, "Lens({path})"),
            None => write!(formatter, "Lens({}->{})", short_type_name::<S>(), short_type_name::<T>()),
        }
    }
}

impl<S, T> fmt::Debug for Lens<S, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Lens")
            .field("path", &self.path)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

fn compose_paths(parent: Option<&str>, child: Option<&str>) -> String {
    fn named(path: Option<&str>) -> Option<&str> {
        path.filter(|path| *path != IDENTITY_PATH)
    }

    match (named(parent), named(child)) {
        (Some(parent), Some(child)) => format!("{parent}.{child}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => IDENTITY_PATH.to_string(),
    }
}

/// `alloc::vec::Vec<my_crate::Item>` becomes `Vec<Item>`.
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut segment = String::new();
    for character in full.chars() {
        if character.is_alphanumeric() || character == '_' || character == ':' {
            segment.push(character);
        } else {
            short.push_str(segment.rsplit("::").next().unwrap_or_default());
            segment.clear();
            short.push(character);
        }
    }
    short.push_str(segment.rsplit("::").next().unwrap_or_default());
    short
}

/// Builds a named [`Lens`] for a field (or a dotted chain of fields) of a
/// struct. The path is the field chain as written.
///
/// ```
/// use effectkit::lens;
///
/// #[derive(Clone)]
/// struct Inner { value: i32 }
/// #[derive(Clone)]
/// struct Outer { inner: Inner }
///
/// let value = lens!(Outer, inner.value);
/// let outer = Outer { inner: Inner { value: 1 } };
/// assert_eq!(value.get(&outer), 1);
/// assert_eq!(value.set(outer, 5).inner.value, 5);
/// assert_eq!(value.describe(), "inner.value");
/// ```
#[macro_export]
macro_rules! lens {
    ($source:ty, $($field:ident).+) => {
        $crate::optics::Lens::named(
            |source: &$source| source.$($field).+.clone(),
            |mut source: $source, value| {
                source.$($field).+ = value;
                source
            },
            [$(stringify!($field)),+].join("."),
        )
    };
}
