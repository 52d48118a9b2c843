//! Higher-kinded type emulation through generic associated types.
//!
//! Rust cannot abstract over a type constructor such as `Option<_>` directly.
//! [`TypeConstructor`] records the inner type and how to rebuild the same
//! container around a different one, which is what `Functor` and friends need
//! to name their return types.

use crate::data::Try;

/// A container type `F<A>` that can be rebuilt as `F<B>`.
///
/// # Examples
///
/// ```rust
/// use effectkit::typeclass::TypeConstructor;
///
/// fn assert_inner<T: TypeConstructor<Inner = i32>>() {}
/// assert_inner::<Option<i32>>();
/// assert_inner::<Result<i32, String>>();
/// ```
pub trait TypeConstructor {
    /// The element type.
    type Inner;

    /// The same container holding `B`.
    type WithType<B>: TypeConstructor<Inner = B>;
}

// =============================================================================
// Standard Library Type Implementations
// =============================================================================

impl<A> TypeConstructor for Option<A> {
    type Inner = A;
    type WithType<B> = Option<B>;
}

impl<T, E> TypeConstructor for Result<T, E> {
    type Inner = T;
    type WithType<B> = Result<B, E>;
}

// =============================================================================
// Crate Type Implementations
// =============================================================================

impl<T> TypeConstructor for Try<T> {
    type Inner = T;
    type WithType<B> = Try<B>;
}
