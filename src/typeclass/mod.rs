//! Type class traits shared by the crate's containers.
//!
//! - [`Functor`]: mapping over container values
//! - [`Applicative`]: applying wrapped functions, combining independent values
//! - [`Monad`]: sequencing dependent computations
//! - [`Alternative`]: choosing the first success
//!
//! ## Higher-Kinded Types Emulation
//!
//! Rust has no native higher-kinded types. [`TypeConstructor`] uses generic
//! associated types so that `Functor::fmap` on `Option<A>` can name
//! `Option<B>` as its result.
//!
//! The traits are implemented for `Option`, `Result`, [`Try`](crate::data::Try)
//! and, where the `validation` feature is on,
//! [`Validation`](crate::validation::Validation) (which is an `Applicative`
//! but deliberately not a `Monad`, since binding would stop error
//! accumulation). The effect types (`IO`, `Reader`, `TaskResult`, ...) carry
//! the same operations as inherent methods because their closures have
//! different ownership requirements.
//!
//! # Examples
//!
//! ```rust
//! use effectkit::typeclass::{Applicative, Functor, Monad};
//!
//! let a = Some(1);
//! let b = Some(2);
//! assert_eq!(a.map2(b, |x, y| x + y), Some(3));
//!
//! let parsed: Result<i32, String> = "7".parse::<i32>().map_err(|e| e.to_string());
//! assert_eq!(parsed.fmap(|x| x * 6).flat_map(|x| Ok::<_, String>(x)), Ok(42));
//! ```

mod alternative;
mod applicative;
mod functor;
mod higher;
mod monad;

pub use alternative::Alternative;
pub use applicative::Applicative;
pub use functor::Functor;
pub use higher::TypeConstructor;
pub use monad::Monad;
