//! # effectkit
//!
//! Composable effect types: optional and fallible values, captured
//! exceptions, deferred synchronous and asynchronous effects, environment,
//! log and state threading, error-accumulating validation, lenses and
//! continuations. Every type exposes the same `fmap` / `flat_map` / `apply`
//! surface and converts into its neighbours.
//!
//! ## Overview
//!
//! - **Data**: `Option` and `Result<T, String>` extensions, `Try`, `Unit`
//! - **Type Classes**: Functor, Applicative, Monad, Alternative
//! - **Effects**: `IO`, `TaskIO`, `TaskResult`, Reader/Writer/State and their
//!   `TaskResult`-lifted variants, the `Do` workflow scope, `eff!`
//! - **Control**: `Cont` with `call_cc`
//! - **Optics & Validation**: path-carrying `Lens`, `Validation`, `Validator`
//! - **Transport**: channel, HTTP and database capabilities as effects
//!
//! ## Feature Flags
//!
//! - `typeclass`: Type class traits
//! - `control`: Continuations
//! - `optics`: Lenses
//! - `validation`: `Validation` and `Validator`
//! - `effect`: Synchronous effects and transformers
//! - `async`: `TaskIO`, `TaskResult`, lifted transformers and `Do` (tokio)
//! - `transport`: Transport adapters and configuration
//! - `derive`: `#[derive(Lenses)]`
//! - `serde`: serde support for `Unit` and `Validation`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use effectkit::prelude::*;
//!
//! let parsed = "42".parse::<i32>().map_err(|error| error.to_string());
//! let doubled = parsed.flat_map(|value| Ok::<_, String>(value * 2));
//! assert_eq!(doubled, Ok(84));
//!
//! let checked = Validation::valid(17).ensure(|age| *age >= 18, "Must be adult");
//! assert_eq!(checked.errors(), ["Must be adult"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the data types, type classes, effects and optics. Transport
/// adapters are imported from [`transport`] explicitly.
///
/// ```rust
/// use effectkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::data::*;

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "optics")]
    pub use crate::optics::*;

    #[cfg(feature = "validation")]
    pub use crate::validation::*;

    #[cfg(feature = "effect")]
    pub use crate::effect::*;
}

pub mod data;

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "optics")]
pub mod optics;

#[cfg(feature = "validation")]
pub mod validation;

#[cfg(feature = "effect")]
pub mod effect;

#[cfg(feature = "transport")]
pub mod transport;

#[cfg(feature = "transport")]
pub mod config;
