//! Control structures.
//!
//! - [`Cont`]: the continuation monad, with [`Cont::call_cc`] for early exit
//!   through an [`Escape`] handle
//!
//! ```rust
//! use effectkit::control::Cont;
//!
//! let cont: Cont<i32, i32> = Cont::pure(42);
//! assert_eq!(cont.run(|x| x * 2), 84);
//! ```

mod continuation;

pub use continuation::{Cont, Escape};
