//! Core containers: `Option`, `Result`, `Try` and `Unit`.
//!
//! `Option<T>` and `Result<T, String>` are the standard library types,
//! extended through [`OptionExt`] and [`ResultExt`]. [`Try`] keeps a
//! structured [`Exception`] instead of a message.
//!
//! # Examples
//!
//! ```rust
//! use effectkit::data::{OptionExt, ResultExt, Try};
//!
//! let name: Option<&str> = None;
//! let result = name.to_result("name missing");
//! assert_eq!(result.clone().to_option(), None);
//! assert_eq!(result.recover(|error| if error.is_empty() { "?" } else { "anonymous" }), Ok("anonymous"));
//!
//! let attempt: Try<u8> = Try::run(|| u8::try_from(300_i32).unwrap_or_else(|_| panic!("out of range")));
//! assert_eq!(attempt.to_result(), Err("out of range".to_string()));
//! ```

mod attempt;
mod exception;
mod option;
mod result;
mod sequence;
mod unit;
mod value;

pub use attempt::Try;
pub(crate) use exception::panic_message;
pub use exception::{Exception, UNKNOWN_PANIC};
pub use option::{OPTION_HAD_NO_VALUE, OptionExt};
pub use result::{
    DisplayResult, ResultExt, UNKNOWN_ERROR, display_result, failure, normalize_error,
};
pub use sequence::SequenceExt;
pub use unit::Unit;
pub use value::ValueExt;
