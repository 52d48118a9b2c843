//! Error-accumulating validation.
//!
//! - [`Validation`]: `Valid(T)` or `Invalid(errors)`, combined applicatively
//! - [`Validator`]: reusable rule sets, with lens-scoped rules whose errors
//!   carry the lens path

mod validated;
mod validator;

pub use validated::Validation;
pub use validator::Validator;
