//! Derive macros for effectkit optics.
//!
//! - [`Lenses`]: one named `Lens` constructor per struct field
//!
//! ```rust,ignore
//! use effectkit::optics::Lenses;
//!
//! #[derive(Clone, Lenses)]
//! struct Person {
//!     name: String,
//!     #[lens(path = "Age")]
//!     age: u32,
//! }
//!
//! let person = Person { name: "Ada".into(), age: 30 };
//! assert_eq!(Person::name_lens().get(&person), "Ada");
//! assert_eq!(Person::age_lens().describe(), "Age");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod lenses;

use proc_macro::TokenStream;

/// Generates `{field}_lens()` for every named field.
///
/// Each constructor returns `effectkit::optics::Lens<Self, FieldType>`
/// carrying the field name as its path. `#[lens(path = "...")]` on a field
/// overrides the path. Field types must implement `Clone`.
///
/// Tuple structs, unit structs, enums and unions are rejected with a
/// compile error.
#[proc_macro_derive(Lenses, attributes(lens))]
pub fn derive_lenses(input: TokenStream) -> TokenStream {
    lenses::derive_lenses_impl(input)
}
