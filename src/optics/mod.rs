//! Optics for immutable data.
//!
//! - [`Lens`]: a composable getter/setter pair carrying a path
//! - [`lens!`](crate::lens): builds a named lens for a field chain
//! - [`Lenses`] (feature `derive`): generates `{field}_lens()` constructors
//!
//! ```
//! use effectkit::lens;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Address { street: String, city: String }
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Person { name: String, address: Address }
//!
//! let street = lens!(Person, address)
//!     .compose(&lens!(Address, street))
//!     .unwrap();
//!
//! let person = Person {
//!     name: "Alice".to_string(),
//!     address: Address { street: "Main St".to_string(), city: "Tokyo".to_string() },
//! };
//!
//! let updated = street.set(person, "Oak Ave".to_string());
//! assert_eq!(updated.address.street, "Oak Ave");
//! assert_eq!(updated.address.city, "Tokyo");
//! assert_eq!(street.describe(), "address.street");
//! ```

mod lens;

pub use lens::{IDENTITY_PATH, Lens, LensError};

#[cfg(feature = "derive")]
pub use effectkit_derive::Lenses;
