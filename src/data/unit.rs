//! The unit value used as the payload of effects that produce nothing.

use std::fmt;

/// A value carrying no information.
///
/// `Unit` stands in for `()` wherever a named, displayable payload reads
/// better: `Validation<Unit>` from a validator, `TaskResult<Unit>` from a
/// channel write, or `IO<Unit>` lifted from an action.
///
/// # Examples
///
/// ```rust
/// use effectkit::data::Unit;
///
/// assert_eq!(Unit.to_string(), "()");
/// assert_eq!(Unit::VALUE, Unit);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit;

impl Unit {
    /// The only inhabitant.
    pub const VALUE: Self = Self;
}

impl fmt::Display for Unit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("()")
    }
}

impl From<()> for Unit {
    fn from((): ()) -> Self {
        Self
    }
}

impl From<Unit> for () {
    fn from(_: Unit) -> Self {}
}
