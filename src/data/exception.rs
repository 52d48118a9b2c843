//! Captured errors carried by [`Try`](super::Try).

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Fallback message used when a panic payload is neither `&str` nor `String`.
pub const UNKNOWN_PANIC: &str = "Unknown panic";

#[derive(Debug, Error)]
enum Captured {
    #[error("{0}")]
    Message(String),
    #[error("{0}")]
    Panic(String),
}

/// A shareable, cloneable error object.
///
/// `Exception` holds any `std::error::Error` behind an `Arc`, so a failed
/// [`Try`](super::Try) can be cloned and compared without losing the original
/// error. Panics captured by `Try::run` and friends are stored as exceptions
/// whose message is the panic message.
#[derive(Clone)]
pub struct Exception {
    inner: Arc<dyn Error + Send + Sync + 'static>,
}

impl Exception {
    /// Wraps an existing error.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Creates an exception that only carries a message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effectkit::data::Exception;
    ///
    /// let exception = Exception::msg("broken");
    /// assert_eq!(exception.message(), "broken");
    /// ```
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Captured::Message(message.into()))
    }

    /// Converts a panic payload into an exception carrying the panic message.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::new(Captured::Panic(panic_message(payload.as_ref())))
    }

    /// The error's display text.
    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    /// Returns `true` if this exception was produced from a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(
            self.inner.downcast_ref::<Captured>(),
            Some(Captured::Panic(_))
        )
    }

    /// Attempts to view the wrapped error as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// Panics with this exception's message.
    ///
    /// # Panics
    ///
    /// Always.
    pub fn resume(self) -> ! {
        panic!("{}", self.message())
    }
}

impl fmt::Debug for Exception {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Exception")
            .field("message", &self.message())
            .finish()
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, formatter)
    }
}

impl Error for Exception {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source()
    }
}

/// Two exceptions are equal when their messages are equal.
impl PartialEq for Exception {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.message() == other.message()
    }
}

impl Eq for Exception {}

/// Extracts the message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        UNKNOWN_PANIC.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::panic::catch_unwind;

    #[derive(Debug, Error)]
    #[error("parse failed at {position}")]
    struct ParseError {
        position: usize,
    }

    #[rstest]
    fn wraps_typed_error() {
        let exception = Exception::new(ParseError { position: 3 });
        assert_eq!(exception.message(), "parse failed at 3");
        assert_eq!(
            exception.downcast_ref::<ParseError>().map(|error| error.position),
            Some(3)
        );
        assert!(!exception.is_panic());
    }

    #[rstest]
    fn captures_str_panic() {
        let payload = catch_unwind(|| panic!("boom")).unwrap_err();
        let exception = Exception::from_panic(payload);
        assert_eq!(exception.message(), "boom");
        assert!(exception.is_panic());
    }

    #[rstest]
    fn captures_formatted_panic() {
        let payload = catch_unwind(|| panic!("code {}", 7)).unwrap_err();
        assert_eq!(Exception::from_panic(payload).message(), "code 7");
    }

    #[rstest]
    fn unknown_payload_uses_fallback() {
        let payload = catch_unwind(|| std::panic::panic_any(42_u8)).unwrap_err();
        assert_eq!(Exception::from_panic(payload).message(), UNKNOWN_PANIC);
    }

    #[rstest]
    fn equality_compares_messages() {
        assert_eq!(Exception::msg("same"), Exception::msg("same"));
        assert_ne!(Exception::msg("left"), Exception::msg("right"));
    }
}
