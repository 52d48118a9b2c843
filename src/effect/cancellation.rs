//! Cooperative cancellation signals and asynchronous disposal.
//!
//! A [`CancellationToken`] is shared between the party that may cancel and
//! the operations that observe it. Cancellation is sticky: once cancelled,
//! a token stays cancelled, and every clone sees it.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::Notify;

/// Error produced when an operation observes a cancelled token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

#[derive(Debug, Default)]
struct Signal {
    cancelled: AtomicBool,
    notify: Notify,
}

/// A cloneable cancellation signal.
///
/// # Examples
///
/// ```rust
/// use effectkit::effect::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// assert!(!observer.is_cancelled());
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    signal: Arc<Signal>,
}

impl CancellationToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is already cancelled.
    pub fn cancelled_token() -> Self {
        let token = Self::new();
        token.cancel();
        token
    }

    /// A token that never fires unless cancelled explicitly; the default
    /// for operations that take an optional token.
    pub fn none() -> Self {
        Self::new()
    }

    /// Signals cancellation to every clone of this token.
    pub fn cancel(&self) {
        if !self.signal.cancelled.swap(true, Ordering::SeqCst) {
            self.signal.notify.notify_waiters();
        }
    }

    /// Returns `true` once [`CancellationToken::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.signal.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` if the token has fired.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] when the token is cancelled.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Completes once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.signal.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Runs `future` unless the token fires first.
    ///
    /// A token that is already cancelled wins without polling `future`.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] when the token fires before `future` completes.
    pub async fn run_until_cancelled<F>(&self, future: F) -> Result<F::Output, Cancelled>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => Err(Cancelled),
            output = future => Ok(output),
        }
    }
}

/// A resource released asynchronously.
///
/// Scoped helpers ([`TaskIO::using`](super::TaskIO::using) and
/// [`DoScope::use_resource`](super::DoScope::use_resource)) call `dispose`
/// exactly once, after the resource's last use, on every exit path.
pub trait AsyncDispose: Send + Sync + 'static {
    /// Releases the resource.
    fn dispose(&self) -> impl Future<Output = ()> + Send;
}
