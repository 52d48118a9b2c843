//! Channel writers as effects.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{TransportError, failure_message};
use crate::data::Unit;
use crate::effect::{CancellationToken, ReaderTaskResult, TaskResult};

/// Failure message of a write whose token was cancelled.
pub const CHANNEL_WRITE_CANCELLED: &str = "Channel write was cancelled.";

/// Failure message of a second completion.
pub const CHANNEL_ALREADY_COMPLETED: &str = "Channel writer was already completed.";

/// The writing half of a channel.
pub trait WritableSink<T>: Send + Sync + 'static {
    /// Writes without waiting; `false` when the item was not accepted.
    fn try_write(&self, item: T) -> bool;

    /// Writes, waiting for capacity unless `cancellation` fires.
    fn write(
        &self,
        item: T,
        cancellation: &CancellationToken,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Closes the writer, optionally recording an error for readers.
    ///
    /// Returns `false` if the writer was already completed.
    fn complete(&self, error: Option<String>) -> bool;
}

/// A [`WritableSink`] over a bounded tokio channel.
///
/// Completing the sink drops its sender, so the receiver observes the end of
/// the stream once in-flight writes finish.
#[derive(Debug)]
pub struct ChannelSink<T> {
    sender: Mutex<Option<mpsc::Sender<T>>>,
    completion_error: Mutex<Option<String>>,
}

impl<T: Send + 'static> ChannelSink<T> {
    /// Wraps an existing sender.
    pub fn new(sender: mpsc::Sender<T>) -> Self {
        Self {
            sender: Mutex::new(Some(sender)),
            completion_error: Mutex::new(None),
        }
    }

    /// Creates a channel with room for `capacity` items.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<T>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), receiver)
    }

    /// Returns `true` once [`WritableSink::complete`] has succeeded.
    pub fn is_completed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// The error recorded on completion, if any.
    pub fn completion_error(&self) -> Option<String> {
        self.completion_error.lock().clone()
    }

    fn current_sender(&self) -> Option<mpsc::Sender<T>> {
        self.sender.lock().clone()
    }
}

impl<T: Send + 'static> WritableSink<T> for ChannelSink<T> {
    fn try_write(&self, item: T) -> bool {
        self.current_sender()
            .is_some_and(|sender| sender.try_send(item).is_ok())
    }

    async fn write(&self, item: T, cancellation: &CancellationToken) -> Result<(), TransportError> {
        let sender = self.current_sender().ok_or(TransportError::Closed("channel"))?;
        cancellation
            .run_until_cancelled(sender.send(item))
            .await?
            .map_err(|_| TransportError::Closed("channel"))
    }

    fn complete(&self, error: Option<String>) -> bool {
        let Some(sender) = self.sender.lock().take() else {
            return false;
        };
        *self.completion_error.lock() = error;
        drop(sender);
        true
    }
}

/// Writes `item` to `sink`.
///
/// A cancelled token fails with [`CHANNEL_WRITE_CANCELLED`] without
/// touching the sink; any other error fails with its message.
pub fn write_result<S, T>(sink: Arc<S>, item: T, cancellation: CancellationToken) -> TaskResult<Unit>
where
    S: WritableSink<T>,
    T: Send + 'static,
{
    TaskResult::new(async move {
        if cancellation.is_cancelled() {
            return Err(CHANNEL_WRITE_CANCELLED.to_string());
        }
        match sink.write(item, &cancellation).await {
            Ok(()) => Ok(Unit),
            Err(TransportError::Cancelled) => Err(CHANNEL_WRITE_CANCELLED.to_string()),
            Err(error) => Err(failure_message("channel write", &error)),
        }
    })
}

/// Completes `sink`; a second completion fails with
/// [`CHANNEL_ALREADY_COMPLETED`].
pub fn complete_result<S, T>(sink: Arc<S>, error: Option<String>) -> TaskResult<Unit>
where
    S: WritableSink<T>,
    T: Send + 'static,
{
    TaskResult::new(async move {
        if sink.complete(error) {
            Ok(Unit)
        } else {
            Err(CHANNEL_ALREADY_COMPLETED.to_string())
        }
    })
}

/// A reader that writes `item` to the sink it is run against.
pub fn write_reader<S, T>(item: T) -> ReaderTaskResult<Arc<S>, Unit>
where
    S: WritableSink<T>,
    T: Clone + Send + Sync + 'static,
{
    ReaderTaskResult::new(move |sink| write_result(sink, item.clone(), CancellationToken::none()))
}
