//! `WriterTaskResult` - an asynchronous fallible computation with a log.
//!
//! The log is only extended by steps that actually ran: when a step fails,
//! the remainder of the chain is skipped and no further lines are appended.

use std::future::Future;

use super::task_result::TaskResult;
use super::writer::{Writer, combine_logs};
use crate::data::Unit;

/// An asynchronous `Result<(T, Vec<L>), String>`.
///
/// # Examples
///
/// ```rust
/// use effectkit::effect::WriterTaskResult;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let computation = WriterTaskResult::tell("start")
///     .flat_map(|_| WriterTaskResult::pure(21))
///     .fmap(|x| x * 2);
/// assert_eq!(computation.run().await, Ok((42, vec!["start"])));
/// # });
/// ```
#[must_use = "a WriterTaskResult does nothing unless run"]
pub struct WriterTaskResult<T, L> {
    inner: TaskResult<(T, Vec<L>)>,
}

impl<T, L> std::fmt::Debug for WriterTaskResult<T, L> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("<WriterTaskResult>")
    }
}

impl<T, L> WriterTaskResult<T, L>
where
    T: Send + 'static,
    L: Send + 'static,
{
    /// Wraps a computation that already yields a value and its log.
    pub fn new(inner: TaskResult<(T, Vec<L>)>) -> Self {
        Self { inner }
    }

    /// A success with an empty log.
    pub fn pure(value: T) -> Self {
        Self::new(TaskResult::pure((value, Vec::new())))
    }

    /// A failure with no log.
    pub fn fail(error: impl Into<String>) -> Self {
        Self::new(TaskResult::fail(error))
    }

    /// Lifts a synchronous [`Writer`].
    pub fn from_writer(writer: Writer<T, L>) -> Self {
        Self::new(TaskResult::pure(writer.run()))
    }

    /// Lifts a [`TaskResult`] with an empty log.
    pub fn from_task_result(task: TaskResult<T>) -> Self {
        Self::new(task.fmap(|value| (value, Vec::new())))
    }

    /// Awaits the value and its log.
    pub async fn run(self) -> Result<(T, Vec<L>), String> {
        self.inner.await
    }

    /// Awaits the outcome as a synchronous [`Writer`].
    pub async fn to_writer(self) -> Result<Writer<T, L>, String> {
        self.inner.await.map(|(value, logs)| Writer::new(value, logs))
    }

    /// Transforms the value; the log is unchanged.
    pub fn fmap<B, F>(self, function: F) -> WriterTaskResult<B, L>
    where
        B: Send + 'static,
        F: FnOnce(T) -> B + Send + 'static,
    {
        WriterTaskResult::new(self.inner.fmap(|(value, logs)| (function(value), logs)))
    }

    /// Chains a step built from the value; its log lines follow this one's.
    pub fn flat_map<B, F>(self, function: F) -> WriterTaskResult<B, L>
    where
        B: Send + 'static,
        F: FnOnce(T) -> WriterTaskResult<B, L> + Send + 'static,
    {
        WriterTaskResult::new(self.inner.flat_map(|(value, logs)| {
            function(value)
                .inner
                .fmap(move |(next, next_logs)| (next, combine_logs(logs, next_logs)))
        }))
    }

    /// Appends one log line when the computation succeeds.
    pub fn append_log(self, log: L) -> Self {
        Self::new(self.inner.fmap(move |(value, mut logs)| {
            logs.push(log);
            (value, logs)
        }))
    }

    /// Observes the value with an asynchronous side effect.
    pub fn tap<F, Fut>(self, function: F) -> Self
    where
        T: Clone,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new(self.inner.flat_map(|(value, logs)| {
            TaskResult::from_future(async move {
                function(value.clone()).await;
                (value, logs)
            })
        }))
    }
}

impl<L: Send + 'static> WriterTaskResult<Unit, L> {
    /// Records a single log line.
    pub fn tell(log: L) -> Self {
        Self::new(TaskResult::pure((Unit, vec![log])))
    }
}
