//! Do-notation workflows over [`TaskResult`].
//!
//! [`Do::run`] hands the body a [`DoScope`]. Every scope operation returns
//! `Result<_, ShortCircuit>`, so the body reads as straight-line code with
//! `?`. The first failure is recorded in the scope and becomes the outcome
//! of the whole workflow, even if the body swallows the signal and returns
//! `Ok`. Once a failure is recorded, every further scope operation refuses to
//! run and hands back the same signal.
//!
//! Resources acquired through [`DoScope::use_resource`] are disposed in
//! reverse acquisition order before the workflow resolves, whatever the
//! outcome. A panic escaping the body is caught at the boundary and becomes
//! a failure carrying the panic message.
//!
//! # Examples
//!
//! ```rust
//! use effectkit::effect::{Do, TaskResult};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let total = Do::execute(|scope| async move {
//!     let a = scope.bind(TaskResult::pure(20)).await?;
//!     let b = scope.bind(TaskResult::pure(22)).await?;
//!     scope.ensure(a < b, "out of order")?;
//!     scope.complete(a + b)
//! })
//! .await;
//! assert_eq!(total, Ok(42));
//!
//! let failed = Do::execute(|scope| async move {
//!     let a: i32 = scope.bind(TaskResult::fail("lookup failed")).await?;
//!     scope.complete(a)
//! })
//! .await;
//! assert_eq!(failed, Err("lookup failed".to_string()));
//! # });
//! ```

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::{FutureExt, Stream, StreamExt};
use parking_lot::Mutex;

use super::cancellation::AsyncDispose;
use super::task_result::TaskResult;
use crate::data::{normalize_error, panic_message};

/// The signal a scope operation returns once the workflow has failed.
///
/// Any `std::error::Error` converts into a `ShortCircuit`, so foreign
/// fallible calls can be `?`-ed inside a workflow body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortCircuit {
    message: String,
}

impl ShortCircuit {
    /// Creates a signal; a blank message becomes `"Unknown error"`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: normalize_error(message.into()),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ShortCircuit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl<E: std::error::Error> From<E> for ShortCircuit {
    fn from(error: E) -> Self {
        Self::new(error.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    ShortCircuited(String),
    Faulted(String),
    Completed,
}

type Disposer = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

struct ScopeState {
    phase: Phase,
    disposers: Vec<Disposer>,
}

/// The handle a workflow body uses to bind effects.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct DoScope {
    state: Arc<Mutex<ScopeState>>,
}

impl fmt::Debug for DoScope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        formatter
            .debug_struct("DoScope")
            .field("phase", &state.phase)
            .field("resources", &state.disposers.len())
            .finish()
    }
}

impl DoScope {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScopeState {
                phase: Phase::Running,
                disposers: Vec::new(),
            })),
        }
    }

    fn recorded_failure(&self) -> Option<String> {
        match &self.state.lock().phase {
            Phase::ShortCircuited(message) | Phase::Faulted(message) => Some(message.clone()),
            Phase::Running | Phase::Completed => None,
        }
    }

    fn guard(&self) -> Result<(), ShortCircuit> {
        self.recorded_failure().map_or(Ok(()), |message| Err(ShortCircuit { message }))
    }

    fn short_circuit(&self, message: impl Into<String>) -> ShortCircuit {
        let message = normalize_error(message.into());
        let mut state = self.state.lock();
        match &state.phase {
            Phase::ShortCircuited(recorded) | Phase::Faulted(recorded) => ShortCircuit {
                message: recorded.clone(),
            },
            Phase::Running | Phase::Completed => {
                tracing::debug!(%message, "workflow short-circuited");
                state.phase = Phase::ShortCircuited(message.clone());
                ShortCircuit { message }
            }
        }
    }

    fn fault(&self, message: &str) {
        tracing::debug!(%message, "workflow body panicked");
        let mut state = self.state.lock();
        if !matches!(state.phase, Phase::ShortCircuited(_) | Phase::Faulted(_)) {
            state.phase = Phase::Faulted(message.to_string());
        }
    }

    fn finish(&self) {
        let mut state = self.state.lock();
        if state.phase == Phase::Running {
            state.phase = Phase::Completed;
        }
    }

    async fn dispose_all(&self) {
        let disposers = std::mem::take(&mut self.state.lock().disposers);
        for disposer in disposers.into_iter().rev() {
            disposer().await;
        }
    }

    /// Returns `true` once a failure has been recorded.
    pub fn is_short_circuited(&self) -> bool {
        self.recorded_failure().is_some()
    }

    /// The recorded failure message, if any.
    pub fn failure_message(&self) -> Option<String> {
        self.recorded_failure()
    }

    /// Awaits `task` and unwraps its value.
    ///
    /// # Errors
    ///
    /// Short-circuits with the task's error, or with the recorded failure
    /// when the scope already failed (the task is then never awaited).
    pub async fn bind<T>(&self, task: TaskResult<T>) -> Result<T, ShortCircuit>
    where
        T: Send + 'static,
    {
        self.guard()?;
        task.await.map_err(|error| self.short_circuit(error))
    }

    /// Alias for [`DoScope::bind`].
    ///
    /// # Errors
    ///
    /// See [`DoScope::bind`].
    pub async fn await_result<T>(&self, task: TaskResult<T>) -> Result<T, ShortCircuit>
    where
        T: Send + 'static,
    {
        self.bind(task).await
    }

    /// Short-circuits with `error` when `condition` is false.
    ///
    /// # Errors
    ///
    /// Returns the signal for `error`, or `"Unknown error"` when it is blank.
    pub fn ensure(&self, condition: bool, error: impl Into<String>) -> Result<(), ShortCircuit> {
        self.guard()?;
        if condition {
            Ok(())
        } else {
            Err(self.short_circuit(error))
        }
    }

    /// Lifts a synchronous result.
    ///
    /// # Errors
    ///
    /// Short-circuits with the result's error.
    pub fn from_result<T>(&self, result: Result<T, String>) -> Result<T, ShortCircuit> {
        self.guard()?;
        result.map_err(|error| self.short_circuit(error))
    }

    /// Awaits an infallible future; a panic short-circuits with its message.
    ///
    /// # Errors
    ///
    /// Short-circuits when the future panics.
    pub async fn from_future<T, Fut>(&self, future: Fut) -> Result<T, ShortCircuit>
    where
        Fut: Future<Output = T>,
    {
        self.guard()?;
        AssertUnwindSafe(future)
            .catch_unwind()
            .await
            .map_err(|payload| self.short_circuit(panic_message(payload.as_ref())))
    }

    /// Awaits a fallible future; an error or a panic short-circuits.
    ///
    /// # Errors
    ///
    /// Short-circuits with the future's error or panic message.
    pub async fn from_fallible<T, Fut>(&self, future: Fut) -> Result<T, ShortCircuit>
    where
        Fut: Future<Output = Result<T, String>>,
    {
        let outcome = self.from_future(future).await?;
        outcome.map_err(|error| self.short_circuit(error))
    }

    /// Acquires a resource that is disposed when the workflow ends.
    ///
    /// # Errors
    ///
    /// Short-circuits when acquisition fails; nothing is registered then.
    pub async fn use_resource<R>(&self, acquire: TaskResult<R>) -> Result<Arc<R>, ShortCircuit>
    where
        R: AsyncDispose,
    {
        let resource = Arc::new(self.bind(acquire).await?);
        let handle = Arc::clone(&resource);
        self.state
            .lock()
            .disposers
            .push(Box::new(move || async move { handle.dispose().await }.boxed()));
        Ok(resource)
    }

    /// Runs `body` for every item of `stream`, stopping at the first
    /// short-circuit.
    ///
    /// # Errors
    ///
    /// Returns the first signal raised by `body` or recorded in the scope.
    pub async fn for_each<S, F, Fut>(&self, stream: S, mut body: F) -> Result<(), ShortCircuit>
    where
        S: Stream,
        F: FnMut(S::Item) -> Fut,
        Fut: Future<Output = Result<(), ShortCircuit>>,
    {
        let mut stream = std::pin::pin!(stream);
        while let Some(item) = stream.next().await {
            self.guard()?;
            body(item).await?;
        }
        self.guard()
    }

    /// Unwraps a stream-producing task, then iterates it with `body`.
    ///
    /// # Errors
    ///
    /// Short-circuits when the task fails or `body` does.
    pub async fn for_each_result<S, F, Fut>(&self, task: TaskResult<S>, body: F) -> Result<(), ShortCircuit>
    where
        S: Stream + Send + 'static,
        F: FnMut(S::Item) -> Fut,
        Fut: Future<Output = Result<(), ShortCircuit>>,
    {
        let stream = self.bind(task).await?;
        self.for_each(stream, body).await
    }

    /// Finalizes the workflow with `value`.
    ///
    /// # Errors
    ///
    /// Returns the recorded signal when the scope already failed.
    pub fn complete<T>(&self, value: T) -> Result<T, ShortCircuit> {
        self.guard()?;
        self.finish();
        Ok(value)
    }
}

/// Entry points for workflow bodies.
#[derive(Clone, Copy, Debug, Default)]
pub struct Do;

impl Do {
    /// Builds a [`TaskResult`] that runs `body` in a fresh scope when
    /// awaited.
    pub fn run<T, F, Fut>(body: F) -> TaskResult<T>
    where
        T: Send + 'static,
        F: FnOnce(DoScope) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ShortCircuit>> + Send + 'static,
    {
        TaskResult::new(async move {
            let scope = DoScope::new();
            let handle = scope.clone();
            let outcome = AssertUnwindSafe(async move { body(handle).await })
                .catch_unwind()
                .await;

            let result = match outcome {
                Ok(Ok(value)) => match scope.recorded_failure() {
                    Some(message) => Err(message),
                    None => {
                        scope.finish();
                        Ok(value)
                    }
                },
                Ok(Err(signal)) => Err(scope.short_circuit(signal.message).message),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    scope.fault(&message);
                    Err(scope.recorded_failure().unwrap_or(message))
                }
            };

            scope.dispose_all().await;
            result
        })
    }

    /// Runs `body` and awaits its outcome.
    ///
    /// # Errors
    ///
    /// Returns the first failure recorded by the workflow.
    pub async fn execute<T, F, Fut>(body: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(DoScope) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ShortCircuit>> + Send + 'static,
    {
        Self::run(body).await
    }
}
