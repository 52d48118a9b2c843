//! `TaskIO` - deferred asynchronous side effects.
//!
//! A `TaskIO<T>` is the asynchronous counterpart of [`IO`](super::IO): a
//! boxed `Send` future producing `T`. Failures are panics, exactly as with
//! `IO`, and the `to_*` conversions bring them back as values.
//!
//! # Examples
//!
//! ```rust
//! use effectkit::effect::TaskIO;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let value = TaskIO::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| TaskIO::pure(x + 1))
//!     .run()
//!     .await;
//! assert_eq!(value, 21);
//! # });
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use pin_project_lite::pin_project;

use super::cancellation::{AsyncDispose, CancellationToken, Cancelled};
use super::task_result::TaskResult;
use crate::data::{Exception, Try, Unit};

pin_project! {
    /// A deferred asynchronous computation producing `T`.
    ///
    /// # Monad Laws
    ///
    /// 1. **Left Identity**: `TaskIO::pure(a).flat_map(f) == f(a)`
    /// 2. **Right Identity**: `m.flat_map(TaskIO::pure) == m`
    /// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
    #[must_use = "a TaskIO does nothing unless awaited"]
    pub struct TaskIO<T> {
        #[pin]
        future: BoxFuture<'static, T>,
    }
}

static_assertions::assert_impl_all!(TaskIO<i32>: Send);

impl<T> Future for TaskIO<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().future.poll(context)
    }
}

impl<T> std::fmt::Debug for TaskIO<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("TaskIO").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> TaskIO<T> {
    /// Defers `producer` until the task is awaited.
    pub fn new<F, Fut>(producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::from_future(async move { producer().await })
    }

    /// Wraps an existing future.
    pub fn from_future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        Self {
            future: future.boxed(),
        }
    }

    /// A task that yields `value`.
    pub fn pure(value: T) -> Self {
        Self::from_future(futures::future::ready(value))
    }

    /// Awaits the value.
    pub async fn run(self) -> T {
        self.await
    }

    /// Transforms the value.
    pub fn fmap<B, F>(self, function: F) -> TaskIO<B>
    where
        B: Send + 'static,
        F: FnOnce(T) -> B + Send + 'static,
    {
        TaskIO::from_future(async move { function(self.await) })
    }

    /// Chains a dependent task.
    pub fn flat_map<B, F>(self, function: F) -> TaskIO<B>
    where
        B: Send + 'static,
        F: FnOnce(T) -> TaskIO<B> + Send + 'static,
    {
        TaskIO::from_future(async move { function(self.await).await })
    }

    /// Alias for [`TaskIO::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> TaskIO<B>
    where
        B: Send + 'static,
        F: FnOnce(T) -> TaskIO<B> + Send + 'static,
    {
        self.flat_map(function)
    }

    /// Binds `binder`, then combines the original value with the bound one.
    pub fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> TaskIO<C>
    where
        T: Clone,
        B: Send + 'static,
        C: Send + 'static,
        F: FnOnce(T) -> TaskIO<B> + Send + 'static,
        P: FnOnce(T, B) -> C + Send + 'static,
    {
        self.flat_map(move |value| binder(value.clone()).fmap(move |bound| projector(value, bound)))
    }

    /// Runs `next` after `self`, discarding `self`'s value.
    pub fn then<B>(self, next: TaskIO<B>) -> TaskIO<B>
    where
        B: Send + 'static,
    {
        self.flat_map(move |_| next)
    }

    /// Observes the value.
    pub fn tap<F>(self, function: F) -> Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        Self::from_future(async move {
            let value = self.await;
            function(&value);
            value
        })
    }

    /// Observes the value with an asynchronous side effect.
    pub fn tap_async<F, Fut>(self, function: F) -> Self
    where
        T: Clone,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::from_future(async move {
            let value = self.await;
            function(value.clone()).await;
            value
        })
    }

    /// Waits for `duration`, then yields the value.
    pub fn delay(self, duration: Duration) -> Self {
        Self::from_future(async move {
            tokio::time::sleep(duration).await;
            self.await
        })
    }

    /// Races the task against `token`.
    pub fn with_cancellation(self, token: CancellationToken) -> TaskIO<Result<T, Cancelled>> {
        TaskIO::from_future(async move { token.run_until_cancelled(self).await })
    }

    /// Acquires a resource from the value, uses it, and disposes it.
    ///
    /// The resource is disposed exactly once after `body` finishes, even if
    /// `body` panics; the panic then continues to propagate.
    pub fn using<R, B, A, U>(self, acquire: A, body: U) -> TaskIO<B>
    where
        T: Clone,
        R: AsyncDispose,
        B: Send + 'static,
        A: FnOnce(T) -> TaskIO<R> + Send + 'static,
        U: FnOnce(T, Arc<R>) -> TaskIO<B> + Send + 'static,
    {
        TaskIO::from_future(async move {
            let value = self.await;
            let resource = Arc::new(acquire(value.clone()).await);
            let handle = Arc::clone(&resource);
            let outcome = AssertUnwindSafe(async move { body(value, handle).await })
                .catch_unwind()
                .await;
            resource.dispose().await;
            tracing::debug!("task resource disposed");
            match outcome {
                Ok(result) => result,
                Err(payload) => std::panic::resume_unwind(payload),
            }
        })
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Runs the task; a panic becomes `None`.
    pub async fn to_option(self) -> Option<T> {
        self.to_try().await.to_option()
    }

    /// Runs the task; a panic becomes `Err(message)`.
    pub async fn to_result(self) -> Result<T, String> {
        self.to_try().await.to_result()
    }

    /// Runs the task; a panic becomes `Err(error_factory(&exception))`.
    pub async fn to_result_with<F>(self, error_factory: F) -> Result<T, String>
    where
        F: FnOnce(&Exception) -> String,
    {
        match self.to_try().await {
            Try::Success(value) => Ok(value),
            Try::Failure(exception) => Err(error_factory(&exception)),
        }
    }

    /// Runs the task, capturing a panic as [`Try::Failure`].
    pub async fn to_try(self) -> Try<T> {
        match AssertUnwindSafe(self.future).catch_unwind().await {
            Ok(value) => Try::Success(value),
            Err(payload) => Try::Failure(Exception::from_panic(payload)),
        }
    }

    /// A `TaskResult` whose failure is the panic message.
    pub fn to_task_result(self) -> TaskResult<T> {
        TaskResult::new(self.to_result())
    }

    /// A `TaskResult` whose failure is `error_factory(&exception)`.
    pub fn to_task_result_with<F>(self, error_factory: F) -> TaskResult<T>
    where
        F: FnOnce(&Exception) -> String + Send + 'static,
    {
        TaskResult::new(self.to_result_with(error_factory))
    }
}

impl<F: Send + 'static> TaskIO<F> {
    /// Applies the function produced by `self` to the value produced by
    /// `value`, awaiting the function first.
    pub fn apply<B, Output>(self, value: TaskIO<B>) -> TaskIO<Output>
    where
        F: FnOnce(B) -> Output,
        B: Send + 'static,
        Output: Send + 'static,
    {
        TaskIO::from_future(async move {
            let function = self.await;
            function(value.await)
        })
    }
}

impl TaskIO<Unit> {
    /// Defers a side effect that produces no value.
    pub fn from_action<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::from_future(async move {
            action();
            Unit
        })
    }
}
