//! `TaskResult` - asynchronous, fallible computations.
//!
//! A `TaskResult<T>` is a boxed `Send` future resolving to
//! `Result<T, String>`. It implements `Future`, so it can be awaited
//! directly. Every combinator awaits its predecessor before doing anything
//! else, and a failure short-circuits the remainder of the chain: later
//! steps are never started.
//!
//! # Examples
//!
//! ```rust
//! use effectkit::effect::TaskResult;
//!
//! # tokio_test_block(async {
//! let total = TaskResult::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| TaskResult::pure(x + 1))
//!     .ensure(|x| *x > 20, "too small")
//!     .await;
//! assert_eq!(total, Ok(21));
//!
//! let failed = TaskResult::<i32>::fail("broken")
//!     .flat_map(|x| TaskResult::pure(x + 1))
//!     .await;
//! assert_eq!(failed, Err("broken".to_string()));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(future)
//! # }
//! ```

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use pin_project_lite::pin_project;

use super::task_io::TaskIO;
use crate::data::{failure, panic_message};

pin_project! {
    /// An asynchronous computation resolving to `Result<T, String>`.
    ///
    /// # Monad Laws
    ///
    /// 1. **Left Identity**: `TaskResult::pure(a).flat_map(f) == f(a)`
    /// 2. **Right Identity**: `m.flat_map(TaskResult::pure) == m`
    /// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
    #[must_use = "a TaskResult does nothing unless awaited"]
    pub struct TaskResult<T> {
        #[pin]
        future: BoxFuture<'static, Result<T, String>>,
    }
}

static_assertions::assert_impl_all!(TaskResult<i32>: Send);

impl<T> Future for TaskResult<T> {
    type Output = Result<T, String>;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().future.poll(context)
    }
}

impl<T> std::fmt::Debug for TaskResult<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("TaskResult").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> TaskResult<T> {
    // =========================================================================
    // Factories
    // =========================================================================

    /// Wraps a future that already yields `Result<T, String>`.
    pub fn new<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<T, String>> + Send + 'static,
    {
        Self {
            future: future.boxed(),
        }
    }

    /// A successful result.
    pub fn pure(value: T) -> Self {
        Self::from_result(Ok(value))
    }

    /// Alias for [`TaskResult::pure`].
    pub fn ok(value: T) -> Self {
        Self::pure(value)
    }

    /// A failed result; a blank message becomes `"Unknown error"`.
    pub fn fail(error: impl Into<String>) -> Self {
        Self::from_result(failure(error))
    }

    /// Lifts a synchronous result.
    pub fn from_result(result: Result<T, String>) -> Self {
        Self::new(futures::future::ready(result))
    }

    /// Defers a producer of a fallible future.
    ///
    /// A panic while building or polling the future becomes a failure
    /// carrying the panic message.
    pub fn from_fallible<F, Fut>(producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, String>> + Send + 'static,
    {
        Self::new(async move {
            let future = catch_unwind(AssertUnwindSafe(producer))
                .map_err(|payload| captured(panic_message(payload.as_ref())))?;
            AssertUnwindSafe(future)
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(captured(panic_message(payload.as_ref()))))
        })
    }

    /// Defers a producer of an infallible future.
    ///
    /// ```rust
    /// use effectkit::effect::TaskResult;
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
    /// let early = TaskResult::<i32>::from_fn(|| -> std::future::Ready<i32> { panic!("early") });
    /// assert_eq!(early.await, Err("early".to_string()));
    /// # });
    /// ```
    pub fn from_fn<F, Fut>(producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::from_fallible(move || producer().map(Ok))
    }

    /// Lifts an already-running future; a panic becomes a failure.
    pub fn from_future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::new(async move {
            AssertUnwindSafe(future)
                .catch_unwind()
                .await
                .map_err(|payload| captured(panic_message(payload.as_ref())))
        })
    }

    // =========================================================================
    // Running
    // =========================================================================

    /// Awaits the outcome.
    pub async fn run(self) -> Result<T, String> {
        self.await
    }

    /// Awaits the outcome, discarding the error.
    pub async fn to_option(self) -> Option<T> {
        self.await.ok()
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    /// Transforms the success value.
    pub fn fmap<B, F>(self, function: F) -> TaskResult<B>
    where
        B: Send + 'static,
        F: FnOnce(T) -> B + Send + 'static,
    {
        TaskResult::new(async move { self.await.map(function) })
    }

    /// Chains a dependent computation; it starts only after `self` succeeded.
    pub fn flat_map<B, F>(self, function: F) -> TaskResult<B>
    where
        B: Send + 'static,
        F: FnOnce(T) -> TaskResult<B> + Send + 'static,
    {
        TaskResult::new(async move {
            match self.await {
                Ok(value) => function(value).await,
                Err(error) => Err(error),
            }
        })
    }

    /// Alias for [`TaskResult::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> TaskResult<B>
    where
        B: Send + 'static,
        F: FnOnce(T) -> TaskResult<B> + Send + 'static,
    {
        self.flat_map(function)
    }

    /// Binds `binder`, then combines the original value with the bound one.
    pub fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> TaskResult<C>
    where
        T: Clone,
        B: Send + 'static,
        C: Send + 'static,
        F: FnOnce(T) -> TaskResult<B> + Send + 'static,
        P: FnOnce(T, B) -> C + Send + 'static,
    {
        self.flat_map(move |value| {
            binder(value.clone()).fmap(move |bound| projector(value, bound))
        })
    }

    /// Runs `next` after `self` succeeded, discarding `self`'s value.
    pub fn then<B>(self, next: TaskResult<B>) -> TaskResult<B>
    where
        B: Send + 'static,
    {
        self.flat_map(move |_| next)
    }

    /// Combines two results, awaiting `self` first; `self`'s failure wins.
    pub fn map2<B, C, F>(self, other: TaskResult<B>, function: F) -> TaskResult<C>
    where
        B: Send + 'static,
        C: Send + 'static,
        F: FnOnce(T, B) -> C + Send + 'static,
    {
        TaskResult::new(async move {
            let left = self.await;
            let right = other.await;
            match (left, right) {
                (Ok(a), Ok(b)) => Ok(function(a, b)),
                (Err(error), _) | (_, Err(error)) => Err(error),
            }
        })
    }

    /// Observes the success value.
    pub fn tap<F>(self, function: F) -> Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        Self::new(async move {
            let outcome = self.await;
            if let Ok(value) = &outcome {
                function(value);
            }
            outcome
        })
    }

    /// Observes the success value with an asynchronous side effect.
    pub fn tap_async<F, Fut>(self, function: F) -> Self
    where
        T: Clone,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new(async move {
            let outcome = self.await;
            if let Ok(value) = &outcome {
                function(value.clone()).await;
            }
            outcome
        })
    }

    /// Replaces a failure with `fallback`, which is awaited only on failure.
    pub fn or_else(self, fallback: Self) -> Self {
        self.or_else_with(move || fallback)
    }

    /// Replaces a failure with `fallback()`, evaluated only on failure.
    pub fn or_else_with<F>(self, fallback: F) -> Self
    where
        F: FnOnce() -> Self + Send + 'static,
    {
        Self::new(async move {
            match self.await {
                Ok(value) => Ok(value),
                Err(_) => fallback().await,
            }
        })
    }

    /// Replaces a failure with a computation built from the error.
    pub fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(String) -> Self + Send + 'static,
    {
        Self::new(async move {
            match self.await {
                Ok(value) => Ok(value),
                Err(error) => function(error).await,
            }
        })
    }

    /// Turns a success into a failure when `predicate` rejects it.
    pub fn ensure<P>(self, predicate: P, error: impl Into<String>) -> Self
    where
        P: FnOnce(&T) -> bool + Send + 'static,
    {
        let error = error.into();
        Self::new(async move {
            match self.await {
                Ok(value) if predicate(&value) => Ok(value),
                Ok(_) => failure(error),
                Err(existing) => Err(existing),
            }
        })
    }

    /// Rewrites the error message.
    pub fn map_error<F>(self, function: F) -> Self
    where
        F: FnOnce(String) -> String + Send + 'static,
    {
        Self::new(async move { self.await.map_err(function) })
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// A `TaskIO` that panics with the error message on failure.
    pub fn to_task_io(self) -> TaskIO<T> {
        self.to_task_io_with(|error| error)
    }

    /// A `TaskIO` that panics with `error_factory(error)` on failure.
    pub fn to_task_io_with<F>(self, error_factory: F) -> TaskIO<T>
    where
        F: FnOnce(String) -> String + Send + 'static,
    {
        TaskIO::from_future(async move {
            match self.await {
                Ok(value) => value,
                Err(error) => panic!("{}", error_factory(error)),
            }
        })
    }
}

impl<F: Send + 'static> TaskResult<F> {
    /// Applies the function produced by `self` to the value produced by
    /// `value`.
    ///
    /// Both are awaited in order, function first. When both failed, the
    /// function's failure is reported.
    pub fn apply<B, Output>(self, value: TaskResult<B>) -> TaskResult<Output>
    where
        F: FnOnce(B) -> Output,
        B: Send + 'static,
        Output: Send + 'static,
    {
        self.map2(value, |function, argument| function(argument))
    }
}

fn captured(message: String) -> String {
    tracing::debug!(%message, "task result captured a panic");
    message
}
