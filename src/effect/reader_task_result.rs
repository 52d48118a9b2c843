//! `ReaderTaskResult` - an environment-reading asynchronous fallible
//! computation.
//!
//! `ReaderTaskResult<E, T>` wraps `E -> TaskResult<T>`. It composes like
//! [`Reader`](super::Reader), but a failed step aborts the remainder: the
//! function building the next step is never called.

use std::sync::Arc;

use super::task_result::TaskResult;

/// A computation reading an environment `E` and resolving to
/// `Result<T, String>` asynchronously.
///
/// # Examples
///
/// ```rust
/// use effectkit::effect::{ReaderTaskResult, TaskResult};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let greeting = ReaderTaskResult::<String, String>::ask()
///     .flat_map(|name| ReaderTaskResult::pure(format!("hello {name}")));
/// assert_eq!(greeting.run("ada".to_string()).await, Ok("hello ada".to_string()));
/// # });
/// ```
pub struct ReaderTaskResult<E, T> {
    run_function: Arc<dyn Fn(E) -> TaskResult<T> + Send + Sync>,
}

impl<E, T> Clone for ReaderTaskResult<E, T> {
    fn clone(&self) -> Self {
        Self {
            run_function: Arc::clone(&self.run_function),
        }
    }
}

impl<E, T> std::fmt::Debug for ReaderTaskResult<E, T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("<ReaderTaskResult>")
    }
}

impl<E, T> ReaderTaskResult<E, T>
where
    E: Send + 'static,
    T: Send + 'static,
{
    /// Creates a computation from a function of the environment.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(E) -> TaskResult<T> + Send + Sync + 'static,
    {
        Self {
            run_function: Arc::new(function),
        }
    }

    /// A successful computation ignoring the environment.
    pub fn pure(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::new(move |_| TaskResult::pure(value.clone()))
    }

    /// A failed computation ignoring the environment.
    pub fn fail(error: impl Into<String>) -> Self {
        let error = error.into();
        Self::new(move |_| TaskResult::fail(error.clone()))
    }

    /// Lifts a computation built independently of the environment.
    pub fn from_task_result<F>(factory: F) -> Self
    where
        F: Fn() -> TaskResult<T> + Send + Sync + 'static,
    {
        Self::new(move |_| factory())
    }

    /// Runs against `environment`.
    pub fn run(&self, environment: E) -> TaskResult<T> {
        (self.run_function)(environment)
    }

    /// Alias for [`ReaderTaskResult::run`].
    pub fn to_task_result(&self, environment: E) -> TaskResult<T> {
        self.run(environment)
    }

    /// Transforms the success value.
    pub fn fmap<B, F>(self, function: F) -> ReaderTaskResult<E, B>
    where
        B: Send + 'static,
        F: Fn(T) -> B + Clone + Send + Sync + 'static,
    {
        let run_function = self.run_function;
        ReaderTaskResult::new(move |environment| run_function(environment).fmap(function.clone()))
    }

    /// Chains a computation built from the success value; it runs against
    /// the same environment.
    pub fn flat_map<B, F>(self, function: F) -> ReaderTaskResult<E, B>
    where
        E: Clone,
        B: Send + 'static,
        F: Fn(T) -> ReaderTaskResult<E, B> + Send + Sync + 'static,
    {
        let run_function = self.run_function;
        let function = Arc::new(function);
        ReaderTaskResult::new(move |environment: E| {
            let function = Arc::clone(&function);
            run_function(environment.clone()).flat_map(move |value| function(value).run(environment))
        })
    }

    /// Runs this computation against an environment derived by `modifier`.
    #[must_use]
    pub fn local<F>(self, modifier: F) -> Self
    where
        F: Fn(E) -> E + Send + Sync + 'static,
    {
        let run_function = self.run_function;
        Self::new(move |environment| run_function(modifier(environment)))
    }
}

impl<E, F> ReaderTaskResult<E, F>
where
    E: Clone + Send + 'static,
    F: Send + 'static,
{
    /// Applies the wrapped function to the wrapped value, resolving the
    /// function first; the function's failure wins.
    pub fn apply<B, Output>(self, value: ReaderTaskResult<E, B>) -> ReaderTaskResult<E, Output>
    where
        F: FnOnce(B) -> Output,
        B: Send + 'static,
        Output: Send + 'static,
    {
        let function = self.run_function;
        let value = value.run_function;
        ReaderTaskResult::new(move |environment: E| {
            function(environment.clone()).apply(value(environment))
        })
    }
}

impl<E> ReaderTaskResult<E, E>
where
    E: Send + 'static,
{
    /// Yields the environment.
    pub fn ask() -> Self {
        Self::new(TaskResult::pure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[rstest]
    #[tokio::test]
    async fn ask_and_fmap() {
        let reader = ReaderTaskResult::<i32, i32>::ask().fmap(|x| x * 2);
        assert_eq!(reader.run(21).await, Ok(42));
        assert_eq!(reader.to_task_result(1).await, Ok(2));
    }

    #[rstest]
    #[tokio::test]
    async fn failure_aborts_flat_map() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        let reader = ReaderTaskResult::<i32, i32>::fail("missing").flat_map(move |x| {
            flag.store(true, Ordering::SeqCst);
            ReaderTaskResult::pure(x)
        });
        assert_eq!(reader.run(1).await, Err("missing".to_string()));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[rstest]
    #[tokio::test]
    async fn local_and_apply() {
        let reader = ReaderTaskResult::<i32, i32>::ask().local(|x| x + 10);
        assert_eq!(reader.run(5).await, Ok(15));

        let function = ReaderTaskResult::<i32, fn(i32) -> i32>::pure(|x| x * 3);
        assert_eq!(function.apply(ReaderTaskResult::ask()).run(4).await, Ok(12));
    }

    #[rstest]
    #[tokio::test]
    async fn from_task_result_ignores_environment() {
        let reader = ReaderTaskResult::<&'static str, i32>::from_task_result(|| TaskResult::pure(9));
        assert_eq!(reader.run("ignored").await, Ok(9));
    }
}
