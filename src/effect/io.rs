//! IO Monad - deferred synchronous side effects.
//!
//! `IO` describes a side effect without executing it. Nothing happens until
//! `run_unsafe` is called, and every call to `run_unsafe` on a freshly built
//! description re-executes the effect.
//!
//! The conversions (`to_result`, `to_option`, `to_try`, `to_task_result`)
//! run the effect immediately and capture a panic as the failure of the target
//! container, so an `IO` that "throws" can be brought back into the value
//! world at the edge of the program.
//!
//! # Examples
//!
//! ```rust
//! use effectkit::effect::IO;
//!
//! let io = IO::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| IO::pure(x + 1));
//! assert_eq!(io.run_unsafe(), 21);
//!
//! let failing: IO<i32> = IO::new(|| panic!("disk full"));
//! assert_eq!(failing.to_result(), Err("disk full".to_string()));
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::data::{Exception, Try, Unit, panic_message};
#[cfg(feature = "async")]
use crate::effect::TaskResult;

/// A monad representing deferred side effects.
///
/// # Monad Laws
///
/// 1. **Left Identity**: `IO::pure(a).flat_map(f) == f(a)`
/// 2. **Right Identity**: `m.flat_map(IO::pure) == m`
/// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
pub struct IO<A> {
    run_io: Box<dyn FnOnce() -> A>,
}

impl<A: 'static> IO<A> {
    /// Creates a new IO action from a closure.
    ///
    /// The closure will not be executed until `run_unsafe` is called.
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() -> A + 'static,
    {
        Self {
            run_io: Box::new(action),
        }
    }

    /// Wraps a pure value.
    pub fn pure(value: A) -> Self {
        Self::new(move || value)
    }

    /// Executes the IO action and returns the result.
    ///
    /// The name marks the point where side effects actually happen; call it
    /// at the program's edge.
    pub fn run_unsafe(self) -> A {
        (self.run_io)()
    }

    /// Transforms the result.
    pub fn fmap<B, F>(self, function: F) -> IO<B>
    where
        F: FnOnce(A) -> B + 'static,
        B: 'static,
    {
        IO::new(move || function(self.run_unsafe()))
    }

    /// Chains an action that depends on this one's result.
    pub fn flat_map<B, F>(self, function: F) -> IO<B>
    where
        F: FnOnce(A) -> IO<B> + 'static,
        B: 'static,
    {
        IO::new(move || function(self.run_unsafe()).run_unsafe())
    }

    /// Alias for [`IO::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> IO<B>
    where
        F: FnOnce(A) -> IO<B> + 'static,
        B: 'static,
    {
        self.flat_map(function)
    }

    /// Binds `binder`, then combines the original result with the bound one.
    ///
    /// ```rust
    /// use effectkit::effect::IO;
    ///
    /// let io = IO::pure(5).flat_map_with(|x| IO::pure(x + 10), |value, bound| value + bound);
    /// assert_eq!(io.run_unsafe(), 20);
    /// ```
    pub fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> IO<C>
    where
        A: Clone,
        F: FnOnce(A) -> IO<B> + 'static,
        P: FnOnce(A, B) -> C + 'static,
        B: 'static,
        C: 'static,
    {
        self.flat_map(move |value| {
            binder(value.clone()).fmap(move |bound| projector(value, bound))
        })
    }

    /// Runs `next` after this action, discarding this action's result.
    pub fn then<B>(self, next: IO<B>) -> IO<B>
    where
        B: 'static,
    {
        self.flat_map(move |_| next)
    }

    /// Runs `function` on the result and passes the result through.
    #[must_use]
    pub fn tap<F>(self, function: F) -> Self
    where
        F: FnOnce(&A) + 'static,
    {
        self.fmap(move |value| {
            function(&value);
            value
        })
    }

    /// Combines two actions, running `self` first.
    pub fn map2<B, C, F>(self, other: IO<B>, function: F) -> IO<C>
    where
        F: FnOnce(A, B) -> C + 'static,
        B: 'static,
        C: 'static,
    {
        IO::new(move || {
            let a = self.run_unsafe();
            let b = other.run_unsafe();
            function(a, b)
        })
    }

    /// Pairs two actions, running `self` first.
    pub fn product<B>(self, other: IO<B>) -> IO<(A, B)>
    where
        B: 'static,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// Recovers from a panic inside `io` with `handler(message)`.
    pub fn catch<F>(io: Self, handler: F) -> Self
    where
        F: FnOnce(String) -> A + 'static,
    {
        IO::new(move || match catch_unwind(AssertUnwindSafe(|| io.run_unsafe())) {
            Ok(value) => value,
            Err(panic_info) => handler(panic_message(panic_info.as_ref())),
        })
    }

    /// Runs the action, capturing a panic as `Failure`.
    pub fn to_try(self) -> Try<A> {
        Try::run(move || self.run_unsafe())
    }

    /// Runs the action, capturing a panic as `Err(message)`.
    pub fn to_result(self) -> Result<A, String> {
        self.to_try().to_result()
    }

    /// Runs the action, mapping a panic to `None`.
    ///
    /// For an `IO<Option<T>>`, `to_option().flatten()` also treats a `None`
    /// payload as absent.
    pub fn to_option(self) -> Option<A> {
        self.to_try().to_option()
    }

    /// Runs the action and lifts the outcome into a resolved `TaskResult`,
    /// turning a panic into a failure carrying the panic message.
    ///
    /// # Eager
    ///
    /// `IO` is not `Send`, so the effect runs during this call, not when the
    /// `TaskResult` is awaited. A converted task that is dropped unawaited
    /// has still performed its side effect. Use [`task_result_fn`] to defer
    /// a `Send` action until the task is polled.
    ///
    /// ```rust
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use effectkit::effect::IO;
    ///
    /// let runs = Rc::new(Cell::new(0));
    /// let counter = Rc::clone(&runs);
    /// let task = IO::new(move || counter.set(counter.get() + 1)).to_task_result();
    /// assert_eq!(runs.get(), 1);
    /// drop(task);
    /// ```
    #[cfg(feature = "async")]
    pub fn to_task_result(self) -> TaskResult<A>
    where
        A: Send,
    {
        self.to_task_result_with(|exception| exception.message())
    }

    /// Like [`IO::to_task_result`], building the error from the exception.
    #[cfg(feature = "async")]
    pub fn to_task_result_with<E>(self, error_factory: E) -> TaskResult<A>
    where
        A: Send,
        E: FnOnce(&Exception) -> String,
    {
        let outcome = match self.to_try() {
            Try::Success(value) => Ok(value),
            Try::Failure(exception) => Err(error_factory(&exception)),
        };
        TaskResult::from_result(outcome)
    }
}

impl<F: 'static> IO<F> {
    /// Applies the function produced by `self` to the value produced by
    /// `value`. The function action runs first.
    pub fn apply<B, Output>(self, value: IO<B>) -> IO<Output>
    where
        F: FnOnce(B) -> Output,
        B: 'static,
        Output: 'static,
    {
        self.map2(value, |function, argument| function(argument))
    }
}

impl IO<Unit> {
    /// Lifts an action with no result.
    pub fn from_action<F>(action: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self::new(move || {
            action();
            Unit
        })
    }
}

impl<A> std::fmt::Debug for IO<A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("IO").finish_non_exhaustive()
    }
}

/// Lifts a producer into an `IO`.
pub fn from_fn<A, F>(producer: F) -> IO<A>
where
    A: 'static,
    F: FnOnce() -> A + 'static,
{
    IO::new(producer)
}

/// Lifts an action into an `IO<Unit>`.
pub fn from_action<F>(action: F) -> IO<Unit>
where
    F: FnOnce() + 'static,
{
    IO::from_action(action)
}

/// Runs a producer, capturing a panic as `Failure`.
pub fn try_fn<A, F>(producer: F) -> Try<A>
where
    F: FnOnce() -> A,
{
    Try::run(producer)
}

/// Runs a producer, capturing a panic as `Err(message)`.
pub fn result_fn<A, F>(producer: F) -> Result<A, String>
where
    F: FnOnce() -> A,
{
    Try::run(producer).to_result()
}

/// Defers a `Send` producer into a `TaskResult`.
///
/// Unlike [`IO::to_task_result`], nothing runs until the task is polled.
/// A panic becomes a failure carrying the panic message.
#[cfg(feature = "async")]
pub fn task_result_fn<A, F>(producer: F) -> TaskResult<A>
where
    A: Send + 'static,
    F: FnOnce() -> A + Send + 'static,
{
    TaskResult::from_fn(move || futures::future::ready(producer()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_io_pure_and_run() {
        assert_eq!(IO::pure(42).run_unsafe(), 42);
    }

    #[test]
    fn test_io_defers_effect() {
        let counter = Rc::new(Cell::new(0));
        let counter_clone = Rc::clone(&counter);
        let io = IO::new(move || {
            counter_clone.set(counter_clone.get() + 1);
            counter_clone.get()
        });
        assert_eq!(counter.get(), 0);
        assert_eq!(io.run_unsafe(), 1);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_io_from_action_returns_unit() {
        let counter = Rc::new(Cell::new(0));
        let counter_clone = Rc::clone(&counter);
        let io = from_action(move || counter_clone.set(1));
        assert_eq!(io.run_unsafe(), Unit);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_io_apply_runs_function_first() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let function_order = Rc::clone(&order);
        let value_order = Rc::clone(&order);
        let function = IO::new(move || {
            function_order.borrow_mut().push("function");
            |x: i32| x * 3
        });
        let value = IO::new(move || {
            value_order.borrow_mut().push("value");
            5
        });
        assert_eq!(function.apply(value).run_unsafe(), 15);
        assert_eq!(*order.borrow(), vec!["function", "value"]);
    }

    #[test]
    fn test_io_tap_and_then() {
        let seen = Rc::new(Cell::new(0));
        let seen_clone = Rc::clone(&seen);
        let io = IO::pure(5).tap(move |x| seen_clone.set(*x)).then(IO::pure(7));
        assert_eq!(io.run_unsafe(), 7);
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn test_io_conversions_capture_panics() {
        assert_eq!(IO::pure(5).to_result(), Ok(5));
        assert_eq!(IO::pure(5).to_option(), Some(5));
        assert!(IO::pure(5).to_try().is_success());

        let failing = || IO::<i32>::new(|| panic!("io fail"));
        assert_eq!(failing().to_result(), Err("io fail".to_string()));
        assert_eq!(failing().to_option(), None);
        assert!(failing().to_try().is_failure());
    }

    #[test]
    fn test_io_option_payload_flattens() {
        let empty: IO<Option<String>> = IO::pure(None);
        assert_eq!(empty.to_option().flatten(), None);
    }

    #[test]
    fn test_free_lifts() {
        assert_eq!(from_fn(|| 42).run_unsafe(), 42);
        assert_eq!(try_fn(|| 42), Try::Success(42));
        assert_eq!(result_fn(|| -> i32 { panic!("nope") }), Err("nope".to_string()));
    }

    #[test]
    fn test_io_catch_recovers() {
        let recovered = IO::catch(IO::new(|| -> String { panic!("boom") }), |message| {
            format!("recovered: {message}")
        });
        assert_eq!(recovered.run_unsafe(), "recovered: boom");
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_io_to_task_result() {
        assert_eq!(IO::pure(5).to_task_result().await, Ok(5));
        let failing = IO::<i32>::new(|| panic!("io fail"));
        let failed = failing.to_task_result_with(|exception| format!("{}!", exception.message()));
        assert_eq!(failed.await, Err("io fail!".to_string()));
    }

    #[cfg(feature = "async")]
    #[test]
    fn test_io_to_task_result_runs_at_conversion() {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let task = IO::new(move || counter.set(counter.get() + 1)).to_task_result();
        assert_eq!(runs.get(), 1);
        drop(task);
        assert_eq!(runs.get(), 1);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_task_result_fn_waits_until_polled() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let task = task_result_fn(move || counter.fetch_add(1, Ordering::SeqCst) + 1);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(task.await, Ok(1));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        let dropped = task_result_fn(|| -> i32 { panic!("never polled") });
        drop(dropped);

        let failed = task_result_fn(|| -> i32 { panic!("late") });
        assert_eq!(failed.await, Err("late".to_string()));
    }
}
