//! `StateTaskResult` - an asynchronous fallible state transition.
//!
//! `StateTaskResult<S, T>` wraps `S -> TaskResult<(T, S)>`. A failed step
//! drops the state it was given; later transitions never start.

use std::sync::Arc;

use super::task_result::TaskResult;
use crate::data::Unit;

/// An asynchronous state transition that may fail.
///
/// # Examples
///
/// ```rust
/// use effectkit::effect::StateTaskResult;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let counter = StateTaskResult::<i32, i32>::get()
///     .flat_map(|current| StateTaskResult::put(current + 1))
///     .flat_map(|_| StateTaskResult::get());
/// assert_eq!(counter.run(1).await, Ok((2, 2)));
/// # });
/// ```
pub struct StateTaskResult<S, T> {
    run_function: Arc<dyn Fn(S) -> TaskResult<(T, S)> + Send + Sync>,
}

impl<S, T> Clone for StateTaskResult<S, T> {
    fn clone(&self) -> Self {
        Self {
            run_function: Arc::clone(&self.run_function),
        }
    }
}

impl<S, T> std::fmt::Debug for StateTaskResult<S, T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("<StateTaskResult>")
    }
}

impl<S, T> StateTaskResult<S, T>
where
    S: Send + 'static,
    T: Send + 'static,
{
    /// Creates a transition from a function of the state.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(S) -> TaskResult<(T, S)> + Send + Sync + 'static,
    {
        Self {
            run_function: Arc::new(function),
        }
    }

    /// Yields `value`, leaving the state untouched.
    pub fn pure(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::new(move |state| TaskResult::pure((value.clone(), state)))
    }

    /// A transition that always fails.
    pub fn fail(error: impl Into<String>) -> Self {
        let error = error.into();
        Self::new(move |_| TaskResult::fail(error.clone()))
    }

    /// Lifts a computation that does not touch the state.
    pub fn from_task_result<F>(factory: F) -> Self
    where
        F: Fn() -> TaskResult<T> + Send + Sync + 'static,
    {
        Self::new(move |state| factory().fmap(move |value| (value, state)))
    }

    /// Runs from `initial_state`.
    pub fn run(&self, initial_state: S) -> TaskResult<(T, S)> {
        (self.run_function)(initial_state)
    }

    /// Runs from `initial_state`, keeping only the value.
    pub fn eval(&self, initial_state: S) -> TaskResult<T> {
        self.run(initial_state).fmap(|(value, _)| value)
    }

    /// Runs from `initial_state`, keeping only the final state.
    pub fn exec(&self, initial_state: S) -> TaskResult<S> {
        self.run(initial_state).fmap(|(_, state)| state)
    }

    /// Transforms the value; the state passes through.
    pub fn fmap<B, F>(self, function: F) -> StateTaskResult<S, B>
    where
        B: Send + 'static,
        F: Fn(T) -> B + Clone + Send + Sync + 'static,
    {
        let run_function = self.run_function;
        StateTaskResult::new(move |state| {
            let function = function.clone();
            run_function(state).fmap(move |(value, next_state)| (function(value), next_state))
        })
    }

    /// Chains a transition built from the value, run against the
    /// intermediate state.
    pub fn flat_map<B, F>(self, function: F) -> StateTaskResult<S, B>
    where
        B: Send + 'static,
        F: Fn(T) -> StateTaskResult<S, B> + Send + Sync + 'static,
    {
        let run_function = self.run_function;
        let function = Arc::new(function);
        StateTaskResult::new(move |state| {
            let function = Arc::clone(&function);
            run_function(state).flat_map(move |(value, intermediate)| function(value).run(intermediate))
        })
    }

    /// Alias for [`StateTaskResult::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> StateTaskResult<S, B>
    where
        B: Send + 'static,
        F: Fn(T) -> StateTaskResult<S, B> + Send + Sync + 'static,
    {
        self.flat_map(function)
    }

    /// Binds `binder`, then combines the original value with the bound one.
    pub fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> StateTaskResult<S, C>
    where
        T: Clone + Sync,
        B: Send + 'static,
        C: Send + 'static,
        F: Fn(T) -> StateTaskResult<S, B> + Send + Sync + 'static,
        P: Fn(T, B) -> C + Send + Sync + 'static,
    {
        let projector = Arc::new(projector);
        self.flat_map(move |value: T| {
            let projector = Arc::clone(&projector);
            binder(value.clone()).fmap(move |bound| projector(value.clone(), bound))
        })
    }
}

impl<S, F> StateTaskResult<S, F>
where
    S: Send + 'static,
    F: Send + 'static,
{
    /// Applies the wrapped function to the wrapped value; the function's
    /// transition runs first and its failure wins.
    pub fn apply<B, Output>(self, value: StateTaskResult<S, B>) -> StateTaskResult<S, Output>
    where
        F: FnOnce(B) -> Output,
        B: Send + 'static,
        Output: Send + 'static,
    {
        let function = self.run_function;
        let value = Arc::clone(&value.run_function);
        StateTaskResult::new(move |state| {
            let value = Arc::clone(&value);
            function(state).flat_map(move |(wrapped, intermediate)| {
                value(intermediate).fmap(move |(argument, final_state)| (wrapped(argument), final_state))
            })
        })
    }
}

impl<S> StateTaskResult<S, S>
where
    S: Clone + Send + 'static,
{
    /// Yields the current state.
    pub fn get() -> Self {
        Self::new(|state: S| TaskResult::pure((state.clone(), state)))
    }
}

impl<S> StateTaskResult<S, Unit>
where
    S: Send + 'static,
{
    /// Replaces the state.
    pub fn put(new_state: S) -> Self
    where
        S: Clone + Sync,
    {
        Self::new(move |_| TaskResult::pure((Unit, new_state.clone())))
    }

    /// Transforms the state.
    pub fn modify<F>(modifier: F) -> Self
    where
        F: Fn(S) -> S + Send + Sync + 'static,
    {
        Self::new(move |state| TaskResult::pure((Unit, modifier(state))))
    }
}
