//! State Monad - computations threading a state value.
//!
//! A `State<S, A>` wraps a transition `S -> (A, S)`. Each step sees the
//! state left behind by the previous one.
//!
//! # Laws
//!
//! - Left Identity: `State::pure(a).flat_map(f) == f(a)`
//! - Right Identity: `m.flat_map(State::pure) == m`
//! - Associativity: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
//! - Put Get: `put(s).then(get())` yields `s`
//! - Modify Composition: `modify(f).then(modify(g)) == modify(|s| g(f(s)))`
//!
//! # Examples
//!
//! ```rust
//! use effectkit::effect::State;
//!
//! let counter: State<i32, i32> = State::get()
//!     .flat_map(|current| State::put(current + 1).then(State::pure(current)));
//!
//! assert_eq!(counter.run(10), (10, 11));
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use crate::data::{Unit, panic_message};
use crate::effect::IO;

/// A state transition producing a value of type `A`.
pub struct State<S, A>
where
    S: 'static,
    A: 'static,
{
    run_function: Rc<dyn Fn(S) -> (A, S)>,
}

impl<S, A> State<S, A>
where
    S: 'static,
    A: 'static,
{
    /// Creates a State from a transition function.
    ///
    /// ```rust
    /// use effectkit::effect::State;
    ///
    /// let state: State<i32, i32> = State::new(|s: i32| (s * 2, s + 1));
    /// assert_eq!(state.run(10), (20, 11));
    /// ```
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(S) -> (A, S) + 'static,
    {
        Self {
            run_function: Rc::new(function),
        }
    }

    /// Runs the transition, returning the value and the final state.
    pub fn run(&self, initial_state: S) -> (A, S) {
        (self.run_function)(initial_state)
    }

    /// Runs the transition and keeps only the value.
    pub fn eval(&self, initial_state: S) -> A {
        self.run(initial_state).0
    }

    /// Runs the transition and keeps only the final state.
    pub fn exec(&self, initial_state: S) -> S {
        self.run(initial_state).1
    }

    /// A State that leaves the state untouched and yields `value`.
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(move |state| (value.clone(), state))
    }

    /// Projects a value from the current state without changing it.
    pub fn gets<F>(projection: F) -> Self
    where
        F: Fn(&S) -> A + 'static,
    {
        Self::new(move |state| (projection(&state), state))
    }

    /// Transforms the value; the state passes through.
    pub fn fmap<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> B + 'static,
        B: 'static,
    {
        let original_function = self.run_function;
        State::new(move |state| {
            let (value, next_state) = (original_function)(state);
            (function(value), next_state)
        })
    }

    /// Chains a State built from this State's value, running it against the
    /// intermediate state.
    pub fn flat_map<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> State<S, B> + 'static,
        B: 'static,
    {
        let original_function = self.run_function;
        State::new(move |state| {
            let (value, intermediate_state) = (original_function)(state);
            function(value).run(intermediate_state)
        })
    }

    /// Alias for [`State::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> State<S, B> + 'static,
        B: 'static,
    {
        self.flat_map(function)
    }

    /// Binds `binder`, then combines the original value with the bound one.
    pub fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> State<S, C>
    where
        F: Fn(A) -> State<S, B> + 'static,
        P: Fn(A, B) -> C + 'static,
        A: Clone,
        B: 'static,
        C: 'static,
    {
        let projector = Rc::new(projector);
        self.flat_map(move |value: A| {
            let projector = Rc::clone(&projector);
            binder(value.clone()).fmap(move |bound| projector(value.clone(), bound))
        })
    }

    /// Runs `next` after this transition, discarding this value.
    #[must_use]
    pub fn then<B>(self, next: State<S, B>) -> State<S, B>
    where
        B: 'static,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Runs both transitions in order and combines their values.
    pub fn map2<B, C, F>(self, other: State<S, B>, function: F) -> State<S, C>
    where
        F: Fn(A, B) -> C + 'static,
        B: 'static,
        C: 'static,
    {
        let self_function = self.run_function;
        let other_function = other.run_function;
        State::new(move |state| {
            let (a, intermediate_state) = (self_function)(state);
            let (b, final_state) = (other_function)(intermediate_state);
            (function(a, b), final_state)
        })
    }

    /// Pairs the values of two transitions.
    #[must_use]
    pub fn product<B>(self, other: State<S, B>) -> State<S, (A, B)>
    where
        B: 'static,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// Defers running the transition from `initial_state` into an `IO`.
    pub fn to_io(self, initial_state: S) -> IO<(A, S)> {
        IO::new(move || self.run(initial_state))
    }

    /// Runs the transition; a panic becomes `Err(message)`.
    ///
    /// ```rust
    /// use effectkit::effect::State;
    ///
    /// let failing: State<i32, i32> = State::new(|_| panic!("state exploded"));
    /// assert_eq!(failing.to_result(0), Err("state exploded".to_string()));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the panic message when the transition panics.
    pub fn to_result(self, initial_state: S) -> Result<(A, S), String> {
        catch_unwind(AssertUnwindSafe(|| self.run(initial_state)))
            .map_err(|payload| panic_message(payload.as_ref()))
    }
}

impl<S, F> State<S, F>
where
    S: 'static,
    F: 'static,
{
    /// Applies the function produced by `self` to the value produced by
    /// `value`; the function's transition runs first.
    #[must_use]
    pub fn apply<B, Output>(self, value: State<S, B>) -> State<S, Output>
    where
        F: Fn(B) -> Output,
        B: 'static,
        Output: 'static,
    {
        self.map2(value, |function, argument| function(argument))
    }
}

impl<St> State<St, St>
where
    St: Clone + 'static,
{
    /// Yields the current state.
    #[must_use]
    pub fn get() -> Self {
        Self::new(|state: St| (state.clone(), state))
    }
}

impl<S> State<S, Unit>
where
    S: 'static,
{
    /// Replaces the state.
    pub fn put(new_state: S) -> Self
    where
        S: Clone,
    {
        Self::new(move |_| (Unit, new_state.clone()))
    }

    /// Transforms the state.
    pub fn modify<F>(modifier: F) -> Self
    where
        F: Fn(S) -> S + 'static,
    {
        Self::new(move |state| (Unit, modifier(state)))
    }
}

impl<S, A> Clone for State<S, A>
where
    S: 'static,
    A: 'static,
{
    fn clone(&self) -> Self {
        Self {
            run_function: Rc::clone(&self.run_function),
        }
    }
}

impl<S, A> std::fmt::Display for State<S, A>
where
    S: 'static,
    A: 'static,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "<State>")
    }
}
