//! Continuation monad for continuation-passing style (CPS).
//!
//! A `Cont<R, A>` is a computation `(A -> R) -> R`: it produces an `A` by
//! handing it to "the rest of the computation" and returns whatever that rest
//! returns. [`Cont::call_cc`] captures the current continuation as an
//! [`Escape`] handle, which makes early exit expressible as an ordinary value.
//!
//! Continuations may be invoked more than once, so every stored function is
//! `Fn` and the type is cheap to clone.
//!
//! # Examples
//!
//! ```rust
//! use effectkit::control::Cont;
//!
//! let safe_divide = |numerator: i32, denominator: i32| {
//!     Cont::<String, i32>::call_cc(move |escape| {
//!         let quotient = if denominator == 0 {
//!             escape.exit(0)
//!         } else {
//!             Cont::pure(numerator / denominator)
//!         };
//!         quotient.fmap(|value: i32| value + 1)
//!     })
//! };
//!
//! assert_eq!(safe_divide(10, 2).run(|x| x.to_string()), "6");
//! assert_eq!(safe_divide(10, 0).run(|x| x.to_string()), "0");
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use crate::data::panic_message;
use crate::effect::IO;

type Continuation<A, R> = Rc<dyn Fn(A) -> R>;

/// A computation in continuation-passing style.
///
/// # Laws
///
/// - **Left Identity**: `Cont::pure(a).flat_map(f).run(k) == f(a).run(k)`
/// - **Right Identity**: `m.flat_map(Cont::pure).run(k) == m.run(k)`
/// - **Associativity**: `m.flat_map(f).flat_map(g).run(k) == m.flat_map(|x| f(x).flat_map(g)).run(k)`
pub struct Cont<R, A> {
    run_continuation: Rc<dyn Fn(Continuation<A, R>) -> R>,
}

impl<R, A> Clone for Cont<R, A> {
    fn clone(&self) -> Self {
        Self {
            run_continuation: Rc::clone(&self.run_continuation),
        }
    }
}

impl<R: 'static, A: 'static> Cont<R, A> {
    /// Creates a continuation from a function of its continuation.
    ///
    /// ```rust
    /// use effectkit::control::Cont;
    ///
    /// let twice: Cont<i32, i32> = Cont::new(|k| k(1) + k(2));
    /// assert_eq!(twice.run(|x| x * 10), 30);
    /// ```
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(Rc<dyn Fn(A) -> R>) -> R + 'static,
    {
        Self {
            run_continuation: Rc::new(run),
        }
    }

    /// Passes `value` straight to the continuation.
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(move |continuation| continuation(value.clone()))
    }

    /// Runs the computation with the final continuation `continuation`.
    pub fn run<K>(&self, continuation: K) -> R
    where
        K: Fn(A) -> R + 'static,
    {
        self.run_with(Rc::new(continuation))
    }

    fn run_with(&self, continuation: Continuation<A, R>) -> R {
        (self.run_continuation)(continuation)
    }

    /// Transforms the value before it reaches the continuation.
    pub fn fmap<B: 'static, F>(self, function: F) -> Cont<R, B>
    where
        F: Fn(A) -> B + 'static,
    {
        let function = Rc::new(function);
        Cont::new(move |continuation: Continuation<B, R>| {
            let function = Rc::clone(&function);
            self.run(move |value| continuation(function(value)))
        })
    }

    /// Continues with the computation built from the value.
    pub fn flat_map<B: 'static, F>(self, function: F) -> Cont<R, B>
    where
        F: Fn(A) -> Cont<R, B> + 'static,
    {
        let function = Rc::new(function);
        Cont::new(move |continuation: Continuation<B, R>| {
            let function = Rc::clone(&function);
            self.run(move |value| function(value).run_with(Rc::clone(&continuation)))
        })
    }

    /// Alias for [`Cont::flat_map`].
    pub fn and_then<B: 'static, F>(self, function: F) -> Cont<R, B>
    where
        F: Fn(A) -> Cont<R, B> + 'static,
    {
        self.flat_map(function)
    }

    /// Binds `binder`, then combines the original value with the bound one.
    pub fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> Cont<R, C>
    where
        A: Clone,
        B: 'static,
        C: 'static,
        F: Fn(A) -> Cont<R, B> + 'static,
        P: Fn(A, B) -> C + 'static,
    {
        let projector = Rc::new(projector);
        self.flat_map(move |value: A| {
            let projector = Rc::clone(&projector);
            binder(value.clone()).fmap(move |bound| projector(value.clone(), bound))
        })
    }

    /// Sequences `next` after this computation, discarding this value.
    #[must_use]
    pub fn then<B: 'static>(self, next: Cont<R, B>) -> Cont<R, B> {
        self.flat_map(move |_| next.clone())
    }

    /// Captures the current continuation.
    ///
    /// `function` receives an [`Escape`]; calling [`Escape::exit`] abandons
    /// the rest of the block and feeds the exit value to the continuation
    /// surrounding `call_cc`. The handle can be used any number of times.
    pub fn call_cc<F>(function: F) -> Self
    where
        F: Fn(Escape<R, A>) -> Self + 'static,
    {
        Self::new(move |continuation: Continuation<A, R>| {
            let escape = Escape {
                continuation: Rc::clone(&continuation),
            };
            function(escape).run_with(continuation)
        })
    }

    /// Defers running with `continuation` into an `IO`.
    pub fn to_io<K>(self, continuation: K) -> IO<R>
    where
        K: Fn(A) -> R + 'static,
    {
        IO::new(move || self.run(continuation))
    }

    /// Runs with `continuation`; a panic becomes `Err(message)`.
    ///
    /// # Errors
    ///
    /// Returns the panic message when the computation or the continuation
    /// panics.
    pub fn to_result<K>(self, continuation: K) -> Result<R, String>
    where
        K: Fn(A) -> R + 'static,
    {
        catch_unwind(AssertUnwindSafe(|| self.run(continuation)))
            .map_err(|payload| panic_message(payload.as_ref()))
    }
}

impl<R: 'static, F: 'static> Cont<R, F> {
    /// Applies the function produced by `self` to the value produced by
    /// `value`.
    pub fn apply<B, Output>(self, value: Cont<R, B>) -> Cont<R, Output>
    where
        F: Fn(B) -> Output,
        B: 'static,
        Output: 'static,
    {
        self.flat_map(move |function: F| value.clone().fmap(function))
    }
}

/// The continuation captured by [`Cont::call_cc`].
pub struct Escape<R, A> {
    continuation: Continuation<A, R>,
}

impl<R, A> Clone for Escape<R, A> {
    fn clone(&self) -> Self {
        Self {
            continuation: Rc::clone(&self.continuation),
        }
    }
}

impl<R: 'static, A: 'static> Escape<R, A> {
    /// A computation that discards its own continuation and delivers
    /// `value` to the captured one.
    pub fn exit<B: 'static>(&self, value: A) -> Cont<R, B>
    where
        A: Clone,
    {
        let continuation = Rc::clone(&self.continuation);
        Cont::new(move |_discarded: Continuation<B, R>| continuation(value.clone()))
    }
}

impl<R, A> std::fmt::Display for Cont<R, A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "<Cont>")
    }
}
