//! Reader Monad - computations that depend on a read-only environment.
//!
//! A `Reader<R, A>` wraps a function `R -> A`. Composing readers threads the
//! same environment through every step, which makes the type a lightweight
//! form of dependency injection.
//!
//! # Laws
//!
//! - Left Identity: `Reader::pure(a).flat_map(f) == f(a)`
//! - Right Identity: `m.flat_map(Reader::pure) == m`
//! - Associativity: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
//! - Ask Retrieval: `Reader::ask().run(r) == r`
//! - Local Identity: `m.local(|r| r) == m`
//!
//! # Examples
//!
//! ```rust
//! use effectkit::effect::Reader;
//!
//! #[derive(Clone)]
//! struct Settings {
//!     host: String,
//!     port: u16,
//! }
//!
//! let address = Reader::asks(|settings: Settings| settings.host)
//!     .flat_map_with(
//!         |_| Reader::asks(|settings: Settings| settings.port),
//!         |host, port| format!("{host}:{port}"),
//!     );
//!
//! let settings = Settings { host: "localhost".to_string(), port: 8080 };
//! assert_eq!(address.run(settings), "localhost:8080");
//! ```

use std::rc::Rc;

/// A computation reading an environment of type `R` to produce an `A`.
///
/// Readers are cheap to clone and can be run any number of times.
pub struct Reader<R, A>
where
    R: 'static,
    A: 'static,
{
    run_function: Rc<dyn Fn(R) -> A>,
}

impl<R, A> Reader<R, A>
where
    R: 'static,
    A: 'static,
{
    /// Creates a Reader from a function of the environment.
    ///
    /// ```rust
    /// use effectkit::effect::Reader;
    ///
    /// let reader: Reader<i32, i32> = Reader::new(|environment| environment * 2);
    /// assert_eq!(reader.run(21), 42);
    /// ```
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(R) -> A + 'static,
    {
        Self {
            run_function: Rc::new(function),
        }
    }

    /// Runs the computation against `environment`.
    pub fn run(&self, environment: R) -> A {
        (self.run_function)(environment)
    }

    /// A Reader that ignores the environment.
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(move |_| value.clone())
    }

    /// Projects a value out of the environment.
    pub fn asks<F>(projection: F) -> Self
    where
        F: Fn(R) -> A + 'static,
    {
        Self::new(projection)
    }

    /// Transforms the result.
    pub fn fmap<B, F>(self, function: F) -> Reader<R, B>
    where
        F: Fn(A) -> B + 'static,
        B: 'static,
    {
        let original_function = self.run_function;
        Reader::new(move |environment| function((original_function)(environment)))
    }

    /// Chains a Reader built from this Reader's result; both see the same
    /// environment.
    pub fn flat_map<B, F>(self, function: F) -> Reader<R, B>
    where
        F: Fn(A) -> Reader<R, B> + 'static,
        B: 'static,
        R: Clone,
    {
        let original_function = self.run_function;
        Reader::new(move |environment: R| {
            let value = (original_function)(environment.clone());
            function(value).run(environment)
        })
    }

    /// Alias for [`Reader::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> Reader<R, B>
    where
        F: Fn(A) -> Reader<R, B> + 'static,
        B: 'static,
        R: Clone,
    {
        self.flat_map(function)
    }

    /// Binds `binder`, then combines the original result with the bound one.
    pub fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> Reader<R, C>
    where
        F: Fn(A) -> Reader<R, B> + 'static,
        P: Fn(A, B) -> C + 'static,
        A: Clone,
        B: 'static,
        C: 'static,
        R: Clone,
    {
        let projector = Rc::new(projector);
        self.flat_map(move |value: A| {
            let projector = Rc::clone(&projector);
            binder(value.clone()).fmap(move |bound| projector(value.clone(), bound))
        })
    }

    /// Runs `next` in the same environment, discarding this result.
    #[must_use]
    pub fn then<B>(self, next: Reader<R, B>) -> Reader<R, B>
    where
        B: 'static,
        R: Clone,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Combines two Readers with a binary function.
    pub fn map2<B, C, F>(self, other: Reader<R, B>, function: F) -> Reader<R, C>
    where
        F: Fn(A, B) -> C + 'static,
        B: 'static,
        C: 'static,
        R: Clone,
    {
        let self_function = self.run_function;
        let other_function = other.run_function;
        Reader::new(move |environment: R| {
            let a = (self_function)(environment.clone());
            let b = (other_function)(environment);
            function(a, b)
        })
    }

    /// Pairs the results of two Readers.
    #[must_use]
    pub fn product<B>(self, other: Reader<R, B>) -> Reader<R, (A, B)>
    where
        B: 'static,
        R: Clone,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// Runs this computation against an environment derived by `modifier`.
    ///
    /// ```rust
    /// use effectkit::effect::Reader;
    ///
    /// let reader: Reader<i32, i32> = Reader::new(|environment| environment * 2);
    /// assert_eq!(reader.local(|environment| environment + 10).run(5), 30);
    /// ```
    #[must_use]
    pub fn local<F>(self, modifier: F) -> Self
    where
        F: Fn(R) -> R + 'static,
    {
        let computation_function = self.run_function;
        Self::new(move |environment| (computation_function)(modifier(environment)))
    }

    /// Exposes the Reader as a plain function.
    pub fn to_fn(self) -> impl Fn(R) -> A {
        let function = self.run_function;
        move |environment| function(environment)
    }
}

impl<R, F> Reader<R, F>
where
    R: 'static,
    F: 'static,
{
    /// Applies the function read by `self` to the value read by `value`.
    ///
    /// ```rust
    /// use effectkit::effect::Reader;
    ///
    /// let function: Reader<i32, fn(i32) -> i32> = Reader::pure(|x| x + 1);
    /// let value: Reader<i32, i32> = Reader::ask();
    /// assert_eq!(function.apply(value).run(41), 42);
    /// ```
    #[must_use]
    pub fn apply<B, Output>(self, value: Reader<R, B>) -> Reader<R, Output>
    where
        F: Fn(B) -> Output,
        B: 'static,
        Output: 'static,
        R: Clone,
    {
        self.map2(value, |function, argument| function(argument))
    }
}

impl<Env> Reader<Env, Env>
where
    Env: 'static,
{
    /// A Reader yielding the whole environment.
    #[must_use]
    pub fn ask() -> Self {
        Self::new(|environment| environment)
    }
}

impl<R, A> Clone for Reader<R, A>
where
    R: 'static,
    A: 'static,
{
    fn clone(&self) -> Self {
        Self {
            run_function: Rc::clone(&self.run_function),
        }
    }
}

impl<R, A> std::fmt::Display for Reader<R, A>
where
    R: 'static,
    A: 'static,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "<Reader>")
    }
}
