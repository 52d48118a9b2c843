//! Writer Monad - a value paired with an ordered log.
//!
//! A `Writer<T, L>` holds a value and the log lines produced while computing
//! it. Sequencing concatenates logs in execution order: `flat_map` keeps this
//! writer's lines first, then the lines of the next writer. When either side
//! has no lines the other side's buffer is reused as-is.
//!
//! # Laws
//!
//! - Left Identity: `Writer::pure(a).flat_map(f) == f(a)`
//! - Right Identity: `m.flat_map(Writer::pure) == m`
//! - Tell Concatenation: `tell(a).then(tell(b))` logs `[a, b]`
//!
//! # Examples
//!
//! ```rust
//! use effectkit::effect::Writer;
//!
//! fn log(message: &str) -> Writer<effectkit::data::Unit, String> {
//!     Writer::tell(message.to_string())
//! }
//!
//! let computation = log("step 1")
//!     .then(log("step 2"))
//!     .then(Writer::pure(42));
//!
//! assert_eq!(computation.pretty_print(), "42 | logs: [step 1, step 2]");
//! ```

use std::fmt;

use crate::data::Unit;
use crate::effect::IO;

/// A value of type `T` with log lines of type `L`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Writer<T, L> {
    value: T,
    logs: Vec<L>,
}

impl<T, L> Writer<T, L> {
    /// Creates a Writer from a value and its logs.
    pub fn new(value: T, logs: Vec<L>) -> Self {
        Self { value, logs }
    }

    /// Alias for [`Writer::new`] accepting any collection of log lines.
    pub fn from(value: T, logs: impl IntoIterator<Item = L>) -> Self {
        Self::new(value, logs.into_iter().collect())
    }

    /// A Writer with no logs.
    pub fn pure(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    /// The value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The log lines, oldest first.
    pub fn logs(&self) -> &[L] {
        &self.logs
    }

    /// Splits the Writer into its value and logs.
    pub fn run(self) -> (T, Vec<L>) {
        (self.value, self.logs)
    }

    /// Transforms the value; the logs are unchanged.
    pub fn fmap<B, F>(self, function: F) -> Writer<B, L>
    where
        F: FnOnce(T) -> B,
    {
        Writer::new(function(self.value), self.logs)
    }

    /// Chains a Writer built from the value; its logs follow this Writer's.
    pub fn flat_map<B, F>(self, function: F) -> Writer<B, L>
    where
        F: FnOnce(T) -> Writer<B, L>,
    {
        let next = function(self.value);
        Writer::new(next.value, combine_logs(self.logs, next.logs))
    }

    /// Alias for [`Writer::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> Writer<B, L>
    where
        F: FnOnce(T) -> Writer<B, L>,
    {
        self.flat_map(function)
    }

    /// Binds `binder`, then combines the original value with the bound one.
    pub fn flat_map_with<B, C, F, P>(self, binder: F, projector: P) -> Writer<C, L>
    where
        T: Clone,
        F: FnOnce(T) -> Writer<B, L>,
        P: FnOnce(T, B) -> C,
    {
        self.flat_map(|value| binder(value.clone()).fmap(|bound| projector(value, bound)))
    }

    /// Sequences `next` after this Writer, discarding this value.
    pub fn then<B>(self, next: Writer<B, L>) -> Writer<B, L> {
        self.flat_map(|_| next)
    }

    /// Appends one log line.
    #[must_use]
    pub fn append_log(mut self, log: L) -> Self {
        self.logs.push(log);
        self
    }

    /// Appends several log lines in order.
    #[must_use]
    pub fn append_logs(mut self, logs: impl IntoIterator<Item = L>) -> Self {
        self.logs.extend(logs);
        self
    }

    /// Observes the value.
    #[must_use]
    pub fn tap<F>(self, function: F) -> Self
    where
        F: FnOnce(&T),
    {
        function(&self.value);
        self
    }

    /// Observes the log lines.
    #[must_use]
    pub fn tap_logs<F>(self, function: F) -> Self
    where
        F: FnOnce(&[L]),
    {
        function(&self.logs);
        self
    }

    /// Defers feeding every log line into `sink`; running the IO yields the
    /// value.
    ///
    /// ```rust
    /// use effectkit::effect::Writer;
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let lines = Rc::new(RefCell::new(Vec::new()));
    /// let sink = Rc::clone(&lines);
    /// let io = Writer::new(5, vec!["a", "b"]).to_io(move |line| sink.borrow_mut().push(line));
    /// assert!(lines.borrow().is_empty());
    /// assert_eq!(io.run_unsafe(), 5);
    /// assert_eq!(*lines.borrow(), vec!["a", "b"]);
    /// ```
    pub fn to_io<F>(self, mut sink: F) -> IO<T>
    where
        T: 'static,
        L: 'static,
        F: FnMut(L) + 'static,
    {
        IO::new(move || {
            self.logs.into_iter().for_each(&mut sink);
            self.value
        })
    }

    /// Renders `"{value} | logs: [a, b]"`.
    pub fn pretty_print(&self) -> String
    where
        T: fmt::Display,
        L: fmt::Display,
    {
        format!("{} | logs: [{}]", self.value, join(&self.logs))
    }
}

impl<F, L> Writer<F, L> {
    /// Applies the wrapped function to the wrapped value; the function's
    /// logs come first.
    pub fn apply<B, Output>(self, value: Writer<B, L>) -> Writer<Output, L>
    where
        F: FnOnce(B) -> Output,
    {
        Writer::new((self.value)(value.value), combine_logs(self.logs, value.logs))
    }
}

impl<L> Writer<Unit, L> {
    /// A Writer that only records `log`.
    pub fn tell(log: L) -> Self {
        Self::new(Unit, vec![log])
    }
}

impl<T: fmt::Display, L: fmt::Display> fmt::Display for Writer<T, L> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Writer(Value: {}, Logs: [{}])", self.value, join(&self.logs))
    }
}

/// Concatenates two log buffers, reusing whichever side is non-empty when
/// the other is empty.
pub(crate) fn combine_logs<L>(mut first: Vec<L>, second: Vec<L>) -> Vec<L> {
    if first.is_empty() {
        return second;
    }
    if !second.is_empty() {
        first.extend(second);
    }
    first
}

fn join<L: fmt::Display>(logs: &[L]) -> String {
    logs.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn flat_map_orders_logs() {
        let writer = Writer::new(1, vec!["first"])
            .flat_map(|x| Writer::new(x + 1, vec!["second"]))
            .flat_map(|x| Writer::new(x * 10, vec!["third"]));
        assert_eq!(writer.run(), (20, vec!["first", "second", "third"]));
    }

    #[rstest]
    fn fmap_keeps_logs() {
        let writer = Writer::new(2, vec!["kept"]).fmap(|x| x * 2);
        assert_eq!(writer, Writer::new(4, vec!["kept"]));
    }

    #[rstest]
    fn apply_concatenates_function_logs_first() {
        let function = Writer::new(|x: i32| x + 1, vec!["fn"]);
        let value = Writer::new(41, vec!["value"]);
        assert_eq!(function.apply(value).run(), (42, vec!["fn", "value"]));
    }

    #[rstest]
    fn tell_and_append() {
        let writer = Writer::tell("a")
            .then(Writer::pure(3))
            .append_log("b")
            .append_logs(["c", "d"]);
        assert_eq!(writer.logs(), ["a", "b", "c", "d"]);
        assert_eq!(*writer.value(), 3);
    }

    #[rstest]
    fn flat_map_with_projects() {
        let writer = Writer::new(2, vec!["x"])
            .flat_map_with(|x| Writer::new(x * 3, vec!["y"]), |x, y| x + y);
        assert_eq!(writer, Writer::from(8, ["x", "y"]));
    }

    #[rstest]
    fn tap_observes_without_changing() {
        let mut seen = (0, 0);
        let writer = Writer::new(9, vec!["a", "b"])
            .tap(|value| seen.0 = *value)
            .tap_logs(|logs| seen.1 = logs.len());
        assert_eq!(seen, (9, 2));
        assert_eq!(writer, Writer::new(9, vec!["a", "b"]));
    }

    #[rstest]
    fn rendering() {
        let writer = Writer::new(10, vec!["start", "end"]);
        assert_eq!(writer.pretty_print(), "10 | logs: [start, end]");
        assert_eq!(writer.to_string(), "Writer(Value: 10, Logs: [start, end])");
        assert_eq!(Writer::<i32, &str>::pure(1).to_string(), "Writer(Value: 1, Logs: [])");
    }

    #[rstest]
    #[case(vec![], vec![1, 2], vec![1, 2])]
    #[case(vec![1], vec![], vec![1])]
    #[case(vec![1], vec![2, 3], vec![1, 2, 3])]
    fn combine_logs_concatenates(#[case] first: Vec<i32>, #[case] second: Vec<i32>, #[case] expected: Vec<i32>) {
        assert_eq!(combine_logs(first, second), expected);
    }
}
