//! Set-like and slicing helpers for sequences.
//!
//! Every operation returns a new `Vec` and leaves the input untouched.
//! Set operations keep first-occurrence order and drop duplicates, the way
//! a query-style union or intersection does.

use std::fmt::Display;
use std::num::NonZeroUsize;

/// Sequence combinators over slices.
///
/// # Examples
///
/// ```rust
/// use effectkit::data::SequenceExt;
///
/// let left = [1, 2, 3];
/// let right = [3, 4];
/// assert_eq!(left.combine(&right), vec![1, 2, 3, 3, 4]);
/// assert_eq!(left.union(&right), vec![1, 2, 3, 4]);
/// assert_eq!(left.except(&right), vec![1, 2]);
/// assert_eq!(left.symmetric_difference(&right), vec![1, 2, 4]);
/// assert_eq!(left.join_with(", "), "1, 2, 3");
/// ```
pub trait SequenceExt<T> {
    /// The first element.
    fn first_option(&self) -> Option<T>;

    /// The first element accepted by `predicate`.
    fn first_option_where<P>(&self, predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool;

    /// Concatenation, keeping duplicates.
    fn combine(&self, other: &[T]) -> Vec<T>;

    /// Distinct elements of both sequences.
    fn union(&self, other: &[T]) -> Vec<T>;

    /// Distinct elements not present in `other`.
    fn except(&self, other: &[T]) -> Vec<T>;

    /// Distinct elements present in both sequences.
    fn intersect(&self, other: &[T]) -> Vec<T>;

    /// Distinct elements present in exactly one of the sequences.
    fn symmetric_difference(&self, other: &[T]) -> Vec<T>;

    /// The sequence repeated `times` times.
    fn repeated(&self, times: usize) -> Vec<T>;

    /// Consecutive chunks of at most `size` elements.
    fn chunked(&self, size: NonZeroUsize) -> Vec<Vec<T>>;

    /// The trailing `count` elements.
    fn take_last(&self, count: usize) -> Vec<T>;

    /// Renders every element and joins them with `separator`.
    fn join_with(&self, separator: &str) -> String
    where
        T: Display;
}

fn push_distinct<T: PartialEq + Clone>(target: &mut Vec<T>, item: &T) {
    if !target.contains(item) {
        target.push(item.clone());
    }
}

impl<T: Clone + PartialEq> SequenceExt<T> for [T] {
    fn first_option(&self) -> Option<T> {
        self.first().cloned()
    }

    fn first_option_where<P>(&self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|item| predicate(item)).cloned()
    }

    fn combine(&self, other: &[T]) -> Vec<T> {
        self.iter().chain(other).cloned().collect()
    }

    fn union(&self, other: &[T]) -> Vec<T> {
        let mut result = Vec::with_capacity(self.len() + other.len());
        for item in self.iter().chain(other) {
            push_distinct(&mut result, item);
        }
        result
    }

    fn except(&self, other: &[T]) -> Vec<T> {
        let mut result = Vec::new();
        for item in self.iter().filter(|item| !other.contains(item)) {
            push_distinct(&mut result, item);
        }
        result
    }

    fn intersect(&self, other: &[T]) -> Vec<T> {
        let mut result = Vec::new();
        for item in self.iter().filter(|item| other.contains(item)) {
            push_distinct(&mut result, item);
        }
        result
    }

    fn symmetric_difference(&self, other: &[T]) -> Vec<T> {
        self.except(other).union(&other.except(self))
    }

    fn repeated(&self, times: usize) -> Vec<T> {
        let mut result = Vec::with_capacity(self.len() * times);
        for _ in 0..times {
            result.extend_from_slice(self);
        }
        result
    }

    fn chunked(&self, size: NonZeroUsize) -> Vec<Vec<T>> {
        self.chunks(size.get()).map(<[T]>::to_vec).collect()
    }

    fn take_last(&self, count: usize) -> Vec<T> {
        self[self.len().saturating_sub(count)..].to_vec()
    }

    fn join_with(&self, separator: &str) -> String
    where
        T: Display,
    {
        self.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}
