//! The `eff!` macro: do-notation for every type exposing `flat_map`.
//!
//! - `pattern <= expression;` binds the value inside `expression`
//! - `let pattern = expression;` is an ordinary binding
//! - the final expression must already be wrapped
//!
//! `<-` is not a valid macro token, so binding uses `<=`.
//!
//! # Examples
//!
//! ```rust
//! use effectkit::eff;
//! use effectkit::effect::State;
//!
//! let computation: State<i32, i32> = eff! {
//!     current <= State::get();
//!     _ <= State::put(current + 1);
//!     next <= State::get();
//!     State::pure(next * 10)
//! };
//! assert_eq!(computation.run(1), (20, 2));
//! ```
//!
//! The expansion of `x <= m; rest` is `m.flat_map(move |x| eff!(rest))`, so
//! `Option` and `Result` need the [`Monad`](crate::typeclass::Monad) trait in
//! scope while `Try`, `IO`, `Writer`, `TaskResult` and friends use their
//! inherent `flat_map`.

/// Monadic do-notation.
///
/// ```rust
/// use effectkit::eff;
/// use effectkit::data::Try;
///
/// let total = eff! {
///     x <= Try::success(5);
///     let doubled = x * 2;
///     (a, b) <= Try::success((doubled, 1));
///     Try::success(a + b)
/// };
/// assert_eq!(total, Try::success(11));
/// ```
#[macro_export]
macro_rules! eff {
    ($result:expr) => {
        $result
    };

    ($pattern:ident <= $monad:expr ; $($rest:tt)+) => {
        $monad.flat_map(move |$pattern| {
            $crate::eff!($($rest)+)
        })
    };

    (($($pattern:tt)*) <= $monad:expr ; $($rest:tt)+) => {
        $monad.flat_map(move |($($pattern)*)| {
            $crate::eff!($($rest)+)
        })
    };

    (_ <= $monad:expr ; $($rest:tt)+) => {
        $monad.flat_map(move |_| {
            $crate::eff!($($rest)+)
        })
    };

    (let $pattern:ident = $expr:expr ; $($rest:tt)+) => {
        {
            let $pattern = $expr;
            $crate::eff!($($rest)+)
        }
    };

    (let ($($pattern:tt)*) = $expr:expr ; $($rest:tt)+) => {
        {
            let ($($pattern)*) = $expr;
            $crate::eff!($($rest)+)
        }
    };
}
