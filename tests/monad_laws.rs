//! Property-based tests for Monad laws.
//!
//! - **Left Identity**: `pure(a).flat_map(f) == f(a)`
//! - **Right Identity**: `m.flat_map(pure) == m`
//! - **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`

use effectkit::data::{Exception, Try};
use effectkit::typeclass::Monad;
use proptest::prelude::*;

fn halve_option(n: i32) -> Option<i32> {
    (n % 2 == 0).then_some(n / 2)
}

fn decrement_option(n: i32) -> Option<i32> {
    n.checked_sub(1)
}

fn halve_result(n: i32) -> Result<i32, String> {
    if n % 2 == 0 { Ok(n / 2) } else { Err(format!("{n} is odd")) }
}

fn decrement_result(n: i32) -> Result<i32, String> {
    n.checked_sub(1).ok_or_else(|| "underflow".to_string())
}

fn halve_try(n: i32) -> Try<i32> {
    if n % 2 == 0 {
        Try::success(n / 2)
    } else {
        Try::failure(Exception::msg(format!("{n} is odd")))
    }
}

fn decrement_try(n: i32) -> Try<i32> {
    Try::run(move || n.checked_sub(1).unwrap_or_else(|| panic!("underflow")))
}

// =============================================================================
// Option<A>
// =============================================================================

proptest! {
    #[test]
    fn prop_option_left_identity(value in any::<i32>()) {
        prop_assert_eq!(Some(value).flat_map(halve_option), halve_option(value));
    }

    #[test]
    fn prop_option_right_identity(value in any::<Option<i32>>()) {
        prop_assert_eq!(value.flat_map(Some), value);
    }

    #[test]
    fn prop_option_associativity(value in any::<Option<i32>>()) {
        let left = value.flat_map(halve_option).flat_map(decrement_option);
        let right = value.flat_map(|x| halve_option(x).flat_map(decrement_option));
        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Result<T, String>
// =============================================================================

proptest! {
    #[test]
    fn prop_result_left_identity(value in any::<i32>()) {
        prop_assert_eq!(Ok::<i32, String>(value).flat_map(halve_result), halve_result(value));
    }

    #[test]
    fn prop_result_right_identity(value in prop::result::maybe_ok(any::<i32>(), "[a-z]{0,6}")) {
        prop_assert_eq!(value.clone().flat_map(Ok), value);
    }

    #[test]
    fn prop_result_associativity(value in prop::result::maybe_ok(any::<i32>(), "[a-z]{0,6}")) {
        let left = value.clone().flat_map(halve_result).flat_map(decrement_result);
        let right = value.flat_map(|x| halve_result(x).flat_map(decrement_result));
        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Try<T>
// =============================================================================

proptest! {
    #[test]
    fn prop_try_left_identity(value in any::<i32>()) {
        prop_assert_eq!(Try::success(value).flat_map(halve_try), halve_try(value));
    }

    #[test]
    fn prop_try_right_identity(value in any::<i32>()) {
        let attempt = halve_try(value);
        prop_assert_eq!(attempt.clone().flat_map(Try::success), attempt);
    }

    #[test]
    fn prop_try_associativity(value in any::<i32>()) {
        let left = halve_try(value).flat_map(halve_try).flat_map(decrement_try);
        let right = halve_try(value).flat_map(|x| halve_try(x).flat_map(decrement_try));
        prop_assert_eq!(left, right);
    }
}
