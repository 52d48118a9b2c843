//! `Validator` - reusable, composable validation rules.
//!
//! A validator is an ordered list of rules, each mapping `&T` to a
//! `Validation<Unit>`. Running it evaluates every rule and accumulates all
//! errors. Rules can target a field through a [`Lens`], in which case the
//! lens path prefixes the error (`"Age: Must be adult"`).

use std::fmt;
use std::sync::Arc;

use super::validated::Validation;
use crate::data::Unit;
use crate::optics::Lens;

type Rule<T> = Arc<dyn Fn(&T) -> Validation<Unit> + Send + Sync>;

/// An ordered collection of validation rules for `T`.
///
/// # Examples
///
/// ```rust
/// use effectkit::lens;
/// use effectkit::validation::Validator;
///
/// #[derive(Clone)]
/// struct Person { name: String, age: u32 }
///
/// let validator = Validator::<Person>::empty()
///     .ensure(|person| !person.name.is_empty(), "Name required")
///     .ensure_lens(&lens!(Person, age), |age| *age >= 18, "Must be adult");
///
/// let outcome = validator.validate(&Person { name: String::new(), age: 15 });
/// assert_eq!(outcome.errors(), ["Name required", "age: Must be adult"]);
/// ```
pub struct Validator<T> {
    rules: Arc<Vec<Rule<T>>>,
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
        }
    }
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self {
            rules: Arc::new(Vec::new()),
        }
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Validator")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl<T: 'static> Validator<T> {
    /// A validator without rules; every subject is valid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` when there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The number of rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when both validators share the same rule list.
    pub fn shares_rules_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rules, &other.rules)
    }

    /// Adds a raw rule.
    #[must_use]
    pub fn rule<F>(self, rule: F) -> Self
    where
        F: Fn(&T) -> Validation<Unit> + Send + Sync + 'static,
    {
        let mut rules = Vec::with_capacity(self.rules.len() + 1);
        rules.extend(self.rules.iter().cloned());
        rules.push(Arc::new(rule) as Rule<T>);
        Self { rules: Arc::new(rules) }
    }

    /// `self`'s rules followed by `other`'s.
    ///
    /// When either side is empty the other one is returned as-is, so
    /// [`Validator::empty`] is an identity. The operation is not commutative.
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let rules = self.rules.iter().chain(other.rules.iter()).cloned().collect();
        Self { rules: Arc::new(rules) }
    }

    /// Fails with `error` when `predicate` rejects the subject.
    #[must_use]
    pub fn ensure<P>(self, predicate: P, error: impl Into<String>) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let error = error.into();
        self.rule(move |subject| check(predicate(subject), &error))
    }

    /// Fails with `"{path}: {error}"` when `predicate` rejects the field
    /// focused by `lens`.
    #[must_use]
    pub fn ensure_lens<V, P>(self, lens: &Lens<T, V>, predicate: P, error: impl Into<String>) -> Self
    where
        V: 'static,
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let message = prefixed(&lens.describe(), &error.into());
        let lens = lens.clone();
        self.rule(move |subject| check(predicate(&lens.get(subject)), &message))
    }

    /// Runs `nested` on the field focused by `lens`, prefixing each of its
    /// errors with the lens path.
    #[must_use]
    pub fn ensure_nested<V>(self, lens: &Lens<T, V>, nested: &Validator<V>) -> Self
    where
        V: 'static,
    {
        let path = lens.describe();
        let lens = lens.clone();
        let nested = nested.clone();
        self.rule(move |subject| match nested.validate(&lens.get(subject)) {
            Validation::Valid(unit) => Validation::Valid(unit),
            Validation::Invalid(errors) => {
                Validation::Invalid(errors.iter().map(|error| prefixed(&path, error)).collect())
            }
        })
    }

    /// Runs every rule, accumulating all errors in rule order.
    pub fn validate(&self, subject: &T) -> Validation<Unit> {
        self.rules
            .iter()
            .fold(Validation::Valid(Unit), |accumulated, rule| {
                accumulated.combine(rule(subject), |_, _| Unit)
            })
    }

    /// Alias for [`Validator::validate`].
    pub fn apply(&self, subject: &T) -> Validation<Unit> {
        self.validate(subject)
    }
}

fn check(passed: bool, error: &str) -> Validation<Unit> {
    if passed {
        Validation::Valid(Unit)
    } else {
        Validation::failure(error)
    }
}

fn prefixed(path: &str, error: &str) -> String {
    format!("{path}: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Clone, Debug, PartialEq)]
    struct Address {
        city: String,
        street: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Person {
        name: String,
        address: Address,
        age: u32,
    }

    fn person(name: &str, city: &str, street: &str, age: u32) -> Person {
        Person {
            name: name.to_string(),
            address: Address {
                city: city.to_string(),
                street: street.to_string(),
            },
            age,
        }
    }

    fn age_lens() -> Lens<Person, u32> {
        Lens::named(|p: &Person| p.age, |p, age| Person { age, ..p }, "Age")
    }

    fn address_lens() -> Lens<Person, Address> {
        Lens::named(|p: &Person| p.address.clone(), |p, address| Person { address, ..p }, "Address")
    }

    fn person_validator() -> Validator<Person> {
        let address_validator = Validator::<Address>::empty().ensure(|a| !a.city.is_empty(), "City");
        Validator::empty()
            .ensure(|p: &Person| !p.name.trim().is_empty(), "Name required")
            .ensure_lens(&age_lens(), |age| *age >= 18, "Must be adult")
            .ensure_nested(&address_lens(), &address_validator)
    }

    #[rstest]
    fn accumulates_every_error() {
        let outcome = person_validator().validate(&person("", "", "Street", 15));
        assert_eq!(outcome.errors(), ["Name required", "Age: Must be adult", "Address: City"]);
        assert!(person_validator().apply(&person("", "", "Street", 15)).is_invalid());
        assert!(person_validator().validate(&person("Ada", "NYC", "Main", 30)).is_valid());
    }

    #[rstest]
    fn nested_composed_path_prefixes_errors() {
        let street_lens = Lens::named(|a: &Address| a.street.clone(), |a, street| Address { street, ..a }, "Street");
        let street_validator = Validator::<String>::empty().ensure(|street| !street.is_empty(), "Street missing");
        let composed = address_lens().compose(&street_lens).unwrap();
        let validator = Validator::empty().ensure_nested(&composed, &street_validator);
        let outcome = validator.validate(&person("Name", "City", "", 20));
        assert_eq!(outcome.errors(), ["Address.Street: Street missing"]);
    }

    #[rstest]
    fn append_merges_and_keeps_identity() {
        let first = Validator::<Person>::empty().ensure(|p| !p.name.is_empty(), "Name");
        let second = Validator::<Person>::empty().ensure(|p| p.age > 0, "Age");

        let combined = first.append(&second);
        assert_eq!(combined.rule_count(), 2);
        assert_eq!(combined.validate(&person("", "", "", 0)).errors(), ["Name", "Age"]);

        assert!(first.append(&Validator::empty()).shares_rules_with(&first));
        assert!(Validator::empty().append(&first).shares_rules_with(&first));
        assert!(Validator::<Person>::empty().validate(&person("", "", "", 0)).is_valid());
        assert!(Validator::<Person>::empty().is_empty());
    }
}
