// Allow must_use_candidate for matcher factory functions since returning the matcher
// without using it is the common pattern for test setup
#![allow(clippy::must_use_candidate)]

//! Matchers for values and recorded arguments.
//!
//! A [`Matcher`] answers whether a value is acceptable and can explain
//! itself when it is not. Matchers drive [`assert_that!`](crate::assert_that)
//! and the recorders' `was_called_matching`, which asks whether any recorded
//! call had matching arguments.
//!
//! The built-in factories cover the common cases: [`eq`], [`gt`], [`lt`],
//! [`contains_str`], and [`satisfies`] for ad-hoc predicates. [`all_of`],
//! [`any_of`], and [`not`] combine them.
//!
//! # Example
//!
//! ```rust
//! use understudy::assertions::matcher::{contains_str, gt, Matcher};
//! use understudy::recorder::Recorder;
//!
//! let audit = Recorder::new(|line: String| line.len());
//! audit.call("deploy to staging".to_string());
//!
//! assert!(audit.was_called_matching(&contains_str("staging")));
//! assert!(!audit.was_called_matching(&contains_str("production")));
//!
//! let m = gt(10);
//! assert!(m.matches(&11));
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;

/// A predicate over values that can describe itself.
///
/// Only [`matches`](Matcher::matches) and [`describe`](Matcher::describe)
/// need implementing; the mismatch explanation has a generic default.
///
/// # Implementing Custom Matchers
///
/// ```rust
/// use understudy::assertions::matcher::Matcher;
///
/// struct IsEven;
///
/// impl Matcher<i32> for IsEven {
///     fn matches(&self, value: &i32) -> bool {
///         value % 2 == 0
///     }
///
///     fn describe(&self) -> String {
///         "is even".to_string()
///     }
/// }
///
/// let m = IsEven;
/// assert!(m.matches(&4));
/// assert!(!m.matches(&3));
/// ```
pub trait Matcher<T: ?Sized> {
    /// Check if the value matches.
    fn matches(&self, value: &T) -> bool;

    /// Describe what this matcher expects.
    fn describe(&self) -> String;

    /// Describe why a value didn't match.
    fn describe_mismatch(&self, _value: &T) -> String {
        format!("did not match: {}", self.describe())
    }
}

// Boxed matchers match through the box, so combinators can nest.
impl<T: ?Sized> Matcher<T> for Box<dyn Matcher<T>> {
    fn matches(&self, value: &T) -> bool {
        (**self).matches(value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn describe_mismatch(&self, value: &T) -> String {
        (**self).describe_mismatch(value)
    }
}

/// Assert that a value matches a matcher.
///
/// # Panics
///
/// Panics with the matcher's mismatch explanation if the value doesn't
/// match. An optional trailing message is appended as a note.
///
/// # Example
///
/// ```rust
/// use understudy::{assert_that, assertions::matcher::{all_of, gt, lt, Matcher}};
///
/// assert_that!(42, gt(0));
/// let bounds: Vec<Box<dyn Matcher<i32>>> = vec![Box::new(gt(0)), Box::new(lt(100))];
/// assert_that!(42, all_of(bounds), "sanity bounds");
/// ```
#[macro_export]
macro_rules! assert_that {
    ($value:expr, $matcher:expr) => {{
        let value = &$value;
        let matcher = &$matcher;
        if !$crate::assertions::matcher::Matcher::matches(matcher, value) {
            panic!(
                "assertion failed: {}\n  expected: {}\n  value: {:?}",
                $crate::assertions::matcher::Matcher::describe_mismatch(matcher, value),
                $crate::assertions::matcher::Matcher::describe(matcher),
                value
            );
        }
    }};
    ($value:expr, $matcher:expr, $($arg:tt)+) => {{
        let value = &$value;
        let matcher = &$matcher;
        if !$crate::assertions::matcher::Matcher::matches(matcher, value) {
            panic!(
                "assertion failed: {}\n  expected: {}\n  value: {:?}\n  note: {}",
                $crate::assertions::matcher::Matcher::describe_mismatch(matcher, value),
                $crate::assertions::matcher::Matcher::describe(matcher),
                value,
                format_args!($($arg)+)
            );
        }
    }};
}

/// Create an equality matcher.
///
/// # Example
///
/// ```rust
/// use understudy::assertions::matcher::{eq, Matcher};
///
/// let m = eq("ready");
/// assert!(m.matches(&"ready"));
/// assert!(!m.matches(&"pending"));
/// ```
pub fn eq<T: PartialEq + Debug>(expected: T) -> EqMatcher<T> {
    EqMatcher { expected }
}

/// Matcher produced by [`eq`].
pub struct EqMatcher<T> {
    expected: T,
}

impl<T: PartialEq + Debug> Matcher<T> for EqMatcher<T> {
    fn matches(&self, value: &T) -> bool {
        value == &self.expected
    }

    fn describe(&self) -> String {
        format!("is equal to {:?}", self.expected)
    }

    fn describe_mismatch(&self, value: &T) -> String {
        format!("{value:?} is not equal to {:?}", self.expected)
    }
}

/// Create a greater-than matcher.
///
/// # Example
///
/// ```rust
/// use understudy::assertions::matcher::{gt, Matcher};
///
/// assert!(gt(10).matches(&20));
/// assert!(!gt(10).matches(&10));
/// ```
pub fn gt<T: PartialOrd + Debug>(threshold: T) -> GtMatcher<T> {
    GtMatcher { threshold }
}

/// Matcher produced by [`gt`].
pub struct GtMatcher<T> {
    threshold: T,
}

impl<T: PartialOrd + Debug> Matcher<T> for GtMatcher<T> {
    fn matches(&self, value: &T) -> bool {
        value > &self.threshold
    }

    fn describe(&self) -> String {
        format!("is greater than {:?}", self.threshold)
    }

    fn describe_mismatch(&self, value: &T) -> String {
        format!("{value:?} is not greater than {:?}", self.threshold)
    }
}

/// Create a less-than matcher.
///
/// # Example
///
/// ```rust
/// use understudy::assertions::matcher::{lt, Matcher};
///
/// assert!(lt(10).matches(&5));
/// assert!(!lt(10).matches(&10));
/// ```
pub fn lt<T: PartialOrd + Debug>(threshold: T) -> LtMatcher<T> {
    LtMatcher { threshold }
}

/// Matcher produced by [`lt`].
pub struct LtMatcher<T> {
    threshold: T,
}

impl<T: PartialOrd + Debug> Matcher<T> for LtMatcher<T> {
    fn matches(&self, value: &T) -> bool {
        value < &self.threshold
    }

    fn describe(&self) -> String {
        format!("is less than {:?}", self.threshold)
    }

    fn describe_mismatch(&self, value: &T) -> String {
        format!("{value:?} is not less than {:?}", self.threshold)
    }
}

/// Create a substring matcher.
///
/// Works on anything string-shaped: `String`, `str`, `&str`.
///
/// # Example
///
/// ```rust
/// use understudy::assertions::matcher::{contains_str, Matcher};
///
/// let m = contains_str("timed out");
/// assert!(m.matches("request timed out after 3 retries"));
/// assert!(!m.matches(&"request ok".to_string()));
/// ```
pub fn contains_str(needle: &str) -> ContainsStrMatcher {
    ContainsStrMatcher {
        needle: needle.to_string(),
    }
}

/// Matcher produced by [`contains_str`].
pub struct ContainsStrMatcher {
    needle: String,
}

impl<S> Matcher<S> for ContainsStrMatcher
where
    S: AsRef<str> + ?Sized,
{
    fn matches(&self, value: &S) -> bool {
        value.as_ref().contains(&self.needle)
    }

    fn describe(&self) -> String {
        format!("contains {:?}", self.needle)
    }

    fn describe_mismatch(&self, value: &S) -> String {
        format!("{:?} does not contain {:?}", value.as_ref(), self.needle)
    }
}

/// Create a matcher from a predicate and a description.
///
/// # Example
///
/// ```rust
/// use understudy::assertions::matcher::{satisfies, Matcher};
///
/// let m = satisfies(|args: &(u32, bool)| args.1, "retry flag set");
/// assert!(m.matches(&(3, true)));
/// assert!(!m.matches(&(3, false)));
/// ```
pub fn satisfies<T, F>(predicate: F, description: &str) -> PredicateMatcher<T, F>
where
    T: ?Sized,
    F: Fn(&T) -> bool,
{
    PredicateMatcher {
        predicate,
        description: description.to_string(),
        _marker: PhantomData,
    }
}

/// Matcher produced by [`satisfies`].
pub struct PredicateMatcher<T: ?Sized, F> {
    predicate: F,
    description: String,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized, F: Fn(&T) -> bool> Matcher<T> for PredicateMatcher<T, F> {
    fn matches(&self, value: &T) -> bool {
        (self.predicate)(value)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

fn boxed<T, M>(matchers: Vec<M>) -> Vec<Box<dyn Matcher<T>>>
where
    T: ?Sized,
    M: Matcher<T> + 'static,
{
    matchers
        .into_iter()
        .map(|m| Box::new(m) as Box<dyn Matcher<T>>)
        .collect()
}

/// Create a matcher that requires every given matcher to match.
///
/// Mixed matcher types go in as `Vec<Box<dyn Matcher<T>>>`.
///
/// # Example
///
/// ```rust
/// use understudy::assertions::matcher::{all_of, gt, lt, Matcher};
///
/// let in_range = all_of(vec![gt(0), gt(-10)]);
/// assert!(in_range.matches(&50));
/// assert!(!in_range.matches(&-5));
///
/// let bounded: Vec<Box<dyn Matcher<i32>>> = vec![Box::new(gt(0)), Box::new(lt(100))];
/// assert!(all_of(bounded).matches(&50));
/// ```
pub fn all_of<T, M>(matchers: Vec<M>) -> AllOfMatcher<T>
where
    T: ?Sized,
    M: Matcher<T> + 'static,
{
    AllOfMatcher {
        matchers: boxed(matchers),
    }
}

/// Matcher produced by [`all_of`].
pub struct AllOfMatcher<T: ?Sized> {
    matchers: Vec<Box<dyn Matcher<T>>>,
}

impl<T: ?Sized> Matcher<T> for AllOfMatcher<T> {
    fn matches(&self, value: &T) -> bool {
        self.matchers.iter().all(|m| m.matches(value))
    }

    fn describe(&self) -> String {
        let parts: Vec<_> = self.matchers.iter().map(|m| m.describe()).collect();
        format!("all of [{}]", parts.join(", "))
    }

    fn describe_mismatch(&self, value: &T) -> String {
        let failures: Vec<_> = self
            .matchers
            .iter()
            .filter(|m| !m.matches(value))
            .map(|m| m.describe_mismatch(value))
            .collect();
        failures.join("; ")
    }
}

/// Create a matcher that requires at least one given matcher to match.
///
/// # Example
///
/// ```rust
/// use understudy::assertions::matcher::{any_of, eq, Matcher};
///
/// let known = any_of(vec![eq("GET"), eq("HEAD")]);
/// assert!(known.matches(&"GET"));
/// assert!(!known.matches(&"POST"));
/// ```
pub fn any_of<T, M>(matchers: Vec<M>) -> AnyOfMatcher<T>
where
    T: ?Sized,
    M: Matcher<T> + 'static,
{
    AnyOfMatcher {
        matchers: boxed(matchers),
    }
}

/// Matcher produced by [`any_of`].
pub struct AnyOfMatcher<T: ?Sized> {
    matchers: Vec<Box<dyn Matcher<T>>>,
}

impl<T: ?Sized> Matcher<T> for AnyOfMatcher<T> {
    fn matches(&self, value: &T) -> bool {
        self.matchers.iter().any(|m| m.matches(value))
    }

    fn describe(&self) -> String {
        let parts: Vec<_> = self.matchers.iter().map(|m| m.describe()).collect();
        format!("any of [{}]", parts.join(", "))
    }

    fn describe_mismatch(&self, _value: &T) -> String {
        format!("matched none of: {}", self.describe())
    }
}

/// Create a matcher that inverts another matcher.
///
/// # Example
///
/// ```rust
/// use understudy::assertions::matcher::{eq, not, Matcher};
///
/// let m = not(eq(0));
/// assert!(m.matches(&1));
/// assert!(!m.matches(&0));
/// ```
pub fn not<T, M>(matcher: M) -> NotMatcher<T>
where
    T: ?Sized,
    M: Matcher<T> + 'static,
{
    NotMatcher {
        inner: Box::new(matcher),
    }
}

/// Matcher produced by [`not`].
pub struct NotMatcher<T: ?Sized> {
    inner: Box<dyn Matcher<T>>,
}

impl<T: ?Sized> Matcher<T> for NotMatcher<T> {
    fn matches(&self, value: &T) -> bool {
        !self.inner.matches(value)
    }

    fn describe(&self) -> String {
        format!("not ({})", self.inner.describe())
    }

    fn describe_mismatch(&self, _value: &T) -> String {
        format!("unexpectedly matched: {}", self.inner.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::Recorder;

    #[test]
    fn test_eq_matcher() {
        let m = eq(42);
        assert!(m.matches(&42));
        assert!(!m.matches(&41));
        assert_eq!(m.describe(), "is equal to 42");
        assert_eq!(m.describe_mismatch(&41), "41 is not equal to 42");
    }

    #[test]
    fn test_ordering_matchers() {
        assert!(gt(10).matches(&20));
        assert!(!gt(10).matches(&10));
        assert!(lt(10).matches(&5));
        assert!(!lt(10).matches(&10));
    }

    #[test]
    fn test_contains_str_across_string_shapes() {
        let m = contains_str("needle");
        assert!(m.matches("a needle in a haystack"));
        assert!(m.matches(&"a needle in a haystack".to_string()));
        assert!(!m.matches("just hay"));
    }

    #[test]
    fn test_satisfies_uses_default_mismatch() {
        let m = satisfies(|s: &String| s.len() > 3, "longer than 3 chars");
        assert!(m.matches(&"long enough".to_string()));
        assert!(!m.matches(&"no".to_string()));
        assert_eq!(m.describe(), "longer than 3 chars");
        assert_eq!(
            m.describe_mismatch(&"no".to_string()),
            "did not match: longer than 3 chars"
        );
    }

    #[test]
    fn test_not_combinator() {
        let m = not(eq(0));
        assert!(m.matches(&1));
        assert!(!m.matches(&0));
        assert_eq!(m.describe(), "not (is equal to 0)");
    }

    #[test]
    fn test_all_of_reports_only_failures() {
        let m = all_of(vec![gt(0), gt(10)]);
        assert!(m.matches(&50));
        assert!(!m.matches(&5));
        assert_eq!(m.describe_mismatch(&5), "5 is not greater than 10");
    }

    #[test]
    fn test_any_of_combinator() {
        let m = any_of(vec![eq(1), eq(2)]);
        assert!(m.matches(&2));
        assert!(!m.matches(&3));
    }

    #[test]
    fn test_boxed_matchers_nest() {
        let boxed: Vec<Box<dyn Matcher<i32>>> = vec![Box::new(gt(0)), Box::new(lt(100))];
        let m = all_of(boxed);
        assert!(m.matches(&50));
        assert!(!m.matches(&200));
    }

    #[test]
    fn test_matching_recorded_arguments() {
        let send = Recorder::new(|msg: String| msg.len());
        send.call("warn: disk at 91%".to_string());
        send.call("info: backup done".to_string());

        assert!(send.was_called_matching(&contains_str("disk")));
        assert!(send.was_called_matching(&satisfies(
            |m: &String| m.starts_with("info"),
            "info line"
        )));
        assert!(!send.was_called_matching(&contains_str("error")));
    }

    #[test]
    fn test_assert_that_passes() {
        assert_that!(42, eq(42));
        assert_that!(50, all_of(vec![gt(0), gt(10)]));
    }

    #[test]
    #[should_panic(expected = "is not equal to")]
    fn test_assert_that_fails_with_mismatch() {
        assert_that!(41, eq(42));
    }

    #[test]
    #[should_panic(expected = "note: checking the answer")]
    fn test_assert_that_custom_message() {
        assert_that!(41, eq(42), "checking the answer");
    }
}
