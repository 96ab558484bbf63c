//! Matchers
//!
//! Composable predicates with human-readable descriptions, in the style of
//! hamcrest. A [`Matcher`] can tell whether a value matches, describe what
//! it expects, and describe why a value did not match.
//!
//! ```
//! use pingstep::report::matcher::{contains_string, is, Description, Matcher, MatcherExt};
//!
//! let matcher = is("pong").or(contains_string("po"));
//! assert!(matcher.matches(&"pong"));
//!
//! let mut description = Description::new();
//! description.append_description_of(&matcher);
//! assert_eq!(description.to_string(), r#"(is "pong" or a string containing "po")"#);
//! ```

use std::fmt::{self, Debug};

/// Text accumulated while describing matchers and mismatches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    text: String,
}

impl Description {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text
    pub fn append_text(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    /// Append a value the way it would appear in Rust source (strings quoted)
    pub fn append_value<T: Debug + ?Sized>(&mut self, value: &T) -> &mut Self {
        self.text.push_str(&format!("{value:?}"));
        self
    }

    /// Append the description of something self-describing
    pub fn append_description_of<S: SelfDescribing + ?Sized>(&mut self, value: &S) -> &mut Self {
        value.describe_to(self);
        self
    }

    /// Append `start`, the items joined by `separator`, then `end`
    pub fn append_list<'a, S, I>(
        &mut self,
        start: &str,
        separator: &str,
        end: &str,
        items: I,
    ) -> &mut Self
    where
        S: SelfDescribing + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        self.text.push_str(start);
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.text.push_str(separator);
            }
            item.describe_to(self);
        }
        self.text.push_str(end);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Something that can describe itself
pub trait SelfDescribing {
    fn describe_to(&self, description: &mut Description);
}

/// A predicate over `T` with descriptions
pub trait Matcher<T: ?Sized + Debug>: SelfDescribing {
    /// Whether `actual` satisfies this matcher
    fn matches(&self, actual: &T) -> bool;

    /// Explain why `actual` did not match
    fn describe_mismatch(&self, actual: &T, description: &mut Description) {
        description.append_text("was ").append_value(actual);
    }
}

/// Description of a matcher as a plain string
pub fn describe<S: SelfDescribing + ?Sized>(matcher: &S) -> String {
    let mut description = Description::new();
    description.append_description_of(matcher);
    description.to_string()
}

/// Mismatch description for `actual` as a plain string
pub fn describe_mismatch<T: ?Sized + Debug>(
    matcher: &(impl Matcher<T> + ?Sized),
    actual: &T,
) -> String {
    let mut description = Description::new();
    matcher.describe_mismatch(actual, &mut description);
    description.to_string()
}

/// Combinators available on every sized matcher
pub trait MatcherExt<T: ?Sized + Debug>: Matcher<T> + Sized + 'static {
    /// Both this and `other` must match
    fn and<M: Matcher<T> + 'static>(self, other: M) -> AllOf<T> {
        AllOf::new(vec![
            Box::new(self) as Box<dyn Matcher<T>>,
            Box::new(other),
        ])
    }

    /// Either this or `other` must match
    fn or<M: Matcher<T> + 'static>(self, other: M) -> AnyOf<T> {
        AnyOf::new(vec![
            Box::new(self) as Box<dyn Matcher<T>>,
            Box::new(other),
        ])
    }
}

impl<T: ?Sized + Debug, M: Matcher<T> + 'static> MatcherExt<T> for M {}

/// Matches values equal to the expected one
#[derive(Debug, Clone)]
pub struct EqualTo<V> {
    expected: V,
}

impl<V: Debug> SelfDescribing for EqualTo<V> {
    fn describe_to(&self, description: &mut Description) {
        description.append_value(&self.expected);
    }
}

impl<T, V> Matcher<T> for EqualTo<V>
where
    T: ?Sized + Debug + PartialEq<V>,
    V: Debug,
{
    fn matches(&self, actual: &T) -> bool {
        actual == &self.expected
    }
}

/// Matches values equal to `expected`
pub fn equal_to<V: Debug>(expected: V) -> EqualTo<V> {
    EqualTo { expected }
}

/// Decorates another matcher, prefixing its description with `is`
#[derive(Debug, Clone)]
pub struct Is<M> {
    inner: M,
}

impl<M> Is<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M: SelfDescribing> SelfDescribing for Is<M> {
    fn describe_to(&self, description: &mut Description) {
        description.append_text("is ").append_description_of(&self.inner);
    }
}

impl<T: ?Sized + Debug, M: Matcher<T>> Matcher<T> for Is<M> {
    fn matches(&self, actual: &T) -> bool {
        self.inner.matches(actual)
    }

    fn describe_mismatch(&self, actual: &T, description: &mut Description) {
        self.inner.describe_mismatch(actual, description);
    }
}

/// `is(x)` is shorthand for `Is::new(equal_to(x))`
pub fn is<V: Debug>(expected: V) -> Is<EqualTo<V>> {
    Is::new(equal_to(expected))
}

/// Inverts another matcher
#[derive(Debug, Clone)]
pub struct Not<M> {
    inner: M,
}

impl<M: SelfDescribing> SelfDescribing for Not<M> {
    fn describe_to(&self, description: &mut Description) {
        description.append_text("not ").append_description_of(&self.inner);
    }
}

impl<T: ?Sized + Debug, M: Matcher<T>> Matcher<T> for Not<M> {
    fn matches(&self, actual: &T) -> bool {
        !self.inner.matches(actual)
    }
}

pub fn not<M>(inner: M) -> Not<M> {
    Not { inner }
}

/// Matches when every inner matcher matches
pub struct AllOf<T: ?Sized + Debug> {
    matchers: Vec<Box<dyn Matcher<T>>>,
}

impl<T: ?Sized + Debug> AllOf<T> {
    pub fn new(matchers: Vec<Box<dyn Matcher<T>>>) -> Self {
        Self { matchers }
    }

    /// Add another matcher that must also match
    pub fn and<M: Matcher<T> + 'static>(mut self, other: M) -> Self {
        self.matchers.push(Box::new(other));
        self
    }
}

impl<T: ?Sized + Debug> SelfDescribing for AllOf<T> {
    fn describe_to(&self, description: &mut Description) {
        description.append_list(
            "(",
            " and ",
            ")",
            self.matchers.iter().map(|m| m.as_ref()),
        );
    }
}

impl<T: ?Sized + Debug> Matcher<T> for AllOf<T> {
    fn matches(&self, actual: &T) -> bool {
        self.matchers.iter().all(|m| m.matches(actual))
    }

    fn describe_mismatch(&self, actual: &T, description: &mut Description) {
        if let Some(failing) = self.matchers.iter().find(|m| !m.matches(actual)) {
            description
                .append_description_of(failing.as_ref())
                .append_text(" ");
            failing.describe_mismatch(actual, description);
        }
    }
}

/// Matches when all of `matchers` match
pub fn all_of<T: ?Sized + Debug>(matchers: Vec<Box<dyn Matcher<T>>>) -> AllOf<T> {
    AllOf::new(matchers)
}

/// Matches when at least one inner matcher matches
pub struct AnyOf<T: ?Sized + Debug> {
    matchers: Vec<Box<dyn Matcher<T>>>,
}

impl<T: ?Sized + Debug> AnyOf<T> {
    pub fn new(matchers: Vec<Box<dyn Matcher<T>>>) -> Self {
        Self { matchers }
    }

    /// Add another alternative
    pub fn or<M: Matcher<T> + 'static>(mut self, other: M) -> Self {
        self.matchers.push(Box::new(other));
        self
    }
}

impl<T: ?Sized + Debug> SelfDescribing for AnyOf<T> {
    fn describe_to(&self, description: &mut Description) {
        description.append_list(
            "(",
            " or ",
            ")",
            self.matchers.iter().map(|m| m.as_ref()),
        );
    }
}

impl<T: ?Sized + Debug> Matcher<T> for AnyOf<T> {
    fn matches(&self, actual: &T) -> bool {
        self.matchers.iter().any(|m| m.matches(actual))
    }
}

/// Matches when any of `matchers` matches
pub fn any_of<T: ?Sized + Debug>(matchers: Vec<Box<dyn Matcher<T>>>) -> AnyOf<T> {
    AnyOf::new(matchers)
}

/// Substring matchers over anything string-like
#[derive(Debug, Clone)]
pub struct StringMatcher {
    kind: StringMatchKind,
    substring: String,
}

#[derive(Debug, Clone, Copy)]
enum StringMatchKind {
    Contains,
    StartsWith,
}

impl SelfDescribing for StringMatcher {
    fn describe_to(&self, description: &mut Description) {
        let relation = match self.kind {
            StringMatchKind::Contains => "a string containing ",
            StringMatchKind::StartsWith => "a string starting with ",
        };
        description
            .append_text(relation)
            .append_value(self.substring.as_str());
    }
}

impl<T: ?Sized + Debug + AsRef<str>> Matcher<T> for StringMatcher {
    fn matches(&self, actual: &T) -> bool {
        let actual = actual.as_ref();
        match self.kind {
            StringMatchKind::Contains => actual.contains(&self.substring),
            StringMatchKind::StartsWith => actual.starts_with(&self.substring),
        }
    }
}

pub fn contains_string(substring: impl Into<String>) -> StringMatcher {
    StringMatcher {
        kind: StringMatchKind::Contains,
        substring: substring.into(),
    }
}

pub fn starts_with(prefix: impl Into<String>) -> StringMatcher {
    StringMatcher {
        kind: StringMatchKind::StartsWith,
        substring: prefix.into(),
    }
}

/// Matches everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Anything;

impl SelfDescribing for Anything {
    fn describe_to(&self, description: &mut Description) {
        description.append_text("ANYTHING");
    }
}

impl<T: ?Sized + Debug> Matcher<T> for Anything {
    fn matches(&self, _actual: &T) -> bool {
        true
    }
}

pub fn anything() -> Anything {
    Anything
}
