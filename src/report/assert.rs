//! Matcher assertions
//!
//! `check_that` returns an [`AssertionError`] when the matcher does not
//! hold; `assert_that` panics with the same message. Neither reports
//! anything on its own: reporting goes through
//! [`ReportLifecycle::check_that`](super::ReportLifecycle::check_that) and
//! friends, which wrap these calls.

use std::fmt::{self, Debug};
use thiserror::Error;

use super::matcher::{Description, Matcher};

/// A matcher assertion that did not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Check `actual` against `matcher`
///
/// The error message reads
///
/// ```text
/// <reason>
/// Expected: <matcher description>
///      but: <mismatch description>
/// ```
pub fn check_that<T, M>(reason: &str, actual: &T, matcher: &M) -> Result<(), AssertionError>
where
    T: ?Sized + Debug,
    M: Matcher<T> + ?Sized,
{
    if matcher.matches(actual) {
        return Ok(());
    }

    let mut description = Description::new();
    description
        .append_text(reason)
        .append_text("\nExpected: ")
        .append_description_of(matcher)
        .append_text("\n     but: ");
    matcher.describe_mismatch(actual, &mut description);

    Err(AssertionError::new(description.to_string()))
}

/// Like [`check_that`], but panics on mismatch
#[track_caller]
pub fn assert_that<T, M>(reason: &str, actual: &T, matcher: &M)
where
    T: ?Sized + Debug,
    M: Matcher<T> + ?Sized,
{
    if let Err(e) = check_that(reason, actual, matcher) {
        panic!("{e}");
    }
}

/// Check a plain condition
pub fn check(reason: &str, condition: bool) -> Result<(), AssertionError> {
    if condition {
        Ok(())
    } else {
        Err(AssertionError::new(reason))
    }
}

/// Text form of an actual value, as shown in reports
///
/// Strings render without quotes so that JSON and XML bodies can be
/// pretty-printed; other values render through `Debug`.
pub trait ReportValue {
    fn report_string(&self) -> String;
}

impl ReportValue for str {
    fn report_string(&self) -> String {
        self.to_string()
    }
}

impl ReportValue for String {
    fn report_string(&self) -> String {
        self.clone()
    }
}

impl ReportValue for serde_json::Value {
    fn report_string(&self) -> String {
        self.to_string()
    }
}

impl<T: ReportValue + ?Sized> ReportValue for &T {
    fn report_string(&self) -> String {
        (**self).report_string()
    }
}

impl<T: Debug> ReportValue for Option<T> {
    fn report_string(&self) -> String {
        match self {
            Some(v) => format!("{v:?}"),
            None => "null".to_string(),
        }
    }
}

impl<T: Debug> ReportValue for Vec<T> {
    fn report_string(&self) -> String {
        format!("{self:?}")
    }
}

macro_rules! report_value_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ReportValue for $ty {
                fn report_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

report_value_via_display!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

/// The shapes an assertion call can take
///
/// Only the three-argument matcher form is reported; the others pass
/// through untouched.
pub enum AssertionCall<'a, T: ?Sized + Debug, M: ?Sized> {
    /// `reason, actual, matcher`
    Matcher {
        reason: &'a str,
        actual: &'a T,
        matcher: &'a M,
    },
    /// `reason, condition`
    Condition { reason: &'a str, condition: bool },
}

impl<T: ?Sized + Debug, M: ?Sized> AssertionCall<'_, T, M> {
    /// Number of arguments the call was made with
    pub fn arity(&self) -> usize {
        match self {
            AssertionCall::Matcher { .. } => 3,
            AssertionCall::Condition { .. } => 2,
        }
    }
}

impl<T: ?Sized + Debug, M: ?Sized> fmt::Debug for AssertionCall<'_, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionCall::Matcher { reason, actual, .. } => f
                .debug_struct("Matcher")
                .field("reason", reason)
                .field("actual", actual)
                .finish_non_exhaustive(),
            AssertionCall::Condition { reason, condition } => f
                .debug_struct("Condition")
                .field("reason", reason)
                .field("condition", condition)
                .finish(),
        }
    }
}
