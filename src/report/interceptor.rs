//! Assertion reporting
//!
//! [`intercept`] wraps an assertion call. For the three-argument matcher
//! form, while the calling thread has a current test case, it opens a step
//! named after the reason (or the matcher), attaches the rendered
//! expectation, runs the call, and closes the step as passed or with the
//! error's [`ReportStatus`]. Anything else runs untouched.
//!
//! ```
//! use std::sync::Arc;
//! use pingstep::report::{InMemoryResultsWriter, ReportLifecycle, Status};
//! use pingstep::report::matcher::is;
//!
//! let writer = Arc::new(InMemoryResultsWriter::new());
//! let lifecycle = ReportLifecycle::new(writer.clone());
//!
//! lifecycle
//!     .test_case("smoke", || {
//!         lifecycle.check_that("API /ping returned correct data", &"pong".to_string(), &is("pong"))
//!     })
//!     .unwrap();
//!
//! let step = &writer.last_result().unwrap().steps[0];
//! assert_eq!(step.name, "API /ping returned correct data");
//! assert_eq!(step.status, Some(Status::Passed));
//! ```

use std::fmt::{Debug, Display};
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

use super::assert::{self, AssertionCall, AssertionError, ReportValue};
use super::attachment::MatcherAttachment;
use super::format::{describe_expectation, format_actual};
use super::lifecycle::{ReportLifecycle, ReportStatus};
use super::matcher::{Anything, Matcher, SelfDescribing, describe};
use super::model::{Status, StatusDetails, StepResult};

/// Description given to every assertion step
pub const STEP_DESCRIPTION: &str = "Matcher assertion";

/// Step name for an assertion: the reason, or a description of the matcher
pub fn step_name<S: SelfDescribing + ?Sized>(matcher: &S, reason: &str) -> String {
    if !reason.is_empty() {
        return reason.to_string();
    }
    format!("Assert that: {}", describe(matcher))
}

/// Run an assertion call, reporting it when it is reportable
///
/// The outcome of `f` is returned unchanged, panics included.
pub fn intercept<T, M, R, E, F>(
    lifecycle: &ReportLifecycle,
    call: &AssertionCall<'_, T, M>,
    f: F,
) -> Result<R, E>
where
    T: ?Sized + Debug + ReportValue,
    M: Matcher<T> + ?Sized,
    E: ReportStatus + Display,
    F: FnOnce() -> Result<R, E>,
{
    let AssertionCall::Matcher {
        reason,
        actual,
        matcher,
    } = call
    else {
        debug!(arity = call.arity(), "Assertion call not reportable, passing through");
        return f();
    };

    if !lifecycle.has_current_test_case() {
        return f();
    }

    let formatted = format_actual(&actual.report_string());
    let expecting = describe_expectation(*matcher, *actual);
    let name = step_name(*matcher, reason);

    lifecycle.start_step(StepResult::new(name).with_description(STEP_DESCRIPTION));

    let attachment = MatcherAttachment::new(*reason, formatted, expecting);
    lifecycle.add_attachment(
        attachment.name(),
        MatcherAttachment::MIME_TYPE,
        MatcherAttachment::EXTENSION,
        attachment.render().as_bytes(),
    );

    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => {
            if lifecycle.has_current_test_case() {
                lifecycle.update_step(|s| {
                    s.set_status(Status::Passed);
                });
                lifecycle.stop_step();
            }
            Ok(value)
        }
        Ok(Err(e)) => {
            if lifecycle.has_current_test_case() {
                let status = e.report_status();
                let message = e.to_string();
                lifecycle.update_step(|s| {
                    s.set_status(status)
                        .set_status_details(StatusDetails::message(message));
                });
                lifecycle.stop_step();
            }
            Err(e)
        }
        Err(payload) => {
            if lifecycle.has_current_test_case() {
                lifecycle.fail_step_on_panic(payload.as_ref());
            }
            panic::resume_unwind(payload)
        }
    }
}

impl ReportLifecycle {
    /// Reported [`assert::check_that`]
    ///
    /// An empty `reason` names the step after the matcher.
    pub fn check_that<T, M>(&self, reason: &str, actual: &T, matcher: &M) -> Result<(), AssertionError>
    where
        T: ?Sized + Debug + ReportValue,
        M: Matcher<T> + ?Sized,
    {
        let call = AssertionCall::Matcher {
            reason,
            actual,
            matcher,
        };
        intercept(self, &call, || assert::check_that(reason, actual, matcher))
    }

    /// Reported [`assert::assert_that`]: panics after the step is closed as failed
    #[track_caller]
    pub fn assert_that<T, M>(&self, reason: &str, actual: &T, matcher: &M)
    where
        T: ?Sized + Debug + ReportValue,
        M: Matcher<T> + ?Sized,
    {
        if let Err(e) = self.check_that(reason, actual, matcher) {
            panic!("{e}");
        }
    }

    /// Plain condition check; never reported
    pub fn check(&self, reason: &str, condition: bool) -> Result<(), AssertionError> {
        let call: AssertionCall<'_, bool, Anything> = AssertionCall::Condition { reason, condition };
        intercept(self, &call, || assert::check(reason, condition))
    }
}
