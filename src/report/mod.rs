//! Test reporting
//!
//! Records matcher assertions as steps of a test report, in the Allure
//! results format.
//!
//! ## Pieces
//!
//! - [`matcher`] - hamcrest-style matchers with descriptions
//! - [`assert`] - `check_that` / `assert_that` over matchers
//! - [`ReportLifecycle`] - per-thread test case and step tracking
//! - [`intercept`] - wraps an assertion call and records it as a step
//! - [`ResultsWriter`] - where finished results go (directory or memory)

pub mod assert;
mod attachment;
pub mod format;
mod interceptor;
mod lifecycle;
pub mod matcher;
mod model;
mod writer;

pub use assert::{AssertionCall, AssertionError, ReportValue};
pub use attachment::MatcherAttachment;
pub use interceptor::{STEP_DESCRIPTION, intercept, step_name};
pub use lifecycle::{ReportLifecycle, ReportStatus};
pub use model::{
    Attachment, Label, Parameter, Stage, Status, StatusDetails, StepResult, TestResult,
};
pub use writer::{FileSystemResultsWriter, InMemoryResultsWriter, ResultsWriter, WriterError};
