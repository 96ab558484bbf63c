//! Report lifecycle
//!
//! Owns in-progress test cases and steps and hands finished results to a
//! [`ResultsWriter`].
//!
//! Context is tracked per thread: each thread has a stack whose bottom frame
//! is a test case and whose upper frames are open steps. A thread "has a
//! current test case" when its stack is non-empty. Steps and attachments
//! always land on the innermost open frame of the calling thread.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pingstep::report::{InMemoryResultsWriter, ReportLifecycle, Status};
//!
//! let writer = Arc::new(InMemoryResultsWriter::new());
//! let lifecycle = ReportLifecycle::new(writer.clone());
//!
//! lifecycle
//!     .test_case("smoke", || lifecycle.step("[GET] /ping", || Ok::<_, std::io::Error>(())))
//!     .unwrap();
//!
//! let result = writer.last_result().unwrap();
//! assert_eq!(result.status, Some(Status::Passed));
//! assert_eq!(result.steps[0].name, "[GET] /ping");
//! ```

use futures::FutureExt;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, warn};
use uuid::Uuid;

use super::assert::AssertionError;
use super::model::{Attachment, Label, Stage, Status, StatusDetails, StepResult, TestResult};
use super::writer::ResultsWriter;

/// Maps an error to the report status it produces
///
/// Assertion failures are `failed`; anything else that goes wrong is
/// `broken`.
pub trait ReportStatus {
    fn report_status(&self) -> Status {
        Status::Broken
    }
}

impl ReportStatus for AssertionError {
    fn report_status(&self) -> Status {
        Status::Failed
    }
}

impl ReportStatus for anyhow::Error {
    fn report_status(&self) -> Status {
        if self.chain().any(|cause| cause.is::<AssertionError>()) {
            Status::Failed
        } else {
            Status::Broken
        }
    }
}

impl ReportStatus for Box<dyn std::error::Error + Send + Sync> {
    fn report_status(&self) -> Status {
        let mut cause: Option<&(dyn std::error::Error + 'static)> = Some(self.as_ref());
        while let Some(err) = cause {
            if err.is::<AssertionError>() {
                return Status::Failed;
            }
            cause = err.source();
        }
        Status::Broken
    }
}

impl ReportStatus for std::io::Error {}

/// Open frame on a thread's context stack
#[derive(Debug)]
enum Frame {
    TestCase(TestResult),
    Step(StepResult),
}

impl Frame {
    fn attachments_mut(&mut self) -> &mut Vec<Attachment> {
        match self {
            Frame::TestCase(t) => &mut t.attachments,
            Frame::Step(s) => &mut s.attachments,
        }
    }

    fn steps_mut(&mut self) -> &mut Vec<StepResult> {
        match self {
            Frame::TestCase(t) => &mut t.steps,
            Frame::Step(s) => &mut s.steps,
        }
    }
}

/// Current time in epoch milliseconds
fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Finish a step and move it into its parent frame
fn close_step(mut step: StepResult, parent: Option<&mut Frame>, fallback: Status) {
    if step.status.is_none() {
        step.status = Some(fallback);
    }
    step.stage = Stage::Finished;
    step.stop = now_millis();

    debug!(step = %step.name, status = ?step.status, "Step stopped");

    if let Some(parent) = parent {
        parent.steps_mut().push(step);
    }
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Test report lifecycle
pub struct ReportLifecycle {
    writer: Arc<dyn ResultsWriter>,
    contexts: Mutex<HashMap<ThreadId, Vec<Frame>>>,
}

impl fmt::Debug for ReportLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportLifecycle")
            .field("open_threads", &self.contexts.lock().len())
            .finish()
    }
}

impl ReportLifecycle {
    /// Create a lifecycle that writes through the given writer
    pub fn new(writer: Arc<dyn ResultsWriter>) -> Self {
        Self {
            writer,
            contexts: Mutex::new(HashMap::new()),
        }
    }

    fn with_stack<T>(&self, f: impl FnOnce(&mut Vec<Frame>) -> T) -> T {
        let mut contexts = self.contexts.lock();
        let id = thread::current().id();
        let stack = contexts.entry(id).or_default();
        let out = f(stack);
        if stack.is_empty() {
            contexts.remove(&id);
        }
        out
    }

    /// Whether the calling thread has an open test case
    pub fn has_current_test_case(&self) -> bool {
        self.current_test_case().is_some()
    }

    /// UUID of the calling thread's innermost open test case
    pub fn current_test_case(&self) -> Option<Uuid> {
        self.with_stack(|stack| {
            stack.iter().rev().find_map(|frame| match frame {
                Frame::TestCase(t) => Some(t.uuid),
                Frame::Step(_) => None,
            })
        })
    }

    /// Open a test case on the calling thread
    pub fn start_test_case(&self, name: impl Into<String>, full_name: impl Into<String>) -> Uuid {
        let mut result = TestResult::new(name, full_name);
        result.start = now_millis();
        let uuid = result.uuid;

        debug!(test_case = %result.name, %uuid, "Test case started");
        self.with_stack(|stack| stack.push(Frame::TestCase(result)));
        uuid
    }

    /// Attach a label to the current test case
    pub fn add_label(&self, name: impl Into<String>, value: impl Into<String>) {
        let label = Label {
            name: name.into(),
            value: value.into(),
        };
        self.with_stack(|stack| {
            if let Some(Frame::TestCase(t)) = stack
                .iter_mut()
                .rev()
                .find(|f| matches!(f, Frame::TestCase(_)))
            {
                t.labels.push(label);
            }
        });
    }

    /// Close the calling thread's innermost test case and write it
    ///
    /// Steps still open above the test case are closed as `broken`.
    pub fn stop_test_case(
        &self,
        status: Status,
        details: Option<StatusDetails>,
    ) -> Option<TestResult> {
        let result = self.with_stack(|stack| {
            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Step(step) => {
                        warn!(step = %step.name, "Step left open at end of test case");
                        close_step(step, stack.last_mut(), Status::Broken);
                    }
                    Frame::TestCase(result) => return Some(result),
                }
            }
            None
        });

        let Some(mut result) = result else {
            warn!("stop_test_case called without an open test case");
            return None;
        };

        result.status = Some(status);
        result.status_details = details;
        result.stage = Stage::Finished;
        result.stop = now_millis();

        debug!(test_case = %result.name, %status, "Test case stopped");

        if let Err(e) = self.writer.write_result(&result) {
            warn!(error = %e, test_case = %result.name, "Failed to write test result");
        }
        Some(result)
    }

    /// Open a step on the calling thread
    ///
    /// Returns `false` (and records nothing) when there is no current test case.
    pub fn start_step(&self, mut step: StepResult) -> bool {
        if !self.has_current_test_case() {
            debug!(step = %step.name, "No current test case, step not recorded");
            return false;
        }

        step.start = now_millis();
        step.stage = Stage::Running;
        debug!(step = %step.name, "Step started");
        self.with_stack(|stack| stack.push(Frame::Step(step)));
        true
    }

    /// Modify the innermost open step
    pub fn update_step(&self, f: impl FnOnce(&mut StepResult)) {
        self.with_stack(|stack| match stack.last_mut() {
            Some(Frame::Step(step)) => f(step),
            _ => debug!("update_step called without an open step"),
        });
    }

    /// Close the innermost open step and move it into its parent
    pub fn stop_step(&self) -> bool {
        self.with_stack(|stack| match stack.pop() {
            Some(Frame::Step(step)) => {
                close_step(step, stack.last_mut(), Status::Passed);
                true
            }
            Some(frame) => {
                stack.push(frame);
                debug!("stop_step called without an open step");
                false
            }
            None => false,
        })
    }

    /// Write attachment content and link it on the innermost open frame
    ///
    /// Returns `None` when there is no current test case.
    pub fn add_attachment(
        &self,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        extension: &str,
        content: &[u8],
    ) -> Option<Attachment> {
        if !self.has_current_test_case() {
            return None;
        }

        let attachment = Attachment {
            name: name.into(),
            source: format!("{}-attachment.{extension}", Uuid::new_v4()),
            mime_type: mime_type.into(),
        };

        if let Err(e) = self.writer.write_attachment(&attachment.source, content) {
            warn!(error = %e, attachment = %attachment.name, "Failed to write attachment");
        }

        self.with_stack(|stack| {
            if let Some(frame) = stack.last_mut() {
                frame.attachments_mut().push(attachment.clone());
            }
        });
        Some(attachment)
    }

    /// Run `f` as a test case
    ///
    /// The test case is `passed` on `Ok`, mapped through [`ReportStatus`] on
    /// `Err`, and `failed` on panic. The panic is re-raised.
    pub fn test_case<R, E>(
        &self,
        name: impl Into<String>,
        f: impl FnOnce() -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: ReportStatus + fmt::Display,
    {
        let name = name.into();
        self.start_test_case(name.clone(), name);

        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => {
                self.finish_test_case(&result);
                result
            }
            Err(payload) => {
                self.stop_test_case(
                    Status::Failed,
                    Some(StatusDetails::message(panic_message(payload.as_ref()))),
                );
                panic::resume_unwind(payload)
            }
        }
    }

    /// Async variant of [`test_case`](Self::test_case)
    ///
    /// The future must be polled on the thread that called this method.
    pub async fn test_case_async<R, E, F>(&self, name: impl Into<String>, fut: F) -> Result<R, E>
    where
        E: ReportStatus + fmt::Display,
        F: Future<Output = Result<R, E>>,
    {
        let name = name.into();
        self.start_test_case(name.clone(), name);

        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(result) => {
                self.finish_test_case(&result);
                result
            }
            Err(payload) => {
                self.stop_test_case(
                    Status::Failed,
                    Some(StatusDetails::message(panic_message(payload.as_ref()))),
                );
                panic::resume_unwind(payload)
            }
        }
    }

    fn finish_test_case<R, E>(&self, result: &Result<R, E>)
    where
        E: ReportStatus + fmt::Display,
    {
        match result {
            Ok(_) => self.stop_test_case(Status::Passed, None),
            Err(e) => {
                self.stop_test_case(e.report_status(), Some(StatusDetails::message(e.to_string())))
            }
        };
    }

    /// Run `f` as a step of the current test case
    ///
    /// Without a current test case `f` runs unreported.
    pub fn step<R, E>(&self, name: impl Into<String>, f: impl FnOnce() -> Result<R, E>) -> Result<R, E>
    where
        E: ReportStatus + fmt::Display,
    {
        if !self.start_step(StepResult::new(name)) {
            return f();
        }

        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => {
                self.finish_step(&result);
                result
            }
            Err(payload) => {
                self.fail_step_on_panic(payload.as_ref());
                panic::resume_unwind(payload)
            }
        }
    }

    /// Async variant of [`step`](Self::step)
    pub async fn step_async<R, E, F>(&self, name: impl Into<String>, fut: F) -> Result<R, E>
    where
        E: ReportStatus + fmt::Display,
        F: Future<Output = Result<R, E>>,
    {
        if !self.start_step(StepResult::new(name)) {
            return fut.await;
        }

        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(result) => {
                self.finish_step(&result);
                result
            }
            Err(payload) => {
                self.fail_step_on_panic(payload.as_ref());
                panic::resume_unwind(payload)
            }
        }
    }

    fn finish_step<R, E>(&self, result: &Result<R, E>)
    where
        E: ReportStatus + fmt::Display,
    {
        match result {
            Ok(_) => self.update_step(|s| {
                s.set_status(Status::Passed);
            }),
            Err(e) => {
                let status = e.report_status();
                let message = e.to_string();
                self.update_step(|s| {
                    s.set_status(status)
                        .set_status_details(StatusDetails::message(message));
                });
            }
        }
        self.stop_step();
    }

    pub(crate) fn fail_step_on_panic(&self, payload: &(dyn Any + Send)) {
        let message = panic_message(payload);
        self.update_step(|s| {
            s.set_status(Status::Broken)
                .set_status_details(StatusDetails::message(message));
        });
        self.stop_step();
    }
}
