//! Check trait and supporting types
//!
//! The `Check` trait defines the interface for all smoke checks. Each check
//! runs as one report test case and returns `Ok(())` when the service
//! behaved as expected.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::client::{ClientError, PingClient};
use crate::report::{AssertionError, ReportLifecycle, ReportStatus, Status};

/// Errors that can occur during check execution
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("{0}")]
    Assertion(#[from] AssertionError),

    #[error("Unknown check: {0}")]
    UnknownCheck(String),
}

impl ReportStatus for CheckError {
    fn report_status(&self) -> Status {
        match self {
            CheckError::Assertion(e) => e.report_status(),
            CheckError::Client(e) => e.report_status(),
            CheckError::UnknownCheck(_) => Status::Broken,
        }
    }
}

/// Overall result of a check execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check
    pub check_name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Report status of the check's test case
    pub status: Status,
    /// How long the check took
    pub duration: Duration,
    /// Failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a new check result
    pub fn new(check_name: impl Into<String>, status: Status, duration: Duration) -> Self {
        Self {
            check_name: check_name.into(),
            passed: status.is_passed(),
            status,
            duration,
            message: None,
        }
    }

    /// Add a summary message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Context provided to checks during execution
#[derive(Debug, Clone)]
pub struct CheckContext {
    /// Client for the service under test
    pub client: PingClient,
    /// Lifecycle receiving test cases, steps and attachments
    pub lifecycle: Arc<ReportLifecycle>,
}

impl CheckContext {
    /// Create a new check context
    pub fn new(client: PingClient, lifecycle: Arc<ReportLifecycle>) -> Self {
        Self { client, lifecycle }
    }
}

/// Trait for implementing smoke checks
///
/// Checks are registered in the `CHECKS` registry and can be invoked by name.
///
/// ## Example Implementation
///
/// ```ignore
/// use async_trait::async_trait;
/// use pingstep::checks::{Check, CheckContext, CheckError};
/// use pingstep::report::matcher::is;
///
/// pub struct MyCheck;
///
/// #[async_trait]
/// impl Check for MyCheck {
///     fn name(&self) -> &'static str { "mycheck" }
///     fn description(&self) -> &'static str { "Verifies something important" }
///
///     async fn run(&self, ctx: &CheckContext) -> Result<(), CheckError> {
///         let body = ctx.client.ping().await?;
///         ctx.lifecycle.check_that("pong back", &body, &is("pong"))?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Check: Send + Sync {
    /// Unique name for this check (used in CLI and config)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Run the check against the service
    async fn run(&self, ctx: &CheckContext) -> Result<(), CheckError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_passed_follows_status() {
        let result = CheckResult::new("ping", Status::Passed, Duration::from_millis(5));
        assert!(result.passed);

        let result = CheckResult::new("ping", Status::Broken, Duration::ZERO).with_message("down");
        assert!(!result.passed);
        assert_eq!(result.message.as_deref(), Some("down"));
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            CheckError::from(AssertionError::new("x")).report_status(),
            Status::Failed
        );
        assert_eq!(
            CheckError::UnknownCheck("pingpong".into()).report_status(),
            Status::Broken
        );
    }
}
