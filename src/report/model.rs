//! Report result types
//!
//! Serialized in the Allure results format (camelCase JSON), so a results
//! directory written by pingstep can be fed to any Allure report generator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a test case or step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Completed without errors
    #[default]
    Passed,
    /// An assertion did not hold
    Failed,
    /// Something other than an assertion went wrong
    Broken,
    /// Not executed
    Skipped,
}

impl Status {
    /// Whether this status counts as success
    pub fn is_passed(&self) -> bool {
        matches!(self, Status::Passed)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Passed => write!(f, "passed"),
            Status::Failed => write!(f, "failed"),
            Status::Broken => write!(f, "broken"),
            Status::Skipped => write!(f, "skipped"),
        }
    }
}

/// Execution stage of a test case or step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Running,
    Finished,
}

/// Extra information about a non-passing status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl StatusDetails {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            trace: None,
        }
    }
}

/// Link from a step or test case to a file in the results directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// File name relative to the results directory
    pub source: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Name/value pair shown next to a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// Test case label (suite, severity, feature, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

/// A named, timed unit of work inside a test case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` until the step is updated or stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<StatusDetails>,
    #[serde(default)]
    pub stage: Stage,
    /// Epoch milliseconds
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub stop: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl StepResult {
    /// Create a step with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the step description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    pub fn set_status(&mut self, status: Status) -> &mut Self {
        self.status = Some(status);
        self
    }

    /// Set the status details
    pub fn set_status_details(&mut self, details: StatusDetails) -> &mut Self {
        self.status_details = Some(details);
        self
    }

    /// Find a direct child step by name
    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.name == name)
    }
}

/// Result of a single test case, written as `<uuid>-result.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub uuid: Uuid,
    pub name: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<StatusDetails>,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub stop: i64,
    #[serde(default)]
    pub steps: Vec<StepResult>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl TestResult {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            full_name: full_name.into(),
            description: None,
            status: None,
            status_details: None,
            stage: Stage::Running,
            start: 0,
            stop: 0,
            steps: Vec::new(),
            attachments: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Find a top-level step by name
    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Passed.to_string(), "passed");
        assert_eq!(Status::Failed.to_string(), "failed");
        assert_eq!(Status::Broken.to_string(), "broken");
        assert_eq!(Status::Skipped.to_string(), "skipped");
    }

    #[test]
    fn test_step_serializes_camel_case() {
        let mut step = StepResult::new("check").with_description("Matcher assertion");
        step.set_status(Status::Failed)
            .set_status_details(StatusDetails::message("boom"));

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["name"], "check");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["statusDetails"]["message"], "boom");
        assert_eq!(json["stage"], "running");
        // Empty collections are omitted
        assert!(json.get("steps").is_none());
    }

    #[test]
    fn test_attachment_type_field() {
        let attachment = Attachment {
            name: "assertThat".to_string(),
            source: "x-attachment.html".to_string(),
            mime_type: "text/html".to_string(),
        };
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["type"], "text/html");
    }

    #[test]
    fn test_step_lookup_is_one_level() {
        let mut result = TestResult::new("t", "suite.t");
        let mut outer = StepResult::new("outer");
        outer.steps.push(StepResult::new("inner"));
        result.steps.push(outer);
        result.steps.push(StepResult::new("last"));

        assert!(result.step("last").is_some());
        assert!(result.step("inner").is_none());
        assert!(result.step("outer").unwrap().step("inner").is_some());
    }
}
