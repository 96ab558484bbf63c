//! Results writers
//!
//! The lifecycle hands finished test cases and attachment bytes to a
//! [`ResultsWriter`]. The file system writer produces a directory in the
//! Allure results layout; the in-memory writer is for tests.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use super::model::TestResult;

/// Errors raised while persisting results
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for finished test results and attachments
pub trait ResultsWriter: Send + Sync {
    /// Persist a finished test case
    fn write_result(&self, result: &TestResult) -> Result<(), WriterError>;

    /// Persist attachment content under the given file name
    fn write_attachment(&self, source: &str, content: &[u8]) -> Result<(), WriterError>;
}

/// Writes `<uuid>-result.json` and attachment files into a directory
#[derive(Debug, Clone)]
pub struct FileSystemResultsWriter {
    dir: PathBuf,
}

impl FileSystemResultsWriter {
    /// Create a writer for the given directory (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write_file(&self, name: &str, content: &[u8]) -> Result<(), WriterError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| WriterError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(name);
        std::fs::write(&path, content).map_err(|source| WriterError::Io { path, source })
    }
}

impl ResultsWriter for FileSystemResultsWriter {
    fn write_result(&self, result: &TestResult) -> Result<(), WriterError> {
        let json = serde_json::to_vec_pretty(result)?;
        self.write_file(&format!("{}-result.json", result.uuid), &json)
    }

    fn write_attachment(&self, source: &str, content: &[u8]) -> Result<(), WriterError> {
        self.write_file(source, content)
    }
}

/// Keeps results in memory
#[derive(Debug, Default)]
pub struct InMemoryResultsWriter {
    results: Mutex<Vec<TestResult>>,
    attachments: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryResultsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All results written so far, in order
    pub fn results(&self) -> Vec<TestResult> {
        self.results.lock().clone()
    }

    /// The most recently written result
    pub fn last_result(&self) -> Option<TestResult> {
        self.results.lock().last().cloned()
    }

    /// Attachment content by source file name
    pub fn attachment(&self, source: &str) -> Option<Vec<u8>> {
        self.attachments.lock().get(source).cloned()
    }

    /// Attachment content as UTF-8 text
    pub fn attachment_text(&self, source: &str) -> Option<String> {
        self.attachment(source)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl ResultsWriter for InMemoryResultsWriter {
    fn write_result(&self, result: &TestResult) -> Result<(), WriterError> {
        self.results.lock().push(result.clone());
        Ok(())
    }

    fn write_attachment(&self, source: &str, content: &[u8]) -> Result<(), WriterError> {
        self.attachments
            .lock()
            .insert(source.to_string(), content.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_system_writer_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("allure-results");
        let writer = FileSystemResultsWriter::new(&dir);

        let result = TestResult::new("smoke", "pingstep.smoke");
        writer.write_result(&result).unwrap();
        writer.write_attachment("a-attachment.txt", b"hello").unwrap();

        let result_path = dir.join(format!("{}-result.json", result.uuid));
        let parsed: TestResult =
            serde_json::from_str(&std::fs::read_to_string(result_path).unwrap()).unwrap();
        assert_eq!(parsed.name, "smoke");
        assert_eq!(
            std::fs::read_to_string(dir.join("a-attachment.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_in_memory_writer() {
        let writer = InMemoryResultsWriter::new();
        writer.write_result(&TestResult::new("a", "a")).unwrap();
        writer.write_result(&TestResult::new("b", "b")).unwrap();
        writer.write_attachment("x", b"data").unwrap();

        assert_eq!(writer.results().len(), 2);
        assert_eq!(writer.last_result().unwrap().name, "b");
        assert_eq!(writer.attachment_text("x").as_deref(), Some("data"));
        assert!(writer.attachment("missing").is_none());
    }
}
