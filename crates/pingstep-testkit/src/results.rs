//! Temporary results directory
//!
//! Readers work on the raw JSON so tests see exactly what was written.

use serde_json::Value;
use std::io;
use std::path::Path;
use tempfile::TempDir;

const RESULT_SUFFIX: &str = "-result.json";

/// A results directory removed when dropped
#[derive(Debug)]
pub struct ResultsDir {
    dir: TempDir,
}

impl ResultsDir {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::Builder::new().prefix("results-").tempdir()?,
        })
    }

    /// Path to hand to a results writer
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Every `*-result.json` file, parsed, ordered by their `start` time
    pub fn results(&self) -> io::Result<Vec<Value>> {
        let mut results = Vec::new();
        for entry in std::fs::read_dir(self.path())? {
            let path = entry?.path();
            let is_result = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(RESULT_SUFFIX));
            if !is_result {
                continue;
            }

            let text = std::fs::read_to_string(&path)?;
            let value: Value = serde_json::from_str(&text).map_err(io::Error::other)?;
            results.push(value);
        }

        results.sort_by_key(|r| r["start"].as_i64().unwrap_or_default());
        Ok(results)
    }

    /// The result whose `name` matches
    pub fn result(&self, name: &str) -> io::Result<Option<Value>> {
        Ok(self
            .results()?
            .into_iter()
            .find(|r| r["name"].as_str() == Some(name)))
    }

    /// Attachment file content as text
    pub fn attachment_text(&self, source: &str) -> io::Result<String> {
        std::fs::read_to_string(self.path().join(source))
    }

    /// Names of every attachment file
    pub fn attachment_files(&self) -> io::Result<Vec<String>> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.contains("-attachment."))
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_result_files_only() {
        let dir = ResultsDir::new().unwrap();
        std::fs::write(
            dir.path().join("b-result.json"),
            r#"{"name":"second","start":20}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a-result.json"),
            r#"{"name":"first","start":10}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("c-attachment.html"), "<html/>").unwrap();

        let results = dir.results().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["name"], "first");
        assert_eq!(results[1]["name"], "second");

        assert!(dir.result("second").unwrap().is_some());
        assert!(dir.result("third").unwrap().is_none());

        assert_eq!(dir.attachment_files().unwrap(), vec!["c-attachment.html"]);
        assert_eq!(dir.attachment_text("c-attachment.html").unwrap(), "<html/>");
    }

    #[test]
    fn test_empty_dir() {
        let dir = ResultsDir::new().unwrap();
        assert!(dir.results().unwrap().is_empty());
        assert!(dir.attachment_files().unwrap().is_empty());
    }

    #[test]
    fn test_removed_on_drop() {
        let dir = ResultsDir::new().unwrap();
        let path = dir.path().to_path_buf();
        assert!(path.exists());
        drop(dir);
        assert!(!path.exists());
    }
}
