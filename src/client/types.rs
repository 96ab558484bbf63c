//! Client response types

use serde::{Deserialize, Serialize};

/// A fully read HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// `content-type` header, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Text form used for report attachments
    pub fn describe(&self) -> String {
        let mut out = format!("HTTP {}", self.status);
        if let Some(content_type) = &self.content_type {
            out.push_str(&format!("\ncontent-type: {content_type}"));
        }
        out.push_str("\n\n");
        out.push_str(&self.body);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let mut response = HttpResponse {
            status: 200,
            content_type: None,
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 404;
        assert!(!response.is_success());
    }

    #[test]
    fn test_describe() {
        let response = HttpResponse {
            status: 200,
            content_type: Some("text/plain; charset=utf-8".into()),
            body: "pong".into(),
        };
        assert_eq!(
            response.describe(),
            "HTTP 200\ncontent-type: text/plain; charset=utf-8\n\npong"
        );
    }
}
