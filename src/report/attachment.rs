//! Assertion attachment
//!
//! Every reported assertion carries one HTML attachment showing the reason,
//! the actual value and the expectation block.

use serde::{Deserialize, Serialize};

/// Attachment data recorded for a single matcher assertion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherAttachment {
    pub reason: String,
    pub actual: String,
    pub expecting: String,
}

impl MatcherAttachment {
    pub const NAME: &'static str = "assertThat";
    pub const MIME_TYPE: &'static str = "text/html";
    pub const EXTENSION: &'static str = "html";

    pub fn new(
        reason: impl Into<String>,
        actual: impl Into<String>,
        expecting: impl Into<String>,
    ) -> Self {
        Self {
            reason: reason.into(),
            actual: actual.into(),
            expecting: expecting.into(),
        }
    }

    /// Attachment name shown in the report
    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Render as a standalone HTML page
    pub fn render(&self) -> String {
        let mut html = String::new();
        html.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<style>pre { white-space: pre-wrap; }</style>\n");
        html.push_str("</head>\n<body>\n");

        if !self.reason.is_empty() {
            html.push_str(&section("Reason", &self.reason));
        }
        html.push_str(&section("Actual", &self.actual));
        html.push_str(&section("Expected", &self.expecting));

        html.push_str("</body>\n</html>\n");
        html
    }
}

/// Heading plus preformatted, escaped content
fn section(title: &str, content: &str) -> String {
    format!("<h4>{title}</h4>\n<pre>{}</pre>\n", escape_html(content))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_escapes_content() {
        let attachment = MatcherAttachment::new("why", "<pong/>", "is \"pong\"");
        let html = attachment.render();

        assert_eq!(attachment.name(), "assertThat");
        assert!(html.contains("<pre>why</pre>"));
        assert!(html.contains("<pre>&lt;pong/&gt;</pre>"));
        assert!(html.contains("<pre>is &quot;pong&quot;</pre>"));
    }

    #[test]
    fn test_render_section_layout() {
        let html = MatcherAttachment::new("r", "pong", "is \"pong\"").render();
        assert!(html.contains(
            "<h4>Reason</h4>\n<pre>r</pre>\n<h4>Actual</h4>\n<pre>pong</pre>\n<h4>Expected</h4>\n"
        ));
        assert!(html.ends_with("</pre>\n</body>\n</html>\n"));
    }

    #[test]
    fn test_render_skips_empty_reason() {
        let html = MatcherAttachment::new("", "pong", "x").render();
        assert!(!html.contains("Reason"));
        assert!(html.contains("<h4>Actual</h4>"));
    }
}
