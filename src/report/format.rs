//! Rendering of actual values and expectations for report attachments

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use thiserror::Error;

use super::matcher::{Description, Matcher, SelfDescribing};

/// Why a value could not be pretty-printed
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("not a JSON object or array, nor an XML document")]
    Unrecognized,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML: {0}")]
    Xml(String),
}

/// Pretty-print `text` if it is JSON (object or array) or XML
pub fn format_json_or_xml(text: &str) -> Result<String, FormatError> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let value: serde_json::Value = serde_json::from_str(trimmed)?;
        return Ok(serde_json::to_string_pretty(&value)?);
    }
    if trimmed.starts_with('<') {
        return format_xml(trimmed);
    }
    Err(FormatError::Unrecognized)
}

fn format_xml(text: &str) -> Result<String, FormatError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| FormatError::Xml(e.to_string()))?;

        match &event {
            Event::Eof => break,
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(_) if depth == 0 => roots += 1,
            Event::Text(_) | Event::CData(_) if depth == 0 => {
                return Err(FormatError::Xml("text outside of the root element".into()));
            }
            _ => {}
        }

        writer
            .write_event(event)
            .map_err(|e| FormatError::Xml(e.to_string()))?;
    }

    if depth != 0 {
        return Err(FormatError::Xml("unclosed element".into()));
    }
    if roots != 1 {
        return Err(FormatError::Xml(format!("expected one root element, found {roots}")));
    }

    String::from_utf8(writer.into_inner()).map_err(|e| FormatError::Xml(e.to_string()))
}

/// Text shown as the "actual" value: pretty JSON/XML, or the raw text
pub fn format_actual(text: &str) -> String {
    format_json_or_xml(text).unwrap_or_else(|_| text.to_string())
}

/// Matcher description with `and`/`or` connectives moved to new lines
pub fn matcher_text<S: SelfDescribing + ?Sized>(matcher: &S) -> String {
    let mut description = Description::new();
    description.append_description_of(matcher);
    description
        .to_string()
        .trim()
        .replace(" and ", "\n and ")
        .replace(" or ", "\n or ")
}

/// Expectation block of the assertion attachment
///
/// Lists what the matcher expects, then either a "no mismatches" result or
/// the mismatch description for `actual`.
pub fn describe_expectation<T, M>(matcher: &M, actual: &T) -> String
where
    T: ?Sized + std::fmt::Debug,
    M: Matcher<T> + ?Sized,
{
    let mut description = Description::new();
    description
        .append_text("\n")
        .append_text("    Expecting:")
        .append_text("\n")
        .append_text(&matcher_text(matcher))
        .append_text("\n")
        .append_text("\n");

    if matcher.matches(actual) {
        description
            .append_text("    Result:")
            .append_text("\n")
            .append_text("No any mismatches found");
    } else {
        description.append_text("    But:").append_text("\n");
        matcher.describe_mismatch(actual, &mut description);
    }

    description.to_string()
}
