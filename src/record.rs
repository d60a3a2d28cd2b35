use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw markup record as consumed by the deduplicator and the annotator
///
/// Only `html` survives; other fields of the source line are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub html: String,
}

/// One `(element markup, selector)` pair of the final dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    /// Outer markup of a single element
    pub html: String,

    /// Selector matching that element within its originating document
    pub selector: String,
}

/// Outcome of reading one non-blank input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineRecord {
    /// JSON object with a string `html` field
    Markup(RawRecord),
    /// Parsed JSON lacking a string `html` field
    MissingHtml(Value),
    /// Not JSON at all
    Malformed(String),
}

impl RawRecord {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Classify a trimmed input line
    pub fn classify(line: &str) -> LineRecord {
        match crate::jsonl::parse_value(line) {
            Ok(value) => match value.get("html").and_then(Value::as_str) {
                Some(html) => LineRecord::Markup(RawRecord::new(html)),
                None => LineRecord::MissingHtml(value),
            },
            Err(e) => LineRecord::Malformed(e.to_string()),
        }
    }
}

impl AnnotatedRecord {
    pub fn new(html: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            selector: selector.into(),
        }
    }

    /// Whether a parsed line has string `html` and `selector` fields
    pub fn is_eligible(value: &Value) -> bool {
        value.get("html").is_some_and(Value::is_string)
            && value.get("selector").is_some_and(Value::is_string)
    }
}
