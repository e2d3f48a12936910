//! Rendering helpers shared by pipeline reports.
//!
//! Reports stay bounded and readable in text mode while still carrying the
//! full record lists in JSON mode.

use crate::core::error;

/// Output style for a pipeline report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn parse(value: &str) -> Result<Self, error::CardshiftError> {
        match value {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(error::CardshiftError::Config(format!(
                "unknown format {other:?}; expected 'text' or 'json'"
            ))),
        }
    }
}

/// Normalize `text` onto one line and cut it at `max_chars`.
///
/// Whitespace runs collapse to single spaces; a cut is marked with a
/// trailing `...`.
pub fn condense(text: &str, max_chars: usize) -> String {
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if let Some((at, _)) = line.char_indices().nth(max_chars) {
        line.truncate(at);
        line.push_str("...");
    }
    line
}

/// The first `shown` entries on one line, with a count for the rest.
pub fn sample(items: &[String], shown: usize, max_chars: usize) -> String {
    let mut parts: Vec<String> = items
        .iter()
        .take(shown)
        .map(|item| condense(item, max_chars))
        .collect();
    if items.len() > shown {
        parts.push(format!("(+{} more)", items.len() - shown));
    }
    parts.join(" | ")
}
