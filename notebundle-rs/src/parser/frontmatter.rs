//! YAML frontmatter parsing and serialization.

use crate::diagnostics::DiagnosticSink;
use crate::error::{BundleError, Result};
use crate::types::Properties;
use regex::Regex;
use serde_yaml::Value;
use std::path::Path;
use std::sync::LazyLock;

/// Line consisting solely of the frontmatter delimiter.
pub const DELIMITER: &str = "---";

// (?m) so ^/$ work per line, (?s) so the captured region may span lines.
// The lazy group stops at the first closing delimiter line.
static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)\A---[ \t]*\r?$(.*?)^---[ \t]*\r?$").unwrap()
});

/// Frontmatter extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML region between the delimiters.
    pub yaml: Option<&'a str>,
    /// Everything after the closing delimiter, leading blank lines removed.
    /// The whole input when there is no frontmatter block.
    pub body: &'a str,
}

/// Split content into the raw frontmatter region and the body.
pub fn split_frontmatter(content: &str) -> FrontmatterSplit<'_> {
    match FRONTMATTER.captures(content) {
        Some(cap) => {
            let whole = cap.get(0).unwrap();
            FrontmatterSplit {
                yaml: cap.get(1).map(|m| m.as_str()),
                body: trim_leading_blank_lines(&content[whole.end()..]),
            }
        }
        None => FrontmatterSplit {
            yaml: None,
            body: content,
        },
    }
}

/// Drop whitespace-only lines from the start of `text`.
///
/// Indentation of the first non-blank line is kept.
pub fn trim_leading_blank_lines(text: &str) -> &str {
    let Some(first) = text.find(|c: char| !c.is_whitespace()) else {
        return "";
    };
    match text[..first].rfind('\n') {
        Some(nl) => &text[nl + 1..],
        None => text,
    }
}

/// Parse the frontmatter block into a property mapping.
///
/// Returns `Ok(None)` when there is no block. An empty block yields an empty
/// mapping; a block that is not a YAML mapping is an error.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<Option<Properties>> {
    let Some(yaml) = split_frontmatter(content).yaml else {
        return Ok(None);
    };

    let invalid = |message: String| BundleError::InvalidFrontmatter {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;
    match value {
        Value::Null => Ok(Some(Properties::new())),
        Value::Mapping(map) => Ok(Some(map)),
        other => Err(invalid(format!(
            "expected a mapping, found {}",
            value_kind(&other)
        ))),
    }
}

/// Split a note into properties and body, reporting instead of failing.
///
/// A malformed block is treated as absent: the properties are empty and the
/// body is the entire original input.
pub fn parse_note_content(
    content: &str,
    path: &Path,
    sink: &dyn DiagnosticSink,
) -> (Properties, String) {
    match parse_frontmatter(content, path) {
        Ok(Some(properties)) => {
            let body = split_frontmatter(content).body;
            (properties, body.to_string())
        }
        Ok(None) => (Properties::new(), content.to_string()),
        Err(e) => {
            sink.warn(&format!("{}. Ignoring the frontmatter block.", e));
            (Properties::new(), content.to_string())
        }
    }
}

/// Serialize properties as a delimited frontmatter block, keys in insertion order.
pub fn serialize_frontmatter(properties: &Properties) -> Result<String> {
    if properties.is_empty() {
        return Ok(format!("{DELIMITER}\n{DELIMITER}\n"));
    }
    let yaml = serde_yaml::to_string(properties)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
