//! Tag normalization and selection-tag filtering.

use crate::diagnostics::DiagnosticSink;
use crate::types::Properties;
use serde_yaml::Value;

/// Frontmatter key holding the note's tags.
pub const TAGS_KEY: &str = "tags";

/// Normalize a `tags` property into an ordered list of strings.
///
/// - `"a, b"` splits on commas and trims each fragment (empty fragments dropped)
/// - a sequence is taken in order; non-string scalars are stringified
/// - absent or null is an empty list
pub fn normalize_tags(value: Option<&Value>, sink: &dyn DiagnosticSink) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| match scalar_to_string(item) {
                Some(tag) => Some(tag),
                None => {
                    sink.debug(&format!("Ignoring non-scalar tag entry: {:?}", item));
                    None
                }
            })
            .collect(),
        Some(other) => {
            if let Some(tag) = scalar_to_string(other) {
                vec![tag]
            } else {
                sink.debug("Ignoring 'tags' property that is neither a string nor a list");
                Vec::new()
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Gate on a selection tag and rewrite the tag list of selected notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    /// The tag a note must carry (exact, case-sensitive).
    pub tag: String,
    /// Drop the selection tag from the emitted tag list.
    pub remove: bool,
}

impl TagFilter {
    pub fn new(tag: impl Into<String>, remove: bool) -> Self {
        Self {
            tag: tag.into(),
            remove,
        }
    }

    pub fn matches(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| *t == self.tag)
    }

    /// Returns whether the note is selected.
    ///
    /// Unselected notes are left untouched. For selected notes the `tags`
    /// property is replaced with the normalized list, minus the selection tag
    /// when `remove` is set; an emptied list removes the key altogether.
    pub fn apply(&self, properties: &mut Properties, sink: &dyn DiagnosticSink) -> bool {
        let tags = normalize_tags(properties.get(TAGS_KEY), sink);
        if !self.matches(&tags) {
            return false;
        }

        let tags: Vec<String> = if self.remove {
            sink.debug(&format!("Removing tag '{}' from the tag list", self.tag));
            tags.into_iter().filter(|t| *t != self.tag).collect()
        } else {
            tags
        };

        if tags.is_empty() {
            properties.shift_remove(TAGS_KEY);
        } else {
            properties.insert(
                Value::String(TAGS_KEY.to_string()),
                Value::Sequence(tags.into_iter().map(Value::String).collect()),
            );
        }
        true
    }
}
