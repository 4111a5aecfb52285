//! Note representation.

use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::parser::parse_note_content;
use crate::types::Properties;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_yaml::Value;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub const TITLE_KEY: &str = "title";
pub const DATE_KEY: &str = "date";

/// A note read from the vault. Only ever mutated in memory.
#[derive(Debug, Clone)]
pub struct Note {
    /// Source path of the note.
    pub path: PathBuf,

    /// Raw content as read from disk.
    pub raw: String,

    /// Frontmatter properties, in source order.
    pub properties: Properties,

    /// Content after the frontmatter block.
    pub body: String,
}

impl Note {
    /// Split raw content into properties and body.
    pub fn parse(path: impl Into<PathBuf>, raw: impl Into<String>, sink: &dyn DiagnosticSink) -> Self {
        let path = path.into();
        let raw = raw.into();
        let (properties, body) = parse_note_content(&raw, &path, sink);
        Self {
            path,
            raw,
            properties,
            body,
        }
    }

    /// Load and parse a note from disk.
    pub fn load(path: &Path, sink: &dyn DiagnosticSink) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::parse(path, raw, sink))
    }

    /// The note name (filename without .md extension).
    pub fn name(&self) -> Cow<'_, str> {
        note_name(&self.path)
    }

    /// Fill in `title` (from the note name) and `date` (from `now`) when
    /// they are missing, null or empty.
    pub fn ensure_defaults(&mut self, now: DateTime<FixedOffset>, sink: &dyn DiagnosticSink) {
        if is_blank(self.properties.get(TITLE_KEY)) {
            let title = self.name().to_string();
            sink.debug(&format!("No 'title' property. Using '{}'", title));
            self.properties
                .insert(Value::String(TITLE_KEY.to_string()), Value::String(title));
        }

        if is_blank(self.properties.get(DATE_KEY)) {
            let date = now.to_rfc3339_opts(SecondsFormat::Secs, false);
            sink.debug(&format!("No 'date' property. Using '{}'", date));
            self.properties
                .insert(Value::String(DATE_KEY.to_string()), Value::String(date));
        }
    }
}

/// File stem of a note path. Names that are not valid UTF-8 are converted
/// lossily, so the bundle directory and the duplicate check agree.
pub fn note_name(path: &Path) -> Cow<'_, str> {
    path.file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or(Cow::Borrowed(""))
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
