//! Page bundle layout: `<posts>/<note name>/index.md` plus attachments.

use crate::error::Result;
use crate::parser::frontmatter::{serialize_frontmatter, trim_leading_blank_lines};
use crate::types::Properties;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the rendered document inside a bundle.
pub const DEFAULT_INDEX_NAME: &str = "index.md";

/// Render the final document: frontmatter block, blank line, body.
///
/// Leading blank lines of the body are dropped so that re-parsing the
/// document yields the same body.
pub fn render_document(properties: &Properties, body: &str) -> Result<String> {
    let frontmatter = serialize_frontmatter(properties)?;
    Ok(format!("{}\n{}", frontmatter, trim_leading_blank_lines(body)))
}

/// Writes bundles under a posts directory.
#[derive(Debug, Clone)]
pub struct BundleWriter {
    posts_dir: PathBuf,
    index_name: String,
}

impl BundleWriter {
    pub fn new(posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
        }
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = index_name.into();
        self
    }

    /// Bundle directory for a note name.
    pub fn bundle_dir(&self, name: &str) -> PathBuf {
        self.posts_dir.join(name)
    }

    /// Create the bundle directory if needed. Existing bundles are reused.
    pub fn prepare(&self, name: &str) -> Result<PathBuf> {
        let dir = self.bundle_dir(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Write (or overwrite) the bundle's index document.
    pub fn write_index(&self, bundle_dir: &Path, properties: &Properties, body: &str) -> Result<PathBuf> {
        let path = bundle_dir.join(&self.index_name);
        fs::write(&path, render_document(properties, body)?)?;
        Ok(path)
    }
}
