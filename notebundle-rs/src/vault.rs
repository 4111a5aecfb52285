//! Vault enumeration and excluded subtrees.

use crate::diagnostics::DiagnosticSink;
use crate::error::{BundleError, Result};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// A note vault rooted at a directory.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,

    /// Absolute paths of excluded subtrees.
    excluded: Vec<PathBuf>,
}

impl Vault {
    /// Open a vault. The root must be an existing directory.
    ///
    /// The root is stored canonicalized, so relative roots such as `.` or
    /// `./Notes` compare equal to the paths the walk yields.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(BundleError::NotesDirNotFound(root));
        }

        Ok(Self {
            root: absolute(&root),
            excluded: Vec::new(),
        })
    }

    /// Exclude directories, named relative to the vault root.
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded = names
            .into_iter()
            .map(|name| absolute(&self.root.join(name.as_ref())))
            .collect();
        self
    }

    pub fn excluded(&self) -> &[PathBuf] {
        &self.excluded
    }

    /// Whether a note lies in an excluded subtree.
    ///
    /// Membership is by path component, so excluding `Private` does not
    /// exclude `Private Notes`.
    pub fn is_excluded(&self, note: &Path) -> bool {
        let note = absolute(note);
        self.excluded.iter().any(|dir| note.starts_with(dir))
    }

    /// List all markdown files in the vault, sorted by path.
    ///
    /// Paths are returned joined onto the vault root. Hidden files and
    /// directories (`.obsidian`, `.trash`) are skipped.
    pub fn list_notes(&self, sink: &dyn DiagnosticSink) -> Result<Vec<PathBuf>> {
        // Escape the root so brackets or stars in directory names stay literal.
        let root = Pattern::escape(&self.root.to_string_lossy());
        let pattern = Path::new(&root).join("**/*.md");

        let mut notes = Vec::new();

        for entry in glob(&pattern.to_string_lossy())? {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    let Ok(relative) = path.strip_prefix(&self.root) else {
                        sink.warn(&format!(
                            "Skipping {}: not under the vault root {}",
                            path.display(),
                            self.root.display()
                        ));
                        continue;
                    };
                    if !relative
                        .components()
                        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
                    {
                        notes.push(path.clone());
                    }
                }
                Err(e) => {
                    sink.warn(&format!("Cannot read vault entry: {}", e));
                }
            }
        }

        notes.sort();

        Ok(notes)
    }

    /// Path relative to the vault root, for display.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Canonical path when it exists, otherwise the path made absolute.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
