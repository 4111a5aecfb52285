//! Error types and exit codes for notebundle.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTES_DIR_NOT_FOUND: i32 = 2;
    pub const ATTACHMENTS_DIR_NOT_FOUND: i32 = 3;
    pub const INVALID_CONFIG: i32 = 4;
    pub const NOTES_FAILED: i32 = 5;
}

/// Main error type for notebundle operations.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Notes directory not found: {0}")]
    NotesDirNotFound(PathBuf),

    #[error("Attachments directory not found: {0}")]
    AttachmentsDirNotFound(PathBuf),

    #[error("Invalid frontmatter in {path}: {message}")]
    InvalidFrontmatter { path: PathBuf, message: String },

    #[error("Attachment reference escapes the attachments directory: {0}")]
    UnsafeAttachment(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("{count} note(s) failed to convert")]
    NotesFailed { count: usize },
}

impl BundleError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BundleError::NotesDirNotFound(_) => exit_code::NOTES_DIR_NOT_FOUND,
            BundleError::AttachmentsDirNotFound(_) => exit_code::ATTACHMENTS_DIR_NOT_FOUND,
            BundleError::ConfigError(_) | BundleError::TomlParse(_) => exit_code::INVALID_CONFIG,
            BundleError::NotesFailed { .. } => exit_code::NOTES_FAILED,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

/// Result type alias for notebundle operations.
pub type Result<T> = std::result::Result<T, BundleError>;
