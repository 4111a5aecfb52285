//! Conversion configuration.
//!
//! Values come from an optional TOML file and are overridden field by field
//! by command-line flags.

use crate::bundle::DEFAULT_INDEX_NAME;
use crate::diagnostics::Severity;
use crate::error::{BundleError, Result};
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default selection tag.
pub const DEFAULT_FILTER_TAG: &str = "blog";

/// Config file name inside the platform config directory.
pub const CONFIG_FILE: &str = "notebundle/config.toml";

/// Everything a conversion run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Root of the note vault.
    pub notes_dir: Option<PathBuf>,
    /// Directory holding attachments, addressed by name from embeds.
    pub attachments_dir: Option<PathBuf>,
    /// Output directory for bundles; created if absent.
    pub posts_dir: Option<PathBuf>,
    /// Tag a note must carry to be converted.
    pub filter_tag: String,
    /// Remove the selection tag from emitted tag lists.
    pub remove_filter_tag: bool,
    /// Directory names under `notes_dir` to skip.
    pub exclude_dirs: Vec<String>,
    /// Minimum diagnostic severity.
    pub log_level: Severity,
    /// File name of the rendered document inside each bundle.
    pub index_name: String,
    /// Fixed UTC offset (hours) for defaulted dates. Local time when unset.
    pub date_offset_hours: Option<i32>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            notes_dir: None,
            attachments_dir: None,
            posts_dir: None,
            filter_tag: DEFAULT_FILTER_TAG.to_string(),
            remove_filter_tag: false,
            exclude_dirs: Vec::new(),
            log_level: Severity::Info,
            index_name: DEFAULT_INDEX_NAME.to_string(),
            date_offset_hours: None,
        }
    }
}

impl ConvertConfig {
    /// Load config from an explicit file, or from the default location if it exists.
    ///
    /// A missing default file yields the default config; a missing explicit
    /// file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_FILE))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BundleError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the required settings and the fatal preconditions.
    ///
    /// The notes and attachments directories must exist; the posts directory
    /// only needs to be set.
    pub fn validate(&self) -> Result<ValidatedPaths> {
        let notes_dir = require(&self.notes_dir, "notes_dir")?;
        let attachments_dir = require(&self.attachments_dir, "attachments_dir")?;
        let posts_dir = require(&self.posts_dir, "posts_dir")?;

        if self.filter_tag.trim().is_empty() {
            return Err(BundleError::ConfigError("filter_tag must not be empty".into()));
        }
        if self.index_name.trim().is_empty() || self.index_name.contains(['/', '\\']) {
            return Err(BundleError::ConfigError(format!(
                "invalid index_name: '{}'",
                self.index_name
            )));
        }
        if let Some(hours) = self.date_offset_hours {
            if FixedOffset::east_opt(hours * 3600).is_none() {
                return Err(BundleError::ConfigError(format!(
                    "date_offset_hours out of range: {}",
                    hours
                )));
            }
        }

        if !notes_dir.is_dir() {
            return Err(BundleError::NotesDirNotFound(notes_dir));
        }
        if !attachments_dir.is_dir() {
            return Err(BundleError::AttachmentsDirNotFound(attachments_dir));
        }

        Ok(ValidatedPaths {
            notes_dir,
            attachments_dir,
            posts_dir,
        })
    }

    /// Current time for defaulted `date` properties.
    pub fn now(&self) -> DateTime<FixedOffset> {
        match self.date_offset_hours.and_then(|h| FixedOffset::east_opt(h * 3600)) {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

/// Directory settings that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPaths {
    pub notes_dir: PathBuf,
    pub attachments_dir: PathBuf,
    pub posts_dir: PathBuf,
}

fn require(value: &Option<PathBuf>, name: &str) -> Result<PathBuf> {
    value
        .clone()
        .ok_or_else(|| BundleError::ConfigError(format!("{} is required", name)))
}
