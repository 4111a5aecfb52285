//! CLI argument definitions using clap.

use crate::config::ConvertConfig;
use crate::diagnostics::Severity;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notebundle")]
#[command(author, version, about = "Convert Obsidian notes into Hugo page bundles", long_about = None)]
pub struct Cli {
    /// Directory containing the notes (.md files)
    #[arg(long)]
    pub notes_dir: Option<PathBuf>,

    /// Directory containing all attachments (images, PDFs, ...)
    #[arg(long)]
    pub attachments_dir: Option<PathBuf>,

    /// Output directory for the bundles (e.g. <site>/content/posts)
    #[arg(long, visible_alias = "posts-dir")]
    pub hugo_posts_dir: Option<PathBuf>,

    /// Only notes carrying this tag are converted [default: blog]
    #[arg(long)]
    pub filter_tag: Option<String>,

    /// Remove the filter tag from the emitted tag list
    #[arg(long)]
    pub remove_filter_tag: bool,

    /// Directory names under the notes directory to skip
    #[arg(long, num_args = 1..)]
    pub exclude_dirs: Vec<String>,

    /// Minimum diagnostic level [default: info]
    #[arg(long, value_enum, ignore_case = true)]
    pub log_level: Option<Severity>,

    /// Config file (TOML). Defaults to <config dir>/notebundle/config.toml if present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON (default)
    #[arg(long, conflicts_with = "yaml")]
    pub json: bool,

    /// Print the run report as YAML
    #[arg(long, conflicts_with = "json")]
    pub yaml: bool,

    /// Do not print the run report
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with a non-zero code when any note fails to convert
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else {
            OutputFormat::Json
        }
    }

    /// Overlay command-line flags onto a loaded config.
    pub fn apply(&self, mut config: ConvertConfig) -> ConvertConfig {
        if let Some(ref dir) = self.notes_dir {
            config.notes_dir = Some(dir.clone());
        }
        if let Some(ref dir) = self.attachments_dir {
            config.attachments_dir = Some(dir.clone());
        }
        if let Some(ref dir) = self.hugo_posts_dir {
            config.posts_dir = Some(dir.clone());
        }
        if let Some(ref tag) = self.filter_tag {
            config.filter_tag = tag.clone();
        }
        if self.remove_filter_tag {
            config.remove_filter_tag = true;
        }
        if !self.exclude_dirs.is_empty() {
            config.exclude_dirs = self.exclude_dirs.clone();
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}
