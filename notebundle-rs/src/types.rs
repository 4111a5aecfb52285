//! Core data types shared across the pipeline.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;

/// Ordered property mapping parsed from (and written back to) frontmatter.
pub type Properties = serde_yaml::Mapping;

/// An `![[name]]` token found in a note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRef {
    /// The literal matched text, e.g. `![[diagram.png|400]]`.
    pub text: String,
    /// The referenced attachment name, e.g. `diagram.png`.
    pub target: String,
    /// Byte range of the token in the body.
    pub span: Range<usize>,
}

/// A resolved embed: the token span and the text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub span: Range<usize>,
    pub original: String,
    pub replacement: String,
}

/// Why a note was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The note is under an excluded directory.
    Excluded,
    /// The note does not carry the selection tag.
    MissingTag,
}

/// Outcome of processing a single note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NoteOutcome {
    Written {
        source: PathBuf,
        index: PathBuf,
        attachments: Vec<String>,
        unresolved: Vec<String>,
    },
    Skipped {
        source: PathBuf,
        reason: SkipReason,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

/// A note that was written to a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenNote {
    pub source: PathBuf,
    pub index: PathBuf,
    pub attachments: Vec<String>,
}

/// A note that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedNote {
    pub source: PathBuf,
    pub error: String,
}

/// An embed that could not be resolved, per note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedAttachment {
    pub note: PathBuf,
    pub target: String,
}

/// Summary of a full conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub scanned: usize,
    pub written: Vec<WrittenNote>,
    pub skipped: Vec<PathBuf>,
    pub excluded: Vec<PathBuf>,
    pub failed: Vec<FailedNote>,
    pub unresolved_attachments: Vec<UnresolvedAttachment>,
}

impl RunReport {
    /// Fold a single note outcome into the report.
    pub fn record(&mut self, outcome: NoteOutcome) {
        self.scanned += 1;
        match outcome {
            NoteOutcome::Written {
                source,
                index,
                attachments,
                unresolved,
            } => {
                self.unresolved_attachments
                    .extend(unresolved.into_iter().map(|target| UnresolvedAttachment {
                        note: source.clone(),
                        target,
                    }));
                self.written.push(WrittenNote {
                    source,
                    index,
                    attachments,
                });
            }
            NoteOutcome::Skipped { source, reason } => match reason {
                SkipReason::Excluded => self.excluded.push(source),
                SkipReason::MissingTag => self.skipped.push(source),
            },
            NoteOutcome::Failed { source, error } => {
                self.failed.push(FailedNote { source, error });
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
