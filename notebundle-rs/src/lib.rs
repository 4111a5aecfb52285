//! notebundle - convert an Obsidian-style vault into static-site page bundles.
//!
//! # Overview
//!
//! Every note carrying the selection tag becomes a directory named after the
//! note, holding an `index.md` and the note's attachments:
//! - Frontmatter is parsed, `title` and `date` are filled in when missing
//! - The tag list is normalized (and optionally stripped of the selection tag)
//! - `![[image.png]]` embeds are copied as `<sha256>.png` and rewritten to `![](<sha256>.png)`
//! - `[[wikilinks]]` are reduced to their text
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use notebundle::{ConvertConfig, Converter, Severity, TracingSink};
//!
//! let config = ConvertConfig {
//!     notes_dir: Some(PathBuf::from("/vault/Notes")),
//!     attachments_dir: Some(PathBuf::from("/vault/Attachments")),
//!     posts_dir: Some(PathBuf::from("/site/content/posts")),
//!     ..ConvertConfig::default()
//! };
//!
//! let sink = TracingSink::new(Severity::Info);
//! let report = Converter::new(&config, &sink).unwrap().run().unwrap();
//! println!("{} notes written", report.written.len());
//! ```

pub mod attachment;
pub mod bundle;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod note;
pub mod parser;
pub mod pipeline;
pub mod rewrite;
pub mod tags;
pub mod types;
pub mod vault;

// Re-export main types at crate root
pub use attachment::AttachmentResolver;
pub use bundle::BundleWriter;
pub use config::ConvertConfig;
pub use diagnostics::{DiagnosticSink, MemorySink, Severity, TracingSink};
pub use error::{BundleError, Result};
pub use note::Note;
pub use pipeline::Converter;
pub use tags::TagFilter;
pub use types::*;
pub use vault::Vault;
