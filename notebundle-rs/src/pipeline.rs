//! Conversion driver: walks the vault and turns selected notes into bundles.

use crate::attachment::AttachmentResolver;
use crate::bundle::BundleWriter;
use crate::config::ConvertConfig;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::note::{Note, note_name};
use crate::rewrite::rewrite_body;
use crate::tags::TagFilter;
use crate::types::{NoteOutcome, RunReport, SkipReason};
use crate::vault::Vault;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Converts the notes of one vault. Notes are processed sequentially and a
/// failing note never stops the run.
pub struct Converter<'a> {
    vault: Vault,
    attachments_dir: PathBuf,
    writer: BundleWriter,
    filter: TagFilter,
    config: ConvertConfig,
    fixed_now: Option<DateTime<FixedOffset>>,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> Converter<'a> {
    /// Validate the config and prepare the output directory.
    ///
    /// Fails when the notes or attachments directory is missing.
    pub fn new(config: &ConvertConfig, sink: &'a dyn DiagnosticSink) -> Result<Self> {
        let paths = config.validate()?;
        std::fs::create_dir_all(&paths.posts_dir)?;

        let vault = Vault::new(paths.notes_dir)?.with_excluded(&config.exclude_dirs);
        let writer = BundleWriter::new(paths.posts_dir).with_index_name(&config.index_name);

        Ok(Self {
            vault,
            attachments_dir: paths.attachments_dir,
            writer,
            filter: TagFilter::new(&config.filter_tag, config.remove_filter_tag),
            config: config.clone(),
            fixed_now: None,
            sink,
        })
    }

    /// Use a fixed timestamp for defaulted `date` properties.
    pub fn with_fixed_time(mut self, now: DateTime<FixedOffset>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// Convert every note in the vault.
    pub fn run(&self) -> Result<RunReport> {
        self.sink.info(&format!(
            "Scanning notes recursively in: {}",
            self.vault.root.display()
        ));
        if !self.config.exclude_dirs.is_empty() {
            self.sink.info(&format!(
                "Excluding directories: {}",
                self.vault
                    .excluded()
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        let mut report = RunReport::default();
        let mut bundles: HashMap<String, PathBuf> = HashMap::new();

        for path in self.vault.list_notes(self.sink)? {
            let outcome = self.convert_note(&path);

            if let NoteOutcome::Written { source, .. } = &outcome {
                let name = note_name(source).into_owned();
                if let Some(previous) = bundles.insert(name.clone(), source.clone()) {
                    self.sink.warn(&format!(
                        "Bundle '{}' written by both {} and {}; the latter wins",
                        name,
                        previous.display(),
                        source.display()
                    ));
                }
            }

            report.record(outcome);
        }

        self.sink.info(&format!(
            "--- Processing complete: {} written, {} skipped, {} excluded, {} failed ---",
            report.written.len(),
            report.skipped.len(),
            report.excluded.len(),
            report.failed.len()
        ));
        Ok(report)
    }

    /// Convert one note. Errors are reported and folded into the outcome.
    pub fn convert_note(&self, path: &Path) -> NoteOutcome {
        if self.vault.is_excluded(path) {
            self.sink
                .debug(&format!("Skipping note in excluded directory: {}", path.display()));
            return NoteOutcome::Skipped {
                source: path.to_path_buf(),
                reason: SkipReason::Excluded,
            };
        }

        match self.try_convert(path) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.sink
                    .error(&format!("Failed to convert {}: {}", path.display(), e));
                NoteOutcome::Failed {
                    source: path.to_path_buf(),
                    error: e.to_string(),
                }
            }
        }
    }

    fn try_convert(&self, path: &Path) -> Result<NoteOutcome> {
        self.sink.info(&format!(
            "--- Checking note: {} ---",
            self.vault.relative(path).display()
        ));

        let mut note = Note::load(path, self.sink)?;

        if !self.filter.apply(&mut note.properties, self.sink) {
            self.sink.debug(&format!(
                "Skipping note '{}': no '{}' tag",
                note.name(),
                self.filter.tag
            ));
            return Ok(NoteOutcome::Skipped {
                source: path.to_path_buf(),
                reason: SkipReason::MissingTag,
            });
        }
        self.sink.info(&format!(
            "Processing note: {} (tag '{}' found)",
            note.name(),
            self.filter.tag
        ));

        let now = self.fixed_now.unwrap_or_else(|| self.config.now());
        note.ensure_defaults(now, self.sink);

        let bundle_dir = self.writer.prepare(&note.name())?;
        self.sink
            .info(&format!("Bundle directory ready: {}", bundle_dir.display()));

        let resolver = AttachmentResolver::new(&self.attachments_dir, self.sink);
        let resolution = resolver.resolve_all(&note.body, &bundle_dir);
        let body = rewrite_body(&note.body, &resolution.replacements, self.sink);

        let index = self.writer.write_index(&bundle_dir, &note.properties, &body)?;
        self.sink.info(&format!("Note saved as: {}", index.display()));

        Ok(NoteOutcome::Written {
            source: path.to_path_buf(),
            index,
            attachments: resolution.copied,
            unresolved: resolution.unresolved,
        })
    }
}

/// Convert a vault with the given configuration.
pub fn run(config: &ConvertConfig, sink: &dyn DiagnosticSink) -> Result<RunReport> {
    Converter::new(config, sink)?.run()
}
