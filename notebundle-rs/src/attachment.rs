//! Attachment discovery, fingerprinting and copying.
//!
//! Each `![[name]]` embed is looked up in the attachments directory, hashed
//! with SHA-256 and copied into the bundle as `<hexdigest><ext>`. Identical
//! content always maps to the same file name, so duplicates collapse.

use crate::diagnostics::DiagnosticSink;
use crate::error::{BundleError, Result};
use crate::parser::parse_embeds;
use crate::types::Replacement;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File, FileTimes};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

/// Read buffer size used while hashing.
pub const HASH_CHUNK_SIZE: usize = 8 * 1024;

/// Stream a file through SHA-256 and return the lowercase hex digest.
pub fn fingerprint(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Bundle file name for an attachment: digest plus the original extension.
pub fn target_file_name(source: &Path, digest: &str) -> String {
    match source.extension() {
        Some(ext) => format!("{}.{}", digest, ext.to_string_lossy()),
        None => digest.to_string(),
    }
}

/// Copy a file, carrying over permissions and access/modification times.
pub fn copy_with_metadata(source: &Path, dest: &Path) -> io::Result<()> {
    // fs::copy already carries the permission bits.
    fs::copy(source, dest)?;

    let meta = fs::metadata(source)?;
    let mut times = FileTimes::new().set_modified(meta.modified()?);
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    File::options().write(true).open(dest)?.set_times(times)?;
    Ok(())
}

/// Join an embed name onto the attachments root, refusing escapes.
pub fn attachment_path(root: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let safe = !name.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(BundleError::UnsafeAttachment(name.to_string()));
    }
    Ok(root.join(relative))
}

/// A successfully resolved attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    pub source: PathBuf,
    /// File name inside the bundle (`<digest><ext>`).
    pub file_name: String,
}

impl ResolvedAttachment {
    /// Markdown image reference pointing at the bundled copy.
    pub fn markdown(&self) -> String {
        format!("![]({})", self.file_name)
    }
}

/// Result of resolving every embed in a note body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// One entry per resolved token, in document order.
    pub replacements: Vec<Replacement>,
    /// Distinct bundle file names written.
    pub copied: Vec<String>,
    /// Distinct embed names that could not be resolved.
    pub unresolved: Vec<String>,
}

/// Resolves embeds against an attachments directory.
pub struct AttachmentResolver<'a> {
    root: &'a Path,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> AttachmentResolver<'a> {
    pub fn new(root: &'a Path, sink: &'a dyn DiagnosticSink) -> Self {
        Self { root, sink }
    }

    /// Locate and fingerprint one attachment.
    ///
    /// `Ok(None)` means the file does not exist. Hashing failures are errors.
    pub fn locate(&self, name: &str) -> Result<Option<ResolvedAttachment>> {
        let source = attachment_path(self.root, name)?;
        if !source.is_file() {
            return Ok(None);
        }
        let digest = fingerprint(&source)?;
        let file_name = target_file_name(&source, &digest);
        Ok(Some(ResolvedAttachment { source, file_name }))
    }

    /// Resolve every embed in `body`, copying attachments into `bundle_dir`.
    ///
    /// Unresolvable embeds are reported and produce no replacement.
    pub fn resolve_all(&self, body: &str, bundle_dir: &Path) -> Resolution {
        let mut resolution = Resolution::default();
        // Each distinct name is located and copied once per note.
        let mut seen: HashMap<String, Option<ResolvedAttachment>> = HashMap::new();

        for embed in parse_embeds(body) {
            let resolved = match seen.get(&embed.target) {
                Some(cached) => cached.clone(),
                None => {
                    let outcome = self.resolve_one(&embed.target, bundle_dir);
                    match &outcome {
                        Some(found) => {
                            if !resolution.copied.contains(&found.file_name) {
                                resolution.copied.push(found.file_name.clone());
                            }
                        }
                        None => resolution.unresolved.push(embed.target.clone()),
                    }
                    seen.insert(embed.target.clone(), outcome.clone());
                    outcome
                }
            };

            if let Some(found) = resolved {
                resolution.replacements.push(Replacement {
                    span: embed.span,
                    original: embed.text,
                    replacement: found.markdown(),
                });
            }
        }

        resolution
    }

    fn resolve_one(&self, name: &str, bundle_dir: &Path) -> Option<ResolvedAttachment> {
        let found = match self.locate(name) {
            Ok(Some(found)) => found,
            Ok(None) => {
                self.sink.warn(&format!(
                    "Attachment '{}' not found in {}",
                    name,
                    self.root.display()
                ));
                return None;
            }
            Err(BundleError::UnsafeAttachment(_)) => {
                self.sink.warn(&format!(
                    "Refusing attachment '{}': outside {}",
                    name,
                    self.root.display()
                ));
                return None;
            }
            Err(e) => {
                self.sink
                    .warn(&format!("Could not fingerprint attachment '{}': {}", name, e));
                return None;
            }
        };

        let dest = bundle_dir.join(&found.file_name);
        self.sink.debug(&format!(
            "Copying attachment '{}' -> '{}'",
            name, found.file_name
        ));
        if let Err(e) = copy_with_metadata(&found.source, &dest) {
            self.sink.warn(&format!(
                "Could not copy attachment '{}' -> '{}': {}",
                name, found.file_name, e
            ));
            return None;
        }
        Some(found)
    }
}
