//! Body rewriting: resolved embeds and plain cross-references.

use crate::diagnostics::DiagnosticSink;
use crate::parser::{has_cross_references, strip_cross_references};
use crate::types::Replacement;

/// Splice replacements into `content` by byte span.
///
/// Spans must be non-overlapping and in ascending order, which is what
/// embed scanning produces.
pub fn apply_replacements(content: &str, replacements: &[Replacement]) -> String {
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for r in replacements {
        debug_assert_eq!(&content[r.span.clone()], r.original);
        out.push_str(&content[cursor..r.span.start]);
        out.push_str(&r.replacement);
        cursor = r.span.end;
    }
    out.push_str(&content[cursor..]);
    out
}

/// Rewrite a note body for publishing.
///
/// Resolved embeds become markdown image references, then every `[[text]]`
/// that is not an embed is reduced to `text`. Unresolved embeds stay as-is.
pub fn rewrite_body(
    content: &str,
    replacements: &[Replacement],
    sink: &dyn DiagnosticSink,
) -> String {
    let rewritten = if replacements.is_empty() {
        content.to_string()
    } else {
        sink.info("Updating attachment links");
        apply_replacements(content, replacements)
    };

    if has_cross_references(&rewritten) {
        sink.info("Stripping wikilink brackets");
        strip_cross_references(&rewritten).into_owned()
    } else {
        rewritten
    }
}
