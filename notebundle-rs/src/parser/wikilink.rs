//! Embed (`![[name]]`) and cross-reference (`[[text]]`) token scanning.

use crate::types::EmbedRef;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

// Non-greedy: the name runs up to the first closing `]]` on the same line.
static EMBED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[\[(.*?)\]\]").unwrap());

// The regex crate has no lookbehind, so the optional `!` is captured (group 1)
// and embeds are passed through untouched in the replacement closure. The
// inner text excludes brackets so an unclosed `[[` cannot reach into an embed.
static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\[\]]*?)\]\]").unwrap());

/// Find every embed token in document order.
pub fn parse_embeds(content: &str) -> Vec<EmbedRef> {
    EMBED
        .captures_iter(content)
        .map(|cap| {
            let whole = cap.get(0).unwrap();
            let inner = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            EmbedRef {
                text: whole.as_str().to_string(),
                target: embed_target(inner).to_string(),
                span: whole.range(),
            }
        })
        .collect()
}

/// Attachment name referenced by an embed's inner text.
///
/// Obsidian allows a display hint after `|` (`![[image.png|400]]`); only the
/// part before it names the file.
pub fn embed_target(inner: &str) -> &str {
    inner.split('|').next().unwrap_or(inner)
}

/// Whether the content contains any plain (non-embed) cross-reference.
pub fn has_cross_references(content: &str) -> bool {
    WIKILINK
        .captures_iter(content)
        .any(|cap| !is_embed(&cap))
}

/// Replace each `[[text]]` with `text`, leaving `![[...]]` untouched.
pub fn strip_cross_references(content: &str) -> Cow<'_, str> {
    WIKILINK.replace_all(content, |cap: &Captures| {
        if is_embed(cap) {
            cap[0].to_string()
        } else {
            cap[2].to_string()
        }
    })
}

fn is_embed(cap: &Captures) -> bool {
    cap.get(1).map(|m| !m.as_str().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed() {
        let embeds = parse_embeds("See ![[image.png]] here");
        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0].text, "![[image.png]]");
        assert_eq!(embeds[0].target, "image.png");
        assert_eq!(embeds[0].span, 4..18);
    }

    #[test]
    fn test_embed_with_size_hint() {
        let embeds = parse_embeds("![[photo.jpg|400x300]]");
        assert_eq!(embeds[0].target, "photo.jpg");
        assert_eq!(embeds[0].text, "![[photo.jpg|400x300]]");
    }

    #[test]
    fn test_embed_name_is_literal() {
        let embeds = parse_embeds("![[ a.png ]]");
        assert_eq!(embeds[0].target, " a.png ");
    }

    #[test]
    fn test_embed_is_non_greedy() {
        let embeds = parse_embeds("![[a.png]] and ![[b.png]]");
        let targets: Vec<_> = embeds.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_plain_link_is_not_embed() {
        assert!(parse_embeds("See [[Other Note]]").is_empty());
    }

    #[test]
    fn test_duplicate_embeds_have_distinct_spans() {
        let embeds = parse_embeds("![[x.png]]![[x.png]]");
        assert_eq!(embeds.len(), 2);
        assert_eq!(embeds[0].span, 0..10);
        assert_eq!(embeds[1].span, 10..20);
    }

    #[test]
    fn test_strip_cross_references() {
        let out = strip_cross_references("See [[My Note]] and [[Other|alias]].");
        assert_eq!(out, "See My Note and Other|alias.");
    }

    #[test]
    fn test_strip_leaves_embeds() {
        let content = "![[missing.png]] next to [[Link]]";
        assert_eq!(strip_cross_references(content), "![[missing.png]] next to Link");
    }

    #[test]
    fn test_unclosed_link_does_not_swallow_embed() {
        let content = "[[see ![[gone.png]] and ![[gone.png]]";
        assert_eq!(strip_cross_references(content), content);
        assert!(!has_cross_references(content));
    }

    #[test]
    fn test_strip_without_links_borrows() {
        let content = "Nothing to do here.";
        assert!(matches!(strip_cross_references(content), Cow::Borrowed(_)));
    }

    #[test]
    fn test_has_cross_references() {
        assert!(has_cross_references("a [[b]] c"));
        assert!(!has_cross_references("a ![[b.png]] c"));
        assert!(!has_cross_references("plain text"));
    }
}
