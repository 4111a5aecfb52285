//! Parsers for Obsidian markdown syntax.

pub mod frontmatter;
pub mod wikilink;

pub use frontmatter::{
    parse_frontmatter, parse_note_content, serialize_frontmatter, split_frontmatter,
};
pub use wikilink::{embed_target, has_cross_references, parse_embeds, strip_cross_references};
