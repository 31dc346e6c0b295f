//! Markdown format implementation using tree-sitter-md.
//!
//! Only ATX-style headings (# syntax) are recognised.

use crate::formats::Format;

/// Tree-sitter queries for ATX-style markdown headings (# syntax).
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn title_query(&self) -> &'static str {
        "(atx_heading (inline) @title)"
    }

    fn heading_level(&self, title: tree_sitter::Node<'_>) -> Option<usize> {
        let mut sibling = title.prev_sibling();
        while let Some(node) = sibling {
            let level = node
                .kind()
                .strip_prefix("atx_h")
                .and_then(|kind| kind.strip_suffix("_marker"))
                .and_then(|digit| digit.parse().ok());
            if level.is_some() {
                return level;
            }
            sibling = node.prev_sibling();
        }
        None
    }
}
