//! Format trait and implementations for the documents sections are imported from.
//!
//! A format names the tree-sitter grammar to parse with and the query that captures the text
//! of each heading.

pub mod markdown;

/// Grammar and heading query for one document format.
pub trait Format {
    /// Tree-sitter grammar for the format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing heading text as `@title`, one capture per heading.
    fn title_query(&self) -> &str;
    /// Heading depth of a node captured by [`Format::title_query`].
    fn heading_level(&self, title: tree_sitter::Node<'_>) -> Option<usize>;
}
