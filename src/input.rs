//! Heading extraction from documents, used to seed the section list.

use crate::error::{Error, Result};
use crate::formats::Format;
use std::fs;
use std::path::Path;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

#[derive(Clone, Debug, PartialEq, Eq)]
/// A heading found in a document.
pub struct Heading {
    /// Nesting depth (1 for top-level).
    pub level: usize,
    /// Heading text without markup symbols.
    pub title: String,
}

/// Extracts every heading from `source`, in document order.
///
/// # Errors
///
/// Returns an error if the grammar cannot be loaded, the query does not compile, the parser
/// produces no tree, or a heading is not valid UTF-8.
pub fn extract_headings(source: &str, format: &impl Format) -> Result<Vec<Heading>> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parse("parser returned no tree".to_string()))?;
    let query = Query::new(&language, format.title_query())?;

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
    let mut headings = Vec::new();

    while let Some(found) = matches.next() {
        for capture in found.captures {
            let title = capture.node.utf8_text(source.as_bytes())?.trim();
            if title.is_empty() {
                continue;
            }
            headings.push(Heading {
                level: format.heading_level(capture.node).unwrap_or(1),
                title: title.to_string(),
            });
        }
    }

    Ok(headings)
}

/// Reads a document and returns its headings no deeper than `max_level`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_headings(path: &Path, format: &impl Format, max_level: usize) -> Result<Vec<Heading>> {
    let source = fs::read_to_string(path)?;
    let mut headings = extract_headings(&source, format)?;
    headings.retain(|heading| heading.level <= max_level);
    tracing::debug!(path = %path.display(), count = headings.len(), "read headings");
    Ok(headings)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
