//! Errors surfaced by persistence, heading import and logging setup.
//!
//! Store operations never fail with these: capacity and path problems are reported
//! as an [`Outcome`](crate::store::Outcome) instead.

use thiserror::Error;

#[derive(Debug, Error)]
/// Failures that a caller has to handle or report.
pub enum Error {
    #[error("io error: {0}")]
    /// Reading or writing a store, export or markdown file failed.
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    /// A snapshot or export document was not valid structured data.
    Json(#[from] serde_json::Error),
    #[error("tree-sitter language error: {0}")]
    /// The markdown grammar could not be loaded into the parser.
    Language(#[from] tree_sitter::LanguageError),
    #[error("tree-sitter query error: {0}")]
    /// The heading query did not compile against the grammar.
    Query(#[from] tree_sitter::QueryError),
    #[error("heading text is not utf-8: {0}")]
    /// A captured heading was not valid UTF-8.
    Utf8(#[from] std::str::Utf8Error),
    #[error("{0}")]
    /// The parser gave up on a document.
    Parse(String),
    #[error("logging setup failed: {0}")]
    /// A global tracing subscriber could not be installed.
    Logging(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
