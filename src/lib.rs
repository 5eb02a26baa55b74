//! # Linkgraph
//!
//! Materializes link-grammar parse results into a content-addressed atom graph.
//!
//! A parse request turns one sentence into a `SentenceNode` that owns up to
//! [`MAX_LINKAGES`](models::MAX_LINKAGES) `ParseNode`s. Each parse carries its
//! word instances, the word-order markers, and the connector structure of
//! every grammatical link, all inserted into an [`AtomStore`].
//!
//! ## Features
//!
//! - Content-addressed atoms: handles are SHA-256 digests of type and content
//! - Pluggable stores (`SQLite` for persistence, in-memory for tests)
//! - Scoped parser resources released on every exit path
//! - Process-wide, strictly increasing word-order sequence
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use linkgraph::{Dictionary, InMemoryAtomStore, ParseService};
//! use linkgraph::parser::FixtureParser;
//!
//! let parser = FixtureParser::from_path("fixtures/en.json")?;
//! let service = ParseService::new(parser, Arc::new(InMemoryAtomStore::new()))?;
//! let sentence = service.materialize_parse("the cat sat", &Dictionary::new("en"))?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod parser;
pub mod services;
pub mod storage;

pub use config::LinkgraphConfig;
pub use models::{Atom, AtomType, Handle, ParseRequest};
pub use parser::{Dictionary, Linkage, ParseOptions, ParseSession, Parser};
pub use services::{LinkageMaterializer, ParseService, WordSequence};
pub use storage::{AtomStore, InMemoryAtomStore, SqliteAtomStore, StoreStats};

/// Error type for linkgraph operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Wrong argument kind in a parse request, dangling link targets, malformed handles |
/// | `OperationFailed` | `SQLite` failures, poisoned locks, unreadable fixtures or config files |
/// | `LinkageIndexOutOfRange` | The parser reported a link endpoint outside the linkage's word list |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A parse request is built from an argument of the wrong kind
    /// - A link is inserted with a node type, or a node with a link type
    /// - A link references a handle the store does not contain
    /// - A handle string is not 64 hex characters
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` database operations fail
    /// - A store lock is poisoned
    /// - Fixture or configuration files cannot be read or parsed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The parser produced a link whose endpoint is not a valid word index.
    ///
    /// This is a contract violation by the parser. The request is aborted
    /// before the offending linkage touches the store.
    #[error("link {link} references word {endpoint}, but the linkage has {word_count} words")]
    LinkageIndexOutOfRange {
        /// Index of the offending link.
        link: usize,
        /// The out-of-range word index.
        endpoint: usize,
        /// Number of words in the linkage.
        word_count: usize,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from an operation name and any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for linkgraph operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::operation("open_store", "disk full");
        assert_eq!(err.to_string(), "operation 'open_store' failed: disk full");

        let err = Error::LinkageIndexOutOfRange {
            link: 2,
            endpoint: 7,
            word_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "link 2 references word 7, but the linkage has 3 words"
        );
    }
}
