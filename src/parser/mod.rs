//! Parser service interface.
//!
//! The parser is an external collaborator. This module fixes the boundary
//! the services consume: a [`Parser`] opens a [`ParseSession`] for one
//! sentence, the session counts and hands out [`Linkage`]s.
//!
//! # Resource Release
//!
//! Sessions and linkages are owned boxes. Dropping them releases whatever the
//! parser allocated, so a caller that returns early, propagates an error with
//! `?`, or unwinds still releases everything it acquired.
//!
//! # Implementations
//!
//! | Parser | Use Case |
//! |--------|----------|
//! | [`FixtureParser`] | Offline parses loaded from a JSON fixture; tests and the CLI |

mod fixture;
mod linkage;

pub use fixture::{FixtureFile, FixtureParser};
pub use linkage::{LinkageLink, ParsedLinkage};

use crate::Result;
use std::fmt;

/// Handle to a loaded grammar dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dictionary {
    language: String,
}

impl Dictionary {
    /// Creates a dictionary handle for `language`.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Returns the dictionary language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)
    }
}

/// Options passed to a parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Whether linkages that leave some words unlinked are counted.
    pub allow_null_links: bool,
}

/// One candidate parse of a sentence.
///
/// Indices passed to the per-word and per-link accessors are expected to be
/// in range; implementations return an empty string rather than panic.
pub trait Linkage {
    /// Number of words, including any boundary words the parser adds.
    fn word_count(&self) -> usize;

    /// Surface text of word `index`.
    fn word_text(&self, index: usize) -> &str;

    /// Number of links.
    fn link_count(&self) -> usize;

    /// Word index of the left end of link `index`.
    fn link_left(&self, index: usize) -> usize;

    /// Word index of the right end of link `index`.
    fn link_right(&self, index: usize) -> usize;

    /// Label of link `index`.
    fn link_label(&self, index: usize) -> &str;

    /// Connector string at the left end of link `index`.
    fn link_left_connector(&self, index: usize) -> &str;

    /// Connector string at the right end of link `index`.
    fn link_right_connector(&self, index: usize) -> &str;
}

/// A sentence opened against a dictionary.
pub trait ParseSession {
    /// Parses the sentence and returns the linkage count.
    ///
    /// A negative count means the parse could not be set up.
    fn parse(&mut self, options: &ParseOptions) -> i32;

    /// Builds linkage `index` from the last parse.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the last parse's count.
    fn linkage(&self, index: usize, options: &ParseOptions) -> Result<Box<dyn Linkage + '_>>;
}

/// A natural-language link parser.
pub trait Parser: Send + Sync {
    /// Opens `text` against `dictionary`, or returns `None` if the parser
    /// cannot create a session for it.
    fn create_sentence(
        &self,
        text: &str,
        dictionary: &Dictionary,
    ) -> Option<Box<dyn ParseSession + '_>>;

    /// Returns the default parse options.
    fn create_options(&self) -> ParseOptions {
        ParseOptions::default()
    }
}
