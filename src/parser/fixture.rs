//! Offline parser backed by precomputed linkages.
//!
//! A fixture is a JSON document:
//!
//! ```json
//! {
//!   "dictionary": "en",
//!   "sentences": {
//!     "the cat sat": [
//!       { "words": ["the", "cat", "sat"],
//!         "links": [
//!           { "left": 0, "right": 1, "label": "Ds", "left_connector": "D", "right_connector": "Ds" },
//!           { "left": 1, "right": 2, "label": "Ss", "left_connector": "Ss", "right_connector": "S" }
//!         ] }
//!     ]
//!   },
//!   "failing": ["sentence whose parse setup fails"],
//!   "unavailable": ["sentence the parser cannot open"]
//! }
//! ```
//!
//! Sentences not listed parse to zero linkages.

use super::{Dictionary, Linkage, ParseOptions, ParseSession, ParsedLinkage, Parser};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixture document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureFile {
    /// Dictionary language the fixture was parsed with.
    pub dictionary: String,
    /// Linkages per sentence, in rank order.
    #[serde(default)]
    pub sentences: HashMap<String, Vec<ParsedLinkage>>,
    /// Sentences whose parse reports a negative count.
    #[serde(default)]
    pub failing: HashSet<String>,
    /// Sentences for which no session can be created.
    #[serde(default)]
    pub unavailable: HashSet<String>,
}

#[derive(Debug, Default)]
struct LiveCounters {
    sessions: AtomicUsize,
    linkages: AtomicUsize,
}

/// Parser that replays linkages from a [`FixtureFile`].
///
/// Tracks live sessions and linkages so callers can verify that every
/// acquired resource was released.
#[derive(Debug, Default)]
pub struct FixtureParser {
    fixture: FixtureFile,
    live: LiveCounters,
}

impl FixtureParser {
    /// Creates an empty fixture parser for `dictionary`.
    #[must_use]
    pub fn new(dictionary: &Dictionary) -> Self {
        Self::from_fixture(FixtureFile {
            dictionary: dictionary.language().to_string(),
            ..FixtureFile::default()
        })
    }

    /// Wraps a loaded fixture.
    #[must_use]
    pub fn from_fixture(fixture: FixtureFile) -> Self {
        Self {
            fixture,
            live: LiveCounters::default(),
        }
    }

    /// Parses a fixture from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a fixture.
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: FixtureFile =
            serde_json::from_str(json).map_err(|e| Error::operation("parse_fixture", e))?;
        Ok(Self::from_fixture(fixture))
    }

    /// Loads a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::operation("read_fixture", format!("{}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Adds linkages for `text`.
    #[must_use]
    pub fn with_sentence(mut self, text: impl Into<String>, linkages: Vec<ParsedLinkage>) -> Self {
        self.fixture.sentences.insert(text.into(), linkages);
        self
    }

    /// Makes the parse of `text` report a negative count.
    #[must_use]
    pub fn with_failure(mut self, text: impl Into<String>) -> Self {
        self.fixture.failing.insert(text.into());
        self
    }

    /// Makes session creation for `text` fail.
    #[must_use]
    pub fn with_unavailable(mut self, text: impl Into<String>) -> Self {
        self.fixture.unavailable.insert(text.into());
        self
    }

    /// Returns the fixture.
    #[must_use]
    pub const fn fixture(&self) -> &FixtureFile {
        &self.fixture
    }

    /// Number of sessions not yet released.
    #[must_use]
    pub fn live_sessions(&self) -> usize {
        self.live.sessions.load(Ordering::SeqCst)
    }

    /// Number of linkages not yet released.
    #[must_use]
    pub fn live_linkages(&self) -> usize {
        self.live.linkages.load(Ordering::SeqCst)
    }
}

impl Parser for FixtureParser {
    fn create_sentence(
        &self,
        text: &str,
        dictionary: &Dictionary,
    ) -> Option<Box<dyn ParseSession + '_>> {
        if dictionary.language() != self.fixture.dictionary {
            tracing::debug!(
                requested = %dictionary,
                loaded = %self.fixture.dictionary,
                "Fixture dictionary mismatch"
            );
            return None;
        }
        if self.fixture.unavailable.contains(text) {
            return None;
        }

        self.live.sessions.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(FixtureSession {
            parser: self,
            text: text.to_string(),
            accepted: Vec::new(),
        }))
    }
}

struct FixtureSession<'a> {
    parser: &'a FixtureParser,
    text: String,
    accepted: Vec<&'a ParsedLinkage>,
}

impl ParseSession for FixtureSession<'_> {
    fn parse(&mut self, options: &ParseOptions) -> i32 {
        self.accepted.clear();
        if self.parser.fixture.failing.contains(&self.text) {
            return -1;
        }

        self.accepted = self
            .parser
            .fixture
            .sentences
            .get(&self.text)
            .into_iter()
            .flatten()
            .filter(|l| options.allow_null_links || l.null_count == 0)
            .collect();
        i32::try_from(self.accepted.len()).unwrap_or(i32::MAX)
    }

    fn linkage(&self, index: usize, _options: &ParseOptions) -> Result<Box<dyn Linkage + '_>> {
        let linkage = self.accepted.get(index).copied().ok_or_else(|| {
            Error::InvalidInput(format!(
                "linkage {index} requested, but the parse produced {}",
                self.accepted.len()
            ))
        })?;

        self.parser.live.linkages.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureLinkage {
            linkage,
            live: &self.parser.live,
        }))
    }
}

impl Drop for FixtureSession<'_> {
    fn drop(&mut self) {
        self.parser.live.sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

struct FixtureLinkage<'a> {
    linkage: &'a ParsedLinkage,
    live: &'a LiveCounters,
}

impl Linkage for FixtureLinkage<'_> {
    fn word_count(&self) -> usize {
        self.linkage.word_count()
    }

    fn word_text(&self, index: usize) -> &str {
        self.linkage.word_text(index)
    }

    fn link_count(&self) -> usize {
        self.linkage.link_count()
    }

    fn link_left(&self, index: usize) -> usize {
        self.linkage.link_left(index)
    }

    fn link_right(&self, index: usize) -> usize {
        self.linkage.link_right(index)
    }

    fn link_label(&self, index: usize) -> &str {
        self.linkage.link_label(index)
    }

    fn link_left_connector(&self, index: usize) -> &str {
        self.linkage.link_left_connector(index)
    }

    fn link_right_connector(&self, index: usize) -> &str {
        self.linkage.link_right_connector(index)
    }
}

impl Drop for FixtureLinkage<'_> {
    fn drop(&mut self) {
        self.live.linkages.fetch_sub(1, Ordering::SeqCst);
    }
}
