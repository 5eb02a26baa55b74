//! Structured identities for sentences, parses, and their instances.
//!
//! Identities are composed as tuples and only rendered to node names when
//! they reach the store, so a name can never be truncated:
//!
//! | Identity | Rendered name |
//! |----------|---------------|
//! | [`SentenceId`] | `sentence@<uuid>` |
//! | [`ParseId`] | `sentence@<uuid>_parse_<i>` |
//! | [`WordInstanceId`] | `<surface>@sentence@<uuid>_parse_<i>` |
//! | [`WordInstanceId`], repeated surface | `<surface>@sentence@<uuid>_parse_<i>-word-<w>` |
//! | [`LinkInstanceId`] | `<label>@sentence@<uuid>_parse_<i>-link-<k>` |

use std::fmt;
use uuid::Uuid;

/// Prefix of every sentence node name.
pub const SENTENCE_PREFIX: &str = "sentence@";

/// Globally unique identity of one parse request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentenceId(Uuid);

impl SentenceId {
    /// Allocates a fresh random sentence identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.0
    }

    /// Identity of the `index`-th parse of this sentence.
    #[must_use]
    pub const fn parse(self, index: usize) -> ParseId {
        ParseId {
            sentence: self,
            index,
        }
    }
}

impl fmt::Display for SentenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SENTENCE_PREFIX}{}", self.0.hyphenated())
    }
}

/// Identity of one retained linkage of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseId {
    /// Owning sentence.
    pub sentence: SentenceId,
    /// Linkage index within the sentence.
    pub index: usize,
}

impl ParseId {
    /// Identity of the first occurrence of `surface` within this parse.
    #[must_use]
    pub const fn word<'a>(&'a self, surface: &'a str) -> WordInstanceId<'a> {
        WordInstanceId {
            surface,
            parse: self,
            repeat_position: None,
        }
    }

    /// Identity of a later occurrence of `surface`, at word `position`.
    #[must_use]
    pub const fn repeated_word<'a>(
        &'a self,
        surface: &'a str,
        position: usize,
    ) -> WordInstanceId<'a> {
        WordInstanceId {
            surface,
            parse: self,
            repeat_position: Some(position),
        }
    }

    /// Identity of the `index`-th link within this parse.
    #[must_use]
    pub const fn link<'a>(&'a self, label: &'a str, index: usize) -> LinkInstanceId<'a> {
        LinkInstanceId {
            label,
            parse: self,
            index,
        }
    }
}

impl fmt::Display for ParseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_parse_{}", self.sentence, self.index)
    }
}

/// Identity of one word occurrence in one parse.
///
/// A surface that occurs more than once in a parse carries its position on
/// every occurrence after the first, so each position gets its own node.
#[derive(Debug, Clone, Copy)]
pub struct WordInstanceId<'a> {
    surface: &'a str,
    parse: &'a ParseId,
    repeat_position: Option<usize>,
}

impl fmt::Display for WordInstanceId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.surface, self.parse)?;
        if let Some(position) = self.repeat_position {
            write!(f, "-word-{position}")?;
        }
        Ok(())
    }
}

/// Identity of one link occurrence in one parse.
#[derive(Debug, Clone, Copy)]
pub struct LinkInstanceId<'a> {
    label: &'a str,
    parse: &'a ParseId,
    index: usize,
}

impl fmt::Display for LinkInstanceId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}-link-{}", self.label, self.parse, self.index)
    }
}
