//! Owned linkage data.

use super::Linkage;
use serde::{Deserialize, Serialize};

/// One link between two words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageLink {
    /// Left word index.
    pub left: usize,
    /// Right word index.
    pub right: usize,
    /// Link label.
    pub label: String,
    /// Connector at the left end.
    pub left_connector: String,
    /// Connector at the right end.
    pub right_connector: String,
}

/// A linkage held in memory.
///
/// # Example
///
/// ```rust
/// use linkgraph::parser::ParsedLinkage;
/// use linkgraph::Linkage;
///
/// let linkage = ParsedLinkage::new(["the", "cat"]).with_link(0, 1, "Ds", "Ds", "Ds");
/// assert_eq!(linkage.word_count(), 2);
/// assert_eq!(linkage.link_label(0), "Ds");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLinkage {
    /// Words in sentence order.
    pub words: Vec<String>,
    /// Links in parser order.
    #[serde(default)]
    pub links: Vec<LinkageLink>,
    /// Number of words this linkage leaves unlinked.
    #[serde(default)]
    pub null_count: usize,
}

impl ParsedLinkage {
    /// Creates a linkage over `words` with no links.
    #[must_use]
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            links: Vec::new(),
            null_count: 0,
        }
    }

    /// Appends a link.
    #[must_use]
    pub fn with_link(
        mut self,
        left: usize,
        right: usize,
        label: impl Into<String>,
        left_connector: impl Into<String>,
        right_connector: impl Into<String>,
    ) -> Self {
        self.links.push(LinkageLink {
            left,
            right,
            label: label.into(),
            left_connector: left_connector.into(),
            right_connector: right_connector.into(),
        });
        self
    }

    /// Sets the number of unlinked words.
    #[must_use]
    pub const fn with_null_count(mut self, null_count: usize) -> Self {
        self.null_count = null_count;
        self
    }

    fn link(&self, index: usize) -> Option<&LinkageLink> {
        self.links.get(index)
    }
}

impl Linkage for ParsedLinkage {
    fn word_count(&self) -> usize {
        self.words.len()
    }

    fn word_text(&self, index: usize) -> &str {
        self.words.get(index).map_or("", String::as_str)
    }

    fn link_count(&self) -> usize {
        self.links.len()
    }

    fn link_left(&self, index: usize) -> usize {
        self.link(index).map_or(usize::MAX, |l| l.left)
    }

    fn link_right(&self, index: usize) -> usize {
        self.link(index).map_or(usize::MAX, |l| l.right)
    }

    fn link_label(&self, index: usize) -> &str {
        self.link(index).map_or("", |l| l.label.as_str())
    }

    fn link_left_connector(&self, index: usize) -> &str {
        self.link(index).map_or("", |l| l.left_connector.as_str())
    }

    fn link_right_connector(&self, index: usize) -> &str {
        self.link(index).map_or("", |l| l.right_connector.as_str())
    }
}
