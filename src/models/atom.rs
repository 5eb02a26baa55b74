//! Atom types and content-addressed handles.
//!
//! Every entity in the graph is an [`Atom`]: either a named node or a link
//! over an ordered sequence of other atoms. An atom's [`Handle`] is the
//! SHA-256 digest of its type and content, so inserting equivalent content
//! twice always yields the same handle.
//!
//! # Atom Types
//!
//! | Type | Kind | Represents |
//! |------|------|------------|
//! | `PhraseNode` | node | Sentence text given to a parse request |
//! | `LgDictNode` | node | Dictionary handle given to a parse request |
//! | `VariableNode` / `GlobNode` | node | Unbound request arguments |
//! | `SentenceNode` | node | Root of all parses of one sentence |
//! | `ParseNode` | node | One accepted linkage |
//! | `WordInstanceNode` | node | One word occurrence in one parse |
//! | `WordNode` | node | Lexical word type |
//! | `NumberNode` | node | Word-order marker value |
//! | `LinkGrammarRelationshipNode` | node | Link label |
//! | `LgLinkInstanceNode` | node | One link occurrence in one parse |
//! | `LgConnectorNode` | node | Connector string |
//! | `LgConnDirNode` | node | Connector direction (`-` or `+`) |
//! | `ParseLink` | link | parse → sentence |
//! | `WordInstanceLink` | link | word instance → parse |
//! | `ReferenceLink` | link | instance → type |
//! | `WordSequenceLink` | link | word instance → order marker |
//! | `ListLink` | link | endpoint pair |
//! | `EvaluationLink` | link | relation or link instance → endpoint pair |
//! | `LgLinkInstanceLink` | link | link instance → left and right connectors |
//! | `LgConnector` | link | connector → direction |

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Type of an atom in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AtomType {
    /// Sentence text argument.
    PhraseNode,
    /// Dictionary argument.
    LgDictNode,
    /// Unbound variable argument.
    VariableNode,
    /// Unbound glob argument.
    GlobNode,
    /// Root of all parses of a sentence.
    SentenceNode,
    /// One accepted linkage.
    ParseNode,
    /// One word occurrence within one parse.
    WordInstanceNode,
    /// Lexical word type.
    WordNode,
    /// Numeric value.
    NumberNode,
    /// Grammatical relation label.
    LinkGrammarRelationshipNode,
    /// One link occurrence within one parse.
    LgLinkInstanceNode,
    /// Connector string.
    LgConnectorNode,
    /// Connector direction.
    LgConnDirNode,
    /// Parse membership.
    ParseLink,
    /// Word instance membership.
    WordInstanceLink,
    /// Instance-to-type reference.
    ReferenceLink,
    /// Word-order marker.
    WordSequenceLink,
    /// Ordered list.
    ListLink,
    /// Predicate evaluation.
    EvaluationLink,
    /// Link instance connectors.
    LgLinkInstanceLink,
    /// Connector with direction.
    LgConnector,
}

impl AtomType {
    /// Returns all atom type variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::PhraseNode,
            Self::LgDictNode,
            Self::VariableNode,
            Self::GlobNode,
            Self::SentenceNode,
            Self::ParseNode,
            Self::WordInstanceNode,
            Self::WordNode,
            Self::NumberNode,
            Self::LinkGrammarRelationshipNode,
            Self::LgLinkInstanceNode,
            Self::LgConnectorNode,
            Self::LgConnDirNode,
            Self::ParseLink,
            Self::WordInstanceLink,
            Self::ReferenceLink,
            Self::WordSequenceLink,
            Self::ListLink,
            Self::EvaluationLink,
            Self::LgLinkInstanceLink,
            Self::LgConnector,
        ]
    }

    /// Returns the atom type as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhraseNode => "PhraseNode",
            Self::LgDictNode => "LgDictNode",
            Self::VariableNode => "VariableNode",
            Self::GlobNode => "GlobNode",
            Self::SentenceNode => "SentenceNode",
            Self::ParseNode => "ParseNode",
            Self::WordInstanceNode => "WordInstanceNode",
            Self::WordNode => "WordNode",
            Self::NumberNode => "NumberNode",
            Self::LinkGrammarRelationshipNode => "LinkGrammarRelationshipNode",
            Self::LgLinkInstanceNode => "LgLinkInstanceNode",
            Self::LgConnectorNode => "LgConnectorNode",
            Self::LgConnDirNode => "LgConnDirNode",
            Self::ParseLink => "ParseLink",
            Self::WordInstanceLink => "WordInstanceLink",
            Self::ReferenceLink => "ReferenceLink",
            Self::WordSequenceLink => "WordSequenceLink",
            Self::ListLink => "ListLink",
            Self::EvaluationLink => "EvaluationLink",
            Self::LgLinkInstanceLink => "LgLinkInstanceLink",
            Self::LgConnector => "LgConnector",
        }
    }

    /// Parses an atom type from its name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == s)
    }

    /// Returns `true` for node types, `false` for link types.
    #[must_use]
    pub const fn is_node(&self) -> bool {
        matches!(
            self,
            Self::PhraseNode
                | Self::LgDictNode
                | Self::VariableNode
                | Self::GlobNode
                | Self::SentenceNode
                | Self::ParseNode
                | Self::WordInstanceNode
                | Self::WordNode
                | Self::NumberNode
                | Self::LinkGrammarRelationshipNode
                | Self::LgLinkInstanceNode
                | Self::LgConnectorNode
                | Self::LgConnDirNode
        )
    }

    /// Returns `true` for link types.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        !self.is_node()
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AtomType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown atom type: {s}"))
    }
}

/// Content address of an atom: the SHA-256 digest of its type and content.
///
/// Rendered as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle([u8; 32]);

impl Handle {
    /// Computes the handle of a node.
    #[must_use]
    pub fn for_node(atom_type: AtomType, name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"node\0");
        hasher.update(atom_type.as_str().as_bytes());
        hasher.update(b"\0");
        hasher.update(name.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Computes the handle of a link over an ordered outgoing set.
    #[must_use]
    pub fn for_link(atom_type: AtomType, outgoing: &[Self]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"link\0");
        hasher.update(atom_type.as_str().as_bytes());
        hasher.update(b"\0");
        for handle in outgoing {
            hasher.update(handle.0);
        }
        Self(hasher.finalize().into())
    }

    /// Parses a handle from its hex rendering.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `s` is exactly 64 hex characters.
    pub fn parse_hex(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim(), &mut bytes)
            .map_err(|e| Error::InvalidInput(format!("invalid handle '{s}': {e}")))?;
        Ok(Self(bytes))
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the lowercase hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Twelve hex chars are plenty to tell handles apart in logs.
        write!(f, "Handle({})", &self.to_hex()[..12])
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A node or link in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Atom {
    /// A named leaf.
    Node {
        /// Node type.
        atom_type: AtomType,
        /// Node name.
        name: String,
    },
    /// An ordered tuple of other atoms.
    Link {
        /// Link type.
        atom_type: AtomType,
        /// Outgoing set, in order.
        outgoing: Vec<Handle>,
    },
}

impl Atom {
    /// Creates a node atom.
    #[must_use]
    pub fn node(atom_type: AtomType, name: impl Into<String>) -> Self {
        Self::Node {
            atom_type,
            name: name.into(),
        }
    }

    /// Creates a link atom.
    #[must_use]
    pub fn link(atom_type: AtomType, outgoing: impl Into<Vec<Handle>>) -> Self {
        Self::Link {
            atom_type,
            outgoing: outgoing.into(),
        }
    }

    /// Returns the atom's type.
    #[must_use]
    pub const fn atom_type(&self) -> AtomType {
        match self {
            Self::Node { atom_type, .. } | Self::Link { atom_type, .. } => *atom_type,
        }
    }

    /// Returns the node name, or `None` for links.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Node { name, .. } => Some(name),
            Self::Link { .. } => None,
        }
    }

    /// Returns the outgoing set; empty for nodes.
    #[must_use]
    pub fn outgoing(&self) -> &[Handle] {
        match self {
            Self::Node { .. } => &[],
            Self::Link { outgoing, .. } => outgoing,
        }
    }

    /// Computes the atom's content address.
    #[must_use]
    pub fn handle(&self) -> Handle {
        match self {
            Self::Node { atom_type, name } => Handle::for_node(*atom_type, name),
            Self::Link {
                atom_type,
                outgoing,
            } => Handle::for_link(*atom_type, outgoing),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node { atom_type, name } => write!(f, "({atom_type} \"{name}\")"),
            Self::Link {
                atom_type,
                outgoing,
            } => {
                write!(f, "({atom_type}")?;
                for handle in outgoing {
                    write!(f, " {handle:?}")?;
                }
                write!(f, ")")
            },
        }
    }
}
