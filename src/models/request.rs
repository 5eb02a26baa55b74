//! Parse request arguments.
//!
//! A request is built from two atoms: the sentence and the dictionary. Their
//! kinds are checked once, here, so nothing downstream re-validates them.

use crate::models::{Atom, AtomType};
use crate::parser::Dictionary;
use crate::{Error, Result};

/// One argument of a parse request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A concrete value (phrase text or dictionary name).
    Bound(String),
    /// An unbound variable.
    Variable(String),
    /// An unbound glob.
    Glob(String),
}

impl Argument {
    /// Classifies `atom`, accepting `bound_type` as the concrete kind.
    fn classify(atom: &Atom, bound_type: AtomType, role: &str) -> Result<Self> {
        let Atom::Node { atom_type, name } = atom else {
            return Err(Error::InvalidInput(format!(
                "{role}: expecting {bound_type}, got {}",
                atom.atom_type()
            )));
        };

        match atom_type {
            t if *t == bound_type => Ok(Self::Bound(name.clone())),
            AtomType::VariableNode => Ok(Self::Variable(name.clone())),
            AtomType::GlobNode => Ok(Self::Glob(name.clone())),
            other => Err(Error::InvalidInput(format!(
                "{role}: expecting {bound_type}, got {other} \"{name}\""
            ))),
        }
    }

    /// Returns the concrete value, or `None` while unbound.
    #[must_use]
    pub fn bound(&self) -> Option<&str> {
        match self {
            Self::Bound(value) => Some(value),
            Self::Variable(_) | Self::Glob(_) => None,
        }
    }
}

/// A validated request to parse one sentence against one dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRequest {
    sentence: Argument,
    dictionary: Argument,
}

impl ParseRequest {
    /// Builds a request from its argument atoms.
    ///
    /// The sentence must be a `PhraseNode`, `VariableNode`, or `GlobNode`;
    /// the dictionary must be an `LgDictNode`, `VariableNode`, or `GlobNode`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either argument has another kind.
    pub fn new(sentence: &Atom, dictionary: &Atom) -> Result<Self> {
        Ok(Self {
            sentence: Argument::classify(sentence, AtomType::PhraseNode, "sentence")?,
            dictionary: Argument::classify(dictionary, AtomType::LgDictNode, "dictionary")?,
        })
    }

    /// Builds a request from concrete values.
    #[must_use]
    pub fn phrase(text: impl Into<String>, dictionary: &Dictionary) -> Self {
        Self {
            sentence: Argument::Bound(text.into()),
            dictionary: Argument::Bound(dictionary.language().to_string()),
        }
    }

    /// Returns the sentence argument.
    #[must_use]
    pub const fn sentence(&self) -> &Argument {
        &self.sentence
    }

    /// Returns the dictionary argument.
    #[must_use]
    pub const fn dictionary(&self) -> &Argument {
        &self.dictionary
    }

    /// Returns the sentence text and dictionary when both are bound.
    #[must_use]
    pub fn resolve(&self) -> Option<(&str, Dictionary)> {
        let text = self.sentence.bound()?;
        let language = self.dictionary.bound()?;
        Some((text, Dictionary::new(language)))
    }
}
