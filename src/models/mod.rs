//! Data models for linkgraph.
//!
//! This module contains the atom model, the structured identities used to
//! name per-parse atoms, and parse request validation.

mod atom;
mod identity;
mod request;

pub use atom::{Atom, AtomType, Handle};
pub use identity::{LinkInstanceId, ParseId, SENTENCE_PREFIX, SentenceId, WordInstanceId};
pub use request::{Argument, ParseRequest};

/// Maximum number of linkages materialized per sentence.
///
/// Linkages past this bound are discarded regardless of rank.
pub const MAX_LINKAGES: usize = 4;

/// Name of the left-facing connector direction node.
pub const LEFT_DIRECTION: &str = "-";

/// Name of the right-facing connector direction node.
pub const RIGHT_DIRECTION: &str = "+";
