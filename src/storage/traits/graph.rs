//! Atom store trait for the content-addressed graph.
//!
//! # Available Implementations
//!
//! | Backend | Use Case | Features |
//! |---------|----------|----------|
//! | `SqliteAtomStore` | Default; persistent | WAL, `INSERT OR IGNORE` on handle |
//! | `InMemoryAtomStore` | Testing | Fast, no persistence |
//!
//! # Deduplication Contract
//!
//! Inserts are idempotent. Calling [`AtomStore::insert_node`] twice with the
//! same `(type, name)` returns the same [`Handle`] and stores one atom;
//! [`AtomStore::insert_link`] behaves the same on `(type, outgoing)`.
//! Concurrent inserts of the same content are serialized by the backend, so
//! every caller observes the same handle and exactly one atom exists.
//!
//! # Error Modes
//!
//! | Operation | Fails When |
//! |-----------|------------|
//! | `insert_node` | Link type given, backend failure |
//! | `insert_link` | Node type given, outgoing handle not stored, backend failure |
//! | queries | Backend failure only; absence is `None` or empty |

use crate::Result;
use crate::models::{Atom, AtomType, Handle};
use serde::Serialize;
use std::collections::BTreeMap;

/// Trait for atom store backends.
///
/// # Implementor Notes
///
/// - Methods use `&self` to enable sharing via `Arc<dyn AtomStore>`
/// - Use interior mutability (e.g., `Mutex<Connection>`) for mutable state
/// - The lookup-or-insert for one handle must happen under one lock or transaction
pub trait AtomStore: Send + Sync {
    /// Inserts a node, or returns the existing one with the same content.
    ///
    /// # Errors
    ///
    /// Returns an error if `atom_type` is a link type or the backend fails.
    fn insert_node(&self, atom_type: AtomType, name: &str) -> Result<Handle>;

    /// Inserts a link, or returns the existing one with the same content.
    ///
    /// # Errors
    ///
    /// Returns an error if `atom_type` is a node type, any outgoing handle is
    /// not in the store, or the backend fails.
    fn insert_link(&self, atom_type: AtomType, outgoing: &[Handle]) -> Result<Handle>;

    /// Retrieves an atom by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup operation fails.
    fn get_atom(&self, handle: &Handle) -> Result<Option<Atom>>;

    /// Returns all atoms of one type, ordered by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the query operation fails.
    fn atoms_of_type(&self, atom_type: AtomType) -> Result<Vec<Atom>>;

    /// Returns every link whose outgoing set contains `handle`, ordered by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the query operation fails.
    fn incoming(&self, handle: &Handle) -> Result<Vec<Atom>>;

    /// Returns the highest value held by a `NumberNode`, if any.
    ///
    /// Used to resume the word-order sequence over a persistent store.
    ///
    /// # Errors
    ///
    /// Returns an error if the query operation fails.
    fn max_number(&self) -> Result<Option<u64>>;

    /// Returns atom counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics query fails.
    fn stats(&self) -> Result<StoreStats>;

    /// Returns `true` if the store holds `handle`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup operation fails.
    fn contains(&self, handle: &Handle) -> Result<bool> {
        Ok(self.get_atom(handle)?.is_some())
    }
}

/// Atom counts for a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total number of nodes.
    pub node_count: usize,
    /// Total number of links.
    pub link_count: usize,
    /// Counts keyed by atom type name.
    pub by_type: BTreeMap<String, usize>,
}

impl StoreStats {
    /// Returns the count for one atom type.
    #[must_use]
    pub fn count(&self, atom_type: AtomType) -> usize {
        self.by_type.get(atom_type.as_str()).copied().unwrap_or(0)
    }

    /// Returns the total number of atoms.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.node_count + self.link_count
    }

    /// Records one atom of `atom_type`.
    pub(crate) fn record(&mut self, atom_type: AtomType, count: usize) {
        if atom_type.is_node() {
            self.node_count += count;
        } else {
            self.link_count += count;
        }
        *self.by_type.entry(atom_type.as_str().to_string()).or_insert(0) += count;
    }

    /// Returns per-type growth from `before` to `self`, omitting unchanged types.
    #[must_use]
    pub fn delta_since(&self, before: &Self) -> BTreeMap<String, usize> {
        self.by_type
            .iter()
            .filter_map(|(name, count)| {
                let prior = before.by_type.get(name).copied().unwrap_or(0);
                (*count > prior).then(|| (name.clone(), count - prior))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_record_and_count() {
        let mut stats = StoreStats::default();
        stats.record(AtomType::WordNode, 3);
        stats.record(AtomType::ListLink, 2);

        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.link_count, 2);
        assert_eq!(stats.total(), 5);
        assert_eq!(stats.count(AtomType::WordNode), 3);
        assert_eq!(stats.count(AtomType::ParseNode), 0);
    }

    #[test]
    fn test_stats_delta() {
        let mut before = StoreStats::default();
        before.record(AtomType::WordNode, 2);
        let mut after = before.clone();
        after.record(AtomType::WordNode, 1);
        after.record(AtomType::ParseNode, 1);

        let delta = after.delta_since(&before);
        assert_eq!(delta.get("WordNode"), Some(&1));
        assert_eq!(delta.get("ParseNode"), Some(&1));
        assert_eq!(delta.len(), 2);
    }
}
