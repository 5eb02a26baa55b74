//! In-memory atom store for testing.
//!
//! Provides a fast, non-persistent implementation of [`AtomStore`] for use
//! in unit tests and development scenarios.

use super::{check_link_type, check_node_type};
use crate::models::{Atom, AtomType, Handle};
use crate::storage::traits::graph::{AtomStore, StoreStats};
use crate::{Error, Result};
use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct MemoryState {
    atoms: HashMap<Handle, Atom>,
    incoming: HashMap<Handle, BTreeSet<Handle>>,
}

/// In-memory atom store.
///
/// Uses a single `RwLock` so that the lookup and insert for one handle
/// happen atomically. Data is not persisted between runs.
///
/// # Example
///
/// ```rust
/// use linkgraph::models::AtomType;
/// use linkgraph::storage::{AtomStore, InMemoryAtomStore};
///
/// let store = InMemoryAtomStore::new();
/// let a = store.insert_node(AtomType::WordNode, "cat").unwrap();
/// let b = store.insert_node(AtomType::WordNode, "cat").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(store.atom_count().unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryAtomStore {
    state: RwLock<MemoryState>,
}

impl InMemoryAtomStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of atoms stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn atom_count(&self) -> Result<usize> {
        Ok(self.read("atom_count")?.atoms.len())
    }

    /// Returns `true` if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read("is_empty")?.atoms.is_empty())
    }

    fn read(&self, operation: &str) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| Error::operation(operation, "Lock poisoned"))
    }

    fn write(&self, operation: &str) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| Error::operation(operation, "Lock poisoned"))
    }

    fn sorted(mut atoms: Vec<(Handle, Atom)>) -> Vec<Atom> {
        atoms.sort_by_key(|(handle, _)| *handle);
        atoms.into_iter().map(|(_, atom)| atom).collect()
    }
}

impl AtomStore for InMemoryAtomStore {
    fn insert_node(&self, atom_type: AtomType, name: &str) -> Result<Handle> {
        check_node_type(atom_type)?;
        let handle = Handle::for_node(atom_type, name);

        let mut state = self.write("insert_node")?;
        state
            .atoms
            .entry(handle)
            .or_insert_with(|| Atom::node(atom_type, name));
        Ok(handle)
    }

    fn insert_link(&self, atom_type: AtomType, outgoing: &[Handle]) -> Result<Handle> {
        check_link_type(atom_type)?;
        let handle = Handle::for_link(atom_type, outgoing);

        let mut state = self.write("insert_link")?;
        if state.atoms.contains_key(&handle) {
            return Ok(handle);
        }
        if let Some(missing) = outgoing.iter().find(|h| !state.atoms.contains_key(*h)) {
            return Err(Error::InvalidInput(format!(
                "{atom_type} references unknown atom {missing}"
            )));
        }

        state
            .atoms
            .insert(handle, Atom::link(atom_type, outgoing.to_vec()));
        for target in outgoing {
            state.incoming.entry(*target).or_default().insert(handle);
        }
        Ok(handle)
    }

    fn get_atom(&self, handle: &Handle) -> Result<Option<Atom>> {
        let state = self.read("get_atom")?;
        Ok(state.atoms.get(handle).cloned())
    }

    fn atoms_of_type(&self, atom_type: AtomType) -> Result<Vec<Atom>> {
        let state = self.read("atoms_of_type")?;
        let matching = state
            .atoms
            .iter()
            .filter(|(_, atom)| atom.atom_type() == atom_type)
            .map(|(handle, atom)| (*handle, atom.clone()))
            .collect();
        Ok(Self::sorted(matching))
    }

    fn incoming(&self, handle: &Handle) -> Result<Vec<Atom>> {
        let state = self.read("incoming")?;
        // BTreeSet iteration is already ordered by handle.
        Ok(state
            .incoming
            .get(handle)
            .into_iter()
            .flatten()
            .filter_map(|h| state.atoms.get(h).cloned())
            .collect())
    }

    fn max_number(&self) -> Result<Option<u64>> {
        let state = self.read("max_number")?;
        Ok(state
            .atoms
            .values()
            .filter(|atom| atom.atom_type() == AtomType::NumberNode)
            .filter_map(|atom| atom.name().and_then(|n| n.parse::<u64>().ok()))
            .max())
    }

    fn stats(&self) -> Result<StoreStats> {
        let state = self.read("stats")?;
        let mut stats = StoreStats::default();
        for atom in state.atoms.values() {
            stats.record(atom.atom_type(), 1);
        }
        Ok(stats)
    }

    fn contains(&self, handle: &Handle) -> Result<bool> {
        let state = self.read("contains")?;
        Ok(state.atoms.contains_key(handle))
    }
}
