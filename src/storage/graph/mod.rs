//! Atom store backends for the content-addressed graph.
//!
//! This module provides implementations of the [`AtomStore`] trait.
//!
//! # Available Backends
//!
//! | Backend | Use Case | Features |
//! |---------|----------|----------|
//! | [`SqliteAtomStore`] | Default; persistent | Handle-keyed rows, incoming index |
//! | [`InMemoryAtomStore`] | Testing | Fast, no persistence |
//!
//! # Example
//!
//! ```rust,ignore
//! use linkgraph::storage::graph::SqliteAtomStore;
//! use linkgraph::storage::traits::AtomStore;
//! use linkgraph::models::AtomType;
//!
//! let store = SqliteAtomStore::new("atoms.db")?;
//! let cat = store.insert_node(AtomType::WordNode, "cat")?;
//! let reference = store.insert_link(AtomType::ReferenceLink, &[cat])?;
//! ```

mod memory;
mod sqlite;

pub use memory::InMemoryAtomStore;
pub use sqlite::SqliteAtomStore;

pub use crate::storage::traits::graph::{AtomStore, StoreStats};

use crate::models::AtomType;
use crate::{Error, Result};

fn check_node_type(atom_type: AtomType) -> Result<()> {
    if atom_type.is_node() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{atom_type} is a link type, not a node type"
        )))
    }
}

fn check_link_type(atom_type: AtomType) -> Result<()> {
    if atom_type.is_link() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{atom_type} is a node type, not a link type"
        )))
    }
}
