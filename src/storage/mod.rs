//! Storage layer for the atom graph.
//!
//! The [`AtomStore`] trait is the only seam the services talk to. Backends
//! live under [`graph`]; [`open_store`] picks one from configuration.

pub mod graph;
pub mod traits;

pub use graph::{InMemoryAtomStore, SqliteAtomStore};
pub use traits::{AtomStore, StoreStats};

use crate::Result;
use crate::config::{StoreBackend, StoreConfig};
use std::sync::Arc;

/// Opens the store described by `config`.
///
/// # Errors
///
/// Returns an error if the `SQLite` database cannot be opened.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn AtomStore>> {
    match config.backend {
        StoreBackend::Sqlite => {
            tracing::debug!(path = %config.path.display(), "Opening SQLite atom store");
            Ok(Arc::new(SqliteAtomStore::new(&config.path)?))
        },
        StoreBackend::Memory => {
            tracing::debug!("Using in-memory atom store");
            Ok(Arc::new(InMemoryAtomStore::new()))
        },
    }
}
