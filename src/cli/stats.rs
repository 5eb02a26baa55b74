//! Stats CLI command.

use super::write_error;
use crate::storage::AtomStore;
use crate::{Error, Result};
use std::io::Write;

/// Stats command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsCommand {
    json: bool,
}

impl StatsCommand {
    /// Creates a stats command; `json` selects machine-readable output.
    #[must_use]
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Writes atom counts for `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or writing fails.
    pub fn run<S: AtomStore + ?Sized>(&self, store: &S, out: &mut impl Write) -> Result<()> {
        let stats = store.stats()?;

        if self.json {
            let json = serde_json::to_string_pretty(&stats).map_err(|e| Error::OperationFailed {
                operation: "serialize_stats".to_string(),
                cause: e.to_string(),
            })?;
            return writeln!(out, "{json}").map_err(write_error);
        }

        writeln!(out, "Atom Store").map_err(write_error)?;
        writeln!(out, "==========").map_err(write_error)?;
        writeln!(out, "Nodes: {}", stats.node_count).map_err(write_error)?;
        writeln!(out, "Links: {}", stats.link_count).map_err(write_error)?;
        if !stats.by_type.is_empty() {
            writeln!(out).map_err(write_error)?;
            for (atom_type, count) in &stats.by_type {
                writeln!(out, "  {atom_type}: {count}").map_err(write_error)?;
            }
        }

        Ok(())
    }
}
