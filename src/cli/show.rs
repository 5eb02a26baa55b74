//! Show CLI command.

use super::write_error;
use crate::models::Handle;
use crate::storage::AtomStore;
use crate::{Error, Result};
use std::io::Write;

/// Show command handler.
#[derive(Debug, Clone)]
pub struct ShowCommand {
    handle: Handle,
}

impl ShowCommand {
    /// Creates a show command from a hex handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `handle` is not 64 hex characters.
    pub fn parse(handle: &str) -> Result<Self> {
        Ok(Self {
            handle: Handle::parse_hex(handle)?,
        })
    }

    /// Writes the atom, its outgoing set, and the links that point at it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no atom has the handle, or an error
    /// if the store cannot be read or writing fails.
    pub fn run<S: AtomStore + ?Sized>(&self, store: &S, out: &mut impl Write) -> Result<()> {
        let atom = store
            .get_atom(&self.handle)?
            .ok_or_else(|| Error::InvalidInput(format!("no atom with handle {}", self.handle)))?;

        writeln!(out, "{atom}").map_err(write_error)?;
        writeln!(out, "Handle: {}", self.handle).map_err(write_error)?;

        if !atom.outgoing().is_empty() {
            writeln!(out, "Outgoing:").map_err(write_error)?;
            for target in atom.outgoing() {
                match store.get_atom(target)? {
                    Some(target_atom) => writeln!(out, "  {target_atom}"),
                    None => writeln!(out, "  {target} (missing)"),
                }
                .map_err(write_error)?;
            }
        }

        let incoming = store.incoming(&self.handle)?;
        if !incoming.is_empty() {
            writeln!(out, "Incoming:").map_err(write_error)?;
            for link in incoming {
                writeln!(out, "  {link}").map_err(write_error)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AtomType;
    use crate::storage::InMemoryAtomStore;

    #[test]
    fn test_shows_node_and_incoming() {
        let store = InMemoryAtomStore::new();
        let cat = store.insert_node(AtomType::WordNode, "cat").unwrap();
        let sat = store.insert_node(AtomType::WordNode, "sat").unwrap();
        store.insert_link(AtomType::ListLink, &[cat, sat]).unwrap();
        let mut out = Vec::new();

        ShowCommand::parse(&cat.to_hex())
            .unwrap()
            .run(&store, &mut out)
            .unwrap();

        let report = String::from_utf8(out).unwrap();
        assert!(report.starts_with("(WordNode \"cat\")\n"));
        assert!(report.contains("Incoming:\n  (ListLink"));
    }

    #[test]
    fn test_shows_link_outgoing() {
        let store = InMemoryAtomStore::new();
        let cat = store.insert_node(AtomType::WordNode, "cat").unwrap();
        let list = store.insert_link(AtomType::ListLink, &[cat]).unwrap();
        let mut out = Vec::new();

        ShowCommand::parse(&list.to_hex())
            .unwrap()
            .run(&store, &mut out)
            .unwrap();

        assert!(String::from_utf8(out).unwrap().contains("Outgoing:\n  (WordNode \"cat\")\n"));
    }

    #[test]
    fn test_unknown_handle() {
        let store = InMemoryAtomStore::new();
        let command = ShowCommand::parse(&"0".repeat(64)).unwrap();
        assert!(matches!(
            command.run(&store, &mut Vec::new()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_hex() {
        assert!(ShowCommand::parse("not-a-handle").is_err());
    }
}
