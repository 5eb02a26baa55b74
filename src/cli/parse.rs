//! Parse CLI command.

use super::write_error;
use crate::Result;
use crate::parser::{Dictionary, Parser};
use crate::services::ParseService;
use crate::storage::AtomStore;
use std::io::Write;

/// Parse command handler.
#[derive(Debug, Clone)]
pub struct ParseCommand {
    sentence: String,
    dictionary: Dictionary,
}

impl ParseCommand {
    /// Creates a parse command for `sentence` against `dictionary`.
    #[must_use]
    pub fn new(sentence: impl Into<String>, dictionary: Dictionary) -> Self {
        Self {
            sentence: sentence.into(),
            dictionary,
        }
    }

    /// Materializes the sentence and reports the sentence node and the atoms
    /// it added.
    ///
    /// # Errors
    ///
    /// Returns an error if materialization or writing the report fails.
    pub fn run<P, S>(&self, service: &ParseService<P, S>, out: &mut impl Write) -> Result<()>
    where
        P: Parser,
        S: AtomStore + ?Sized,
    {
        let before = service.store().stats()?;

        let Some(sentence) = service.materialize_parse(&self.sentence, &self.dictionary)? else {
            writeln!(out, "No result for \"{}\"", self.sentence).map_err(write_error)?;
            return Ok(());
        };

        let after = service.store().stats()?;
        let name = service
            .store()
            .get_atom(&sentence)?
            .and_then(|atom| atom.name().map(str::to_string))
            .unwrap_or_default();

        writeln!(out, "Sentence: {name}").map_err(write_error)?;
        writeln!(out, "Handle: {sentence}").map_err(write_error)?;
        writeln!(out, "Added {} atoms:", after.total() - before.total()).map_err(write_error)?;
        for (atom_type, count) in after.delta_since(&before) {
            writeln!(out, "  {atom_type}: {count}").map_err(write_error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{FixtureParser, ParsedLinkage};
    use crate::services::WordSequence;
    use crate::storage::InMemoryAtomStore;
    use std::sync::Arc;

    fn service() -> ParseService<FixtureParser, InMemoryAtomStore> {
        let parser = FixtureParser::new(&Dictionary::new("en")).with_sentence(
            "cat sat",
            vec![ParsedLinkage::new(["cat", "sat"]).with_link(0, 1, "Ss", "Ss", "S")],
        );
        ParseService::with_sequence(
            parser,
            Arc::new(InMemoryAtomStore::new()),
            Arc::new(WordSequence::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_reports_sentence_and_delta() {
        let service = service();
        let mut out = Vec::new();

        ParseCommand::new("cat sat", Dictionary::new("en"))
            .run(&service, &mut out)
            .unwrap();

        let report = String::from_utf8(out).unwrap();
        assert!(report.starts_with("Sentence: sentence@"));
        assert!(report.contains("  WordInstanceNode: 2\n"));
        assert!(report.contains("  ParseLink: 1\n"));
    }

    #[test]
    fn test_reports_no_result() {
        let service = service();
        let mut out = Vec::new();

        ParseCommand::new("unknown", Dictionary::new("en"))
            .run(&service, &mut out)
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "No result for \"unknown\"\n");
    }
}
