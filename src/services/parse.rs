//! Parse orchestration.
//!
//! [`ParseService`] drives one parse request end to end: open a session,
//! parse, keep at most [`MAX_LINKAGES`] linkages, create the sentence node,
//! and materialize each kept linkage as a parse attached to it.
//!
//! # Outcomes
//!
//! | Parser outcome | Result | Store |
//! |----------------|--------|-------|
//! | no session | `Ok(None)` | unchanged |
//! | negative count | `Ok(None)` | unchanged |
//! | zero linkages | `Ok(None)` | unchanged |
//! | bad link endpoint | `Err(LinkageIndexOutOfRange)` | unchanged |
//! | `n` linkages | `Ok(Some(sentence))` | `min(n, 4)` parses |
//!
//! Sessions and linkages are released when they go out of scope, on every
//! path above.

use crate::models::{AtomType, Handle, MAX_LINKAGES, ParseRequest, SentenceId};
use crate::parser::{Dictionary, Parser};
use crate::services::materializer::validate_linkage;
use crate::services::{LinkageMaterializer, WordSequence, global_word_sequence};
use crate::storage::AtomStore;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Materializes parses of sentences into an [`AtomStore`].
pub struct ParseService<P: Parser, S: AtomStore + ?Sized> {
    parser: P,
    store: Arc<S>,
    sequence: Arc<WordSequence>,
}

impl<P: Parser, S: AtomStore + ?Sized> ParseService<P, S> {
    /// Creates a service stamping words from the process-wide sequence.
    ///
    /// The sequence is advanced past the largest marker already in the store,
    /// so markers keep increasing across restarts.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    pub fn new(parser: P, store: Arc<S>) -> Result<Self> {
        Self::with_sequence(parser, store, global_word_sequence())
    }

    /// Creates a service stamping words from `sequence`.
    ///
    /// `sequence` is advanced past the largest marker already in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    pub fn with_sequence(parser: P, store: Arc<S>, sequence: Arc<WordSequence>) -> Result<Self> {
        if let Some(last) = store.max_number()? {
            tracing::debug!(last, "Advancing word sequence past stored markers");
            sequence.advance_past(last);
        }
        Ok(Self {
            parser,
            store,
            sequence,
        })
    }

    /// Returns the parser.
    #[must_use]
    pub const fn parser(&self) -> &P {
        &self.parser
    }

    /// Returns the store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the word sequence.
    #[must_use]
    pub const fn sequence(&self) -> &Arc<WordSequence> {
        &self.sequence
    }

    /// Runs a validated request.
    ///
    /// Returns `Ok(None)` when either argument is still unbound.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::materialize_parse`].
    pub fn execute(&self, request: &ParseRequest) -> Result<Option<Handle>> {
        let Some((text, dictionary)) = request.resolve() else {
            record_no_result("unbound_argument");
            return Ok(None);
        };
        self.materialize_parse(text, &dictionary)
    }

    /// Parses `text` against `dictionary` and materializes up to
    /// [`MAX_LINKAGES`] linkages.
    ///
    /// Returns the sentence node, or `None` if the parser produced nothing.
    /// Nothing is written to the store unless a sentence node is returned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LinkageIndexOutOfRange`] if the parser emits a
    /// link whose endpoint is not a word index, or a store error.
    #[instrument(
        skip(self, text),
        fields(operation = "parse.materialize", dictionary = %dictionary, chars = text.len())
    )]
    pub fn materialize_parse(&self, text: &str, dictionary: &Dictionary) -> Result<Option<Handle>> {
        let start = Instant::now();
        let result = self.materialize_parse_inner(text, dictionary);

        let status = match &result {
            Ok(Some(_)) => "materialized",
            Ok(None) => "no_result",
            Err(_) => "error",
        };
        metrics::histogram!("linkgraph_materialize_duration_ms", "status" => status)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        result
    }

    fn materialize_parse_inner(
        &self,
        text: &str,
        dictionary: &Dictionary,
    ) -> Result<Option<Handle>> {
        let options = self.parser.create_options();

        let Some(mut session) = self.parser.create_sentence(text, dictionary) else {
            tracing::debug!("Parser returned no session");
            record_no_result("session_unavailable");
            return Ok(None);
        };

        let available = match usize::try_from(session.parse(&options)) {
            Ok(0) => {
                tracing::debug!("Parse found no linkages");
                record_no_result("no_linkages");
                return Ok(None);
            },
            Ok(count) => count,
            Err(_) => {
                tracing::debug!("Parse setup failed");
                record_no_result("parse_failed");
                return Ok(None);
            },
        };

        let kept = available.min(MAX_LINKAGES);
        if available > kept {
            tracing::debug!(available, kept, "Discarding lower-ranked linkages");
        }

        let linkages = (0..kept)
            .map(|index| session.linkage(index, &options))
            .collect::<Result<Vec<_>>>()?;
        for linkage in &linkages {
            validate_linkage(linkage.as_ref())?;
        }

        let sentence = SentenceId::generate();
        let sentence_node = self
            .store
            .insert_node(AtomType::SentenceNode, &sentence.to_string())?;

        let materializer = LinkageMaterializer::new(self.store.as_ref(), &self.sequence);
        for (index, linkage) in linkages.iter().enumerate() {
            let parse_node =
                materializer.materialize_linkage(linkage.as_ref(), &sentence.parse(index))?;
            self.store
                .insert_link(AtomType::ParseLink, &[parse_node, sentence_node])?;
        }

        metrics::counter!("linkgraph_sentences_materialized_total").increment(1);
        metrics::counter!("linkgraph_parses_materialized_total").increment(kept as u64);
        tracing::info!(sentence = %sentence, parses = kept, "Materialized sentence");

        Ok(Some(sentence_node))
    }
}

fn record_no_result(reason: &'static str) {
    metrics::counter!("linkgraph_no_result_total", "reason" => reason).increment(1);
}
