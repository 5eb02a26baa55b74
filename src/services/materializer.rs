//! Linkage materialization.
//!
//! Turns one [`Linkage`] into the subgraph of one parse. The word pass
//! creates a word instance per position; the link pass creates the endpoint
//! pair, relation, link instance, and connector structure of every link.
//!
//! # Atoms Created Per Linkage
//!
//! | Pass | Atoms |
//! |------|-------|
//! | parse | `ParseNode` |
//! | per word | `WordInstanceNode`, `WordInstanceLink`, `WordNode`, `ReferenceLink`, `NumberNode`, `WordSequenceLink` |
//! | per link | `ListLink`, `LinkGrammarRelationshipNode`, 2 × `EvaluationLink`, `LgLinkInstanceNode`, `ReferenceLink`, 2 × (`LgConnectorNode`, `LgConnDirNode`, `LgConnector`), `LgLinkInstanceLink` |
//!
//! Word types, labels, connectors, and directions are shared across parses
//! through content addressing; instances embed the parse identity.

use crate::models::{AtomType, Handle, LEFT_DIRECTION, ParseId, RIGHT_DIRECTION};
use crate::parser::Linkage;
use crate::services::WordSequence;
use crate::storage::AtomStore;
use crate::{Error, Result};
use std::collections::HashSet;

/// Checks that every link endpoint of `linkage` is a word index.
///
/// # Errors
///
/// Returns [`Error::LinkageIndexOutOfRange`] for the first offending endpoint.
pub fn validate_linkage(linkage: &dyn Linkage) -> Result<()> {
    let word_count = linkage.word_count();
    for link in 0..linkage.link_count() {
        for endpoint in [linkage.link_left(link), linkage.link_right(link)] {
            if endpoint >= word_count {
                return Err(Error::LinkageIndexOutOfRange {
                    link,
                    endpoint,
                    word_count,
                });
            }
        }
    }
    Ok(())
}

/// Builds parse subgraphs in an [`AtomStore`].
pub struct LinkageMaterializer<'a, S: AtomStore + ?Sized> {
    store: &'a S,
    sequence: &'a WordSequence,
}

impl<'a, S: AtomStore + ?Sized> LinkageMaterializer<'a, S> {
    /// Creates a materializer writing to `store` and stamping words from `sequence`.
    pub const fn new(store: &'a S, sequence: &'a WordSequence) -> Self {
        Self { store, sequence }
    }

    /// Materializes `linkage` as parse `parse` and returns the parse node.
    ///
    /// Words and links are processed in the parser's order, so marker values
    /// and link-instance suffixes follow sentence order and link precedence.
    /// An empty linkage still yields its parse node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LinkageIndexOutOfRange`] if any link endpoint is not a
    /// word index; this is checked before anything is written. Store failures
    /// are propagated.
    pub fn materialize_linkage(&self, linkage: &dyn Linkage, parse: &ParseId) -> Result<Handle> {
        validate_linkage(linkage)?;

        let parse_node = self
            .store
            .insert_node(AtomType::ParseNode, &parse.to_string())?;

        let words = self.materialize_words(linkage, parse, parse_node)?;
        self.materialize_links(linkage, parse, &words)?;

        metrics::counter!("linkgraph_words_materialized_total").increment(words.len() as u64);
        metrics::counter!("linkgraph_links_materialized_total")
            .increment(linkage.link_count() as u64);
        tracing::debug!(
            parse = %parse,
            words = words.len(),
            links = linkage.link_count(),
            "Materialized linkage"
        );

        Ok(parse_node)
    }

    /// Word pass. Returns word-instance handles indexed by position.
    fn materialize_words(
        &self,
        linkage: &dyn Linkage,
        parse: &ParseId,
        parse_node: Handle,
    ) -> Result<Vec<Handle>> {
        let word_count = linkage.word_count();
        let mut words = Vec::with_capacity(word_count);
        let mut seen: HashSet<&str> = HashSet::with_capacity(word_count);

        for position in 0..word_count {
            let surface = linkage.word_text(position);
            let name = if seen.insert(surface) {
                parse.word(surface).to_string()
            } else {
                parse.repeated_word(surface, position).to_string()
            };

            let instance = self.store.insert_node(AtomType::WordInstanceNode, &name)?;
            self.store
                .insert_link(AtomType::WordInstanceLink, &[instance, parse_node])?;

            let word = self.store.insert_node(AtomType::WordNode, surface)?;
            self.store
                .insert_link(AtomType::ReferenceLink, &[instance, word])?;

            let marker = self
                .store
                .insert_node(AtomType::NumberNode, &self.sequence.next().to_string())?;
            self.store
                .insert_link(AtomType::WordSequenceLink, &[instance, marker])?;

            words.push(instance);
        }

        Ok(words)
    }

    /// Link pass.
    fn materialize_links(
        &self,
        linkage: &dyn Linkage,
        parse: &ParseId,
        words: &[Handle],
    ) -> Result<()> {
        for index in 0..linkage.link_count() {
            let endpoints = self.store.insert_link(
                AtomType::ListLink,
                &[words[linkage.link_left(index)], words[linkage.link_right(index)]],
            )?;

            let label = linkage.link_label(index);
            let relation = self
                .store
                .insert_node(AtomType::LinkGrammarRelationshipNode, label)?;
            self.store
                .insert_link(AtomType::EvaluationLink, &[relation, endpoints])?;

            let instance = self.store.insert_node(
                AtomType::LgLinkInstanceNode,
                &parse.link(label, index).to_string(),
            )?;
            self.store
                .insert_link(AtomType::EvaluationLink, &[instance, endpoints])?;
            self.store
                .insert_link(AtomType::ReferenceLink, &[instance, relation])?;

            let left = self.connector(linkage.link_left_connector(index), LEFT_DIRECTION)?;
            let right = self.connector(linkage.link_right_connector(index), RIGHT_DIRECTION)?;
            self.store
                .insert_link(AtomType::LgLinkInstanceLink, &[instance, left, right])?;
        }

        Ok(())
    }

    fn connector(&self, connector: &str, direction: &str) -> Result<Handle> {
        let connector = self.store.insert_node(AtomType::LgConnectorNode, connector)?;
        let direction = self.store.insert_node(AtomType::LgConnDirNode, direction)?;
        self.store
            .insert_link(AtomType::LgConnector, &[connector, direction])
    }
}
