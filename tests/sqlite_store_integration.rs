//! `SQLite` atom store integration tests.
//!
//! Materializes into a database file, reopens it, and checks that handles,
//! counts, and the word-order sequence survive the restart.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use linkgraph::config::{StoreBackend, StoreConfig};
use linkgraph::parser::{FixtureParser, ParsedLinkage};
use linkgraph::storage::open_store;
use linkgraph::{AtomStore, AtomType, Dictionary, ParseService, SqliteAtomStore, WordSequence};
use std::sync::Arc;
use tempfile::TempDir;

fn parser() -> FixtureParser {
    FixtureParser::new(&Dictionary::new("en")).with_sentence(
        "the cat sat",
        vec![
            ParsedLinkage::new(["the", "cat", "sat"])
                .with_link(0, 1, "Ds", "D", "Ds")
                .with_link(1, 2, "Ss", "Ss", "S"),
        ],
    )
}

#[test]
fn test_materialized_graph_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atoms.sqlite");

    let (sentence, before) = {
        let store = Arc::new(SqliteAtomStore::new(&path).unwrap());
        let service =
            ParseService::with_sequence(parser(), store, Arc::new(WordSequence::new())).unwrap();
        let sentence = service
            .materialize_parse("the cat sat", &Dictionary::new("en"))
            .unwrap()
            .unwrap();
        (sentence, service.store().stats().unwrap())
    };

    let reopened = SqliteAtomStore::new(&path).unwrap();
    assert_eq!(reopened.stats().unwrap(), before);
    let atom = reopened.get_atom(&sentence).unwrap().unwrap();
    assert_eq!(atom.atom_type(), AtomType::SentenceNode);
    assert_eq!(reopened.max_number().unwrap(), Some(3));
}

#[test]
fn test_fresh_sequence_continues_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atoms.sqlite");

    {
        let store = Arc::new(SqliteAtomStore::new(&path).unwrap());
        let service =
            ParseService::with_sequence(parser(), store, Arc::new(WordSequence::new())).unwrap();
        service
            .materialize_parse("the cat sat", &Dictionary::new("en"))
            .unwrap();
    }

    // A second process starts its own sequence from zero.
    let store = Arc::new(SqliteAtomStore::new(&path).unwrap());
    let service =
        ParseService::with_sequence(parser(), store, Arc::new(WordSequence::new())).unwrap();
    service
        .materialize_parse("the cat sat", &Dictionary::new("en"))
        .unwrap();

    let markers: Vec<u64> = service
        .store()
        .atoms_of_type(AtomType::NumberNode)
        .unwrap()
        .iter()
        .map(|n| n.name().unwrap().parse().unwrap())
        .collect();
    assert_eq!(markers.len(), 6);
    assert_eq!(markers.iter().filter(|m| **m > 3).count(), 3);
}

#[test]
fn test_process_sequence_never_reuses_stored_markers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atoms.sqlite");

    {
        let store = Arc::new(SqliteAtomStore::new(&path).unwrap());
        let service =
            ParseService::with_sequence(parser(), store, Arc::new(WordSequence::new())).unwrap();
        service
            .materialize_parse("the cat sat", &Dictionary::new("en"))
            .unwrap();
    }

    let store = Arc::new(SqliteAtomStore::new(&path).unwrap());
    let service = ParseService::new(parser(), store).unwrap();
    service
        .materialize_parse("the cat sat", &Dictionary::new("en"))
        .unwrap();

    let stats = service.store().stats().unwrap();
    assert_eq!(stats.count(AtomType::WordInstanceNode), 6);
    assert_eq!(
        stats.count(AtomType::NumberNode),
        stats.count(AtomType::WordSequenceLink)
    );
}

#[test]
fn test_open_store_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig {
        backend: StoreBackend::Sqlite,
        path: temp_dir.path().join("nested").join("atoms.sqlite"),
    };

    let store = open_store(&config).unwrap();
    store.insert_node(AtomType::WordNode, "cat").unwrap();
    drop(store);

    assert!(config.path.exists());
    let reopened = open_store(&config).unwrap();
    assert_eq!(reopened.stats().unwrap().count(AtomType::WordNode), 1);
}

#[test]
fn test_memory_backend_from_config() {
    let config = StoreConfig {
        backend: StoreBackend::Memory,
        path: "unused".into(),
    };

    let store = open_store(&config).unwrap();
    assert_eq!(store.stats().unwrap().total(), 0);
}

#[test]
fn test_dyn_store_service() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig {
        backend: StoreBackend::Sqlite,
        path: temp_dir.path().join("atoms.sqlite"),
    };

    let store = open_store(&config).unwrap();
    let service =
        ParseService::with_sequence(parser(), store, Arc::new(WordSequence::new())).unwrap();

    assert!(
        service
            .materialize_parse("the cat sat", &Dictionary::new("en"))
            .unwrap()
            .is_some()
    );
    assert_eq!(
        service.store().stats().unwrap().count(AtomType::WordInstanceNode),
        3
    );
}
