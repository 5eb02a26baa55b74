//! Parse materialization integration tests.
//!
//! Drives [`ParseService`] end to end through the fixture parser and checks
//! the resulting graph shape, linkage clamping, zero-result safety, resource
//! release, and index-fault handling.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use linkgraph::models::{LEFT_DIRECTION, MAX_LINKAGES, RIGHT_DIRECTION};
use linkgraph::parser::{FixtureParser, ParsedLinkage};
use linkgraph::{
    Atom, AtomStore, AtomType, Dictionary, Error, Handle, InMemoryAtomStore, ParseRequest,
    ParseService, WordSequence,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

fn english() -> Dictionary {
    Dictionary::new("en")
}

fn the_cat_sat() -> ParsedLinkage {
    ParsedLinkage::new(["the", "cat", "sat"])
        .with_link(0, 1, "Ds", "D", "Ds")
        .with_link(1, 2, "Sp", "Sp", "S")
}

fn service_with(parser: FixtureParser) -> ParseService<FixtureParser, InMemoryAtomStore> {
    ParseService::with_sequence(
        parser,
        Arc::new(InMemoryAtomStore::new()),
        Arc::new(WordSequence::new()),
    )
    .unwrap()
}

fn parse_nodes_of(store: &InMemoryAtomStore, sentence: &Handle) -> Vec<Atom> {
    store
        .incoming(sentence)
        .unwrap()
        .into_iter()
        .filter(|link| link.atom_type() == AtomType::ParseLink)
        .map(|link| store.get_atom(&link.outgoing()[0]).unwrap().unwrap())
        .collect()
}

#[test]
fn test_the_cat_sat_scenario() {
    let service =
        service_with(FixtureParser::new(&english()).with_sentence("the cat sat", vec![the_cat_sat()]));

    let sentence = service
        .materialize_parse("the cat sat", &english())
        .unwrap()
        .expect("sentence node");

    let store = service.store();
    let stats = store.stats().unwrap();
    assert_eq!(stats.count(AtomType::SentenceNode), 1);
    assert_eq!(stats.count(AtomType::ParseNode), 1);
    assert_eq!(stats.count(AtomType::WordInstanceNode), 3);
    assert_eq!(stats.count(AtomType::WordNode), 3);
    assert_eq!(stats.count(AtomType::LgLinkInstanceNode), 2);
    assert_eq!(stats.count(AtomType::ListLink), 2);
    // One relation evaluation and one link-instance evaluation per link.
    assert_eq!(stats.count(AtomType::EvaluationLink), 4);
    // D, Ds, Sp, S.
    assert_eq!(stats.count(AtomType::LgConnectorNode), 4);
    assert_eq!(stats.count(AtomType::LgConnDirNode), 2);

    for direction in [LEFT_DIRECTION, RIGHT_DIRECTION] {
        assert!(
            store
                .contains(&Handle::for_node(AtomType::LgConnDirNode, direction))
                .unwrap()
        );
    }
    assert_eq!(parse_nodes_of(store, &sentence).len(), 1);
}

#[test]
fn test_endpoint_pairs_stay_within_parse() {
    let service = service_with(
        FixtureParser::new(&english())
            .with_sentence("the cat sat", vec![the_cat_sat(), the_cat_sat()]),
    );

    let sentence = service
        .materialize_parse("the cat sat", &english())
        .unwrap()
        .unwrap();
    let store = service.store();

    for parse in parse_nodes_of(store, &sentence) {
        let parse_name = parse.name().unwrap().to_string();
        let pairs: Vec<Atom> = store
            .atoms_of_type(AtomType::ListLink)
            .unwrap()
            .into_iter()
            .filter(|pair| {
                let left = store.get_atom(&pair.outgoing()[0]).unwrap().unwrap();
                left.name().unwrap().ends_with(&parse_name)
            })
            .collect();
        assert_eq!(pairs.len(), 2, "pairs for {parse_name}");
        for pair in pairs {
            for end in pair.outgoing() {
                let word = store.get_atom(end).unwrap().unwrap();
                assert_eq!(word.atom_type(), AtomType::WordInstanceNode);
                assert!(word.name().unwrap().ends_with(&parse_name));
            }
        }
    }
}

#[test]
fn test_zero_linkages_leave_store_unchanged() {
    let service = service_with(FixtureParser::new(&english()).with_sentence("colorless", vec![]));
    service.store().insert_node(AtomType::WordNode, "seed").unwrap();
    let before = service.store().stats().unwrap();

    let result = service.materialize_parse("colorless", &english()).unwrap();

    assert_eq!(result, None);
    assert_eq!(service.store().stats().unwrap(), before);
}

#[test]
fn test_negative_count_and_missing_session_are_no_result() {
    let service = service_with(
        FixtureParser::new(&english())
            .with_failure("broken")
            .with_unavailable("closed"),
    );

    assert_eq!(service.materialize_parse("broken", &english()).unwrap(), None);
    assert_eq!(service.materialize_parse("closed", &english()).unwrap(), None);
    assert!(service.store().is_empty().unwrap());
}

#[test]
fn test_six_linkages_yield_four_parses_in_order() {
    let linkages: Vec<ParsedLinkage> = (0..6)
        .map(|i| ParsedLinkage::new([format!("w{i}")]))
        .collect();
    let service = service_with(FixtureParser::new(&english()).with_sentence("six", linkages));

    let sentence = service.materialize_parse("six", &english()).unwrap().unwrap();

    let sentence_name = service
        .store()
        .get_atom(&sentence)
        .unwrap()
        .unwrap()
        .name()
        .unwrap()
        .to_string();
    let mut parses: Vec<String> = parse_nodes_of(service.store(), &sentence)
        .into_iter()
        .map(|p| p.name().unwrap().to_string())
        .collect();
    parses.sort();

    let expected: Vec<String> = (0..MAX_LINKAGES)
        .map(|i| format!("{sentence_name}_parse_{i}"))
        .collect();
    assert_eq!(parses, expected);

    // Linkage i carries word "w{i}"; only the first four are materialized.
    for i in 0..6 {
        let present = service
            .store()
            .contains(&Handle::for_node(AtomType::WordNode, &format!("w{i}")))
            .unwrap();
        assert_eq!(present, i < MAX_LINKAGES, "w{i}");
    }
}

#[test]
fn test_resources_released_on_every_path() {
    let bad = ParsedLinkage::new(["a"]).with_link(0, 7, "X", "X", "X");
    let service = service_with(
        FixtureParser::new(&english())
            .with_sentence("good", vec![the_cat_sat(); 6])
            .with_sentence("bad", vec![bad])
            .with_failure("broken"),
    );

    service.materialize_parse("good", &english()).unwrap();
    assert!(service.materialize_parse("bad", &english()).is_err());
    service.materialize_parse("broken", &english()).unwrap();
    service.materialize_parse("empty", &english()).unwrap();

    assert_eq!(service.parser().live_sessions(), 0);
    assert_eq!(service.parser().live_linkages(), 0);
}

#[test]
fn test_index_fault_is_fatal_and_writes_nothing() {
    let bad = ParsedLinkage::new(["the", "cat"])
        .with_link(0, 1, "Ds", "D", "Ds")
        .with_link(1, 2, "Ss", "Ss", "S");
    let service = service_with(FixtureParser::new(&english()).with_sentence("the cat", vec![bad]));

    let err = service.materialize_parse("the cat", &english()).unwrap_err();

    assert!(matches!(
        err,
        Error::LinkageIndexOutOfRange {
            link: 1,
            endpoint: 2,
            word_count: 2
        }
    ));
    assert!(service.store().is_empty().unwrap());
}

#[test]
fn test_markers_increase_across_sentences() {
    let service = service_with(
        FixtureParser::new(&english())
            .with_sentence("the cat sat", vec![the_cat_sat()])
            .with_sentence("cat sat", vec![ParsedLinkage::new(["cat", "sat"])]),
    );

    service.materialize_parse("the cat sat", &english()).unwrap();
    service.materialize_parse("cat sat", &english()).unwrap();

    let mut markers: Vec<u64> = service
        .store()
        .atoms_of_type(AtomType::NumberNode)
        .unwrap()
        .iter()
        .map(|n| n.name().unwrap().parse().unwrap())
        .collect();
    markers.sort_unstable();
    assert_eq!(markers, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_concurrent_sentences_share_atoms_and_never_share_markers() {
    let the_dog_sat = ParsedLinkage::new(["the", "dog", "sat"])
        .with_link(0, 1, "Ds", "D", "Ds")
        .with_link(1, 2, "Sp", "Sp", "S");
    let service = service_with(
        FixtureParser::new(&english())
            .with_sentence("the cat sat", vec![the_cat_sat()])
            .with_sentence("the dog sat", vec![the_dog_sat]),
    );

    let sentences: Vec<Handle> = thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let service = &service;
                let text = if i % 2 == 0 { "the cat sat" } else { "the dog sat" };
                scope.spawn(move || service.materialize_parse(text, &english()).unwrap().unwrap())
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    let distinct: BTreeSet<&Handle> = sentences.iter().collect();
    assert_eq!(distinct.len(), 8);

    let store = service.store();
    let markers: BTreeSet<u64> = store
        .atoms_of_type(AtomType::NumberNode)
        .unwrap()
        .iter()
        .map(|n| n.name().unwrap().parse().unwrap())
        .collect();
    assert_eq!(markers, (1..=24).collect::<BTreeSet<u64>>());

    let stats = store.stats().unwrap();
    assert_eq!(stats.count(AtomType::WordInstanceNode), 24);
    assert_eq!(stats.count(AtomType::WordSequenceLink), 24);
    // the, cat, dog, sat.
    assert_eq!(stats.count(AtomType::WordNode), 4);
    assert_eq!(stats.count(AtomType::LinkGrammarRelationshipNode), 2);
    assert_eq!(stats.count(AtomType::LgConnectorNode), 4);
    assert_eq!(stats.count(AtomType::LgConnDirNode), 2);
    assert_eq!(stats.count(AtomType::LgLinkInstanceNode), 16);
}

#[test]
fn test_execute_rejects_wrong_kinds_at_construction() {
    let wrong = ParseRequest::new(
        &Atom::node(AtomType::WordNode, "cat"),
        &Atom::node(AtomType::LgDictNode, "en"),
    );
    assert!(matches!(wrong, Err(Error::InvalidInput(_))));

    let service =
        service_with(FixtureParser::new(&english()).with_sentence("the cat sat", vec![the_cat_sat()]));
    let request = ParseRequest::phrase("the cat sat", &english());
    assert!(service.execute(&request).unwrap().is_some());
}

#[test]
fn test_demo_fixture_loads_and_materializes() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/en.json");
    let service = service_with(FixtureParser::from_path(path).unwrap());

    let sentence = service
        .materialize_parse("the cat saw the dog", &english())
        .unwrap()
        .unwrap();

    // The second linkage has a null link and is filtered by default options.
    assert_eq!(parse_nodes_of(service.store(), &sentence).len(), 1);
    let stats = service.store().stats().unwrap();
    assert_eq!(stats.count(AtomType::WordInstanceNode), 7);
    assert_eq!(stats.count(AtomType::WordNode), 6);
}
