//! Phase 2 tests: field, keyword and text indexes, lexicon, registry.

use std::collections::BTreeMap;

use object_catalog::engine::{Query, QueryTerm, ResultSet};
use object_catalog::index::tokenizer::tokenize;
use object_catalog::{
    CatalogError, Document, FieldIndex, Index, IndexError, IndexKind, IndexRegistry,
    KeywordIndex, Lexicon, TextIndex, Value,
};

fn index_doc(index: &mut dyn Index, rid: u64, doc: &Document) -> usize {
    index
        .as_indexable()
        .unwrap()
        .index_object(rid, doc, None)
        .unwrap()
}

fn apply(index: &dyn Index, query: &Query) -> Option<ResultSet> {
    index
        .as_queryable()
        .unwrap()
        .apply(query)
        .unwrap()
        .map(|(rs, _)| rs)
}

fn unranked(rids: &[u64]) -> ResultSet {
    ResultSet::Unranked(rids.iter().copied().collect())
}

// ==================== Tokenizer / Lexicon Tests ====================

#[test]
fn test_tokenize() {
    assert_eq!(tokenize("Hello, World! a b2"), vec!["hello", "world", "b2"]);
    assert!(tokenize("  -- ").is_empty());
}

#[test]
fn test_lexicon_ids_are_stable() {
    let mut lexicon = Lexicon::new();
    let a = lexicon.get_or_insert("alpha");
    let b = lexicon.get_or_insert("beta");
    assert_ne!(a, b);
    assert_eq!(lexicon.get_or_insert("alpha"), a);
    assert_eq!(lexicon.word(b), Some("beta"));
    assert_eq!(lexicon.word_id("gamma"), None);

    let re = regex::Regex::new("^al").unwrap();
    assert_eq!(lexicon.matching(&re), vec![a]);
    assert_eq!(lexicon.len(), 2);
}

// ==================== Field Index Tests ====================

#[test]
fn test_field_index_equals_and_reindex() {
    let mut index = FieldIndex::new("cat");
    index_doc(&mut index, 0, &Document::new().with("cat", "x"));
    index_doc(&mut index, 1, &Document::new().with("cat", "y"));
    index_doc(&mut index, 2, &Document::new().with("cat", "x"));

    let q = Query::new().with_equals("cat", "x");
    assert_eq!(apply(&index, &q), Some(unranked(&[0, 2])));

    // Reindexing replaces the previous value.
    index_doc(&mut index, 0, &Document::new().with("cat", "y"));
    assert_eq!(apply(&index, &q), Some(unranked(&[2])));
    assert_eq!(index.get(&Value::from("y")).len(), 2);
}

#[test]
fn test_field_index_missing_attribute_unindexes() {
    let mut index = FieldIndex::new("cat");
    index_doc(&mut index, 0, &Document::new().with("cat", "x"));
    assert_eq!(index_doc(&mut index, 0, &Document::new()), 0);
    assert!(index.is_empty());
}

#[test]
fn test_field_index_ignores_unrelated_query() {
    let index = FieldIndex::new("cat");
    assert_eq!(apply(&index, &Query::new().with_equals("other", 1i64)), None);
}

#[test]
fn test_field_index_range_or_regex() {
    let mut index = FieldIndex::new("size");
    for (rid, size) in [(0u64, 5i64), (1, 10), (2, 15), (3, 20)] {
        index_doc(&mut index, rid, &Document::new().with("size", size));
    }

    let q = Query::new().with(
        "size",
        QueryTerm::range(Some(Value::Int(10)), Some(Value::Int(15))),
    );
    assert_eq!(apply(&index, &q), Some(unranked(&[1, 2])));

    let open = Query::new().with("size", QueryTerm::range(Some(Value::Int(15)), None));
    assert_eq!(apply(&index, &open), Some(unranked(&[2, 3])));

    let inverted = Query::new().with(
        "size",
        QueryTerm::range(Some(Value::Int(20)), Some(Value::Int(5))),
    );
    assert_eq!(apply(&index, &inverted), Some(unranked(&[])));

    let or = Query::new().with("size", QueryTerm::any_of([5i64, 20]));
    assert_eq!(apply(&index, &or), Some(unranked(&[0, 3])));

    let re = Query::new().with("size", QueryTerm::regex("^1").unwrap());
    assert_eq!(apply(&index, &re), Some(unranked(&[1, 2])));
}

#[test]
fn test_field_index_sortable() {
    let mut index = FieldIndex::new("cat");
    index_doc(&mut index, 0, &Document::new().with("cat", "b"));
    index_doc(&mut index, 1, &Document::new().with("cat", "a"));
    index_doc(&mut index, 2, &Document::new().with("cat", "b"));

    let sortable = index.as_sortable().unwrap();
    assert_eq!(sortable.bucket_count(), 2);
    let keys: Vec<Value> = sortable.buckets().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec![Value::from("a"), Value::from("b")]);
    assert_eq!(sortable.sort_key(2), Some(&Value::from("b")));
    assert_eq!(sortable.sort_key(9), None);
}

// ==================== Keyword Index Tests ====================

#[test]
fn test_keyword_index_lists() {
    let mut index = KeywordIndex::new("tags");
    index_doc(&mut index, 0, &Document::new().with("tags", vec!["red", "blue"]));
    index_doc(&mut index, 1, &Document::new().with("tags", "blue"));

    let q = Query::new().with_equals("tags", "blue");
    assert_eq!(apply(&index, &q), Some(unranked(&[0, 1])));
    assert_eq!(
        index.as_enumerable().unwrap().unique_values(),
        vec![Value::from("blue"), Value::from("red")]
    );
    assert_eq!(index.keywords_for(0).len(), 2);
    assert!(index.as_sortable().is_none());
}

#[test]
fn test_keyword_index_unindex() {
    let mut index = KeywordIndex::new("tags");
    index_doc(&mut index, 0, &Document::new().with("tags", vec!["red"]));
    index.as_unindexable().unwrap().unindex_object(0).unwrap();
    // Unknown rids are fine.
    index.as_unindexable().unwrap().unindex_object(42).unwrap();
    assert!(index.is_empty());
    assert!(index.as_enumerable().unwrap().unique_values().is_empty());
}

// ==================== Text Index Tests ====================

fn text_index() -> TextIndex {
    let mut index = TextIndex::new("text", Lexicon::shared());
    for (rid, text) in [(0u64, "alpha"), (1, "alpha beta"), (2, "beta gamma gamma")] {
        index_doc(&mut index, rid, &Document::new().with("text", text));
    }
    index
}

#[test]
fn test_text_index_search_grammar() {
    let index = text_index();
    let rids = |q: &str| index.search(q).unwrap().keys().copied().collect::<Vec<_>>();

    assert_eq!(rids("alpha"), vec![0, 1]);
    assert_eq!(rids("alpha beta"), vec![1]);
    assert_eq!(rids("alpha and beta"), vec![1]);
    assert_eq!(rids("alpha or gamma"), vec![0, 1, 2]);
    assert_eq!(rids("beta not alpha"), vec![2]);
    assert_eq!(rids("BETA andnot GAMMA"), vec![1]);
    assert_eq!(rids("unknown"), Vec::<u64>::new());
}

#[test]
fn test_text_index_scores_are_term_frequencies() {
    let index = text_index();
    let scores = index.search("gamma").unwrap();
    assert_eq!(scores, BTreeMap::from([(2u64, 2u64)]));

    let summed = index.search("beta or gamma").unwrap();
    assert_eq!(summed.get(&2), Some(&3));
    assert_eq!(summed.get(&1), Some(&1));
}

#[test]
fn test_text_index_tokenless_operand_is_ignored() {
    let index = text_index();
    let alpha = index.search("alpha").unwrap();
    assert_eq!(index.search("alpha and a").unwrap(), alpha);
    assert_eq!(index.search("alpha a").unwrap(), alpha);
    assert_eq!(index.search("alpha or -").unwrap(), alpha);
    assert_eq!(index.search("a beta").unwrap(), index.search("beta").unwrap());
}

#[test]
fn test_text_index_dangling_operator() {
    let index = text_index();
    assert!(matches!(
        index.search("alpha or"),
        Err(IndexError::MalformedQuery(_))
    ));
}

#[test]
fn test_text_index_rejects_range() {
    let index = text_index();
    let q = Query::new().with("text", QueryTerm::range(None, None));
    let err = index.as_queryable().unwrap().apply(&q).unwrap_err();
    assert!(matches!(err, IndexError::UnsupportedTerm { term: "range", .. }));
}

#[test]
fn test_text_index_regex_over_lexicon() {
    let index = text_index();
    let q = Query::new().with("text", QueryTerm::regex("^gam").unwrap());
    match apply(&index, &q) {
        Some(ResultSet::Ranked(scores)) => assert_eq!(scores, BTreeMap::from([(2u64, 2u64)])),
        other => panic!("expected ranked result, got {:?}", other),
    }
}

#[test]
fn test_text_index_reindex_and_unique_words() {
    let mut index = text_index();
    index_doc(&mut index, 2, &Document::new().with("text", "delta"));
    let words = index.as_enumerable().unwrap().unique_values();
    assert_eq!(
        words,
        vec![Value::from("alpha"), Value::from("beta"), Value::from("delta")]
    );
    // The lexicon keeps words even after no index holds them.
    assert!(index.lexicon().read().word_id("gamma").is_some());
}

#[test]
fn test_text_indexes_share_lexicon() {
    let lexicon = Lexicon::shared();
    let mut a = TextIndex::new("title", lexicon.clone());
    let mut b = TextIndex::new("body", lexicon.clone());
    index_doc(&mut a, 0, &Document::new().with("title", "shared words"));
    index_doc(&mut b, 0, &Document::new().with("body", "words only"));
    assert_eq!(lexicon.read().len(), 3);
}

// ==================== Registry Tests ====================

#[test]
fn test_index_kind_names() {
    assert_eq!(IndexKind::from_name("FieldIndex"), Some(IndexKind::Field));
    assert_eq!(IndexKind::from_name("full-text"), Some(IndexKind::Text));
    assert_eq!(IndexKind::from_name("multi-value"), Some(IndexKind::Keyword));
    assert!(matches!(
        "BTreeIndex".parse::<IndexKind>(),
        Err(CatalogError::UnknownIndexKind(_))
    ));
    let kind: IndexKind = serde_json::from_str("\"exact-match\"").unwrap();
    assert_eq!(kind, IndexKind::Field);
    assert_eq!(serde_json::to_string(&kind).unwrap(), "\"FieldIndex\"");
}

#[test]
fn test_registry_add_remove() {
    let lexicon = Lexicon::shared();
    let mut registry = IndexRegistry::new();
    registry
        .add("title", IndexKind::Text.build("title", &lexicon))
        .unwrap();
    registry
        .add("cat", IndexKind::Field.build("cat", &lexicon))
        .unwrap();

    assert!(matches!(
        registry.add("cat", Box::new(FieldIndex::new("cat"))),
        Err(CatalogError::DuplicateIndex(_))
    ));
    assert!(matches!(
        registry.add("_hidden", Box::new(FieldIndex::new("_hidden"))),
        Err(CatalogError::InvalidName { kind: "index", .. })
    ));
    assert_eq!(registry.names(), vec!["cat", "title"]);
    assert_eq!(registry.get("title").unwrap().kind(), "TextIndex");

    registry.remove("cat").unwrap();
    assert!(matches!(
        registry.remove("cat"),
        Err(CatalogError::UnknownIndex(_))
    ));
    assert_eq!(registry.len(), 1);
}
