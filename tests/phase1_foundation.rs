//! Phase 1 tests: values, objects, schema, metadata store, identifier mapping.

use std::collections::BTreeMap;

use object_catalog::store::{validate_name, IdentifierMap, MetadataStore, Schema};
use object_catalog::types::{resolve_attribute, AttributeError, Catalogable, Document};
use object_catalog::{Catalog, CatalogError, FieldIndex, Index, Value};

// ==================== Value Tests ====================

#[test]
fn test_value_ordering_by_rank() {
    let mut values = vec![
        Value::from("b"),
        Value::Int(3),
        Value::Missing,
        Value::Bool(true),
        Value::Null,
        Value::List(vec![Value::Int(1)]),
        Value::Float(1.5),
    ];
    values.sort();
    assert_eq!(
        values,
        vec![
            Value::Missing,
            Value::Null,
            Value::Bool(true),
            Value::Float(1.5),
            Value::Int(3),
            Value::from("b"),
            Value::List(vec![Value::Int(1)]),
        ]
    );
}

#[test]
fn test_value_int_float_numeric_equality() {
    assert_eq!(Value::Int(2), Value::Float(2.0));
    assert!(Value::Int(2) < Value::Float(2.5));
    assert!(Value::Float(-1.0) < Value::Int(0));
}

#[test]
fn test_value_int_float_exact_above_2_pow_53() {
    let a = Value::Int(1 << 53);
    let b = Value::Float(9_007_199_254_740_992.0);
    let c = Value::Int((1 << 53) + 1);

    assert_eq!(a, b);
    assert_ne!(b, c);
    assert!(b < c);
    assert!(c > b);
    assert!(Value::Int(i64::MAX) < Value::Float(9_223_372_036_854_775_808.0));
    assert!(Value::Int(i64::MIN) == Value::Float(-9_223_372_036_854_775_808.0));
    assert!(Value::Int(-3) > Value::Float(-3.5));
    assert!(Value::Int(0) > Value::Float(-0.0));
    assert!(Value::Int(0) < Value::Float(f64::NAN));

    let mut index = FieldIndex::new("n");
    let indexable = index.as_indexable().unwrap();
    indexable
        .index_object(0, &Document::new().with("n", (1i64 << 53) + 1), None)
        .unwrap();
    indexable
        .index_object(1, &Document::new().with("n", 9_007_199_254_740_992.0f64), None)
        .unwrap();
    assert_eq!(index.get(&Value::Int(1 << 53)).len(), 1);
    assert!(index.get(&Value::Int(1 << 53)).contains(&1));
    assert_eq!(index.get(&Value::Int((1 << 53) + 1)).len(), 1);
    assert!(index.get(&Value::Int((1 << 53) + 1)).contains(&0));
}

#[test]
fn test_value_parse_literal() {
    assert_eq!(Value::parse_literal("42"), Value::Int(42));
    assert_eq!(Value::parse_literal("2.5"), Value::Float(2.5));
    assert_eq!(Value::parse_literal("true"), Value::Bool(true));
    assert_eq!(Value::parse_literal("null"), Value::Null);
    assert_eq!(Value::parse_literal("hello"), Value::from("hello"));
    assert_eq!(Value::parse_literal("inf"), Value::from("inf"));
}

#[test]
fn test_value_text() {
    assert_eq!(Value::from("alpha").text().as_deref(), Some("alpha"));
    assert_eq!(Value::Int(7).text().as_deref(), Some("7"));
    assert_eq!(
        Value::from(vec!["a b", "c"]).text().as_deref(),
        Some("a b c")
    );
    assert!(Value::Missing.text().is_none());
    assert!(Value::Null.text().is_none());
}

#[test]
fn test_value_json_conversion() {
    let json = serde_json::json!({"n": 1, "f": 0.5, "s": "x", "l": [true, null]});
    let serde_json::Value::Object(map) = json else {
        unreachable!()
    };
    assert_eq!(Value::from(map["n"].clone()), Value::Int(1));
    assert_eq!(Value::from(map["f"].clone()), Value::Float(0.5));
    assert_eq!(Value::from(map["s"].clone()), Value::from("x"));
    assert_eq!(
        Value::from(map["l"].clone()),
        Value::List(vec![Value::Bool(true), Value::Null])
    );
    assert_eq!(Value::Missing.to_json(), serde_json::Value::Null);

    let parsed: Value = serde_json::from_str("[1, \"two\"]").unwrap();
    assert_eq!(parsed, Value::List(vec![Value::Int(1), Value::from("two")]));
    assert_eq!(serde_json::to_string(&parsed).unwrap(), "[1,\"two\"]");
}

// ==================== Object Tests ====================

#[test]
fn test_document_fields_and_methods() {
    let doc = Document::new()
        .with("title", "Hello")
        .with_method("size", || Ok(Value::Int(12)))
        .with_method("broken", || Err(AttributeError::new("broken", "no backing store")));

    assert_eq!(resolve_attribute(&doc, "title"), Some(Value::from("Hello")));
    assert_eq!(resolve_attribute(&doc, "size"), Some(Value::Int(12)));
    assert_eq!(resolve_attribute(&doc, "broken"), None);
    assert_eq!(resolve_attribute(&doc, "absent"), None);
}

#[test]
fn test_method_shadows_field() {
    let doc = Document::new()
        .with("size", 1i64)
        .with_method("size", || Ok(Value::Int(2)));
    assert_eq!(resolve_attribute(&doc, "size"), Some(Value::Int(2)));
    assert_eq!(doc.get("size"), Some(&Value::Int(1)));
}

#[test]
fn test_document_from_json() {
    let doc = Document::from_json(serde_json::json!({"a": 1, "b": ["x", "y"]}));
    assert_eq!(doc.get("a"), Some(&Value::Int(1)));
    assert_eq!(doc.get("b"), Some(&Value::from(vec!["x", "y"])));

    let empty = Document::from_json(serde_json::json!([1, 2]));
    assert!(empty.attribute("0").is_none());
}

#[test]
fn test_btreemap_is_catalogable() {
    let mut map = BTreeMap::new();
    map.insert("k".to_string(), Value::from("v"));
    assert_eq!(resolve_attribute(&map, "k"), Some(Value::from("v")));
    assert_eq!(resolve_attribute(&map, "other"), None);
}

// ==================== Schema Tests ====================

#[test]
fn test_schema_add_and_offsets() {
    let mut schema = Schema::new();
    assert_eq!(schema.add("title").unwrap(), 0);
    assert_eq!(schema.add("size").unwrap(), 1);
    assert_eq!(schema.offset("size"), Some(1));
    assert!(schema.contains("title"));
    assert_eq!(schema.len(), 2);
}

#[test]
fn test_schema_rejects_duplicates_and_reserved_names() {
    let mut schema = Schema::new();
    schema.add("title").unwrap();
    assert!(matches!(
        schema.add("title"),
        Err(CatalogError::DuplicateColumn(name)) if name == "title"
    ));
    assert!(matches!(
        schema.add("_private"),
        Err(CatalogError::InvalidName { kind: "column", .. })
    ));
    assert!(matches!(schema.add(""), Err(CatalogError::InvalidName { .. })));
    assert!(validate_name("index", "ok").is_ok());
}

#[test]
fn test_schema_remove_renumbers() {
    let mut schema = Schema::new();
    for name in ["a", "b", "c"] {
        schema.add(name).unwrap();
    }
    assert_eq!(schema.remove("a"), Some(0));
    assert_eq!(schema.offset("b"), Some(0));
    assert_eq!(schema.offset("c"), Some(1));
    assert_eq!(schema.remove("a"), None);
    let cols: Vec<(&str, usize)> = schema.columns().collect();
    assert_eq!(cols, vec![("b", 0), ("c", 1)]);
}

// ==================== Metadata Store Tests ====================

#[test]
fn test_metadata_store_basic() {
    let mut store = MetadataStore::new();
    assert!(store.last_rid().is_none());
    store.insert(3, vec![Value::from("x")]);
    store.insert(1, vec![Value::from("y")]);
    assert_eq!(store.len(), 2);
    assert_eq!(store.last_rid(), Some(3));
    assert_eq!(store.rids().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(store.remove(1), Some(vec![Value::from("y")]));
    assert!(!store.contains(1));
}

#[test]
fn test_metadata_store_column_reshape() {
    let mut store = MetadataStore::new();
    store.insert(0, vec![Value::Int(1)]);
    store.insert(1, vec![Value::Int(2)]);

    let wider = store.with_column_appended(&Value::from("d"));
    assert_eq!(wider.get(0), Some(&vec![Value::Int(1), Value::from("d")]));
    // The original is left untouched.
    assert_eq!(store.get(0), Some(&vec![Value::Int(1)]));

    let narrower = wider.with_column_removed(1);
    assert_eq!(narrower, store);
}

// ==================== Identifier Mapping Tests ====================

#[test]
fn test_identifier_assign_is_max_plus_one() {
    let mut ids = IdentifierMap::new();
    assert_eq!(ids.assign("/a"), (0, true));
    assert_eq!(ids.assign("/b"), (1, true));
    assert_eq!(ids.assign("/a"), (0, false));
    assert_eq!(ids.uid_for(1), Some("/b"));

    ids.remove("/b");
    // The highest rid was freed, so it is reused.
    assert_eq!(ids.assign("/c"), (1, true));
    ids.remove("/a");
    assert_eq!(ids.assign("/d"), (2, true));
    assert_eq!(ids.len(), 2);
}

#[test]
fn test_identifier_remove_unknown_is_noop() {
    let mut ids = IdentifierMap::new();
    ids.assign("/a");
    assert_eq!(ids.remove("/zzz"), None);
    assert_eq!(ids.len(), 1);
    ids.clear();
    assert!(ids.is_empty());
    assert_eq!(ids.assign("/a"), (0, true));
}

// ==================== Recordify Tests ====================

#[test]
fn test_recordify_invokes_methods_and_downgrades_failures() {
    let mut catalog = Catalog::new();
    catalog.add_column("title", None).unwrap();
    catalog.add_column("size", None).unwrap();
    catalog.add_column("absent", None).unwrap();

    let doc = Document::new()
        .with("title", "Report")
        .with_method("size", || Err(AttributeError::new("size", "unavailable")));

    let record = catalog.recordify(&doc);
    assert_eq!(
        record,
        vec![Value::from("Report"), Value::Missing, Value::Missing]
    );
}

#[test]
fn test_add_column_defaults() {
    let mut catalog = Catalog::new();
    catalog.add_column("title", None).unwrap();
    catalog
        .catalog_object(&Document::new().with("title", "A"), "/a", None)
        .unwrap();

    catalog.add_column("status", Some(Value::from("new"))).unwrap();
    catalog.add_column("empty", Some(Value::from(""))).unwrap();
    catalog.add_column("nothing", Some(Value::Null)).unwrap();

    let view = catalog.get(0).unwrap();
    assert_eq!(view.get("status"), Some(&Value::from("new")));
    assert_eq!(view.get("empty"), Some(&Value::Missing));
    assert_eq!(view.get("nothing"), Some(&Value::Missing));
}

#[test]
fn test_add_then_del_column_restores_table() {
    let mut catalog = Catalog::new();
    catalog.add_column("a", None).unwrap();
    catalog.add_column("b", None).unwrap();
    for (uid, a, b) in [("/1", 1i64, "x"), ("/2", 2, "y")] {
        catalog
            .catalog_object(&Document::new().with("a", a).with("b", b), uid, None)
            .unwrap();
    }
    let before_schema = catalog.schema().clone();
    let before_data = catalog.metadata().clone();

    catalog.add_column("c", Some(Value::Int(9))).unwrap();
    assert_eq!(catalog.names(), ["a", "b", "c"]);
    catalog.del_column("c");

    assert_eq!(catalog.schema(), &before_schema);
    assert_eq!(catalog.metadata(), &before_data);
}

#[test]
fn test_add_duplicate_column_leaves_catalog_unchanged() {
    let mut catalog = Catalog::new();
    catalog.add_column("a", None).unwrap();
    let version = catalog.descriptor().version();
    assert!(matches!(
        catalog.add_column("a", None),
        Err(CatalogError::DuplicateColumn(_))
    ));
    assert_eq!(catalog.names(), ["a"]);
    assert_eq!(catalog.descriptor().version(), version);
}
