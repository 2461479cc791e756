use curator_core::symbol_table::SymbolTable;
use serde_json::json;

#[test]
fn set_creates_intermediate_levels() {
    let mut table = SymbolTable::new();
    table.set("file.info.forms.json.visitdate", json!("2020-01-01"));

    assert_eq!(
        table.get("file.info.forms.json.visitdate"),
        Some(&json!("2020-01-01"))
    );
    assert!(table.contains("file.info.forms.json"));
    assert!(table.contains("file.info"));
}

#[test]
fn missing_read_returns_none_without_materializing_nodes() {
    let table = SymbolTable::new();

    assert_eq!(table.get("subject.info.derived.naccage"), None);
    assert!(!table.contains("subject"));
    assert_eq!(table.to_value(), json!({}));
}

#[test]
fn read_through_scalar_intermediate_returns_none() {
    let mut table = SymbolTable::new();
    table.set("file.info", json!(5));

    assert_eq!(table.get("file.info.forms.json"), None);
}

#[test]
fn set_overwrites_leaf() {
    let mut table = SymbolTable::new();
    table.set("working.age", json!(29));
    table.set("working.age", json!(30));

    assert_eq!(table.get("working.age"), Some(&json!(30)));
}

#[test]
fn set_replaces_scalar_intermediate_with_object() {
    let mut table = SymbolTable::new();
    table.set("file.info", json!("scalar"));
    table.set("file.info.derived.naccage", json!(29));

    assert_eq!(table.get("file.info.derived.naccage"), Some(&json!(29)));
}

#[test]
fn from_value_requires_an_object_root() {
    assert!(SymbolTable::from_value(json!({"file": {"info": {}}})).is_ok());
    assert!(SymbolTable::from_value(json!([1, 2, 3])).is_err());
    assert!(SymbolTable::from_value(json!("flat")).is_err());
}

#[test]
fn export_round_trips_the_structure() {
    let raw = json!({
        "file": {
            "info": {
                "forms": { "json": { "visitdate": "2020-01-01", "birthmo": 3 } }
            }
        }
    });
    let table = SymbolTable::from_value(raw.clone()).unwrap();

    assert_eq!(table.to_value(), raw);
}
