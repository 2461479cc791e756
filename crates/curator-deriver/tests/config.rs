use curator_core::schema::{Operation, RuleCategory};
use curator_deriver::config::load_csv;
use curator_deriver::deriver::AttributeDeriver;
use curator_deriver::error::ConfigError;
use curator_deriver::schema::{CurationSchema, DEFAULT_DATE_KEY};
use curator_rules::registry::RuleRegistry;

const RULES_CSV: &str = "\
function,location,operation
create_naccage,file.info.derived.naccage,update
create_uds_age,subject.info.derived.uds-age-initial,initial
create_uds_age,subject.info.derived.uds-age-latest,latest
missing_naccage,file.info.derived.naccage,update
";

#[test]
fn csv_rows_group_by_function_in_first_appearance_order() {
    let registry = RuleRegistry::build().unwrap();
    let schema = load_csv(RULES_CSV.as_bytes(), &registry, DEFAULT_DATE_KEY).unwrap();

    let nacc: Vec<&str> = schema
        .nacc_derived_vars
        .iter()
        .map(|entry| entry.function.as_str())
        .collect();
    assert_eq!(nacc, vec!["create_naccage", "missing_naccage"]);

    let mqt: Vec<&str> = schema
        .mqt_derived_vars
        .iter()
        .map(|entry| entry.function.as_str())
        .collect();
    assert_eq!(mqt, vec!["create_uds_age"]);

    let uds_age = &schema.mqt_derived_vars[0];
    assert_eq!(uds_age.events.len(), 2);
    assert_eq!(uds_age.events[0].operation, Operation::Initial);
    assert_eq!(uds_age.events[1].operation, Operation::Latest);
}

#[test]
fn missing_header_is_a_load_error() {
    let registry = RuleRegistry::build().unwrap();
    let csv = "function,location\ncreate_naccage,file.info.derived.naccage\n";

    let err = load_csv(csv.as_bytes(), &registry, DEFAULT_DATE_KEY).unwrap_err();
    assert!(matches!(err, ConfigError::MissingColumn("operation")));
}

#[test]
fn unknown_operation_is_a_load_error() {
    let registry = RuleRegistry::build().unwrap();
    let csv = "function,location,operation\ncreate_naccage,working.age,upsert\n";

    let err = load_csv(csv.as_bytes(), &registry, DEFAULT_DATE_KEY).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownOperation(_)));
}

#[test]
fn unknown_rule_is_a_load_error() {
    let registry = RuleRegistry::build().unwrap();
    let csv = "function,location,operation\ncreate_naccbmi,working.bmi,update\n";

    let err = load_csv(csv.as_bytes(), &registry, DEFAULT_DATE_KEY).unwrap_err();
    match err {
        ConfigError::UnknownRule(rule) => assert_eq!(rule, "create_naccbmi"),
        other => panic!("expected UnknownRule, got {other}"),
    }
}

#[test]
fn generated_schema_orders_nacc_before_mqt() {
    let registry = RuleRegistry::build().unwrap();
    let schema = CurationSchema::generate(&registry, DEFAULT_DATE_KEY);

    assert!(!schema.nacc_derived_vars.is_empty());
    assert!(!schema.mqt_derived_vars.is_empty());
    for entry in &schema.nacc_derived_vars {
        assert_eq!(
            registry.get(&entry.function).unwrap().info.category,
            RuleCategory::Nacc
        );
    }
    for entry in &schema.mqt_derived_vars {
        assert_eq!(
            registry.get(&entry.function).unwrap().info.category,
            RuleCategory::Mqt
        );
    }
}

#[test]
fn generated_schema_round_trips_through_json() {
    let registry = RuleRegistry::build().unwrap();
    let schema = CurationSchema::generate(&registry, DEFAULT_DATE_KEY);

    let raw = schema.to_json().unwrap();
    let reloaded = CurationSchema::from_json(&raw).unwrap();

    assert_eq!(reloaded.date_key, schema.date_key);
    assert_eq!(
        reloaded.nacc_derived_vars.len(),
        schema.nacc_derived_vars.len()
    );
    assert_eq!(reloaded.mqt_derived_vars.len(), schema.mqt_derived_vars.len());
    assert_eq!(
        reloaded.nacc_derived_vars[0].events,
        schema.nacc_derived_vars[0].events
    );
}

#[test]
fn date_keyed_operations_require_a_date_key() {
    let registry = RuleRegistry::build().unwrap();
    let schema = CurationSchema::generate(&registry, "");

    let err = AttributeDeriver::new(schema, registry).unwrap_err();
    assert!(matches!(err, ConfigError::DateKeyRequired { .. }));
}

#[test]
fn duplicate_schema_entries_are_a_construction_error() {
    let registry = RuleRegistry::build().unwrap();
    let mut schema = CurationSchema::generate(&registry, DEFAULT_DATE_KEY);
    let duplicate = schema.nacc_derived_vars[0].clone();
    schema.nacc_derived_vars.push(duplicate);

    let err = AttributeDeriver::new(schema, registry).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateRule(_)));
}

#[test]
fn unknown_schema_rule_is_a_construction_error() {
    let registry = RuleRegistry::build().unwrap();
    let mut schema = CurationSchema::generate(&registry, DEFAULT_DATE_KEY);
    schema.nacc_derived_vars[0].function = "create_naccbmi".to_string();

    let err = AttributeDeriver::new(schema, registry).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownRule(_)));
}
