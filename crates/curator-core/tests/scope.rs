use curator_core::dated::DatedValue;
use curator_core::error::DeriveError;
use curator_core::scope::{LongitudinalScope, ScopeSpec, scopes};
use curator_core::symbol_table::SymbolTable;
use jiff::civil::date;
use serde_json::json;

fn uds_table() -> SymbolTable {
    SymbolTable::from_value(json!({
        "file": {
            "info": {
                "forms": {
                    "json": {
                        "visitdate": "2020-01-01",
                        "module": "UDS",
                        "birthmo": "3",
                        "birthyr": 1990,
                        "educ": "  16  ",
                        "maristat": "."
                    }
                }
            }
        }
    }))
    .unwrap()
}

const FORM_WITH_REQUIRED: ScopeSpec = ScopeSpec {
    prefix: scopes::RAW_FORM_PREFIX,
    required: &["visitdate", "module", "race"],
    date_field: Some("visitdate"),
};

#[test]
fn missing_required_fields_fail_fast_with_full_paths() {
    let table = uds_table();
    let err = FORM_WITH_REQUIRED.bind(&table).unwrap_err();

    match err {
        DeriveError::MissingRequiredField { fields } => {
            assert_eq!(fields, vec!["file.info.forms.json.race".to_string()]);
        }
        other => panic!("expected MissingRequiredField, got {other}"),
    }
}

#[test]
fn blank_sentinel_counts_as_missing_for_required_check() {
    let table = uds_table();
    let spec = ScopeSpec {
        prefix: scopes::RAW_FORM_PREFIX,
        required: &["maristat"],
        date_field: None,
    };

    let err = spec.bind(&table).unwrap_err();
    assert!(err.is_inapplicable());
}

#[test]
fn typed_get_coerces_numeric_strings_and_trims() {
    let table = uds_table();
    let scope = scopes::RAW_FORM.bind(&table).unwrap();

    assert_eq!(scope.get::<i64>("birthmo").unwrap(), Some(3));
    assert_eq!(scope.get::<i64>("birthyr").unwrap(), Some(1990));
    assert_eq!(scope.get::<i64>("educ").unwrap(), Some(16));
    assert_eq!(scope.get::<String>("educ").unwrap(), Some("16".to_string()));
}

#[test]
fn blank_sentinels_read_as_none() {
    let table = uds_table();
    let scope = scopes::RAW_FORM.bind(&table).unwrap();

    assert_eq!(scope.get::<i64>("maristat").unwrap(), None);
    assert_eq!(scope.get::<i64>("not_present").unwrap(), None);
}

#[test]
fn uncastable_value_is_invalid_field() {
    let table = uds_table();
    let scope = scopes::RAW_FORM.bind(&table).unwrap();

    let err = scope.get::<i64>("module").unwrap_err();
    match err {
        DeriveError::InvalidField { field, .. } => {
            assert_eq!(field, "file.info.forms.json.module");
        }
        other => panic!("expected InvalidField, got {other}"),
    }
}

#[test]
fn get_or_falls_back_only_when_blank_or_absent() {
    let table = uds_table();
    let scope = scopes::RAW_FORM.bind(&table).unwrap();

    assert_eq!(scope.get_or::<i64>("birthyr", 9999).unwrap(), 1990);
    assert_eq!(scope.get_or::<i64>("maristat", 9).unwrap(), 9);
    assert_eq!(scope.get_or::<i64>("not_present", 9).unwrap(), 9);
    // A present-but-uncastable value is still malformed data, not a default.
    assert!(scope.get_or::<i64>("module", 9).is_err());
}

#[test]
fn require_rejects_blank_fields() {
    let table = uds_table();
    let scope = scopes::RAW_FORM.bind(&table).unwrap();

    assert!(matches!(
        scope.require::<i64>("maristat"),
        Err(DeriveError::InvalidField { .. })
    ));
}

#[test]
fn scope_date_parses_both_accepted_formats() {
    let mut table = uds_table();
    let scope = scopes::RAW_FORM.bind(&table).unwrap();
    assert_eq!(scope.date().unwrap(), Some(date(2020, 1, 1)));

    table.set("file.info.forms.json.visitdate", json!("03/15/2019"));
    let scope = scopes::RAW_FORM.bind(&table).unwrap();
    assert_eq!(scope.date().unwrap(), Some(date(2019, 3, 15)));
}

#[test]
fn unparseable_date_is_a_structured_error() {
    let mut table = uds_table();
    table.set("file.info.forms.json.visitdate", json!("sometime in May"));

    let scope = scopes::RAW_FORM.bind(&table).unwrap();
    assert!(matches!(scope.date(), Err(DeriveError::DateParse { .. })));
}

#[test]
fn longitudinal_history_is_sorted_by_date() {
    let mut table = SymbolTable::new();
    table.set(
        "subject.info.longitudinal.uds-age",
        json!([
            { "date": "2021-06-01", "value": 31 },
            { "date": "2019-06-01", "value": 29 }
        ]),
    );

    let longitudinal = LongitudinalScope::bind(&table).unwrap();
    let history = longitudinal.history("uds-age").unwrap();
    assert_eq!(
        history,
        vec![
            DatedValue::new(date(2019, 6, 1), json!(29)),
            DatedValue::new(date(2021, 6, 1), json!(31)),
        ]
    );
}

#[test]
fn latest_before_skips_the_current_visit() {
    let mut table = SymbolTable::new();
    table.set(
        "subject.info.longitudinal.uds-age",
        json!([
            { "date": "2019-06-01", "value": 29 },
            { "date": "2021-06-01", "value": 31 }
        ]),
    );

    let longitudinal = LongitudinalScope::bind(&table).unwrap();
    let previous = longitudinal
        .latest_before("uds-age", date(2021, 6, 1))
        .unwrap();
    assert_eq!(previous, Some(DatedValue::new(date(2019, 6, 1), json!(29))));

    let none_earlier = longitudinal
        .latest_before("uds-age", date(2019, 6, 1))
        .unwrap();
    assert_eq!(none_earlier, None);
}

#[test]
fn value_on_returns_the_entry_recorded_on_that_exact_date() {
    let mut table = SymbolTable::new();
    table.set(
        "subject.info.longitudinal.uds-age",
        json!([
            { "date": "2019-06-01", "value": 29 },
            { "date": "2021-06-01", "value": 31 }
        ]),
    );

    let longitudinal = LongitudinalScope::bind(&table).unwrap();
    assert_eq!(
        longitudinal.value_on("uds-age", date(2019, 6, 1)).unwrap(),
        Some(json!(29))
    );
    // No entry on a date between visits, and none for an empty attribute.
    assert_eq!(
        longitudinal.value_on("uds-age", date(2020, 1, 1)).unwrap(),
        None
    );
    assert_eq!(
        longitudinal.value_on("cdrglob", date(2019, 6, 1)).unwrap(),
        None
    );
}

#[test]
fn value_on_surfaces_malformed_entries() {
    let mut table = SymbolTable::new();
    table.set("subject.info.longitudinal.uds-age", json!([{ "value": 29 }]));

    let longitudinal = LongitudinalScope::bind(&table).unwrap();
    assert!(matches!(
        longitudinal.value_on("uds-age", date(2019, 6, 1)),
        Err(DeriveError::InvalidField { .. })
    ));
}

#[test]
fn malformed_history_entry_is_invalid_field() {
    let mut table = SymbolTable::new();
    table.set("subject.info.longitudinal.uds-age", json!([{ "value": 29 }]));

    let longitudinal = LongitudinalScope::bind(&table).unwrap();
    assert!(matches!(
        longitudinal.history("uds-age"),
        Err(DeriveError::InvalidField { .. })
    ));
}
