use curator_core::dated::DatedValue;
use curator_core::dates::{age_in_years, parse_form_date};
use curator_core::error::DeriveError;
use jiff::civil::date;
use serde_json::json;

#[test]
fn parses_iso_and_us_formats() {
    assert_eq!(parse_form_date("2020-01-01").unwrap(), date(2020, 1, 1));
    assert_eq!(parse_form_date("03/15/2019").unwrap(), date(2019, 3, 15));
    assert_eq!(parse_form_date(" 2020-01-01 ").unwrap(), date(2020, 1, 1));
}

#[test]
fn rejects_everything_else() {
    for raw in ["", "2020", "15/03/2019", "Jan 1 2020", "2020-13-01"] {
        assert!(
            matches!(parse_form_date(raw), Err(DeriveError::DateParse { .. })),
            "expected parse failure for {raw:?}"
        );
    }
}

#[test]
fn age_subtracts_one_before_the_birthday() {
    let dob = date(1990, 3, 1);
    assert_eq!(age_in_years(dob, date(2020, 1, 1)), 29);
    assert_eq!(age_in_years(dob, date(2020, 3, 1)), 30);
    assert_eq!(age_in_years(dob, date(2020, 4, 1)), 30);
}

#[test]
fn dated_values_sort_by_date_regardless_of_payload() {
    let mut history = vec![
        DatedValue::new(date(2021, 6, 1), json!(1)),
        DatedValue::new(date(2019, 6, 1), json!(100)),
    ];
    history.sort_by_key(|dated| dated.date);

    assert_eq!(history[0].date, date(2019, 6, 1));
    assert_eq!(history[1].date, date(2021, 6, 1));
}

#[test]
fn dated_value_round_trips_through_the_stored_shape() {
    let dated = DatedValue::new(date(2021, 6, 1), json!(9));
    let stored = dated.to_value();

    assert_eq!(stored, json!({ "date": "2021-06-01", "value": 9 }));
    assert_eq!(DatedValue::from_value("loc", &stored).unwrap(), dated);
}

#[test]
fn malformed_stored_shape_is_invalid_field() {
    assert!(matches!(
        DatedValue::from_value("loc", &json!(42)),
        Err(DeriveError::InvalidField { .. })
    ));
    assert!(matches!(
        DatedValue::from_value("loc", &json!({ "value": 9 })),
        Err(DeriveError::InvalidField { .. })
    ));
}
