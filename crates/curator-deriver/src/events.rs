//! The write-event engine: reconciles a rule's computed value with whatever
//! its target location already holds, one policy per operation.

use std::cmp::Ordering;

use curator_core::dated::DatedValue;
use curator_core::dates::parse_form_date;
use curator_core::error::DeriveError;
use curator_core::schema::Operation;
use curator_core::symbol_table::SymbolTable;
use serde_json::{Value, json};

/// Apply one write event. `date_key` is the table path of the record's
/// ordering date; only `initial`/`latest` consult it.
pub fn apply_event(
    table: &mut SymbolTable,
    operation: Operation,
    value: &Value,
    location: &str,
    date_key: Option<&str>,
) -> Result<(), DeriveError> {
    match operation {
        Operation::Update => {
            table.set(location, value.clone());
            Ok(())
        }
        Operation::Initial => apply_dated(table, value, location, date_key, Ordering::Less),
        Operation::Latest => apply_dated(table, value, location, date_key, Ordering::Greater),
        Operation::Count => apply_count(table, value, location),
        Operation::Min => apply_extreme(table, value, location, Ordering::Less),
        Operation::Max => apply_extreme(table, value, location, Ordering::Greater),
        Operation::Set => apply_set(table, value, location),
        Operation::SortedList => apply_sorted_list(table, value, location),
        Operation::BoolOnce => apply_bool_once(table, value, location),
    }
}

fn current_date(
    table: &SymbolTable,
    location: &str,
    date_key: Option<&str>,
) -> Result<jiff::civil::Date, DeriveError> {
    let key = date_key.ok_or_else(|| {
        DeriveError::operation(location, "no date key configured for a dated operation")
    })?;
    let raw = table.get(key).and_then(Value::as_str).ok_or_else(|| {
        DeriveError::operation(location, format!("no record date at '{key}'"))
    })?;
    parse_form_date(raw)
}

/// `initial` keeps the chronologically earliest dated value, `latest` the
/// most recent. Comparison is against the date stored with the prior value,
/// so correctness does not depend on call order.
fn apply_dated(
    table: &mut SymbolTable,
    value: &Value,
    location: &str,
    date_key: Option<&str>,
    keep_when: Ordering,
) -> Result<(), DeriveError> {
    if value.is_null() {
        return Ok(());
    }
    let current = current_date(table, location, date_key)?;
    if let Some(existing) = table.get(location) {
        let stored = DatedValue::from_value(location, existing)?;
        if current.cmp(&stored.date) != keep_when {
            return Ok(());
        }
    }
    table.set(location, DatedValue::new(current, value.clone()).to_value());
    Ok(())
}

/// A falsy value is "nothing to count". This conflates 0/false with "no
/// event happened"; confirmed product behavior, kept as-is.
fn apply_count(table: &mut SymbolTable, value: &Value, location: &str) -> Result<(), DeriveError> {
    if !is_truthy(value) {
        return Ok(());
    }
    let count = match table.get(location) {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
            DeriveError::operation(location, format!("cannot count into non-integer {n}"))
        })?,
        Some(other) => {
            return Err(DeriveError::operation(
                location,
                format!("cannot count into non-integer {other}"),
            ));
        }
    };
    table.set(location, json!(count + 1));
    Ok(())
}

fn apply_extreme(
    table: &mut SymbolTable,
    value: &Value,
    location: &str,
    keep_when: Ordering,
) -> Result<(), DeriveError> {
    if value.is_null() {
        return Ok(());
    }
    if let Some(existing) = table.get(location) {
        let ordering = compare_values(value, existing).ok_or_else(|| {
            DeriveError::operation(
                location,
                format!("cannot compare {value} with stored {existing}"),
            )
        })?;
        if ordering != keep_when {
            return Ok(());
        }
    }
    table.set(location, value.clone());
    Ok(())
}

fn apply_set(table: &mut SymbolTable, value: &Value, location: &str) -> Result<(), DeriveError> {
    if value.is_null() {
        return Ok(());
    }
    let mut items = existing_list(table, location)?;
    for member in members(value) {
        if !items.contains(&member) {
            items.push(member);
        }
    }
    table.set(location, Value::Array(items));
    Ok(())
}

fn apply_sorted_list(
    table: &mut SymbolTable,
    value: &Value,
    location: &str,
) -> Result<(), DeriveError> {
    if value.is_null() {
        return Ok(());
    }
    let mut items = existing_list(table, location)?;
    items.extend(members(value));
    items.sort_by(|a, b| {
        compare_values(a, b).unwrap_or_else(|| a.to_string().cmp(&b.to_string()))
    });
    table.set(location, Value::Array(items));
    Ok(())
}

/// First truthy value wins; later writes are ignored until the location is
/// cleared.
fn apply_bool_once(
    table: &mut SymbolTable,
    value: &Value,
    location: &str,
) -> Result<(), DeriveError> {
    if value.is_null() {
        return Ok(());
    }
    if table.get(location).is_some_and(is_truthy) {
        return Ok(());
    }
    table.set(location, value.clone());
    Ok(())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Natural ordering where one exists: numbers by magnitude, strings
/// lexicographically, false before true. Mixed types do not compare.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// A list value contributes its members; anything else contributes itself.
fn members(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn existing_list(table: &SymbolTable, location: &str) -> Result<Vec<Value>, DeriveError> {
    match table.get(location) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(DeriveError::operation(
            location,
            format!("expected a list, found {other}"),
        )),
    }
}
