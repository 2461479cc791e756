//! CSV rule-configuration loader.
//!
//! One row per (function, location, operation) triple. Rows are grouped by
//! function in first-appearance order; the NACC/MQT split comes from the
//! registry's rule declarations, not from the file.

use std::io::Read;

use curator_core::schema::{Operation, RuleCategory};
use curator_rules::registry::RuleRegistry;

use crate::error::ConfigError;
use crate::schema::{CurationSchema, Event, SchemaEntry};

const FUNCTION_COLUMN: &str = "function";
const LOCATION_COLUMN: &str = "location";
const OPERATION_COLUMN: &str = "operation";

/// Load a curation schema from rule-configuration CSV.
pub fn load_csv<R: Read>(
    reader: R,
    registry: &RuleRegistry,
    date_key: impl Into<String>,
) -> Result<CurationSchema, ConfigError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let function_index = column_index(&headers, FUNCTION_COLUMN)?;
    let location_index = column_index(&headers, LOCATION_COLUMN)?;
    let operation_index = column_index(&headers, OPERATION_COLUMN)?;

    let mut nacc: Vec<SchemaEntry> = Vec::new();
    let mut mqt: Vec<SchemaEntry> = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let function = record.get(function_index).unwrap_or("").trim();
        let location = record.get(location_index).unwrap_or("").trim();
        let operation: Operation = record.get(operation_index).unwrap_or("").parse()?;

        let registered = registry
            .get(function)
            .ok_or_else(|| ConfigError::UnknownRule(function.to_string()))?;
        let bucket = match registered.info.category {
            RuleCategory::Nacc => &mut nacc,
            RuleCategory::Mqt => &mut mqt,
        };

        let event = Event {
            location: location.to_string(),
            operation,
        };
        match bucket.iter_mut().find(|entry| entry.function == function) {
            Some(entry) => entry.events.push(event),
            None => bucket.push(SchemaEntry {
                function: function.to_string(),
                events: vec![event],
                value_type: registered.info.value_type.to_string(),
                description: registered.info.description.to_string(),
            }),
        }
    }

    Ok(CurationSchema {
        date_key: date_key.into(),
        nacc_derived_vars: nacc,
        mqt_derived_vars: mqt,
    })
}

fn column_index(
    headers: &csv::StringRecord,
    name: &'static str,
) -> Result<usize, ConfigError> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or(ConfigError::MissingColumn(name))
}
