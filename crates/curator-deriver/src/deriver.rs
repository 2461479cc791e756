//! The orchestrator: runs the curation order against one record's table.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use curator_core::error::DeriveError;
use curator_core::symbol_table::SymbolTable;
use curator_rules::AttributeCollection;
use curator_rules::registry::RuleRegistry;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::events::apply_event;
use crate::schema::CurationSchema;

#[derive(Debug)]
pub struct AttributeDeriver {
    schema: CurationSchema,
    registry: RuleRegistry,
}

impl AttributeDeriver {
    /// Build a deriver, validating the schema against the registry. Unknown
    /// rules, duplicates, empty event lists, and date-keyed operations
    /// without a date key all fail here, once, instead of per record.
    pub fn new(schema: CurationSchema, registry: RuleRegistry) -> Result<Self, ConfigError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for entry in schema.curation_order() {
            if !seen.insert(entry.function.as_str()) {
                return Err(ConfigError::DuplicateRule(entry.function.clone()));
            }
            if entry.events.is_empty() {
                return Err(ConfigError::NoEvents(entry.function.clone()));
            }
            if registry.get(&entry.function).is_none() {
                return Err(ConfigError::UnknownRule(entry.function.clone()));
            }
            for event in &entry.events {
                if event.operation.is_date_keyed() && schema.date_key.trim().is_empty() {
                    return Err(ConfigError::DateKeyRequired {
                        operation: event.operation.to_string(),
                        location: event.location.clone(),
                    });
                }
            }
        }
        Ok(Self { schema, registry })
    }

    pub fn schema(&self) -> &CurationSchema {
        &self.schema
    }

    /// Curate one record: run every configured rule in curation order and
    /// fold the results into the table.
    ///
    /// A collection whose constructor reports `MissingRequiredField` does
    /// not apply to this record; its rules are skipped. Any other error
    /// aborts the whole call — later rules may depend on earlier outputs,
    /// so a partially derived record is never produced deliberately.
    pub fn curate(&self, table: &mut SymbolTable) -> Result<(), DeriveError> {
        let date_key = self.schema.date_key.as_str();
        if !has_order_key(table, date_key) {
            return Err(DeriveError::Precondition(format!(
                "record has no value at ordering key '{date_key}'"
            )));
        }
        info!(date_key, rules = self.schema.len(), "curating record");

        // One instance per collection per call. A failed bind is remembered
        // so later rules on the same collection skip without re-validating.
        let mut bound: HashMap<&'static str, Option<Box<dyn AttributeCollection>>> =
            HashMap::new();

        for entry in self.schema.curation_order() {
            let Some(registered) = self.registry.get(&entry.function) else {
                // Validated at construction; a miss here means the registry
                // changed underneath us.
                return Err(DeriveError::Precondition(format!(
                    "rule '{}' is not registered",
                    entry.function
                )));
            };

            let outcome = match bound.entry(registered.collection) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => {
                    let instance = match (registered.ctor)(table) {
                        Ok(collection) => Some(collection),
                        Err(err) if err.is_inapplicable() => {
                            debug!(
                                collection = registered.collection,
                                %err,
                                "collection does not apply to this record"
                            );
                            None
                        }
                        Err(err) => return Err(err),
                    };
                    slot.insert(instance)
                }
            };
            let Some(collection) = outcome else {
                debug!(rule = entry.function.as_str(), "skipped: collection inapplicable");
                continue;
            };

            let value = collection.execute(&entry.function, table)?;
            for event in &entry.events {
                apply_event(table, event.operation, &value, &event.location, Some(date_key))?;
            }
        }
        Ok(())
    }
}

/// The ordering key must resolve to something non-empty before any
/// longitudinal write can be reconciled.
fn has_order_key(table: &SymbolTable, date_key: &str) -> bool {
    match table.get(date_key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
