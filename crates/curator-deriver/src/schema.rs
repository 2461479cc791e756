//! The curation schema: which rules run, in what order, and where each
//! result is written.

use curator_core::schema::{Operation, RuleCategory};
use curator_rules::registry::RuleRegistry;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default table path of the record's ordering date.
pub const DEFAULT_DATE_KEY: &str = "file.info.forms.json.visitdate";

/// One write target for a rule's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub location: String,
    pub operation: Operation,
}

/// One rule binding: the rule name plus its ordered write events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub function: String,
    pub events: Vec<Event>,
    #[serde(rename = "type")]
    pub value_type: String,
    pub description: String,
}

/// The full curation schema. `curation_order` is the load-bearing macro
/// ordering: every NACC entry runs before any MQT entry, so MQT rules may
/// read NACC outputs from the same pass but never the reverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationSchema {
    pub date_key: String,
    pub nacc_derived_vars: Vec<SchemaEntry>,
    pub mqt_derived_vars: Vec<SchemaEntry>,
}

impl CurationSchema {
    /// All entries in execution order: NACC entries as configured, then MQT
    /// entries as configured.
    pub fn curation_order(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.nacc_derived_vars.iter().chain(self.mqt_derived_vars.iter())
    }

    pub fn len(&self) -> usize {
        self.nacc_derived_vars.len() + self.mqt_derived_vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nacc_derived_vars.is_empty() && self.mqt_derived_vars.is_empty()
    }

    /// Generate the schema from the rules' own static declarations, in
    /// registration order.
    pub fn generate(registry: &RuleRegistry, date_key: impl Into<String>) -> Self {
        let mut nacc = Vec::new();
        let mut mqt = Vec::new();
        for rule in registry.iter() {
            let entry = SchemaEntry {
                function: rule.info.name.to_string(),
                events: rule
                    .info
                    .events
                    .iter()
                    .map(|event| Event {
                        location: event.location.to_string(),
                        operation: event.operation,
                    })
                    .collect(),
                value_type: rule.info.value_type.to_string(),
                description: rule.info.description.to_string(),
            };
            match rule.info.category {
                RuleCategory::Nacc => nacc.push(entry),
                RuleCategory::Mqt => mqt.push(entry),
            }
        }
        Self {
            date_key: date_key.into(),
            nacc_derived_vars: nacc,
            mqt_derived_vars: mqt,
        }
    }

    /// Parse the generated-schema JSON form.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
