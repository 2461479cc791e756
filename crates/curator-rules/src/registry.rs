//! Rule discovery. Every rule-bearing collection registers here, once, in
//! [`all_collections`]; the registry indexes the rules by name and validates
//! the static declarations so that configuration errors surface at build
//! time, never during a curation call.

use std::collections::HashMap;

use curator_core::schema::RuleInfo;
use thiserror::Error;

use crate::{CollectionCtor, CollectionEntry, mqt, uds};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate rule name '{rule}' (declared by '{first}' and '{second}')")]
    DuplicateRule {
        rule: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("rule '{rule}' in collection '{collection}' declares no write events")]
    NoEvents {
        rule: String,
        collection: &'static str,
    },
}

/// The registration list. Order matters within each category: the generated
/// curation schema runs rules in this order, NACC entries before MQT entries.
pub fn all_collections() -> Vec<CollectionEntry> {
    vec![
        CollectionEntry {
            name: "uds_demographics",
            ctor: uds::demographics::UdsDemographics::bind,
            rules: uds::demographics::RULES,
        },
        CollectionEntry {
            name: "uds_cognitive",
            ctor: uds::cognitive::UdsCognitive::bind,
            rules: uds::cognitive::RULES,
        },
        CollectionEntry {
            name: "uds_missingness",
            ctor: uds::missingness::UdsMissingness::bind,
            rules: uds::missingness::RULES,
        },
        CollectionEntry {
            name: "mqt_demographics",
            ctor: mqt::demographics::MqtDemographics::bind,
            rules: mqt::demographics::RULES,
        },
        CollectionEntry {
            name: "mqt_visits",
            ctor: mqt::visits::MqtVisits::bind,
            rules: mqt::visits::RULES,
        },
    ]
}

/// One rule as the deriver sees it: its declaration plus the constructor of
/// the collection that owns it.
#[derive(Debug)]
pub struct RegisteredRule {
    pub collection: &'static str,
    pub ctor: CollectionCtor,
    pub info: RuleInfo,
}

/// All rules, indexed by name, preserving registration order.
#[derive(Debug)]
pub struct RuleRegistry {
    rules: HashMap<&'static str, RegisteredRule>,
    order: Vec<&'static str>,
}

impl RuleRegistry {
    /// Build from the standard registration list.
    pub fn build() -> Result<Self, RegistryError> {
        Self::from_entries(all_collections())
    }

    /// Build from an explicit entry list. Duplicate rule names and rules
    /// without write events are rejected here, not at curation time.
    pub fn from_entries(entries: Vec<CollectionEntry>) -> Result<Self, RegistryError> {
        let mut rules = HashMap::new();
        let mut order = Vec::new();
        for entry in entries {
            for info in entry.rules {
                if info.events.is_empty() {
                    return Err(RegistryError::NoEvents {
                        rule: info.name.to_string(),
                        collection: entry.name,
                    });
                }
                let registered = RegisteredRule {
                    collection: entry.name,
                    ctor: entry.ctor,
                    info: *info,
                };
                if let Some(previous) = rules.insert(info.name, registered) {
                    return Err(RegistryError::DuplicateRule {
                        rule: info.name.to_string(),
                        first: previous.collection,
                        second: entry.name,
                    });
                }
                order.push(info.name);
            }
        }
        Ok(Self { rules, order })
    }

    pub fn get(&self, rule: &str) -> Option<&RegisteredRule> {
        self.rules.get(rule)
    }

    /// All registered rules, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredRule> {
        self.order.iter().filter_map(|name| self.rules.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
