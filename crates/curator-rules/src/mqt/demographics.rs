//! Subject-level age and status variables built from NACC outputs.

use curator_core::dated::DatedValue;
use curator_core::error::DeriveError;
use curator_core::schema::{EventDecl, Operation, RuleCategory, RuleInfo, RuleKind};
use curator_core::scope::{LongitudinalScope, ScopeSpec, scopes};
use curator_core::symbol_table::SymbolTable;
use jiff::civil::Date;
use serde_json::{Value, json};

use crate::{AttributeCollection, unknown_rule};

const COLLECTION_NAME: &str = "mqt_demographics";

/// Applicable only once an age has been derived for the current file.
const MQT_DEMOGRAPHICS_SPEC: ScopeSpec = ScopeSpec {
    prefix: scopes::FILE_DERIVED_PREFIX,
    required: &["naccage"],
    date_field: None,
};

const VISIT_SPEC: ScopeSpec = ScopeSpec {
    prefix: scopes::RAW_FORM_PREFIX,
    required: &["visitdate"],
    date_field: Some("visitdate"),
};

/// Ages carrying the unknown code never feed subject-level aggregates.
const AGE_UNKNOWN: i64 = 999;

/// Status codes at or above MCI count as cognitively impaired.
const STATUS_MCI: i64 = 3;

pub static RULES: &[RuleInfo] = &[
    RuleInfo {
        name: "create_uds_age",
        kind: RuleKind::Create,
        category: RuleCategory::Mqt,
        events: &[
            EventDecl {
                location: "subject.info.derived.uds-age-initial",
                operation: Operation::Initial,
            },
            EventDecl {
                location: "subject.info.derived.uds-age-latest",
                operation: Operation::Latest,
            },
            EventDecl {
                location: "subject.info.derived.uds-age-min",
                operation: Operation::Min,
            },
            EventDecl {
                location: "subject.info.derived.uds-age-max",
                operation: Operation::Max,
            },
        ],
        value_type: "int",
        description: "Age at this UDS visit, folded into subject-level bounds",
    },
    RuleInfo {
        name: "create_uds_age_history",
        kind: RuleKind::Create,
        category: RuleCategory::Mqt,
        events: &[EventDecl {
            location: "subject.info.longitudinal.uds-age",
            operation: Operation::SortedList,
        }],
        value_type: "dated int",
        description: "Per-visit age history, ordered by visit date",
    },
    RuleInfo {
        name: "create_age_at_previous_visit",
        kind: RuleKind::Create,
        category: RuleCategory::Mqt,
        events: &[EventDecl {
            location: "file.info.derived.age-at-previous-visit",
            operation: Operation::Update,
        }],
        value_type: "int",
        description: "Age recorded at the subject's most recent earlier visit",
    },
    RuleInfo {
        name: "create_ever_cognitively_impaired",
        kind: RuleKind::Create,
        category: RuleCategory::Mqt,
        events: &[EventDecl {
            location: "subject.info.derived.ever-cognitively-impaired",
            operation: Operation::BoolOnce,
        }],
        value_type: "bool",
        description: "Whether any visit to date coded MCI or dementia",
    },
];

pub struct MqtDemographics {
    age: Option<i64>,
    visitdate: Date,
}

impl MqtDemographics {
    pub fn bind(table: &SymbolTable) -> Result<Box<dyn AttributeCollection>, DeriveError> {
        let derived = MQT_DEMOGRAPHICS_SPEC.bind(table)?;
        let visitdate = VISIT_SPEC.bind(table)?.require_date()?;
        let age = derived.require::<i64>("naccage")?;
        Ok(Box::new(Self {
            age: (age != AGE_UNKNOWN).then_some(age),
            visitdate,
        }))
    }

    fn create_uds_age(&self) -> Result<Value, DeriveError> {
        Ok(self.age.map_or(Value::Null, |age| json!(age)))
    }

    fn create_uds_age_history(&self) -> Result<Value, DeriveError> {
        Ok(self
            .age
            .map_or(Value::Null, |age| {
                DatedValue::new(self.visitdate, json!(age)).to_value()
            }))
    }

    fn create_age_at_previous_visit(&self, table: &SymbolTable) -> Result<Value, DeriveError> {
        let longitudinal = LongitudinalScope::bind(table)?;
        Ok(longitudinal
            .latest_before("uds-age", self.visitdate)?
            .map_or(Value::Null, |dated| dated.value))
    }

    fn create_ever_cognitively_impaired(&self, table: &SymbolTable) -> Result<Value, DeriveError> {
        let derived = scopes::FILE_DERIVED.bind(table)?;
        Ok(derived
            .get::<i64>("naccudsd")?
            .map_or(Value::Null, |status| json!(status >= STATUS_MCI)))
    }
}

impl AttributeCollection for MqtDemographics {
    fn name(&self) -> &'static str {
        COLLECTION_NAME
    }

    fn execute(&self, rule: &str, table: &SymbolTable) -> Result<Value, DeriveError> {
        match rule {
            "create_uds_age" => self.create_uds_age(),
            "create_uds_age_history" => self.create_uds_age_history(),
            "create_age_at_previous_visit" => self.create_age_at_previous_visit(table),
            "create_ever_cognitively_impaired" => self.create_ever_cognitively_impaired(table),
            other => Err(unknown_rule(COLLECTION_NAME, other)),
        }
    }
}
