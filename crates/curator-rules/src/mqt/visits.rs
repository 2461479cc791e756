//! Subject-level visit accounting.

use curator_core::error::DeriveError;
use curator_core::schema::{EventDecl, Operation, RuleCategory, RuleInfo, RuleKind};
use curator_core::scope::{ScopeSpec, scopes};
use curator_core::symbol_table::SymbolTable;
use jiff::civil::Date;
use serde_json::{Value, json};

use crate::{AttributeCollection, unknown_rule};

const COLLECTION_NAME: &str = "mqt_visits";

const VISITS_SPEC: ScopeSpec = ScopeSpec {
    prefix: scopes::RAW_FORM_PREFIX,
    required: &["module", "visitdate"],
    date_field: Some("visitdate"),
};

pub static RULES: &[RuleInfo] = &[
    RuleInfo {
        name: "create_total_uds_visits",
        kind: RuleKind::Create,
        category: RuleCategory::Mqt,
        events: &[EventDecl {
            location: "subject.info.derived.total-uds-visits",
            operation: Operation::Count,
        }],
        value_type: "int",
        description: "Running count of the subject's curated UDS visits",
    },
    RuleInfo {
        name: "create_uds_visitdates",
        kind: RuleKind::Create,
        category: RuleCategory::Mqt,
        events: &[EventDecl {
            location: "subject.info.derived.uds-visitdates",
            operation: Operation::SortedList,
        }],
        value_type: "list of dates",
        description: "All of the subject's UDS visit dates, in order",
    },
    RuleInfo {
        name: "create_uds_visit_years",
        kind: RuleKind::Create,
        category: RuleCategory::Mqt,
        events: &[EventDecl {
            location: "subject.info.derived.uds-visit-years",
            operation: Operation::Set,
        }],
        value_type: "set of ints",
        description: "Distinct calendar years in which the subject had a UDS visit",
    },
];

pub struct MqtVisits {
    visitdate: Date,
}

impl MqtVisits {
    pub fn bind(table: &SymbolTable) -> Result<Box<dyn AttributeCollection>, DeriveError> {
        let scope = VISITS_SPEC.bind(table)?;
        crate::uds::require_uds_module(&scope)?;
        let visitdate = scope.require_date()?;
        Ok(Box::new(Self { visitdate }))
    }
}

impl AttributeCollection for MqtVisits {
    fn name(&self) -> &'static str {
        COLLECTION_NAME
    }

    fn execute(&self, rule: &str, _table: &SymbolTable) -> Result<Value, DeriveError> {
        match rule {
            // Any curated UDS visit counts once.
            "create_total_uds_visits" => Ok(json!(1)),
            "create_uds_visitdates" => Ok(json!(self.visitdate.to_string())),
            "create_uds_visit_years" => Ok(json!(i64::from(self.visitdate.year()))),
            other => Err(unknown_rule(COLLECTION_NAME, other)),
        }
    }
}
