//! Cognitive-status derivation from the UDS B4 form.

use curator_core::error::DeriveError;
use curator_core::schema::{EventDecl, Operation, RuleCategory, RuleInfo, RuleKind};
use curator_core::scope::{ScopeSpec, scopes};
use curator_core::symbol_table::SymbolTable;
use serde_json::{Value, json};

use crate::{AttributeCollection, unknown_rule};

const COLLECTION_NAME: &str = "uds_cognitive";

const COGNITIVE_SPEC: ScopeSpec = ScopeSpec {
    prefix: scopes::RAW_FORM_PREFIX,
    required: &["module", "visitdate", "cdrglob"],
    date_field: Some("visitdate"),
};

/// NACCUDSD-style status codes.
const STATUS_NORMAL: i64 = 1;
const STATUS_IMPAIRED_NOT_MCI: i64 = 2;
const STATUS_MCI: i64 = 3;
const STATUS_DEMENTIA: i64 = 4;

pub static RULES: &[RuleInfo] = &[RuleInfo {
    name: "create_naccudsd",
    kind: RuleKind::Create,
    category: RuleCategory::Nacc,
    events: &[EventDecl {
        location: "file.info.derived.naccudsd",
        operation: Operation::Update,
    }],
    value_type: "int",
    description: "Cognitive status at the visit, coded from the global CDR",
}];

pub struct UdsCognitive {
    cdrglob: f64,
}

impl UdsCognitive {
    pub fn bind(table: &SymbolTable) -> Result<Box<dyn AttributeCollection>, DeriveError> {
        let scope = COGNITIVE_SPEC.bind(table)?;
        super::require_uds_module(&scope)?;
        let cdrglob: f64 = scope.require("cdrglob")?;
        Ok(Box::new(Self { cdrglob }))
    }

    fn create_naccudsd(&self) -> Result<Value, DeriveError> {
        let status = if self.cdrglob == 0.0 {
            STATUS_NORMAL
        } else if self.cdrglob == 0.5 {
            STATUS_MCI
        } else if self.cdrglob == 1.0 || self.cdrglob == 2.0 || self.cdrglob == 3.0 {
            STATUS_DEMENTIA
        } else if self.cdrglob > 0.0 && self.cdrglob < 0.5 {
            STATUS_IMPAIRED_NOT_MCI
        } else {
            // Anything else is out of the instrument's range. There is no
            // defensible default status, so refuse the record.
            return Err(DeriveError::Precondition(format!(
                "cannot resolve a cognitive status for global CDR {}",
                self.cdrglob
            )));
        };
        Ok(json!(status))
    }
}

impl AttributeCollection for UdsCognitive {
    fn name(&self) -> &'static str {
        COLLECTION_NAME
    }

    fn execute(&self, rule: &str, _table: &SymbolTable) -> Result<Value, DeriveError> {
        match rule {
            "create_naccudsd" => self.create_naccudsd(),
            other => Err(unknown_rule(COLLECTION_NAME, other)),
        }
    }
}
