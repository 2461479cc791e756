//! Missingness resolution for UDS-derived variables.
//!
//! These rules run after the value-creation rules for the same form and fill
//! still-unset variables with their documented unknown codes. They require
//! only that the file is a UDS form, so they fire even when the creation
//! rules' own inputs were absent.

use curator_core::error::DeriveError;
use curator_core::schema::{EventDecl, Operation, RuleCategory, RuleInfo, RuleKind};
use curator_core::scope::{ScopeSpec, scopes};
use curator_core::symbol_table::SymbolTable;
use serde_json::{Value, json};

use crate::{AttributeCollection, unknown_rule};

const COLLECTION_NAME: &str = "uds_missingness";

const MISSINGNESS_SPEC: ScopeSpec = ScopeSpec {
    prefix: scopes::RAW_FORM_PREFIX,
    required: &["module", "visitdate"],
    date_field: Some("visitdate"),
};

/// Unknown code for age at visit.
const AGE_UNKNOWN: i64 = 999;

pub static RULES: &[RuleInfo] = &[RuleInfo {
    name: "missing_naccage",
    kind: RuleKind::Missingness,
    category: RuleCategory::Nacc,
    events: &[EventDecl {
        location: "file.info.derived.naccage",
        operation: Operation::Update,
    }],
    value_type: "int",
    description: "Age at visit, resolved to 999 when it could not be derived",
}];

pub struct UdsMissingness;

impl UdsMissingness {
    pub fn bind(table: &SymbolTable) -> Result<Box<dyn AttributeCollection>, DeriveError> {
        let scope = MISSINGNESS_SPEC.bind(table)?;
        super::require_uds_module(&scope)?;
        Ok(Box::new(Self))
    }

    fn missing_naccage(&self, table: &SymbolTable) -> Result<Value, DeriveError> {
        let derived = scopes::FILE_DERIVED.bind(table)?;
        Ok(json!(derived.get_or("naccage", AGE_UNKNOWN)?))
    }
}

impl AttributeCollection for UdsMissingness {
    fn name(&self) -> &'static str {
        COLLECTION_NAME
    }

    fn execute(&self, rule: &str, table: &SymbolTable) -> Result<Value, DeriveError> {
        match rule {
            "missing_naccage" => self.missing_naccage(table),
            other => Err(unknown_rule(COLLECTION_NAME, other)),
        }
    }
}
