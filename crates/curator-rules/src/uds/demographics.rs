//! Demographic derivations from the UDS A1 form.

use curator_core::dates::age_in_years;
use curator_core::error::DeriveError;
use curator_core::schema::{EventDecl, Operation, RuleCategory, RuleInfo, RuleKind};
use curator_core::scope::{ScopeSpec, scopes};
use curator_core::symbol_table::SymbolTable;
use jiff::civil::Date;
use serde_json::{Value, json};

use crate::{AttributeCollection, unknown_rule};

const COLLECTION_NAME: &str = "uds_demographics";

const DEMOGRAPHICS_SPEC: ScopeSpec = ScopeSpec {
    prefix: scopes::RAW_FORM_PREFIX,
    required: &["module", "visitdate", "birthmo", "birthyr"],
    date_field: Some("visitdate"),
};

pub static RULES: &[RuleInfo] = &[RuleInfo {
    name: "create_naccage",
    kind: RuleKind::Create,
    category: RuleCategory::Nacc,
    events: &[EventDecl {
        location: "file.info.derived.naccage",
        operation: Operation::Update,
    }],
    value_type: "int",
    description: "Subject's age at the visit, in full years",
}];

/// Bound to a UDS form carrying a visit date and month/year of birth.
pub struct UdsDemographics {
    visitdate: Date,
    dob: Date,
}

impl UdsDemographics {
    pub fn bind(table: &SymbolTable) -> Result<Box<dyn AttributeCollection>, DeriveError> {
        let scope = DEMOGRAPHICS_SPEC.bind(table)?;
        super::require_uds_module(&scope)?;

        let visitdate = scope.require_date()?;
        let birthmo: i64 = scope.require("birthmo")?;
        let birthyr: i64 = scope.require("birthyr")?;
        let year = i16::try_from(birthyr).map_err(|_| {
            DeriveError::invalid_field(scope.path("birthyr"), format!("{birthyr} is not a year"))
        })?;
        let month = i8::try_from(birthmo).map_err(|_| {
            DeriveError::invalid_field(scope.path("birthmo"), format!("{birthmo} is not a month"))
        })?;
        // Day of birth is not collected; the first of the month stands in.
        let dob = Date::new(year, month, 1).map_err(|err| {
            DeriveError::invalid_field(scope.path("birthmo"), err.to_string())
        })?;
        Ok(Box::new(Self { visitdate, dob }))
    }

    fn create_naccage(&self) -> Result<Value, DeriveError> {
        Ok(json!(age_in_years(self.dob, self.visitdate)))
    }
}

impl AttributeCollection for UdsDemographics {
    fn name(&self) -> &'static str {
        COLLECTION_NAME
    }

    fn execute(&self, rule: &str, _table: &SymbolTable) -> Result<Value, DeriveError> {
        match rule {
            "create_naccage" => self.create_naccage(),
            other => Err(unknown_rule(COLLECTION_NAME, other)),
        }
    }
}
