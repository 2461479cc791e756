//! Prefix-scoped, typed accessors over the symbol table.
//!
//! A [`ScopeSpec`] names a region of the table (raw form fields, derived
//! file-level fields, subject-level state, ...) plus the fields that must be
//! present for the region to be usable. Binding a spec to a table performs
//! the fail-fast required-fields check — the mechanism by which a rule set
//! signals "this record is not for me".

use jiff::civil::Date;
use serde_json::Value;

use crate::dated::DatedValue;
use crate::dates::parse_form_date;
use crate::error::DeriveError;
use crate::symbol_table::SymbolTable;

/// Raw-form strings that read as "no answer".
const BLANK_SENTINELS: [&str; 5] = ["", ".", "`", "--", "-"];

/// Typed reads out of a form field. Numeric fields routinely arrive as
/// strings in submitted JSON, so string coercion is part of the contract.
pub trait FieldValue: Sized {
    fn type_name() -> &'static str;
    fn from_field(value: &Value) -> Option<Self>;
}

impl FieldValue for i64 {
    fn type_name() -> &'static str {
        "int"
    }

    fn from_field(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    fn type_name() -> &'static str {
        "float"
    }

    fn from_field(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FieldValue for String {
    fn type_name() -> &'static str {
        "str"
    }

    fn from_field(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn type_name() -> &'static str {
        "bool"
    }

    fn from_field(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.trim() {
                "0" => Some(false),
                "1" => Some(true),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A field that is absent, null, or holds only a blank sentinel.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => BLANK_SENTINELS.contains(&s.trim()),
        Some(_) => false,
    }
}

/// Configuration for one scoped view: path prefix, required fields, and the
/// field carrying the visit date (when the region has one).
#[derive(Debug, Clone, Copy)]
pub struct ScopeSpec {
    pub prefix: &'static str,
    pub required: &'static [&'static str],
    pub date_field: Option<&'static str>,
}

impl ScopeSpec {
    /// Bind to a table. Fails with `MissingRequiredField` naming the full
    /// path of every required field that is absent or blank; the check never
    /// partially succeeds.
    pub fn bind<'t>(&self, table: &'t SymbolTable) -> Result<Scope<'t>, DeriveError> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|field| is_blank(table.get(&format!("{}{field}", self.prefix))))
            .map(|field| format!("{}{field}", self.prefix))
            .collect();
        if !missing.is_empty() {
            return Err(DeriveError::MissingRequiredField { fields: missing });
        }
        Ok(Scope {
            table,
            prefix: self.prefix,
            date_field: self.date_field,
        })
    }
}

/// A bound scope: read-only, typed access to one region of the table.
#[derive(Debug)]
pub struct Scope<'t> {
    table: &'t SymbolTable,
    prefix: &'static str,
    date_field: Option<&'static str>,
}

impl<'t> Scope<'t> {
    /// Full table path of a field in this scope.
    pub fn path(&self, field: &str) -> String {
        format!("{}{field}", self.prefix)
    }

    /// Untyped read, no blank coercion.
    pub fn raw(&self, field: &str) -> Option<&'t Value> {
        self.table.get(&self.path(field))
    }

    /// Typed read. Absent fields and blank sentinels resolve to `None`;
    /// a present value that cannot be cast is `InvalidField`.
    pub fn get<T: FieldValue>(&self, field: &str) -> Result<Option<T>, DeriveError> {
        let path = self.path(field);
        let Some(value) = self.table.get(&path) else {
            return Ok(None);
        };
        if is_blank(Some(value)) {
            return Ok(None);
        }
        match T::from_field(value) {
            Some(typed) => Ok(Some(typed)),
            None => Err(DeriveError::invalid_field(
                path,
                format!("cannot read {value} as {}", T::type_name()),
            )),
        }
    }

    pub fn get_or<T: FieldValue>(&self, field: &str, default: T) -> Result<T, DeriveError> {
        Ok(self.get(field)?.unwrap_or(default))
    }

    /// As [`Scope::get`], but a blank/absent field is itself `InvalidField`.
    pub fn require<T: FieldValue>(&self, field: &str) -> Result<T, DeriveError> {
        self.get(field)?.ok_or_else(|| {
            DeriveError::invalid_field(self.path(field), "required field is blank or absent")
        })
    }

    /// Parse this scope's visit date, if a date field is configured and
    /// populated. A populated but unparseable date is a fatal parse error.
    pub fn date(&self) -> Result<Option<Date>, DeriveError> {
        let Some(field) = self.date_field else {
            return Ok(None);
        };
        match self.get::<String>(field)? {
            Some(raw) => Ok(Some(parse_form_date(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn require_date(&self) -> Result<Date, DeriveError> {
        self.date()?.ok_or_else(|| {
            DeriveError::Precondition(format!("no visit date available under '{}'", self.prefix))
        })
    }
}

/// Canonical regions of the symbol table.
pub mod scopes {
    use super::ScopeSpec;

    pub const RAW_FORM_PREFIX: &str = "file.info.forms.json.";
    pub const FILE_DERIVED_PREFIX: &str = "file.info.derived.";
    pub const SUBJECT_DERIVED_PREFIX: &str = "subject.info.derived.";
    pub const SUBJECT_LONGITUDINAL_PREFIX: &str = "subject.info.longitudinal.";
    pub const PREV_VISIT_PREFIX: &str = "file.prev_visit.forms.json.";
    pub const WORKING_PREFIX: &str = "working.";

    /// Raw fields of the form being curated.
    pub const RAW_FORM: ScopeSpec = ScopeSpec {
        prefix: RAW_FORM_PREFIX,
        required: &["visitdate"],
        date_field: Some("visitdate"),
    };

    /// Variables derived for the current file earlier in the same pass.
    pub const FILE_DERIVED: ScopeSpec = ScopeSpec {
        prefix: FILE_DERIVED_PREFIX,
        required: &[],
        date_field: None,
    };

    /// Cross-sectional subject state: one current-best value per attribute.
    pub const SUBJECT_DERIVED: ScopeSpec = ScopeSpec {
        prefix: SUBJECT_DERIVED_PREFIX,
        required: &[],
        date_field: None,
    };

    /// Longitudinal subject state: ordered-by-date value histories.
    pub const SUBJECT_LONGITUDINAL: ScopeSpec = ScopeSpec {
        prefix: SUBJECT_LONGITUDINAL_PREFIX,
        required: &[],
        date_field: None,
    };

    /// Raw fields of the subject's previous visit, when supplied.
    pub const PREV_VISIT: ScopeSpec = ScopeSpec {
        prefix: PREV_VISIT_PREFIX,
        required: &[],
        date_field: Some("visitdate"),
    };

    /// Scratch space for intermediate values within one pass.
    pub const WORKING: ScopeSpec = ScopeSpec {
        prefix: WORKING_PREFIX,
        required: &[],
        date_field: None,
    };
}

/// Accessor over the subject's longitudinal histories.
pub struct LongitudinalScope<'t> {
    scope: Scope<'t>,
}

impl<'t> LongitudinalScope<'t> {
    pub fn bind(table: &'t SymbolTable) -> Result<Self, DeriveError> {
        Ok(Self {
            scope: scopes::SUBJECT_LONGITUDINAL.bind(table)?,
        })
    }

    /// Full history for one attribute, sorted by date. An absent attribute
    /// has an empty history; a non-list or malformed entry is malformed data.
    pub fn history(&self, field: &str) -> Result<Vec<DatedValue>, DeriveError> {
        let path = self.scope.path(field);
        let Some(raw) = self.scope.raw(field) else {
            return Ok(Vec::new());
        };
        let items = raw.as_array().ok_or_else(|| {
            DeriveError::invalid_field(&path, format!("expected a list of dated values, found {raw}"))
        })?;
        let mut history = items
            .iter()
            .map(|item| DatedValue::from_value(&path, item))
            .collect::<Result<Vec<_>, _>>()?;
        history.sort_by_key(|dated| dated.date);
        Ok(history)
    }

    /// Most recent entry strictly before the current visit. An entry dated
    /// equal to `current` is skipped so a rule never reads its own write
    /// from the same pass.
    pub fn latest_before(
        &self,
        field: &str,
        current: Date,
    ) -> Result<Option<DatedValue>, DeriveError> {
        Ok(self
            .history(field)?
            .into_iter()
            .filter(|dated| dated.date < current)
            .next_back())
    }

    /// The value recorded on a specific visit date, if any.
    pub fn value_on(&self, field: &str, date: Date) -> Result<Option<Value>, DeriveError> {
        Ok(self
            .history(field)?
            .into_iter()
            .find(|dated| dated.date == date)
            .map(|dated| dated.value))
    }
}
