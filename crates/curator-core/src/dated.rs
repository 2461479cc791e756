use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::dates::parse_form_date;
use crate::error::DeriveError;

/// A value paired with the visit date it was observed or derived on.
///
/// Longitudinal subject state is stored as lists of these, kept sorted by
/// `date` alone (see `LongitudinalScope::history`); the payload never
/// participates in ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: Date,
    pub value: Value,
}

impl DatedValue {
    pub fn new(date: Date, value: Value) -> Self {
        Self { date, value }
    }

    /// The stored shape: `{"date": "YYYY-MM-DD", "value": ...}`.
    pub fn to_value(&self) -> Value {
        json!({ "date": self.date.to_string(), "value": self.value })
    }

    /// Read back a stored dated value. A non-conforming shape at `location`
    /// is malformed data, not a missing read.
    pub fn from_value(location: &str, raw: &Value) -> Result<Self, DeriveError> {
        let object = raw.as_object().ok_or_else(|| {
            DeriveError::invalid_field(location, format!("expected a dated value object, found {raw}"))
        })?;
        let date_raw = object.get("date").and_then(Value::as_str).ok_or_else(|| {
            DeriveError::invalid_field(location, "dated value has no string 'date' field")
        })?;
        let date = parse_form_date(date_raw)?;
        let value = object.get("value").cloned().unwrap_or(Value::Null);
        Ok(Self { date, value })
    }
}
