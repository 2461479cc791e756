use thiserror::Error;

/// Runtime errors raised while curating one record.
///
/// Only `MissingRequiredField` is recoverable: it means a rule set does not
/// apply to the current record and the orchestrator should skip it. Every
/// other variant aborts the curation call — a partially derived record is
/// worse than a loudly failed one.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("missing required field(s): {}", fields.join(", "))]
    MissingRequiredField { fields: Vec<String> },

    #[error("invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("unparseable date '{value}': expected YYYY-MM-DD or MM/DD/YYYY")]
    DateParse { value: String },

    #[error("operation failed at '{location}': {message}")]
    Operation { location: String, message: String },

    /// A rule could not establish an invariant it needs (e.g. no visit date
    /// determinable). Fatal for the record.
    #[error("{0}")]
    Precondition(String),
}

impl DeriveError {
    pub fn missing_required<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingRequiredField {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn operation(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operation {
            location: location.into(),
            message: message.into(),
        }
    }

    /// True when the error means "this rule set does not apply here" rather
    /// than "this record is broken".
    pub fn is_inapplicable(&self) -> bool {
        matches!(self, Self::MissingRequiredField { .. })
    }
}
