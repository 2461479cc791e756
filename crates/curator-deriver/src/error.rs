use curator_core::schema::UnknownOperation;
use curator_rules::registry::RegistryError;
use thiserror::Error;

/// Load-time configuration errors. These must surface when the deriver is
/// built, never during a per-record curation call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rule configuration is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error(transparent)]
    UnknownOperation(#[from] UnknownOperation),

    #[error("unknown rule '{0}' in curation schema")]
    UnknownRule(String),

    #[error("rule '{0}' appears more than once in the curation schema")]
    DuplicateRule(String),

    #[error("rule '{0}' declares no write events")]
    NoEvents(String),

    #[error("operation '{operation}' on '{location}' requires a date key, but none is configured")]
    DateKeyRequired { operation: String, location: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
