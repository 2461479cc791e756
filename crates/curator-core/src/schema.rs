//! Rule and write-event schema vocabulary shared by the rules and deriver
//! crates. Each rule declares its target locations and operations as data,
//! right next to its implementation, and the registry validates the
//! declarations at build time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a freshly computed value is reconciled with the value already stored
/// at its target location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Update,
    Initial,
    Latest,
    Count,
    Min,
    Max,
    Set,
    SortedList,
    BoolOnce,
}

#[derive(Debug, Error)]
#[error("unknown operation '{0}'")]
pub struct UnknownOperation(pub String);

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Initial => "initial",
            Self::Latest => "latest",
            Self::Count => "count",
            Self::Min => "min",
            Self::Max => "max",
            Self::Set => "set",
            Self::SortedList => "sorted-list",
            Self::BoolOnce => "bool-once",
        }
    }

    /// Operations that compare against the record's ordering date and so
    /// cannot be configured without a date key.
    pub fn is_date_keyed(self) -> bool {
        matches!(self, Self::Initial | Self::Latest)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "update" => Ok(Self::Update),
            "initial" => Ok(Self::Initial),
            "latest" => Ok(Self::Latest),
            "count" => Ok(Self::Count),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "set" => Ok(Self::Set),
            "sorted-list" => Ok(Self::SortedList),
            "bool-once" => Ok(Self::BoolOnce),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

/// The two ordered rule categories. Every NACC rule runs before any MQT
/// rule, so MQT rules may read NACC outputs from the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Nacc,
    Mqt,
}

/// Value-creation rules compute a derived variable; missingness rules
/// resolve a still-unset variable to its documented unknown code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Create,
    Missingness,
}

/// One declared write target for a rule's result.
#[derive(Debug, Clone, Copy)]
pub struct EventDecl {
    pub location: &'static str,
    pub operation: Operation,
}

/// Static declaration of one rule, kept next to its implementation.
#[derive(Debug, Clone, Copy)]
pub struct RuleInfo {
    pub name: &'static str,
    pub kind: RuleKind,
    pub category: RuleCategory,
    pub events: &'static [EventDecl],
    pub value_type: &'static str,
    pub description: &'static str,
}
