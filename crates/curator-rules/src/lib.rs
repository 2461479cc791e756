//! curator-rules
//!
//! Attribute collections: the rule implementations that derive NACC and MQT
//! variables from a record under curation. Pure logic over the symbol table
//! — no I/O, no direct table mutation.

pub mod mqt;
pub mod registry;
pub mod uds;

use curator_core::error::DeriveError;
use curator_core::schema::RuleInfo;
use curator_core::symbol_table::SymbolTable;
use serde_json::Value;

/// Trait implemented by each attribute collection.
///
/// A collection is bound to one record: its constructor validates that the
/// record carries the fields the collection needs, returning
/// `MissingRequiredField` when it does not — the "this record is not for me"
/// signal the orchestrator turns into a skip.
pub trait AttributeCollection {
    /// Stable collection name, used in traces and registry errors.
    fn name(&self) -> &'static str;

    /// Execute one rule by name. The table is read-only here: rule output
    /// flows through the returned value and the write-event engine, never
    /// through direct mutation.
    fn execute(&self, rule: &str, table: &SymbolTable) -> Result<Value, DeriveError>;
}

impl std::fmt::Debug for dyn AttributeCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AttributeCollection").field(&self.name()).finish()
    }
}

/// Error for a rule name dispatched to the wrong collection. Rules are
/// resolved through the registry, so reaching this means the registry and
/// the collection's own dispatch table disagree.
pub(crate) fn unknown_rule(collection: &'static str, rule: &str) -> DeriveError {
    DeriveError::Precondition(format!(
        "collection '{collection}' has no rule named '{rule}'"
    ))
}

/// Constructor binding a collection to one record.
pub type CollectionCtor = fn(&SymbolTable) -> Result<Box<dyn AttributeCollection>, DeriveError>;

/// One registration entry: a collection plus its static rule declarations.
pub struct CollectionEntry {
    pub name: &'static str,
    pub ctor: CollectionCtor,
    pub rules: &'static [RuleInfo],
}
