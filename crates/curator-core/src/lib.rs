//! curator-core
//!
//! Shared vocabulary of the curation engine: the hierarchical symbol table
//! holding one record's raw and derived fields, scoped typed accessors over
//! it, date handling, and the rule/event schema types. No I/O.

pub mod dated;
pub mod dates;
pub mod error;
pub mod schema;
pub mod scope;
pub mod symbol_table;
