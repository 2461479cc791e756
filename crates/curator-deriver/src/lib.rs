//! curator-deriver
//!
//! The curation engine: loads the rule schema, fixes execution order (NACC
//! rules before MQT rules), dispatches each rule through the registry, and
//! folds results into the symbol table through write events.

pub mod config;
pub mod deriver;
pub mod error;
pub mod events;
pub mod schema;
