//! MQT (query/table) rules: subject-level variables derived from the NACC
//! variables computed earlier in the same curation pass.

pub mod demographics;
pub mod visits;
