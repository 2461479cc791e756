use serde_json::{Map, Value};

use crate::error::DeriveError;

/// Hierarchical key-value store for one record's curation pass.
///
/// Paths are dot-delimited strings resolved segment by segment against
/// nested JSON objects. Reads never materialize intermediate nodes; writes
/// create every missing intermediate object on the way to the leaf.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    root: Map<String, Value>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing raw-form JSON document. The document must be a JSON
    /// object at the top level.
    pub fn from_value(value: Value) -> Result<Self, DeriveError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DeriveError::invalid_field(
                "<root>",
                format!("expected a JSON object at the table root, found {other}"),
            )),
        }
    }

    /// Resolve a dot-path. Any absent segment (or a non-object intermediate)
    /// yields `None`; a missing read is never an error.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Write a value at a dot-path, creating intermediate objects as needed.
    /// A non-object value sitting where an intermediate is needed is
    /// replaced by an object.
    pub fn set(&mut self, path: &str, value: Value) {
        let mut current = &mut self.root;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.insert(segment.to_string(), value);
                return;
            }
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(next) = slot else { return };
            current = next;
        }
    }

    /// Structural export of the full table as plain nested JSON.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}
