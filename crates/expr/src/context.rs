use model::core::value::Value;
use std::collections::HashMap;

/// The per-application flattened context identifiers resolve against:
/// top-level attributes of the XML root, plus dotted cross-element
/// references such as `contact.first_name` pre-resolved by the mapping
/// engine against the deduped primary contact before evaluation begins.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    values: HashMap<String, Value>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(key.into().to_ascii_lowercase(), value);
        self
    }

    /// Unknown identifiers resolve to `Value::Null`, never an error.
    pub fn resolve(&self, identifier: &str) -> Value {
        self.values
            .get(&identifier.to_ascii_lowercase())
            .cloned()
            .unwrap_or(Value::Null)
    }
}
