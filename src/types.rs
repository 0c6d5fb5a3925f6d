//! Core types shared by the document model.

use serde_json::{Map, Value};

/// Top-level members a document may carry, in serialization order.
pub const DOCUMENT_MEMBERS: &[&str] = &["jsonapi", "meta", "links", "data", "included", "errors"];

/// Default `jsonapi.version` advertised by a document.
pub const JSON_API_VERSION: &str = "1.0";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Conversion of an entity into its JSON:API representation.
///
/// Implementations only read `self`, so serializing a document graph never
/// changes it.
pub trait ToValue {
    /// Build the nested JSON value for this entity.
    fn to_value(&self) -> Value;
}

/// Insert `key` only when the map is non-empty.
pub(crate) fn insert_map(target: &mut Map<String, Value>, key: &str, map: &Map<String, Value>) {
    if !map.is_empty() {
        target.insert(key.to_string(), Value::Object(map.clone()));
    }
}

/// Options for hydrating a JSON value into a typed document.
#[derive(Debug, Clone, Default)]
pub struct HydrateOptions {
    /// Run the structural check first and reject unknown top-level members.
    pub strict: bool,
    /// Treat an array `data` member as resource identifiers rather than
    /// full resource objects.
    pub identifier_data: bool,
}

impl HydrateOptions {
    /// Create options with every flag disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Hydrate array `data` as an identifier collection.
    pub fn identifier_data(mut self, identifier_data: bool) -> Self {
        self.identifier_data = identifier_data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(1)), "number");
        assert_eq!(json_type_name(&json!("a")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }

    #[test]
    fn insert_map_skips_empty() {
        let mut target = Map::new();
        insert_map(&mut target, "meta", &Map::new());
        assert!(target.is_empty());

        let mut meta = Map::new();
        meta.insert("a".into(), json!(1));
        insert_map(&mut target, "meta", &meta);
        assert_eq!(Value::Object(target), json!({ "meta": { "a": 1 } }));
    }

    #[test]
    fn hydrate_options_builder() {
        let opts = HydrateOptions::new();
        assert!(!opts.strict);
        assert!(!opts.identifier_data);

        let opts = HydrateOptions::new().strict(true).identifier_data(true);
        assert!(opts.strict);
        assert!(opts.identifier_data);
    }
}
