//! Link, error and `jsonapi` value objects.

use std::fmt;

use serde_json::{Map, Value};

use crate::behaviour::{MetadataAware, MetadataContainer};
use crate::types::{insert_map, ToValue, JSON_API_VERSION};

/// A hyperlink with optional metadata.
///
/// Always serializes in object form: `{"href": ..., "meta": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkObject {
    reference: String,
    metadata: MetadataContainer,
}

impl LinkObject {
    /// A link to `reference` with no metadata.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            metadata: MetadataContainer::new(),
        }
    }

    /// Replace the link metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// The link target (`href`).
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for LinkObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkObject({})", self.reference)
    }
}

impl MetadataAware for LinkObject {
    fn metadata_container(&self) -> &MetadataContainer {
        &self.metadata
    }

    fn metadata_container_mut(&mut self) -> &mut MetadataContainer {
        &mut self.metadata
    }
}

impl ToValue for LinkObject {
    fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("href".to_string(), Value::String(self.reference.clone()));
        insert_map(&mut out, "meta", self.metadata.as_map());
        Value::Object(out)
    }
}

/// A free-form error descriptor.
///
/// Members serialize in the order they were set. The `with_*` helpers cover
/// the members the format defines; `set_field` accepts anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorObject {
    fields: Map<String, Value>,
}

impl ErrorObject {
    /// An error with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Look up a field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All fields in insertion order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Builder form of [`ErrorObject::set_field`].
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Unique id of this occurrence.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_field("id", id.into())
    }

    /// HTTP status code, stored as a string.
    pub fn with_status(self, status: impl ToString) -> Self {
        self.with_field("status", status.to_string())
    }

    /// Application-specific error code.
    pub fn with_code(self, code: impl Into<String>) -> Self {
        self.with_field("code", code.into())
    }

    /// Short summary of the problem.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_field("title", title.into())
    }

    /// Explanation specific to this occurrence.
    pub fn with_detail(self, detail: impl Into<String>) -> Self {
        self.with_field("detail", detail.into())
    }

    /// `source` member, e.g. `{"pointer": "/data/attributes/title"}`.
    pub fn with_source(self, source: Map<String, Value>) -> Self {
        self.with_field("source", Value::Object(source))
    }
}

impl From<Map<String, Value>> for ErrorObject {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl ToValue for ErrorObject {
    fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// The top-level `jsonapi` member.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonApiObject {
    version: String,
    metadata: MetadataContainer,
}

impl JsonApiObject {
    /// Create an object advertising version `1.0`.
    pub fn new() -> Self {
        Self::with_version(JSON_API_VERSION)
    }

    /// Create an object advertising `version`.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            metadata: MetadataContainer::new(),
        }
    }

    /// The advertised version.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for JsonApiObject {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JsonApiObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonApiObject({})", self.version)
    }
}

impl MetadataAware for JsonApiObject {
    fn metadata_container(&self) -> &MetadataContainer {
        &self.metadata
    }

    fn metadata_container_mut(&mut self) -> &mut MetadataContainer {
        &mut self.metadata
    }
}

impl ToValue for JsonApiObject {
    fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("version".to_string(), Value::String(self.version.clone()));
        insert_map(&mut out, "meta", self.metadata.as_map());
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn link_without_metadata() {
        let link = LinkObject::new("http://example.com");
        assert!(!link.has_metadata());
        assert_eq!(link.to_value(), json!({ "href": "http://example.com" }));
    }

    #[test]
    fn link_with_metadata() {
        let mut link = LinkObject::new("http://test_link.com");
        link.set_metadata_attribute("test", 123).unwrap();
        assert_eq!(
            link.to_value(),
            json!({ "href": "http://test_link.com", "meta": { "test": 123 } })
        );
        assert!(link
            .set_metadata_attribute("test", 1)
            .unwrap_err()
            .to_string()
            .contains("LinkObject"));
    }

    #[test]
    fn error_members_keep_order() {
        let error = ErrorObject::new()
            .with_status(422)
            .with_title("Invalid Attribute")
            .with_source(json!({ "pointer": "/data/attributes/name" }).as_object().unwrap().clone());

        let keys: Vec<&str> = error.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, ["status", "title", "source"]);
        assert_eq!(error.field("status"), Some(&json!("422")));
        assert_eq!(
            error.to_value(),
            json!({
                "status": "422",
                "title": "Invalid Attribute",
                "source": { "pointer": "/data/attributes/name" }
            })
        );
    }

    #[test]
    fn json_api_defaults_to_1_0() {
        assert_eq!(JsonApiObject::new().to_value(), json!({ "version": "1.0" }));
        assert_eq!(
            JsonApiObject::with_version("1.1").to_value(),
            json!({ "version": "1.1" })
        );
    }
}
