//! Resource identifiers and resource objects.

use std::fmt;

use serde_json::{Map, Value};

use crate::behaviour::{
    LinksAware, LinksContainer, MetadataAware, MetadataContainer, RelationshipsAware,
    RelationshipsContainer,
};
use crate::error::DocumentError;
use crate::types::{insert_map, ToValue};

/// The `(type, id)` pair that addresses a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentifier {
    id: String,
    resource_type: String,
}

impl ResourceIdentifier {
    /// Create an identifier from its id and type.
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
        }
    }

    /// The resource id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The resource type.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.id)
    }
}

impl ToValue for ResourceIdentifier {
    fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), Value::String(self.resource_type.clone()));
        out.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(out)
    }
}

/// A full resource: identifier, attributes, links, relationships and metadata.
///
/// Attributes behave like relationships: setting an existing name replaces
/// the value in place. Reading a missing one fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceObject {
    identifier: ResourceIdentifier,
    attributes: Map<String, Value>,
    metadata: MetadataContainer,
    links: LinksContainer,
    relationships: RelationshipsContainer,
}

impl ResourceObject {
    /// Create a resource with no attributes, metadata, links or relationships.
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            identifier: ResourceIdentifier::new(id, resource_type),
            attributes: Map::new(),
            metadata: MetadataContainer::new(),
            links: LinksContainer::new(),
            relationships: RelationshipsContainer::new(),
        }
    }

    /// Replace all attributes.
    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Replace all metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// The resource id.
    pub fn id(&self) -> &str {
        self.identifier.id()
    }

    /// The resource type.
    pub fn resource_type(&self) -> &str {
        self.identifier.resource_type()
    }

    /// The `(type, id)` pair of this resource.
    pub fn identifier(&self) -> &ResourceIdentifier {
        &self.identifier
    }

    /// Set an attribute, replacing any value with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Whether an attribute with this name exists.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Get an attribute.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::AttributeNotFound` if absent.
    pub fn attribute(&self, name: &str) -> Result<&Value, DocumentError> {
        self.attributes
            .get(name)
            .ok_or_else(|| DocumentError::AttributeNotFound {
                owner: self.to_string(),
                name: name.to_string(),
            })
    }

    /// Remove an attribute, keeping the order of the rest.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.shift_remove(name)
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

impl From<ResourceIdentifier> for ResourceObject {
    fn from(identifier: ResourceIdentifier) -> Self {
        Self::new(identifier.id, identifier.resource_type)
    }
}

impl fmt::Display for ResourceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceObject({})", self.identifier)
    }
}

impl MetadataAware for ResourceObject {
    fn metadata_container(&self) -> &MetadataContainer {
        &self.metadata
    }

    fn metadata_container_mut(&mut self) -> &mut MetadataContainer {
        &mut self.metadata
    }
}

impl LinksAware for ResourceObject {
    fn links_container(&self) -> &LinksContainer {
        &self.links
    }

    fn links_container_mut(&mut self) -> &mut LinksContainer {
        &mut self.links
    }
}

impl RelationshipsAware for ResourceObject {
    fn relationships_container(&self) -> &RelationshipsContainer {
        &self.relationships
    }

    fn relationships_container_mut(&mut self) -> &mut RelationshipsContainer {
        &mut self.relationships
    }
}

impl ToValue for ResourceObject {
    fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("id".to_string(), Value::String(self.id().to_string()));
        out.insert(
            "type".to_string(),
            Value::String(self.resource_type().to_string()),
        );
        insert_map(&mut out, "attributes", &self.attributes);
        insert_map(&mut out, "meta", self.metadata.as_map());
        if !self.links.is_empty() {
            out.insert("links".to_string(), self.links.to_value());
        }
        if !self.relationships.is_empty() {
            out.insert("relationships".to_string(), self.relationships.to_value());
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::LinkObject;
    use crate::relationship::{ToManyRelationship, ToOneRelationship};
    use serde_json::json;

    fn attrs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn basics() {
        let resource = ResourceObject::new("42", "test");
        assert_eq!(resource.id(), "42");
        assert_eq!(resource.resource_type(), "test");
        assert_eq!(resource.identifier(), &ResourceIdentifier::new("42", "test"));
    }

    #[test]
    fn identifier_equality_by_type_and_id() {
        assert_eq!(
            ResourceIdentifier::new("1", "a"),
            ResourceIdentifier::new("1", "a")
        );
        assert_ne!(
            ResourceIdentifier::new("1", "a"),
            ResourceIdentifier::new("1", "b")
        );
        assert_eq!(
            ResourceIdentifier::new("7", "tag").to_value(),
            json!({ "type": "tag", "id": "7" })
        );
    }

    #[test]
    fn attributes() {
        let resource = ResourceObject::new("42", "test").with_attributes(attrs(json!({ "test": 42 })));

        assert!(!resource.has_attribute("qwerty"));
        assert!(resource.has_attribute("test"));
        assert_eq!(resource.attribute("test").unwrap(), &json!(42));
        assert_eq!(resource.attributes(), &attrs(json!({ "test": 42 })));

        let err = resource.attribute("qwerty").unwrap_err();
        assert!(err.to_string().contains("ResourceObject"));
        assert!(err.to_string().contains("qwerty"));
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let mut resource = ResourceObject::new("1", "test");
        resource.set_attribute("c", 1);
        resource.set_attribute("a", 2);
        resource.set_attribute("b", 3);
        resource.set_attribute("c", 4);

        let keys: Vec<&str> = resource.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, ["c", "a", "b"]);
        assert_eq!(resource.attribute("c").unwrap(), &json!(4));
    }

    #[test]
    fn metadata() {
        let resource =
            ResourceObject::new("42", "test").with_metadata(attrs(json!({ "test": 42 })));

        assert!(!resource.has_metadata_attribute("qwerty"));
        assert!(resource.has_metadata_attribute("test"));
        assert_eq!(resource.metadata_attribute("test").unwrap(), &json!(42));
        assert_eq!(resource.metadata(), &attrs(json!({ "test": 42 })));
    }

    #[test]
    fn minimal_serialization_omits_sections() {
        let resource = ResourceObject::new("42", "test");
        assert_eq!(resource.to_value(), json!({ "id": "42", "type": "test" }));
    }

    #[test]
    fn full_serialization() {
        let mut resource = ResourceObject::new("1", "articles")
            .with_attributes(attrs(json!({ "title": "Rails is Omakase" })))
            .with_metadata(attrs(json!({ "views": 10 })));
        resource
            .set_link("self", LinkObject::new("/articles/1"))
            .unwrap();

        let mut author = ToOneRelationship::new();
        author.set_identifier(ResourceIdentifier::new("9", "people"));
        resource.set_relationship("author", author);
        resource.set_relationship("tags", ToManyRelationship::new());

        assert_eq!(
            resource.to_value(),
            json!({
                "id": "1",
                "type": "articles",
                "attributes": { "title": "Rails is Omakase" },
                "meta": { "views": 10 },
                "links": { "self": { "href": "/articles/1" } },
                "relationships": {
                    "author": { "data": { "type": "people", "id": "9" } },
                    "tags": { "data": [] }
                }
            })
        );
    }
}
