//! Top-level documents.
//!
//! Every document serializes its members in a fixed order and leaves out
//! the empty ones:
//!
//! | Member | Present when |
//! |--------|--------------|
//! | `jsonapi` | a [`JsonApiObject`] was set |
//! | `meta` | metadata is non-empty |
//! | `links` | links are non-empty |
//! | `data` | always, except on [`ErrorDocument`] |
//! | `included` | included resources are non-empty |
//! | `errors` | errors are non-empty (always on [`ErrorDocument`]) |

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::behaviour::{
    ErrorsAware, ErrorsContainer, IdentifierCollectionAware, IdentifierCollectionContainer,
    IncludedResourcesAware, IncludedResourcesContainer, JsonApiAware, LinksAware, LinksContainer,
    MetadataAware, MetadataContainer,
};
use crate::objects::{ErrorObject, JsonApiObject};
use crate::resource::{ResourceIdentifier, ResourceObject};
use crate::types::{insert_map, ToValue};

/// Sections shared by every document kind.
#[derive(Debug, Clone, Default, PartialEq)]
struct DocumentParts {
    json_api: Option<JsonApiObject>,
    metadata: MetadataContainer,
    links: LinksContainer,
    included: IncludedResourcesContainer,
    errors: ErrorsContainer,
}

impl DocumentParts {
    /// Assemble the document. `data` is `None` only for error documents,
    /// which always carry `errors`.
    fn assemble(&self, kind: &'static str, data: Option<Value>) -> Value {
        tracing::trace!(kind, "serializing document");

        let mut out = Map::new();
        if let Some(json_api) = &self.json_api {
            out.insert("jsonapi".to_string(), json_api.to_value());
        }
        insert_map(&mut out, "meta", self.metadata.as_map());
        if !self.links.is_empty() {
            out.insert("links".to_string(), self.links.to_value());
        }
        let always_errors = data.is_none();
        if let Some(data) = data {
            out.insert("data".to_string(), data);
        }
        if !self.included.is_empty() {
            out.insert("included".to_string(), self.included.to_value());
        }
        if always_errors || !self.errors.is_empty() {
            out.insert("errors".to_string(), self.errors.to_value());
        }
        Value::Object(out)
    }
}

/// Implements the shared document capabilities on a document struct that
/// has a `parts: DocumentParts` field.
macro_rules! document_behaviour {
    ($name:ident) => {
        impl JsonApiAware for $name {
            fn json_api_slot(&self) -> &Option<JsonApiObject> {
                &self.parts.json_api
            }

            fn json_api_slot_mut(&mut self) -> &mut Option<JsonApiObject> {
                &mut self.parts.json_api
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }

        impl MetadataAware for $name {
            fn metadata_container(&self) -> &MetadataContainer {
                &self.parts.metadata
            }

            fn metadata_container_mut(&mut self) -> &mut MetadataContainer {
                &mut self.parts.metadata
            }
        }

        impl LinksAware for $name {
            fn links_container(&self) -> &LinksContainer {
                &self.parts.links
            }

            fn links_container_mut(&mut self) -> &mut LinksContainer {
                &mut self.parts.links
            }
        }

        impl ErrorsAware for $name {
            fn errors_container(&self) -> &ErrorsContainer {
                &self.parts.errors
            }

            fn errors_container_mut(&mut self) -> &mut ErrorsContainer {
                &mut self.parts.errors
            }
        }

        impl IncludedResourcesAware for $name {
            fn included_container(&self) -> &IncludedResourcesContainer {
                &self.parts.included
            }

            fn included_container_mut(&mut self) -> &mut IncludedResourcesContainer {
                &mut self.parts.included
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.to_value().serialize(serializer)
            }
        }
    };
}

/// A document whose primary data is one resource or `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleResourceDocument {
    resource: Option<ResourceObject>,
    parts: DocumentParts,
}

impl SingleResourceDocument {
    /// A document whose primary data is `resource`.
    pub fn new(resource: ResourceObject) -> Self {
        Self {
            resource: Some(resource),
            parts: DocumentParts::default(),
        }
    }

    /// A document with `null` primary data.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace all document metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.parts.metadata = metadata.into();
        self
    }

    /// The primary resource, or `None` for `null` data.
    pub fn resource(&self) -> Option<&ResourceObject> {
        self.resource.as_ref()
    }

    /// Mutable access to the primary resource.
    pub fn resource_mut(&mut self) -> Option<&mut ResourceObject> {
        self.resource.as_mut()
    }

    /// Replace the primary resource; `None` means `null` data.
    pub fn set_resource(&mut self, resource: Option<ResourceObject>) {
        self.resource = resource;
    }
}

impl ToValue for SingleResourceDocument {
    fn to_value(&self) -> Value {
        let data = self
            .resource
            .as_ref()
            .map(ToValue::to_value)
            .unwrap_or(Value::Null);
        self.parts.assemble("SingleResourceDocument", Some(data))
    }
}

document_behaviour!(SingleResourceDocument);

/// A document whose primary data is a list of resources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCollectionDocument {
    resources: Vec<ResourceObject>,
    parts: DocumentParts,
}

impl ResourceCollectionDocument {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all document metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.parts.metadata = metadata.into();
        self
    }

    /// Append a resource to the primary data.
    pub fn add_resource(&mut self, resource: ResourceObject) {
        self.resources.push(resource);
    }

    /// Primary resources in the order they were added.
    pub fn resources(&self) -> &[ResourceObject] {
        &self.resources
    }

    /// Mutable access to the primary resources.
    pub fn resources_mut(&mut self) -> &mut [ResourceObject] {
        &mut self.resources
    }
}

impl FromIterator<ResourceObject> for ResourceCollectionDocument {
    fn from_iter<I: IntoIterator<Item = ResourceObject>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
            parts: DocumentParts::default(),
        }
    }
}

impl ToValue for ResourceCollectionDocument {
    fn to_value(&self) -> Value {
        let data = Value::Array(self.resources.iter().map(ToValue::to_value).collect());
        self.parts.assemble("ResourceCollectionDocument", Some(data))
    }
}

document_behaviour!(ResourceCollectionDocument);

/// A document whose primary data is a list of resource identifiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifierCollectionDocument {
    identifiers: IdentifierCollectionContainer,
    parts: DocumentParts,
}

impl IdentifierCollectionDocument {
    /// An empty identifier collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all document metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.parts.metadata = metadata.into();
        self
    }
}

impl FromIterator<ResourceIdentifier> for IdentifierCollectionDocument {
    fn from_iter<I: IntoIterator<Item = ResourceIdentifier>>(iter: I) -> Self {
        let mut document = Self::new();
        for identifier in iter {
            document.add_identifier(identifier);
        }
        document
    }
}

impl IdentifierCollectionAware for IdentifierCollectionDocument {
    fn identifiers_container(&self) -> &IdentifierCollectionContainer {
        &self.identifiers
    }

    fn identifiers_container_mut(&mut self) -> &mut IdentifierCollectionContainer {
        &mut self.identifiers
    }
}

impl ToValue for IdentifierCollectionDocument {
    fn to_value(&self) -> Value {
        self.parts
            .assemble("IdentifierCollectionDocument", Some(self.identifiers.to_value()))
    }
}

document_behaviour!(IdentifierCollectionDocument);

/// A document that carries errors instead of primary data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDocument {
    parts: DocumentParts,
}

impl ErrorDocument {
    /// An error document with no errors yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all document metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.parts.metadata = metadata.into();
        self
    }
}

impl From<Vec<ErrorObject>> for ErrorDocument {
    fn from(errors: Vec<ErrorObject>) -> Self {
        Self {
            parts: DocumentParts {
                errors: errors.into(),
                ..DocumentParts::default()
            },
        }
    }
}

impl ToValue for ErrorDocument {
    fn to_value(&self) -> Value {
        self.parts.assemble("ErrorDocument", None)
    }
}

document_behaviour!(ErrorDocument);

/// Any of the four document kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    SingleResource(SingleResourceDocument),
    ResourceCollection(ResourceCollectionDocument),
    IdentifierCollection(IdentifierCollectionDocument),
    Error(ErrorDocument),
}

impl Document {
    /// Metadata of the wrapped document.
    pub fn metadata(&self) -> &Map<String, Value> {
        match self {
            Document::SingleResource(doc) => doc.metadata(),
            Document::ResourceCollection(doc) => doc.metadata(),
            Document::IdentifierCollection(doc) => doc.metadata(),
            Document::Error(doc) => doc.metadata(),
        }
    }

    /// Errors of the wrapped document.
    pub fn errors(&self) -> &[ErrorObject] {
        match self {
            Document::SingleResource(doc) => doc.errors(),
            Document::ResourceCollection(doc) => doc.errors(),
            Document::IdentifierCollection(doc) => doc.errors(),
            Document::Error(doc) => doc.errors(),
        }
    }

    /// Included resources of the wrapped document.
    pub fn included_resources(&self) -> &[Arc<ResourceObject>] {
        match self {
            Document::SingleResource(doc) => doc.included_resources(),
            Document::ResourceCollection(doc) => doc.included_resources(),
            Document::IdentifierCollection(doc) => doc.included_resources(),
            Document::Error(doc) => doc.included_resources(),
        }
    }

    /// The single-resource document, if that is the kind.
    pub fn as_single_resource(&self) -> Option<&SingleResourceDocument> {
        match self {
            Document::SingleResource(doc) => Some(doc),
            _ => None,
        }
    }

    /// The resource collection, if that is the kind.
    pub fn as_resource_collection(&self) -> Option<&ResourceCollectionDocument> {
        match self {
            Document::ResourceCollection(doc) => Some(doc),
            _ => None,
        }
    }

    /// The identifier collection, if that is the kind.
    pub fn as_identifier_collection(&self) -> Option<&IdentifierCollectionDocument> {
        match self {
            Document::IdentifierCollection(doc) => Some(doc),
            _ => None,
        }
    }

    /// The error document, if that is the kind.
    pub fn as_error(&self) -> Option<&ErrorDocument> {
        match self {
            Document::Error(doc) => Some(doc),
            _ => None,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::SingleResource(doc) => fmt::Display::fmt(doc, f),
            Document::ResourceCollection(doc) => fmt::Display::fmt(doc, f),
            Document::IdentifierCollection(doc) => fmt::Display::fmt(doc, f),
            Document::Error(doc) => fmt::Display::fmt(doc, f),
        }
    }
}

impl ToValue for Document {
    fn to_value(&self) -> Value {
        match self {
            Document::SingleResource(doc) => doc.to_value(),
            Document::ResourceCollection(doc) => doc.to_value(),
            Document::IdentifierCollection(doc) => doc.to_value(),
            Document::Error(doc) => doc.to_value(),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl From<SingleResourceDocument> for Document {
    fn from(doc: SingleResourceDocument) -> Self {
        Document::SingleResource(doc)
    }
}

impl From<ResourceCollectionDocument> for Document {
    fn from(doc: ResourceCollectionDocument) -> Self {
        Document::ResourceCollection(doc)
    }
}

impl From<IdentifierCollectionDocument> for Document {
    fn from(doc: IdentifierCollectionDocument) -> Self {
        Document::IdentifierCollection(doc)
    }
}

impl From<ErrorDocument> for Document {
    fn from(doc: ErrorDocument) -> Self {
        Document::Error(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;
    use crate::objects::LinkObject;
    use serde_json::json;

    fn keys(value: &Value) -> Vec<String> {
        value
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn single_resource_minimal_shape() {
        let mut resource = ResourceObject::new("42", "test");
        resource.set_attribute("test", 42);
        let document = SingleResourceDocument::new(resource);

        assert_eq!(
            serde_json::to_string(&document).unwrap(),
            r#"{"data":{"id":"42","type":"test","attributes":{"test":42}}}"#
        );
    }

    #[test]
    fn single_resource_null_data() {
        assert_eq!(
            SingleResourceDocument::empty().to_value(),
            json!({ "data": null })
        );
    }

    #[test]
    fn metadata_from_constructor() {
        let document = SingleResourceDocument::empty()
            .with_metadata(json!({ "test": 42 }).as_object().cloned().unwrap_or_default());

        assert!(!document.has_metadata_attribute("qwerty"));
        assert!(document.has_metadata_attribute("test"));
        assert_eq!(document.metadata_attribute("test").unwrap(), &json!(42));
    }

    #[test]
    fn error_document_metadata_keeps_errors() {
        let document = ErrorDocument::from(vec![ErrorObject::new().with_code("E1")])
            .with_metadata(json!({ "request": "r-1" }).as_object().cloned().unwrap_or_default());

        assert_eq!(
            document.to_value(),
            json!({ "meta": { "request": "r-1" }, "errors": [{ "code": "E1" }] })
        );
    }

    #[test]
    fn metadata_errors_name_the_document() {
        let mut document = SingleResourceDocument::empty();

        let err = document.metadata_attribute("test_attribute").unwrap_err();
        assert!(matches!(err, DocumentError::MetadataAttributeNotFound { .. }));
        assert!(err.to_string().contains("Document"));
        assert!(err.to_string().contains("test_attribute"));

        document.set_metadata_attribute("test_attribute", 1).unwrap();
        let err = document
            .set_metadata_attribute("test_attribute", 2)
            .unwrap_err();
        assert!(matches!(err, DocumentError::MetadataAttributeOverride { .. }));
        assert!(err.to_string().contains("SingleResourceDocument"));
    }

    #[test]
    fn link_errors_name_the_document() {
        let mut document = ResourceCollectionDocument::new();

        let err = document.link("test_link").unwrap_err();
        assert!(matches!(err, DocumentError::LinkNotFound { .. }));
        assert!(err.to_string().contains("ResourceCollectionDocument"));
        assert!(err.to_string().contains("test_link"));

        document.set_link("test_link", LinkObject::new("/a")).unwrap();
        let err = document
            .set_link("test_link", LinkObject::new("/a"))
            .unwrap_err();
        assert!(matches!(err, DocumentError::LinkOverride { .. }));
    }

    #[test]
    fn full_key_order() {
        let mut document = SingleResourceDocument::new(ResourceObject::new("1", "a"));
        document.add_error(ErrorObject::new().with_code("E1"));
        document.add_included_resource(ResourceObject::new("2", "b"));
        document.set_link("self", LinkObject::new("/a/1")).unwrap();
        document.set_metadata_attribute("m", true).unwrap();
        document.set_json_api(JsonApiObject::new());

        let value = document.to_value();
        assert_eq!(
            keys(&value),
            ["jsonapi", "meta", "links", "data", "included", "errors"]
        );
        assert_eq!(value["included"], json!([{ "id": "2", "type": "b" }]));
        assert_eq!(value["jsonapi"], json!({ "version": "1.0" }));
    }

    #[test]
    fn errors_on_non_error_document() {
        let mut document = SingleResourceDocument::empty();
        assert!(!document.has_errors());

        document.add_error(ErrorObject::new().with_field("test", "123"));
        document.add_error(ErrorObject::new().with_code("second"));

        assert!(document.has_errors());
        assert_eq!(
            document.to_value()["errors"],
            json!([{ "test": "123" }, { "code": "second" }])
        );
    }

    #[test]
    fn resource_collection() {
        let document: ResourceCollectionDocument = vec![
            ResourceObject::new("1", "a"),
            ResourceObject::new("2", "a"),
        ]
        .into_iter()
        .collect();

        assert_eq!(document.resources().len(), 2);
        assert_eq!(
            document.to_value(),
            json!({ "data": [{ "id": "1", "type": "a" }, { "id": "2", "type": "a" }] })
        );
        assert_eq!(
            ResourceCollectionDocument::new().to_value(),
            json!({ "data": [] })
        );
    }

    #[test]
    fn identifier_collection() {
        let mut document = IdentifierCollectionDocument::new();
        document.add_identifier(ResourceIdentifier::new("1", "tags"));
        document.add_identifier(ResourceIdentifier::new("2", "tags"));

        assert_eq!(document.identifiers_count(), 2);
        assert_eq!(
            document.to_value(),
            json!({ "data": [{ "type": "tags", "id": "1" }, { "type": "tags", "id": "2" }] })
        );
    }

    #[test]
    fn error_document_always_has_errors_and_no_data() {
        let empty = ErrorDocument::new();
        assert_eq!(empty.to_value(), json!({ "errors": [] }));

        let document = ErrorDocument::from(vec![ErrorObject::new().with_status(404)])
            .with_metadata(json!({ "m": 1 }).as_object().cloned().unwrap_or_default());
        let value = document.to_value();
        assert_eq!(keys(&value), ["meta", "errors"]);
        assert_eq!(value["errors"], json!([{ "status": "404" }]));
    }

    #[test]
    fn included_resources_are_shared() {
        let author = Arc::new(ResourceObject::new("9", "people"));
        let mut document = SingleResourceDocument::empty();
        assert!(!document.has_included_resources());

        document.add_included_resource(Arc::clone(&author));
        assert!(document.has_included_resources());
        assert!(Arc::ptr_eq(&document.included_resources()[0], &author));
    }

    #[test]
    fn display_contains_type_name() {
        assert_eq!(SingleResourceDocument::empty().to_string(), "SingleResourceDocument");
        let document = Document::from(ErrorDocument::new());
        assert!(document.to_string().contains("Document"));
    }

    #[test]
    fn serialization_does_not_mutate() {
        let mut document = SingleResourceDocument::new(ResourceObject::new("1", "a"));
        document.set_metadata_attribute("m", 1).unwrap();
        let before = document.clone();
        let _ = document.to_value();
        let _ = document.to_value();
        assert_eq!(document, before);
    }
}
