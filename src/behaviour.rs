//! Capability containers shared by documents, resources, relationships and links.
//!
//! Each container is a plain ordered bag. The matching `*Aware` trait is
//! what an entity implements to expose it: the entity hands out the
//! container, and the trait's provided methods add the lookup and override
//! rules on top, naming the entity (through its `Display` label) in every
//! error.
//!
//! | Container | Set on existing key | Get on missing key |
//! |-----------|---------------------|--------------------|
//! | metadata | `MetadataAttributeOverride` | `MetadataAttributeNotFound` |
//! | links | `LinkOverride` | `LinkNotFound` |
//! | relationships | replaces | `RelationshipNotFound` |

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::objects::{ErrorObject, JsonApiObject, LinkObject};
use crate::relationship::Relationship;
use crate::resource::{ResourceIdentifier, ResourceObject};
use crate::types::ToValue;

/// Ordered free-form metadata.
///
/// Entries are added through [`MetadataAware::set_metadata_attribute`], so an
/// existing key can only be replaced after removing it:
///
/// ```compile_fail
/// use jsonapi_document::{MetadataAware, ResourceObject};
///
/// let mut resource = ResourceObject::new("1", "a");
/// resource
///     .metadata_container_mut()
///     .insert("k".to_string(), serde_json::Value::Null);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataContainer {
    attributes: Map<String, Value>,
}

impl MetadataContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an attribute with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Insert without the override check. Callers go through
    /// [`MetadataAware::set_metadata_attribute`].
    pub(crate) fn insert(&mut self, name: String, value: Value) -> Option<Value> {
        self.attributes.insert(name, value)
    }

    /// Remove an attribute, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.shift_remove(name)
    }

    /// All attributes in insertion order.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Whether no attributes are set.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }
}

impl From<Map<String, Value>> for MetadataContainer {
    fn from(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }
}

impl ToValue for MetadataContainer {
    fn to_value(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

/// Metadata capability.
pub trait MetadataAware: fmt::Display {
    /// The metadata this entity owns.
    fn metadata_container(&self) -> &MetadataContainer;

    /// Mutable access for the provided methods and removal.
    fn metadata_container_mut(&mut self) -> &mut MetadataContainer;

    /// Set a metadata attribute.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::MetadataAttributeOverride` if the attribute
    /// is already present. Remove it first to replace it.
    fn set_metadata_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), DocumentError> {
        let name = name.into();
        if self.metadata_container().contains(&name) {
            return Err(DocumentError::MetadataAttributeOverride {
                owner: self.to_string(),
                name,
            });
        }
        self.metadata_container_mut().insert(name, value.into());
        Ok(())
    }

    /// Whether a metadata attribute with this name exists.
    fn has_metadata_attribute(&self, name: &str) -> bool {
        self.metadata_container().contains(name)
    }

    /// Get a metadata attribute.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::MetadataAttributeNotFound` if absent.
    fn metadata_attribute(&self, name: &str) -> Result<&Value, DocumentError> {
        self.metadata_container()
            .get(name)
            .ok_or_else(|| DocumentError::MetadataAttributeNotFound {
                owner: self.to_string(),
                name: name.to_string(),
            })
    }

    /// Remove a metadata attribute. Missing attributes are ignored.
    fn remove_metadata_attribute(&mut self, name: &str) {
        self.metadata_container_mut().remove(name);
    }

    /// Whether any metadata is set.
    fn has_metadata(&self) -> bool {
        !self.metadata_container().is_empty()
    }

    /// All metadata in insertion order.
    fn metadata(&self) -> &Map<String, Value> {
        self.metadata_container().as_map()
    }
}

/// Named links in insertion order.
///
/// As with metadata, links are only added through [`LinksAware::set_link`]:
///
/// ```compile_fail
/// use jsonapi_document::{LinkObject, LinksAware, ResourceObject};
///
/// let mut resource = ResourceObject::new("1", "a");
/// resource
///     .links_container_mut()
///     .insert("self".to_string(), LinkObject::new("/a/1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinksContainer {
    links: IndexMap<String, LinkObject>,
}

impl LinksContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a link with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.links.contains_key(name)
    }

    /// Look up a link.
    pub fn get(&self, name: &str) -> Option<&LinkObject> {
        self.links.get(name)
    }

    /// Insert without the override check. Callers go through
    /// [`LinksAware::set_link`].
    pub(crate) fn insert(&mut self, name: String, link: LinkObject) -> Option<LinkObject> {
        self.links.insert(name, link)
    }

    /// Remove a link, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<LinkObject> {
        self.links.shift_remove(name)
    }

    /// All links in insertion order.
    pub fn as_map(&self) -> &IndexMap<String, LinkObject> {
        &self.links
    }

    /// Whether no links are set.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl ToValue for LinksContainer {
    fn to_value(&self) -> Value {
        Value::Object(
            self.links
                .iter()
                .map(|(name, link)| (name.clone(), link.to_value()))
                .collect(),
        )
    }
}

/// Links capability.
pub trait LinksAware: fmt::Display {
    /// The links this entity owns.
    fn links_container(&self) -> &LinksContainer;

    /// Mutable access for the provided methods and removal.
    fn links_container_mut(&mut self) -> &mut LinksContainer;

    /// Set a link.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::LinkOverride` if a link with that name exists.
    fn set_link(&mut self, name: impl Into<String>, link: LinkObject) -> Result<(), DocumentError> {
        let name = name.into();
        if self.links_container().contains(&name) {
            return Err(DocumentError::LinkOverride {
                owner: self.to_string(),
                name,
            });
        }
        self.links_container_mut().insert(name, link);
        Ok(())
    }

    /// Whether a link with this name exists.
    fn has_link(&self, name: &str) -> bool {
        self.links_container().contains(name)
    }

    /// Get a link.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::LinkNotFound` if absent.
    fn link(&self, name: &str) -> Result<&LinkObject, DocumentError> {
        self.links_container()
            .get(name)
            .ok_or_else(|| DocumentError::LinkNotFound {
                owner: self.to_string(),
                name: name.to_string(),
            })
    }

    /// Remove a link. Missing links are ignored.
    fn remove_link(&mut self, name: &str) {
        self.links_container_mut().remove(name);
    }

    /// Whether any link is set.
    fn has_links(&self) -> bool {
        !self.links_container().is_empty()
    }

    /// All links in insertion order.
    fn links(&self) -> &IndexMap<String, LinkObject> {
        self.links_container().as_map()
    }
}

/// Named relationships in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipsContainer {
    relationships: IndexMap<String, Relationship>,
}

impl RelationshipsContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// All relationships in insertion order.
    pub fn as_map(&self) -> &IndexMap<String, Relationship> {
        &self.relationships
    }

    /// Whether no relationships are set.
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

impl ToValue for RelationshipsContainer {
    fn to_value(&self) -> Value {
        Value::Object(
            self.relationships
                .iter()
                .map(|(name, relationship)| (name.clone(), relationship.to_value()))
                .collect(),
        )
    }
}

/// Relationships capability. Setting an existing name replaces it in place.
pub trait RelationshipsAware: fmt::Display {
    /// The relationships this entity owns.
    fn relationships_container(&self) -> &RelationshipsContainer;

    /// Mutable access for the provided methods.
    fn relationships_container_mut(&mut self) -> &mut RelationshipsContainer;

    /// Set a relationship, replacing any with the same name.
    fn set_relationship(&mut self, name: impl Into<String>, relationship: impl Into<Relationship>) {
        self.relationships_container_mut()
            .relationships
            .insert(name.into(), relationship.into());
    }

    /// Whether a relationship with this name exists.
    fn has_relationship(&self, name: &str) -> bool {
        self.relationships_container()
            .relationships
            .contains_key(name)
    }

    /// Get a relationship.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::RelationshipNotFound` if absent.
    fn relationship(&self, name: &str) -> Result<&Relationship, DocumentError> {
        self.relationships_container()
            .relationships
            .get(name)
            .ok_or_else(|| DocumentError::RelationshipNotFound {
                owner: self.to_string(),
                name: name.to_string(),
            })
    }

    /// Mutable access to a relationship, e.g. to add identifiers later.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::RelationshipNotFound` if absent.
    fn relationship_mut(&mut self, name: &str) -> Result<&mut Relationship, DocumentError> {
        let owner = self.to_string();
        self.relationships_container_mut()
            .relationships
            .get_mut(name)
            .ok_or_else(|| DocumentError::RelationshipNotFound {
                owner,
                name: name.to_string(),
            })
    }

    /// Whether any relationship is set.
    fn has_relationships(&self) -> bool {
        !self.relationships_container().is_empty()
    }

    /// All relationships in insertion order.
    fn relationships(&self) -> &IndexMap<String, Relationship> {
        self.relationships_container().as_map()
    }
}

/// Append-only list of errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorsContainer {
    errors: Vec<ErrorObject>,
}

impl ErrorsContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error.
    pub fn push(&mut self, error: ErrorObject) {
        self.errors.push(error);
    }

    /// All errors in the order they were added.
    pub fn as_slice(&self) -> &[ErrorObject] {
        &self.errors
    }

    /// Whether no errors were added.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<Vec<ErrorObject>> for ErrorsContainer {
    fn from(errors: Vec<ErrorObject>) -> Self {
        Self { errors }
    }
}

impl ToValue for ErrorsContainer {
    fn to_value(&self) -> Value {
        Value::Array(self.errors.iter().map(ToValue::to_value).collect())
    }
}

/// Errors capability.
pub trait ErrorsAware {
    /// The errors this entity owns.
    fn errors_container(&self) -> &ErrorsContainer;

    /// Mutable access for the provided methods.
    fn errors_container_mut(&mut self) -> &mut ErrorsContainer;

    /// Append an error.
    fn add_error(&mut self, error: ErrorObject) {
        self.errors_container_mut().push(error);
    }

    /// Whether any error was added.
    fn has_errors(&self) -> bool {
        !self.errors_container().is_empty()
    }

    /// All errors in the order they were added.
    fn errors(&self) -> &[ErrorObject] {
        self.errors_container().as_slice()
    }
}

/// Ordered resource identifiers; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierCollectionContainer {
    identifiers: Vec<ResourceIdentifier>,
}

impl IdentifierCollectionContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an identifier.
    pub fn push(&mut self, identifier: ResourceIdentifier) {
        self.identifiers.push(identifier);
    }

    /// All identifiers in the order they were added.
    pub fn as_slice(&self) -> &[ResourceIdentifier] {
        &self.identifiers
    }

    /// Number of identifiers, duplicates included.
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Whether no identifiers were added.
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

impl ToValue for IdentifierCollectionContainer {
    fn to_value(&self) -> Value {
        Value::Array(self.identifiers.iter().map(ToValue::to_value).collect())
    }
}

/// Identifier collection capability.
pub trait IdentifierCollectionAware {
    /// The identifiers this entity owns.
    fn identifiers_container(&self) -> &IdentifierCollectionContainer;

    /// Mutable access for the provided methods.
    fn identifiers_container_mut(&mut self) -> &mut IdentifierCollectionContainer;

    /// Append an identifier.
    fn add_identifier(&mut self, identifier: ResourceIdentifier) {
        self.identifiers_container_mut().push(identifier);
    }

    /// All identifiers in the order they were added.
    fn identifiers(&self) -> &[ResourceIdentifier] {
        self.identifiers_container().as_slice()
    }

    /// Number of identifiers, duplicates included.
    fn identifiers_count(&self) -> usize {
        self.identifiers_container().len()
    }
}

/// Resources embedded next to the primary data.
///
/// Resources are shared with the caller, not copied; deduplication is left
/// to whoever adds them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludedResourcesContainer {
    resources: Vec<Arc<ResourceObject>>,
}

impl IncludedResourcesContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shared resource.
    pub fn push(&mut self, resource: Arc<ResourceObject>) {
        self.resources.push(resource);
    }

    /// All included resources in the order they were added.
    pub fn as_slice(&self) -> &[Arc<ResourceObject>] {
        &self.resources
    }

    /// Whether nothing is included.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ToValue for IncludedResourcesContainer {
    fn to_value(&self) -> Value {
        Value::Array(self.resources.iter().map(|r| r.to_value()).collect())
    }
}

/// Included resources capability.
pub trait IncludedResourcesAware {
    /// The included resources this entity owns.
    fn included_container(&self) -> &IncludedResourcesContainer;

    /// Mutable access for the provided methods.
    fn included_container_mut(&mut self) -> &mut IncludedResourcesContainer;

    /// Include a resource. Owned resources are wrapped in an `Arc`.
    fn add_included_resource(&mut self, resource: impl Into<Arc<ResourceObject>>) {
        self.included_container_mut().push(resource.into());
    }

    /// Whether anything is included.
    fn has_included_resources(&self) -> bool {
        !self.included_container().is_empty()
    }

    /// All included resources in the order they were added.
    fn included_resources(&self) -> &[Arc<ResourceObject>] {
        self.included_container().as_slice()
    }
}

/// `jsonapi` member capability.
pub trait JsonApiAware {
    /// The `jsonapi` member, if set.
    fn json_api_slot(&self) -> &Option<JsonApiObject>;

    /// Mutable access for the provided methods.
    fn json_api_slot_mut(&mut self) -> &mut Option<JsonApiObject>;

    /// Set the `jsonapi` member, replacing any previous one.
    fn set_json_api(&mut self, json_api: JsonApiObject) {
        *self.json_api_slot_mut() = Some(json_api);
    }

    /// The `jsonapi` member, if set.
    fn json_api(&self) -> Option<&JsonApiObject> {
        self.json_api_slot().as_ref()
    }

    /// Whether the `jsonapi` member is set.
    fn has_json_api(&self) -> bool {
        self.json_api_slot().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::{ToManyRelationship, ToOneRelationship};
    use serde_json::json;

    /// Minimal owner used to exercise the provided trait methods.
    #[derive(Default)]
    struct Holder {
        metadata: MetadataContainer,
        links: LinksContainer,
        relationships: RelationshipsContainer,
        errors: ErrorsContainer,
    }

    impl fmt::Display for Holder {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Holder")
        }
    }

    impl MetadataAware for Holder {
        fn metadata_container(&self) -> &MetadataContainer {
            &self.metadata
        }
        fn metadata_container_mut(&mut self) -> &mut MetadataContainer {
            &mut self.metadata
        }
    }

    impl LinksAware for Holder {
        fn links_container(&self) -> &LinksContainer {
            &self.links
        }
        fn links_container_mut(&mut self) -> &mut LinksContainer {
            &mut self.links
        }
    }

    impl RelationshipsAware for Holder {
        fn relationships_container(&self) -> &RelationshipsContainer {
            &self.relationships
        }
        fn relationships_container_mut(&mut self) -> &mut RelationshipsContainer {
            &mut self.relationships
        }
    }

    impl ErrorsAware for Holder {
        fn errors_container(&self) -> &ErrorsContainer {
            &self.errors
        }
        fn errors_container_mut(&mut self) -> &mut ErrorsContainer {
            &mut self.errors
        }
    }

    #[test]
    fn metadata_override_requires_remove() {
        let mut holder = Holder::default();
        holder.set_metadata_attribute("k", 1).unwrap();

        let err = holder.set_metadata_attribute("k", 2).unwrap_err();
        assert_eq!(
            err,
            DocumentError::MetadataAttributeOverride {
                owner: "Holder".into(),
                name: "k".into()
            }
        );
        assert_eq!(holder.metadata_attribute("k").unwrap(), &json!(1));

        holder.remove_metadata_attribute("k");
        holder.set_metadata_attribute("k", 2).unwrap();
        assert_eq!(holder.metadata_attribute("k").unwrap(), &json!(2));
    }

    #[test]
    fn metadata_missing_key() {
        let mut holder = Holder::default();
        assert!(!holder.has_metadata_attribute("nope"));
        assert!(holder.metadata_attribute("nope").unwrap_err().is_not_found());

        // removing a missing key is a no-op
        holder.remove_metadata_attribute("nope");
        assert!(!holder.has_metadata());
    }

    #[test]
    fn metadata_remove_keeps_order() {
        let mut holder = Holder::default();
        for key in ["a", "b", "c"] {
            holder.set_metadata_attribute(key, key).unwrap();
        }
        holder.remove_metadata_attribute("a");
        let keys: Vec<&str> = holder.metadata().keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "c"]);
    }

    #[test]
    fn links_contract() {
        let mut holder = Holder::default();
        holder.set_link("self", LinkObject::new("/a")).unwrap();

        let err = holder.set_link("self", LinkObject::new("/b")).unwrap_err();
        assert!(matches!(err, DocumentError::LinkOverride { .. }));
        assert_eq!(holder.link("self").unwrap().reference(), "/a");

        assert!(matches!(
            holder.link("next"),
            Err(DocumentError::LinkNotFound { .. })
        ));

        holder.remove_link("self");
        assert!(!holder.has_links());
        holder.set_link("self", LinkObject::new("/b")).unwrap();
        assert_eq!(holder.link("self").unwrap().reference(), "/b");
    }

    #[test]
    fn relationships_last_write_wins() {
        let mut holder = Holder::default();
        holder.set_relationship("author", ToOneRelationship::new());
        holder.set_relationship("tags", ToManyRelationship::new());
        holder.set_relationship("author", ToManyRelationship::new());

        assert!(matches!(
            holder.relationship("author").unwrap(),
            Relationship::ToMany(_)
        ));
        let names: Vec<&str> = holder.relationships().keys().map(String::as_str).collect();
        assert_eq!(names, ["author", "tags"]);

        assert!(matches!(
            holder.relationship("editor"),
            Err(DocumentError::RelationshipNotFound { .. })
        ));
    }

    #[test]
    fn errors_append_in_order() {
        let mut holder = Holder::default();
        assert!(!holder.has_errors());

        holder.add_error(ErrorObject::new().with_code("a"));
        holder.add_error(ErrorObject::new().with_code("b"));

        assert!(holder.has_errors());
        assert_eq!(
            holder.errors_container().to_value(),
            json!([{ "code": "a" }, { "code": "b" }])
        );
    }

    #[test]
    fn identifier_collection_keeps_duplicates() {
        let mut container = IdentifierCollectionContainer::new();
        container.push(ResourceIdentifier::new("1", "tag"));
        container.push(ResourceIdentifier::new("1", "tag"));
        assert_eq!(container.len(), 2);
        assert_eq!(
            container.to_value(),
            json!([{ "type": "tag", "id": "1" }, { "type": "tag", "id": "1" }])
        );
    }
}
