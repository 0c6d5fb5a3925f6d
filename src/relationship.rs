//! To-one and to-many relationships.

use std::fmt;

use serde_json::{Map, Value};

use crate::behaviour::{LinksAware, LinksContainer, MetadataAware, MetadataContainer};
use crate::resource::ResourceIdentifier;
use crate::types::{insert_map, ToValue};

/// Linkage of a to-one relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Linkage {
    /// Nothing assigned yet.
    #[default]
    Unset,
    /// Explicitly empty.
    Empty,
    Identifier(ResourceIdentifier),
}

/// A relationship to at most one resource.
///
/// Unset and explicitly empty relationships both serialize `data` as
/// `null` but stay distinguishable through [`ToOneRelationship::is_set`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToOneRelationship {
    linkage: Linkage,
    metadata: MetadataContainer,
    links: LinksContainer,
}

impl ToOneRelationship {
    /// Create an unset relationship.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a relationship pointing at `identifier`.
    pub fn with_identifier(identifier: ResourceIdentifier) -> Self {
        let mut relationship = Self::new();
        relationship.set_identifier(identifier);
        relationship
    }

    /// Point the relationship at `identifier`.
    pub fn set_identifier(&mut self, identifier: ResourceIdentifier) {
        self.linkage = Linkage::Identifier(identifier);
    }

    /// Mark the relationship as explicitly empty.
    pub fn clear_identifier(&mut self) {
        self.linkage = Linkage::Empty;
    }

    /// The linked identifier, if any.
    pub fn identifier(&self) -> Option<&ResourceIdentifier> {
        match &self.linkage {
            Linkage::Identifier(identifier) => Some(identifier),
            Linkage::Unset | Linkage::Empty => None,
        }
    }

    /// Whether an identifier is linked.
    pub fn has_identifier(&self) -> bool {
        matches!(self.linkage, Linkage::Identifier(_))
    }

    /// True once an identifier or an explicit empty linkage was assigned.
    pub fn is_set(&self) -> bool {
        self.linkage != Linkage::Unset
    }
}

/// A relationship to an ordered list of resources. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToManyRelationship {
    identifiers: Vec<ResourceIdentifier>,
    metadata: MetadataContainer,
    links: LinksContainer,
}

impl ToManyRelationship {
    /// Create an empty relationship.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an identifier.
    pub fn add_identifier(&mut self, identifier: ResourceIdentifier) {
        self.identifiers.push(identifier);
    }

    /// Linked identifiers in the order they were added.
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        &self.identifiers
    }
}

impl FromIterator<ResourceIdentifier> for ToManyRelationship {
    fn from_iter<I: IntoIterator<Item = ResourceIdentifier>>(iter: I) -> Self {
        Self {
            identifiers: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// Either relationship variant, as stored on a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Relationship {
    ToOne(ToOneRelationship),
    ToMany(ToManyRelationship),
}

impl Relationship {
    fn parts(&self) -> (&MetadataContainer, &LinksContainer) {
        match self {
            Relationship::ToOne(rel) => (&rel.metadata, &rel.links),
            Relationship::ToMany(rel) => (&rel.metadata, &rel.links),
        }
    }

    fn parts_mut(&mut self) -> (&mut MetadataContainer, &mut LinksContainer) {
        match self {
            Relationship::ToOne(rel) => (&mut rel.metadata, &mut rel.links),
            Relationship::ToMany(rel) => (&mut rel.metadata, &mut rel.links),
        }
    }

    /// The to-one variant, if this is one.
    pub fn as_to_one(&self) -> Option<&ToOneRelationship> {
        match self {
            Relationship::ToOne(rel) => Some(rel),
            Relationship::ToMany(_) => None,
        }
    }

    /// The to-many variant, if this is one.
    pub fn as_to_many(&self) -> Option<&ToManyRelationship> {
        match self {
            Relationship::ToMany(rel) => Some(rel),
            Relationship::ToOne(_) => None,
        }
    }

    /// Mutable to-many variant, e.g. to append identifiers.
    pub fn as_to_many_mut(&mut self) -> Option<&mut ToManyRelationship> {
        match self {
            Relationship::ToMany(rel) => Some(rel),
            Relationship::ToOne(_) => None,
        }
    }
}

impl From<ToOneRelationship> for Relationship {
    fn from(rel: ToOneRelationship) -> Self {
        Relationship::ToOne(rel)
    }
}

impl From<ToManyRelationship> for Relationship {
    fn from(rel: ToManyRelationship) -> Self {
        Relationship::ToMany(rel)
    }
}

impl fmt::Display for ToOneRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToOneRelationship")
    }
}

impl fmt::Display for ToManyRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToManyRelationship")
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relationship::ToOne(rel) => fmt::Display::fmt(rel, f),
            Relationship::ToMany(rel) => fmt::Display::fmt(rel, f),
        }
    }
}

impl MetadataAware for ToOneRelationship {
    fn metadata_container(&self) -> &MetadataContainer {
        &self.metadata
    }

    fn metadata_container_mut(&mut self) -> &mut MetadataContainer {
        &mut self.metadata
    }
}

impl LinksAware for ToOneRelationship {
    fn links_container(&self) -> &LinksContainer {
        &self.links
    }

    fn links_container_mut(&mut self) -> &mut LinksContainer {
        &mut self.links
    }
}

impl MetadataAware for ToManyRelationship {
    fn metadata_container(&self) -> &MetadataContainer {
        &self.metadata
    }

    fn metadata_container_mut(&mut self) -> &mut MetadataContainer {
        &mut self.metadata
    }
}

impl LinksAware for ToManyRelationship {
    fn links_container(&self) -> &LinksContainer {
        &self.links
    }

    fn links_container_mut(&mut self) -> &mut LinksContainer {
        &mut self.links
    }
}

impl MetadataAware for Relationship {
    fn metadata_container(&self) -> &MetadataContainer {
        self.parts().0
    }

    fn metadata_container_mut(&mut self) -> &mut MetadataContainer {
        self.parts_mut().0
    }
}

impl LinksAware for Relationship {
    fn links_container(&self) -> &LinksContainer {
        self.parts().1
    }

    fn links_container_mut(&mut self) -> &mut LinksContainer {
        self.parts_mut().1
    }
}

fn relationship_value(data: Value, metadata: &MetadataContainer, links: &LinksContainer) -> Value {
    let mut out = Map::new();
    out.insert("data".to_string(), data);
    if !links.is_empty() {
        out.insert("links".to_string(), links.to_value());
    }
    insert_map(&mut out, "meta", metadata.as_map());
    Value::Object(out)
}

impl ToValue for ToOneRelationship {
    fn to_value(&self) -> Value {
        let data = self
            .identifier()
            .map(ToValue::to_value)
            .unwrap_or(Value::Null);
        relationship_value(data, &self.metadata, &self.links)
    }
}

impl ToValue for ToManyRelationship {
    fn to_value(&self) -> Value {
        let data = Value::Array(self.identifiers.iter().map(ToValue::to_value).collect());
        relationship_value(data, &self.metadata, &self.links)
    }
}

impl ToValue for Relationship {
    fn to_value(&self) -> Value {
        match self {
            Relationship::ToOne(rel) => rel.to_value(),
            Relationship::ToMany(rel) => rel.to_value(),
        }
    }
}
