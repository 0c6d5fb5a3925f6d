//! JSON:API Document Model
//!
//! Builds, hydrates and serializes documents in the JSON:API format.
//!
//! Documents are assembled bottom-up from identifiers, resources,
//! relationships, links and metadata, then turned into a `serde_json::Value`
//! in a single call. Member order is fixed and empty members are left out.
//!
//! # Example
//!
//! ```
//! use jsonapi_document::{MetadataAware, ResourceObject, SingleResourceDocument, ToValue};
//! use serde_json::json;
//!
//! let mut resource = ResourceObject::new("42", "test");
//! resource.set_attribute("test", 42);
//!
//! let mut document = SingleResourceDocument::new(resource);
//! assert_eq!(
//!     document.to_value(),
//!     json!({ "data": { "id": "42", "type": "test", "attributes": { "test": 42 } } })
//! );
//!
//! document.set_metadata_attribute("total", 1).unwrap();
//! // Metadata keys are never overwritten implicitly
//! assert!(document.set_metadata_attribute("total", 2).is_err());
//! ```
//!
//! # Member Order
//!
//! | Member | Emitted when |
//! |--------|--------------|
//! | `jsonapi` | set |
//! | `meta` | non-empty |
//! | `links` | non-empty |
//! | `data` | always, except error documents |
//! | `included` | non-empty |
//! | `errors` | non-empty, or the document is an error document |

mod behaviour;
mod document;
mod error;
mod hydrator;
mod loader;
mod mapper;
mod objects;
mod relationship;
mod resource;
mod types;
mod validator;

pub use behaviour::{
    ErrorsAware, ErrorsContainer, IdentifierCollectionAware, IdentifierCollectionContainer,
    IncludedResourcesAware, IncludedResourcesContainer, JsonApiAware, LinksAware, LinksContainer,
    MetadataAware, MetadataContainer, RelationshipsAware, RelationshipsContainer,
};
pub use document::{
    Document, ErrorDocument, IdentifierCollectionDocument, ResourceCollectionDocument,
    SingleResourceDocument,
};
pub use error::{DocumentError, HydrateError, MappingError, StructureError, ValidateError};
pub use hydrator::hydrate;
pub use loader::{load_document, load_document_str};
pub use mapper::{ArrayTransformer, Context, MappingHandler, SerdeArrayTransformer};
pub use objects::{ErrorObject, JsonApiObject, LinkObject};
pub use relationship::{Relationship, ToManyRelationship, ToOneRelationship};
pub use resource::{ResourceIdentifier, ResourceObject};
pub use types::{json_type_name, HydrateOptions, ToValue, DOCUMENT_MEMBERS, JSON_API_VERSION};
pub use validator::{structure_schema, validate_structure};
