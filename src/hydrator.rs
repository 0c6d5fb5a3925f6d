//! Hydration - builds typed documents from their JSON representation.

use serde_json::{Map, Value};

use crate::behaviour::{
    ErrorsAware, IdentifierCollectionAware, IncludedResourcesAware, JsonApiAware, LinksAware,
    MetadataAware, RelationshipsAware,
};
use crate::document::{
    Document, ErrorDocument, IdentifierCollectionDocument, ResourceCollectionDocument,
    SingleResourceDocument,
};
use crate::error::HydrateError;
use crate::objects::{ErrorObject, JsonApiObject, LinkObject};
use crate::relationship::{Relationship, ToManyRelationship, ToOneRelationship};
use crate::resource::{ResourceIdentifier, ResourceObject};
use crate::types::{json_type_name, HydrateOptions, DOCUMENT_MEMBERS};
use crate::validator::validate_structure;

/// Hydrate a document from its JSON value.
///
/// The document kind follows the top-level members:
///
/// | Members | Document |
/// |---------|----------|
/// | `data` is `null` or an object | [`SingleResourceDocument`] |
/// | `data` is an array | [`ResourceCollectionDocument`], or [`IdentifierCollectionDocument`] with `identifier_data` |
/// | `errors` without `data` | [`ErrorDocument`] |
/// | `meta` only | [`SingleResourceDocument`] with `null` data |
///
/// Numeric ids are accepted and stringified unless `options.strict` is set.
///
/// # Errors
///
/// Returns `HydrateError` if a member has the wrong shape, a resource
/// lacks `type` or `id`, or (in strict mode) the structure check fails.
pub fn hydrate(value: &Value, options: &HydrateOptions) -> Result<Document, HydrateError> {
    if options.strict {
        validate_structure(value)?;
    }

    let root = expect_object(value, "")?;

    if options.strict {
        if let Some(member) = root
            .keys()
            .find(|key| !DOCUMENT_MEMBERS.contains(&key.as_str()))
        {
            return Err(HydrateError::UnknownMember {
                member: member.clone(),
            });
        }
    }

    let document = match root.get("data") {
        Some(Value::Array(items)) if options.identifier_data => {
            let mut document = IdentifierCollectionDocument::new();
            for (index, item) in items.iter().enumerate() {
                document.add_identifier(hydrate_identifier(item, &format!("/data/{}", index))?);
            }
            hydrate_sections(&mut document, root)?;
            Document::from(document)
        }
        Some(Value::Array(items)) => {
            let mut document = ResourceCollectionDocument::new();
            for (index, item) in items.iter().enumerate() {
                document.add_resource(hydrate_resource(item, &format!("/data/{}", index))?);
            }
            hydrate_sections(&mut document, root)?;
            Document::from(document)
        }
        Some(Value::Null) => {
            let mut document = SingleResourceDocument::empty();
            hydrate_sections(&mut document, root)?;
            Document::from(document)
        }
        Some(data @ Value::Object(_)) => {
            let mut document = SingleResourceDocument::new(hydrate_resource(data, "/data")?);
            hydrate_sections(&mut document, root)?;
            Document::from(document)
        }
        Some(other) => {
            return Err(HydrateError::InvalidMember {
                path: "/data".into(),
                expected: "null, object or array",
                actual: json_type_name(other).to_string(),
            })
        }
        None if root.contains_key("errors") => {
            let mut document = ErrorDocument::new();
            hydrate_sections(&mut document, root)?;
            Document::from(document)
        }
        None if root.contains_key("meta") => {
            let mut document = SingleResourceDocument::empty();
            hydrate_sections(&mut document, root)?;
            Document::from(document)
        }
        None => return Err(HydrateError::EmptyDocument),
    };

    tracing::debug!(document = %document, "hydrated document");
    Ok(document)
}

// --- Internal implementation ---

/// Members every document kind shares: `jsonapi`, `meta`, `links`,
/// `included` and `errors`.
fn hydrate_sections<D>(document: &mut D, root: &Map<String, Value>) -> Result<(), HydrateError>
where
    D: JsonApiAware + MetadataAware + LinksAware + IncludedResourcesAware + ErrorsAware,
{
    if let Some(value) = root.get("jsonapi") {
        document.set_json_api(hydrate_json_api(value)?);
    }
    if let Some(value) = root.get("meta") {
        hydrate_metadata(document, value, "/meta")?;
    }
    if let Some(value) = root.get("links") {
        hydrate_links(document, value, "/links")?;
    }
    if let Some(value) = root.get("included") {
        for (index, item) in expect_array(value, "/included")?.iter().enumerate() {
            document.add_included_resource(hydrate_resource(item, &format!("/included/{}", index))?);
        }
    }
    if let Some(value) = root.get("errors") {
        for (index, item) in expect_array(value, "/errors")?.iter().enumerate() {
            let fields = expect_object(item, &format!("/errors/{}", index))?;
            document.add_error(ErrorObject::from(fields.clone()));
        }
    }
    Ok(())
}

fn hydrate_json_api(value: &Value) -> Result<JsonApiObject, HydrateError> {
    let map = expect_object(value, "/jsonapi")?;
    let mut json_api = match map.get("version") {
        Some(Value::String(version)) => JsonApiObject::with_version(version.as_str()),
        Some(other) => {
            return Err(HydrateError::InvalidMember {
                path: "/jsonapi/version".into(),
                expected: "string",
                actual: json_type_name(other).to_string(),
            })
        }
        None => JsonApiObject::new(),
    };
    if let Some(meta) = map.get("meta") {
        hydrate_metadata(&mut json_api, meta, "/jsonapi/meta")?;
    }
    Ok(json_api)
}

fn hydrate_metadata<T: MetadataAware>(
    target: &mut T,
    value: &Value,
    path: &str,
) -> Result<(), HydrateError> {
    for (name, value) in expect_object(value, path)? {
        target.set_metadata_attribute(name.as_str(), value.clone())?;
    }
    Ok(())
}

/// Links may be a plain href, a link object, or `null` (skipped).
fn hydrate_links<T: LinksAware>(target: &mut T, value: &Value, path: &str) -> Result<(), HydrateError> {
    for (name, link) in expect_object(value, path)? {
        let link_path = pointer(path, name);
        let link = match link {
            Value::Null => continue,
            Value::String(href) => LinkObject::new(href.as_str()),
            Value::Object(map) => {
                let href = match map.get("href") {
                    Some(Value::String(href)) => href,
                    Some(other) => {
                        return Err(HydrateError::InvalidMember {
                            path: format!("{}/href", link_path),
                            expected: "string",
                            actual: json_type_name(other).to_string(),
                        })
                    }
                    None => {
                        return Err(HydrateError::MissingMember {
                            path: link_path,
                            member: "href".into(),
                        })
                    }
                };
                let mut link = LinkObject::new(href.as_str());
                if let Some(meta) = map.get("meta") {
                    hydrate_metadata(&mut link, meta, &format!("{}/meta", link_path))?;
                }
                link
            }
            other => {
                return Err(HydrateError::InvalidMember {
                    path: link_path,
                    expected: "string or object",
                    actual: json_type_name(other).to_string(),
                })
            }
        };
        target.set_link(name.as_str(), link)?;
    }
    Ok(())
}

/// Identifiers carry `type` and `id` only; anything else is dropped.
fn hydrate_identifier(value: &Value, path: &str) -> Result<ResourceIdentifier, HydrateError> {
    let map = expect_object(value, path)?;
    let identifier = identifier_of(map, path)?;
    for member in map.keys().filter(|key| !matches!(key.as_str(), "type" | "id")) {
        tracing::warn!(path = %pointer(path, member), "dropping identifier member");
    }
    Ok(identifier)
}

fn identifier_of(map: &Map<String, Value>, path: &str) -> Result<ResourceIdentifier, HydrateError> {
    let resource_type = required_string(map, "type", path)?;
    let id = required_id(map, path)?;
    Ok(ResourceIdentifier::new(id, resource_type))
}

fn hydrate_resource(value: &Value, path: &str) -> Result<ResourceObject, HydrateError> {
    let map = expect_object(value, path)?;
    let mut resource = ResourceObject::from(identifier_of(map, path)?);

    if let Some(attributes) = map.get("attributes") {
        let attributes = expect_object(attributes, &format!("{}/attributes", path))?;
        resource = resource.with_attributes(attributes.clone());
    }
    if let Some(meta) = map.get("meta") {
        hydrate_metadata(&mut resource, meta, &format!("{}/meta", path))?;
    }
    if let Some(links) = map.get("links") {
        hydrate_links(&mut resource, links, &format!("{}/links", path))?;
    }
    if let Some(relationships) = map.get("relationships") {
        let rel_path = format!("{}/relationships", path);
        for (name, value) in expect_object(relationships, &rel_path)? {
            let relationship = hydrate_relationship(value, &pointer(&rel_path, name))?;
            resource.set_relationship(name.as_str(), relationship);
        }
    }
    Ok(resource)
}

/// A missing `data` member hydrates as an unset to-one relationship.
fn hydrate_relationship(value: &Value, path: &str) -> Result<Relationship, HydrateError> {
    let map = expect_object(value, path)?;
    let data_path = format!("{}/data", path);

    let mut relationship = match map.get("data") {
        None => Relationship::from(ToOneRelationship::new()),
        Some(Value::Null) => {
            let mut rel = ToOneRelationship::new();
            rel.clear_identifier();
            Relationship::from(rel)
        }
        Some(data @ Value::Object(_)) => {
            Relationship::from(ToOneRelationship::with_identifier(hydrate_identifier(
                data, &data_path,
            )?))
        }
        Some(Value::Array(items)) => {
            let mut rel = ToManyRelationship::new();
            for (index, item) in items.iter().enumerate() {
                rel.add_identifier(hydrate_identifier(item, &format!("{}/{}", data_path, index))?);
            }
            Relationship::from(rel)
        }
        Some(other) => {
            return Err(HydrateError::InvalidMember {
                path: data_path,
                expected: "null, object or array",
                actual: json_type_name(other).to_string(),
            })
        }
    };

    if let Some(links) = map.get("links") {
        hydrate_links(&mut relationship, links, &format!("{}/links", path))?;
    }
    if let Some(meta) = map.get("meta") {
        hydrate_metadata(&mut relationship, meta, &format!("{}/meta", path))?;
    }
    Ok(relationship)
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, HydrateError> {
    value.as_object().ok_or_else(|| HydrateError::InvalidMember {
        path: display_path(path),
        expected: "object",
        actual: json_type_name(value).to_string(),
    })
}

fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, HydrateError> {
    value.as_array().ok_or_else(|| HydrateError::InvalidMember {
        path: display_path(path),
        expected: "array",
        actual: json_type_name(value).to_string(),
    })
}

fn required_string(map: &Map<String, Value>, member: &str, path: &str) -> Result<String, HydrateError> {
    match map.get(member) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(HydrateError::InvalidMember {
            path: pointer(path, member),
            expected: "string",
            actual: json_type_name(other).to_string(),
        }),
        None => Err(HydrateError::MissingMember {
            path: display_path(path),
            member: member.to_string(),
        }),
    }
}

/// Ids are strings; numbers are stringified.
fn required_id(map: &Map<String, Value>, path: &str) -> Result<String, HydrateError> {
    match map.get("id") {
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => required_string(map, "id", path),
    }
}

/// Append one member name to a JSON pointer, escaping `~` and `/`.
fn pointer(path: &str, name: &str) -> String {
    format!("{}/{}", path, name.replace('~', "~0").replace('/', "~1"))
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
