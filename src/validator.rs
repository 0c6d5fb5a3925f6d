//! Structural validation of serialized documents.
//!
//! Checks the shape of every member a document can carry. Objects the model
//! keeps whole (attributes, `meta` and error objects) are not inspected;
//! every other object rejects members the model has no place for.

use serde_json::{json, Value};

use crate::error::{StructureError, ValidateError};

/// JSON Schema describing the document structure.
pub fn structure_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "anyOf": [
            { "required": ["data"] },
            { "required": ["errors"] },
            { "required": ["meta"] }
        ],
        "properties": {
            "jsonapi": {
                "type": "object",
                "properties": {
                    "version": { "type": "string" },
                    "meta": { "type": "object" }
                },
                "additionalProperties": false
            },
            "meta": { "type": "object" },
            "links": { "$ref": "#/$defs/links" },
            "data": {
                "oneOf": [
                    { "type": "null" },
                    { "$ref": "#/$defs/resource" },
                    { "type": "array", "items": { "$ref": "#/$defs/resource" } }
                ]
            },
            "included": { "type": "array", "items": { "$ref": "#/$defs/resource" } },
            "errors": { "type": "array", "items": { "type": "object" } }
        },
        "$defs": {
            "identifier": {
                "type": "object",
                "required": ["type", "id"],
                "properties": {
                    "type": { "type": "string" },
                    "id": { "type": "string" }
                },
                "additionalProperties": false
            },
            "resource": {
                "type": "object",
                "required": ["type", "id"],
                "properties": {
                    "type": { "type": "string" },
                    "id": { "type": "string" },
                    "attributes": { "type": "object" },
                    "relationships": {
                        "type": "object",
                        "additionalProperties": { "$ref": "#/$defs/relationship" }
                    },
                    "links": { "$ref": "#/$defs/links" },
                    "meta": { "type": "object" }
                },
                "additionalProperties": false
            },
            "relationship": {
                "type": "object",
                "properties": {
                    "data": {
                        "oneOf": [
                            { "type": "null" },
                            { "$ref": "#/$defs/identifier" },
                            { "type": "array", "items": { "$ref": "#/$defs/identifier" } }
                        ]
                    },
                    "links": { "$ref": "#/$defs/links" },
                    "meta": { "type": "object" }
                },
                "additionalProperties": false
            },
            "links": {
                "type": "object",
                "additionalProperties": {
                    "oneOf": [
                        { "type": "string" },
                        { "type": "null" },
                        {
                            "type": "object",
                            "required": ["href"],
                            "properties": {
                                "href": { "type": "string" },
                                "meta": { "type": "object" }
                            },
                            "additionalProperties": false
                        }
                    ]
                }
            }
        }
    })
}

/// Validate the structure of a serialized document.
///
/// # Errors
///
/// Returns `ValidateError::Invalid` with every violation found.
pub fn validate_structure(document: &Value) -> Result<(), ValidateError> {
    let schema = structure_schema();
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })?;

    let errors: Vec<StructureError> = validator
        .iter_errors(document)
        .map(|e| StructureError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = errors.len(), "document structure invalid");
        Err(ValidateError::Invalid { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SingleResourceDocument;
    use crate::resource::ResourceObject;
    use crate::types::ToValue;

    #[test]
    fn serialized_document_is_valid() {
        let document = SingleResourceDocument::new(ResourceObject::new("1", "a"));
        assert!(validate_structure(&document.to_value()).is_ok());
    }

    #[test]
    fn meta_only_document_is_valid() {
        assert!(validate_structure(&json!({ "meta": { "total": 0 } })).is_ok());
    }

    #[test]
    fn empty_object_is_invalid() {
        let result = validate_structure(&json!({}));
        assert!(matches!(result, Err(ValidateError::Invalid { .. })));
    }

    #[test]
    fn resource_without_type_is_invalid() {
        let result = validate_structure(&json!({ "data": { "id": "1" } }));
        match result {
            Err(ValidateError::Invalid { errors }) => {
                assert!(errors.iter().any(|e| e.path.starts_with("/data")));
            }
            other => panic!("expected invalid structure, got {:?}", other),
        }
    }

    #[test]
    fn numeric_id_is_invalid() {
        let result = validate_structure(&json!({ "data": [{ "type": "a", "id": 1 }] }));
        assert!(result.is_err());
    }

    #[test]
    fn identifier_members_are_closed() {
        let value = json!({
            "data": {
                "type": "a",
                "id": "1",
                "relationships": {
                    "r": { "data": { "type": "b", "id": "2", "meta": { "k": 1 } } }
                }
            }
        });
        match validate_structure(&value) {
            Err(ValidateError::Invalid { errors }) => {
                assert!(errors
                    .iter()
                    .any(|e| e.path.starts_with("/data/relationships/r/data")));
            }
            other => panic!("expected invalid structure, got {:?}", other),
        }
    }

    #[test]
    fn unknown_resource_and_link_members_are_invalid() {
        assert!(validate_structure(&json!({ "data": { "type": "a", "id": "1", "extra": 1 } })).is_err());
        assert!(validate_structure(&json!({
            "links": { "self": { "href": "/a", "title": "A" } },
            "data": null
        }))
        .is_err());
        assert!(validate_structure(&json!({
            "data": { "type": "a", "id": "1", "attributes": { "anything": { "goes": true } }, "meta": { "x": [] } }
        }))
        .is_ok());
    }

    #[test]
    fn errors_must_be_objects() {
        let result = validate_structure(&json!({ "errors": ["boom"] }));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().exit_code(), 1);
    }
}
