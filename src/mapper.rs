//! Mapping between domain objects and resource attributes.
//!
//! The document model never inspects domain types itself. A
//! [`MappingHandler`] delegates to an [`ArrayTransformer`] strategy that
//! flattens an object into a map and rebuilds it from one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::MappingError;
use crate::resource::ResourceObject;
use crate::types::json_type_name;

/// Intent of a transformation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Serialization,
    Deserialization,
}

impl Context {
    /// Whether the call rebuilds an object from a resource.
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Context::Deserialization)
    }
}

/// Strategy that turns objects into flat maps and back.
pub trait ArrayTransformer {
    /// Flatten an object into a map of attribute values.
    fn to_array<T: Serialize>(&self, object: &T) -> Result<Map<String, Value>, MappingError>;

    /// Rebuild an object of type `type_name` from a map.
    fn from_array<T: DeserializeOwned>(
        &self,
        data: Map<String, Value>,
        type_name: &str,
        context: Context,
    ) -> Result<T, MappingError>;
}

/// Transformer backed by serde.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeArrayTransformer;

impl ArrayTransformer for SerdeArrayTransformer {
    fn to_array<T: Serialize>(&self, object: &T) -> Result<Map<String, Value>, MappingError> {
        let type_name = std::any::type_name::<T>();
        match serde_json::to_value(object)
            .map_err(|source| MappingError::Serialize { type_name, source })?
        {
            Value::Object(map) => Ok(map),
            other => Err(MappingError::NotAMap {
                type_name,
                actual: json_type_name(&other),
            }),
        }
    }

    fn from_array<T: DeserializeOwned>(
        &self,
        data: Map<String, Value>,
        type_name: &str,
        _context: Context,
    ) -> Result<T, MappingError> {
        serde_json::from_value(Value::Object(data)).map_err(|source| MappingError::Deserialize {
            type_name: type_name.to_string(),
            source,
        })
    }
}

/// Copies domain objects into resource attributes and back.
#[derive(Debug, Clone, Default)]
pub struct MappingHandler<T> {
    transformer: T,
}

impl<T: ArrayTransformer> MappingHandler<T> {
    /// Wrap a transformer.
    pub fn new(transformer: T) -> Self {
        Self { transformer }
    }

    /// Set every entry of the flattened object as a resource attribute.
    ///
    /// # Errors
    ///
    /// Returns the transformer's error if the object cannot be flattened.
    pub fn to_resource<O: Serialize>(
        &self,
        object: &O,
        resource: &mut ResourceObject,
    ) -> Result<(), MappingError> {
        let attributes = self.transformer.to_array(object)?;
        tracing::debug!(
            resource = %resource,
            count = attributes.len(),
            "mapping object onto resource attributes"
        );
        for (name, value) in attributes {
            resource.set_attribute(name, value);
        }
        Ok(())
    }

    /// Rebuild an object from the resource's full attribute map.
    ///
    /// # Errors
    ///
    /// Returns the transformer's error if the attributes don't fit `O`.
    pub fn from_resource<O: DeserializeOwned>(
        &self,
        resource: &ResourceObject,
    ) -> Result<O, MappingError> {
        let type_name = std::any::type_name::<O>();
        tracing::debug!(resource = %resource, type_name, "mapping resource attributes onto object");
        self.transformer.from_array(
            resource.attributes().clone(),
            type_name,
            Context::Deserialization,
        )
    }
}
