//! Error types for document building, hydration and mapping.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by container lookups and overrides.
///
/// `owner` is the display label of the entity that owns the container and
/// always contains its type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("metadata attribute \"{name}\" not found in {owner}")]
    MetadataAttributeNotFound { owner: String, name: String },

    #[error("metadata attribute \"{name}\" is already set in {owner}")]
    MetadataAttributeOverride { owner: String, name: String },

    #[error("link \"{name}\" not found in {owner}")]
    LinkNotFound { owner: String, name: String },

    #[error("link \"{name}\" is already set in {owner}")]
    LinkOverride { owner: String, name: String },

    #[error("attribute \"{name}\" not found in {owner}")]
    AttributeNotFound { owner: String, name: String },

    #[error("relationship \"{name}\" not found in {owner}")]
    RelationshipNotFound { owner: String, name: String },
}

impl DocumentError {
    /// Returns true for the lookup failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MetadataAttributeNotFound { .. }
                | Self::LinkNotFound { .. }
                | Self::AttributeNotFound { .. }
                | Self::RelationshipNotFound { .. }
        )
    }

    /// Returns true for the override failures.
    pub fn is_override(&self) -> bool {
        matches!(
            self,
            Self::MetadataAttributeOverride { .. } | Self::LinkOverride { .. }
        )
    }
}

/// Errors while turning a JSON value into a typed document.
#[derive(Debug, Error)]
pub enum HydrateError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid member at {path}: expected {expected}, got {actual}")]
    InvalidMember {
        path: String,
        expected: &'static str,
        actual: String,
    },

    #[error("missing member \"{member}\" at {path}")]
    MissingMember { path: String, member: String },

    #[error("unknown top-level member \"{member}\"")]
    UnknownMember { member: String },

    #[error("document has neither data, errors nor meta")]
    EmptyDocument,

    #[error(transparent)]
    Structure(#[from] ValidateError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl HydrateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::ReadError { .. } => 3,
            Self::Structure(e) => e.exit_code(),
            _ => 2,
        }
    }
}

/// Errors during structural validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("invalid structure schema: {message}")]
    InvalidSchema { message: String },

    #[error("document structure invalid with {} error(s)", errors.len())]
    Invalid { errors: Vec<StructureError> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::InvalidSchema { .. } => 2,
            ValidateError::Invalid { .. } => 1,
        }
    }
}

/// Single structural violation with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StructureError {
    /// JSON Pointer (RFC 6901) to the offending member.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for StructureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Errors raised by the object mapping adapter.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("{type_name} does not transform into a map, got {actual}")]
    NotAMap {
        type_name: &'static str,
        actual: &'static str,
    },

    #[error("cannot serialize {type_name}: {source}")]
    Serialize {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot deserialize {type_name}: {source}")]
    Deserialize {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },
}
