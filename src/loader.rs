//! Reading raw documents from files and strings.

use std::path::Path;

use serde_json::Value;

use crate::error::HydrateError;

/// Load a document from a file path.
///
/// # Errors
///
/// Returns `HydrateError::FileNotFound` if the file doesn't exist,
/// or `HydrateError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, HydrateError> {
    if !path.exists() {
        return Err(HydrateError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| HydrateError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_document_str(&content)
}

/// Load a document from a JSON string.
///
/// # Errors
///
/// Returns `HydrateError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, HydrateError> {
    serde_json::from_str(content).map_err(|source| HydrateError::InvalidJson { source })
}
