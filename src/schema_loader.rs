//! Reference field-set loading.
//!
//! When validating a document against a fixed schema rather than another
//! document, the reference side comes from a JSON descriptor:
//!
//! ```json
//! { "required_fields": ["Title", "Price", "Area"] }
//! ```
//!
//! A missing, unparsable, or empty descriptor is fatal and reported before
//! any comparison runs.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ComparisonError, Result};

/// Shape of the JSON schema descriptor.
#[derive(Debug, Deserialize)]
struct SchemaDescriptor {
    required_fields: Vec<String>,
}

/// Load the reference field set from a JSON descriptor file.
pub async fn load_required_fields(path: &Path) -> Result<BTreeSet<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ComparisonError::MissingReferenceData {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;

    parse_required_fields(&content, &path.display().to_string())
}

/// Parse a schema descriptor from JSON text.
pub fn parse_required_fields(json: &str, source: &str) -> Result<BTreeSet<String>> {
    let descriptor: SchemaDescriptor =
        serde_json::from_str(json).map_err(|e| ComparisonError::MissingReferenceData {
            path: source.to_string(),
            details: e.to_string(),
        })?;

    if descriptor.required_fields.is_empty() {
        return Err(ComparisonError::MissingReferenceData {
            path: source.to_string(),
            details: "required_fields list is empty".to_string(),
        });
    }

    Ok(descriptor.required_fields.into_iter().collect())
}
