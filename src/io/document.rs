use indexmap::IndexMap;
use jsonschema::validator_for;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Parameter, PersistedMapping};

/// A widget's parameter mappings together with the context needed to edit them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappingDocument {
    /// Parameters of the widget's query.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Dashboard-level parameter names already defined on the dashboard.
    #[serde(default)]
    pub existing_names: Vec<String>,
    #[serde(default)]
    pub mappings: IndexMap<String, PersistedMapping>,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to compile mapping document schema: {0}")]
    Schema(String),
    #[error("mapping document is invalid:\n{}", .issues.join("\n"))]
    Invalid { issues: Vec<String> },
    #[error("failed to decode mapping document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("mapping stored under '{key}' is named '{name}'")]
    KeyMismatch { key: String, name: String },
}

/// JSON Schema describing [`MappingDocument`].
pub fn document_schema() -> Result<Value, DocumentError> {
    Ok(serde_json::to_value(schema_for!(MappingDocument))?)
}

/// Validates `value` against the document schema and decodes it.
///
/// Every schema violation is reported with its instance path. Parameter
/// values are normalized for their kind after decoding.
pub fn load_document(value: &Value) -> Result<MappingDocument, DocumentError> {
    let schema = document_schema()?;
    let validator = validator_for(&schema).map_err(|err| DocumentError::Schema(err.to_string()))?;
    let issues: Vec<String> = validator
        .iter_errors(value)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let prefix = if pointer.is_empty() {
                "<root>".to_string()
            } else {
                pointer
            };
            format!("{prefix}: {error}")
        })
        .collect();
    if !issues.is_empty() {
        return Err(DocumentError::Invalid { issues });
    }

    let mut document: MappingDocument = serde_json::from_value(value.clone())?;
    for (key, mapping) in &document.mappings {
        if key != &mapping.name {
            return Err(DocumentError::KeyMismatch {
                key: key.clone(),
                name: mapping.name.clone(),
            });
        }
    }
    for param in &mut document.parameters {
        param.renormalize();
    }
    tracing::debug!(
        parameters = document.parameters.len(),
        mappings = document.mappings.len(),
        "loaded mapping document"
    );
    Ok(document)
}
