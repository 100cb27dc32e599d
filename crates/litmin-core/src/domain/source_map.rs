//! Version 3 source map value returned to callers.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A standard (version 3) source map.
///
/// Field names serialise to the JSON names consumers expect
/// (`sourcesContent`, not `sources_content`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub sources_content: Vec<Option<String>>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Parse a source map from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| DomainError::InvalidSourceMap(e.to_string()))
    }

    /// Convert an encoded map produced by the `sourcemap` crate.
    pub(crate) fn from_encoded(map: &sourcemap::SourceMap) -> Result<Self, DomainError> {
        let mut buf = Vec::new();
        map.to_writer(&mut buf)
            .map_err(|e| DomainError::InvalidSourceMap(e.to_string()))?;
        serde_json::from_slice(&buf).map_err(|e| DomainError::InvalidSourceMap(e.to_string()))
    }

    /// JSON text of the map.
    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| DomainError::InvalidSourceMap(e.to_string()))
    }

    /// `data:` URL embedding the map, suitable for an inline
    /// `sourceMappingURL` comment.
    pub fn to_url(&self) -> Result<String, DomainError> {
        let json = self.to_json()?;
        Ok(format!(
            "data:application/json;charset=utf-8;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(json)
        ))
    }
}
