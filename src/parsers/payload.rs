//! `tree-data` payload parsing.

use tracing::debug;

use crate::error::ChainError;
use crate::model::TreeData;

/// Trait for chain snapshot parsers.
pub trait Parser {
    /// Parse the source text into a chain snapshot.
    fn parse(&self, src: &str) -> Result<TreeData, ChainError>;
}

/// Parses the JSON body served by the `tree-data` and `cadeia-atualizada`
/// endpoints.
///
/// Some deployments wrap the snapshot as `{"success": true, "data": {...}}`;
/// both shapes are accepted.
pub struct JsonPayloadParser;

impl Parser for JsonPayloadParser {
    fn parse(&self, src: &str) -> Result<TreeData, ChainError> {
        let value: serde_json::Value = serde_json::from_str(src)?;
        let body = match value.get("data") {
            Some(inner) if inner.get("documentos").is_some() => inner.clone(),
            _ => value,
        };
        let data: TreeData = serde_json::from_value(body)?;
        debug!(
            documents = data.documentos.len(),
            links = data.conexoes.len(),
            candidates = data.origens_identificadas.len(),
            "parsed chain payload"
        );
        Ok(data)
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_parsers_payload.rs"]
mod tests;
