//! Payload and code parsers.

pub mod code;
pub mod payload;

pub use code::{CodePrefix, DocumentCode, parse_document_code, sibling_order, sort_number};
pub use payload::{JsonPayloadParser, Parser};

use crate::error::ChainError;
use crate::model::TreeData;

/// Parse a `tree-data` JSON payload.
pub fn parse(src: &str) -> Result<TreeData, ChainError> {
    JsonPayloadParser.parse(src)
}
