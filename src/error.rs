//! Error and diagnostic types shared by the pipeline and the interaction layer.

use serde::Serialize;

use crate::model::DocumentId;

/// Highest level a user may pin a document to.
pub const MAX_MANUAL_LEVEL: i64 = 10;

/// Failures that abort building a view or reject a mutation.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("the chain has no documents")]
    EmptyGraph,
    #[error("origin link {from} -> {to} references unknown document {missing}")]
    MissingNode {
        from: DocumentId,
        to: DocumentId,
        missing: DocumentId,
    },
    #[error("document id {id} appears more than once")]
    DuplicateId { id: DocumentId },
    #[error("document code '{code}' appears more than once in the same registry office")]
    DuplicateCode { code: String },
    #[error("level {level} for document {document} is outside 0..=10")]
    InvalidLevel { document: DocumentId, level: i64 },
    #[error("chosen origins form a cycle through document {document}")]
    CycleDetected { document: DocumentId },
    #[error("invalid document code '{code}'")]
    InvalidCode { code: String },
    #[error("document {0} is not part of the chain")]
    UnknownDocument(String),
    #[error("'{origin}' is not a candidate origin of document {document}")]
    UnknownOrigin { document: DocumentId, origin: String },
    #[error("a change to '{target}' is still being saved")]
    ConcurrentMutation { target: String },
    #[error(transparent)]
    Network {
        #[from]
        source: BackendError,
    },
    #[error("malformed chain payload: {source}")]
    Payload {
        #[from]
        source: serde_json::Error,
    },
}

/// Failures reported by the remote collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("server rejected the change: {0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unreadable server response: {0}")]
    Decode(String),
}

/// Non-fatal findings collected while building a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A document with no links at all that is not the root.
    Orphan { document: DocumentId },
    /// A document the tree traversal cannot reach from the root.
    Unreachable { document: DocumentId },
    /// A display code whose number could not be parsed; sorted as 0.
    UnparsableCode { code: String },
}
