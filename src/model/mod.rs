//! Chain snapshot domain model.

pub mod types;

pub use types::{
    ChainEnd, Document, DocumentId, DocumentKind, OriginCandidate, OriginLink, TreeData,
};
