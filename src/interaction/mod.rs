//! Interaction layer: mutations persisted through a backend, followed by a
//! full pipeline re-run, plus the transient export selection.

pub mod backend;
#[cfg(feature = "http")]
pub mod http;
pub mod sequence;
pub mod session;

pub use backend::{ChainBackend, ChainScope, ChooseOriginRequest, MemoryBackend};
#[cfg(feature = "http")]
pub use http::{EndpointConfig, HttpBackend};
pub use sequence::SequenceSelection;
pub use session::{
    GraphSession, Mutation, MutationTarget, Notice, NoticeLevel, SaveState, Ticket,
};
