//! `GraphSession`: one open chain, its derived view, and the mutations in
//! flight against it.
//!
//! Every mutation goes `Idle → Saving → Idle`. `begin` validates the request
//! and marks its target as saving; a second mutation on the same target is
//! rejected with `ConcurrentMutation` until `finish` runs. On success the
//! chain is re-fetched and the whole pipeline re-runs; on failure the prior
//! snapshot and view stay in place and an error notice is queued.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::backend::{ChainBackend, ChainScope, ChooseOriginRequest};
use crate::config::LayoutConfig;
use crate::error::{BackendError, ChainError};
use crate::layout::levels::validate_manual_level;
use crate::layout::viewport::RenderState;
use crate::model::{DocumentId, TreeData};
use crate::{ChainView, build_view};

// ─── Mutations ───────────────────────────────────────────────────────────────

/// What a mutation locks while it is saving.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationTarget {
    Document(DocumentId),
    /// An identified origin that is not a document yet.
    Candidate(String),
}

impl fmt::Display for MutationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationTarget::Document(id) => write!(f, "documento {id}"),
            MutationTarget::Candidate(code) => write!(f, "origem {code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    ChooseOrigin { document: DocumentId, origin: String },
    /// `None` returns the document to automatic levelling.
    SetLevel { document: DocumentId, level: Option<u32> },
    CreateDocument { code: String },
}

impl Mutation {
    pub fn target(&self) -> MutationTarget {
        match self {
            Mutation::ChooseOrigin { document, .. } | Mutation::SetLevel { document, .. } => {
                MutationTarget::Document(*document)
            }
            Mutation::CreateDocument { code } => MutationTarget::Candidate(code.clone()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Mutation::ChooseOrigin { origin, .. } => format!("origem {origin} escolhida"),
            Mutation::SetLevel { level: Some(l), .. } => format!("nível ajustado para {l}"),
            Mutation::SetLevel { level: None, .. } => "nível automático restaurado".to_string(),
            Mutation::CreateDocument { code } => format!("documento {code} criado"),
        }
    }
}

/// A validated mutation whose target is marked as saving.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a ticket keeps its target locked until passed to `finish`"]
pub struct Ticket {
    mutation: Mutation,
}

impl Ticket {
    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveState {
    Idle,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient message for the host UI (toast/banner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub target: String,
    pub message: String,
}

// ─── GraphSession ────────────────────────────────────────────────────────────

pub struct GraphSession<B: ChainBackend> {
    backend: B,
    scope: ChainScope,
    config: LayoutConfig,
    snapshot: TreeData,
    view: ChainView,
    render_state: RenderState,
    pending: HashMap<MutationTarget, Mutation>,
    notices: Vec<Notice>,
}

impl<B: ChainBackend> GraphSession<B> {
    /// Fetch the chain and build its first view, fitted to the viewport.
    pub fn open(backend: B, scope: ChainScope, config: LayoutConfig) -> Result<Self, ChainError> {
        let snapshot = backend.tree_data(&scope)?;
        let view = build_view(&snapshot, &config)?;
        let mut render_state = RenderState::new(&config);
        if let Some(bounds) = view.layout.bounds {
            render_state.fit(&bounds);
        }
        debug!(tis = scope.tis_id, imovel = scope.imovel_id, "session opened");
        Ok(Self {
            backend,
            scope,
            config,
            snapshot,
            view,
            render_state,
            pending: HashMap::new(),
            notices: Vec::new(),
        })
    }

    pub fn view(&self) -> &ChainView {
        &self.view
    }

    pub fn snapshot(&self) -> &TreeData {
        &self.snapshot
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    pub fn render_state_mut(&mut self) -> &mut RenderState {
        &mut self.render_state
    }

    /// Re-fit the view transform to the current layout.
    pub fn fit(&mut self) {
        if let Some(bounds) = self.view.layout.bounds {
            self.render_state.fit(&bounds);
        }
    }

    pub fn state(&self, target: &MutationTarget) -> SaveState {
        if self.pending.contains_key(target) {
            SaveState::Saving
        } else {
            SaveState::Idle
        }
    }

    pub fn is_saving(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ─── Two-phase API ───────────────────────────────────────────────────────

    /// Validate `mutation` against the current snapshot and lock its target.
    pub fn begin(&mut self, mutation: Mutation) -> Result<Ticket, ChainError> {
        let target = mutation.target();
        if self.pending.contains_key(&target) {
            warn!(target = %target, "mutation rejected: previous change still saving");
            return Err(ChainError::ConcurrentMutation {
                target: target.to_string(),
            });
        }
        self.validate(&mutation)?;
        debug!(target = %target, "saving");
        self.pending.insert(target, mutation.clone());
        Ok(Ticket { mutation })
    }

    /// Send the ticket's request to the backend. Does not change session
    /// state; pass the outcome to `finish`.
    pub fn send(&self, ticket: &Ticket) -> Result<(), BackendError> {
        match &ticket.mutation {
            Mutation::ChooseOrigin { document, origin } => {
                self.backend.choose_origin(&ChooseOriginRequest {
                    documento_id: *document,
                    origem_numero: origin.clone(),
                    tis_id: self.scope.tis_id,
                    imovel_id: self.scope.imovel_id,
                })
            }
            Mutation::SetLevel { document, level } => {
                self.backend.set_manual_level(*document, *level)
            }
            Mutation::CreateDocument { code } => self.backend.create_document(code),
        }
    }

    /// Unlock the ticket's target and apply the server's answer.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        outcome: Result<(), BackendError>,
    ) -> Result<&ChainView, ChainError> {
        let target = ticket.mutation.target();
        self.pending.remove(&target);

        let refreshed = outcome.and_then(|()| self.backend.refreshed_chain(&self.scope));
        let snapshot = match refreshed {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(target = %target, error = %err, "mutation failed; keeping previous chain");
                self.notify(NoticeLevel::Error, &target, err.to_string());
                return Err(err.into());
            }
        };
        let view = match build_view(&snapshot, &self.config) {
            Ok(view) => view,
            Err(err) => {
                warn!(target = %target, error = %err, "updated chain could not be rebuilt");
                self.notify(NoticeLevel::Error, &target, err.to_string());
                return Err(err);
            }
        };

        info!(target = %target, "{}", ticket.mutation.describe());
        self.notify(NoticeLevel::Info, &target, ticket.mutation.describe());
        self.snapshot = snapshot;
        self.view = view;
        Ok(&self.view)
    }

    /// `begin`, `send` and `finish` in one step.
    pub fn apply(&mut self, mutation: Mutation) -> Result<&ChainView, ChainError> {
        let ticket = self.begin(mutation)?;
        let outcome = self.send(&ticket);
        self.finish(ticket, outcome)
    }

    // ─── Operations ──────────────────────────────────────────────────────────

    /// Make `origin` the chosen origin of `document` (both display codes).
    pub fn choose_origin(&mut self, document: &str, origin: &str) -> Result<&ChainView, ChainError> {
        let document = self.document_id(document)?;
        self.apply(Mutation::ChooseOrigin {
            document,
            origin: origin.trim().to_string(),
        })
    }

    /// Pin `document` to `level` (0..=10), or return it to automatic with
    /// `None`.
    pub fn set_manual_level(
        &mut self,
        document: &str,
        level: Option<i64>,
    ) -> Result<&ChainView, ChainError> {
        let document = self.document_id(document)?;
        let level = level
            .map(|l| validate_manual_level(document, l))
            .transpose()?;
        self.apply(Mutation::SetLevel { document, level })
    }

    /// Materialise an identified origin that has no document yet.
    pub fn create_origin_document(&mut self, code: &str) -> Result<&ChainView, ChainError> {
        self.apply(Mutation::CreateDocument {
            code: code.trim().to_string(),
        })
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    fn document_id(&self, code: &str) -> Result<DocumentId, ChainError> {
        self.snapshot
            .document_by_code(code.trim())
            .map(|d| d.id)
            .ok_or_else(|| ChainError::UnknownDocument(code.trim().to_string()))
    }

    fn validate(&self, mutation: &Mutation) -> Result<(), ChainError> {
        match mutation {
            Mutation::ChooseOrigin { document, origin } => {
                if self.snapshot.document(*document).is_none() {
                    return Err(ChainError::UnknownDocument(document.to_string()));
                }
                let is_candidate = self
                    .snapshot
                    .conexoes
                    .iter()
                    .filter(|l| l.from == *document)
                    .filter_map(|l| self.snapshot.document(l.to))
                    .any(|d| d.numero == *origin);
                if !is_candidate {
                    return Err(ChainError::UnknownOrigin {
                        document: *document,
                        origin: origin.clone(),
                    });
                }
            }
            Mutation::SetLevel { document, level } => {
                if self.snapshot.document(*document).is_none() {
                    return Err(ChainError::UnknownDocument(document.to_string()));
                }
                if let Some(level) = level {
                    validate_manual_level(*document, i64::from(*level))?;
                }
            }
            Mutation::CreateDocument { code } => {
                let candidate = self
                    .snapshot
                    .origens_identificadas
                    .iter()
                    .find(|c| c.codigo == *code)
                    .ok_or_else(|| ChainError::UnknownDocument(code.clone()))?;
                if candidate.ja_criado || self.snapshot.document_by_code(code).is_some() {
                    return Err(ChainError::DuplicateCode { code: code.clone() });
                }
            }
        }
        Ok(())
    }

    fn notify(&mut self, level: NoticeLevel, target: &MutationTarget, message: String) {
        self.notices.push(Notice {
            level,
            target: target.to_string(),
            message,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_interaction_session.rs"]
mod tests;
