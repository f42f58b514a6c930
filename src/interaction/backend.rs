//! The remote collaborator the interaction layer persists mutations through.
//!
//! `ChainBackend` mirrors the server endpoints (`tree-data`,
//! `escolher-origem`, `ajustar-nivel`, `cadeia-atualizada`,
//! `criar-documento`). `MemoryBackend` keeps a snapshot in memory and applies
//! the same state changes the server does; the CLI and the tests use it.

use std::cell::RefCell;

use serde::Serialize;
use tracing::debug;

use crate::error::BackendError;
use crate::model::{Document, DocumentId, OriginLink, TreeData};

/// The property chain a session works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChainScope {
    pub tis_id: i64,
    pub imovel_id: i64,
}

impl ChainScope {
    pub fn new(tis_id: i64, imovel_id: i64) -> Self {
        Self { tis_id, imovel_id }
    }
}

/// Body of an `escolher-origem` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChooseOriginRequest {
    pub documento_id: DocumentId,
    pub origem_numero: String,
    pub tis_id: i64,
    pub imovel_id: i64,
}

pub trait ChainBackend {
    /// Full snapshot of the chain.
    fn tree_data(&self, scope: &ChainScope) -> Result<TreeData, BackendError>;

    /// Persist `origem_numero` as the chosen origin of `documento_id`.
    fn choose_origin(&self, request: &ChooseOriginRequest) -> Result<(), BackendError>;

    /// Pin a level, or clear it back to automatic with `None`.
    fn set_manual_level(
        &self,
        document: DocumentId,
        nivel_manual: Option<u32>,
    ) -> Result<(), BackendError>;

    /// Materialise an identified origin into a real document.
    fn create_document(&self, codigo: &str) -> Result<(), BackendError>;

    /// Snapshot re-fetched after a mutation.
    fn refreshed_chain(&self, scope: &ChainScope) -> Result<TreeData, BackendError> {
        self.tree_data(scope)
    }
}

// ─── MemoryBackend ───────────────────────────────────────────────────────────

/// In-memory backend holding a single chain snapshot.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RefCell<TreeData>,
    failure: RefCell<Option<BackendError>>,
}

impl MemoryBackend {
    pub fn new(data: TreeData) -> Self {
        Self {
            data: RefCell::new(data),
            failure: RefCell::new(None),
        }
    }

    /// Make the next mutation fail with `error` without touching the data.
    pub fn fail_next(&self, error: BackendError) {
        *self.failure.borrow_mut() = Some(error);
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> TreeData {
        self.data.borrow().clone()
    }

    pub fn into_inner(self) -> TreeData {
        self.data.into_inner()
    }

    fn injected_failure(&self) -> Result<(), BackendError> {
        match self.failure.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ChainBackend for MemoryBackend {
    fn tree_data(&self, _scope: &ChainScope) -> Result<TreeData, BackendError> {
        Ok(self.snapshot())
    }

    fn choose_origin(&self, request: &ChooseOriginRequest) -> Result<(), BackendError> {
        self.injected_failure()?;
        let mut data = self.data.borrow_mut();
        let origin = data
            .document_by_code(&request.origem_numero)
            .map(|d| d.id)
            .ok_or_else(|| {
                BackendError::Rejected(format!(
                    "origem {} não encontrada",
                    request.origem_numero
                ))
            })?;
        let document = request.documento_id;
        if !data
            .conexoes
            .iter()
            .any(|l| l.from == document && l.to == origin)
        {
            return Err(BackendError::Rejected(format!(
                "{} não é origem do documento {document}",
                request.origem_numero
            )));
        }
        for link in data.conexoes.iter_mut().filter(|l| l.from == document) {
            link.escolhida = Some(link.to == origin);
        }
        debug!(document = %document, origin = %request.origem_numero, "origin chosen");
        Ok(())
    }

    fn set_manual_level(
        &self,
        document: DocumentId,
        nivel_manual: Option<u32>,
    ) -> Result<(), BackendError> {
        self.injected_failure()?;
        let mut data = self.data.borrow_mut();
        let doc = data
            .document_mut(document)
            .ok_or_else(|| BackendError::Rejected(format!("documento {document} não encontrado")))?;
        doc.nivel_manual = nivel_manual.map(i64::from);
        Ok(())
    }

    fn create_document(&self, codigo: &str) -> Result<(), BackendError> {
        self.injected_failure()?;
        let mut data = self.data.borrow_mut();
        let next_id = DocumentId(data.documentos.iter().map(|d| d.id.0).max().unwrap_or(0) + 1);
        let candidate = data
            .origens_identificadas
            .iter_mut()
            .find(|c| c.codigo == codigo)
            .ok_or_else(|| BackendError::Rejected(format!("origem {codigo} não identificada")))?;
        if candidate.ja_criado {
            return Err(BackendError::Rejected(format!("documento {codigo} já existe")));
        }
        candidate.ja_criado = true;
        candidate.documento_id = Some(next_id);
        let referenced_by = candidate.referenciado_por;

        let mut doc = Document::from_code(next_id.0, codigo);
        doc.cartorio = referenced_by
            .and_then(|r| data.document(r))
            .and_then(|r| r.cartorio.clone());
        data.documentos.push(doc);
        if let Some(from) = referenced_by {
            data.conexoes.push(OriginLink {
                from,
                to: next_id,
                escolhida: None,
            });
        }
        debug!(code = codigo, id = %next_id, "origin document created");
        Ok(())
    }
}
