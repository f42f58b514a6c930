//! Domain types for a title chain snapshot.
//!
//! These types mirror the `tree-data` payload: documents (matrículas and
//! transcrições), origin links between them, and origin references found in
//! recordings that may not have materialised into documents yet.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── DocumentId ──────────────────────────────────────────────────────────────

/// Server-side primary key of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── DocumentKind ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Matricula,
    Transcricao,
}

impl DocumentKind {
    /// Sibling sort rank: matrículas come before transcrições.
    pub fn rank(self) -> u8 {
        match self {
            DocumentKind::Matricula => 0,
            DocumentKind::Transcricao => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Matricula => "matrícula",
            DocumentKind::Transcricao => "transcrição",
        }
    }
}

// ─── ChainEnd ────────────────────────────────────────────────────────────────

/// Classification of a document that terminates the chain (fim de cadeia).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainEnd {
    /// Legitimate origin (origem lídima): the chain reaches a valid source.
    OrigemLidima,
    SemOrigem,
    Inconclusa,
}

impl ChainEnd {
    pub fn label(self) -> &'static str {
        match self {
            ChainEnd::OrigemLidima => "origem lídima",
            ChainEnd::SemOrigem => "sem origem",
            ChainEnd::Inconclusa => "inconclusa",
        }
    }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A registration document: one node of the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Display code, e.g. "M123" or "T45".
    pub numero: String,
    #[serde(default)]
    pub tipo: DocumentKind,
    #[serde(default, alias = "lancamentos_count")]
    pub total_lancamentos: u32,
    /// Level declared by the server, when it already grouped the chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nivel: Option<u32>,
    /// User-pinned level. Kept signed so out-of-range values reach validation
    /// instead of failing deserialisation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nivel_manual: Option<i64>,
    #[serde(default)]
    pub is_compartilhado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cartorio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fim_cadeia: Option<ChainEnd>,
}

impl Document {
    pub fn new(id: i64, numero: impl Into<String>, tipo: DocumentKind) -> Self {
        Self {
            id: DocumentId(id),
            numero: numero.into(),
            tipo,
            total_lancamentos: 0,
            nivel: None,
            nivel_manual: None,
            is_compartilhado: false,
            cartorio: None,
            fim_cadeia: None,
        }
    }

    /// Build a document whose kind is inferred from the code prefix
    /// ("T…" is a transcrição, anything else a matrícula).
    pub fn from_code(id: i64, numero: impl Into<String>) -> Self {
        let numero = numero.into();
        let tipo = if numero.trim_start().starts_with(['T', 't']) {
            DocumentKind::Transcricao
        } else {
            DocumentKind::Matricula
        };
        Self::new(id, numero, tipo)
    }
}

// ─── OriginLink ──────────────────────────────────────────────────────────────

/// Directed origin edge: `from` originates from `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginLink {
    pub from: DocumentId,
    pub to: DocumentId,
    /// `Some(true)` marks the chosen origin among several candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escolhida: Option<bool>,
}

impl OriginLink {
    pub fn new(from: i64, to: i64) -> Self {
        Self {
            from: DocumentId(from),
            to: DocumentId(to),
            escolhida: None,
        }
    }

    pub fn chosen(from: i64, to: i64, chosen: bool) -> Self {
        Self {
            escolhida: Some(chosen),
            ..Self::new(from, to)
        }
    }
}

// ─── OriginCandidate ─────────────────────────────────────────────────────────

/// An origin reference identified in a recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginCandidate {
    pub codigo: String,
    /// Whether the referenced document already exists.
    #[serde(default)]
    pub ja_criado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documento_id: Option<DocumentId>,
    /// Document whose recording mentions this origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenciado_por: Option<DocumentId>,
}

// ─── TreeData ────────────────────────────────────────────────────────────────

/// Authoritative snapshot returned by the `tree-data` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeData {
    #[serde(default)]
    pub documentos: Vec<Document>,
    #[serde(default)]
    pub conexoes: Vec<OriginLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub origens_identificadas: Vec<OriginCandidate>,
}

impl TreeData {
    pub fn new(documentos: Vec<Document>, conexoes: Vec<OriginLink>) -> Self {
        Self {
            documentos,
            conexoes,
            origens_identificadas: Vec::new(),
        }
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documentos.iter().find(|d| d.id == id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documentos.iter_mut().find(|d| d.id == id)
    }

    pub fn document_by_code(&self, code: &str) -> Option<&Document> {
        self.documentos.iter().find(|d| d.numero == code)
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_model_types.rs"]
mod tests;
