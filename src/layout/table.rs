//! Tabular view of the chain: one row per document reachable from the root.

use serde::Serialize;

use super::graph::ChainGraph;
use super::levels::LevelAssignment;
use super::tree::ChainTree;
use crate::model::{ChainEnd, DocumentId, DocumentKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainRow {
    pub id: DocumentId,
    pub code: String,
    pub kind: DocumentKind,
    pub level: u32,
    pub recordings: u32,
    pub chosen_origin: Option<String>,
    /// Every origin the document references, in input order.
    pub origins: Vec<String>,
    pub shared: bool,
    /// Set only for documents without origins.
    pub chain_end: Option<ChainEnd>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainTable {
    pub rows: Vec<ChainRow>,
}

impl ChainTable {
    /// Rows in tree preorder.
    pub fn build(graph: &ChainGraph, levels: &LevelAssignment, tree: &ChainTree) -> Self {
        let rows = tree
            .preorder()
            .into_iter()
            .filter_map(|id| {
                let doc = graph.document(id)?;
                let origins: Vec<String> = graph
                    .candidate_origins(id)
                    .into_iter()
                    .map(|o| o.numero.clone())
                    .collect();
                let chosen_origin = graph
                    .chosen_origin(id)
                    .and_then(|o| graph.document(o))
                    .map(|o| o.numero.clone());
                let chain_end = if origins.is_empty() {
                    Some(doc.fim_cadeia.unwrap_or(ChainEnd::SemOrigem))
                } else {
                    None
                };
                Some(ChainRow {
                    id,
                    code: doc.numero.clone(),
                    kind: doc.tipo,
                    level: levels.level(id).unwrap_or(0),
                    recordings: doc.total_lancamentos,
                    chosen_origin,
                    origins,
                    shared: doc.is_compartilhado,
                    chain_end,
                })
            })
            .collect();
        Self { rows }
    }

    pub fn row(&self, code: &str) -> Option<&ChainRow> {
        self.rows.iter().find(|r| r.code == code)
    }
}
