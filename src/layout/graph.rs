//! ChainGraph, the Graph Model. Documents and every origin link, backed by
//! a petgraph DiGraph.
//!
//! Edges keep the payload direction: `from` (the derived document) points at
//! `to` (its origin). All links are stored, not only chosen ones; each
//! document has at most one chosen outgoing link.

use std::collections::{HashMap, HashSet};

use petgraph::Direction as PetDirection;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::debug;

use crate::error::ChainError;
use crate::model::{Document, DocumentId, DocumentKind, OriginLink, TreeData};

/// Edge data stored in the petgraph DiGraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkData {
    pub chosen: bool,
    /// Position in the payload, used to keep input order stable.
    pub order: usize,
}

/// A resolved origin link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChainLink {
    pub from: DocumentId,
    pub to: DocumentId,
    pub chosen: bool,
}

/// Graph Model over one chain snapshot.
pub struct ChainGraph {
    pub digraph: DiGraph<Document, LinkData>,
    /// Maps document id → petgraph NodeIndex.
    pub node_index: HashMap<DocumentId, NodeIndex>,
    links: Vec<ChainLink>,
}

impl ChainGraph {
    /// Build the graph from a payload, validating ids, codes and the chosen
    /// subgraph.
    pub fn from_tree_data(data: &TreeData) -> Result<Self, ChainError> {
        if data.documentos.is_empty() {
            return Err(ChainError::EmptyGraph);
        }

        let mut digraph: DiGraph<Document, LinkData> = DiGraph::new();
        let mut node_index: HashMap<DocumentId, NodeIndex> = HashMap::new();
        let mut seen_codes: HashSet<(Option<&str>, &str)> = HashSet::new();

        for doc in &data.documentos {
            if node_index.contains_key(&doc.id) {
                return Err(ChainError::DuplicateId { id: doc.id });
            }
            if !seen_codes.insert((doc.cartorio.as_deref(), doc.numero.as_str())) {
                return Err(ChainError::DuplicateCode {
                    code: doc.numero.clone(),
                });
            }
            let idx = digraph.add_node(doc.clone());
            node_index.insert(doc.id, idx);
        }

        let chosen_flags = resolve_chosen(&data.conexoes);
        let mut links = Vec::with_capacity(data.conexoes.len());
        for (order, (link, chosen)) in data.conexoes.iter().zip(chosen_flags).enumerate() {
            let lookup = |id: DocumentId| {
                node_index
                    .get(&id)
                    .copied()
                    .ok_or(ChainError::MissingNode {
                        from: link.from,
                        to: link.to,
                        missing: id,
                    })
            };
            let from_idx = lookup(link.from)?;
            let to_idx = lookup(link.to)?;
            digraph.add_edge(from_idx, to_idx, LinkData { chosen, order });
            links.push(ChainLink {
                from: link.from,
                to: link.to,
                chosen,
            });
        }

        let graph = Self {
            digraph,
            node_index,
            links,
        };
        graph.check_chosen_acyclic()?;
        debug!(
            documents = graph.node_count(),
            links = graph.edge_count(),
            "built chain graph"
        );
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.digraph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.digraph.edge_count()
    }

    /// Documents in input order.
    pub fn nodes(&self) -> impl Iterator<Item = &Document> {
        self.digraph.node_indices().map(move |idx| &self.digraph[idx])
    }

    /// All links in input order.
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.node_index.get(&id).map(|&idx| &self.digraph[idx])
    }

    pub fn document_by_code(&self, code: &str) -> Option<&Document> {
        self.nodes().find(|d| d.numero == code)
    }

    /// Links where `id` is the derived document, in input order.
    pub fn edges_from(&self, id: DocumentId) -> Vec<ChainLink> {
        self.directed_links(id, PetDirection::Outgoing)
    }

    /// Links where `id` is the origin, in input order.
    pub fn edges_to(&self, id: DocumentId) -> Vec<ChainLink> {
        self.directed_links(id, PetDirection::Incoming)
    }

    /// The chosen origin of a document, if it has one.
    pub fn chosen_origin(&self, id: DocumentId) -> Option<DocumentId> {
        self.edges_from(id)
            .into_iter()
            .find(|link| link.chosen)
            .map(|link| link.to)
    }

    /// Every origin a document references, chosen or not.
    pub fn candidate_origins(&self, id: DocumentId) -> Vec<&Document> {
        self.edges_from(id)
            .into_iter()
            .filter_map(|link| self.document(link.to))
            .collect()
    }

    /// Whether a document takes part in any link.
    pub fn has_links(&self, id: DocumentId) -> bool {
        match self.node_index.get(&id) {
            None => false,
            Some(&idx) => self
                .digraph
                .edges_directed(idx, PetDirection::Outgoing)
                .chain(self.digraph.edges_directed(idx, PetDirection::Incoming))
                .next()
                .is_some(),
        }
    }

    /// Pick the document the tree grows from.
    ///
    /// Candidates, in order of preference: documents without a chosen origin,
    /// documents pinned or declared at level 0, then every document. Within
    /// the first non-empty group, documents that take part in a link are
    /// preferred over isolated ones; then a matrícula wins, else the first in
    /// input order.
    pub fn root_candidate(&self) -> Option<DocumentId> {
        let pinned_level = |d: &Document| d.nivel_manual.or(d.nivel.map(i64::from));
        let no_origin: Vec<&Document> = self
            .nodes()
            .filter(|d| self.chosen_origin(d.id).is_none())
            .collect();
        let level_zero: Vec<&Document> =
            self.nodes().filter(|d| pinned_level(d) == Some(0)).collect();
        let all: Vec<&Document> = self.nodes().collect();

        [no_origin, level_zero, all]
            .into_iter()
            .find(|group| !group.is_empty())
            .and_then(|group| {
                let linked: Vec<&Document> = group
                    .iter()
                    .copied()
                    .filter(|d| self.has_links(d.id))
                    .collect();
                let group = if linked.is_empty() { group } else { linked };
                group
                    .iter()
                    .find(|d| d.tipo == DocumentKind::Matricula)
                    .or_else(|| group.first())
                    .map(|d| d.id)
            })
    }

    fn directed_links(&self, id: DocumentId, dir: PetDirection) -> Vec<ChainLink> {
        let Some(&idx) = self.node_index.get(&id) else {
            return Vec::new();
        };
        let mut edges: Vec<(usize, ChainLink)> = self
            .digraph
            .edges_directed(idx, dir)
            .map(|e| {
                let data = *e.weight();
                let link = ChainLink {
                    from: self.digraph[e.source()].id,
                    to: self.digraph[e.target()].id,
                    chosen: data.chosen,
                };
                (data.order, link)
            })
            .collect();
        edges.sort_by_key(|(order, _)| *order);
        edges.into_iter().map(|(_, link)| link).collect()
    }

    fn check_chosen_acyclic(&self) -> Result<(), ChainError> {
        let mut chosen: DiGraph<DocumentId, ()> = DiGraph::new();
        let mut index: HashMap<DocumentId, NodeIndex> = HashMap::new();
        for doc in self.nodes() {
            index.insert(doc.id, chosen.add_node(doc.id));
        }
        for link in self.links.iter().filter(|l| l.chosen) {
            chosen.add_edge(index[&link.from], index[&link.to], ());
        }
        toposort(&chosen, None)
            .map(|_| ())
            .map_err(|cycle| ChainError::CycleDetected {
                document: chosen[cycle.node_id()],
            })
    }
}

/// Decide which link of each derived document is its chosen origin: the
/// first flagged `true`, else the first not flagged `false`.
fn resolve_chosen(links: &[OriginLink]) -> Vec<bool> {
    let mut chosen = vec![false; links.len()];
    let mut decided: HashSet<DocumentId> = HashSet::new();

    for (i, link) in links.iter().enumerate() {
        if link.escolhida == Some(true) && decided.insert(link.from) {
            chosen[i] = true;
        }
    }
    for (i, link) in links.iter().enumerate() {
        if link.escolhida.is_none() && decided.insert(link.from) {
            chosen[i] = true;
        }
    }
    chosen
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_graph.rs"]
mod tests;
