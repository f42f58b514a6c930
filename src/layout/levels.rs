//! Level Assignment: the depth at which each document is drawn.
//!
//! A manual override wins, then a level declared by the server, then the
//! automatic level: the number of chosen-origin hops between a document and
//! the end of its chain. Manual overrides are not propagated to descendants.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::{debug, warn};

use super::graph::ChainGraph;
use crate::error::{ChainError, Diagnostic, MAX_MANUAL_LEVEL};
use crate::model::DocumentId;

/// Where a document's level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSource {
    Manual,
    Declared,
    Automatic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelAssignment {
    pub root: DocumentId,
    pub levels: HashMap<DocumentId, u32>,
    pub sources: HashMap<DocumentId, LevelSource>,
    /// Documents per level, in input order.
    pub groups: BTreeMap<u32, Vec<DocumentId>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LevelAssignment {
    pub fn assign(graph: &ChainGraph) -> Result<Self, ChainError> {
        for doc in graph.nodes() {
            if let Some(level) = doc.nivel_manual {
                validate_manual_level(doc.id, level)?;
            }
        }
        let root = graph.root_candidate().ok_or(ChainError::EmptyGraph)?;
        let automatic = automatic_levels(graph);
        let reachable = reachable_by_chosen(graph, root);

        let mut levels = HashMap::new();
        let mut sources = HashMap::new();
        let mut groups: BTreeMap<u32, Vec<DocumentId>> = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for doc in graph.nodes() {
            let (level, source) = if let Some(manual) = doc.nivel_manual {
                (manual as u32, LevelSource::Manual)
            } else if let Some(declared) = doc.nivel {
                (declared, LevelSource::Declared)
            } else if reachable.contains(&doc.id) || graph.has_links(doc.id) {
                (automatic[&doc.id], LevelSource::Automatic)
            } else {
                warn!(document = %doc.numero, "document has no origin links; placed at level 0");
                diagnostics.push(Diagnostic::Orphan { document: doc.id });
                (0, LevelSource::Automatic)
            };
            levels.insert(doc.id, level);
            sources.insert(doc.id, source);
            groups.entry(level).or_default().push(doc.id);
        }

        debug!(root = %root, levels = groups.len(), "assigned levels");
        Ok(Self {
            root,
            levels,
            sources,
            groups,
            diagnostics,
        })
    }

    pub fn level(&self, id: DocumentId) -> Option<u32> {
        self.levels.get(&id).copied()
    }

    pub fn level_count(&self) -> usize {
        self.groups.keys().next_back().map_or(0, |max| *max as usize + 1)
    }
}

/// Reject a manual level outside 0..=10.
pub fn validate_manual_level(document: DocumentId, level: i64) -> Result<u32, ChainError> {
    if (0..=MAX_MANUAL_LEVEL).contains(&level) {
        Ok(level as u32)
    } else {
        Err(ChainError::InvalidLevel { document, level })
    }
}

/// Hops along chosen origins from each document to the end of its chain.
fn automatic_levels(graph: &ChainGraph) -> HashMap<DocumentId, u32> {
    let mut memo: HashMap<DocumentId, u32> = HashMap::new();
    for doc in graph.nodes() {
        let mut path = Vec::new();
        let mut current = doc.id;
        let base = loop {
            if let Some(&known) = memo.get(&current) {
                break known;
            }
            match graph.chosen_origin(current) {
                Some(origin) => {
                    path.push(current);
                    current = origin;
                }
                None => {
                    memo.insert(current, 0);
                    break 0;
                }
            }
        };
        // The chosen subgraph is acyclic, so the walk always ends.
        for (offset, id) in path.iter().rev().enumerate() {
            memo.insert(*id, base + offset as u32 + 1);
        }
    }
    memo
}

/// Documents whose chosen-origin chain leads back to `root`.
fn reachable_by_chosen(graph: &ChainGraph, root: DocumentId) -> HashSet<DocumentId> {
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for link in graph.edges_to(current) {
            if link.chosen && seen.insert(link.from) {
                queue.push_back(link.from);
            }
        }
    }
    seen
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_levels.rs"]
mod tests;
