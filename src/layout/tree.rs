//! Tree Reducer: turns the multi-origin link graph into a rooted tree.
//!
//! Breadth-first from the root, a document's tree children are the documents
//! that originate from it. A document reached a second time is not
//! duplicated: the link is kept as an auxiliary connection instead. Documents
//! the traversal never reaches are reported and left out of the tree.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::{debug, warn};

use super::graph::{ChainGraph, ChainLink};
use crate::error::{ChainError, Diagnostic};
use crate::model::DocumentId;
use crate::parsers::code::{sibling_order, sort_number};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub id: DocumentId,
    pub parent: Option<DocumentId>,
    /// Sorted: matrículas first, then number descending.
    pub children: Vec<DocumentId>,
    /// Breadth-first distance from the root.
    pub depth: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainTree {
    pub root: DocumentId,
    /// Tree nodes in breadth-first visit order.
    pub nodes: Vec<TreeNode>,
    /// Links between tree documents that are not tree edges (drawn dashed).
    pub auxiliary: Vec<ChainLink>,
    /// Links touching at least one unreachable document.
    pub detached: Vec<ChainLink>,
    pub unreachable: Vec<DocumentId>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    position: HashMap<DocumentId, usize>,
}

impl ChainTree {
    pub fn reduce(graph: &ChainGraph, root: DocumentId) -> Result<Self, ChainError> {
        if !graph.contains(root) {
            return Err(ChainError::UnknownDocument(root.to_string()));
        }

        let mut visited: HashSet<DocumentId> = HashSet::from([root]);
        let mut queue: VecDeque<(DocumentId, u32)> = VecDeque::from([(root, 0)]);
        let mut nodes: Vec<TreeNode> = Vec::new();
        let mut parent_of: HashMap<DocumentId, DocumentId> = HashMap::new();
        let mut unparsable: Vec<String> = Vec::new();

        while let Some((current, depth)) = queue.pop_front() {
            let mut children: Vec<DocumentId> = Vec::new();
            for link in graph.edges_to(current) {
                if visited.insert(link.from) {
                    children.push(link.from);
                    parent_of.insert(link.from, current);
                }
            }
            children.sort_by(|a, b| match (graph.document(*a), graph.document(*b)) {
                (Some(da), Some(db)) => sibling_order(da, db),
                _ => std::cmp::Ordering::Equal,
            });
            for child in &children {
                if let Some(doc) = graph.document(*child) {
                    if sort_number(&doc.numero).is_none() && !unparsable.contains(&doc.numero) {
                        unparsable.push(doc.numero.clone());
                    }
                }
                queue.push_back((*child, depth + 1));
            }
            nodes.push(TreeNode {
                id: current,
                parent: parent_of.get(&current).copied(),
                children,
                depth,
            });
        }

        let mut tree_edge_pending: HashSet<DocumentId> = parent_of.keys().copied().collect();
        let mut auxiliary = Vec::new();
        let mut detached = Vec::new();
        for link in graph.links() {
            if !(visited.contains(&link.from) && visited.contains(&link.to)) {
                detached.push(*link);
            } else if parent_of.get(&link.from) == Some(&link.to)
                && tree_edge_pending.remove(&link.from)
            {
                continue;
            } else {
                auxiliary.push(*link);
            }
        }

        let unreachable: Vec<DocumentId> = graph
            .nodes()
            .map(|d| d.id)
            .filter(|id| !visited.contains(id))
            .collect();

        let mut diagnostics = Vec::new();
        for id in &unreachable {
            let code = graph.document(*id).map_or_else(String::new, |d| d.numero.clone());
            warn!(document = %code, "document is not reachable from the chain root");
            diagnostics.push(Diagnostic::Unreachable { document: *id });
        }
        for code in unparsable {
            warn!(code = %code, "document code has no number; sorted as 0");
            diagnostics.push(Diagnostic::UnparsableCode { code });
        }

        let position = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        debug!(
            nodes = nodes.len(),
            auxiliary = auxiliary.len(),
            unreachable = unreachable.len(),
            "reduced chain to tree"
        );
        Ok(Self {
            root,
            nodes,
            auxiliary,
            detached,
            unreachable,
            diagnostics,
            position,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.position.contains_key(&id)
    }

    pub fn node(&self, id: DocumentId) -> Option<&TreeNode> {
        self.position.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn children(&self, id: DocumentId) -> &[DocumentId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent(&self, id: DocumentId) -> Option<DocumentId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Tree edges as (parent, child) pairs, breadth-first.
    pub fn tree_edges(&self) -> Vec<(DocumentId, DocumentId)> {
        self.nodes
            .iter()
            .flat_map(|n| n.children.iter().map(move |c| (n.id, *c)))
            .collect()
    }

    /// Depth-first preorder following the sorted children.
    pub fn preorder(&self) -> Vec<DocumentId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_tree.rs"]
mod tests;
