//! Layout engine — Graph Model → Level Assignment → Tree Reducer → positions.

pub mod graph;
pub mod hierarchy;
pub mod levels;
pub mod rows;
pub mod table;
pub mod tree;
pub mod types;
pub mod viewport;

use std::collections::HashMap;

pub use graph::{ChainGraph, ChainLink};
pub use levels::{LevelAssignment, LevelSource};
pub use table::{ChainRow, ChainTable};
pub use tree::{ChainTree, TreeNode};
pub use types::{Bounds, Connector, ConnectorStyle, LayoutNode, LayoutResult, Point};
pub use viewport::{RenderState, Transform, fit_to_viewport};

use crate::config::{LayoutConfig, LayoutMode, Orientation};
use crate::model::DocumentId;

/// Where connectors attach to cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorMode {
    /// Facing edge midpoints (bottom→top or right→left).
    Edges(Orientation),
    /// Card centres, for radial layouts.
    Centers,
}

/// Run the layout engine selected by `config.mode`.
pub fn full_layout(
    graph: &ChainGraph,
    levels: &LevelAssignment,
    tree: &ChainTree,
    config: &LayoutConfig,
) -> LayoutResult {
    match config.mode {
        LayoutMode::Rows => rows::layout_rows(graph, levels, tree, config),
        LayoutMode::Tree | LayoutMode::Radial => {
            hierarchy::layout_hierarchy(graph, levels, tree, config)
        }
    }
}

/// Solid connectors for tree edges, dashed ones for auxiliary links.
pub(crate) fn build_connectors(
    nodes: &[LayoutNode],
    index: &HashMap<DocumentId, usize>,
    tree: &ChainTree,
    anchors: AnchorMode,
) -> Vec<Connector> {
    let segment = |parent: DocumentId, child: DocumentId, style: ConnectorStyle| {
        let p = &nodes[*index.get(&parent)?];
        let c = &nodes[*index.get(&child)?];
        let (start, end) = match anchors {
            AnchorMode::Edges(orientation) => (
                p.outgoing_anchor(orientation),
                c.incoming_anchor(orientation),
            ),
            AnchorMode::Centers => (p.center(), c.center()),
        };
        Some(Connector::between(parent, child, start, end, style))
    };

    let solid = tree
        .tree_edges()
        .into_iter()
        .filter_map(|(parent, child)| segment(parent, child, ConnectorStyle::Solid));
    let dashed = tree
        .auxiliary
        .iter()
        .filter_map(|link| segment(link.to, link.from, ConnectorStyle::Dashed));
    solid.chain(dashed).collect()
}
