//! Levels-as-rows layout.
//!
//! Each level is a row at a fixed distance from the previous one. The cards
//! of a row are centred as a group, and their size and gap come from the
//! density tier matching how many cards share the row.

use std::collections::{BTreeMap, HashMap};

use super::graph::ChainGraph;
use super::levels::LevelAssignment;
use super::tree::ChainTree;
use super::types::{Bounds, LayoutNode, LayoutResult};
use super::{AnchorMode, build_connectors};
use crate::config::{LayoutConfig, LayoutMode, Orientation};
use crate::model::DocumentId;

/// Lay out the tree's documents one level per row.
///
/// Within a row, cards follow the tree's preorder so siblings stay
/// adjacent and keep their sort order.
pub fn layout_rows(
    graph: &ChainGraph,
    levels: &LevelAssignment,
    tree: &ChainTree,
    config: &LayoutConfig,
) -> LayoutResult {
    let mut result = LayoutResult::new(LayoutMode::Rows, config.orientation);

    let mut rows: BTreeMap<u32, Vec<DocumentId>> = BTreeMap::new();
    for id in tree.preorder() {
        let level = levels.level(id).unwrap_or(0);
        rows.entry(level).or_default().push(id);
    }

    for (level, ids) in &rows {
        let tier = config.tiers.tier_for(ids.len());
        let count = ids.len() as f64;
        let span = count * tier.card_width + (count - 1.0).max(0.0) * tier.gap;
        let start = ((config.canvas_width - span) / 2.0).max(0.0);
        let depth = *level as f64 * config.level_height;

        for (i, id) in ids.iter().enumerate() {
            let Some(doc) = graph.document(*id) else {
                continue;
            };
            let along = start + i as f64 * (tier.card_width + tier.gap);
            let (x, y) = match config.orientation {
                Orientation::Vertical => (config.left_margin + along, config.top_margin + depth),
                Orientation::Horizontal => (config.left_margin + depth, config.top_margin + along),
            };
            result.nodes.push(LayoutNode {
                id: doc.id,
                code: doc.numero.clone(),
                kind: doc.tipo,
                level: *level,
                x,
                y,
                width: tier.card_width,
                height: tier.card_height,
                recordings: doc.total_lancamentos,
                shared: doc.is_compartilhado,
            });
        }
    }

    let index: HashMap<DocumentId, usize> = result
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id, i))
        .collect();
    result.connectors = build_connectors(
        &result.nodes,
        &index,
        tree,
        AnchorMode::Edges(config.orientation),
    );
    result.bounds = Bounds::of_nodes(&result.nodes);
    result
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_rows.rs"]
mod tests;
