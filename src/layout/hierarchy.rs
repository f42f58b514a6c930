//! Hierarchical tree layout.
//!
//! A contour-based tidy tree (Reingold–Tilford style): subtrees are placed
//! bottom-up, each sibling subtree pushed right until it clears its left
//! neighbours at every shared depth, and the parent is centred over its
//! first and last child. Sibling separation widens for large families. A
//! post-pass spreads any same-depth nodes that still sit too close.
//!
//! The resulting (breadth, depth) pairs are projected either onto a
//! rectangular tree or onto concentric rings.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;

use tracing::debug;

use super::graph::ChainGraph;
use super::levels::LevelAssignment;
use super::tree::ChainTree;
use super::types::{Bounds, LayoutNode, LayoutResult};
use super::{AnchorMode, build_connectors};
use crate::config::{LayoutConfig, LayoutMode, Orientation, TreeSpacing};
use crate::model::DocumentId;

/// Per-depth (leftmost, rightmost) extent of a subtree, relative to its root.
type Contour = Vec<(f64, f64)>;

/// Breadth coordinate of every tree node, root at 0.
pub fn breadth_positions(tree: &ChainTree, spacing: &TreeSpacing) -> HashMap<DocumentId, f64> {
    let mut relative: HashMap<DocumentId, f64> = HashMap::new();
    place_subtree(tree, tree.root, spacing, &mut relative);

    let mut absolute: HashMap<DocumentId, f64> = HashMap::with_capacity(tree.len());
    absolute.insert(tree.root, 0.0);
    for node in &tree.nodes {
        let base = absolute.get(&node.id).copied().unwrap_or(0.0);
        for child in &node.children {
            let offset = relative.get(child).copied().unwrap_or(0.0);
            absolute.insert(*child, base + offset);
        }
    }
    absolute
}

fn place_subtree(
    tree: &ChainTree,
    id: DocumentId,
    spacing: &TreeSpacing,
    relative: &mut HashMap<DocumentId, f64>,
) -> Contour {
    let children = tree.children(id);
    if children.is_empty() {
        return vec![(0.0, 0.0)];
    }

    let separation = spacing.sibling_separation(children.len());
    let mut merged: Contour = Vec::new();
    let mut offsets: Vec<f64> = Vec::with_capacity(children.len());

    for child in children {
        let contour = place_subtree(tree, *child, spacing, relative);
        let offset = if merged.is_empty() {
            0.0
        } else {
            merged
                .iter()
                .zip(&contour)
                .map(|((_, right), (left, _))| right + separation - left)
                .fold(f64::NEG_INFINITY, f64::max)
        };
        for (depth, (left, right)) in contour.iter().enumerate() {
            let shifted = (left + offset, right + offset);
            match merged.get_mut(depth) {
                Some(extent) => extent.1 = shifted.1.max(extent.1),
                None => merged.push(shifted),
            }
        }
        offsets.push(offset);
    }

    let first = offsets.first().copied().unwrap_or(0.0);
    let last = offsets.last().copied().unwrap_or(0.0);
    let center = (first + last) / 2.0;
    for (child, offset) in children.iter().zip(&offsets) {
        relative.insert(*child, offset - center);
    }

    let mut contour = vec![(0.0, 0.0)];
    contour.extend(merged.into_iter().map(|(l, r)| (l - center, r - center)));
    contour
}

/// Spread a row of same-depth positions that sit closer than `min_spacing`.
///
/// Positions are sorted; if any neighbouring pair is too close, the whole
/// row is redistributed at exactly `min_spacing`, centred on the original
/// centroid. Returns whether anything moved.
pub fn correct_overlaps(row: &mut [(DocumentId, f64)], min_spacing: f64) -> bool {
    if row.len() < 2 {
        return false;
    }
    row.sort_by(|a, b| a.1.total_cmp(&b.1));
    let crowded = row
        .windows(2)
        .any(|pair| pair[1].1 - pair[0].1 < min_spacing - f64::EPSILON);
    if !crowded {
        return false;
    }
    let centroid = row.iter().map(|(_, x)| x).sum::<f64>() / row.len() as f64;
    let half_span = (row.len() - 1) as f64 * min_spacing / 2.0;
    for (i, entry) in row.iter_mut().enumerate() {
        entry.1 = centroid - half_span + i as f64 * min_spacing;
    }
    true
}

/// Lay out the tree hierarchically, as a rectangular tree or radially
/// depending on `config.mode`.
pub fn layout_hierarchy(
    graph: &ChainGraph,
    levels: &LevelAssignment,
    tree: &ChainTree,
    config: &LayoutConfig,
) -> LayoutResult {
    let spacing = &config.tree;
    let mut breadth = breadth_positions(tree, spacing);

    let mut by_depth: BTreeMap<u32, Vec<(DocumentId, f64)>> = BTreeMap::new();
    for node in &tree.nodes {
        let x = breadth.get(&node.id).copied().unwrap_or(0.0);
        by_depth.entry(node.depth).or_default().push((node.id, x));
    }
    for (depth, row) in by_depth.iter_mut() {
        if correct_overlaps(row, spacing.min_spacing) {
            debug!(depth = *depth, nodes = row.len(), "spread crowded tree row");
        }
        for (id, x) in row.iter() {
            breadth.insert(*id, *x);
        }
    }

    let radial = config.mode == LayoutMode::Radial;
    let (mode, anchors) = if radial {
        (LayoutMode::Radial, AnchorMode::Centers)
    } else {
        (LayoutMode::Tree, AnchorMode::Edges(config.orientation))
    };
    let mut result = LayoutResult::new(mode, config.orientation);

    let (min_b, max_b) = breadth
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(*x), hi.max(*x))
        });
    let ring_span = (max_b - min_b) + spacing.separation_unit;

    for node in &tree.nodes {
        let Some(doc) = graph.document(node.id) else {
            continue;
        };
        let b = breadth.get(&node.id).copied().unwrap_or(0.0);
        let d = node.depth as f64 * spacing.level_gap;
        let (cx, cy) = if radial {
            if node.depth == 0 || ring_span <= f64::EPSILON {
                (0.0, 0.0)
            } else {
                let angle = (b - min_b) / ring_span * TAU;
                (d * angle.cos(), d * angle.sin())
            }
        } else {
            match config.orientation {
                Orientation::Vertical => (b, d),
                Orientation::Horizontal => (d, b),
            }
        };
        result.nodes.push(LayoutNode {
            id: doc.id,
            code: doc.numero.clone(),
            kind: doc.tipo,
            level: levels.level(doc.id).unwrap_or(node.depth),
            x: cx - spacing.card_width / 2.0,
            y: cy - spacing.card_height / 2.0,
            width: spacing.card_width,
            height: spacing.card_height,
            recordings: doc.total_lancamentos,
            shared: doc.is_compartilhado,
        });
    }

    // Shift so the top-left card sits at the margins.
    if let Some(bounds) = Bounds::of_nodes(&result.nodes) {
        let dx = config.left_margin - bounds.min_x;
        let dy = config.top_margin - bounds.min_y;
        for node in &mut result.nodes {
            node.x += dx;
            node.y += dy;
        }
    }

    let index: HashMap<DocumentId, usize> = result
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id, i))
        .collect();
    result.connectors = build_connectors(&result.nodes, &index, tree, anchors);
    result.bounds = Bounds::of_nodes(&result.nodes);
    result
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_hierarchy.rs"]
mod tests;
