//! Layout types: Point, LayoutNode, Connector, Bounds, LayoutResult.

use serde::Serialize;

use crate::config::{LayoutMode, Orientation};
use crate::model::{DocumentId, DocumentKind};

// ─── Point ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

// ─── LayoutNode ──────────────────────────────────────────────────────────────

/// A document card with its computed position. `x`/`y` is the top-left
/// corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: DocumentId,
    pub code: String,
    pub kind: DocumentKind,
    pub level: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub recordings: u32,
    pub shared: bool,
}

impl LayoutNode {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Midpoint of the edge facing the next level.
    pub fn outgoing_anchor(&self, orientation: Orientation) -> Point {
        match orientation {
            Orientation::Vertical => Point::new(self.x + self.width / 2.0, self.y + self.height),
            Orientation::Horizontal => Point::new(self.x + self.width, self.y + self.height / 2.0),
        }
    }

    /// Midpoint of the edge facing the previous level.
    pub fn incoming_anchor(&self, orientation: Orientation) -> Point {
        match orientation {
            Orientation::Vertical => Point::new(self.x + self.width / 2.0, self.y),
            Orientation::Horizontal => Point::new(self.x, self.y + self.height / 2.0),
        }
    }
}

// ─── Connector ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStyle {
    /// Tree edge.
    Solid,
    /// Auxiliary link to a document already placed elsewhere in the tree.
    Dashed,
}

/// Straight segment between a parent card and a child card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    /// Origin document.
    pub parent: DocumentId,
    /// Document derived from `parent`.
    pub child: DocumentId,
    pub start: Point,
    pub end: Point,
    pub length: f64,
    /// Angle of the segment in degrees, measured from the positive x axis.
    pub angle: f64,
    pub style: ConnectorStyle,
}

impl Connector {
    pub fn between(
        parent: DocumentId,
        child: DocumentId,
        start: Point,
        end: Point,
        style: ConnectorStyle,
    ) -> Self {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        Self {
            parent,
            child,
            start,
            end,
            length: dx.hypot(dy),
            angle: dy.atan2(dx).to_degrees(),
            style,
        }
    }
}

// ─── Bounds ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Smallest box containing every card, or `None` for no cards.
    pub fn of_nodes(nodes: &[LayoutNode]) -> Option<Self> {
        let first = nodes.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x + first.width,
            max_y: first.y + first.height,
        };
        Some(nodes.iter().skip(1).fold(init, |b, n| Bounds {
            min_x: b.min_x.min(n.x),
            min_y: b.min_y.min(n.y),
            max_x: b.max_x.max(n.x + n.width),
            max_y: b.max_y.max(n.y + n.height),
        }))
    }
}

// ─── LayoutResult ────────────────────────────────────────────────────────────

/// The full output of the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub mode: LayoutMode,
    pub orientation: Orientation,
    pub nodes: Vec<LayoutNode>,
    pub connectors: Vec<Connector>,
    pub bounds: Option<Bounds>,
}

impl LayoutResult {
    pub fn new(mode: LayoutMode, orientation: Orientation) -> Self {
        Self {
            mode,
            orientation,
            nodes: Vec::new(),
            connectors: Vec::new(),
            bounds: None,
        }
    }

    pub fn node(&self, id: DocumentId) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_types.rs"]
mod tests;
