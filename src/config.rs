//! Configuration for the layout pipeline.
//!
//! Every field has a default; a JSON file may override any subset of them.

use serde::{Deserialize, Serialize};

/// Which layout engine positions the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Levels as rows (or columns), cards centred per level.
    #[default]
    Rows,
    /// Hierarchical tidy tree.
    Tree,
    /// Hierarchical tree projected onto concentric rings.
    Radial,
}

/// Axis along which levels advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Levels stack top to bottom; connectors leave the bottom of a card.
    #[default]
    Vertical,
    /// Levels run left to right; connectors leave the right edge of a card.
    Horizontal,
}

/// Card size and gap for one density tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingTier {
    pub card_width: f64,
    pub card_height: f64,
    pub gap: f64,
}

/// Density tiers chosen by how many nodes share a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPolicy {
    /// Up to this many nodes use `wide`.
    pub wide_max: usize,
    /// Up to this many nodes use `medium`; more use `narrow`.
    pub medium_max: usize,
    pub wide: SpacingTier,
    pub medium: SpacingTier,
    pub narrow: SpacingTier,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            wide_max: 3,
            medium_max: 6,
            wide: SpacingTier {
                card_width: 180.0,
                card_height: 80.0,
                gap: 80.0,
            },
            medium: SpacingTier {
                card_width: 150.0,
                card_height: 70.0,
                gap: 45.0,
            },
            narrow: SpacingTier {
                card_width: 120.0,
                card_height: 60.0,
                gap: 20.0,
            },
        }
    }
}

impl TierPolicy {
    pub fn tier_for(&self, count: usize) -> SpacingTier {
        if count <= self.wide_max {
            self.wide
        } else if count <= self.medium_max {
            self.medium
        } else {
            self.narrow
        }
    }
}

/// Spacing rules for the hierarchical modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSpacing {
    /// Distance between adjacent siblings in a small family.
    pub separation_unit: f64,
    /// Distance between consecutive depths.
    pub level_gap: f64,
    /// Smallest allowed distance between same-depth nodes after layout.
    pub min_spacing: f64,
    pub card_width: f64,
    pub card_height: f64,
}

impl Default for TreeSpacing {
    fn default() -> Self {
        Self {
            separation_unit: 160.0,
            level_gap: 180.0,
            min_spacing: 140.0,
            card_width: 120.0,
            card_height: 60.0,
        }
    }
}

impl TreeSpacing {
    /// Separation between siblings grows with family size: 1× up to six,
    /// 1.5× up to ten, 2× beyond.
    pub fn sibling_separation(&self, sibling_count: usize) -> f64 {
        let factor = match sibling_count {
            0..=6 => 1.0,
            7..=10 => 1.5,
            _ => 2.0,
        };
        self.separation_unit * factor
    }
}

/// Bounds for user zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 0.1, max: 3.0 }
    }
}

impl ZoomLimits {
    /// Clamp `scale` into the limits. Inverted limits are read as the same
    /// range with its ends swapped.
    pub fn clamp(&self, scale: f64) -> f64 {
        let lo = self.min.min(self.max);
        let hi = self.max.max(self.min);
        scale.max(lo).min(hi)
    }
}

/// Rendering surface size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Configuration for the layout pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub orientation: Orientation,
    pub top_margin: f64,
    pub left_margin: f64,
    /// Distance between consecutive level rows in rows mode.
    pub level_height: f64,
    /// Width of the band that rows are centred in.
    pub canvas_width: f64,
    pub tiers: TierPolicy,
    pub tree: TreeSpacing,
    pub viewport: Viewport,
    /// Space kept free around the chain when fitting it to the viewport.
    pub fit_margin: f64,
    pub zoom: ZoomLimits,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Rows,
            orientation: Orientation::Vertical,
            top_margin: 40.0,
            left_margin: 40.0,
            level_height: 160.0,
            canvas_width: 1200.0,
            tiers: TierPolicy::default(),
            tree: TreeSpacing::default(),
            viewport: Viewport::default(),
            fit_margin: 40.0,
            zoom: ZoomLimits::default(),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
