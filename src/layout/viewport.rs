//! Fit-to-viewport and pan/zoom state.

use serde::Serialize;

use super::types::{Bounds, Point};
use crate::config::{LayoutConfig, Viewport, ZoomLimits};

/// Uniform scale followed by a translation: `p' = p * scale + (tx, ty)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.tx, p.y * self.scale + self.ty)
    }

    /// Inverse of `apply`: screen point back to layout coordinates.
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.tx) / self.scale, (p.y - self.ty) / self.scale)
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({:.2},{:.2}) scale({:.4})",
            self.tx, self.ty, self.scale
        )
    }
}

/// Scale and centre `bounds` inside `viewport`, leaving `margin` free on
/// every side. The scale is clamped to `zoom`.
pub fn fit_to_viewport(
    bounds: &Bounds,
    viewport: &Viewport,
    margin: f64,
    zoom: &ZoomLimits,
) -> Transform {
    let avail_w = (viewport.width - 2.0 * margin).max(1.0);
    let avail_h = (viewport.height - 2.0 * margin).max(1.0);
    let width = bounds.width().max(1.0);
    let height = bounds.height().max(1.0);
    let scale = zoom.clamp((avail_w / width).min(avail_h / height));

    let center_x = bounds.min_x + bounds.width() / 2.0;
    let center_y = bounds.min_y + bounds.height() / 2.0;
    Transform {
        scale,
        tx: viewport.width / 2.0 - center_x * scale,
        ty: viewport.height / 2.0 - center_y * scale,
    }
}

/// View state owned by whoever displays the chain: the current transform
/// plus the limits user gestures are clamped to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub transform: Transform,
    pub viewport: Viewport,
    pub limits: ZoomLimits,
    pub fit_margin: f64,
}

impl RenderState {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            transform: Transform::identity(),
            viewport: config.viewport,
            limits: config.zoom,
            fit_margin: config.fit_margin,
        }
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// Replace the transform with one that fits `bounds`.
    pub fn fit(&mut self, bounds: &Bounds) {
        self.transform = fit_to_viewport(bounds, &self.viewport, self.fit_margin, &self.limits);
    }

    /// Zoom around the viewport centre.
    pub fn zoom_by(&mut self, factor: f64) {
        let center = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.zoom_at(factor, center);
    }

    /// Zoom keeping the screen point `focus` fixed.
    pub fn zoom_at(&mut self, factor: f64, focus: Point) {
        let anchor = self.transform.invert(focus);
        let scale = self.limits.clamp(self.transform.scale * factor);
        self.transform = Transform {
            scale,
            tx: focus.x - anchor.x * scale,
            ty: focus.y - anchor.y * scale,
        };
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.transform.tx += dx;
        self.transform.ty += dy;
    }

    pub fn reset(&mut self) {
        self.transform = Transform::identity();
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_viewport.rs"]
mod tests;
