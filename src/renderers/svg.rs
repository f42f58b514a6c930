//! SVG renderer: draws the computed layout as document cards and
//! connectors.
//!
//! Matrículas and transcrições get different fills, shared documents a
//! double-weight outline, and auxiliary links are dashed. Positions are taken
//! from the layout as-is; an optional view transform wraps everything in a
//! `<g transform>`.

use super::Renderer;
use crate::ChainView;
use crate::config::LayoutConfig;
use crate::layout::types::{Connector, ConnectorStyle, LayoutNode};
use crate::layout::viewport::{Transform, fit_to_viewport};
use crate::model::DocumentKind;

// ─── Constants ────────────────────────────────────────────────────────────────

const FONT_SIZE: f64 = 14.0;
const FONT_FAMILY: &str = "sans-serif";
const PADDING: f64 = 20.0;

const MATRICULA_FILL: &str = "#e8f1fb";
const TRANSCRICAO_FILL: &str = "#fdf3e1";
const CARD_STROKE: &str = r##"stroke="#33475b" stroke-width="1.5""##;
const SHARED_STROKE: &str = r##"stroke="#8a3ffc" stroke-width="3""##;

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn font(size: f64) -> String {
    format!(r#"font-family="{FONT_FAMILY}" font-size="{size}""#)
}

fn fill_for(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Matricula => MATRICULA_FILL,
        DocumentKind::Transcricao => TRANSCRICAO_FILL,
    }
}

// ─── Shapes ───────────────────────────────────────────────────────────────────

fn render_card(node: &LayoutNode) -> String {
    let stroke = if node.shared { SHARED_STROKE } else { CARD_STROKE };
    let fill = fill_for(node.kind);
    let center = node.center();
    let title_y = center.y - FONT_SIZE * 0.4;
    let detail_y = center.y + FONT_SIZE * 0.9;
    let recordings = match node.recordings {
        1 => "1 lançamento".to_string(),
        n => format!("{n} lançamentos"),
    };
    format!(
        concat!(
            r#"<g class="documento" data-id="{id}">"#,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" rx="6" fill="{fill}" {stroke}/>"#,
            r#"<text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" font-weight="bold" {f}>{code}</text>"#,
            r##"<text x="{cx:.1}" y="{dy:.1}" text-anchor="middle" fill="#555" {fs}>{rec}</text>"##,
            "</g>"
        ),
        id = node.id,
        x = node.x,
        y = node.y,
        w = node.width,
        h = node.height,
        fill = fill,
        stroke = stroke,
        cx = center.x,
        ty = title_y,
        dy = detail_y,
        f = font(FONT_SIZE),
        fs = font(FONT_SIZE - 3.0),
        code = escape(&node.code),
        rec = recordings,
    )
}

fn render_connector(connector: &Connector) -> String {
    let style = match connector.style {
        ConnectorStyle::Solid => "",
        ConnectorStyle::Dashed => r#" stroke-dasharray="6 4""#,
    };
    format!(
        r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#33475b" stroke-width="1.5"{style} marker-end="url(#arrowhead)"/>"##,
        connector.start.x, connector.start.y, connector.end.x, connector.end.y
    )
}

// ─── Renderer ─────────────────────────────────────────────────────────────────

/// Renders a chain view to an SVG document.
pub struct SvgRenderer {
    /// Canvas size; `None` sizes the canvas to the layout.
    pub canvas: Option<(f64, f64)>,
    /// Fit the layout into `canvas` before drawing.
    pub fit: Option<(f64, crate::config::ZoomLimits)>,
    /// Explicit view transform, applied when `fit` is not set.
    pub transform: Option<Transform>,
}

impl SvgRenderer {
    /// Canvas sized to the layout, no transform.
    pub fn new() -> Self {
        Self {
            canvas: None,
            fit: None,
            transform: None,
        }
    }

    /// Canvas of the configured viewport size with the chain fitted into it.
    pub fn fitted(config: &LayoutConfig) -> Self {
        Self {
            canvas: Some((config.viewport.width, config.viewport.height)),
            fit: Some((config.fit_margin, config.zoom)),
            transform: None,
        }
    }

    /// Canvas of the given size with a caller-controlled transform, e.g. the
    /// one held by a `RenderState`.
    pub fn with_transform(width: f64, height: f64, transform: Transform) -> Self {
        Self {
            canvas: Some((width, height)),
            fit: None,
            transform: Some(transform),
        }
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, view: &ChainView) -> String {
        let layout = &view.layout;
        let Some(bounds) = layout.bounds else {
            return String::new();
        };

        let (svg_w, svg_h) = self.canvas.unwrap_or((
            bounds.max_x + PADDING,
            bounds.max_y + PADDING,
        ));
        let transform = match (self.fit, self.transform) {
            (Some((margin, zoom)), _) => Some(fit_to_viewport(
                &bounds,
                &crate::config::Viewport {
                    width: svg_w,
                    height: svg_h,
                },
                margin,
                &zoom,
            )),
            (None, t) => t,
        };

        let mut parts = vec![
            format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{svg_w:.0}" height="{svg_h:.0}" viewBox="0 0 {svg_w:.0} {svg_h:.0}">"#
            ),
            "<defs>".to_string(),
            r#"  <marker id="arrowhead" markerWidth="10" markerHeight="7" refX="10" refY="3.5" orient="auto">"#.to_string(),
            r##"    <polygon points="0 0, 10 3.5, 0 7" fill="#33475b"/>"##.to_string(),
            "  </marker>".to_string(),
            "</defs>".to_string(),
            format!(r#"<rect width="{svg_w:.0}" height="{svg_h:.0}" fill="white"/>"#),
        ];

        if let Some(t) = transform {
            parts.push(format!(r#"<g transform="{}">"#, t.to_svg()));
        }

        // Connectors first so cards sit on top.
        for connector in &layout.connectors {
            parts.push(render_connector(connector));
        }
        for node in &layout.nodes {
            parts.push(render_card(node));
        }

        if transform.is_some() {
            parts.push("</g>".to_string());
        }
        parts.push("</svg>".to_string());
        parts.join("\n")
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_renderers_svg.rs"]
mod tests;
