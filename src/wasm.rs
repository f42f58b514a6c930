//! WASM bindings for cadeia-dominial.
//!
//! Exposes `render` and `renderWithOptions` to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::OutputFormat;
use crate::config::{LayoutConfig, LayoutMode};

/// Render a tree-data payload to SVG with the default layout.
#[wasm_bindgen]
pub fn render(src: &str) -> Result<String, JsError> {
    crate::render_payload(src, OutputFormat::Svg, &LayoutConfig::default())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Render with an explicit format and layout mode.
///
/// - `format`: "svg", "json", "outline" or "table"
/// - `mode`: "rows", "tree", "radial", or empty string for rows
#[wasm_bindgen(js_name = "renderWithOptions")]
pub fn render_with_options(src: &str, format: &str, mode: &str) -> Result<String, JsError> {
    let format: OutputFormat = format.parse().map_err(|e: String| JsError::new(&e))?;
    let mode = match mode.to_lowercase().as_str() {
        "" | "rows" => LayoutMode::Rows,
        "tree" => LayoutMode::Tree,
        "radial" => LayoutMode::Radial,
        other => return Err(JsError::new(&format!("Unknown mode '{other}'"))),
    };
    crate::render_payload(src, format, &LayoutConfig::with_mode(mode))
        .map_err(|e| JsError::new(&e.to_string()))
}
