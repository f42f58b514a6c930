//! cadeia-dominial — chain-of-title graph engine.
//!
//! Public API: `build_view()` and `render_payload()`.
//!
//! Pipeline: payload → `ChainGraph` → `LevelAssignment` → `ChainTree` →
//! layout → renderer. Every stage is pure; `interaction::GraphSession`
//! re-runs the pipeline after each confirmed mutation.

pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod parsers;
pub mod renderers;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::Serialize;
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::{ChainError, Diagnostic};
use crate::layout::{ChainGraph, ChainTable, ChainTree, LayoutResult, LevelAssignment};
use crate::model::TreeData;
use crate::renderers::{OutlineRenderer, Renderer, SvgRenderer, TableRenderer};

/// Everything derived from one chain snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainView {
    pub levels: LevelAssignment,
    pub tree: ChainTree,
    pub layout: LayoutResult,
    pub table: ChainTable,
    /// Orphan, unreachable and unparsable-code findings from every stage.
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the full pipeline over a snapshot.
pub fn build_view(data: &TreeData, config: &LayoutConfig) -> Result<ChainView, ChainError> {
    let graph = ChainGraph::from_tree_data(data)?;
    let levels = LevelAssignment::assign(&graph)?;
    let tree = ChainTree::reduce(&graph, levels.root)?;
    let layout = layout::full_layout(&graph, &levels, &tree, config);
    let table = ChainTable::build(&graph, &levels, &tree);

    let mut diagnostics = levels.diagnostics.clone();
    diagnostics.extend(tree.diagnostics.iter().cloned());
    debug!(
        nodes = layout.nodes.len(),
        connectors = layout.connectors.len(),
        diagnostics = diagnostics.len(),
        "built chain view"
    );
    Ok(ChainView {
        levels,
        tree,
        layout,
        table,
        diagnostics,
    })
}

/// Output formats for `render_payload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
    Outline,
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            "outline" | "text" => Ok(OutputFormat::Outline),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!(
                "Unknown format '{other}'; use svg, json, outline, or table"
            )),
        }
    }
}

/// Parse a `tree-data` payload and render it.
pub fn render_payload(
    src: &str,
    format: OutputFormat,
    config: &LayoutConfig,
) -> Result<String, ChainError> {
    let data = parsers::parse(src)?;
    let view = build_view(&data, config)?;
    let rendered = match format {
        OutputFormat::Svg => SvgRenderer::fitted(config).render(&view),
        OutputFormat::Json => serde_json::to_string_pretty(&view)?,
        OutputFormat::Outline => OutlineRenderer.render(&view),
        OutputFormat::Table => TableRenderer.render(&view),
    };
    Ok(rendered)
}

#[cfg(test)]
#[path = "../tests/rust/test_pipeline.rs"]
mod tests;
