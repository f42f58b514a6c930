//! Renderer trait and the rendering adapters.
//!
//! Renderers only read positions and structure already computed by the
//! pipeline; none of them feed anything back into it.

pub mod outline;
pub mod svg;
pub mod table;

pub use outline::OutlineRenderer;
pub use svg::SvgRenderer;
pub use table::TableRenderer;

use crate::ChainView;

/// Trait for chain renderers.
pub trait Renderer {
    /// Render a computed chain view to a string.
    fn render(&self, view: &ChainView) -> String;
}
