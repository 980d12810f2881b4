//! Sketchboard Render Library
//!
//! Renderer abstraction and backend-agnostic renderers for Sketchboard
//! frames. Both renderers plug into the engine as frame sinks.

mod display_list;
mod renderer;
mod svg;

pub use display_list::{DisplayListRenderer, DrawCommand};
pub use renderer::{
    BACKGROUND_COLOR, RenderContext, RenderResult, Renderer, RendererError, SELECTION_COLOR, STICKY_BORDER_COLOR,
    STICKY_TEXT_COLOR,
};
pub use svg::SvgRenderer;
