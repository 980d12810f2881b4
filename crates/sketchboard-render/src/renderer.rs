//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use sketchboard_core::frame::Frame;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Board background.
pub const BACKGROUND_COLOR: Color = Color::WHITE;
/// Selection outlines, marquee and resize handles (blue-500).
pub const SELECTION_COLOR: Color = Color::from_rgba8(59, 130, 246, 255);
/// Sticky note border when not selected (yellow-400).
pub const STICKY_BORDER_COLOR: Color = Color::from_rgba8(250, 204, 21, 255);
/// Sticky note text (gray-800).
pub const STICKY_TEXT_COLOR: Color = Color::from_rgba8(31, 41, 55, 255);

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Engine state to draw.
    pub frame: &'a Frame<'a>,
    /// Drawing surface size.
    pub viewport_size: Size,
    pub background_color: Color,
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    pub fn new(frame: &'a Frame<'a>, viewport_size: Size) -> Self {
        Self {
            frame,
            viewport_size,
            background_color: BACKGROUND_COLOR,
            selection_color: SELECTION_COLOR,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the drawing output for one frame.
    ///
    /// Called once per frame; implementations replace their previous output.
    fn build_scene(&mut self, ctx: &RenderContext<'_>);

    /// Build a frame after checking that the viewport can hold it.
    fn render(&mut self, ctx: &RenderContext<'_>) -> RenderResult<()> {
        let size = ctx.viewport_size;
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(RendererError::Unsupported(format!(
                "viewport must be positive, got {}x{}",
                size.width, size.height
            )));
        }
        self.build_scene(ctx);
        Ok(())
    }

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext<'_>) -> Color {
        ctx.background_color
    }
}
