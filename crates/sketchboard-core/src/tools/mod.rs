//! Tool system for the board.

mod placement;

pub use placement::{
    CONNECTOR_SIZE, SHAPE_SIZE, STICKY_PLACEHOLDER, TEXT_OFFSET, TEXT_PLACEHOLDER, place_element,
};

use crate::element::{BrushStyle, SerializableColor};
use crate::session::InteractionSession;
use serde::{Deserialize, Serialize};

/// Lowest opacity the tool settings accept.
pub const MIN_OPACITY: f64 = 0.1;
/// Brush size range in pixels.
pub const MIN_BRUSH_SIZE: f64 = 1.0;
pub const MAX_BRUSH_SIZE: f64 = 50.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    #[default]
    Brush,
    Eraser,
    Delete,
    Sticky,
    Rectangle,
    Circle,
    Arrow,
    Line,
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Select,
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Delete,
        ToolKind::Sticky,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Arrow,
        ToolKind::Line,
        ToolKind::Text,
    ];

    /// Tools that drop one element per click.
    pub fn places_element(self) -> bool {
        matches!(
            self,
            ToolKind::Sticky
                | ToolKind::Rectangle
                | ToolKind::Circle
                | ToolKind::Arrow
                | ToolKind::Line
                | ToolKind::Text
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Brush => "brush",
            ToolKind::Eraser => "eraser",
            ToolKind::Delete => "delete",
            ToolKind::Sticky => "sticky",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Arrow => "arrow",
            ToolKind::Line => "line",
            ToolKind::Text => "text",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Drawing settings shared by every tool. Survive tool switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    /// Stroke, text and brush color.
    pub color: SerializableColor,
    pub fill_color: SerializableColor,
    /// Outline width for shapes and connectors.
    pub stroke_width: f64,
    /// Brush width, also the eraser radius.
    pub brush_size: f64,
    pub opacity: f64,
    pub brush_style: BrushStyle,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            fill_color: SerializableColor::white(),
            stroke_width: 2.0,
            brush_size: 3.0,
            opacity: 1.0,
            brush_style: BrushStyle::Round,
        }
    }
}

impl ToolSettings {
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(MIN_OPACITY, 1.0);
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width.max(0.0);
    }

    /// Pull out-of-range values back into range.
    pub fn normalized(mut self) -> Self {
        self.set_opacity(self.opacity);
        self.set_brush_size(self.brush_size);
        self.set_stroke_width(self.stroke_width);
        self
    }
}

/// Manages the current tool, its settings and the active gesture.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    pub settings: ToolSettings,
    /// Gesture in progress, if any.
    pub session: InteractionSession,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(tool: ToolKind, settings: ToolSettings) -> Self {
        Self {
            current_tool: tool,
            settings: settings.normalized(),
            session: InteractionSession::Idle,
        }
    }

    /// Set the current tool, dropping any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.session = InteractionSession::Idle;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.session, InteractionSession::Idle)
    }

    /// Take the current gesture, leaving the manager idle.
    pub fn take_session(&mut self) -> InteractionSession {
        std::mem::take(&mut self.session)
    }
}
