//! Backend-agnostic renderer that records draw commands.

use crate::renderer::{RenderContext, Renderer, STICKY_BORDER_COLOR, STICKY_TEXT_COLOR};
use kurbo::{BezPath, Cap, Circle, Join, Point, Rect, Shape, Size, Stroke, Vec2};
use peniko::Color;
use sketchboard_core::element::{BrushStyle, Element, ElementBody, StickyNote};
use sketchboard_core::frame::{Frame, FrameSink};
use sketchboard_core::selection::Handle;
use sketchboard_core::session::SessionSnapshot;

/// Padding between a sticky note's edge and its text.
const STICKY_PADDING: f64 = 8.0;
const STICKY_FONT_SIZE: f64 = 14.0;
const STICKY_CORNER_RADIUS: f64 = 8.0;

/// One drawing operation.
///
/// Raster-layer operations (`ClearRaster`, `Erase`) come first in a frame's
/// list and apply to the host's persistent eraser layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the eraser layer.
    ClearRaster,
    /// Punch a hole in the eraser layer.
    Erase(Circle),
    Fill {
        path: BezPath,
        color: Color,
    },
    Stroke {
        path: BezPath,
        style: Stroke,
        color: Color,
    },
    /// Text with its top-left corner at `origin`.
    Text {
        origin: Point,
        content: String,
        font_size: f64,
        color: Color,
    },
}

/// Renders frames into a flat list of [`DrawCommand`]s.
#[derive(Debug, Clone)]
pub struct DisplayListRenderer {
    commands: Vec<DrawCommand>,
    selection_color: Color,
    viewport_size: Size,
    frames_rendered: u64,
}

impl Default for DisplayListRenderer {
    fn default() -> Self {
        Self::new(Size::new(1920.0, 1080.0))
    }
}

impl DisplayListRenderer {
    pub fn new(viewport_size: Size) -> Self {
        Self {
            commands: Vec::new(),
            selection_color: crate::renderer::SELECTION_COLOR,
            viewport_size,
            frames_rendered: 0,
        }
    }

    /// Commands of the last frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn fill(&mut self, path: BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill { path, color });
    }

    fn stroke(&mut self, path: BezPath, style: Stroke, color: Color) {
        self.commands.push(DrawCommand::Stroke { path, style, color });
    }

    fn render_element(&mut self, element: &Element, selected: bool, edit_text: Option<&str>) {
        let body = &element.body;
        match body {
            ElementBody::BrushStroke(stroke) => {
                let cap = match stroke.brush_style {
                    BrushStyle::Round => Cap::Round,
                    BrushStyle::Square => Cap::Square,
                    BrushStyle::Calligraphy => Cap::Butt,
                };
                let style = Stroke::new(stroke.width).with_caps(cap).with_join(Join::Round);
                self.stroke(body.to_path(), style, body.stroke_color().into());
            }
            ElementBody::Sticky(note) => self.render_sticky(note, selected, edit_text),
            ElementBody::Text(label) => {
                self.commands.push(DrawCommand::Text {
                    origin: label.origin,
                    content: label.content.clone(),
                    font_size: label.font_size,
                    color: label.color.into(),
                });
            }
            _ => {
                let path = body.to_path();
                if let Some(fill) = body.fill_color() {
                    self.fill(path.clone(), fill.into());
                }
                let style = Stroke::new(body.stroke_width()).with_join(Join::Round);
                self.stroke(path, style, body.stroke_color().into());
            }
        }

        if selected && !matches!(body, ElementBody::Sticky(_)) {
            self.render_selection_outline(element.bounds());
        }
    }

    fn render_sticky(&mut self, note: &StickyNote, selected: bool, edit_text: Option<&str>) {
        let frame = note.frame().to_rounded_rect(STICKY_CORNER_RADIUS).to_path(0.1);
        self.fill(frame.clone(), note.background.into());
        let border = if selected || edit_text.is_some() {
            self.selection_color
        } else {
            STICKY_BORDER_COLOR
        };
        self.stroke(frame, Stroke::new(2.0), border);
        self.commands.push(DrawCommand::Text {
            origin: note.origin + Vec2::new(STICKY_PADDING, STICKY_PADDING),
            content: edit_text.unwrap_or(&note.content).to_string(),
            font_size: STICKY_FONT_SIZE,
            color: STICKY_TEXT_COLOR,
        });
    }

    fn render_selection_outline(&mut self, bounds: Rect) {
        let stroke = Stroke::new(1.0).with_dashes(0.0, [4.0, 4.0]);
        self.stroke(bounds.to_path(0.1), stroke, self.selection_color);
    }

    /// Round blue grips with a white border.
    fn render_handles(&mut self, handles: &[Handle]) {
        for handle in handles {
            let path = handle.square().to_ellipse().to_path(0.1);
            self.fill(path.clone(), self.selection_color);
            self.stroke(path, Stroke::new(2.0), Color::WHITE);
        }
    }

    fn render_marquee(&mut self, rect: Rect) {
        let path = rect.to_path(0.1);
        self.fill(path.clone(), self.selection_color.with_alpha(0.1));
        let stroke = Stroke::new(1.0).with_dashes(0.0, [4.0, 4.0]);
        self.stroke(path, stroke, self.selection_color);
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext<'_>) {
        self.commands.clear();
        self.selection_color = ctx.selection_color;
        self.viewport_size = ctx.viewport_size;
        let frame = ctx.frame;

        if frame.raster_cleared {
            self.commands.push(DrawCommand::ClearRaster);
        }
        for blot in &frame.erase_blots {
            self.commands.push(DrawCommand::Erase(blot.circle()));
        }

        let editing = frame.sticky_edit.map(|edit| (edit.element_id.as_str(), edit.buffer.as_str()));
        for element in frame.displayed_elements() {
            let edit_text = editing.filter(|(id, _)| *id == element.id).map(|(_, text)| text);
            self.render_element(&element, frame.is_selected(&element.id), edit_text);
        }

        // Handles follow a resize in progress.
        let mut handles = frame.handles.clone();
        if let SessionSnapshot::Resizing { element_id, frame: preview, .. } = &frame.session {
            for handle in handles.iter_mut().filter(|h| &h.element_id == element_id) {
                handle.position = handle.kind.position(*preview);
            }
        }
        if let SessionSnapshot::Dragging { delta, .. } = &frame.session {
            for handle in handles.iter_mut() {
                handle.position += *delta;
            }
        }
        self.render_handles(&handles);

        if let SessionSnapshot::Marquee { rect } = &frame.session {
            self.render_marquee(*rect);
        }

        self.frames_rendered += 1;
        log::debug!("Display list built with {} commands", self.commands.len());
    }
}

impl FrameSink for DisplayListRenderer {
    fn present(&mut self, frame: &Frame<'_>) {
        let ctx = RenderContext::new(frame, self.viewport_size);
        if let Err(e) = self.render(&ctx) {
            log::warn!("Display list frame skipped: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchboard_core::canvas::Canvas;
    use sketchboard_core::config::EngineConfig;
    use sketchboard_core::tools::ToolKind;

    fn click(canvas: &mut Canvas, x: f64, y: f64) {
        canvas.pointer_down(Point::new(x, y), false);
        canvas.pointer_up(Point::new(x, y));
    }

    fn render(canvas: &Canvas) -> Vec<DrawCommand> {
        let mut renderer = DisplayListRenderer::new(Size::new(800.0, 600.0));
        let frame = canvas.frame();
        renderer.build_scene(&RenderContext::new(&frame, Size::new(800.0, 600.0)));
        renderer.take_commands()
    }

    #[test]
    fn test_rectangle_fill_then_stroke() {
        let mut canvas = Canvas::new(EngineConfig::default());
        canvas.set_tool(ToolKind::Rectangle);
        click(&mut canvas, 200.0, 200.0);

        let commands = render(&canvas);
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], DrawCommand::Fill { .. }));
        match &commands[1] {
            DrawCommand::Stroke { style, color, .. } => {
                assert!((style.width - 2.0).abs() < f64::EPSILON);
                assert_eq!(*color, Color::BLACK);
            }
            other => panic!("Expected stroke, got {other:?}"),
        }
    }

    #[test]
    fn test_brush_cap_follows_style() {
        let mut canvas = Canvas::new(EngineConfig::default());
        canvas.update_settings(|s| s.brush_style = BrushStyle::Square);
        canvas.pointer_down(Point::new(10.0, 10.0), false);
        canvas.pointer_move(Point::new(30.0, 10.0));
        canvas.pointer_up(Point::new(30.0, 10.0));

        match &render(&canvas)[0] {
            DrawCommand::Stroke { style, .. } => assert_eq!(style.start_cap, Cap::Square),
            other => panic!("Expected stroke, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_draws_handles() {
        let mut canvas = Canvas::new(EngineConfig::default());
        canvas.set_tool(ToolKind::Circle);
        click(&mut canvas, 200.0, 200.0);
        canvas.set_tool(ToolKind::Select);
        click(&mut canvas, 200.0, 200.0);

        let commands = render(&canvas);
        // fill + stroke + outline, then 8 handles of fill + stroke
        assert_eq!(commands.len(), 3 + 16);
    }

    #[test]
    fn test_sticky_edit_shows_buffer() {
        let mut canvas = Canvas::new(EngineConfig::default());
        canvas.set_tool(ToolKind::Sticky);
        click(&mut canvas, 200.0, 200.0);
        assert!(canvas.double_click(Point::new(200.0, 200.0)));
        canvas.set_sticky_text("draft");

        let commands = render(&canvas);
        let text = commands.iter().find_map(|c| match c {
            DrawCommand::Text { content, .. } => Some(content.clone()),
            _ => None,
        });
        assert_eq!(text.as_deref(), Some("draft"));
    }

    #[test]
    fn test_raster_commands_lead() {
        let mut canvas = Canvas::new(EngineConfig::default());
        canvas.set_tool(ToolKind::Rectangle);
        click(&mut canvas, 200.0, 200.0);
        canvas.set_tool(ToolKind::Eraser);
        canvas.pointer_down(Point::new(50.0, 50.0), false);

        let commands = render(&canvas);
        assert_eq!(commands[0], DrawCommand::Erase(Circle::new(Point::new(50.0, 50.0), 3.0)));

        canvas.pointer_up(Point::new(50.0, 50.0));
        canvas.clear_canvas();
        assert_eq!(render(&canvas), vec![DrawCommand::ClearRaster]);
    }

    #[test]
    fn test_negative_viewport_skips_frame() {
        let mut renderer = DisplayListRenderer::new(Size::new(-1.0, 600.0));
        let canvas = Canvas::new(EngineConfig::default());
        renderer.present(&canvas.frame());
        assert_eq!(renderer.frames_rendered(), 0);
    }

    #[test]
    fn test_frame_sink_counts_frames() {
        let mut renderer = DisplayListRenderer::default();
        let canvas = Canvas::new(EngineConfig::default());
        renderer.present(&canvas.frame());
        renderer.present(&canvas.frame());
        assert_eq!(renderer.frames_rendered(), 2);
        assert!(renderer.commands().is_empty());
    }
}
