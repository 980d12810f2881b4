//! SVG renderer producing a standalone document per frame.

use crate::renderer::{RenderContext, Renderer, STICKY_BORDER_COLOR, STICKY_TEXT_COLOR};
use kurbo::{Circle, Rect, Size};
use sketchboard_core::element::{BrushStyle, Element, ElementBody, SerializableColor};
use sketchboard_core::frame::{Frame, FrameSink};
use sketchboard_core::selection::HANDLE_SIZE;
use sketchboard_core::session::SessionSnapshot;
use std::fmt::Write;

fn svg_color(color: impl Into<SerializableColor>) -> String {
    color.into().to_string()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders frames to SVG markup.
///
/// Eraser dabs accumulate across frames, like the host's raster layer,
/// until a frame clears it. They mask the element layer.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    output: String,
    viewport_size: Size,
    erased: Vec<Circle>,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(Size::new(1920.0, 1080.0))
    }
}

impl SvgRenderer {
    pub fn new(viewport_size: Size) -> Self {
        Self {
            output: String::new(),
            viewport_size,
            erased: Vec::new(),
        }
    }

    /// Markup of the last frame.
    pub fn svg(&self) -> &str {
        &self.output
    }

    pub fn into_svg(self) -> String {
        self.output
    }

    fn write_element(out: &mut String, element: &Element, edit_text: Option<&str>) {
        let body = &element.body;
        match body {
            ElementBody::BrushStroke(stroke) => {
                let cap = match stroke.brush_style {
                    BrushStyle::Round => "round",
                    BrushStyle::Square => "square",
                    BrushStyle::Calligraphy => "butt",
                };
                let _ = writeln!(
                    out,
                    r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="{cap}" stroke-linejoin="round"/>"#,
                    body.to_path().to_svg(),
                    svg_color(body.stroke_color()),
                    stroke.width
                );
            }
            ElementBody::Text(label) => {
                let _ = writeln!(
                    out,
                    r#"<text x="{}" y="{}" font-size="{}" fill="{}" dominant-baseline="hanging">{}</text>"#,
                    label.origin.x,
                    label.origin.y,
                    label.font_size,
                    svg_color(label.color),
                    escape(&label.content)
                );
            }
            ElementBody::Sticky(note) => {
                let frame = note.frame();
                let border = if edit_text.is_some() {
                    svg_color(crate::renderer::SELECTION_COLOR)
                } else {
                    svg_color(STICKY_BORDER_COLOR)
                };
                let _ = writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="8" fill="{}" stroke="{border}" stroke-width="2"/>"#,
                    frame.x0,
                    frame.y0,
                    frame.width(),
                    frame.height(),
                    svg_color(note.background)
                );
                let _ = writeln!(
                    out,
                    r#"<text x="{}" y="{}" font-size="14" fill="{}" dominant-baseline="hanging">{}</text>"#,
                    frame.x0 + 8.0,
                    frame.y0 + 8.0,
                    svg_color(STICKY_TEXT_COLOR),
                    escape(edit_text.unwrap_or(&note.content))
                );
            }
            _ => {
                let fill = body.fill_color().map(svg_color).unwrap_or_else(|| "none".to_string());
                let _ = writeln!(
                    out,
                    r#"<path d="{}" fill="{fill}" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
                    body.to_path().to_svg(),
                    svg_color(body.stroke_color()),
                    body.stroke_width()
                );
            }
        }
    }

    fn write_outline(out: &mut String, rect: Rect, color: &str, fill: &str) {
        let _ = writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" stroke="{color}" stroke-width="1" stroke-dasharray="4 4"/>"#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height()
        );
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext<'_>) {
        let frame = ctx.frame;
        let size = ctx.viewport_size;
        self.viewport_size = size;
        if frame.raster_cleared {
            self.erased.clear();
        }
        self.erased.extend(frame.erase_blots.iter().map(|b| b.circle()));

        let selection = svg_color(ctx.selection_color);
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = size.width,
            h = size.height
        );
        let _ = writeln!(
            out,
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            size.width,
            size.height,
            svg_color(self.background_color(ctx))
        );

        if self.erased.is_empty() {
            out.push_str("<g>\n");
        } else {
            out.push_str("<defs><mask id=\"eraser\">\n");
            let _ = writeln!(out, r#"<rect width="{}" height="{}" fill="white"/>"#, size.width, size.height);
            for circle in &self.erased {
                let _ = writeln!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="black"/>"#,
                    circle.center.x, circle.center.y, circle.radius
                );
            }
            out.push_str("</mask></defs>\n<g mask=\"url(#eraser)\">\n");
        }

        let editing = frame.sticky_edit.map(|edit| (edit.element_id.as_str(), edit.buffer.as_str()));
        let displayed = frame.displayed_elements();
        for element in &displayed {
            let edit_text = editing.filter(|(id, _)| *id == element.id).map(|(_, text)| text);
            Self::write_element(&mut out, element, edit_text);
        }
        out.push_str("</g>\n");

        for element in displayed.iter().filter(|e| frame.is_selected(&e.id)) {
            Self::write_outline(&mut out, element.bounds(), &selection, "none");
        }

        for handle in &frame.handles {
            let mut position = handle.position;
            match &frame.session {
                SessionSnapshot::Resizing { element_id, frame: rect, .. } if *element_id == handle.element_id => {
                    position = handle.kind.position(*rect);
                }
                SessionSnapshot::Dragging { delta, .. } => position += *delta,
                _ => {}
            }
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{selection}" stroke="white" stroke-width="2"/>"#,
                position.x,
                position.y,
                HANDLE_SIZE / 2.0
            );
        }

        if let SessionSnapshot::Marquee { rect } = &frame.session {
            let fill = svg_color(ctx.selection_color.with_alpha(0.1));
            Self::write_outline(&mut out, *rect, &selection, &fill);
        }

        out.push_str("</svg>\n");
        self.output = out;
        log::debug!("SVG frame written ({} bytes)", self.output.len());
    }
}

impl FrameSink for SvgRenderer {
    fn present(&mut self, frame: &Frame<'_>) {
        let ctx = RenderContext::new(frame, self.viewport_size);
        if let Err(e) = self.render(&ctx) {
            log::warn!("SVG frame skipped: {e}");
        }
    }
}
