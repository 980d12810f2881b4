//! Click-to-place element construction.

use super::{ToolKind, ToolSettings};
use crate::element::{BoxShape, Connector, ElementBody, STICKY_SIZE, StickyNote, TextLabel};
use kurbo::{Point, Vec2};

/// Side of a freshly placed rectangle or circle.
pub const SHAPE_SIZE: f64 = 100.0;
/// Side of a freshly placed arrow or line box.
pub const CONNECTOR_SIZE: f64 = 50.0;
/// Text labels are placed up and left of the click by this much.
pub const TEXT_OFFSET: f64 = 25.0;

pub const TEXT_PLACEHOLDER: &str = "Double click to edit";
pub const STICKY_PLACEHOLDER: &str = "Double-click to edit";

/// Build the element a placement tool drops at `click`.
///
/// The element is centered on the click (text is offset instead) and its
/// origin never goes negative. Returns `None` for tools that do not place.
pub fn place_element(tool: ToolKind, click: Point, settings: &ToolSettings) -> Option<ElementBody> {
    let body = match tool {
        ToolKind::Sticky => {
            let origin = clamped_origin(click, STICKY_SIZE / 2.0);
            ElementBody::Sticky(StickyNote::new(origin, STICKY_PLACEHOLDER))
        }
        ToolKind::Rectangle | ToolKind::Circle => {
            let mut shape = BoxShape::new(clamped_origin(click, SHAPE_SIZE / 2.0), SHAPE_SIZE, SHAPE_SIZE);
            shape.color = settings.color;
            shape.fill = Some(settings.fill_color);
            shape.stroke_width = settings.stroke_width;
            if tool == ToolKind::Rectangle {
                ElementBody::Rectangle(shape)
            } else {
                ElementBody::Circle(shape)
            }
        }
        ToolKind::Arrow | ToolKind::Line => {
            let mut connector = Connector::new(
                clamped_origin(click, CONNECTOR_SIZE / 2.0),
                CONNECTOR_SIZE,
                CONNECTOR_SIZE,
            );
            connector.color = settings.color;
            connector.stroke_width = settings.stroke_width;
            if tool == ToolKind::Arrow {
                ElementBody::Arrow(connector)
            } else {
                ElementBody::Line(connector)
            }
        }
        ToolKind::Text => {
            let mut label = TextLabel::new(clamped_origin(click, TEXT_OFFSET), TEXT_PLACEHOLDER);
            label.color = settings.color;
            ElementBody::Text(label)
        }
        ToolKind::Select | ToolKind::Brush | ToolKind::Eraser | ToolKind::Delete => return None,
    };
    Some(body)
}

fn clamped_origin(click: Point, half: f64) -> Point {
    let origin = click - Vec2::new(half, half);
    Point::new(origin.x.max(0.0), origin.y.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SerializableColor;

    fn place(tool: ToolKind, x: f64, y: f64) -> ElementBody {
        place_element(tool, Point::new(x, y), &ToolSettings::default()).unwrap()
    }

    #[test]
    fn test_rectangle_centered_on_click() {
        match place(ToolKind::Rectangle, 200.0, 150.0) {
            ElementBody::Rectangle(s) => {
                assert_eq!(s.origin, Point::new(150.0, 100.0));
                assert!((s.width - 100.0).abs() < f64::EPSILON);
                assert!((s.height - 100.0).abs() < f64::EPSILON);
                assert_eq!(s.fill, Some(SerializableColor::white()));
            }
            other => panic!("Expected rectangle, got {other:?}"),
        }
    }

    #[test]
    fn test_origin_clamped_near_edge() {
        assert_eq!(place(ToolKind::Rectangle, 10.0, 10.0).bounds().origin(), Point::ZERO);
        assert_eq!(place(ToolKind::Sticky, 10.0, 300.0).bounds().origin(), Point::new(0.0, 236.0));
    }

    #[test]
    fn test_connector_box() {
        let body = place(ToolKind::Arrow, 100.0, 100.0);
        assert_eq!(body.bounds(), kurbo::Rect::new(75.0, 75.0, 125.0, 125.0));
    }

    #[test]
    fn test_text_placeholder() {
        match place(ToolKind::Text, 100.0, 100.0) {
            ElementBody::Text(t) => {
                assert_eq!(t.origin, Point::new(75.0, 75.0));
                assert_eq!(t.content, TEXT_PLACEHOLDER);
                assert!((t.font_size - 16.0).abs() < f64::EPSILON);
            }
            other => panic!("Expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_sticky_defaults() {
        match place(ToolKind::Sticky, 200.0, 200.0) {
            ElementBody::Sticky(s) => {
                assert_eq!(s.origin, Point::new(136.0, 136.0));
                assert_eq!(s.content, STICKY_PLACEHOLDER);
                assert_eq!(s.background, SerializableColor::sticky_yellow());
            }
            other => panic!("Expected sticky, got {other:?}"),
        }
    }
}
