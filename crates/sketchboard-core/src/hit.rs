//! Point and marquee hit-testing over an ordered element list.

use crate::element::{Element, ElementId};
use crate::geometry::{normalized_rect, rect_contains_inclusive};
use kurbo::Point;
use std::sync::Arc;

/// Default click slop in pixels.
pub const DEFAULT_HIT_TOLERANCE: f64 = 5.0;

/// Topmost element under `point`.
///
/// Walks from the top of the z-order down and returns the first match.
/// Sticky notes, rectangles and circles match by box; brush strokes match
/// within half their width plus `tolerance`. Arrows, lines and text are
/// never picked by clicking.
pub fn element_at_point(elements: &[Arc<Element>], point: Point, tolerance: f64) -> Option<&Arc<Element>> {
    elements.iter().rev().find(|e| e.hit_test(point, tolerance))
}

/// Ids whose center lies inside the rectangle spanned by `c1` and `c2`.
///
/// Corner order does not matter. Ids come back in z-order.
pub fn elements_in_marquee(elements: &[Arc<Element>], c1: Point, c2: Point) -> Vec<ElementId> {
    let marquee = normalized_rect(c1, c2);
    elements
        .iter()
        .filter(|e| rect_contains_inclusive(marquee, e.center()))
        .map(|e| e.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{BoxShape, BrushStroke, Connector, ElementBody, SerializableColor, StickyNote, TextLabel};

    fn element(id: &str, body: ElementBody) -> Arc<Element> {
        Arc::new(Element {
            id: id.to_string(),
            created_by: None,
            created_at: 0,
            updated_at: 0,
            version: 0,
            body,
        })
    }

    fn board() -> Vec<Arc<Element>> {
        vec![
            element("rect", ElementBody::Rectangle(BoxShape::new(Point::new(0.0, 0.0), 100.0, 100.0))),
            element("sticky", ElementBody::Sticky(StickyNote::new(Point::new(50.0, 50.0), ""))),
            element(
                "stroke",
                ElementBody::BrushStroke(BrushStroke::new(
                    Point::new(300.0, 0.0),
                    Point::new(400.0, 0.0),
                    4.0,
                    SerializableColor::black(),
                )),
            ),
            element("line", ElementBody::Line(Connector::new(Point::new(500.0, 0.0), 50.0, 50.0))),
        ]
    }

    #[test]
    fn test_topmost_wins() {
        let elements = board();
        let hit = element_at_point(&elements, Point::new(75.0, 75.0), 5.0).unwrap();
        assert_eq!(hit.id, "sticky");
        let hit = element_at_point(&elements, Point::new(10.0, 10.0), 5.0).unwrap();
        assert_eq!(hit.id, "rect");
    }

    #[test]
    fn test_stroke_tolerance() {
        let elements = board();
        assert!(element_at_point(&elements, Point::new(350.0, 7.0), 5.0).is_some());
        assert!(element_at_point(&elements, Point::new(350.0, 8.0), 5.0).is_none());
    }

    #[test]
    fn test_lines_are_not_clickable() {
        let elements = board();
        assert!(element_at_point(&elements, Point::new(525.0, 25.0), 5.0).is_none());
    }

    #[test]
    fn test_marquee_uses_centers() {
        let elements = board();
        let ids = elements_in_marquee(&elements, Point::new(0.0, 0.0), Point::new(120.0, 120.0));
        assert_eq!(ids, vec!["rect".to_string(), "sticky".to_string()]);
        let ids = elements_in_marquee(&elements, Point::new(290.0, -10.0), Point::new(360.0, 10.0));
        assert_eq!(ids, vec!["stroke".to_string()]);
    }

    #[test]
    fn test_marquee_uses_box_center_for_text_and_sticky() {
        let elements = vec![
            element("text", ElementBody::Text(TextLabel::new(Point::new(0.0, 0.0), "note"))),
            element("sticky", ElementBody::Sticky(StickyNote::new(Point::new(200.0, 0.0), ""))),
        ];
        // Covering only the anchors selects nothing.
        assert!(elements_in_marquee(&elements, Point::new(-5.0, -5.0), Point::new(5.0, 5.0)).is_empty());
        assert!(elements_in_marquee(&elements, Point::new(195.0, -5.0), Point::new(205.0, 5.0)).is_empty());
        // Text box center is (50, 15), sticky center is (264, 64).
        let ids = elements_in_marquee(&elements, Point::new(45.0, 10.0), Point::new(270.0, 70.0));
        assert_eq!(ids, vec!["text".to_string(), "sticky".to_string()]);
    }

    #[test]
    fn test_marquee_symmetry() {
        let elements = board();
        let a = Point::new(-10.0, -10.0);
        let b = Point::new(600.0, 60.0);
        assert_eq!(
            elements_in_marquee(&elements, a, b),
            elements_in_marquee(&elements, b, a)
        );
    }
}
