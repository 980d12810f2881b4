//! Box-framed shapes: rectangles and circles.

use super::{ElementGeometry, SerializableColor};
use crate::geometry::{rect_contains_inclusive, segment_intersects_rect};
use kurbo::{BezPath, Ellipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Geometry and style shared by `rectangle` and `circle` elements.
///
/// A circle is stored by its bounding box; only rendering differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxShape {
    /// Top-left corner.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub color: SerializableColor,
    /// None renders unfilled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<SerializableColor>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
    2.0
}

impl BoxShape {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
            color: SerializableColor::black(),
            fill: None,
            stroke_width: default_stroke_width(),
        }
    }

    pub fn frame(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.width,
            self.origin.y + self.height,
        )
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.origin = frame.origin();
        self.width = frame.width();
        self.height = frame.height();
    }

    /// Outline of the inscribed ellipse, for circles.
    pub fn ellipse_path(&self) -> BezPath {
        Ellipse::from_rect(self.frame()).to_path(0.1)
    }
}

impl ElementGeometry for BoxShape {
    fn bounds(&self) -> Rect {
        self.frame()
    }

    /// Box containment; the tolerance does not widen it.
    fn hit_test(&self, point: Point, _tolerance: f64) -> bool {
        rect_contains_inclusive(self.frame(), point)
    }

    fn crossed_by(&self, a: Point, b: Point) -> bool {
        segment_intersects_rect(a, b, self.frame())
    }

    fn to_path(&self) -> BezPath {
        self.frame().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame() {
        let s = BoxShape::new(Point::new(10.0, 20.0), 100.0, 50.0);
        let frame = s.frame();
        assert!((frame.x1 - 110.0).abs() < f64::EPSILON);
        assert!((frame.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_includes_edges() {
        let s = BoxShape::new(Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(s.hit_test(Point::new(100.0, 100.0), 0.0));
        assert!(s.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!s.hit_test(Point::new(100.5, 50.0), 0.0));
    }

    #[test]
    fn test_set_frame() {
        let mut s = BoxShape::new(Point::ZERO, 1.0, 1.0);
        s.set_frame(Rect::new(5.0, 6.0, 25.0, 46.0));
        assert_eq!(s.origin, Point::new(5.0, 6.0));
        assert!((s.width - 20.0).abs() < f64::EPSILON);
        assert!((s.height - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_crossed_by_edge_only() {
        let s = BoxShape::new(Point::new(50.0, 50.0), 50.0, 50.0);
        assert!(s.crossed_by(Point::new(40.0, 75.0), Point::new(60.0, 75.0)));
        assert!(!s.crossed_by(Point::new(60.0, 60.0), Point::new(70.0, 70.0)));
    }
}
