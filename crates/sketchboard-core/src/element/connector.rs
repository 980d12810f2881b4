//! Arrows and lines.

use super::{ElementGeometry, SerializableColor};
use crate::geometry::segments_intersect;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Fraction of the box width left empty on each side of the drawn stroke.
const INSET: f64 = 0.1;
/// Arrowhead size in the 50x50 reference box the stroke is laid out in.
const HEAD_LENGTH: f64 = 10.0;
const HEAD_HALF_WIDTH: f64 = 3.5;
const REFERENCE_SIZE: f64 = 50.0;

/// Geometry and style shared by `arrow` and `line` elements.
///
/// The connector lives in a box. It is drawn as a horizontal stroke across
/// the middle of the box but behaves as the box diagonal for the delete tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub color: SerializableColor,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
    2.0
}

impl Connector {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
            color: SerializableColor::black(),
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

    /// Top-left to bottom-right of the box.
    pub fn diagonal(&self) -> (Point, Point) {
        (self.origin, self.origin + Vec2::new(self.width, self.height))
    }

    /// The visible stroke: horizontal, at mid-height, inset from both sides.
    pub fn visible_segment(&self) -> (Point, Point) {
        let y = self.origin.y + self.height / 2.0;
        (
            Point::new(self.origin.x + self.width * INSET, y),
            Point::new(self.origin.x + self.width * (1.0 - INSET), y),
        )
    }

    /// Closed triangle at the end of the visible stroke.
    pub fn head_path(&self) -> BezPath {
        let (_, tip) = self.visible_segment();
        let sx = self.width / REFERENCE_SIZE;
        let sy = self.height / REFERENCE_SIZE;
        let mut path = BezPath::new();
        path.move_to(tip);
        path.line_to(Point::new(tip.x - HEAD_LENGTH * sx, tip.y - HEAD_HALF_WIDTH * sy));
        path.line_to(Point::new(tip.x - HEAD_LENGTH * sx, tip.y + HEAD_HALF_WIDTH * sy));
        path.close_path();
        path
    }
}

impl ElementGeometry for Connector {
    fn bounds(&self) -> Rect {
        self.frame()
    }

    /// Connectors are not picked by clicking; marquee selection reaches them.
    fn hit_test(&self, _point: Point, _tolerance: f64) -> bool {
        false
    }

    fn crossed_by(&self, a: Point, b: Point) -> bool {
        let (start, end) = self.diagonal();
        segments_intersect(a, b, start, end)
    }

    fn to_path(&self) -> BezPath {
        let (start, end) = self.visible_segment();
        let mut path = BezPath::new();
        path.move_to(start);
        path.line_to(end);
        path
    }

    fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}
