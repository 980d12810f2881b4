//! Brush stroke segment.

use super::{ElementGeometry, SerializableColor};
use crate::geometry::point_to_segment_distance;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Tip shape of the brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrushStyle {
    #[default]
    Round,
    Square,
    Calligraphy,
}

/// One short straight segment of a freehand stroke.
///
/// A freehand drag produces one of these per pointer move, so a visible
/// stroke is a run of consecutive segments rather than a single polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushStroke {
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub brush_style: BrushStyle,
    /// Brush width in pixels.
    pub width: f64,
    pub color: SerializableColor,
    /// 0.0 to 1.0.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl BrushStroke {
    pub fn new(start: Point, end: Point, width: f64, color: SerializableColor) -> Self {
        Self {
            start,
            end,
            brush_style: BrushStyle::default(),
            width,
            color,
            opacity: 1.0,
        }
    }

    pub fn with_style(mut self, style: BrushStyle) -> Self {
        self.brush_style = style;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }
}

impl ElementGeometry for BrushStroke {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn center(&self) -> Point {
        self.start.midpoint(self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_distance(point, self.start, self.end) <= self.width / 2.0 + tolerance
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
