//! Free text labels and sticky notes.

use super::{ElementGeometry, SerializableColor};
use crate::geometry::{rect_contains_inclusive, segment_intersects_rect};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Approximate extent of a text label; text is never measured.
pub const TEXT_BOX_WIDTH: f64 = 100.0;
pub const TEXT_BOX_HEIGHT: f64 = 30.0;

/// Side length of a freshly placed sticky note.
pub const STICKY_SIZE: f64 = 128.0;

/// A single text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLabel {
    pub origin: Point,
    pub content: String,
    pub color: SerializableColor,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

fn default_font_size() -> f64 {
    16.0
}

impl TextLabel {
    pub fn new(origin: Point, content: impl Into<String>) -> Self {
        Self {
            origin,
            content: content.into(),
            color: SerializableColor::black(),
            font_size: default_font_size(),
        }
    }
}

impl ElementGeometry for TextLabel {
    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, (TEXT_BOX_WIDTH, TEXT_BOX_HEIGHT))
    }

    fn hit_test(&self, _point: Point, _tolerance: f64) -> bool {
        false
    }

    fn crossed_by(&self, a: Point, b: Point) -> bool {
        segment_intersects_rect(a, b, self.bounds())
    }

    fn to_path(&self) -> BezPath {
        self.bounds().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}

/// A square note with editable text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyNote {
    pub origin: Point,
    #[serde(default = "default_sticky_size")]
    pub width: f64,
    #[serde(default = "default_sticky_size")]
    pub height: f64,
    #[serde(default = "default_background")]
    pub background: SerializableColor,
    #[serde(default)]
    pub content: String,
}

fn default_sticky_size() -> f64 {
    STICKY_SIZE
}

fn default_background() -> SerializableColor {
    SerializableColor::sticky_yellow()
}

impl StickyNote {
    pub fn new(origin: Point, content: impl Into<String>) -> Self {
        Self {
            origin,
            width: STICKY_SIZE,
            height: STICKY_SIZE,
            background: default_background(),
            content: content.into(),
        }
    }

    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.origin, (self.width, self.height))
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.origin = frame.origin();
        self.width = frame.width();
        self.height = frame.height();
    }
}

impl ElementGeometry for StickyNote {
    fn bounds(&self) -> Rect {
        self.frame()
    }

    fn hit_test(&self, point: Point, _tolerance: f64) -> bool {
        rect_contains_inclusive(self.frame(), point)
    }

    fn to_path(&self) -> BezPath {
        self.frame().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}
