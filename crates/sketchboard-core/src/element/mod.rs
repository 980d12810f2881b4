//! Element definitions for the board.
//!
//! An [`Element`] is an immutable value once it is in the store: changes go
//! through [`ElementPatch`] and produce a fresh copy.

mod color;
mod connector;
mod shape;
mod stroke;
mod text;

pub use color::{InvalidColor, SerializableColor};
pub use connector::Connector;
pub use shape::BoxShape;
pub use stroke::{BrushStroke, BrushStyle};
pub use text::{STICKY_SIZE, StickyNote, TEXT_BOX_HEIGHT, TEXT_BOX_WIDTH, TextLabel};

use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Unique identifier for elements. Opaque string, immutable once assigned.
pub type ElementId = String;

/// Geometry every element variant provides.
pub trait ElementGeometry {
    /// Axis-aligned bounding box.
    fn bounds(&self) -> Rect;

    /// Point used by marquee selection.
    fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Check if a click at `point` picks this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Check if the delete-drag segment `a -> b` cuts this element.
    fn crossed_by(&self, _a: Point, _b: Point) -> bool {
        false
    }

    /// Outline for rendering.
    fn to_path(&self) -> BezPath;

    fn translate(&mut self, delta: Vec2);
}

/// Element type tag without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    BrushStroke,
    Rectangle,
    Circle,
    Arrow,
    Line,
    Text,
    Sticky,
}

impl ElementKind {
    /// Kinds the delete tool cuts through.
    pub fn is_deletable_by_drag(self) -> bool {
        matches!(
            self,
            ElementKind::Rectangle
                | ElementKind::Circle
                | ElementKind::Arrow
                | ElementKind::Line
                | ElementKind::Text
        )
    }

    /// Kinds that get resize handles when selected.
    pub fn is_resizable(self) -> bool {
        matches!(
            self,
            ElementKind::Rectangle | ElementKind::Circle | ElementKind::Sticky
        )
    }
}

/// Variant payload of an element, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ElementBody {
    BrushStroke(BrushStroke),
    Rectangle(BoxShape),
    Circle(BoxShape),
    Arrow(Connector),
    Line(Connector),
    Text(TextLabel),
    Sticky(StickyNote),
}

impl ElementBody {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementBody::BrushStroke(_) => ElementKind::BrushStroke,
            ElementBody::Rectangle(_) => ElementKind::Rectangle,
            ElementBody::Circle(_) => ElementKind::Circle,
            ElementBody::Arrow(_) => ElementKind::Arrow,
            ElementBody::Line(_) => ElementKind::Line,
            ElementBody::Text(_) => ElementKind::Text,
            ElementBody::Sticky(_) => ElementKind::Sticky,
        }
    }

    fn geometry(&self) -> &dyn ElementGeometry {
        match self {
            ElementBody::BrushStroke(s) => s,
            ElementBody::Rectangle(s) | ElementBody::Circle(s) => s,
            ElementBody::Arrow(c) | ElementBody::Line(c) => c,
            ElementBody::Text(t) => t,
            ElementBody::Sticky(s) => s,
        }
    }

    fn geometry_mut(&mut self) -> &mut dyn ElementGeometry {
        match self {
            ElementBody::BrushStroke(s) => s,
            ElementBody::Rectangle(s) | ElementBody::Circle(s) => s,
            ElementBody::Arrow(c) | ElementBody::Line(c) => c,
            ElementBody::Text(t) => t,
            ElementBody::Sticky(s) => s,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.geometry().bounds()
    }

    pub fn center(&self) -> Point {
        self.geometry().center()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.geometry().hit_test(point, tolerance)
    }

    /// Delete-tool test. Always false for kinds the delete tool ignores.
    pub fn crossed_by(&self, a: Point, b: Point) -> bool {
        self.kind().is_deletable_by_drag() && self.geometry().crossed_by(a, b)
    }

    /// Outline to draw. Circles are ellipses inscribed in their box and
    /// arrows carry their head as a second closed subpath.
    pub fn to_path(&self) -> BezPath {
        match self {
            ElementBody::Circle(s) => s.ellipse_path(),
            ElementBody::Arrow(c) => {
                let mut path = c.to_path();
                path.extend(c.head_path().elements().iter().copied());
                path
            }
            other => other.geometry().to_path(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.geometry_mut().translate(delta);
    }

    /// Resizable frame, for kinds that have one.
    pub fn frame(&self) -> Option<Rect> {
        match self {
            ElementBody::Rectangle(s) | ElementBody::Circle(s) => Some(s.frame()),
            ElementBody::Sticky(s) => Some(s.frame()),
            _ => None,
        }
    }

    /// Replace the frame of a resizable element. Returns false otherwise.
    pub fn set_frame(&mut self, frame: Rect) -> bool {
        match self {
            ElementBody::Rectangle(s) | ElementBody::Circle(s) => {
                s.set_frame(frame);
                true
            }
            ElementBody::Sticky(s) => {
                s.set_frame(frame);
                true
            }
            _ => false,
        }
    }

    /// Stroke (or text) color.
    pub fn stroke_color(&self) -> SerializableColor {
        match self {
            ElementBody::BrushStroke(s) => s.color.with_opacity(s.opacity),
            ElementBody::Rectangle(s) | ElementBody::Circle(s) => s.color,
            ElementBody::Arrow(c) | ElementBody::Line(c) => c.color,
            ElementBody::Text(t) => t.color,
            ElementBody::Sticky(_) => SerializableColor::black(),
        }
    }

    pub fn fill_color(&self) -> Option<SerializableColor> {
        match self {
            ElementBody::Rectangle(s) | ElementBody::Circle(s) => s.fill,
            ElementBody::Arrow(c) => Some(c.color),
            ElementBody::Sticky(s) => Some(s.background),
            _ => None,
        }
    }

    pub fn stroke_width(&self) -> f64 {
        match self {
            ElementBody::BrushStroke(s) => s.width,
            ElementBody::Rectangle(s) | ElementBody::Circle(s) => s.stroke_width,
            ElementBody::Arrow(c) | ElementBody::Line(c) => c.stroke_width,
            ElementBody::Text(_) | ElementBody::Sticky(_) => 1.0,
        }
    }

    /// Text content for text labels and sticky notes.
    pub fn text(&self) -> Option<&str> {
        match self {
            ElementBody::Text(t) => Some(&t.content),
            ElementBody::Sticky(s) => Some(&s.content),
            _ => None,
        }
    }
}

/// A drawable object on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// User that created the element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
    /// Bumped on every update.
    #[serde(default)]
    pub version: u64,
    #[serde(flatten)]
    pub body: ElementBody,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn bounds(&self) -> Rect {
        self.body.bounds()
    }

    pub fn center(&self) -> Point {
        self.body.center()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.body.hit_test(point, tolerance)
    }

    pub fn crossed_by(&self, a: Point, b: Point) -> bool {
        self.body.crossed_by(a, b)
    }

    pub fn to_path(&self) -> BezPath {
        self.body.to_path()
    }

    /// Copy of this element with `delta` applied, keeping id and timestamps.
    pub fn translated(&self, delta: Vec2) -> Element {
        let mut moved = self.clone();
        moved.body.translate(delta);
        moved
    }
}

/// An element about to be added. The store assigns whatever is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(flatten)]
    pub body: ElementBody,
}

impl ElementDraft {
    pub fn new(body: ElementBody) -> Self {
        Self {
            id: None,
            created_by: None,
            body,
        }
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn created_by(mut self, user: impl Into<String>) -> Self {
        self.created_by = Some(user.into());
        self
    }
}

impl From<ElementBody> for ElementDraft {
    fn from(body: ElementBody) -> Self {
        Self::new(body)
    }
}

/// Partial update merged into an element.
///
/// Fields that do not apply to the target's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
    /// Translation applied after positional fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<SerializableColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<SerializableColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<SerializableColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brush_style: Option<BrushStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl ElementPatch {
    /// Move by `delta`.
    pub fn offset(delta: Vec2) -> Self {
        Self {
            offset: Some(delta),
            ..Self::default()
        }
    }

    /// Replace origin and size.
    pub fn frame(frame: Rect) -> Self {
        Self {
            origin: Some(frame.origin()),
            width: Some(frame.width()),
            height: Some(frame.height()),
            ..Self::default()
        }
    }

    /// Replace text content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the patch into `body`.
    pub fn apply(&self, body: &mut ElementBody) {
        match body {
            ElementBody::BrushStroke(s) => {
                set(&mut s.start, self.start);
                set(&mut s.end, self.end);
                set(&mut s.color, self.color);
                set(&mut s.width, self.stroke_width);
                set(&mut s.brush_style, self.brush_style);
                if let Some(opacity) = self.opacity {
                    s.opacity = opacity.clamp(0.0, 1.0);
                }
            }
            ElementBody::Rectangle(s) | ElementBody::Circle(s) => {
                set(&mut s.origin, self.origin);
                set(&mut s.width, self.width);
                set(&mut s.height, self.height);
                set(&mut s.color, self.color);
                if self.fill.is_some() {
                    s.fill = self.fill;
                }
                set(&mut s.stroke_width, self.stroke_width);
            }
            ElementBody::Arrow(c) | ElementBody::Line(c) => {
                set(&mut c.origin, self.origin);
                set(&mut c.width, self.width);
                set(&mut c.height, self.height);
                set(&mut c.color, self.color);
                set(&mut c.stroke_width, self.stroke_width);
            }
            ElementBody::Text(t) => {
                set(&mut t.origin, self.origin);
                set(&mut t.color, self.color);
                set(&mut t.font_size, self.font_size);
                if let Some(content) = &self.content {
                    t.content.clone_from(content);
                }
            }
            ElementBody::Sticky(s) => {
                set(&mut s.origin, self.origin);
                set(&mut s.width, self.width);
                set(&mut s.height, self.height);
                set(&mut s.background, self.background);
                if let Some(content) = &self.content {
                    s.content.clone_from(content);
                }
            }
        }
        if let Some(delta) = self.offset {
            body.translate(delta);
        }
    }
}

fn set<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}
