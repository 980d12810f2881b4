//! Selection set, resize handles and manipulation state.

use crate::element::{Element, ElementId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Handle square side in pixels.
pub const HANDLE_SIZE: f64 = 12.0;
/// Default half-extent of the handle grab area.
pub const HANDLE_HIT_TOLERANCE: f64 = HANDLE_SIZE / 2.0;

/// Ids of the selected elements. Single selection is a one-element set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: BTreeSet<ElementId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Flip membership. Returns true if `id` is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementId> {
        self.ids.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// One of the eight resize grips around a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
    N,
    S,
    E,
    W,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
    ];

    /// Grip location on `frame`.
    pub fn position(self, frame: Rect) -> Point {
        let c = frame.center();
        match self {
            ResizeHandle::Nw => Point::new(frame.x0, frame.y0),
            ResizeHandle::Ne => Point::new(frame.x1, frame.y0),
            ResizeHandle::Sw => Point::new(frame.x0, frame.y1),
            ResizeHandle::Se => Point::new(frame.x1, frame.y1),
            ResizeHandle::N => Point::new(c.x, frame.y0),
            ResizeHandle::S => Point::new(c.x, frame.y1),
            ResizeHandle::E => Point::new(frame.x1, c.y),
            ResizeHandle::W => Point::new(frame.x0, c.y),
        }
    }

    fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Sw | ResizeHandle::W)
    }

    fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::Ne | ResizeHandle::Se | ResizeHandle::E)
    }

    fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Ne | ResizeHandle::N)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::Sw | ResizeHandle::Se | ResizeHandle::S)
    }
}

/// A resize grip placed on a specific element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    pub element_id: ElementId,
    pub kind: ResizeHandle,
    /// Grip center.
    pub position: Point,
}

impl Handle {
    /// Drawn square, `HANDLE_SIZE` on a side.
    pub fn square(&self) -> Rect {
        Rect::from_center_size(self.position, (HANDLE_SIZE, HANDLE_SIZE))
    }

    /// Check if `point` is within `tolerance` of the grip on both axes.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point.x - self.position.x).abs() <= tolerance
            && (point.y - self.position.y).abs() <= tolerance
    }
}

/// Grips for every selected element that can be resized.
pub fn handles_for<'a>(selected: impl IntoIterator<Item = &'a Arc<Element>>) -> Vec<Handle> {
    let mut handles = Vec::new();
    for element in selected {
        if !element.kind().is_resizable() {
            continue;
        }
        let Some(frame) = element.body.frame() else {
            continue;
        };
        handles.extend(ResizeHandle::ALL.iter().map(|&kind| Handle {
            element_id: element.id.clone(),
            kind,
            position: kind.position(frame),
        }));
    }
    handles
}

/// First grip under `point`. Later (topmost) elements win.
pub fn hit_test_handles(handles: &[Handle], point: Point, tolerance: f64) -> Option<&Handle> {
    handles.iter().rev().find(|h| h.hit_test(point, tolerance))
}

/// Apply a handle drag to `frame`.
///
/// Each handle moves only its own edges. Width and height never drop below
/// `min_size`; when the floor applies the opposite edge stays where it was.
pub fn resize_rect(frame: Rect, handle: ResizeHandle, delta: Vec2, min_size: f64) -> Rect {
    let frame = frame.abs();
    let (mut x0, mut y0, mut x1, mut y1) = (frame.x0, frame.y0, frame.x1, frame.y1);

    if handle.moves_left() {
        let width = (frame.width() - delta.x).max(min_size);
        x0 = x1 - width;
    } else if handle.moves_right() {
        let width = (frame.width() + delta.x).max(min_size);
        x1 = x0 + width;
    }

    if handle.moves_top() {
        let height = (frame.height() - delta.y).max(min_size);
        y0 = y1 - height;
    } else if handle.moves_bottom() {
        let height = (frame.height() + delta.y).max(min_size);
        y1 = y0 + height;
    }

    Rect::new(x0, y0, x1, y1)
}

/// State for translating the selection.
#[derive(Debug, Clone)]
pub struct DragState {
    pub start_point: Point,
    pub current_point: Point,
    /// Elements as they were when the drag began.
    pub originals: BTreeMap<ElementId, Arc<Element>>,
    /// Element to select alone if the pointer comes up without moving.
    pub click_target: Option<ElementId>,
}

impl DragState {
    pub fn new(start_point: Point, originals: impl IntoIterator<Item = Arc<Element>>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            originals: originals.into_iter().map(|e| (e.id.clone(), e)).collect(),
            click_target: None,
        }
    }

    /// Cumulative pointer delta since the drag began.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Originals moved by the current delta.
    pub fn preview(&self) -> Vec<Element> {
        let delta = self.delta();
        self.originals.values().map(|e| e.translated(delta)).collect()
    }
}

/// State for resizing one element through one grip.
#[derive(Debug, Clone)]
pub struct ResizeState {
    pub element_id: ElementId,
    pub handle: ResizeHandle,
    pub start_point: Point,
    pub current_point: Point,
    /// Frame when the grip was grabbed.
    pub original_frame: Rect,
}

impl ResizeState {
    pub fn new(element_id: ElementId, handle: ResizeHandle, start_point: Point, original_frame: Rect) -> Self {
        Self {
            element_id,
            handle,
            start_point,
            current_point: start_point,
            original_frame,
        }
    }

    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Frame for the current pointer position.
    pub fn frame(&self, min_size: f64) -> Rect {
        resize_rect(self.original_frame, self.handle, self.delta(), min_size)
    }
}
