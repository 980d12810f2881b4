//! Transient state of one pointer gesture.

use crate::element::{Element, ElementId};
use crate::geometry::normalized_rect;
use crate::selection::{DragState, ResizeHandle, ResizeState};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// The gesture in progress between pointer-down and pointer-up.
///
/// Dropped unconditionally on pointer-up, pointer-leave and tool switches.
#[derive(Debug, Clone, Default)]
pub enum InteractionSession {
    #[default]
    Idle,
    /// Brush drag; each move appends a segment from `last_point`.
    Stroke { last_point: Point },
    /// Rubber-band selection.
    Marquee { start: Point, current: Point },
    Dragging(DragState),
    Resizing(ResizeState),
    /// Delete tool drag; `anchor` is the end of the previous test segment.
    DeleteDrag { anchor: Point, previous: Point },
    /// Eraser held down.
    Erasing,
}

impl InteractionSession {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionSession::Idle => "idle",
            InteractionSession::Stroke { .. } => "stroke",
            InteractionSession::Marquee { .. } => "marquee",
            InteractionSession::Dragging(_) => "dragging",
            InteractionSession::Resizing(_) => "resizing",
            InteractionSession::DeleteDrag { .. } => "delete-drag",
            InteractionSession::Erasing => "erasing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionSession::Idle)
    }

    /// Read-only view for the render callback.
    pub fn snapshot(&self, min_resize: f64) -> SessionSnapshot {
        match self {
            InteractionSession::Idle => SessionSnapshot::Idle,
            InteractionSession::Stroke { last_point } => SessionSnapshot::Stroke {
                last_point: *last_point,
            },
            InteractionSession::Marquee { start, current } => SessionSnapshot::Marquee {
                rect: normalized_rect(*start, *current),
            },
            InteractionSession::Dragging(drag) => SessionSnapshot::Dragging {
                delta: drag.delta(),
                preview: drag.preview(),
            },
            InteractionSession::Resizing(resize) => SessionSnapshot::Resizing {
                element_id: resize.element_id.clone(),
                handle: resize.handle,
                frame: resize.frame(min_resize),
            },
            InteractionSession::DeleteDrag { anchor, previous } => SessionSnapshot::DeleteDrag {
                segment: (*previous, *anchor),
            },
            InteractionSession::Erasing => SessionSnapshot::Erasing,
        }
    }
}

/// What the renderer needs to draw the gesture in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SessionSnapshot {
    #[default]
    Idle,
    Stroke {
        last_point: Point,
    },
    /// Normalized marquee rectangle.
    Marquee {
        rect: Rect,
    },
    /// Selected elements at their previewed positions.
    Dragging {
        delta: Vec2,
        preview: Vec<Element>,
    },
    Resizing {
        element_id: ElementId,
        handle: ResizeHandle,
        frame: Rect,
    },
    /// Last tested delete segment.
    DeleteDrag {
        segment: (Point, Point),
    },
    Erasing,
}

impl SessionSnapshot {
    /// Previewed frame of the element being resized, if that is `id`.
    pub fn resize_preview(&self, id: &str) -> Option<Rect> {
        match self {
            SessionSnapshot::Resizing { element_id, frame, .. } if element_id == id => Some(*frame),
            _ => None,
        }
    }

    /// Previewed copy of `id` during a drag.
    pub fn drag_preview(&self, id: &str) -> Option<&Element> {
        match self {
            SessionSnapshot::Dragging { preview, .. } => preview.iter().find(|e| e.id == id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marquee_snapshot_is_normalized() {
        let session = InteractionSession::Marquee {
            start: Point::new(50.0, 50.0),
            current: Point::new(10.0, 20.0),
        };
        match session.snapshot(20.0) {
            SessionSnapshot::Marquee { rect } => {
                assert_eq!(rect, Rect::new(10.0, 20.0, 50.0, 50.0));
            }
            other => panic!("Expected marquee, got {other:?}"),
        }
    }

    #[test]
    fn test_resize_snapshot_previews_frame() {
        let mut state = ResizeState::new(
            "r".to_string(),
            ResizeHandle::Se,
            Point::new(110.0, 110.0),
            Rect::new(10.0, 10.0, 110.0, 110.0),
        );
        state.current_point = Point::new(130.0, 115.0);
        let snapshot = InteractionSession::Resizing(state).snapshot(20.0);
        assert_eq!(snapshot.resize_preview("r"), Some(Rect::new(10.0, 10.0, 130.0, 115.0)));
        assert_eq!(snapshot.resize_preview("other"), None);
    }

    #[test]
    fn test_default_is_idle() {
        assert!(InteractionSession::default().is_idle());
        assert_eq!(InteractionSession::default().snapshot(20.0), SessionSnapshot::Idle);
    }
}
