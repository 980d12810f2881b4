//! What the engine hands to the host for drawing.

use crate::edit::StickyEdit;
use crate::element::Element;
use crate::selection::{Handle, SelectionSet};
use crate::session::SessionSnapshot;
use crate::tools::ToolKind;
use kurbo::{Circle, Point};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One eraser dab on the raster layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EraseBlot {
    pub center: Point,
    pub radius: f64,
}

impl EraseBlot {
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }
}

/// Everything needed to redraw the board once.
#[derive(Debug)]
pub struct Frame<'a> {
    /// Elements in paint order.
    pub elements: &'a [Arc<Element>],
    pub selection: &'a SelectionSet,
    pub session: SessionSnapshot,
    /// Resize grips of the selected elements.
    pub handles: Vec<Handle>,
    /// Eraser dabs since the previous frame.
    pub erase_blots: Vec<EraseBlot>,
    /// The raster layer must be wiped before drawing.
    pub raster_cleared: bool,
    pub sticky_edit: Option<&'a StickyEdit>,
    pub tool: ToolKind,
}

impl Frame<'_> {
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Element as it should be drawn right now, with drag and resize
    /// previews applied.
    pub fn displayed(&self, element: &Arc<Element>) -> Arc<Element> {
        if let Some(moved) = self.session.drag_preview(&element.id) {
            return Arc::new(moved.clone());
        }
        if let Some(frame) = self.session.resize_preview(&element.id) {
            let mut resized = Element::clone(element);
            resized.body.set_frame(frame);
            return Arc::new(resized);
        }
        Arc::clone(element)
    }

    /// Elements with previews applied, in paint order.
    pub fn displayed_elements(&self) -> Vec<Arc<Element>> {
        self.elements.iter().map(|e| self.displayed(e)).collect()
    }
}

/// Host render callback.
pub trait FrameSink {
    fn present(&mut self, frame: &Frame<'_>);
}

impl<F> FrameSink for F
where
    F: FnMut(&Frame<'_>),
{
    fn present(&mut self, frame: &Frame<'_>) {
        self(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{BoxShape, ElementBody};
    use crate::selection::ResizeHandle;
    use kurbo::Rect;

    #[test]
    fn test_displayed_applies_resize_preview() {
        let element = Arc::new(Element {
            id: "r".into(),
            created_by: None,
            created_at: 0,
            updated_at: 0,
            version: 0,
            body: ElementBody::Rectangle(BoxShape::new(Point::ZERO, 10.0, 10.0)),
        });
        let elements = vec![Arc::clone(&element)];
        let selection = SelectionSet::new();
        let frame = Frame {
            elements: &elements,
            selection: &selection,
            session: SessionSnapshot::Resizing {
                element_id: "r".into(),
                handle: ResizeHandle::Se,
                frame: Rect::new(0.0, 0.0, 40.0, 30.0),
            },
            handles: Vec::new(),
            erase_blots: Vec::new(),
            raster_cleared: false,
            sticky_edit: None,
            tool: ToolKind::Select,
        };
        let shown = frame.displayed_elements();
        assert_eq!(shown[0].bounds(), Rect::new(0.0, 0.0, 40.0, 30.0));
        assert_eq!(element.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }
}
