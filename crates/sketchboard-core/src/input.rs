//! Pointer events as delivered by the host surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

/// Double-click detection constants.
pub const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
pub const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Cmd held: clicks add to the selection instead of replacing it.
    pub fn additive(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        /// Additive-selection modifier held.
        additive: bool,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
    /// Pointer left the surface. Ends a gesture like `Up`.
    Leave,
}

impl PointerEvent {
    pub fn down(position: Point, modifiers: Modifiers) -> Self {
        PointerEvent::Down {
            position,
            additive: modifiers.additive(),
        }
    }

    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => Some(*position),
            PointerEvent::Leave => None,
        }
    }
}

/// Detects double clicks from a stream of presses.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press at `position`. Returns true if it completes a double click.
    pub fn register(&mut self, position: Point, now: Instant) -> bool {
        if let Some((last_time, last_pos)) = self.last_click {
            let elapsed = now.saturating_duration_since(last_time);
            if elapsed < DOUBLE_CLICK_TIME && last_pos.distance(position) < DOUBLE_CLICK_DISTANCE {
                // Reset so a third click starts over.
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((now, position));
        false
    }

    /// [`Self::register`] using the current time.
    pub fn register_now(&mut self, position: Point) -> bool {
        self.register(position, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_detected() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        assert!(!tracker.register(Point::new(10.0, 10.0), t0));
        assert!(tracker.register(Point::new(12.0, 11.0), t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_triple_click_is_not_two_doubles() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        tracker.register(Point::ZERO, t0);
        assert!(tracker.register(Point::ZERO, t0 + Duration::from_millis(100)));
        assert!(!tracker.register(Point::ZERO, t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_slow_or_far_clicks() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        tracker.register(Point::ZERO, t0);
        assert!(!tracker.register(Point::ZERO, t0 + Duration::from_millis(600)));
        assert!(!tracker.register(Point::new(20.0, 0.0), t0 + Duration::from_millis(700)));
    }

    #[test]
    fn test_additive_modifiers() {
        assert!(Modifiers { ctrl: true, ..Default::default() }.additive());
        assert!(Modifiers { meta: true, ..Default::default() }.additive());
        assert!(!Modifiers { shift: true, ..Default::default() }.additive());
    }
}
