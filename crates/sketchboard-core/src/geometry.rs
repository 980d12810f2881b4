//! Pure geometry helpers used by hit-testing, marquee selection and the
//! delete tool.
//!
//! Every function here is total over finite inputs: degenerate segments and
//! empty rectangles produce a safe answer instead of an error.

use kurbo::{Point, Rect};

/// Distance from a point to the segment `a -> b`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure to the nearest endpoint. A zero-length segment degrades to a
/// point-to-point distance.
pub fn point_to_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Test if segment `p1 -> p2` intersects segment `p3 -> p4`.
///
/// Solves both segments parametrically and requires both parameters to lie
/// in `[0, 1]`. Parallel and collinear segments have a zero determinant and
/// are reported as non-intersecting.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denom = d1.cross(d2);
    if denom == 0.0 || !denom.is_finite() {
        return false;
    }
    let offset = p3 - p1;
    let s = offset.cross(d2) / denom;
    let t = offset.cross(d1) / denom;
    (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
}

/// Test if the segment `a -> b` crosses any of the four edges of `rect`.
///
/// A segment lying strictly inside the rectangle touches no edge and does
/// not count.
pub fn segment_intersects_rect(a: Point, b: Point, rect: Rect) -> bool {
    let rect = rect.abs();
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    (0..4).any(|i| segments_intersect(a, b, corners[i], corners[(i + 1) % 4]))
}

/// Build a rectangle from two opposite corners given in any order.
pub fn normalized_rect(c1: Point, c2: Point) -> Rect {
    Rect::from_points(c1, c2)
}

/// Inclusive point-in-rectangle test (both min and max edges count).
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Marquee selection test: the center of `element_bounds` lies within the
/// normalized `marquee`.
pub fn rect_contains_center(element_bounds: Rect, marquee: Rect) -> bool {
    rect_contains_inclusive(marquee, element_bounds.abs().center())
}

/// Midpoint between two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    a.midpoint(b)
}
