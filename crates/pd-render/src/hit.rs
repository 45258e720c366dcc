//! Hit testing: point → element lookup.
//!
//! Reverse-walks the sequence (last painted = topmost) and undoes each
//! element's rotation before the bounds check.

use crate::paint::element_transform;
use kurbo::{Point, Rect};
use pd_core::{Element, ElementId, Frame};

/// Find the topmost element at canvas position `(x, y)`.
/// Returns `None` when only background is hit.
pub fn hit_test(elements: &[Element], x: f64, y: f64) -> Option<ElementId> {
    let point = Point::new(x, y);
    elements
        .iter()
        .rev()
        .find(|el| frame_contains(&el.frame, point))
        .map(|el| el.id)
}

/// Whether `point` lies inside `frame` once the frame's rotation is applied.
pub fn frame_contains(frame: &Frame, point: Point) -> bool {
    let local = element_transform(frame).inverse() * point;
    let rect = Rect::new(frame.x, frame.y, frame.x + frame.width, frame.y + frame.height);
    local.x >= rect.x0 && local.x <= rect.x1 && local.y >= rect.y0 && local.y <= rect.y1
}
