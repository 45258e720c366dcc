//! Element sequence → pixels.
//!
//! Walks the sequence in array order (later elements land on top) and paints
//! each one through its own rotation transform. The transform is rebuilt per
//! element, so rotations never accumulate across elements.

use crate::images::ImageSet;
use crate::raster::Surface;
use crate::text::layout_line;
use kurbo::{Affine, Circle, Line, Point, Rect};
use pd_core::{CanvasSize, Color, Element, ElementKind, Frame, ImageContent, ShapeContent, ShapeKind, TextContent};

/// Canvas background behind every export.
pub const BACKGROUND: Color = Color::rgb(0x1a, 0x1a, 0x1a);

const PLACEHOLDER_FILL: Color = Color::rgb(0x3a, 0x3a, 0x3c);
const PLACEHOLDER_MARK: Color = Color::rgb(0x8e, 0x8e, 0x93);

/// Paint `elements` onto a fresh surface of `canvas` size.
pub fn paint_scene(elements: &[Element], canvas: CanvasSize, images: &ImageSet) -> Surface {
    let mut surface = Surface::new(canvas.width, canvas.height, BACKGROUND);
    paint_elements(&mut surface, elements, images);
    surface
}

/// Paint `elements` in order over whatever `surface` already holds.
pub fn paint_elements(surface: &mut Surface, elements: &[Element], images: &ImageSet) {
    for el in elements {
        log::trace!(
            "{} {} at ({}, {}) {}x{} rot {}",
            el.element_type(),
            el.id,
            el.frame.x,
            el.frame.y,
            el.frame.width,
            el.frame.height,
            el.frame.rotation
        );
        let transform = element_transform(&el.frame);
        match &el.kind {
            ElementKind::Text(text) => paint_text(surface, &el.frame, text, transform),
            ElementKind::Image(image) => paint_image(surface, &el.frame, image, images, transform),
            ElementKind::Shape(shape) => paint_shape(surface, &el.frame, shape, transform),
        }
    }
}

/// Clockwise rotation about the frame center.
pub fn element_transform(frame: &Frame) -> Affine {
    if frame.rotation == 0.0 {
        return Affine::IDENTITY;
    }
    let (cx, cy) = frame.center();
    Affine::rotate_about(frame.rotation.to_radians(), Point::new(cx, cy))
}

fn frame_rect(frame: &Frame) -> Rect {
    Rect::new(frame.x, frame.y, frame.x + frame.width, frame.y + frame.height)
}

// ─── Variant painters ────────────────────────────────────────────────────────

fn paint_text(surface: &mut Surface, frame: &Frame, text: &TextContent, transform: Affine) {
    if text.text.is_empty() {
        return;
    }
    let (cx, cy) = frame.center();
    let layout = layout_line(
        &text.text,
        text.font_size,
        text.font_weight,
        text.text_align,
        Point::new(cx, cy),
    );
    surface.fill(&layout.to_path(), transform, text.color);
}

fn paint_image(
    surface: &mut Surface,
    frame: &Frame,
    image: &ImageContent,
    images: &ImageSet,
    transform: Affine,
) {
    let dest = frame_rect(frame);
    match images.get(&image.src) {
        Some(decoded) => surface.draw_image(decoded, dest, transform),
        None => paint_placeholder(surface, dest, transform),
    }
}

fn paint_shape(surface: &mut Surface, frame: &Frame, shape: &ShapeContent, transform: Affine) {
    match shape.shape {
        ShapeKind::Circle => {
            let (cx, cy) = frame.center();
            let circle = Circle::new((cx, cy), frame.width.min(frame.height) / 2.0);
            surface.fill(&circle, transform, shape.fill);
            surface.stroke(&circle, shape.stroke_width, transform, shape.stroke);
        }
        ShapeKind::Rectangle => {
            let rect = frame_rect(frame);
            surface.fill(&rect, transform, shape.fill);
            surface.stroke(&rect, shape.stroke_width, transform, shape.stroke);
        }
    }
}

/// Crossed box standing in for an image that could not be loaded.
fn paint_placeholder(surface: &mut Surface, dest: Rect, transform: Affine) {
    surface.fill(&dest, transform, PLACEHOLDER_FILL);
    let pen = (dest.width().min(dest.height()) / 100.0).clamp(1.0, 4.0);
    surface.stroke(&dest, pen, transform, PLACEHOLDER_MARK);
    surface.stroke(&Line::new(dest.origin(), (dest.x1, dest.y1)), pen, transform, PLACEHOLDER_MARK);
    surface.stroke(&Line::new((dest.x1, dest.y0), (dest.x0, dest.y1)), pen, transform, PLACEHOLDER_MARK);
}
