//! Property edits from the inspector panel.
//!
//! Numeric edits are clamped into the ranges the inspector offers. Edits
//! that only make sense for one variant are rejected on the others; the
//! variant of an element never changes.

use crate::error::EditorError;
use pd_core::{
    Color, Element, ElementKind, FontFamily, FontWeight, MIN_EXTENT, ShapeKind, TextAlign, normalize_rotation,
};

pub const FONT_SIZE_RANGE: (f64, f64) = (12.0, 120.0);
pub const STROKE_WIDTH_RANGE: (f64, f64) = (0.0, 20.0);

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    // ── Frame ──
    X(f64),
    Y(f64),
    Width(f64),
    Height(f64),
    /// Degrees; folded into `[0, 360)`.
    Rotation(f64),

    // ── Text ──
    Text(String),
    FontSize(f64),
    FontWeight(FontWeight),
    FontFamily(FontFamily),
    Color(Color),
    TextAlign(TextAlign),

    // ── Image ──
    Src(String),

    // ── Shape ──
    Shape(ShapeKind),
    Fill(Color),
    Stroke(Color),
    StrokeWidth(f64),
}

impl PropertyChange {
    /// Property name as it appears in the stored JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Self::X(_) => "x",
            Self::Y(_) => "y",
            Self::Width(_) => "width",
            Self::Height(_) => "height",
            Self::Rotation(_) => "rotation",
            Self::Text(_) => "text",
            Self::FontSize(_) => "fontSize",
            Self::FontWeight(_) => "fontWeight",
            Self::FontFamily(_) => "fontFamily",
            Self::Color(_) => "color",
            Self::TextAlign(_) => "textAlign",
            Self::Src(_) => "src",
            Self::Shape(_) => "shape",
            Self::Fill(_) => "fill",
            Self::Stroke(_) => "stroke",
            Self::StrokeWidth(_) => "strokeWidth",
        }
    }

    /// Return `el` with the change applied. `el` itself is untouched.
    pub fn apply(&self, el: &Element) -> Result<Element, EditorError> {
        let mut next = el.clone();
        let property = self.name();
        let mismatch = || EditorError::VariantMismatch {
            property,
            element_type: el.element_type(),
        };

        match (self, &mut next.kind) {
            (Self::X(v), _) => next.frame.x = finite(property, *v)?,
            (Self::Y(v), _) => next.frame.y = finite(property, *v)?,
            (Self::Width(v), _) => next.frame.width = finite(property, *v)?.max(MIN_EXTENT),
            (Self::Height(v), _) => next.frame.height = finite(property, *v)?.max(MIN_EXTENT),
            (Self::Rotation(v), _) => next.frame.rotation = normalize_rotation(finite(property, *v)?),

            (Self::Text(s), ElementKind::Text(t)) => t.text = s.clone(),
            (Self::FontSize(v), ElementKind::Text(t)) => {
                t.font_size = finite(property, *v)?.clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1)
            }
            (Self::FontWeight(w), ElementKind::Text(t)) => t.font_weight = *w,
            (Self::FontFamily(f), ElementKind::Text(t)) => t.font_family = *f,
            (Self::Color(c), ElementKind::Text(t)) => t.color = *c,
            (Self::TextAlign(a), ElementKind::Text(t)) => t.text_align = *a,

            (Self::Src(s), ElementKind::Image(i)) => i.src = s.clone(),

            (Self::Shape(k), ElementKind::Shape(s)) => s.shape = *k,
            (Self::Fill(c), ElementKind::Shape(s)) => s.fill = *c,
            (Self::Stroke(c), ElementKind::Shape(s)) => s.stroke = *c,
            (Self::StrokeWidth(v), ElementKind::Shape(s)) => {
                s.stroke_width = finite(property, *v)?.clamp(STROKE_WIDTH_RANGE.0, STROKE_WIDTH_RANGE.1)
            }

            _ => return Err(mismatch()),
        }
        Ok(next)
    }
}

fn finite(property: &'static str, value: f64) -> Result<f64, EditorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditorError::InvalidValue { property, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::{ElementType, Frame, ImageContent, ShapeContent, TextContent};
    use pretty_assertions::assert_eq;

    fn text() -> Element {
        Element::new(Frame::new(0.0, 0.0, 200.0, 100.0), ElementKind::Text(TextContent::default()))
    }

    fn text_content(el: &Element) -> &TextContent {
        match &el.kind {
            ElementKind::Text(t) => t,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn frame_edits_apply_to_any_variant() {
        let img = Element::new(Frame::new(0.0, 0.0, 10.0, 10.0), ElementKind::Image(ImageContent::default()));
        let moved = PropertyChange::X(42.0).apply(&img).unwrap();
        assert_eq!(moved.frame.x, 42.0);
        assert_eq!(moved.id, img.id);
    }

    #[test]
    fn size_is_clamped_to_one_pixel() {
        let el = PropertyChange::Width(-5.0).apply(&text()).unwrap();
        assert_eq!(el.frame.width, 1.0);
        let el = PropertyChange::Height(0.25).apply(&text()).unwrap();
        assert_eq!(el.frame.height, 1.0);
    }

    #[test]
    fn rotation_is_normalized() {
        assert_eq!(PropertyChange::Rotation(450.0).apply(&text()).unwrap().frame.rotation, 90.0);
        assert_eq!(PropertyChange::Rotation(-90.0).apply(&text()).unwrap().frame.rotation, 270.0);
    }

    #[test]
    fn font_size_is_clamped() {
        let el = PropertyChange::FontSize(4.0).apply(&text()).unwrap();
        assert_eq!(text_content(&el).font_size, 12.0);
        let el = PropertyChange::FontSize(500.0).apply(&text()).unwrap();
        assert_eq!(text_content(&el).font_size, 120.0);
    }

    #[test]
    fn font_family_switches_to_cursive() {
        let el = PropertyChange::FontFamily(FontFamily::Cursive).apply(&text()).unwrap();
        assert_eq!(text_content(&el).font_family, FontFamily::Cursive);
    }

    #[test]
    fn stroke_width_is_clamped() {
        let shape = Element::new(Frame::new(0.0, 0.0, 10.0, 10.0), ElementKind::Shape(ShapeContent::default()));
        let el = PropertyChange::StrokeWidth(99.0).apply(&shape).unwrap();
        match el.kind {
            ElementKind::Shape(s) => assert_eq!(s.stroke_width, 20.0),
            other => panic!("expected shape, got {other:?}"),
        }
    }

    #[test]
    fn variant_mismatch_is_rejected() {
        let err = PropertyChange::Fill(Color::BLACK).apply(&text()).unwrap_err();
        assert!(matches!(
            err,
            EditorError::VariantMismatch {
                property: "fill",
                element_type: ElementType::Text
            }
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(matches!(
            PropertyChange::X(f64::NAN).apply(&text()),
            Err(EditorError::InvalidValue { property: "x", .. })
        ));
    }
}
