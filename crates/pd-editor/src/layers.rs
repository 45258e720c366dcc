//! Layer ordering. Sequence order is paint order: index 0 is the bottom.

use pd_core::{Element, ElementId, ElementKind, ElementSequence, ElementType, ShapeKind, position};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerDirection {
    /// One step toward the top.
    Up,
    /// One step toward the bottom.
    Down,
    /// To the very top.
    Top,
    /// To the very bottom.
    Bottom,
}

impl fmt::Display for LayerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Top => "top",
            Self::Bottom => "bottom",
        })
    }
}

/// The reordered sequence, or `None` when `id` is unknown or the element is
/// already where `direction` would put it.
pub fn reorder(elements: &[Element], id: ElementId, direction: LayerDirection) -> Option<ElementSequence> {
    let index = position(elements, id)?;
    let last = elements.len() - 1;
    let mut next = elements.to_vec();

    match direction {
        LayerDirection::Up if index < last => next.swap(index, index + 1),
        LayerDirection::Down if index > 0 => next.swap(index, index - 1),
        LayerDirection::Top if index < last => {
            let el = next.remove(index);
            next.push(el);
        }
        LayerDirection::Bottom if index > 0 => {
            let el = next.remove(index);
            next.insert(0, el);
        }
        _ => return None,
    }
    Some(next)
}

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerEntry {
    pub id: ElementId,
    pub element_type: ElementType,
    pub label: String,
}

/// Layer rows, topmost first.
pub fn layer_list(elements: &[Element]) -> Vec<LayerEntry> {
    elements
        .iter()
        .rev()
        .map(|el| LayerEntry {
            id: el.id,
            element_type: el.element_type(),
            label: layer_label(el),
        })
        .collect()
}

/// Text content for text elements, otherwise a name for the kind.
pub fn layer_label(el: &Element) -> String {
    match &el.kind {
        ElementKind::Text(t) if !t.text.is_empty() => t.text.clone(),
        ElementKind::Text(_) => "Text".to_string(),
        ElementKind::Image(_) => "Image".to_string(),
        ElementKind::Shape(s) => match s.shape {
            ShapeKind::Circle => "Circle".to_string(),
            ShapeKind::Rectangle => "Rectangle".to_string(),
        },
    }
}
