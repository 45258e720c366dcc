//! Editor commands.
//!
//! Every mutation of the editor is an explicit `EditorCommand` value handed
//! to [`Editor::dispatch`](crate::editor::Editor::dispatch). Tools and the
//! shortcut map only ever produce commands; they never touch the sequence.

use crate::layers::LayerDirection;
use crate::properties::PropertyChange;
use pd_core::{Element, ElementId, ElementType};

/// Horizontal alignment of the selected element on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Replace the selection. `None` deselects.
    Select(Option<ElementId>),
    /// A pointer drag started on the selected element.
    BeginDrag,
    /// The pointer drag ended.
    EndDrag,
    /// Translate by a pointer delta; the result is clamped to the canvas.
    Move { id: ElementId, dx: f64, dy: f64 },
    Align(Alignment),
    Reorder {
        id: ElementId,
        direction: LayerDirection,
    },
    /// Append a default element of the given type.
    Add(ElementType),
    /// Append a fully specified element.
    Insert(Element),
    /// Append a generated image at its default placement.
    InsertImage { src: String },
    Update { id: ElementId, change: PropertyChange },
    Delete(ElementId),
    /// Append a copy offset by (+20, +20).
    Duplicate(ElementId),
    Undo,
    Redo,
}

impl EditorCommand {
    /// Short name for logs. Payloads can carry whole data URIs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::BeginDrag => "begin-drag",
            Self::EndDrag => "end-drag",
            Self::Move { .. } => "move",
            Self::Align(_) => "align",
            Self::Reorder { .. } => "reorder",
            Self::Add(_) => "add",
            Self::Insert(_) => "insert",
            Self::InsertImage { .. } => "insert-image",
            Self::Update { .. } => "update",
            Self::Delete(_) => "delete",
            Self::Duplicate(_) => "duplicate",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}
