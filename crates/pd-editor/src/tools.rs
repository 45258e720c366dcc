//! Tool system for canvas interactions.
//!
//! Each tool translates pointer input into `EditorCommand`s. Tools keep only
//! gesture state; selection and the element sequence live in the editor.

use crate::commands::EditorCommand;
use crate::input::InputEvent;
use pd_core::ElementId;

/// Trait for tools that handle input and produce commands.
pub trait Tool {
    /// Handle an input event. `hit` is the topmost element under a
    /// pointer-down, if any; it is `None` for every other event.
    fn handle(&mut self, event: &InputEvent, hit: Option<ElementId>) -> Vec<EditorCommand>;

    /// Drop any in-progress gesture without emitting commands.
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        id: ElementId,
        last_x: f64,
        last_y: f64,
    },
}

// ─── Select Tool ─────────────────────────────────────────────────────────

/// Click to select, drag to move.
#[derive(Debug, Default)]
pub struct SelectTool {
    state: DragState,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }
}

impl Tool for SelectTool {
    fn handle(&mut self, event: &InputEvent, hit: Option<ElementId>) -> Vec<EditorCommand> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                let mut out = Vec::new();
                // A second pointer-down without an up closes the old drag first
                if self.is_dragging() {
                    out.push(EditorCommand::EndDrag);
                }
                match hit {
                    Some(id) => {
                        self.state = DragState::Dragging {
                            id,
                            last_x: x,
                            last_y: y,
                        };
                        out.push(EditorCommand::Select(Some(id)));
                        out.push(EditorCommand::BeginDrag);
                    }
                    None => {
                        self.state = DragState::Idle;
                        out.push(EditorCommand::Select(None));
                    }
                }
                out
            }
            InputEvent::PointerMove { x, y } => {
                let DragState::Dragging { id, last_x, last_y } = self.state else {
                    return vec![];
                };
                let (dx, dy) = (x - last_x, y - last_y);
                self.state = DragState::Dragging {
                    id,
                    last_x: x,
                    last_y: y,
                };
                if dx == 0.0 && dy == 0.0 {
                    return vec![];
                }
                vec![EditorCommand::Move { id, dx, dy }]
            }
            InputEvent::PointerUp { .. } => {
                if std::mem::take(&mut self.state) == DragState::Idle {
                    vec![]
                } else {
                    vec![EditorCommand::EndDrag]
                }
            }
            InputEvent::Key { .. } => vec![],
        }
    }

    fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn click_on_element_selects_and_starts_drag() {
        let mut tool = SelectTool::new();
        let id = ElementId::intern("box");
        let cmds = tool.handle(&InputEvent::pointer_down(10.0, 10.0), Some(id));
        assert_eq!(cmds, vec![EditorCommand::Select(Some(id)), EditorCommand::BeginDrag]);
        assert!(tool.is_dragging());
    }

    #[test]
    fn click_on_empty_canvas_deselects() {
        let mut tool = SelectTool::new();
        let cmds = tool.handle(&InputEvent::pointer_down(10.0, 10.0), None);
        assert_eq!(cmds, vec![EditorCommand::Select(None)]);
        assert!(!tool.is_dragging());
    }

    #[test]
    fn moves_emit_incremental_deltas() {
        let mut tool = SelectTool::new();
        let id = ElementId::intern("box");
        tool.handle(&InputEvent::pointer_down(10.0, 10.0), Some(id));

        let first = tool.handle(&InputEvent::pointer_move(15.0, 12.0), None);
        assert_eq!(first, vec![EditorCommand::Move { id, dx: 5.0, dy: 2.0 }]);
        let second = tool.handle(&InputEvent::pointer_move(14.0, 20.0), None);
        assert_eq!(second, vec![EditorCommand::Move { id, dx: -1.0, dy: 8.0 }]);
        assert!(tool.handle(&InputEvent::pointer_move(14.0, 20.0), None).is_empty());
    }

    #[test]
    fn pointer_up_ends_drag_once() {
        let mut tool = SelectTool::new();
        tool.handle(&InputEvent::pointer_down(0.0, 0.0), Some(ElementId::intern("box")));
        assert_eq!(
            tool.handle(&InputEvent::pointer_up(0.0, 0.0), None),
            vec![EditorCommand::EndDrag]
        );
        assert!(tool.handle(&InputEvent::pointer_up(0.0, 0.0), None).is_empty());
        assert!(tool.handle(&InputEvent::pointer_move(50.0, 50.0), None).is_empty());
    }
}
