//! The editor: selection, interaction and history around one element
//! sequence on a fixed canvas.

use crate::commands::{Alignment, EditorCommand};
use crate::error::EditorError;
use crate::history::History;
use crate::input::InputEvent;
use crate::layers::{LayerDirection, reorder};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{DragState, SelectTool, Tool};
use pd_core::{
    CanvasSize, Element, ElementId, ElementKind, ElementSequence, ElementType, Frame, ImageContent, ShapeContent,
    TextContent, find, position,
};

/// Offset applied to duplicated elements.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// How pointer drags are recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragCommit {
    /// One undo step per drag gesture.
    #[default]
    Gesture,
    /// One undo step per pointer move.
    EveryMove,
}

#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub drag_commit: DragCommit,
    /// `None` keeps every undo step.
    pub max_history: Option<usize>,
    /// Distance from the canvas edge for left/right alignment.
    pub align_margin: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_commit: DragCommit::Gesture,
            max_history: None,
            align_margin: 50.0,
        }
    }
}

pub struct Editor {
    canvas: CanvasSize,
    config: EditorConfig,
    history: History,
    selected: Option<ElementId>,
    tool: SelectTool,
    /// Bumped whenever `present` changes, including undo/redo.
    revision: u64,
}

impl Editor {
    pub fn new(canvas: CanvasSize, config: EditorConfig) -> Self {
        Self::with_elements(canvas, Vec::new(), config)
    }

    pub fn with_elements(canvas: CanvasSize, elements: ElementSequence, config: EditorConfig) -> Self {
        let history = History::new(elements).with_max_depth(config.max_history);
        Self {
            canvas,
            config,
            history,
            selected: None,
            tool: SelectTool::new(),
            revision: 0,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn elements(&self) -> &[Element] {
        self.history.present()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        find(self.elements(), id)
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.element(id))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_dragging(&self) -> bool {
        self.tool.is_dragging()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the sequence with `elements` and forget all history.
    pub fn load(&mut self, elements: ElementSequence) {
        self.tool.cancel();
        self.history.reset(elements);
        self.selected = None;
        self.revision += 1;
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route a raw input event through the select tool or shortcut map and
    /// dispatch whatever commands it produces.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<(), EditorError> {
        let commands = match event {
            InputEvent::Key {
                key,
                ctrl,
                shift,
                alt,
                meta,
            } => match ShortcutMap::resolve(key, *ctrl, *shift, *alt, *meta) {
                Some(action) => self.shortcut_commands(action),
                None => return Ok(()),
            },
            InputEvent::PointerDown { x, y } => {
                let hit = pd_render::hit_test(self.elements(), *x, *y);
                self.tool.handle(event, hit)
            }
            InputEvent::PointerMove { .. } | InputEvent::PointerUp { .. } => self.tool.handle(event, None),
        };

        for command in commands {
            self.dispatch(command)?;
        }
        Ok(())
    }

    fn shortcut_commands(&self, action: ShortcutAction) -> Vec<EditorCommand> {
        let on_selection =
            |make: fn(ElementId) -> EditorCommand| -> Vec<EditorCommand> { self.selected.map(make).into_iter().collect() };
        let restack = |direction: LayerDirection| -> Vec<EditorCommand> {
            self.selected
                .map(|id| EditorCommand::Reorder { id, direction })
                .into_iter()
                .collect()
        };

        match action {
            ShortcutAction::Undo => vec![EditorCommand::Undo],
            ShortcutAction::Redo => vec![EditorCommand::Redo],
            ShortcutAction::Delete => on_selection(EditorCommand::Delete),
            ShortcutAction::Duplicate => on_selection(EditorCommand::Duplicate),
            ShortcutAction::BringForward => restack(LayerDirection::Up),
            ShortcutAction::SendBackward => restack(LayerDirection::Down),
            ShortcutAction::BringToFront => restack(LayerDirection::Top),
            ShortcutAction::SendToBack => restack(LayerDirection::Bottom),
            ShortcutAction::Deselect => vec![EditorCommand::Select(None)],
        }
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn dispatch(&mut self, command: EditorCommand) -> Result<(), EditorError> {
        log::debug!("dispatch {}", command.label());
        match command {
            EditorCommand::Select(id) => {
                if let Some(id) = id {
                    self.require(id)?;
                }
                self.selected = id;
            }
            EditorCommand::BeginDrag => {
                if self.config.drag_commit == DragCommit::Gesture {
                    self.history.begin_gesture();
                }
            }
            EditorCommand::EndDrag => {
                self.history.end_gesture();
            }
            EditorCommand::Move { id, dx, dy } => self.move_by(id, dx, dy)?,
            EditorCommand::Align(alignment) => self.align(alignment),
            EditorCommand::Reorder { id, direction } => {
                if let Some(next) = reorder(self.elements(), id, direction) {
                    self.commit(next);
                }
            }
            EditorCommand::Add(element_type) => {
                let el = self.default_element(element_type);
                self.append(el);
            }
            EditorCommand::Insert(el) => {
                if self.element(el.id).is_some() {
                    return Err(EditorError::DuplicateId(el.id));
                }
                self.append(el);
            }
            EditorCommand::InsertImage { src } => {
                let el = self.generated_image(src);
                self.append(el);
            }
            EditorCommand::Update { id, change } => {
                let index = self.require(id)?;
                let updated = change.apply(&self.elements()[index])?;
                if updated != self.elements()[index] {
                    self.replace_at(index, updated);
                }
            }
            EditorCommand::Delete(id) => {
                let index = self.require(id)?;
                let mut next = self.elements().to_vec();
                next.remove(index);
                self.commit(next);
                if self.selected == Some(id) {
                    self.selected = None;
                }
                if let DragState::Dragging { id: dragged, .. } = self.tool.state()
                    && dragged == id
                {
                    self.tool.cancel();
                }
            }
            EditorCommand::Duplicate(id) => {
                let index = self.require(id)?;
                let copy = self.elements()[index].duplicate(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
                self.append(copy);
            }
            EditorCommand::Undo => {
                if self.history.undo() {
                    self.after_history_jump();
                }
            }
            EditorCommand::Redo => {
                if self.history.redo() {
                    self.after_history_jump();
                }
            }
        }
        Ok(())
    }

    // ─── Helpers ─────────────────────────────────────────────────────────

    fn require(&self, id: ElementId) -> Result<usize, EditorError> {
        position(self.elements(), id).ok_or(EditorError::UnknownElement(id))
    }

    fn commit(&mut self, next: ElementSequence) {
        self.history.commit(next);
        self.revision += 1;
    }

    fn replace_at(&mut self, index: usize, el: Element) {
        let mut next = self.elements().to_vec();
        next[index] = el;
        self.commit(next);
    }

    fn append(&mut self, el: Element) {
        let id = el.id;
        let mut next = self.elements().to_vec();
        next.push(el);
        self.commit(next);
        self.selected = Some(id);
    }

    fn after_history_jump(&mut self) {
        self.tool.cancel();
        self.revision += 1;
        if self.selected_element().is_none() {
            self.selected = None;
        }
    }

    /// Translate by `(dx, dy)`, clamping the top-left into
    /// `[0, W − w] × [0, H − h]`. Elements larger than the canvas pin to 0.
    fn move_by(&mut self, id: ElementId, dx: f64, dy: f64) -> Result<(), EditorError> {
        let index = self.require(id)?;
        let el = &self.elements()[index];
        let max_x = self.canvas.width_f64() - el.frame.width;
        let max_y = self.canvas.height_f64() - el.frame.height;
        let x = (el.frame.x + dx).min(max_x).max(0.0);
        let y = (el.frame.y + dy).min(max_y).max(0.0);
        if x == el.frame.x && y == el.frame.y {
            return Ok(());
        }

        let mut moved = el.clone();
        moved.frame.x = x;
        moved.frame.y = y;
        let mut next = self.elements().to_vec();
        next[index] = moved;

        if self.history.in_gesture() {
            self.history.preview(next);
            self.revision += 1;
        } else {
            self.commit(next);
        }
        Ok(())
    }

    /// Recompute only `x` of the selected element. Nothing selected is a no-op.
    fn align(&mut self, alignment: Alignment) {
        let Some(index) = self.selected.and_then(|id| position(self.elements(), id)) else {
            return;
        };
        let el = &self.elements()[index];
        let width = self.canvas.width_f64();
        let margin = self.config.align_margin;
        let x = match alignment {
            Alignment::Left => margin,
            Alignment::Center => (width - el.frame.width) / 2.0,
            Alignment::Right => width - el.frame.width - margin,
        };
        if x == el.frame.x {
            return;
        }
        let mut aligned = el.clone();
        aligned.frame.x = x;
        self.replace_at(index, aligned);
    }

    /// Default element of `element_type`, placed around the canvas center.
    pub fn default_element(&self, element_type: ElementType) -> Element {
        let x = self.canvas.width_f64() / 2.0 - 100.0;
        let y = self.canvas.height_f64() / 2.0 - 50.0;
        match element_type {
            ElementType::Text => Element::new(Frame::new(x, y, 200.0, 100.0), ElementKind::Text(TextContent::default())),
            ElementType::Image => {
                Element::new(Frame::new(x, y, 300.0, 300.0), ElementKind::Image(ImageContent::default()))
            }
            ElementType::Shape => {
                Element::new(Frame::new(x, y, 200.0, 100.0), ElementKind::Shape(ShapeContent::default()))
            }
        }
    }

    /// A 400×400 image centered on the canvas.
    pub fn generated_image(&self, src: impl Into<String>) -> Element {
        let x = self.canvas.width_f64() / 2.0 - 200.0;
        let y = self.canvas.height_f64() / 2.0 - 200.0;
        Element::new(
            Frame::new(x, y, 400.0, 400.0),
            ElementKind::Image(ImageContent { src: src.into() }),
        )
    }
}
