//! Undo/redo history over whole element sequences.
//!
//! `present` is only ever replaced wholesale. Every commit pushes the old
//! `present` onto `past`; undo and redo shuttle snapshots between `past`
//! and the front of `future`.
//!
//! Drag gestures use **snapshot batching**: `begin_gesture` captures
//! `present`, `preview` updates it live without touching either stack, and
//! `end_gesture` records the captured snapshot as one undo step if anything
//! changed.

use pd_core::ElementSequence;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct History {
    past: Vec<ElementSequence>,
    present: ElementSequence,
    future: VecDeque<ElementSequence>,
    /// Oldest `past` entries are dropped beyond this depth. `None` = unbounded.
    max_depth: Option<usize>,
    /// `present` as it was when the open gesture began.
    gesture_snapshot: Option<ElementSequence>,
}

impl History {
    pub fn new(present: ElementSequence) -> Self {
        Self {
            present,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self.trim();
        self
    }

    pub fn present(&self) -> &ElementSequence {
        &self.present
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty() || self.gesture_changed()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture_snapshot.is_some()
    }

    /// Make `next` the present state as a new undo step. Clears redo.
    pub fn commit(&mut self, next: ElementSequence) {
        self.end_gesture();
        let previous = std::mem::replace(&mut self.present, next);
        self.push_past(previous);
        log::debug!("history commit: {} undo steps", self.past.len());
    }

    /// Returns whether anything was undone.
    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Returns whether anything was redone.
    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        self.trim();
        true
    }

    /// Start batching. A gesture that is already open keeps its snapshot.
    pub fn begin_gesture(&mut self) {
        if self.gesture_snapshot.is_none() {
            self.gesture_snapshot = Some(self.present.clone());
        }
    }

    /// Replace `present` inside a gesture without recording an undo step.
    /// Outside a gesture this is a plain [`commit`](Self::commit).
    pub fn preview(&mut self, next: ElementSequence) {
        if self.in_gesture() {
            self.present = next;
        } else {
            self.commit(next);
        }
    }

    /// Close the open gesture. Returns whether it recorded an undo step.
    pub fn end_gesture(&mut self) -> bool {
        let Some(snapshot) = self.gesture_snapshot.take() else {
            return false;
        };
        if snapshot == self.present {
            return false;
        }
        self.push_past(snapshot);
        log::debug!("history gesture committed: {} undo steps", self.past.len());
        true
    }

    /// Replace everything with `present` and an empty history.
    pub fn reset(&mut self, present: ElementSequence) {
        self.past.clear();
        self.future.clear();
        self.gesture_snapshot = None;
        self.present = present;
    }

    fn gesture_changed(&self) -> bool {
        self.gesture_snapshot
            .as_ref()
            .is_some_and(|snapshot| *snapshot != self.present)
    }

    fn push_past(&mut self, entry: ElementSequence) {
        self.past.push(entry);
        self.future.clear();
        self.trim();
    }

    fn trim(&mut self) {
        if let Some(max) = self.max_depth
            && self.past.len() > max
        {
            let excess = self.past.len() - max;
            self.past.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::{Element, ElementId, ElementKind, Frame, ShapeContent};
    use pretty_assertions::assert_eq;

    fn seq(xs: &[f64]) -> ElementSequence {
        xs.iter()
            .enumerate()
            .map(|(i, &x)| {
                Element::with_id(
                    ElementId::intern(&format!("el-{i}")),
                    Frame::new(x, 0.0, 10.0, 10.0),
                    ElementKind::Shape(ShapeContent::default()),
                )
            })
            .collect()
    }

    #[test]
    fn undo_redo_on_empty_stacks_is_noop() {
        let mut h = History::new(seq(&[1.0]));
        assert!(!h.undo());
        assert!(!h.redo());
        assert_eq!(h.present(), &seq(&[1.0]));
    }

    #[test]
    fn undo_moves_present_to_front_of_future() {
        let mut h = History::new(seq(&[]));
        h.commit(seq(&[1.0]));
        h.commit(seq(&[2.0]));
        h.undo();
        h.undo();
        assert_eq!(h.present(), &seq(&[]));
        assert_eq!(h.future_len(), 2);

        h.redo();
        assert_eq!(h.present(), &seq(&[1.0]));
        h.redo();
        assert_eq!(h.present(), &seq(&[2.0]));
        assert!(!h.can_redo());
    }

    #[test]
    fn commit_after_undo_clears_future() {
        let mut h = History::new(seq(&[]));
        h.commit(seq(&[1.0]));
        h.undo();
        assert!(h.can_redo());
        h.commit(seq(&[5.0]));
        assert!(!h.can_redo());
    }

    #[test]
    fn gesture_is_single_step() {
        let mut h = History::new(seq(&[0.0]));
        h.begin_gesture();
        for x in 1..=5 {
            h.preview(seq(&[x as f64]));
        }
        assert_eq!(h.past_len(), 0);
        assert!(h.end_gesture());
        assert_eq!(h.past_len(), 1);

        h.undo();
        assert_eq!(h.present(), &seq(&[0.0]));
        h.redo();
        assert_eq!(h.present(), &seq(&[5.0]));
    }

    #[test]
    fn empty_gesture_records_nothing() {
        let mut h = History::new(seq(&[0.0]));
        h.begin_gesture();
        h.preview(seq(&[3.0]));
        h.preview(seq(&[0.0]));
        assert!(!h.end_gesture());
        assert!(!h.can_undo());
    }

    #[test]
    fn undo_closes_open_gesture_first() {
        let mut h = History::new(seq(&[0.0]));
        h.begin_gesture();
        h.preview(seq(&[7.0]));
        assert!(h.can_undo());
        assert!(h.undo());
        assert_eq!(h.present(), &seq(&[0.0]));
        assert!(!h.in_gesture());
        h.redo();
        assert_eq!(h.present(), &seq(&[7.0]));
    }

    #[test]
    fn max_depth_trims_oldest() {
        let mut h = History::new(seq(&[])).with_max_depth(Some(3));
        for i in 0..5 {
            h.commit(seq(&[i as f64]));
        }
        let mut undo_count = 0;
        while h.undo() {
            undo_count += 1;
        }
        assert_eq!(undo_count, 3);
        assert_eq!(h.present(), &seq(&[1.0]));
    }

    #[test]
    fn reset_drops_history() {
        let mut h = History::new(seq(&[]));
        h.commit(seq(&[1.0]));
        h.undo();
        h.reset(seq(&[9.0]));
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.present(), &seq(&[9.0]));
    }
}
