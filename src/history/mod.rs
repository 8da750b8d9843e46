//! Bounded undo/redo log of annotation mutations.
//!
//! Every action stores full `before`/`after` snapshots, so undo and redo are
//! plain inverse/forward applications against the store's raw mutators. Those
//! mutators never record, which keeps replays out of the log.

use crate::draw::{Annotation, AnnotationStore};
use log::{debug, warn};

#[cfg(test)]
mod tests;

/// Maximum number of actions retained. Older actions are dropped from the front.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Add,
    Update,
    Delete,
}

/// One recorded store mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryAction {
    /// Sequence number assigned by the editor.
    pub id: u64,
    pub kind: ActionKind,
    /// The annotation the action concerns (post-state for add/update, pre-state for delete).
    pub target: Annotation,
    pub before: Option<Annotation>,
    pub after: Option<Annotation>,
    /// Store position at the time of the action.
    pub index: usize,
    pub timestamp: u64,
}

impl HistoryAction {
    pub fn add(id: u64, annotation: Annotation, index: usize, timestamp: u64) -> Self {
        Self {
            id,
            kind: ActionKind::Add,
            target: annotation.clone(),
            before: None,
            after: Some(annotation),
            index,
            timestamp,
        }
    }

    pub fn update(
        id: u64,
        before: Annotation,
        after: Annotation,
        index: usize,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            kind: ActionKind::Update,
            target: after.clone(),
            before: Some(before),
            after: Some(after),
            index,
            timestamp,
        }
    }

    pub fn delete(id: u64, annotation: Annotation, index: usize, timestamp: u64) -> Self {
        Self {
            id,
            kind: ActionKind::Delete,
            target: annotation.clone(),
            before: Some(annotation),
            after: None,
            index,
            timestamp,
        }
    }

    fn revert(&self, store: &mut AnnotationStore) {
        match (self.kind, &self.before, &self.after) {
            (ActionKind::Add, _, Some(after)) => {
                if store.remove(&after.id).is_none() {
                    warn!("Undo add: annotation {} no longer in store", after.id);
                }
            }
            (ActionKind::Update, Some(before), _) => {
                if store.replace(before.clone()).is_none() {
                    warn!("Undo update: annotation {} no longer in store", before.id);
                }
            }
            (ActionKind::Delete, Some(before), _) => store.insert_at(self.index, before.clone()),
            _ => warn!("Malformed history action {} ({:?})", self.id, self.kind),
        }
    }

    fn reapply(&self, store: &mut AnnotationStore) {
        match (self.kind, &self.before, &self.after) {
            (ActionKind::Add, _, Some(after)) => store.insert_at(self.index, after.clone()),
            (ActionKind::Update, _, Some(after)) => {
                if store.replace(after.clone()).is_none() {
                    warn!("Redo update: annotation {} no longer in store", after.id);
                }
            }
            (ActionKind::Delete, Some(before), _) => {
                if store.remove(&before.id).is_none() {
                    warn!("Redo delete: annotation {} no longer in store", before.id);
                }
            }
            _ => warn!("Malformed history action {} ({:?})", self.id, self.kind),
        }
    }
}

/// Action log with a cursor at the last applied action.
#[derive(Debug, Clone, Default)]
pub struct History {
    actions: Vec<HistoryAction>,
    /// `None` means nothing is applied (index -1).
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action, discarding any redo branch and the oldest entries past the limit.
    pub fn record(&mut self, action: HistoryAction) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.actions.truncate(keep);
        self.actions.push(action);

        if self.actions.len() > HISTORY_LIMIT {
            let overflow = self.actions.len() - HISTORY_LIMIT;
            self.actions.drain(..overflow);
        }
        self.cursor = self.actions.len().checked_sub(1);
    }

    /// Reverts the action at the cursor. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, store: &mut AnnotationStore) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let action = &self.actions[cursor];
        debug!("Undo {:?} of {}", action.kind, action.target.id);
        action.revert(store);
        self.cursor = cursor.checked_sub(1);
        true
    }

    /// Re-applies the action after the cursor. Returns `false` at the tail.
    pub fn redo(&mut self, store: &mut AnnotationStore) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        let Some(action) = self.actions.get(next) else {
            return false;
        };
        debug!("Redo {:?} of {}", action.kind, action.target.id);
        action.reapply(store);
        self.cursor = Some(next);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.actions.len()
    }

    /// Cursor position in the `-1..len` convention.
    pub fn index(&self) -> isize {
        self.cursor.map_or(-1, |c| c as isize)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[HistoryAction] {
        &self.actions
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.cursor = None;
    }
}
