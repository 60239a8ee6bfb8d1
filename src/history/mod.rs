//! Snapshot history with bounded undo/redo
//!
//! A `VersionedStore` keeps every committed snapshot of one document plus a
//! cursor pointing at the current one. Committing after an undo discards the
//! redo future, matching the usual editor undo model. The store does no I/O.

use std::sync::Arc;

use crate::error::{PlannerError, PlannerResult};

/// Undo/redo history over snapshots of a single document
///
/// Invariant: `states` is never empty and `0 <= current < states.len()`.
#[derive(Debug, Clone)]
pub struct VersionedStore<D> {
    states: Vec<Arc<D>>,
    current: usize,
}

impl<D> VersionedStore<D> {
    /// Create a store seeded with one snapshot
    pub fn new(seed: D) -> Self {
        Self {
            states: vec![Arc::new(seed)],
            current: 0,
        }
    }

    /// The current snapshot
    pub fn current(&self) -> &D {
        &self.states[self.current]
    }

    /// The current snapshot as a shared handle, for handing to workers
    pub fn current_arc(&self) -> Arc<D> {
        Arc::clone(&self.states[self.current])
    }

    /// Record a new snapshot, discarding any redo-able future
    pub fn commit(&mut self, snapshot: D) {
        self.commit_shared(Arc::new(snapshot));
    }

    /// Same as `commit`, reusing an already shared snapshot
    pub fn commit_shared(&mut self, snapshot: Arc<D>) {
        self.states.truncate(self.current + 1);
        self.states.push(snapshot);
        self.current = self.states.len() - 1;
    }

    /// Step back one snapshot and return it
    pub fn undo(&mut self) -> PlannerResult<&D> {
        if !self.can_undo() {
            return Err(PlannerError::NoUndoAvailable);
        }
        self.current -= 1;
        Ok(self.current())
    }

    /// Step forward one snapshot and return it
    pub fn redo(&mut self) -> PlannerResult<&D> {
        if !self.can_redo() {
            return Err(PlannerError::NoRedoAvailable);
        }
        self.current += 1;
        Ok(self.current())
    }

    /// Replace the whole history with a single snapshot
    ///
    /// Used by restores. The previous history is dropped, so a restore cannot
    /// be undone.
    pub fn reset_data(&mut self, snapshot: D) {
        self.reset_shared(Arc::new(snapshot));
    }

    /// Same as `reset_data`, reusing an already shared snapshot
    pub fn reset_shared(&mut self, snapshot: Arc<D>) {
        self.states.clear();
        self.states.push(snapshot);
        self.current = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.states.len()
    }

    /// Number of snapshots held
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Index of the current snapshot
    pub fn position(&self) -> usize {
        self.current
    }
}

impl<D: Default> Default for VersionedStore<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}
