//! Bounded linear undo/redo history over composite snapshots.
//!
//! A snapshot captures the surface state together with the purchase
//! list, so undoing a placement also rolls the aggregate back. The
//! stack follows standard linear-undo semantics: saving a checkpoint
//! after the cursor moved back discards the abandoned branch, and the
//! oldest snapshot is evicted once the capacity is reached.
//!
//! Checkpoint requests that arrive while a snapshot restore is in
//! progress are suppressed by an explicit state machine; without the
//! guard every undo would immediately re-push a checkpoint and corrupt
//! the stack.

use motifkit_core::constants::HISTORY_CAPACITY;
use motifkit_core::types::ItemKey;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::purchase_list::PurchaseEntry;
use crate::surface::SurfaceState;

/// Immutable capture of surface + purchase-list state.
///
/// `purchase_list` defaults to empty when deserializing states written
/// before purchase-list tracking existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub surface: SurfaceState,
    #[serde(default)]
    pub purchase_list: Vec<(ItemKey, PurchaseEntry)>,
}

/// History manager state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    /// Accepting checkpoints.
    Idle,
    /// A snapshot restore is in progress; checkpoints are suppressed.
    Replaying,
}

/// Bounded snapshot stack with a cursor.
///
/// Invariant: at least one snapshot always exists (the empty
/// composition is snapshot 0) and `cursor < len`.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
    state: HistoryState,
    capacity: usize,
}

impl History {
    /// Creates a history seeded with the initial snapshot.
    pub fn new(initial: Snapshot) -> Self {
        Self::with_capacity(initial, HISTORY_CAPACITY)
    }

    /// Creates a history with a custom capacity (tests use small ones).
    pub fn with_capacity(initial: Snapshot, capacity: usize) -> Self {
        assert!(capacity >= 1, "history capacity must be at least 1");
        Self {
            snapshots: vec![initial],
            cursor: 0,
            state: HistoryState::Idle,
            capacity,
        }
    }

    /// Current state of the replay guard.
    pub fn state(&self) -> HistoryState {
        self.state
    }

    /// Whether a restore is in progress.
    pub fn is_replaying(&self) -> bool {
        self.state == HistoryState::Replaying
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: the initial snapshot is never evicted below one.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Cursor position into the snapshot sequence.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    /// Whether undo would change state.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether redo would change state.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Appends a checkpoint at the cursor, discarding any redo branch
    /// and evicting the oldest snapshot at capacity.
    ///
    /// No-op while a restore is in progress. Returns whether the
    /// snapshot was recorded.
    pub fn save_checkpoint(&mut self, snapshot: Snapshot) -> bool {
        if self.state != HistoryState::Idle {
            return false;
        }
        if self.cursor + 1 < self.snapshots.len() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push(snapshot);
        if self.snapshots.len() > self.capacity {
            self.snapshots.remove(0);
            debug!(capacity = self.capacity, "evicted oldest history snapshot");
        }
        self.cursor = self.snapshots.len() - 1;
        true
    }

    /// Steps the cursor back, returning the snapshot to restore.
    /// Silent no-op at the lower bound.
    pub fn step_back(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Steps the cursor forward, returning the snapshot to restore.
    /// Silent no-op at the upper bound.
    pub fn step_forward(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Enters the replaying state. Restores must be bracketed by
    /// `begin_replay`/`end_replay`; nesting is a logic error.
    pub fn begin_replay(&mut self) {
        debug_assert_eq!(self.state, HistoryState::Idle, "nested snapshot restore");
        self.state = HistoryState::Replaying;
    }

    /// Returns to the idle state after a restore.
    pub fn end_replay(&mut self) {
        debug_assert_eq!(self.state, HistoryState::Replaying, "unbalanced end_replay");
        self.state = HistoryState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;

    fn snap(marker: u64) -> Snapshot {
        // Encode a marker in next_id so snapshots are distinguishable.
        let mut state = Surface::new().to_state();
        state.next_id = marker;
        Snapshot {
            surface: state,
            purchase_list: Vec::new(),
        }
    }

    #[test]
    fn initial_snapshot_bounds_undo_redo() {
        let mut h = History::new(snap(1));
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.step_back().is_none());
        assert!(h.step_forward().is_none());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut h = History::with_capacity(snap(0), 50);
        for i in 1..=60 {
            assert!(h.save_checkpoint(snap(i)));
        }
        assert_eq!(h.len(), 50);
        // 61 snapshots were pushed in total; the earliest survivor is
        // the 11th (marker 11).
        assert_eq!(h.snapshots[0].surface.next_id, 11);
        assert_eq!(h.cursor(), 49);
    }

    #[test]
    fn branch_discard_on_checkpoint_after_undo() {
        let mut h = History::with_capacity(snap(0), 50);
        h.save_checkpoint(snap(1));
        h.save_checkpoint(snap(2));
        assert_eq!(h.cursor(), 2);

        let restored = h.step_back().unwrap();
        assert_eq!(restored.surface.next_id, 1);
        assert_eq!(h.cursor(), 1);

        h.save_checkpoint(snap(3));
        assert_eq!(h.len(), 3);
        assert_eq!(h.cursor(), 2);
        let markers: Vec<u64> = h.snapshots.iter().map(|s| s.surface.next_id).collect();
        assert_eq!(markers, vec![0, 1, 3]);
        assert!(!h.can_redo());
    }

    #[test]
    fn checkpoints_suppressed_while_replaying() {
        let mut h = History::new(snap(0));
        h.save_checkpoint(snap(1));
        h.begin_replay();
        assert!(!h.save_checkpoint(snap(2)));
        h.end_replay();
        assert_eq!(h.len(), 2);
        assert!(h.save_checkpoint(snap(2)));
    }

    #[test]
    fn snapshot_without_purchase_list_deserializes_empty() {
        let json = r#"{"surface":{"objects":[],"background":null,"next_id":1}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.purchase_list.is_empty());
    }
}
