use crate::genome::TeamGenome;
use std::collections::VecDeque;

/// Bounded stack of serialized genome snapshots; the oldest is evicted when full
#[derive(Debug, Clone)]
pub struct UndoStack {
    snapshots: VecDeque<String>,
    capacity: usize,
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, genome: &TeamGenome) {
        if self.capacity == 0 {
            return;
        }
        match serde_json::to_string(genome) {
            Ok(snapshot) => {
                if self.snapshots.len() == self.capacity {
                    self.snapshots.pop_front();
                }
                self.snapshots.push_back(snapshot);
            }
            Err(e) => log::warn!("Could not snapshot genome for undo: {}", e),
        }
    }

    /// Latest snapshot, or `None` when empty or unreadable
    pub fn pop(&mut self) -> Option<TeamGenome> {
        let snapshot = self.snapshots.pop_back()?;
        match serde_json::from_str(&snapshot) {
            Ok(genome) => Some(genome),
            Err(e) => {
                log::warn!("Discarding unreadable undo snapshot: {}", e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
