//! Killer move table and history heuristic for move ordering.

use xiangqi_core::{Move, Piece};

use crate::search::LIMIT_DEPTH;

/// Two killer moves per ply: quiet moves that were best in a sibling node.
pub struct KillerTable {
    slots: [[Move; 2]; LIMIT_DEPTH + 1],
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; LIMIT_DEPTH + 1],
        }
    }

    /// Store a killer move at the given ply.
    ///
    /// Shifts slot 0 to slot 1 if the new move differs from slot 0.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slots) = self.slots.get_mut(ply) else {
            return;
        };
        if slots[0] != mv {
            slots[1] = slots[0];
            slots[0] = mv;
        }
    }

    /// Both killers at `ply`, most recent first.
    pub fn get(&self, ply: usize) -> [Move; 2] {
        self.slots.get(ply).copied().unwrap_or([Move::NULL; 2])
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; LIMIT_DEPTH + 1];
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// History scores indexed by [`Position::history_index`](xiangqi_core::Position::history_index).
pub struct HistoryTable {
    table: Vec<i32>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            table: vec![0; Piece::COUNT * 256],
        }
    }

    /// Reward the best move of a node searched to `depth`.
    pub fn update(&mut self, index: usize, depth: i32) {
        if let Some(entry) = self.table.get_mut(index) {
            *entry = entry.saturating_add(depth.saturating_mul(depth));
        }
    }

    pub fn score(&self, index: usize) -> i32 {
        self.table.get(index).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.table.fill(0);
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}
