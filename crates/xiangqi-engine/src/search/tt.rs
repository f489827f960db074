//! Transposition table indexed by `key & mask` and validated by the lock.
//!
//! Mate scores are stored relative to the node rather than the root, so an
//! entry stays correct when the same position is reached at another
//! distance. Perpetual-check scores depend on the path and are never
//! trusted on read.

use xiangqi_core::{BAN_VALUE, Move, Position, WIN_VALUE};

/// Bound type stored in an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    /// Empty slot.
    #[default]
    None,
    /// Failed high: the true score is at least the stored one.
    Lower,
    /// Failed low: the true score is at most the stored one.
    Upper,
    /// Exact score from a PV node.
    Exact,
}

#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    lock: u64,
    depth: i32,
    bound: Bound,
    value: i32,
    best_move: Move,
}

/// Result of a probe.
///
/// `best_move` is filled whenever the lock matches, even if the score is
/// not usable for a cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtProbe {
    pub best_move: Move,
    pub score: Option<i32>,
}

impl TtProbe {
    const MISS: TtProbe = TtProbe {
        best_move: Move::NULL,
        score: None,
    };
}

/// Single-threaded transposition table with `1 << hash_level` slots.
pub struct TranspositionTable {
    entries: Vec<Entry>,
    mask: u64,
}

impl TranspositionTable {
    /// Largest accepted hash level; bigger requests are clamped.
    pub const MAX_LEVEL: u32 = 26;

    pub fn new(hash_level: u32) -> Self {
        let level = hash_level.min(Self::MAX_LEVEL);
        let size = 1usize << level;
        Self {
            entries: vec![Entry::default(); size],
            mask: size as u64 - 1,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reset every slot, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.fill(Entry::default());
    }

    #[inline]
    fn slot(&self, pos: &Position) -> usize {
        (pos.key() & self.mask) as usize
    }

    /// Look up the current position for the window `(alpha, beta)` at `depth`.
    pub fn probe(&self, pos: &Position, alpha: i32, beta: i32, depth: i32) -> TtProbe {
        let entry = &self.entries[self.slot(pos)];
        if entry.bound == Bound::None || entry.lock != pos.lock() {
            return TtProbe::MISS;
        }
        let distance = pos.distance() as i32;
        let mut value = entry.value;
        let mut mate = false;
        if value > WIN_VALUE {
            if value <= BAN_VALUE {
                return TtProbe {
                    best_move: entry.best_move,
                    score: None,
                };
            }
            value -= distance;
            mate = true;
        } else if value < -WIN_VALUE {
            if value >= -BAN_VALUE {
                return TtProbe {
                    best_move: entry.best_move,
                    score: None,
                };
            }
            value += distance;
            mate = true;
        } else if value == pos.draw_value() {
            return TtProbe {
                best_move: entry.best_move,
                score: None,
            };
        }

        let usable = (entry.depth >= depth || mate)
            && match entry.bound {
                Bound::Lower => value >= beta,
                Bound::Upper => value <= alpha,
                Bound::Exact => true,
                Bound::None => false,
            };
        TtProbe {
            best_move: entry.best_move,
            score: usable.then_some(value),
        }
    }

    /// Store a search result for the current position.
    ///
    /// A slot holding a deeper result is left alone. Perpetual-check scores
    /// and bare draw values are only worth keeping for their move, so they
    /// are skipped when there is none.
    pub fn record(&mut self, pos: &Position, bound: Bound, value: i32, depth: i32, best_move: Move) {
        let slot = self.slot(pos);
        if self.entries[slot].depth > depth {
            return;
        }
        let distance = pos.distance() as i32;
        let stored = if value > WIN_VALUE {
            if best_move.is_null() && value <= BAN_VALUE {
                return;
            }
            value + distance
        } else if value < -WIN_VALUE {
            if best_move.is_null() && value >= -BAN_VALUE {
                return;
            }
            value - distance
        } else if value == pos.draw_value() && best_move.is_null() {
            return;
        } else {
            value
        };
        self.entries[slot] = Entry {
            lock: pos.lock(),
            depth,
            bound,
            value: stored,
            best_move,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_core::MATE_VALUE;

    fn h2e2() -> Move {
        Move::from_iccs("h2e2").unwrap()
    }

    #[test]
    fn size_follows_hash_level() {
        assert_eq!(TranspositionTable::new(10).len(), 1024);
        assert_eq!(
            TranspositionTable::new(40).len(),
            1 << TranspositionTable::MAX_LEVEL
        );
    }

    #[test]
    fn exact_entry_round_trips() {
        let mut tt = TranspositionTable::new(12);
        let pos = Position::starting_position();
        tt.record(&pos, Bound::Exact, 37, 4, h2e2());
        let hit = tt.probe(&pos, -100, 100, 4);
        assert_eq!(hit.best_move, h2e2());
        assert_eq!(hit.score, Some(37));
    }

    #[test]
    fn shallow_entry_gives_move_but_no_score() {
        let mut tt = TranspositionTable::new(12);
        let pos = Position::starting_position();
        tt.record(&pos, Bound::Exact, 37, 2, h2e2());
        let hit = tt.probe(&pos, -100, 100, 5);
        assert_eq!(hit.best_move, h2e2());
        assert_eq!(hit.score, None);
    }

    #[test]
    fn bounds_respect_the_window() {
        let mut tt = TranspositionTable::new(12);
        let pos = Position::starting_position();
        tt.record(&pos, Bound::Lower, 50, 3, h2e2());
        assert_eq!(tt.probe(&pos, 0, 40, 3).score, Some(50));
        assert_eq!(tt.probe(&pos, 0, 60, 3).score, None);

        tt.record(&pos, Bound::Upper, -50, 3, Move::NULL);
        assert_eq!(tt.probe(&pos, -40, 0, 3).score, Some(-50));
        assert_eq!(tt.probe(&pos, -60, 0, 3).score, None);
    }

    #[test]
    fn deeper_entries_are_kept() {
        let mut tt = TranspositionTable::new(12);
        let pos = Position::starting_position();
        tt.record(&pos, Bound::Exact, 10, 6, h2e2());
        tt.record(&pos, Bound::Exact, 99, 2, Move::NULL);
        assert_eq!(tt.probe(&pos, -100, 100, 6).score, Some(10));
    }

    #[test]
    fn mate_scores_are_distance_relative() {
        let mut tt = TranspositionTable::new(12);
        let mut pos = Position::starting_position();
        pos.make_null();
        pos.make_null();
        // Mate five plies from the root, recorded at distance 2.
        let value = MATE_VALUE - 5;
        tt.record(&pos, Bound::Exact, value, 1, h2e2());
        pos.reset_distance();
        // Reached again as the root, the mate is three plies away.
        assert_eq!(tt.probe(&pos, -MATE_VALUE, MATE_VALUE, 30).score, Some(value + 2));
    }

    #[test]
    fn perpetual_scores_are_never_used() {
        let mut tt = TranspositionTable::new(12);
        let pos = Position::starting_position();
        tt.record(&pos, Bound::Exact, BAN_VALUE - 10, 3, Move::NULL);
        assert_eq!(tt.probe(&pos, -MATE_VALUE, MATE_VALUE, 1), TtProbe::MISS);

        tt.record(&pos, Bound::Exact, BAN_VALUE - 10, 3, h2e2());
        let hit = tt.probe(&pos, -MATE_VALUE, MATE_VALUE, 1);
        assert_eq!(hit.best_move, h2e2());
        assert_eq!(hit.score, None);
    }

    #[test]
    fn bare_draw_value_is_not_stored() {
        let mut tt = TranspositionTable::new(12);
        let pos = Position::starting_position();
        tt.record(&pos, Bound::Exact, pos.draw_value(), 3, Move::NULL);
        assert_eq!(tt.probe(&pos, -MATE_VALUE, MATE_VALUE, 1), TtProbe::MISS);
    }

    #[test]
    fn lock_mismatch_is_a_miss() {
        // A single slot: every position shares it.
        let mut tt = TranspositionTable::new(0);
        let pos = Position::starting_position();
        tt.record(&pos, Bound::Exact, 5, 3, h2e2());
        let mut other = pos.clone();
        other.make_null();
        assert_eq!(tt.probe(&other, -100, 100, 1), TtProbe::MISS);
        assert_eq!(tt.probe(&pos, -100, 100, 1).score, Some(5));
        tt.clear();
        assert_eq!(tt.probe(&pos, -100, 100, 1), TtProbe::MISS);
    }
}
