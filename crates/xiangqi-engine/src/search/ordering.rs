//! Phased move ordering: hash move, two killers, then history order.

use xiangqi_core::{Move, MoveList, Position};

use crate::search::heuristics::{HistoryTable, KillerTable};

/// Where a [`MoveSort`] is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Hash,
    Killer1,
    Killer2,
    Generate,
    Rest,
}

/// Yields each candidate move of a node once, best guesses first.
///
/// Outside check the hash move and killers come first without generating
/// anything; the rest follow in history order. In check every legal reply
/// is generated and sorted up front, which also tells whether there is only
/// one.
pub struct MoveSort {
    phase: Phase,
    hash_move: Move,
    killers: [Move; 2],
    moves: MoveList,
    index: usize,
    single_reply: bool,
}

impl MoveSort {
    pub fn new(
        hash_move: Move,
        pos: &mut Position,
        killers: &KillerTable,
        history: &HistoryTable,
    ) -> Self {
        if pos.cached_check() {
            let mut moves = MoveList::new();
            for mv in pos.generate(false).moves() {
                if !pos.make(mv) {
                    continue;
                }
                pos.undo();
                let value = if mv == hash_move {
                    i32::MAX
                } else {
                    history.score(pos.history_index(mv))
                };
                moves.push(mv, value);
            }
            moves.sort_by_value();
            let single_reply = moves.len() == 1;
            return Self {
                phase: Phase::Rest,
                hash_move: Move::NULL,
                killers: [Move::NULL; 2],
                moves,
                index: 0,
                single_reply,
            };
        }

        // A stale or colliding table entry must not inject a bogus move.
        let hash_move = if !hash_move.is_null() && pos.is_pseudo_legal(hash_move) {
            hash_move
        } else {
            Move::NULL
        };
        Self {
            phase: Phase::Hash,
            hash_move,
            killers: killers.get(pos.distance()),
            moves: MoveList::new(),
            index: 0,
            single_reply: false,
        }
    }

    /// Only one legal reply exists (meaningful in check only).
    #[inline]
    pub fn single_reply(&self) -> bool {
        self.single_reply
    }

    /// Next pseudo-legal move, or `None` when exhausted.
    pub fn next(&mut self, pos: &Position, history: &HistoryTable) -> Option<Move> {
        loop {
            match self.phase {
                Phase::Hash => {
                    self.phase = Phase::Killer1;
                    if !self.hash_move.is_null() {
                        return Some(self.hash_move);
                    }
                }
                Phase::Killer1 => {
                    self.phase = Phase::Killer2;
                    if let Some(mv) = self.usable_killer(pos, 0) {
                        return Some(mv);
                    }
                }
                Phase::Killer2 => {
                    self.phase = Phase::Generate;
                    if let Some(mv) = self.usable_killer(pos, 1) {
                        return Some(mv);
                    }
                }
                Phase::Generate => {
                    self.phase = Phase::Rest;
                    self.moves = pos.generate(false);
                    for scored in self.moves.as_mut_slice() {
                        scored.value = history.score(pos.history_index(scored.mv));
                    }
                    self.moves.sort_by_value();
                    self.index = 0;
                }
                Phase::Rest => {
                    while self.index < self.moves.len() {
                        let mv = self.moves[self.index].mv;
                        self.index += 1;
                        if mv != self.hash_move && mv != self.killers[0] && mv != self.killers[1] {
                            return Some(mv);
                        }
                    }
                    return None;
                }
            }
        }
    }

    fn usable_killer(&self, pos: &Position, slot: usize) -> Option<Move> {
        let mv = self.killers[slot];
        (!mv.is_null() && mv != self.hash_move && pos.is_pseudo_legal(mv)).then_some(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(text: &str) -> Move {
        Move::from_iccs(text).unwrap()
    }

    fn drain(sort: &mut MoveSort, pos: &Position, history: &HistoryTable) -> Vec<Move> {
        let mut out = Vec::new();
        while let Some(mv) = sort.next(pos, history) {
            out.push(mv);
        }
        out
    }

    #[test]
    fn every_move_exactly_once() {
        let mut pos = Position::starting_position();
        let mut killers = KillerTable::new();
        killers.store(0, mv("b2e2"));
        killers.store(0, mv("h0g2"));
        let history = HistoryTable::new();

        let mut sort = MoveSort::new(mv("h2e2"), &mut pos, &killers, &history);
        let order = drain(&mut sort, &pos, &history);

        assert_eq!(&order[..3], &[mv("h2e2"), mv("h0g2"), mv("b2e2")]);
        assert_eq!(order.len(), 44);
        let mut dedup = order.clone();
        dedup.sort_by_key(|m| m.raw());
        dedup.dedup();
        assert_eq!(dedup.len(), 44);
    }

    #[test]
    fn illegal_hash_and_killer_are_skipped() {
        let mut pos = Position::starting_position();
        let mut killers = KillerTable::new();
        // Not playable from the start position.
        killers.store(0, mv("e3e5"));
        let history = HistoryTable::new();

        let mut sort = MoveSort::new(mv("a0a5"), &mut pos, &killers, &history);
        let order = drain(&mut sort, &pos, &history);
        assert_eq!(order.len(), 44);
        assert!(!order.contains(&mv("a0a5")));
        assert!(!order.contains(&mv("e3e5")));
    }

    #[test]
    fn history_orders_the_rest() {
        let mut pos = Position::starting_position();
        let killers = KillerTable::new();
        let mut history = HistoryTable::new();
        history.update(pos.history_index(mv("c3c4")), 10);
        history.update(pos.history_index(mv("h2e2")), 5);

        let mut sort = MoveSort::new(Move::NULL, &mut pos, &killers, &history);
        let order = drain(&mut sort, &pos, &history);
        assert_eq!(&order[..2], &[mv("c3c4"), mv("h2e2")]);
    }

    #[test]
    fn in_check_generates_legal_replies_only() {
        // Black king on d9 checked by the rook on a9; it can only step to d8.
        let mut pos: Position = "R2k5/9/9/9/9/9/9/9/9/4K4 b".parse().unwrap();
        assert!(pos.cached_check());
        let killers = KillerTable::new();
        let history = HistoryTable::new();

        let mut sort = MoveSort::new(Move::NULL, &mut pos, &killers, &history);
        assert!(sort.single_reply());
        assert_eq!(drain(&mut sort, &pos, &history), vec![mv("d9d8")]);
    }

    #[test]
    fn in_check_puts_hash_move_first() {
        // Rook on d5 checks up the file: step aside or block with the advisor.
        let mut pos: Position = "3k5/4a4/9/9/3R5/9/9/9/9/5K3 b".parse().unwrap();
        let killers = KillerTable::new();
        let history = HistoryTable::new();

        let mut sort = MoveSort::new(mv("d9e9"), &mut pos, &killers, &history);
        assert!(!sort.single_reply());
        let order = drain(&mut sort, &pos, &history);
        assert_eq!(order, vec![mv("d9e9"), mv("e8d7")]);
    }
}
