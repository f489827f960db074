//! Principal-variation alpha-beta search with null-move pruning and
//! quiescence.

use rand::Rng;
use rand::rngs::SmallRng;
use xiangqi_core::{MATE_VALUE, Move, MoveList, Position, WIN_VALUE};

use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::MoveSort;
use crate::search::tt::{Bound, TranspositionTable};
use crate::search::{LIMIT_DEPTH, NULL_DEPTH};

/// Captures worth less than this are never searched in quiescence.
const QUIESCE_MIN_VALUE: i32 = 10;
/// Captures landing on the mover's own half need at least this value.
const QUIESCE_HOME_MIN_VALUE: i32 = 20;

/// Root search outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootOutcome {
    /// Best value including jitter, used only for comparing root moves.
    pub best: i32,
    /// Value of the chosen move as searched.
    pub raw: i32,
}

/// Per-search mutable state threaded through the recursion.
pub struct SearchContext<'a> {
    pub nodes: u64,
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerTable,
    pub history: &'a mut HistoryTable,
    pub control: &'a SearchControl,
    pub rng: &'a mut SmallRng,
    pub randomness: i32,
    /// Best root move so far; also the hash move of the next iteration.
    pub root_best: Move,
}

impl SearchContext<'_> {
    /// Search every root move to `depth`, full window first, then PVS.
    pub fn search_root(&mut self, pos: &mut Position, depth: i32) -> RootOutcome {
        let mut best = -MATE_VALUE;
        let mut raw = -MATE_VALUE;
        let mut sort = MoveSort::new(self.root_best, pos, self.killers, self.history);

        while let Some(mv) = sort.next(pos, self.history) {
            if !pos.make(mv) {
                continue;
            }
            let new_depth = if pos.cached_check() { depth } else { depth - 1 };
            let value = if best == -MATE_VALUE {
                -self.search_full(pos, -MATE_VALUE, MATE_VALUE, new_depth, true)
            } else {
                let value = -self.search_full(pos, -best - 1, -best, new_depth, false);
                if value > best {
                    -self.search_full(pos, -MATE_VALUE, -best, new_depth, true)
                } else {
                    value
                }
            };
            pos.undo();
            if self.control.is_stopped() {
                return RootOutcome { best, raw };
            }

            if value > best {
                best = value;
                raw = value;
                self.root_best = mv;
                if best > -WIN_VALUE && best < WIN_VALUE {
                    best += self.jitter();
                    if best == pos.draw_value() {
                        best -= 1;
                    }
                }
            }
        }

        if !self.root_best.is_null() {
            self.set_best_move(pos, self.root_best, depth);
        }
        RootOutcome { best, raw }
    }

    /// Whether every root move other than the current best fails to reach
    /// `beta` at `depth`.
    pub fn search_unique(&mut self, pos: &mut Position, beta: i32, depth: i32) -> bool {
        let mut sort = MoveSort::new(self.root_best, pos, self.killers, self.history);
        // The first move out is the best move itself.
        sort.next(pos, self.history);

        while let Some(mv) = sort.next(pos, self.history) {
            if !pos.make(mv) {
                continue;
            }
            let new_depth = if pos.cached_check() { depth } else { depth - 1 };
            let value = -self.search_full(pos, -beta, 1 - beta, new_depth, false);
            pos.undo();
            if value >= beta {
                return false;
            }
        }
        true
    }

    /// Fail-soft alpha-beta below the root.
    pub fn search_full(
        &mut self,
        pos: &mut Position,
        mut alpha: i32,
        beta: i32,
        depth: i32,
        no_null: bool,
    ) -> i32 {
        if depth <= 0 {
            return self.search_quiesc(pos, alpha, beta);
        }
        self.nodes += 1;
        if self.control.should_stop(self.nodes) {
            return 0;
        }

        // Mate-distance pruning.
        let mate = pos.mate_value();
        if mate >= beta {
            return mate;
        }

        let rep = pos.repetition_status(1);
        if rep.is_repetition() {
            return pos.rep_value(rep);
        }

        let probe = self.tt.probe(pos, alpha, beta, depth);
        if let Some(score) = probe.score {
            return score;
        }

        if pos.distance() >= LIMIT_DEPTH {
            return pos.evaluate();
        }

        if !no_null && !pos.cached_check() && pos.null_okay() {
            pos.make_null();
            let value = -self.search_full(pos, -beta, 1 - beta, depth - NULL_DEPTH - 1, true);
            pos.undo_null();
            if self.control.is_stopped() {
                return 0;
            }
            if value >= beta
                && (pos.null_safe()
                    || self.search_full(pos, alpha, beta, depth - NULL_DEPTH, true) >= beta)
            {
                return value;
            }
        }

        let mut bound = Bound::Upper;
        let mut best = -MATE_VALUE;
        let mut best_move = Move::NULL;
        let mut sort = MoveSort::new(probe.best_move, pos, self.killers, self.history);

        while let Some(mv) = sort.next(pos, self.history) {
            if !pos.make(mv) {
                continue;
            }
            let new_depth = if pos.cached_check() || sort.single_reply() {
                depth
            } else {
                depth - 1
            };
            let value = if best == -MATE_VALUE {
                -self.search_full(pos, -beta, -alpha, new_depth, false)
            } else {
                let value = -self.search_full(pos, -alpha - 1, -alpha, new_depth, false);
                if value > alpha && value < beta {
                    -self.search_full(pos, -beta, -alpha, new_depth, false)
                } else {
                    value
                }
            };
            pos.undo();
            if self.control.is_stopped() {
                return 0;
            }

            if value > best {
                best = value;
                if value >= beta {
                    bound = Bound::Lower;
                    best_move = mv;
                    break;
                }
                if value > alpha {
                    alpha = value;
                    bound = Bound::Exact;
                    best_move = mv;
                }
            }
        }

        if best == -MATE_VALUE {
            return pos.mate_value();
        }
        self.tt.record(pos, bound, best, depth, best_move);
        if !best_move.is_null() {
            self.set_best_move(pos, best_move, depth);
        }
        best
    }

    /// Quiescence search: meaningful captures only, or every reply in check.
    pub fn search_quiesc(&mut self, pos: &mut Position, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        if self.control.should_stop(self.nodes) {
            return 0;
        }

        let mate = pos.mate_value();
        if mate >= beta {
            return mate;
        }

        let rep = pos.repetition_status(1);
        if rep.is_repetition() {
            return pos.rep_value(rep);
        }

        if pos.distance() >= LIMIT_DEPTH {
            return pos.evaluate();
        }

        let mut best = -MATE_VALUE;
        let moves = if pos.cached_check() {
            let mut moves = pos.generate(false);
            for scored in moves.as_mut_slice() {
                scored.value = self.history.score(pos.history_index(scored.mv));
            }
            moves.sort_by_value();
            moves
        } else {
            let stand_pat = pos.evaluate();
            if stand_pat >= beta {
                return stand_pat;
            }
            best = stand_pat;
            alpha = alpha.max(stand_pat);
            meaningful_captures(pos)
        };

        for mv in moves.moves() {
            if !pos.make(mv) {
                continue;
            }
            let value = -self.search_quiesc(pos, -beta, -alpha);
            pos.undo();
            if self.control.is_stopped() {
                return 0;
            }
            if value > best {
                if value >= beta {
                    return value;
                }
                best = value;
                alpha = alpha.max(value);
            }
        }

        if best == -MATE_VALUE { pos.mate_value() } else { best }
    }

    /// Reward the best move of a node: history always, killer if quiet.
    fn set_best_move(&mut self, pos: &Position, mv: Move, depth: i32) {
        self.history.update(pos.history_index(mv), depth);
        if pos.piece_at(mv.dest()).is_empty() {
            self.killers.store(pos.distance(), mv);
        }
    }

    fn jitter(&mut self) -> i32 {
        if self.randomness <= 0 {
            return 0;
        }
        self.rng.random_range(0..self.randomness) - self.rng.random_range(0..self.randomness)
    }
}

/// Captures sorted by victim value, cut at the first one not worth
/// searching.
fn meaningful_captures(pos: &Position) -> MoveList {
    let side = pos.side_to_move();
    let mut moves = pos.generate(true);
    moves.sort_by_value();
    let keep = moves
        .as_slice()
        .iter()
        .position(|scored| {
            scored.value < QUIESCE_MIN_VALUE
                || (scored.value < QUIESCE_HOME_MIN_VALUE && scored.mv.dest().home_half(side))
        })
        .unwrap_or(moves.len());
    moves.truncate(keep);
    moves
}
