//! Perft (performance test) for move generation correctness verification.

use crate::position::Position;

/// Count the leaf nodes of the legal move tree at the given depth.
///
/// Depth 0 returns 1 (the current position). The position is walked with
/// make/undo and is unchanged on return.
pub fn perft(pos: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.generate(false);
    let mut nodes = 0u64;
    for mv in moves.moves() {
        if !pos.make(mv) {
            continue;
        }
        nodes += if depth == 1 { 1 } else { perft(pos, depth - 1) };
        pos.undo();
    }
    nodes
}

/// Run perft with per-move breakdown (useful for debugging).
///
/// Returns `(iccs_move, node_count)` pairs sorted alphabetically.
pub fn divide(pos: &mut Position, depth: usize) -> Vec<(String, u64)> {
    let mut results = Vec::new();
    for mv in pos.legal_moves() {
        if !pos.make(mv) {
            continue;
        }
        let count = if depth <= 1 { 1 } else { perft(pos, depth - 1) };
        pos.undo();
        results.push((mv.to_iccs(), count));
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
