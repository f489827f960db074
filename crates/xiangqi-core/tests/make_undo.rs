//! Property tests for incremental position state.
//!
//! Random legal games must keep the incremental score and hash equal to a
//! from-scratch rebuild, and unwinding them must restore the start exactly.

use proptest::prelude::*;
use xiangqi_core::{Position, Side, ZobristHash, hash_from_scratch};

const MIDGAME_FEN: &str = "r1bakab1r/9/1cn4cn/p1p1p1p1p/9/2P6/P3P1P1P/1C2C1N2/9/RNBAKAB1R b";

fn assert_matches_rebuild(pos: &Position) {
    let rebuilt = Position::from_snapshot(&pos.snapshot()).unwrap();
    assert_eq!(pos.key(), rebuilt.key());
    assert_eq!(pos.lock(), rebuilt.lock());
    for side in Side::ALL {
        assert_eq!(pos.score(side), rebuilt.score(side));
    }
    let incremental = ZobristHash {
        key: pos.key(),
        lock: pos.lock(),
    };
    assert_eq!(hash_from_scratch(pos), incremental);
}

/// Play `choices` as indices into the legal move list, stopping at mate.
fn play_random(pos: &mut Position, choices: &[u16]) -> usize {
    let mut played = 0;
    for &choice in choices {
        let legal = pos.legal_moves();
        if legal.is_empty() {
            break;
        }
        let mv = legal[choice as usize % legal.len()];
        assert!(pos.make(mv), "legal move {mv} rejected");
        assert_matches_rebuild(pos);
        played += 1;
    }
    played
}

proptest! {
    #[test]
    fn random_games_stay_consistent(choices in prop::collection::vec(any::<u16>(), 0..40)) {
        let mut pos = Position::starting_position();
        let start = pos.clone();
        let played = play_random(&mut pos, &choices);
        prop_assert_eq!(pos.ply_count(), played);

        for _ in 0..played {
            pos.undo();
        }
        prop_assert_eq!(pos.key(), start.key());
        prop_assert_eq!(pos.lock(), start.lock());
        prop_assert_eq!(pos.snapshot(), start.snapshot());
        prop_assert_eq!(pos.distance(), 0);
    }

    #[test]
    fn random_games_from_a_midgame(choices in prop::collection::vec(any::<u16>(), 0..30)) {
        let mut pos: Position = MIDGAME_FEN.parse().unwrap();
        let start = pos.snapshot();
        let played = play_random(&mut pos, &choices);
        for _ in 0..played {
            pos.undo();
        }
        prop_assert_eq!(pos.snapshot(), start);
    }

    #[test]
    fn null_moves_interleave_cleanly(choices in prop::collection::vec(any::<u16>(), 1..20)) {
        let mut pos = Position::starting_position();
        play_random(&mut pos, &choices);
        prop_assume!(!pos.in_check());
        let key = pos.key();
        let side = pos.side_to_move();
        pos.make_null();
        prop_assert_ne!(pos.side_to_move(), side);
        assert_matches_rebuild(&pos);
        pos.undo_null();
        prop_assert_eq!(pos.key(), key);
    }
}

#[test]
fn generated_moves_are_pseudo_legal() {
    let mut pos: Position = MIDGAME_FEN.parse().unwrap();
    for mv in pos.generate(false).moves() {
        assert!(pos.is_pseudo_legal(mv), "{mv} generated but not pseudo-legal");
    }
    for mv in pos.legal_moves() {
        assert!(pos.play(mv).is_ok());
        pos.undo();
    }
}
