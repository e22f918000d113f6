//! Property-based tests using proptest.

use crate::board::search::{KillerTable, SearchParams};
use crate::board::view::SearchView;
use crate::board::{Board, Color, Move, MoveList, RuleConfig, Square};
use proptest::prelude::*;

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=40usize
}

/// Strategy to generate a random seed for setups and move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: apply followed by undo restores the board exactly
    #[test]
    fn prop_apply_undo_restores_board(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::random_setup(RuleConfig::default(), &mut rng);
        let original = board.clone();

        let mut played = 0;
        for _ in 0..num_moves {
            if board.is_game_over() {
                break;
            }
            let moves = board.legal_moves(board.turn());
            if moves.is_empty() {
                break;
            }
            let mv = moves.as_slice()[rng.gen_range(0..moves.len())];
            prop_assert!(board.apply_move(mv).is_ok(), "generated move {} rejected", mv);
            played += 1;
        }
        for _ in 0..played {
            prop_assert!(board.undo_last_move().is_ok());
        }

        prop_assert_eq!(board.grid, original.grid);
        prop_assert_eq!(&board.tray, &original.tray);
        prop_assert_eq!(&board.pieces, &original.pieces);
        prop_assert_eq!(board.turn(), original.turn());
        prop_assert!(!board.has_started());
    }

    /// Property: the view's incremental hash and value survive make/unmake
    #[test]
    fn prop_view_make_unmake_round_trip(
        seed in seed_strategy(),
        num_moves in move_count_strategy(),
    ) {
        use rand::prelude::*;

        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::random_setup(RuleConfig::default(), &mut rng);
        let side = if seed % 2 == 0 { Color::Red } else { Color::Blue };
        let mut view = SearchView::build(&board, side, &SearchParams::default(), seed);
        let (value, hash) = (view.value(), view.hash());

        let mut undos = Vec::new();
        for ply in 0..num_moves {
            let mut moves = MoveList::new();
            view.generate_moves(view.to_move(), &mut moves);
            let mv = if moves.is_empty() {
                Move::null()
            } else {
                moves.as_slice()[rng.gen_range(0..moves.len())]
            };
            undos.push(view.make_move(mv, ply));
            prop_assert_eq!(view.hash(), view.compute_hash());
            if view.is_decided() {
                break;
            }
        }
        while let Some(undo) = undos.pop() {
            view.unmake_move(undo);
        }

        prop_assert_eq!(view.value(), value);
        prop_assert_eq!(view.hash(), hash);
        prop_assert_eq!(view.to_move(), side);
    }

    /// Property: every move the view generates for its own side is legal on
    /// the board
    #[test]
    fn prop_view_moves_are_board_legal(seed in seed_strategy()) {
        use rand::prelude::*;

        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::random_setup(RuleConfig::default(), &mut rng);
        let view = SearchView::build(&board, Color::Red, &SearchParams::default(), seed);
        let mut moves = MoveList::new();
        view.generate_moves(Color::Red, &mut moves);
        let legal = board.legal_moves(Color::Red);
        prop_assert_eq!(moves.len(), legal.len());
        for mv in moves.iter() {
            prop_assert!(board.validate(*mv).is_ok(), "{} not legal", mv);
        }
    }

    // ========================================================================
    // Notation and killers
    // ========================================================================

    /// Property: square notation round-trips for every playable cell
    #[test]
    fn prop_square_notation_round_trip(x in 0usize..10, y in 0usize..10) {
        if let Some(sq) = Square::new(x, y) {
            let parsed: Square = sq.to_string().parse().unwrap();
            prop_assert_eq!(parsed, sq);
        }
    }

    /// Property: killer update keeps the newest move first
    #[test]
    fn prop_killer_newest_first(ply in 0usize..64, raw in 1u16..u16::MAX) {
        let mut killers = KillerTable::new();
        let first = Move::from_u16(raw);
        let second = first.reversed();
        killers.update(ply, first);
        killers.update(ply, second);
        prop_assert_eq!(killers.primary(ply), second);
        if first != second {
            prop_assert_eq!(killers.secondary(ply), first);
        }
    }
}
