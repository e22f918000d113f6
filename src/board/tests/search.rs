//! Search algorithm tests.
//!
//! Tests for quiescence, trapped detection, the deadline, horizon handling
//! between depths, the table epoch and chase mode.

use std::time::{Duration, Instant};

use rand::prelude::*;

use super::{put, put_known, sparse, sq};
use crate::board::search::{
    find_best_move, ChaseFocus, SearchConfig, SearchContext, SearchOutcome, SearchParams,
    SearchState, INFINITY,
};
use crate::board::view::SearchView;
use crate::board::{Board, Color, Move, MoveList, Rank, RuleConfig};
use crate::sync::StopFlag;
use crate::tt::SearchMode;

const RED: Color = Color::Red;
const BLUE: Color = Color::Blue;

fn quiesce_value(board: &Board, side: Color) -> i32 {
    let config = SearchConfig::depth(4);
    let mut state = SearchState::new(1);
    state.begin_request();
    let stop = StopFlag::new();
    let view = SearchView::build(board, side, &config.params, 0);
    let mut ctx = SearchContext::new(view, &mut state, &config, &stop);
    ctx.quiesce(-INFINITY, INFINITY, 0, 0).unwrap()
}

fn search(
    board: &Board,
    side: Color,
    state: &mut SearchState,
    config: &SearchConfig,
) -> SearchOutcome {
    find_best_move(board, side, state, config, &StopFlag::new())
}

/// A Four with two captures of different worth and room to retreat.
fn fork(four: &str, five: &str, seven: &str) -> Board {
    let mut board = Board::new(RuleConfig::default());
    put_known(&mut board, RED, Rank::Four, four);
    put_known(&mut board, BLUE, Rank::Five, five);
    put_known(&mut board, BLUE, Rank::Seven, seven);
    board
}

// ============================================================================
// Quiescence
// ============================================================================

#[test]
fn quiescence_takes_the_bigger_capture() {
    let board = fork("e4", "e5", "d4");
    let view = SearchView::build(&board, RED, &SearchConfig::default().params, 0);
    let five = view.piece_at(sq("e5")).copied().unwrap();
    let expected = view.value() + view.piece_value(&five);
    assert_eq!(quiesce_value(&board, RED), expected);
}

#[test]
fn quiescence_does_not_depend_on_generation_order() {
    // Mirrored left to right, the capture loop meets the targets in the
    // opposite order.
    let board = fork("e4", "e5", "d4");
    let mirrored = fork("f4", "f5", "g4");
    assert_eq!(quiesce_value(&board, RED), quiesce_value(&mirrored, RED));
}

#[test]
fn quiescence_counts_a_threat_only_when_escape_is_impossible() {
    let mut open = Board::new(RuleConfig::default());
    put_known(&mut open, RED, Rank::Six, "e4");
    put_known(&mut open, BLUE, Rank::Three, "e5");
    let view = SearchView::build(&open, RED, &SearchConfig::default().params, 0);
    assert_eq!(quiesce_value(&open, RED), view.value());

    let mut boxed = open.clone();
    for cell in ["e3", "d4", "f4"] {
        put(&mut boxed, RED, Rank::Bomb, cell);
    }
    let view = SearchView::build(&boxed, RED, &SearchConfig::default().params, 0);
    let six = view.piece_at(sq("e4")).copied().unwrap();
    assert_eq!(quiesce_value(&boxed, RED), view.value() - view.piece_value(&six));
}

// ============================================================================
// Full searches
// ============================================================================

#[test]
fn boxed_in_side_is_trapped() {
    let mut board = Board::new(RuleConfig::default());
    put(&mut board, RED, Rank::Flag, "b1");
    put(&mut board, RED, Rank::Five, "a1");
    put(&mut board, RED, Rank::Bomb, "a2");
    put(&mut board, RED, Rank::Bomb, "c1");
    put(&mut board, RED, Rank::Bomb, "b2");
    put(&mut board, BLUE, Rank::Flag, "j10");
    put(&mut board, BLUE, Rank::Six, "e7");

    let mut state = SearchState::new(1);
    let outcome = search(&board, RED, &mut state, &SearchConfig::depth(3));
    assert_eq!(outcome, SearchOutcome::Trapped);
    assert_eq!(outcome.best_move(), None);
}

#[test]
fn search_takes_a_free_piece() {
    let mut board = Board::new(RuleConfig::default());
    put_known(&mut board, RED, Rank::Four, "e4");
    put_known(&mut board, BLUE, Rank::Six, "e5");
    put(&mut board, BLUE, Rank::Seven, "a10");

    let mut state = SearchState::new(1);
    let outcome = search(&board, RED, &mut state, &SearchConfig::depth(3));
    let SearchOutcome::Best(result) = outcome else {
        panic!("expected a move");
    };
    assert_eq!(result.best_move, Move::new(sq("e4"), sq("e5")));
    assert!(result.depth >= 3);
    assert!(!result.chase);
}

#[test]
fn fixed_depth_search_returns_a_legal_move() {
    let mut rng = StdRng::seed_from_u64(21);
    let board = Board::random_setup(RuleConfig::default(), &mut rng);
    let mut state = SearchState::new(1);
    let outcome = search(&board, RED, &mut state, &SearchConfig::depth(2));
    let mv = outcome.best_move().expect("opening position has moves");
    assert!(board.legal_moves(RED).contains(mv));
    assert!(state.stats.nodes > 0);
}

#[test]
fn stopped_search_still_answers_legally() {
    let mut rng = StdRng::seed_from_u64(4);
    let board = Board::random_setup(RuleConfig::default(), &mut rng);
    let mut state = SearchState::new(1);
    let outcome = find_best_move(
        &board,
        BLUE,
        &mut state,
        &SearchConfig::default(),
        &StopFlag::stopped(),
    );
    let SearchOutcome::Best(result) = outcome else {
        panic!("expected a move");
    };
    assert_eq!(result.depth, 0);
    assert!(board.legal_moves(BLUE).contains(result.best_move));
}

#[test]
fn table_entries_expire_with_the_request() {
    let mut rng = StdRng::seed_from_u64(8);
    let board = Board::random_setup(RuleConfig::default(), &mut rng);
    let config = SearchConfig::depth(2);
    let mut state = SearchState::new(1);
    search(&board, RED, &mut state, &config);

    let root = SearchView::build(&board, RED, &config.params, config.seed).hash();
    assert!(state.tt.probe(root, state.epoch, SearchMode::Broad).is_some());
    state.begin_request();
    assert!(state.tt.probe(root, state.epoch, SearchMode::Broad).is_none());
}

#[test]
fn deadline_counts_time_spent_before_the_search() {
    let board = fork("e4", "e5", "d4");
    let config = SearchConfig {
        time_limit_ms: 10,
        ..SearchConfig::default()
    };
    let mut state = SearchState::new(1);
    let stop = StopFlag::new();
    let view = SearchView::build(&board, RED, &config.params, 0);
    let start = Instant::now() - Duration::from_millis(50);
    let mut ctx = SearchContext::started_at(view, &mut state, &config, &stop, start);

    let SearchOutcome::Best(result) = ctx.iterate() else {
        panic!("expected a move");
    };
    assert_eq!(result.depth, 0);
    assert_eq!(ctx.nodes, 0);
}

// ============================================================================
// Horizon handling between depths
// ============================================================================

#[test]
fn deeper_result_outside_the_margin_keeps_the_standing_move() {
    let board = fork("e4", "e5", "d4");
    // No deeper iteration is ever close enough or deep enough to replace
    // the first one, so every later depth is a drop that gets extended.
    let params = SearchParams {
        horizon_margin: -1_000_000,
        horizon_depth_lead: 100,
        ..SearchParams::default()
    };
    let strict = SearchConfig {
        params: params.clone(),
        ..SearchConfig::depth(3)
    };
    let shallow = SearchConfig {
        params,
        ..SearchConfig::depth(1)
    };

    let mut state = SearchState::new(1);
    let SearchOutcome::Best(kept) = search(&board, RED, &mut state, &strict) else {
        panic!("expected a move");
    };
    let extended_nodes = state.stats.nodes;

    let mut state = SearchState::new(1);
    let SearchOutcome::Best(first) = search(&board, RED, &mut state, &shallow) else {
        panic!("expected a move");
    };

    assert_eq!(kept.depth, 1);
    assert_eq!(kept.best_move, first.best_move);
    assert_eq!(kept.value, first.value);
    assert!(extended_nodes > state.stats.nodes);
}

#[test]
fn deeper_iterations_replace_the_standing_move() {
    let board = fork("e4", "e5", "d4");
    let mut state = SearchState::new(1);
    let config = SearchConfig::depth(3);
    let SearchOutcome::Best(result) = search(&board, RED, &mut state, &config) else {
        panic!("expected a move");
    };
    assert!(result.depth >= 3);
}

// ============================================================================
// Chase helpers
// ============================================================================

#[test]
fn flight_names_the_aggressor_and_the_prey() {
    let mut board = sparse(RuleConfig::default(), &[(RED, Rank::Seven, "a1")]);
    let four = put_known(&mut board, RED, Rank::Four, "e4");
    let three = put_known(&mut board, BLUE, Rank::Three, "e5");

    let config = SearchConfig::depth(4);
    let mut state = SearchState::new(1);
    let stop = StopFlag::new();
    let view = SearchView::build(&board, RED, &config.params, 0);
    let mut ctx = SearchContext::new(view, &mut state, &config, &stop);

    let focus = ChaseFocus {
        chaser: three,
        chased: four,
    };
    assert_eq!(ctx.flight(Move::new(sq("e4"), sq("e3"))), Some(focus));
    assert_eq!(ctx.flight(Move::new(sq("e4"), sq("e5"))), None);
    assert_eq!(ctx.flight(Move::new(sq("a1"), sq("a2"))), None);
    assert_eq!(ctx.escape_count(focus), 3);

    ctx.focus = Some(focus);
    let mut moves = MoveList::new();
    ctx.generate_for_mode(RED, &mut moves);
    assert!(moves.iter().all(|mv| mv.from() == sq("e4")));
    assert!(!ctx.chase_is_over());

    ctx.view.make_move(Move::new(sq("e4"), sq("e3")), 0);
    ctx.view.make_move(Move::null(), 1);
    ctx.view.make_move(Move::new(sq("e3"), sq("e2")), 2);
    ctx.view.make_move(Move::null(), 3);
    ctx.view.make_move(Move::new(sq("e2"), sq("e1")), 4);
    assert!(ctx.chase_is_over(), "the chaser stayed four rows behind");
}

#[test]
fn repeated_flight_triggers_a_chase_search() {
    let mut board = Board::new(RuleConfig::default());
    put_known(&mut board, RED, Rank::Four, "e4");
    put_known(&mut board, BLUE, Rank::Three, "e5");

    let config = SearchConfig::depth(8);
    let params = config.params.clone();
    let mut state = SearchState::new(1);
    let SearchOutcome::Best(result) = search(&board, RED, &mut state, &config) else {
        panic!("expected a move");
    };

    assert!(result.chase);
    assert_eq!(state.stats.chase_searches, 1);
    assert_eq!(result.depth, params.chase_min_depth + params.chase_extra_depth);
    assert_eq!(result.best_move.from(), sq("e4"));
    assert_ne!(result.best_move.to(), sq("e5"), "the Four must not attack the Three");
    assert!(board.legal_moves(RED).contains(result.best_move));
}
