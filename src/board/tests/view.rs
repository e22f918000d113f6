//! Masked search view tests.

use rand::prelude::*;

use super::{put, put_known, sparse, sq};
use crate::board::search::SearchParams;
use crate::board::view::SearchView;
use crate::board::{Board, Color, Move, MoveList, Outcome, Rank, RuleConfig};

const RED: Color = Color::Red;
const BLUE: Color = Color::Blue;

fn build(board: &Board, side: Color) -> SearchView {
    SearchView::build(board, side, &SearchParams::default(), 1)
}

#[test]
fn hidden_opponent_pieces_are_masked() {
    let mut rng = StdRng::seed_from_u64(5);
    let board = Board::random_setup(RuleConfig::default(), &mut rng);
    let view = build(&board, RED);
    for (_, piece) in view.pieces_on_board() {
        if piece.color() == RED {
            assert_ne!(piece.rank(), Rank::Unknown);
        } else {
            assert_eq!(piece.rank(), Rank::Unknown);
            assert!(piece.value() > 0);
        }
    }
    // The authoritative board is untouched.
    assert!(board
        .pieces_on_board()
        .all(|(_, p)| p.rank() != Rank::Unknown));
}

#[test]
fn known_opponent_pieces_keep_their_rank() {
    let mut board = sparse(RuleConfig::default(), &[(RED, Rank::Five, "e2")]);
    put_known(&mut board, BLUE, Rank::Three, "e8");
    let view = build(&board, RED);
    assert_eq!(view.piece_at(sq("e8")).unwrap().rank(), Rank::Three);
}

#[test]
fn make_unmake_restores_the_view() {
    let mut rng = StdRng::seed_from_u64(9);
    let board = Board::random_setup(RuleConfig::default(), &mut rng);
    let mut view = build(&board, RED);
    let original = view.clone();

    let mut undos = Vec::new();
    for ply in 0..60 {
        let mut moves = MoveList::new();
        view.generate_moves(view.to_move(), &mut moves);
        let mv = moves.as_slice().choose(&mut rng).copied().unwrap_or(Move::null());
        undos.push(view.make_move(mv, ply));
        assert_eq!(view.hash(), view.compute_hash(), "hash drifted after {mv}");
        if view.is_decided() {
            break;
        }
    }
    while let Some(undo) = undos.pop() {
        view.unmake_move(undo);
    }

    assert_eq!(view.value(), original.value());
    assert_eq!(view.hash(), original.hash());
    assert_eq!(view.to_move(), original.to_move());
    assert_eq!(view.grid, original.grid);
    assert_eq!(view.pieces, original.pieces);
    assert_eq!(view.locations, original.locations);
    assert_eq!(view.path_len, original.path_len);
    assert_eq!(view.flag_taken, None);
}

#[test]
fn pass_only_flips_the_side() {
    let mut rng = StdRng::seed_from_u64(1);
    let board = Board::random_setup(RuleConfig::default(), &mut rng);
    let mut view = build(&board, BLUE);
    let value = view.value();
    let undo = view.make_move(Move::null(), 0);
    assert_eq!(view.to_move(), RED);
    assert_eq!(view.value(), value);
    assert_eq!(view.hash(), view.compute_hash());
    view.unmake_move(undo);
    assert_eq!(view.to_move(), BLUE);
}

#[test]
fn invincibility_follows_the_enemy_army() {
    // Blue's One is still in the tray, i.e. off the board.
    let board = sparse(
        RuleConfig::default(),
        &[
            (RED, Rank::One, "a1"),
            (RED, Rank::Two, "b1"),
            (BLUE, Rank::Spy, "j10"),
            (BLUE, Rank::Two, "i10"),
        ],
    );
    let view = build(&board, RED);
    assert!(view.is_invincible(RED, Rank::One));
    assert!(view.is_invincible(RED, Rank::Two));
    assert!(!view.is_invincible(RED, Rank::Three));
    assert!(!view.is_invincible_defender(RED, Rank::One), "the Spy lives");
    assert!(view.is_invincible_defender(RED, Rank::Two));
    assert!(!view.is_invincible(BLUE, Rank::Two));
}

#[test]
fn chasing_a_known_piece_makes_a_suspect() {
    let mut board = sparse(
        RuleConfig::default(),
        &[(BLUE, Rank::Two, "j10"), (BLUE, Rank::Six, "a10")],
    );
    put_known(&mut board, RED, Rank::Three, "e4");
    let chaser = put(&mut board, BLUE, Rank::Six, "e6");
    board.piece_mut(chaser).add_chase_rank(Rank::Three);

    let view = build(&board, RED);
    let suspect = view.piece(chaser);
    assert_eq!(suspect.rank(), Rank::Two);
    assert!(suspect.is_suspected());
    assert!(!suspect.is_known());

    // A piece that also fled from the same rank is not a suspect.
    board.piece_mut(chaser).add_flee_rank(Rank::Three);
    let view = build(&board, RED);
    assert_eq!(view.piece(chaser).rank(), Rank::Unknown);
}

#[test]
fn chasing_the_one_suggests_the_spy() {
    let mut board = sparse(RuleConfig::default(), &[(BLUE, Rank::Spy, "j10")]);
    put_known(&mut board, RED, Rank::One, "e4");
    let chaser = put(&mut board, BLUE, Rank::Seven, "e6");
    board.piece_mut(chaser).add_chase_rank(Rank::One);
    let view = build(&board, RED);
    assert_eq!(view.piece(chaser).rank(), Rank::Spy);
}

#[test]
fn destination_field_pulls_toward_a_beatable_target() {
    let mut board = Board::new(RuleConfig::default());
    let five = put(&mut board, RED, Rank::Five, "e2");
    board.piece_mut(five).record_move();
    put_known(&mut board, BLUE, Rank::Six, "e8");

    let mut view = build(&board, RED);
    let near = view.dest_value(RED, Rank::Five, sq("e3"));
    let far = view.dest_value(RED, Rank::Five, sq("e2"));
    assert_eq!(near, far + 1);
    assert_eq!(view.dest_value(RED, Rank::Five, sq("e7")), 9);

    let before = view.value();
    view.make_move(Move::new(sq("e2"), sq("e3")), 0);
    assert_eq!(view.value(), before + 1);
}

#[test]
fn unmoved_hidden_pieces_only_attack() {
    let board = sparse(
        RuleConfig::default(),
        &[
            (RED, Rank::Five, "e4"),
            (BLUE, Rank::Six, "e5"),
            (BLUE, Rank::Seven, "a10"),
        ],
    );
    let view = build(&board, RED);
    let mut moves = MoveList::new();
    view.generate_moves(BLUE, &mut moves);
    assert_eq!(moves.as_slice(), &[Move::new(sq("e5"), sq("e4"))]);
    assert!(view.has_suppressed(BLUE));

    let params = SearchParams {
        suppress_unmoved_unknowns: false,
        ..SearchParams::default()
    };
    let open = SearchView::build(&board, RED, &params, 1);
    let mut moves = MoveList::new();
    open.generate_moves(BLUE, &mut moves);
    assert_eq!(moves.len(), 5);
}

#[test]
fn search_side_always_obeys_two_squares() {
    let mut board = sparse(
        RuleConfig::without_two_squares(),
        &[(RED, Rank::Five, "e2"), (BLUE, Rank::Five, "e9")],
    );
    for (from, to) in [("e2", "e3"), ("e9", "e8"), ("e3", "e2"), ("e8", "e9")] {
        board.apply_move(Move::new(sq(from), sq(to))).unwrap();
    }
    let params = SearchParams {
        suppress_unmoved_unknowns: false,
        ..SearchParams::default()
    };
    let view = SearchView::build(&board, RED, &params, 1);
    let mut red = MoveList::new();
    view.generate_moves(RED, &mut red);
    assert!(!red.contains(Move::new(sq("e2"), sq("e3"))));

    let mut blue = MoveList::new();
    view.generate_moves(BLUE, &mut blue);
    assert!(blue.contains(Move::new(sq("e9"), sq("e8"))));
}

#[test]
fn search_side_may_not_attack_along_a_repeated_leg() {
    let mut board = sparse(
        RuleConfig::without_two_squares(),
        &[
            (RED, Rank::Five, "e2"),
            (BLUE, Rank::Five, "e9"),
            (BLUE, Rank::Seven, "d3"),
        ],
    );
    for (from, to) in [("e2", "e3"), ("e9", "e8"), ("e3", "e2"), ("d3", "e3")] {
        board.apply_move(Move::new(sq(from), sq(to))).unwrap();
    }
    let view = SearchView::build(&board, RED, &SearchParams::default(), 1);
    let mut red = MoveList::new();
    view.generate_moves(RED, &mut red);
    assert!(!red.contains(Move::new(sq("e2"), sq("e3"))));
    assert!(red.contains(Move::new(sq("e2"), sq("d2"))));
}

#[test]
fn hidden_defender_is_beaten_only_when_nothing_can_match() {
    let mut board = sparse(RuleConfig::default(), &[(RED, Rank::Two, "e4")]);
    let target = put(&mut board, BLUE, Rank::Five, "e5");
    board.piece_mut(target).record_move();
    let view = build(&board, RED);
    let (a, d) = (
        *view.piece_at(sq("e4")).unwrap(),
        *view.piece_at(sq("e5")).unwrap(),
    );
    assert_eq!(view.resolve(&a, &d), Outcome::Wins);

    put(&mut board, BLUE, Rank::Two, "a10");
    let view = build(&board, RED);
    assert_eq!(view.resolve(&a, &d), Outcome::Even);
}

#[test]
fn hidden_attacker_on_a_bomb_loses_without_sappers() {
    let mut board = sparse(RuleConfig::default(), &[(RED, Rank::Five, "a1")]);
    put_known(&mut board, RED, Rank::Bomb, "e4");
    let blue = put(&mut board, BLUE, Rank::Seven, "e5");
    board.piece_mut(blue).record_move();
    let view = build(&board, RED);
    let (a, d) = (
        *view.piece_at(sq("e5")).unwrap(),
        *view.piece_at(sq("e4")).unwrap(),
    );
    assert_eq!(view.resolve(&a, &d), Outcome::Loses);
}

#[test]
fn hidden_piece_standing_up_to_a_newcomer_may_bluff() {
    let army = [
        (RED, Rank::Five, "e4"),
        (RED, Rank::Two, "j1"),
        (RED, Rank::Six, "a1"),
        (BLUE, Rank::Seven, "j10"),
    ];
    let mut arrived = sparse(RuleConfig::default(), &army);
    put_known(&mut arrived, BLUE, Rank::Three, "d5");
    let mut settled = sparse(RuleConfig::default(), &army);
    put_known(&mut settled, BLUE, Rank::Three, "e5");
    for (board, (from, to)) in [(&mut arrived, ("d5", "e5")), (&mut settled, ("j10", "j9"))] {
        board.apply_move(Move::new(sq("a1"), sq("a2"))).unwrap();
        board.apply_move(Move::new(sq(from), sq(to))).unwrap();
    }

    let attack = Move::new(sq("e4"), sq("e5"));
    let swing = |board: &Board, ply: usize| {
        let mut view = build(board, RED);
        let before = view.value();
        view.make_move(attack, ply);
        view.value() - before
    };
    let view = build(&arrived, RED);
    let three = view.piece_at(sq("e5")).copied().unwrap();
    let bluff = view.piece_value(&three) / 5;
    assert!(bluff > 0);
    assert_eq!(swing(&arrived, 1), swing(&settled, 1) + bluff);

    // The move actually played earns nothing for the bluff.
    assert_eq!(swing(&arrived, 0), swing(&settled, 0));
}
