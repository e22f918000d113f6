//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `rules.rs` - Combat table, legality, two-squares rule, win detection
//! - `make_unmake.rs` - Real move/undo correctness on the board
//! - `view.rs` - Masked view construction and incremental updates
//! - `search.rs` - Quiescence, trapped detection, iterative deepening
//! - `proptest.rs` - Property-based tests

mod proptest;
mod search;
mod view;

use super::{Board, Color, PieceId, Rank, RuleConfig, Square};

pub(super) fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

/// Take a piece from the tray and put it anywhere, ignoring setup zones.
pub(super) fn put(board: &mut Board, color: Color, rank: Rank, at: &str) -> PieceId {
    let slot = board
        .tray
        .iter()
        .position(|&id| {
            let p = board.piece(id);
            p.color() == color && p.rank() == rank
        })
        .expect("piece in tray");
    let id = board.tray.remove(slot);
    board.set_cell(sq(at), Some(id));
    id
}

/// Like [`put`], with the rank already revealed to both sides.
pub(super) fn put_known(board: &mut Board, color: Color, rank: Rank, at: &str) -> PieceId {
    let id = put(board, color, rank, at);
    board.piece_mut(id).make_known();
    id
}

/// A board with only the given pieces placed. With no flag on the board
/// nobody has won, so positions may leave both flags out.
pub(super) fn sparse(rules: RuleConfig, pieces: &[(Color, Rank, &str)]) -> Board {
    let mut board = Board::new(rules);
    for &(color, rank, at) in pieces {
        put(&mut board, color, rank, at);
    }
    board
}
