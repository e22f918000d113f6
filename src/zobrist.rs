//! Zobrist hashing for search-view positions.
//!
//! A piece contributes one key chosen by its side, apparent rank, known and
//! moved state, and cell. Pieces of the same apparent class are
//! interchangeable, so two positions that differ only in which unknown piece
//! sits where hash alike.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Color, Piece, Square, GRID_SIZE, RANK_SLOTS};

pub(crate) struct ZobristKeys {
    // piece_keys[color][rank][known | moved << 1][square]
    piece_keys: Box<[[[[u64; GRID_SIZE]; 4]; RANK_SLOTS]; 2]>,
    pub(crate) blue_to_move_key: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64);
        let mut piece_keys = Box::new([[[[0; GRID_SIZE]; 4]; RANK_SLOTS]; 2]);
        for color in piece_keys.iter_mut() {
            for rank in color.iter_mut() {
                for state in rank.iter_mut() {
                    for key in state.iter_mut() {
                        *key = rng.gen();
                    }
                }
            }
        }
        ZobristKeys {
            piece_keys,
            blue_to_move_key: rng.gen(),
        }
    }

    #[inline]
    pub(crate) fn piece(&self, piece: &Piece, sq: Square) -> u64 {
        let state = usize::from(piece.is_known()) | usize::from(piece.has_moved()) << 1;
        self.piece_keys[piece.color().index()][piece.rank().index()][state][sq.index()]
    }

    #[inline]
    pub(crate) fn side(&self, to_move: Color) -> u64 {
        match to_move {
            Color::Red => 0,
            Color::Blue => self.blue_to_move_key,
        }
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PieceId, Rank};

    #[test]
    fn keys_differ_by_state() {
        let sq = Square::new(4, 4).unwrap_or(Square::NONE);
        let mut p = Piece::new(PieceId(0), Color::Red, Rank::Five);
        let hidden = ZOBRIST.piece(&p, sq);
        p.make_known();
        assert_ne!(hidden, ZOBRIST.piece(&p, sq));
        assert_eq!(ZOBRIST.side(Color::Red), 0);
        assert_ne!(ZOBRIST.side(Color::Blue), 0);
    }
}
