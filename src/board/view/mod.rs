//! Masked search view.
//!
//! A private copy of the board built once per engine invocation:
//! - opponent pieces that have not been revealed carry [`Rank::Unknown`](super::Rank::Unknown)
//!   (or a suspected rank inferred from their behaviour) and a heuristic value
//! - per-rank counts drive invincibility and the value tables
//! - destination fields bias quiet moves toward useful targets
//! - make/unmake update the scalar value and the Zobrist hash in place
//!
//! The view never allocates after construction.

mod dest;
mod make_unmake;
mod movegen;
mod values;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::zobrist::ZOBRIST;

use super::search::SearchParams;
use super::{Board, Color, Move, Piece, PieceId, RuleConfig, Square, GRID_SIZE, MAX_PLY};

pub use make_unmake::ViewUndo;
pub(crate) use dest::DestFields;
pub(crate) use values::RankCounts;

/// Real moves copied from the board so the repetition rule sees them.
const SEEDED_HISTORY: usize = 8;
const PATH_CAP: usize = MAX_PLY + SEEDED_HISTORY + 8;

/// One played move as the repetition rule sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PathEntry {
    pub(crate) color: Color,
    pub(crate) mv: Move,
}

const EMPTY_PATH: PathEntry = PathEntry {
    color: Color::Red,
    mv: Move::null(),
};

#[derive(Clone)]
pub struct SearchView {
    pub(crate) rules: RuleConfig,
    pub(crate) side: Color,
    pub(crate) to_move: Color,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) locations: Vec<Square>,
    pub(crate) grid: [Option<PieceId>; GRID_SIZE],
    pub(crate) value: i32,
    pub(crate) hash: u64,
    pub(crate) flag_taken: Option<Color>,
    pub(crate) counts: RankCounts,
    pub(crate) invincible: [[bool; super::RANK_SLOTS]; 2],
    pub(crate) values: [[i32; super::RANK_SLOTS]; 2],
    pub(crate) dest: Box<DestFields>,
    pub(crate) path: [PathEntry; PATH_CAP],
    pub(crate) path_len: usize,
    pub(crate) suppress_unmoved: bool,
}

impl SearchView {
    /// Build the view `side` searches from, with `side` to move.
    #[must_use]
    pub fn build(board: &Board, side: Color, params: &SearchParams, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut view = SearchView {
            rules: *board.rules(),
            side,
            to_move: side,
            pieces: board.pieces.clone(),
            locations: vec![Square::NONE; board.pieces.len()],
            grid: board.grid,
            value: 0,
            hash: 0,
            flag_taken: None,
            counts: RankCounts::from_board(board),
            invincible: [[false; super::RANK_SLOTS]; 2],
            values: [[0; super::RANK_SLOTS]; 2],
            dest: Box::new(DestFields::new()),
            path: [EMPTY_PATH; PATH_CAP],
            path_len: 0,
            suppress_unmoved: params.suppress_unmoved_unknowns,
        };

        for sq in Square::all() {
            if let Some(id) = view.grid[sq.index()] {
                view.locations[id.index()] = sq;
            }
        }
        for piece in &mut view.pieces {
            if piece.color() != side && !piece.is_known() {
                piece.mask();
            }
        }

        view.compute_invincibility();
        view.assign_suspected_ranks();
        view.compute_value_tables();
        view.assign_unknown_values(&mut rng);
        view.build_dest_fields();

        let recent: Vec<PathEntry> = board
            .history()
            .rev()
            .take(SEEDED_HISTORY)
            .map(|u| PathEntry {
                color: u.color(),
                mv: u.mv(),
            })
            .collect();
        for entry in recent.into_iter().rev() {
            view.push_path(entry);
        }

        view.value = view.material_balance();
        view.hash = view.compute_hash();
        view
    }

    /// Side the view searches for.
    #[must_use]
    pub fn side(&self) -> Color {
        self.side
    }

    #[must_use]
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Evaluation from the searching side's point of view.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Evaluation from the point of view of the side to move.
    #[inline]
    #[must_use]
    pub fn score_for_mover(&self) -> i32 {
        if self.to_move == self.side {
            self.value
        } else {
            -self.value
        }
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Whether a flag has been taken somewhere along the current line.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.flag_taken.is_some()
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.grid[sq.index()].map(|id| &self.pieces[id.index()])
    }

    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Current cell of a piece, `None` once it has left the board.
    #[must_use]
    pub fn location(&self, id: PieceId) -> Option<Square> {
        let sq = self.locations[id.index()];
        if sq == Square::NONE {
            None
        } else {
            Some(sq)
        }
    }

    pub fn pieces_on_board(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Recompute the hash from scratch.
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let mut hash = ZOBRIST.side(self.to_move);
        for (sq, piece) in self.pieces_on_board() {
            hash ^= ZOBRIST.piece(piece, sq);
        }
        hash
    }

    pub(crate) fn push_path(&mut self, entry: PathEntry) {
        if self.path_len < PATH_CAP {
            self.path[self.path_len] = entry;
            self.path_len += 1;
        }
    }

    /// The move the two-squares rule forbids `color` along the current
    /// line. The searching side always obeys the rule; the opponent only
    /// when the rules enforce it.
    pub(crate) fn two_squares_forbidden(&self, color: Color) -> Option<Move> {
        if color != self.side && !self.rules.two_squares {
            return None;
        }
        let own = self.path[..self.path_len]
            .iter()
            .filter(|e| e.color == color)
            .map(|e| e.mv);
        super::forbidden_repeat(own)
    }
}

impl std::fmt::Debug for SearchView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchView")
            .field("side", &self.side)
            .field("to_move", &self.to_move)
            .field("value", &self.value)
            .field("hash", &format_args!("{:#018x}", self.hash))
            .finish_non_exhaustive()
    }
}
