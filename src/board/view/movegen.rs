use super::SearchView;
use crate::board::{Color, Move, MoveList, Piece, Rank, Square, DIRECTIONS};

impl SearchView {
    /// Hidden opponent pieces that have never moved are treated as
    /// stationary: they may still attack a neighbour but generate no
    /// quiet moves.
    #[inline]
    pub(crate) fn is_suppressed(&self, piece: &Piece) -> bool {
        self.suppress_unmoved
            && piece.color() != self.side
            && piece.rank() == Rank::Unknown
            && !piece.has_moved()
    }

    /// Moves and attacks for `color`, without the pass.
    pub fn generate_moves(&self, color: Color, moves: &mut MoveList) {
        self.generate(color, false, moves);
    }

    /// Attacks only, for quiescence.
    pub fn generate_attacks(&self, color: Color, moves: &mut MoveList) {
        self.generate(color, true, moves);
    }

    fn generate(&self, color: Color, attacks_only: bool, moves: &mut MoveList) {
        for from in Square::all() {
            let Some(id) = self.grid[from.index()] else {
                continue;
            };
            let piece = &self.pieces[id.index()];
            if piece.color() != color || !piece.rank().is_movable() {
                continue;
            }
            let quiet = !attacks_only && !self.is_suppressed(piece);
            let scout = piece.rank() == Rank::LONG_RANGE;
            // A moved hidden piece might be a scout: it may strike along a
            // line but is not given far quiet moves.
            let long = scout || (piece.rank() == Rank::Unknown && piece.has_moved());
            for dir in DIRECTIONS {
                let mut to = from.step(dir);
                let mut first = true;
                while to.is_playable() {
                    match self.grid[to.index()] {
                        None => {
                            if quiet && (first || scout) {
                                moves.push(Move::new(from, to));
                            }
                        }
                        Some(other) => {
                            if self.pieces[other.index()].color() != color {
                                moves.push(Move::new(from, to));
                            }
                            break;
                        }
                    }
                    if !long {
                        break;
                    }
                    first = false;
                    to = to.step(dir);
                }
            }
        }
        if let Some(forbidden) = self.two_squares_forbidden(color) {
            moves.retain(|mv| mv != forbidden);
        }
    }

    /// Whether `color` has a piece whose moves are being suppressed.
    #[must_use]
    pub fn has_suppressed(&self, color: Color) -> bool {
        self.pieces_on_board()
            .any(|(_, p)| p.color() == color && self.is_suppressed(p))
    }
}
