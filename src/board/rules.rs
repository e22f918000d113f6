//! Move legality, the two-squares rule and win detection.

use super::error::MoveError;
use super::{Board, Color, Move, MoveList, Rank, Square, DIRECTIONS};

/// The one move the two-squares rule forbids next, given a side's own moves
/// in chronological order. After `a-b` then `b-a`, replaying `a-b` would be
/// the third leg of the same back-and-forth, whether it steps onto an empty
/// cell or attacks whatever stands there now. A pass breaks the sequence.
pub(crate) fn forbidden_repeat(own_moves: impl DoubleEndedIterator<Item = Move>) -> Option<Move> {
    let mut recent = own_moves.rev();
    match (recent.next(), recent.next()) {
        (Some(last), Some(before)) if !last.is_null() && last == before.reversed() => Some(before),
        _ => None,
    }
}

impl Board {
    /// Check every rule for `mv` by the side to move without changing
    /// anything.
    pub fn validate(&self, mv: Move) -> Result<(), MoveError> {
        if self.winner().is_some() {
            return Err(MoveError::GameOver);
        }
        let (from, to) = (mv.from(), mv.to());
        for sq in [from, to] {
            if !sq.is_playable() {
                return Err(MoveError::NotPlayable { square: sq });
            }
        }
        let mover = self.piece_at(from).ok_or(MoveError::NoPiece { square: from })?;
        if mover.color() != self.turn {
            return Err(MoveError::WrongTurn { expected: self.turn });
        }
        if !mover.rank().is_movable() {
            return Err(MoveError::Immobile { rank: mover.rank() });
        }
        if self.piece_at(to).is_some_and(|p| p.color() == mover.color()) {
            return Err(MoveError::OwnPiece { square: to });
        }
        if !from.is_adjacent(to) {
            if mover.rank() != Rank::LONG_RANGE {
                return Err(MoveError::NotReachable { from, to });
            }
            self.check_line(from, to)?;
        }
        if self.rules.two_squares && self.is_two_squares(mover.color(), mv) {
            return Err(MoveError::TwoSquares { from, to });
        }
        Ok(())
    }

    /// Walk the straight line strictly between `from` and `to`.
    fn check_line(&self, from: Square, to: Square) -> Result<(), MoveError> {
        let dir = from
            .direction_to(to)
            .ok_or(MoveError::NotReachable { from, to })?;
        let mut sq = from.step(dir);
        while sq != to {
            if !sq.is_playable() {
                return Err(MoveError::NotReachable { from, to });
            }
            if self.id_at(sq).is_some() {
                return Err(MoveError::Blocked { at: sq });
            }
            sq = sq.step(dir);
        }
        Ok(())
    }

    /// Whether `mv` by `color` repeats a back-and-forth step, as a move or
    /// as an attack.
    #[must_use]
    pub fn is_two_squares(&self, color: Color, mv: Move) -> bool {
        self.two_squares_forbidden(color) == Some(mv)
    }

    pub(crate) fn two_squares_forbidden(&self, color: Color) -> Option<Move> {
        let own = self
            .history
            .iter()
            .filter(|u| u.color == color)
            .map(|u| u.mv);
        forbidden_repeat(own)
    }

    /// All legal moves and attacks for `color`, ignoring whose turn it is.
    #[must_use]
    pub fn legal_moves(&self, color: Color) -> MoveList {
        let mut moves = MoveList::new();
        for (from, piece) in self.pieces_on_board() {
            if piece.color() != color || !piece.rank().is_movable() {
                continue;
            }
            for dir in DIRECTIONS {
                let mut to = from.step(dir);
                while to.is_playable() {
                    match self.piece_at(to) {
                        None => moves.push(Move::new(from, to)),
                        Some(p) => {
                            if p.color() != color {
                                moves.push(Move::new(from, to));
                            }
                            break;
                        }
                    }
                    if piece.rank() != Rank::LONG_RANGE {
                        break;
                    }
                    to = to.step(dir);
                }
            }
        }
        if self.rules.two_squares {
            if let Some(forbidden) = self.two_squares_forbidden(color) {
                moves.retain(|mv| mv != forbidden);
            }
        }
        moves
    }

    /// Whether `color` has a piece that could step or attack somewhere.
    #[must_use]
    pub fn has_movable_piece(&self, color: Color) -> bool {
        self.pieces_on_board().any(|(sq, p)| {
            p.color() == color
                && p.rank().is_movable()
                && sq
                    .neighbors()
                    .any(|n| self.piece_at(n).map_or(true, |q| q.color() != color))
        })
    }

    /// The winner, if the game is decided.
    ///
    /// With exactly one flag on the board its owner wins. Otherwise a side
    /// with nothing able to move loses, Red checked first. A board with no
    /// flags placed yet is still in setup and has no winner.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        let has_flag = |c: Color| {
            self.pieces_on_board()
                .any(|(_, p)| p.color() == c && p.rank() == Rank::Flag)
        };
        match (has_flag(Color::Red), has_flag(Color::Blue)) {
            (false, false) => None,
            (true, false) => Some(Color::Red),
            (false, true) => Some(Color::Blue),
            (true, true) => Color::BOTH
                .into_iter()
                .find(|&c| !self.has_movable_piece(c))
                .map(Color::opponent),
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }
}
