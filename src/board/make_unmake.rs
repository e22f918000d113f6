use super::error::MoveError;
use super::{fight, Board, Move, Outcome, PieceId, Rank, Square, UnmakeInfo};

/// What a successfully applied real move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// Plain step onto an empty cell.
    Moved,
    /// An attack with its result for the attacker.
    Attacked(Outcome),
}

impl Board {
    /// Apply a move or attack for the side to move, choosing by whether the
    /// destination is occupied.
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveResult, MoveError> {
        if self.id_at(mv.to()).is_some() {
            self.attack(mv.from(), mv.to()).map(MoveResult::Attacked)
        } else {
            self.move_piece(mv.from(), mv.to()).map(|()| MoveResult::Moved)
        }
    }

    /// Step onto an empty cell.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<(), MoveError> {
        let mv = Move::new(from, to);
        self.validate(mv)?;
        let id = self.id_at(from).ok_or(MoveError::NoPiece { square: from })?;
        if self.id_at(to).is_some() {
            return Err(MoveError::WrongKind { to });
        }
        let info = self.begin_unmake(mv, id, None, [from, to]);

        let reveals_scout = !from.is_adjacent(to);
        self.infer_acting_ranks(id, from, to);
        let piece = self.piece_mut(id);
        piece.record_move();
        if reveals_scout {
            piece.make_known();
            piece.set_shown(true);
        }
        self.set_cell(from, None);
        self.set_cell(to, Some(id));
        self.finish(info);
        Ok(())
    }

    /// Attack the enemy piece on `to`.
    pub fn attack(&mut self, from: Square, to: Square) -> Result<Outcome, MoveError> {
        let mv = Move::new(from, to);
        self.validate(mv)?;
        let attacker = self.id_at(from).ok_or(MoveError::NoPiece { square: from })?;
        let defender = self.id_at(to).ok_or(MoveError::WrongKind { to })?;

        // Long-range attacks are resolved from the cell next to the target.
        let strike = match from.direction_to(to) {
            Some(dir) if !from.is_adjacent(to) => to.step(-dir),
            _ => from,
        };
        let mut info = self.begin_unmake(mv, attacker, Some(defender), [from, to]);
        if strike != from {
            info.cells[2] = (strike, self.id_at(strike));
            info.cell_count = 3;
        }

        let a_rank = self.piece(attacker).rank();
        let d_rank = self.piece(defender).rank();
        let outcome = fight(a_rank, d_rank, &self.rules);
        let show_defender = !self.rules.hide_defender || a_rank == Rank::LONG_RANGE;
        {
            let a = self.piece_mut(attacker);
            a.record_move();
            a.make_known();
            a.set_shown(true);
        }
        {
            let d = self.piece_mut(defender);
            d.make_known();
            if show_defender {
                d.set_shown(true);
            }
        }

        self.set_cell(from, None);
        match outcome {
            Outcome::Wins => {
                self.tray.push(defender);
                self.set_cell(to, Some(attacker));
            }
            Outcome::Loses => {
                self.tray.push(attacker);
                if self.rules.defender_moves_on_win && d_rank != Rank::Bomb {
                    self.set_cell(to, None);
                    self.set_cell(strike, Some(defender));
                }
            }
            Outcome::Even | Outcome::Unknown => {
                self.tray.push(attacker);
                self.tray.push(defender);
                self.set_cell(to, None);
            }
        }
        info.outcome = Some(outcome);
        self.finish(info);
        Ok(outcome)
    }

    /// Reverse the most recent move or attack.
    pub fn undo_last_move(&mut self) -> Result<Move, MoveError> {
        let info = self.history.pop().ok_or(MoveError::EmptyHistory)?;
        for &(sq, id) in info.cells[..info.cell_count].iter().rev() {
            self.set_cell(sq, id);
        }
        self.tray.truncate(info.tray_len);
        let mover = info.mover.id();
        self.pieces[mover.index()] = info.mover;
        if let Some(defender) = info.defender {
            self.pieces[defender.id().index()] = defender;
        }
        self.turn = info.color;
        Ok(info.mv)
    }

    fn begin_unmake(
        &self,
        mv: Move,
        mover: PieceId,
        defender: Option<PieceId>,
        cells: [Square; 2],
    ) -> UnmakeInfo {
        let snapshot = |sq: Square| (sq, self.id_at(sq));
        UnmakeInfo {
            mv,
            color: self.turn,
            cells: [snapshot(cells[0]), snapshot(cells[1]), snapshot(cells[1])],
            cell_count: 2,
            mover: *self.piece(mover),
            defender: defender.map(|id| *self.piece(id)),
            tray_len: self.tray.len(),
            outcome: None,
        }
    }

    fn finish(&mut self, info: UnmakeInfo) {
        self.history.push(info);
        self.turn = self.turn.opponent();
    }

    /// Record what an unrevealed mover's step suggests about its rank:
    /// stepping next to a known enemy reads as a chase, stepping away from
    /// one as a flight.
    fn infer_acting_ranks(&mut self, id: PieceId, from: Square, to: Square) {
        let piece = *self.piece(id);
        if piece.is_known() {
            return;
        }
        let mut chased = 0u16;
        let mut fled = 0u16;
        for n in to.neighbors() {
            if n == from || from.is_adjacent(n) {
                continue;
            }
            if let Some(e) = self.piece_at(n) {
                if e.color() != piece.color() && e.is_known() {
                    chased |= e.rank().bit();
                }
            }
        }
        for n in from.neighbors() {
            if n == to || to.is_adjacent(n) {
                continue;
            }
            if let Some(e) = self.piece_at(n) {
                if e.color() != piece.color() && e.is_known() && e.rank().is_movable() {
                    fled |= e.rank().bit();
                }
            }
        }
        let p = self.piece_mut(id);
        for rank in Rank::ARMY {
            if chased & rank.bit() != 0 {
                p.add_chase_rank(rank);
            }
            if fled & rank.bit() != 0 {
                p.add_flee_rank(rank);
            }
        }
    }
}
