//! Incremental make/unmake on the search view.
//!
//! Each move adjusts the scalar value by the mover's gain `vm`, added when
//! the searching side moves and subtracted otherwise. Hidden pieces are
//! resolved optimistically only when the rank counts make the result
//! certain; every other collision with a hidden piece removes both.

use super::values::{stealth, BLUFF_DIVISOR};
use super::{PathEntry, SearchView};
use crate::board::{fight, Color, Move, Outcome, Piece, PieceId, Rank, Square};
use crate::zobrist::ZOBRIST;

/// Cost of giving away that a hidden piece is not a bomb or flag.
pub(crate) const FIRST_MOVE_PENALTY: i32 = 2;

/// Snapshot that reverses one [`SearchView::make_move`] exactly.
#[derive(Clone, Copy, Debug)]
pub struct ViewUndo {
    mv: Move,
    cells: [(Square, Option<PieceId>); 3],
    cell_count: usize,
    mover: Option<Piece>,
    defender: Option<Piece>,
    value: i32,
    hash: u64,
    to_move: Color,
    flag_taken: Option<Color>,
    path_len: usize,
}

impl ViewUndo {
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Evaluation before the move, from the searching side's view.
    #[must_use]
    pub fn value_before(&self) -> i32 {
        self.value
    }

    #[must_use]
    pub fn is_attack(&self) -> bool {
        self.defender.is_some()
    }
}

impl SearchView {
    /// Play `mv` for the side to move. `ply` discounts gains found deeper
    /// in the tree so earlier gains are preferred.
    pub fn make_move(&mut self, mv: Move, ply: usize) -> ViewUndo {
        let color = self.to_move;
        let mut undo = ViewUndo {
            mv,
            cells: [(Square::NONE, None); 3],
            cell_count: 0,
            mover: None,
            defender: None,
            value: self.value,
            hash: self.hash,
            to_move: color,
            flag_taken: self.flag_taken,
            path_len: self.path_len,
        };

        let (from, to) = (mv.from(), mv.to());
        let mover = if mv.is_null() {
            None
        } else {
            self.grid[from.index()]
        };
        let Some(aid) = mover else {
            self.finish_turn(PathEntry { color, mv });
            return undo;
        };

        undo.cells[0] = (from, Some(aid));
        undo.cells[1] = (to, self.grid[to.index()]);
        undo.cell_count = 2;
        undo.mover = Some(self.pieces[aid.index()]);

        let vm = match self.grid[to.index()] {
            None => self.step(aid, from, to),
            Some(did) => {
                undo.defender = Some(self.pieces[did.index()]);
                self.strike(aid, did, from, to, ply, &mut undo)
            }
        };
        if color == self.side {
            self.value += vm;
        } else {
            self.value -= vm;
        }
        self.finish_turn(PathEntry { color, mv });
        undo
    }

    /// Reverse a move made by [`SearchView::make_move`]. Undo records must be
    /// applied in reverse order of creation.
    pub fn unmake_move(&mut self, undo: ViewUndo) {
        for &(sq, id) in undo.cells[..undo.cell_count].iter().rev() {
            self.grid[sq.index()] = id;
        }
        if let Some(p) = undo.mover {
            self.pieces[p.id().index()] = p;
            self.locations[p.id().index()] = undo.mv.from();
        }
        if let Some(p) = undo.defender {
            self.pieces[p.id().index()] = p;
            self.locations[p.id().index()] = undo.mv.to();
        }
        self.value = undo.value;
        self.hash = undo.hash;
        self.to_move = undo.to_move;
        self.flag_taken = undo.flag_taken;
        self.path_len = undo.path_len;
    }

    fn finish_turn(&mut self, entry: PathEntry) {
        let next = self.to_move.opponent();
        self.hash ^= ZOBRIST.side(self.to_move) ^ ZOBRIST.side(next);
        self.to_move = next;
        self.push_path(entry);
    }

    /// Plain step; returns the mover's gain.
    fn step(&mut self, aid: PieceId, from: Square, to: Square) -> i32 {
        let before = self.pieces[aid.index()];
        let mut vm = self.dest.gain(before.color(), before.rank(), from, to);
        if !before.has_moved() && !before.is_known() {
            vm -= FIRST_MOVE_PENALTY;
        }
        let reveals = !from.is_adjacent(to) && !before.is_known();
        if reveals {
            vm -= stealth(self.piece_value(&before));
        }

        self.hash ^= ZOBRIST.piece(&before, from);
        let piece = &mut self.pieces[aid.index()];
        piece.record_move();
        if reveals {
            piece.reveal_as(Rank::LONG_RANGE);
        }
        self.grid[from.index()] = None;
        self.grid[to.index()] = Some(aid);
        self.locations[aid.index()] = to;
        self.hash ^= ZOBRIST.piece(&self.pieces[aid.index()], to);
        vm
    }

    /// Attack; returns the attacker's gain.
    fn strike(
        &mut self,
        aid: PieceId,
        did: PieceId,
        from: Square,
        to: Square,
        ply: usize,
        undo: &mut ViewUndo,
    ) -> i32 {
        let a = self.pieces[aid.index()];
        let d = self.pieces[did.index()];
        let outcome = self.resolve(&a, &d);
        let av = self.piece_value(&a);
        let dv = self.piece_value(&d);
        // Whoever survives is revealed and loses its anonymity too.
        let sa = if a.is_known() { 0 } else { stealth(av) };
        let sd = if d.is_known() { 0 } else { stealth(dv) };
        let mut vm = match outcome {
            Outcome::Wins => dv + sd - sa,
            Outcome::Loses => sd - av - sa,
            Outcome::Even | Outcome::Unknown => dv + sd - av - sa,
        };
        // A hidden piece that stands up to a newcomer may pass for a
        // stronger rank. Never credited to the move actually played.
        if ply > 0 {
            match outcome {
                Outcome::Loses
                    if !a.is_known()
                        && !self.is_invincible_defender(d.color(), d.rank()) =>
                {
                    vm += self.bluff(dv / BLUFF_DIVISOR, to);
                }
                Outcome::Wins if !d.is_known() && !self.is_invincible(a.color(), a.rank()) => {
                    vm -= self.bluff(av / (2 * BLUFF_DIVISOR), to);
                }
                _ => {}
            }
        }
        let discount = (ply as i32).min(vm.abs() / 2);
        vm -= vm.signum() * discount;

        if d.rank() == Rank::Flag && outcome == Outcome::Wins {
            self.flag_taken = Some(d.color());
        }

        let strike = match from.direction_to(to) {
            Some(dir) if !from.is_adjacent(to) => to.step(-dir),
            _ => from,
        };
        if strike != from {
            undo.cells[2] = (strike, self.grid[strike.index()]);
            undo.cell_count = 3;
        }

        self.hash ^= ZOBRIST.piece(&a, from) ^ ZOBRIST.piece(&d, to);
        for id in [aid, did] {
            let p = &mut self.pieces[id.index()];
            let rank = p.rank();
            if rank != Rank::Unknown {
                p.reveal_as(rank);
            }
        }
        self.pieces[aid.index()].record_move();

        self.grid[from.index()] = None;
        match outcome {
            Outcome::Wins => {
                self.grid[to.index()] = Some(aid);
                self.locations[aid.index()] = to;
                self.locations[did.index()] = Square::NONE;
                self.hash ^= ZOBRIST.piece(&self.pieces[aid.index()], to);
            }
            Outcome::Loses => {
                self.locations[aid.index()] = Square::NONE;
                let dest = if self.rules.defender_moves_on_win && d.rank() != Rank::Bomb {
                    self.grid[to.index()] = None;
                    self.grid[strike.index()] = Some(did);
                    strike
                } else {
                    to
                };
                self.locations[did.index()] = dest;
                self.hash ^= ZOBRIST.piece(&self.pieces[did.index()], dest);
            }
            Outcome::Even | Outcome::Unknown => {
                self.grid[to.index()] = None;
                self.locations[aid.index()] = Square::NONE;
                self.locations[did.index()] = Square::NONE;
            }
        }
        vm
    }

    /// Combat result as the search assumes it. Collisions with hidden
    /// pieces are wins only for a rank nothing hidden can match, and losses
    /// only against a defender nothing hidden can beat.
    #[must_use]
    pub fn resolve(&self, attacker: &Piece, defender: &Piece) -> Outcome {
        let outcome = fight(attacker.rank(), defender.rank(), &self.rules);
        if outcome != Outcome::Unknown {
            return outcome;
        }
        if defender.rank() == Rank::Unknown {
            let rank = attacker.rank();
            if !rank.is_numeric() {
                return Outcome::Even;
            }
            let enemy = defender.color();
            let matched = Rank::NUMERIC[..rank.index()]
                .iter()
                .any(|r| self.counts.unknown_at_large(enemy, *r) > 0);
            let maybe_bomb =
                !defender.has_moved() && self.counts.unknown_at_large(enemy, Rank::Bomb) > 0;
            if !matched && (!maybe_bomb || rank == Rank::SAPPER) {
                Outcome::Wins
            } else {
                Outcome::Even
            }
        } else {
            match defender.rank() {
                Rank::Bomb => {
                    if self.counts.unknown_at_large(attacker.color(), Rank::SAPPER) == 0 {
                        Outcome::Loses
                    } else {
                        Outcome::Even
                    }
                }
                rank if self.is_invincible_defender(defender.color(), rank) => Outcome::Loses,
                _ => Outcome::Even,
            }
        }
    }
}
