//! Rank bookkeeping and piece values.

use rand::Rng;

use super::SearchView;
use crate::board::{Board, Color, Piece, Rank, Square, RANK_SLOTS};

/// Extra worth of a rank nothing on the other side can beat.
pub(crate) const INVINCIBLE_BONUS: i32 = 30;
/// Extra worth of a sapper while hidden bombs remain and sappers are scarce.
pub(crate) const SAPPER_BONUS: i32 = 30;
/// Reward for taking the flag. Dominates any material swing.
pub(crate) const FLAG_VALUE: i32 = 20_000;
/// Extra worth of an unknown piece per row behind its front line.
pub(crate) const UNKNOWN_DEPTH_BONUS: i32 = 4;
/// Extra worth of an unknown piece that has never moved.
pub(crate) const UNMOVED_BONUS: i32 = 5;

/// Share of a piece's value a hidden piece gains by confronting it.
pub(crate) const BLUFF_DIVISOR: i32 = 5;

/// Per-side, per-rank piece counts as the searching side sees them.
#[derive(Clone, Debug, Default)]
pub(crate) struct RankCounts {
    tray: [[u8; RANK_SLOTS]; 2],
    known: [[u8; RANK_SLOTS]; 2],
}

impl RankCounts {
    pub(crate) fn from_board(board: &Board) -> Self {
        let mut counts = RankCounts::default();
        for p in board.tray() {
            counts.tray[p.color().index()][p.rank().index()] += 1;
        }
        for (_, p) in board.pieces_on_board() {
            if p.is_known() {
                counts.known[p.color().index()][p.rank().index()] += 1;
            }
        }
        counts
    }

    /// Pieces of this rank still on the board.
    pub(crate) fn living(&self, color: Color, rank: Rank) -> u8 {
        rank.count()
            .saturating_sub(self.tray[color.index()][rank.index()])
    }

    /// Living pieces of this rank whose identity has not been revealed.
    pub(crate) fn unknown_at_large(&self, color: Color, rank: Rank) -> u8 {
        self.living(color, rank)
            .saturating_sub(self.known[color.index()][rank.index()])
    }
}

/// Worth of a piece's anonymity, lost when it is revealed.
#[inline]
pub(crate) fn stealth(value: i32) -> i32 {
    value * Rank::Four.base_value() / Rank::One.base_value()
}

impl SearchView {
    /// Worth of a bluff played on `to`. A hidden piece meeting an enemy that
    /// has just moved next to it may be mistaken for a stronger rank, but
    /// the doubt is gone after one turn, so only a collision on the square
    /// the previous move entered counts.
    pub(crate) fn bluff(&self, value: i32, to: Square) -> i32 {
        match self.path[..self.path_len].last() {
            Some(prev) if !prev.mv.is_null() && prev.mv.to() == to => value,
            _ => 0,
        }
    }

    pub(crate) fn compute_invincibility(&mut self) {
        for color in Color::BOTH {
            let enemy = color.opponent();
            for rank in Rank::NUMERIC {
                self.invincible[color.index()][rank.index()] = Rank::NUMERIC
                    .iter()
                    .take_while(|r| **r != rank)
                    .all(|r| self.counts.living(enemy, *r) == 0);
            }
        }
    }

    /// No living enemy rank beats this one.
    #[must_use]
    pub fn is_invincible(&self, color: Color, rank: Rank) -> bool {
        self.invincible[color.index()][rank.index()]
    }

    /// Invincible even when attacked, which rules out the One while the
    /// enemy Spy lives.
    #[must_use]
    pub fn is_invincible_defender(&self, color: Color, rank: Rank) -> bool {
        self.is_invincible(color, rank)
            && !(rank == Rank::One && self.counts.living(color.opponent(), Rank::Spy) > 0)
    }

    /// Give hidden opponent pieces that have chased a known rank the
    /// weakest hidden rank able to beat it.
    pub(crate) fn assign_suspected_ranks(&mut self) {
        let enemy = self.side.opponent();
        for idx in 0..self.pieces.len() {
            let p = self.pieces[idx];
            if p.color() != enemy || p.rank() != Rank::Unknown {
                continue;
            }
            let Some(chased) = Rank::lowest_in(p.chase_ranks()) else {
                continue;
            };
            if !chased.is_numeric() || p.is_fleeing(chased) {
                continue;
            }
            let suspect = if chased == Rank::One {
                (self.counts.unknown_at_large(enemy, Rank::Spy) > 0).then_some(Rank::Spy)
            } else {
                Rank::NUMERIC[..chased.index() - 1]
                    .iter()
                    .rev()
                    .copied()
                    .find(|r| self.counts.unknown_at_large(enemy, *r) > 0)
            };
            if let Some(rank) = suspect {
                self.pieces[idx].suspect(rank);
            }
        }
    }

    pub(crate) fn compute_value_tables(&mut self) {
        for color in Color::BOTH {
            let enemy = color.opponent();
            let c = color.index();
            for rank in Rank::ARMY.into_iter().chain([Rank::Unknown]) {
                let mut v = rank.base_value();
                if rank.is_numeric() && self.invincible[c][rank.index()] {
                    v += INVINCIBLE_BONUS;
                }
                match rank {
                    Rank::Spy if self.counts.living(enemy, Rank::One) == 0 => {
                        v = Rank::Seven.base_value();
                    }
                    Rank::Eight
                        if self.counts.unknown_at_large(enemy, Rank::Bomb) > 0
                            && self.counts.living(color, Rank::Eight) <= 2 =>
                    {
                        v += SAPPER_BONUS;
                    }
                    Rank::Flag => v = FLAG_VALUE,
                    _ => {}
                }
                self.values[c][rank.index()] = v;
            }
        }
    }

    /// Hidden opponent pieces are worth more the deeper they sit and while
    /// they have never moved, plus a little noise to break ties.
    pub(crate) fn assign_unknown_values<R: Rng>(&mut self, rng: &mut R) {
        let enemy = self.side.opponent();
        let base = self.values[enemy.index()][Rank::Unknown.index()];
        for idx in 0..self.pieces.len() {
            let p = self.pieces[idx];
            if p.color() != enemy || p.rank() != Rank::Unknown {
                continue;
            }
            let Some(sq) = self.location(p.id()) else {
                continue;
            };
            let mut v = base + UNKNOWN_DEPTH_BONUS * enemy.depth_of_row(sq.y()) as i32;
            if !p.has_moved() {
                v += UNMOVED_BONUS;
            }
            v += rng.gen_range(0..=2);
            self.pieces[idx].set_value(v);
        }
    }

    /// Current worth of a piece to its owner.
    #[inline]
    #[must_use]
    pub fn piece_value(&self, piece: &Piece) -> i32 {
        match piece.rank() {
            Rank::Unknown => piece.value(),
            rank => self.values[piece.color().index()][rank.index()],
        }
    }

    /// Material on the board, hidden pieces counting their anonymity too.
    pub(crate) fn material_balance(&self) -> i32 {
        self.pieces_on_board()
            .filter(|(_, p)| p.rank() != Rank::Flag)
            .map(|(_, p)| {
                let mut v = self.piece_value(p);
                if !p.is_known() {
                    v += stealth(v);
                }
                if p.color() == self.side {
                    v
                } else {
                    -v
                }
            })
            .sum()
    }
}
