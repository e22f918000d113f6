//! Destination fields.
//!
//! For every (side, rank) a map from cell to "priority minus path cost to
//! the nearest target". A quiet move earns the difference between the
//! field at its destination and at its origin, so pieces drift toward
//! targets without the search having to see that far.

use super::SearchView;
use crate::board::{fight, Color, Outcome, Piece, Rank, Square, GRID_SIZE, RANK_SLOTS};

/// Cell not reachable from any target.
pub(crate) const DEST_NIL: i16 = -999;

const PRIORITY_DEFEND_FLAG: i16 = 20;
const PRIORITY_ATTACK_FLAG: i16 = 10;
const PRIORITY_CHASE: i16 = 10;
const PRIORITY_BOMBS: i16 = 6;
const PRIORITY_HUNT: i16 = 5;
const PRIORITY_INVESTIGATE: i16 = 3;

/// Unknown attackers are only drawn toward pieces at least this valuable.
const HUNT_VALUE: i32 = 100;
/// Enemy pieces this close to the own flag are intercepted.
const DEFEND_RADIUS: usize = 4;

/// Ranks cheap enough to spend on probing unknown pieces.
const EXPENDABLE: [Rank; 3] = [Rank::Six, Rank::Seven, Rank::Nine];

#[derive(Clone)]
pub(crate) struct DestFields {
    fields: [[[i16; GRID_SIZE]; RANK_SLOTS]; 2],
}

impl DestFields {
    pub(crate) fn new() -> Self {
        DestFields {
            fields: [[[DEST_NIL; GRID_SIZE]; RANK_SLOTS]; 2],
        }
    }

    #[inline]
    pub(crate) fn get(&self, color: Color, rank: Rank, sq: Square) -> i16 {
        self.fields[color.index()][rank.index()][sq.index()]
    }

    /// Field gain for stepping from `from` to `to`; zero off the field.
    #[inline]
    pub(crate) fn gain(&self, color: Color, rank: Rank, from: Square, to: Square) -> i32 {
        let field = &self.fields[color.index()][rank.index()];
        let (a, b) = (field[from.index()], field[to.index()]);
        if a == DEST_NIL || b == DEST_NIL {
            0
        } else {
            i32::from(b) - i32::from(a)
        }
    }

    fn merge(&mut self, color: Color, rank: Rank, tmp: &[i16; GRID_SIZE]) {
        let field = &mut self.fields[color.index()][rank.index()];
        for (cell, &v) in field.iter_mut().zip(tmp.iter()) {
            *cell = (*cell).max(v);
        }
    }
}

impl SearchView {
    /// Cells a piece of `color` cannot path through: bombs, and its own
    /// side's pieces that have never moved.
    fn blocks_path(&self, color: Color, sq: Square) -> bool {
        match self.piece_at(sq) {
            None => false,
            Some(p) => {
                p.rank() == Rank::Bomb || (p.color() == color && !p.has_moved())
            }
        }
    }

    /// Relax outward from `target` until stable. Passing through an
    /// occupied cell costs an extra step.
    fn flood(&self, color: Color, target: Square, priority: i16, out: &mut [i16; GRID_SIZE]) {
        out.fill(DEST_NIL);
        out[target.index()] = priority;
        let mut changed = true;
        while changed {
            changed = false;
            for sq in Square::all() {
                let v = out[sq.index()];
                if v == DEST_NIL {
                    continue;
                }
                let cost = if sq == target {
                    1
                } else if self.blocks_path(color, sq) {
                    continue;
                } else if self.grid[sq.index()].is_some() {
                    2
                } else {
                    1
                };
                let next = v - cost;
                for n in sq.neighbors() {
                    if out[n.index()] < next {
                        out[n.index()] = next;
                        changed = true;
                    }
                }
            }
        }
    }

    /// Ranks among `color`'s movable pieces on the board, as a bit set.
    fn present_ranks(&self, color: Color) -> u16 {
        self.pieces_on_board()
            .filter(|(_, p)| p.color() == color && p.rank().is_movable())
            .fold(0, |bits, (_, p)| bits | p.rank().bit())
    }

    /// Weakest present rank of `color` that beats `target`.
    fn cheapest_attacker(&self, present: u16, target: Rank) -> Option<Rank> {
        Rank::ARMY
            .iter()
            .rev()
            .copied()
            .filter(|r| present & r.bit() != 0 && r.is_movable())
            .find(|r| fight(*r, target, &self.rules) == Outcome::Wins)
    }

    /// A hidden, unmoved back-row piece walled in by hidden unmoved pieces
    /// or bombs looks like a flag.
    fn looks_like_flag(&self, owner: Color, sq: Square) -> bool {
        let Some(p) = self.piece_at(sq) else {
            return false;
        };
        if p.color() != owner || p.is_known() || p.has_moved() || owner.depth_of_row(sq.y()) != 3
        {
            return false;
        }
        sq.neighbors().all(|n| {
            self.piece_at(n).is_some_and(|q| {
                q.color() == owner
                    && ((!q.is_known() && !q.has_moved()) || q.rank() == Rank::Bomb)
            })
        })
    }

    pub(crate) fn build_dest_fields(&mut self) {
        let mut fields = DestFields::new();
        let mut tmp = [DEST_NIL; GRID_SIZE];

        for color in Color::BOTH {
            let enemy = color.opponent();
            let present = self.present_ranks(color);
            let targets: Vec<(Square, Piece)> = self
                .pieces_on_board()
                .filter(|(_, p)| p.color() == enemy)
                .map(|(sq, p)| (sq, *p))
                .collect();

            for &(sq, target) in &targets {
                let rank = target.rank();
                if rank != Rank::Unknown && rank.is_movable() {
                    if let Some(r) = self.cheapest_attacker(present & !Rank::Unknown.bit(), rank) {
                        self.flood(color, sq, PRIORITY_CHASE, &mut tmp);
                        fields.merge(color, r, &tmp);
                    }
                    if present & Rank::Unknown.bit() != 0
                        && self.values[enemy.index()][rank.index()] >= HUNT_VALUE
                    {
                        self.flood(color, sq, PRIORITY_HUNT, &mut tmp);
                        fields.merge(color, Rank::Unknown, &tmp);
                    }
                }

                if !target.is_known() && !target.has_moved() {
                    let prio = PRIORITY_INVESTIGATE + enemy.depth_of_row(sq.y()) as i16;
                    self.flood(color, sq, prio, &mut tmp);
                    for r in EXPENDABLE.iter().filter(|r| present & r.bit() != 0) {
                        fields.merge(color, *r, &tmp);
                    }
                }

                if self.looks_like_flag(enemy, sq) {
                    self.flood(color, sq, PRIORITY_ATTACK_FLAG, &mut tmp);
                    for r in EXPENDABLE
                        .iter()
                        .chain(std::iter::once(&Rank::Eight))
                        .filter(|r| present & r.bit() != 0)
                    {
                        fields.merge(color, *r, &tmp);
                    }
                    if present & Rank::Eight.bit() != 0 {
                        for n in sq.neighbors() {
                            self.flood(color, n, PRIORITY_BOMBS, &mut tmp);
                            fields.merge(color, Rank::Eight, &tmp);
                        }
                    }
                }
            }

            if color == self.side {
                self.defend_flag(color, present, &targets, &mut fields, &mut tmp);
            }
        }
        *self.dest = fields;
    }

    /// Send the cheapest capable defender toward moved enemy pieces near
    /// the own flag; unknown intruders draw the strongest invincible rank.
    fn defend_flag(
        &self,
        color: Color,
        present: u16,
        targets: &[(Square, Piece)],
        fields: &mut DestFields,
        tmp: &mut [i16; GRID_SIZE],
    ) {
        let Some(flag_sq) = self
            .pieces_on_board()
            .find(|(_, p)| p.color() == color && p.rank() == Rank::Flag)
            .map(|(sq, _)| sq)
        else {
            return;
        };
        for &(sq, intruder) in targets {
            if !intruder.has_moved() || sq.distance(flag_sq) > DEFEND_RADIUS {
                continue;
            }
            let defender = if intruder.rank() == Rank::Unknown {
                Rank::NUMERIC
                    .iter()
                    .copied()
                    .find(|r| present & r.bit() != 0 && self.is_invincible(color, *r))
            } else {
                self.cheapest_attacker(present, intruder.rank())
            };
            if let Some(r) = defender {
                self.flood(color, sq, PRIORITY_DEFEND_FLAG, tmp);
                fields.merge(color, r, tmp);
            }
        }
    }

    /// Field value of a cell for pieces of `color` and `rank`.
    #[must_use]
    pub fn dest_value(&self, color: Color, rank: Rank, sq: Square) -> i16 {
        self.dest.get(color, rank, sq)
    }
}
