//! Sides, piece identities and piece state.

use std::fmt;
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Rank;

/// One of the two sides. Red sets up on the bottom four rows and moves first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::Red, Color::Blue];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    /// Rows this side may place pieces on during setup.
    #[must_use]
    pub const fn setup_rows(self) -> RangeInclusive<usize> {
        match self {
            Color::Red => 6..=9,
            Color::Blue => 0..=3,
        }
    }

    /// How many rows `y` lies behind this side's front line, 0 at the
    /// front of its setup zone and 3 on its back row.
    #[must_use]
    pub const fn depth_of_row(self, y: usize) -> usize {
        match self {
            Color::Red => y.saturating_sub(6),
            Color::Blue => 3usize.saturating_sub(y),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Blue => write!(f, "blue"),
        }
    }
}

/// Stable identity of a piece for one game session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceId(pub(crate) u8);

impl PieceId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Hands out piece identities for one game session.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u8,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        IdAllocator { next: 0 }
    }

    /// Next unused identity, or `None` once all 256 are taken.
    pub fn allocate(&mut self) -> Option<PieceId> {
        let id = PieceId(self.next);
        self.next = self.next.checked_add(1)?;
        Some(id)
    }

    #[must_use]
    pub fn issued(&self) -> usize {
        self.next as usize
    }
}

/// A piece and everything observers have learned about it.
///
/// The true rank is fixed at creation. Search-view copies may overwrite it
/// with [`Rank::Unknown`] or a suspected rank; the authoritative board
/// never does.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    id: PieceId,
    color: Color,
    rank: Rank,
    known: bool,
    shown: bool,
    suspected: bool,
    moves: u16,
    chase_ranks: u16,
    flee_ranks: u16,
    value: i32,
}

impl Piece {
    #[must_use]
    pub const fn new(id: PieceId, color: Color, rank: Rank) -> Self {
        Piece {
            id,
            color,
            rank,
            known: false,
            shown: false,
            suspected: false,
            moves: 0,
            chase_ranks: 0,
            flee_ranks: 0,
            value: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    #[must_use]
    pub const fn rank(&self) -> Rank {
        self.rank
    }

    /// Rank as seen by the opponent.
    #[inline]
    #[must_use]
    pub const fn apparent_rank(&self) -> Rank {
        if self.known {
            self.rank
        } else {
            Rank::Unknown
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.known
    }

    #[inline]
    #[must_use]
    pub const fn is_shown(&self) -> bool {
        self.shown
    }

    #[inline]
    #[must_use]
    pub const fn is_suspected(&self) -> bool {
        self.suspected
    }

    #[inline]
    #[must_use]
    pub const fn moves(&self) -> u16 {
        self.moves
    }

    #[inline]
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.moves != 0
    }

    /// Ranks this piece has approached as if it could beat them.
    #[inline]
    #[must_use]
    pub const fn chase_ranks(&self) -> u16 {
        self.chase_ranks
    }

    /// Ranks this piece has retreated from.
    #[inline]
    #[must_use]
    pub const fn flee_ranks(&self) -> u16 {
        self.flee_ranks
    }

    #[must_use]
    pub fn is_fleeing(&self, rank: Rank) -> bool {
        self.flee_ranks & rank.bit() != 0
    }

    /// Heuristic worth assigned by the search view.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    pub(crate) fn make_known(&mut self) {
        self.known = true;
    }

    pub(crate) fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    pub(crate) fn record_move(&mut self) {
        self.moves = self.moves.saturating_add(1);
    }

    pub(crate) fn add_chase_rank(&mut self, rank: Rank) {
        self.chase_ranks |= rank.bit();
    }

    pub(crate) fn add_flee_rank(&mut self, rank: Rank) {
        self.flee_ranks |= rank.bit();
    }

    pub(crate) fn set_value(&mut self, value: i32) {
        self.value = value;
    }

    /// Hide the identity behind the sentinel rank.
    pub(crate) fn mask(&mut self) {
        self.rank = Rank::Unknown;
        self.known = false;
    }

    pub(crate) fn suspect(&mut self, rank: Rank) {
        self.rank = rank;
        self.suspected = true;
    }

    /// Reveal a masked copy under `rank`.
    pub(crate) fn reveal_as(&mut self, rank: Rank) {
        self.rank = rank;
        self.known = true;
        self.suspected = false;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.color {
            Color::Red => 'R',
            Color::Blue => 'B',
        };
        write!(f, "{}{}", side, self.rank)
    }
}
