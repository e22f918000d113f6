//! Board cells.
//!
//! The 10x10 playing area is embedded in an 11-column, 12-row array with a
//! one-cell water border, so stepping off the edge from any playable cell
//! lands on a non-playable cell instead of wrapping or going out of range.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

/// Playable columns and rows.
pub const BOARD_DIM: usize = 10;
/// Cells per stored row (ten playable plus one shared border column).
pub const GRID_WIDTH: usize = 11;
/// Total stored cells including the border.
pub const GRID_SIZE: usize = GRID_WIDTH * 12 + 1;

/// Orthogonal steps in index space: up, left, right, down.
pub const DIRECTIONS: [isize; 4] = [-(GRID_WIDTH as isize), -1, 1, GRID_WIDTH as isize];

const LAKES: [(usize, usize); 8] = [
    (2, 4),
    (3, 4),
    (2, 5),
    (3, 5),
    (6, 4),
    (7, 4),
    (6, 5),
    (7, 5),
];

static PLAYABLE: Lazy<[bool; GRID_SIZE]> = Lazy::new(|| {
    let mut cells = [false; GRID_SIZE];
    for y in 0..BOARD_DIM {
        for x in 0..BOARD_DIM {
            cells[Square::index_of(x, y)] = true;
        }
    }
    for (x, y) in LAKES {
        cells[Square::index_of(x, y)] = false;
    }
    cells
});

/// A cell of the bordered grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// First and last indices that can hold a playable cell.
    pub const FIRST: usize = GRID_WIDTH + 1;
    pub const LAST: usize = BOARD_DIM + BOARD_DIM * GRID_WIDTH;
    /// Border cell used as the origin of the null move.
    pub const NONE: Square = Square(0);

    #[inline]
    const fn index_of(x: usize, y: usize) -> usize {
        x + 1 + (y + 1) * GRID_WIDTH
    }

    /// Square at column `x`, row `y` (row 0 is the top edge).
    #[must_use]
    pub fn new(x: usize, y: usize) -> Option<Self> {
        if x < BOARD_DIM && y < BOARD_DIM {
            Some(Square(Self::index_of(x, y) as u8))
        } else {
            None
        }
    }

    /// Square for a raw grid index, whether or not it is playable.
    #[must_use]
    pub const fn from_index(idx: usize) -> Option<Self> {
        if idx < GRID_SIZE {
            Some(Square(idx as u8))
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn x(self) -> usize {
        (self.0 as usize % GRID_WIDTH).saturating_sub(1)
    }

    #[inline]
    #[must_use]
    pub const fn y(self) -> usize {
        (self.0 as usize / GRID_WIDTH).saturating_sub(1)
    }

    /// Inside the 10x10 area and not a lake.
    #[inline]
    #[must_use]
    pub fn is_playable(self) -> bool {
        PLAYABLE[self.index()]
    }

    /// One step in index space. Only meaningful from a playable cell, where
    /// the border guarantees the result stays inside the grid.
    #[inline]
    #[must_use]
    pub fn step(self, dir: isize) -> Square {
        Square(self.0.wrapping_add_signed(dir as i8))
    }

    /// Playable orthogonal neighbours.
    pub fn neighbors(self) -> impl Iterator<Item = Square> {
        DIRECTIONS
            .into_iter()
            .map(move |d| self.step(d))
            .filter(|sq| sq.is_playable())
    }

    #[must_use]
    pub fn is_adjacent(self, other: Square) -> bool {
        DIRECTIONS.iter().any(|&d| self.step(d) == other)
    }

    /// Manhattan distance between two cells.
    #[must_use]
    pub const fn distance(self, other: Square) -> usize {
        self.x().abs_diff(other.x()) + self.y().abs_diff(other.y())
    }

    /// Index-space direction from `self` to `other` when both lie on one
    /// row or column.
    #[must_use]
    pub fn direction_to(self, other: Square) -> Option<isize> {
        if self == other {
            return None;
        }
        if self.y() == other.y() {
            Some(if other.x() > self.x() { 1 } else { -1 })
        } else if self.x() == other.x() {
            Some(if other.y() > self.y() {
                GRID_WIDTH as isize
            } else {
                -(GRID_WIDTH as isize)
            })
        } else {
            None
        }
    }

    /// All playable cells in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (Self::FIRST..=Self::LAST)
            .map(|i| Square(i as u8))
            .filter(|sq| sq.is_playable())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.x() as u8) as char;
        write!(f, "{}{}", file, BOARD_DIM - self.y())
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SquareError::InvalidNotation {
            notation: s.to_string(),
        };
        let mut chars = s.chars();
        let file = chars.next().ok_or_else(invalid)?;
        if !file.is_ascii_lowercase() {
            return Err(invalid());
        }
        let row: usize = chars.as_str().parse().map_err(|_| invalid())?;
        let x = file as usize - 'a' as usize;
        if x >= BOARD_DIM {
            return Err(SquareError::ColumnOutOfBounds { column: x });
        }
        if row == 0 || row > BOARD_DIM {
            return Err(SquareError::RowOutOfBounds { row });
        }
        Square::new(x, BOARD_DIM - row).ok_or_else(invalid)
    }
}
