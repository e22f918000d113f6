//! Initial placement.
//!
//! Placement is a stream of `(rank, square)` commands per side. A stream
//! that fails part way leaves the accepted placements in place;
//! [`Board::place_remaining`] then puts whatever is still in the tray onto
//! free cells of the side's zone.

use rand::seq::SliceRandom;
use rand::Rng;

use super::error::{PlacementError, SetupError};
use super::{Board, Color, PieceId, Rank, RuleConfig, Square};

impl Board {
    /// Place one unplaced piece of `color` and `rank` on `sq`.
    pub fn place(
        &mut self,
        color: Color,
        rank: Rank,
        sq: Square,
    ) -> Result<PieceId, PlacementError> {
        if self.has_started() {
            return Err(PlacementError::GameStarted);
        }
        if !sq.is_playable() {
            return Err(PlacementError::NotPlayable { square: sq });
        }
        if !color.setup_rows().contains(&sq.y()) {
            return Err(PlacementError::OutOfZone { square: sq, color });
        }
        if self.id_at(sq).is_some() {
            return Err(PlacementError::Occupied { square: sq });
        }
        let slot = self
            .tray
            .iter()
            .position(|&id| {
                let p = self.piece(id);
                p.color() == color && p.rank() == rank
            })
            .ok_or(PlacementError::NotInTray { color, rank })?;
        let id = self.tray.remove(slot);
        self.set_cell(sq, Some(id));
        Ok(id)
    }

    /// Apply a placement stream, stopping at the first rejected command.
    /// Returns how many commands were applied.
    pub fn apply_setup(
        &mut self,
        color: Color,
        commands: &[(Rank, Square)],
    ) -> Result<usize, SetupError> {
        for (index, &(rank, sq)) in commands.iter().enumerate() {
            self.place(color, rank, sq)
                .map_err(|cause| SetupError { index, cause })?;
        }
        Ok(commands.len())
    }

    /// Place every unplaced piece of `color` on a random free cell of its
    /// zone. Returns how many pieces were placed.
    pub fn place_remaining<R: Rng + ?Sized>(&mut self, color: Color, rng: &mut R) -> usize {
        if self.has_started() {
            return 0;
        }
        let mut free: Vec<Square> = Square::all()
            .filter(|sq| color.setup_rows().contains(&sq.y()) && self.id_at(*sq).is_none())
            .collect();
        free.shuffle(rng);
        let pending: Vec<PieceId> = self
            .tray
            .iter()
            .copied()
            .filter(|&id| self.piece(id).color() == color)
            .collect();
        let mut placed = 0;
        for (id, sq) in pending.into_iter().zip(free) {
            if let Some(slot) = self.tray.iter().position(|&t| t == id) {
                self.tray.remove(slot);
                self.set_cell(sq, Some(id));
                placed += 1;
            }
        }
        placed
    }

    /// A board with both armies placed at random.
    #[must_use]
    pub fn random_setup<R: Rng + ?Sized>(rules: RuleConfig, rng: &mut R) -> Self {
        let mut board = Board::new(rules);
        for color in Color::BOTH {
            board.place_remaining(color, rng);
        }
        board
    }
}
