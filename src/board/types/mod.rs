//! Core game types.
//!
//! - `Rank`, the rank data table and `fight` combat resolution
//! - `Color`, `PieceId`, `Piece` and the session `IdAllocator`
//! - `Square` - cell of the bordered grid
//! - `Move` and `MoveList` - packed moves

mod moves;
mod piece;
mod rank;
mod square;

pub use moves::{Move, MoveList};
pub use piece::{Color, IdAllocator, Piece, PieceId};
pub use rank::{fight, Outcome, Rank, RankInfo, ARMY_SIZE, RANK_SLOTS, RANK_TABLE};
pub use square::{Square, BOARD_DIM, DIRECTIONS, GRID_SIZE, GRID_WIDTH};

pub(crate) use moves::{EMPTY_MOVE, MAX_MOVES, MAX_PLY};
