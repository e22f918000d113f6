//! Stratego board representation, rules and search.
//!
//! The board is a flat array of optional piece slots with a water border.
//! Pieces live in an arena indexed by [`PieceId`] and move between the grid
//! and the tray; nothing is allocated once a game is set up.
//!
//! # Example
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use stratego_engine::board::{Board, Color, RuleConfig};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let board = Board::random_setup(RuleConfig::default(), &mut rng);
//! let moves = board.legal_moves(Color::Red);
//! println!("Red has {} opening moves", moves.len());
//! ```

mod config;
mod error;
mod make_unmake;
mod rules;
pub mod search;
mod setup;
mod state;
mod types;
pub mod view;

#[cfg(test)]
mod tests;

pub use config::RuleConfig;
pub use error::{MoveError, PlacementError, SetupError, SquareError};
pub use make_unmake::MoveResult;
pub use state::{Board, UnmakeInfo};
pub use types::{
    fight, Color, IdAllocator, Move, MoveList, Outcome, Piece, PieceId, Rank, RankInfo, Square,
    ARMY_SIZE, BOARD_DIM, DIRECTIONS, GRID_SIZE, GRID_WIDTH, RANK_SLOTS, RANK_TABLE,
};

pub use search::{find_best_move, SearchConfig, SearchOutcome, SearchResult, SearchState};
pub use view::SearchView;

pub(crate) use rules::forbidden_repeat;
pub(crate) use types::{EMPTY_MOVE, MAX_MOVES, MAX_PLY};
