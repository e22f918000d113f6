pub mod board;
pub mod engine;
pub mod sync;
pub mod tt;
pub mod zobrist;

pub use board::{Board, Color, Move, Piece, Rank, RuleConfig, Square};
pub use engine::EngineController;
pub use sync::StopFlag;
pub use tt::TranspositionTable;
