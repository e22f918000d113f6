//! Error types for board operations.

use std::fmt;

use super::{Color, Rank, Square};

/// Error type for square notation parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Column letter past `j`
    ColumnOutOfBounds { column: usize },
    /// Row number outside 1-10
    RowOutOfBounds { row: usize },
    /// Not of the form letter + number
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::ColumnOutOfBounds { column } => {
                write!(f, "Column {column} out of bounds (must be 0-9)")
            }
            SquareError::RowOutOfBounds { row } => {
                write!(f, "Row {row} out of bounds (must be 1-10)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Why a move or attack was refused. The board is unchanged whenever one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The game already has a winner
    GameOver,
    /// Source or destination is water or off the board
    NotPlayable { square: Square },
    /// Nothing stands on the source cell
    NoPiece { square: Square },
    /// The piece on the source cell belongs to the other side
    WrongTurn { expected: Color },
    /// Bombs and flags never move
    Immobile { rank: Rank },
    /// Destination holds a piece of the mover's own side
    OwnPiece { square: Square },
    /// Destination is not reachable by this rank in one move
    NotReachable { from: Square, to: Square },
    /// A long-range move crosses an occupied cell
    Blocked { at: Square },
    /// Plain move onto an occupied cell, or attack on an empty one
    WrongKind { to: Square },
    /// Third repetition of the same back-and-forth step
    TwoSquares { from: Square, to: Square },
    /// Nothing to undo
    EmptyHistory,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::GameOver => write!(f, "The game is over"),
            MoveError::NotPlayable { square } => write!(f, "Square {square} is not playable"),
            MoveError::NoPiece { square } => write!(f, "No piece on {square}"),
            MoveError::WrongTurn { expected } => write!(f, "It is {expected}'s turn"),
            MoveError::Immobile { rank } => write!(f, "Rank {rank} cannot move"),
            MoveError::OwnPiece { square } => write!(f, "Own piece already on {square}"),
            MoveError::NotReachable { from, to } => {
                write!(f, "Cannot reach {to} from {from} in one move")
            }
            MoveError::Blocked { at } => write!(f, "Path blocked at {at}"),
            MoveError::WrongKind { to } => {
                write!(f, "Move to {to} must be an attack if occupied, a step otherwise")
            }
            MoveError::TwoSquares { from, to } => {
                write!(f, "Two-squares rule forbids {from}-{to}")
            }
            MoveError::EmptyHistory => write!(f, "No move to undo"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Why a setup placement was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Placement happens only before the first move
    GameStarted,
    /// Water, lake or off the board
    NotPlayable { square: Square },
    /// Outside the side's four setup rows
    OutOfZone { square: Square, color: Color },
    /// Cell already holds a piece
    Occupied { square: Square },
    /// No unplaced piece of that rank left in the tray
    NotInTray { color: Color, rank: Rank },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::GameStarted => write!(f, "Pieces can only be placed before play"),
            PlacementError::NotPlayable { square } => {
                write!(f, "Square {square} is not playable")
            }
            PlacementError::OutOfZone { square, color } => {
                write!(f, "Square {square} is outside {color}'s setup zone")
            }
            PlacementError::Occupied { square } => write!(f, "Square {square} is occupied"),
            PlacementError::NotInTray { color, rank } => {
                write!(f, "No unplaced {color} {rank} in the tray")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// A setup stream that could not be applied in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupError {
    /// Zero-based position of the rejected command
    pub index: usize,
    /// Why it was rejected
    pub cause: PlacementError,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Setup command {} rejected: {}", self.index, self.cause)
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn move_error_display() {
        let err = MoveError::TwoSquares {
            from: sq("a1"),
            to: sq("a2"),
        };
        assert_eq!(err.to_string(), "Two-squares rule forbids a1-a2");
        assert_eq!(
            MoveError::Immobile { rank: Rank::Bomb }.to_string(),
            "Rank B cannot move"
        );
    }

    #[test]
    fn setup_error_exposes_cause() {
        use std::error::Error;
        let err = SetupError {
            index: 4,
            cause: PlacementError::Occupied { square: sq("c4") },
        };
        assert_eq!(err.to_string(), "Setup command 4 rejected: Square c4 is occupied");
        assert!(err.source().is_some());
    }

    #[test]
    fn square_error_display() {
        let err = SquareError::RowOutOfBounds { row: 11 };
        assert_eq!(err.to_string(), "Row 11 out of bounds (must be 1-10)");
    }
}
