//! Search constants.

// ============================================================================
// SCORES
// ============================================================================

/// Window bound larger than any reachable score.
pub const INFINITY: i32 = 32_000;

/// Score for the side to move when it has no move at all (before the ply
/// adjustment that prefers slower losses).
pub const TRAPPED_SCORE: i32 = -30_000;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores = tried earlier. Ordered: TT > killers > history

/// Hash move (from transposition table) - highest priority
pub const TT_MOVE_SCORE: i32 = 1 << 30;

/// First killer move (caused a beta cutoff at the same ply)
pub const KILLER1_SCORE: i32 = 1 << 29;

/// Second killer move (replaced killer)
pub const KILLER2_SCORE: i32 = 1 << 28;
