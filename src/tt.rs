//! Transposition table for caching search results.
//!
//! One entry per slot, indexed by the low bits of the Zobrist hash. An
//! entry is trusted only when its full hash, its epoch (the real-move
//! generation it was computed under) and its search mode all match the
//! probe. Within one epoch a deeper result is never replaced by a
//! shallower one.

use std::mem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

/// Which move generator produced a search result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchMode {
    /// Every legal move of the side to move.
    Broad,
    /// Only the pieces taking part in a chase.
    Chase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    key: u64,
    pub score: i32,
    pub depth: u8,
    pub bound_type: BoundType,
    pub mode: SearchMode,
    pub epoch: u32,
    pub best_move: Move,
}

impl TTEntry {
    const EMPTY: TTEntry = TTEntry {
        key: 0,
        score: 0,
        depth: 0,
        bound_type: BoundType::Exact,
        mode: SearchMode::Broad,
        epoch: 0,
        best_move: Move::null(),
    };

    #[must_use]
    pub fn depth(&self) -> u32 {
        u32::from(self.depth)
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    /// Suggested move, if the search found one.
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        if self.best_move.is_null() {
            None
        } else {
            Some(self.best_move)
        }
    }

    fn is_empty(&self) -> bool {
        self.key == 0 && self.depth == 0 && self.epoch == 0
    }
}

/// Single-threaded transposition table owned by the search state.
pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    mask: usize,
}

impl TranspositionTable {
    /// Create a new transposition table with the given size in megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = mem::size_of::<TTEntry>();
        let mut num_entries = (size_mb * 1024 * 1024) / entry_size;
        num_entries = num_entries.next_power_of_two() / 2;
        if num_entries == 0 {
            num_entries = 1024;
        }
        TranspositionTable {
            entries: vec![TTEntry::EMPTY; num_entries],
            mask: num_entries - 1,
        }
    }

    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Look up `hash`. Entries from another epoch or mode are misses.
    #[must_use]
    pub fn probe(&self, hash: u64, epoch: u32, mode: SearchMode) -> Option<TTEntry> {
        let entry = self.entries[self.index(hash)];
        if !entry.is_empty() && entry.key == hash && entry.epoch == epoch && entry.mode == mode {
            Some(entry)
        } else {
            None
        }
    }

    /// Store a result. An occupied slot from the current epoch is only
    /// replaced by a search at least as deep.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Move,
        mode: SearchMode,
        epoch: u32,
    ) {
        let idx = self.index(hash);
        let depth = depth.min(u32::from(u8::MAX)) as u8;
        let slot = &mut self.entries[idx];
        if !slot.is_empty() && slot.epoch == epoch && slot.depth > depth {
            return;
        }
        *slot = TTEntry {
            key: hash,
            score,
            depth,
            bound_type,
            mode,
            epoch,
            best_move,
        };
    }

    /// Returns table fullness for the given epoch in per mille (0-1000).
    #[must_use]
    pub fn hashfull_per_mille(&self, epoch: u32) -> u32 {
        let sample_size = self.entries.len().min(1000);
        let occupied = self.entries[..sample_size]
            .iter()
            .filter(|e| !e.is_empty() && e.epoch == epoch)
            .count();
        ((occupied as u64 * 1000) / sample_size as u64) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&mut self) {
        self.entries.fill(TTEntry::EMPTY);
    }
}
