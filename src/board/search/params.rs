#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable search behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchParams {
    /// A deeper iteration may replace the standing best move only if its
    /// value is within this margin of the standing value...
    pub horizon_margin: i32,
    /// ...or if it is at least this many plies deeper.
    pub horizon_depth_lead: u32,
    /// Extra plies allowed per invocation to confirm a suspicious drop.
    pub horizon_extensions: u32,
    /// Capture-only plies searched past the horizon.
    pub max_qsearch_depth: u32,
    /// Completed iterations in a row that must flee the same aggressor.
    pub chase_trigger_passes: u32,
    /// Broad depth that must be reached before a chase search may start.
    pub chase_min_depth: u32,
    /// Plies the chase search goes past the completed broad depth.
    pub chase_extra_depth: u32,
    /// Chase lines end once the chaser is farther than this from its prey.
    pub chase_abandon_distance: usize,
    /// Escape cells the fleeing piece needs for a chase search to be worth it.
    pub chase_min_escapes: usize,
    /// Give hidden, never-moved opponent pieces attacks only.
    pub suppress_unmoved_unknowns: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            horizon_margin: 20,
            horizon_depth_lead: 2,
            horizon_extensions: 2,
            max_qsearch_depth: 4,
            chase_trigger_passes: 2,
            chase_min_depth: 3,
            chase_extra_depth: 6,
            chase_abandon_distance: 3,
            chase_min_escapes: 2,
            suppress_unmoved_unknowns: true,
        }
    }
}
