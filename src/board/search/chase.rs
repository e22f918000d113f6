//! Chase detection and the restricted chase search.
//!
//! When the broad search keeps answering with the same piece running from
//! the same aggressor, the pair is searched again much deeper with only
//! the pieces near them allowed to move.

use super::{SearchAborted, SearchContext};
use crate::board::{Color, Move, MoveList, PieceId, Square};
use crate::tt::SearchMode;

/// The two pieces a chase search is restricted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChaseFocus {
    pub(crate) chaser: PieceId,
    pub(crate) chased: PieceId,
}

/// Consecutive iterations that answered the same chase by fleeing.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FlightStreak {
    focus: Option<ChaseFocus>,
    passes: u32,
}

impl FlightStreak {
    /// Record the best move of one completed iteration.
    pub(crate) fn observe(&mut self, flight: Option<ChaseFocus>) -> u32 {
        match flight {
            Some(focus) if self.focus == Some(focus) => self.passes += 1,
            Some(focus) => {
                self.focus = Some(focus);
                self.passes = 1;
            }
            None => *self = FlightStreak::default(),
        }
        self.passes
    }

    pub(crate) fn focus(&self) -> Option<ChaseFocus> {
        self.focus
    }
}

impl SearchContext<'_> {
    /// Moves for the current mode: everything, or in a chase only the two
    /// focus pieces and pieces next to either of them.
    pub(crate) fn generate_for_mode(&self, color: Color, moves: &mut MoveList) {
        self.view.generate_moves(color, moves);
        if let Some(focus) = self.focus {
            let anchors = [
                self.view.location(focus.chaser),
                self.view.location(focus.chased),
            ];
            moves.retain(|mv| {
                let from = mv.from();
                anchors
                    .iter()
                    .flatten()
                    .any(|&a| a == from || a.is_adjacent(from))
            });
        }
    }

    /// A chase line ends once either piece is gone or the chaser has
    /// fallen too far behind.
    pub(crate) fn chase_is_over(&self) -> bool {
        let Some(focus) = self.focus else {
            return false;
        };
        match (
            self.view.location(focus.chaser),
            self.view.location(focus.chased),
        ) {
            (Some(a), Some(b)) => a.distance(b) > self.params().chase_abandon_distance,
            _ => true,
        }
    }

    /// If `mv` moves a piece away from an adjacent enemy, the pair it is
    /// fleeing. Attacks never count as flight.
    pub(crate) fn flight(&self, mv: Move) -> Option<ChaseFocus> {
        let (from, to) = (mv.from(), mv.to());
        if mv.is_null() || self.view.piece_at(to).is_some() {
            return None;
        }
        let chased = self.view.piece_at(from)?;
        from.neighbors()
            .filter_map(|n| self.view.piece_at(n).map(|p| (n, p)))
            .filter(|(n, p)| {
                p.color() != chased.color()
                    && p.rank().is_movable()
                    && n.distance(to) > n.distance(from)
            })
            .map(|(_, p)| ChaseFocus {
                chaser: p.id(),
                chased: chased.id(),
            })
            .next()
    }

    /// Empty cells next to the chased piece that do not touch the chaser.
    pub(crate) fn escape_count(&self, focus: ChaseFocus) -> usize {
        let (Some(chaser), Some(chased)) = (
            self.view.location(focus.chaser),
            self.view.location(focus.chased),
        ) else {
            return 0;
        };
        chased
            .neighbors()
            .filter(|&n| self.view.piece_at(n).is_none() && !n.is_adjacent(chaser))
            .count()
    }

    /// Search the chase `extra` plies past `depth`. Returns `None` when the
    /// restricted tree has no root move.
    pub(crate) fn chase_search(
        &mut self,
        focus: ChaseFocus,
        depth: u32,
    ) -> Result<Option<(Move, i32)>, SearchAborted> {
        let mut moves = MoveList::new();
        self.focus = Some(focus);
        self.mode = SearchMode::Chase;
        self.generate_for_mode(self.view.to_move(), &mut moves);
        ::log::debug!(
            "chase search at depth {depth}: {} root moves around {}",
            moves.len(),
            self.view
                .location(focus.chased)
                .map_or_else(|| "-".to_string(), |sq: Square| sq.to_string())
        );
        self.state.stats.chase_searches += 1;
        let result = if moves.is_empty() {
            Ok(None)
        } else {
            self.search_root(depth, &mut moves).map(Some)
        };
        self.focus = None;
        self.mode = SearchMode::Broad;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streak_counts_repeated_flight() {
        let focus = ChaseFocus {
            chaser: PieceId(3),
            chased: PieceId(44),
        };
        let mut streak = FlightStreak::default();
        assert_eq!(streak.observe(Some(focus)), 1);
        assert_eq!(streak.observe(Some(focus)), 2);
        assert_eq!(streak.focus(), Some(focus));
        assert_eq!(streak.observe(None), 0);
        assert_eq!(streak.focus(), None);
    }
}
