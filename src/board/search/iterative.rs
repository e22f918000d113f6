use super::chase::FlightStreak;
use super::constants::INFINITY;
use super::{SearchAborted, SearchContext, SearchInfo, SearchOutcome, SearchResult};
use crate::board::{Move, MoveList, EMPTY_MOVE, MAX_MOVES};
use crate::tt::BoundType;

use super::negamax::pick_next;

/// Standing best move of the iterative deepening loop.
#[derive(Clone, Copy, Debug)]
struct Standing {
    mv: Move,
    value: i32,
    depth: u32,
    chase: bool,
}

impl SearchContext<'_> {
    /// Iterative deepening driver.
    ///
    /// A deeper iteration only replaces the standing move if it is not much
    /// worse or is clearly deeper; otherwise the search is extended by a
    /// ply (a bounded number of times) to look past the drop.
    pub(crate) fn iterate(&mut self) -> SearchOutcome {
        let side = self.view.side();
        let mut root_moves = MoveList::new();
        self.view.generate_moves(side, &mut root_moves);
        let Some(first) = root_moves.first() else {
            return SearchOutcome::Trapped;
        };
        if root_moves.len() == 1 {
            return SearchOutcome::Best(SearchResult {
                best_move: first,
                value: self.view.value(),
                depth: 0,
                nodes: self.nodes,
                chase: false,
            });
        }

        let params = self.params().clone();
        let mut standing: Option<Standing> = None;
        let mut streak = FlightStreak::default();
        let mut extensions = 0;
        let mut depth = 1;
        while depth <= self.config.max_depth + extensions {
            let Ok((mv, value)) = self.search_root(depth, &mut root_moves) else {
                ::log::debug!("depth {depth} aborted after {} nodes", self.nodes);
                break;
            };

            let accept = standing.map_or(true, |s| {
                value >= s.value - params.horizon_margin
                    || depth >= s.depth + params.horizon_depth_lead
            });
            if !accept {
                if extensions < params.horizon_extensions {
                    extensions += 1;
                    ::log::debug!("depth {depth}: value fell to {value}, extending");
                }
                depth += 1;
                continue;
            }
            standing = Some(Standing {
                mv,
                value,
                depth,
                chase: false,
            });
            self.report(depth, value, mv);

            let passes = streak.observe(self.flight(mv));
            if let Some(focus) = streak.focus() {
                if passes >= params.chase_trigger_passes
                    && depth >= params.chase_min_depth
                    && self.escape_count(focus) >= params.chase_min_escapes
                {
                    let chase_depth = depth + params.chase_extra_depth;
                    match self.chase_search(focus, chase_depth) {
                        Ok(Some((chase_mv, chase_value))) => {
                            ::log::debug!(
                                "chase {chase_mv} scores {chase_value} against broad {mv} {value}"
                            );
                            if chase_value >= value - params.horizon_margin {
                                standing = Some(Standing {
                                    mv: chase_mv,
                                    value: chase_value,
                                    depth: chase_depth,
                                    chase: true,
                                });
                            }
                        }
                        Ok(None) => {}
                        Err(SearchAborted) => {
                            ::log::debug!("chase search aborted, keeping broad move");
                        }
                    }
                    break;
                }
            }
            depth += 1;
        }

        let standing = standing.unwrap_or(Standing {
            mv: first,
            value: self.view.value(),
            depth: 0,
            chase: false,
        });
        SearchOutcome::Best(SearchResult {
            best_move: standing.mv,
            value: standing.value,
            depth: standing.depth,
            nodes: self.nodes,
            chase: standing.chase,
        })
    }

    /// Full-window search of the root moves. Returns the best move and its
    /// value for the side to move.
    pub(crate) fn search_root(
        &mut self,
        depth: u32,
        moves: &mut MoveList,
    ) -> Result<(Move, i32), SearchAborted> {
        self.visit()?;
        let hash = self.view.hash();
        let tt_move = self
            .state
            .tt
            .probe(hash, self.state.epoch, self.mode)
            .and_then(|e| e.best_move())
            .unwrap_or(EMPTY_MOVE);

        let mut scores = [0i32; MAX_MOVES];
        self.score_moves(moves, &mut scores, tt_move, 0);

        let mut alpha = -INFINITY;
        let mut best_move = EMPTY_MOVE;
        for i in 0..moves.len() {
            pick_next(moves, &mut scores, i);
            let mv = moves[i];
            let before = self.view.value();
            let undo = self.view.make_move(mv, 0);
            let after = self.view.value();
            let result = self.negamax(depth - 1, -INFINITY, -alpha, 1);
            self.view.unmake_move(undo);
            let score = -result?;

            if self.config.trace {
                self.trace(super::NodeTrace {
                    ply: 0,
                    depth,
                    mv,
                    before,
                    after,
                    score,
                    mode: self.mode,
                });
            }
            if best_move.is_null() || score > alpha {
                alpha = score;
                best_move = mv;
            }
        }

        self.state.tt.store(
            hash,
            depth,
            alpha,
            BoundType::Exact,
            best_move,
            self.mode,
            self.state.epoch,
        );
        Ok((best_move, alpha))
    }

    fn report(&self, depth: u32, score: i32, best_move: Move) {
        let time_ms = self.elapsed_ms();
        let nps = if time_ms > 0 {
            (u128::from(self.nodes) * 1000 / time_ms) as u64
        } else {
            0
        };
        let info = SearchInfo {
            depth,
            score,
            nodes: self.nodes,
            nps,
            hashfull: self.state.tt.hashfull_per_mille(self.state.epoch),
            time_ms,
            best_move,
            mode: self.mode,
        };
        ::log::debug!(
            "depth {} score {} nodes {} time {}ms best {}",
            info.depth,
            info.score,
            info.nodes,
            info.time_ms,
            info.best_move
        );
        if let Some(logger) = &self.config.logger {
            logger.info(&info);
        }
    }
}
