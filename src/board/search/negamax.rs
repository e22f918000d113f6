use super::constants::{INFINITY, KILLER1_SCORE, KILLER2_SCORE, TRAPPED_SCORE, TT_MOVE_SCORE};
use super::{NodeTrace, SearchAborted, SearchContext};
use crate::board::{Move, MoveList, EMPTY_MOVE, MAX_MOVES, MAX_PLY};
use crate::tt::BoundType;

/// Pass moves are tried last.
const PASS_SCORE: i32 = i32::MIN;

impl SearchContext<'_> {
    /// Negamax alpha-beta. Returns the score for the side to move.
    pub(crate) fn negamax(
        &mut self,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
    ) -> Result<i32, SearchAborted> {
        self.visit()?;

        if self.view.is_decided() || ply >= MAX_PLY - 1 {
            return Ok(self.view.score_for_mover());
        }
        if depth == 0 || self.chase_is_over() {
            return self.quiesce(alpha, beta, ply, 0);
        }

        let hash = self.view.hash();
        let alpha_orig = alpha;
        let mut tt_move = EMPTY_MOVE;
        if let Some(entry) = self.state.tt.probe(hash, self.state.epoch, self.mode) {
            self.state.stats.tt_hits += 1;
            tt_move = entry.best_move().unwrap_or(EMPTY_MOVE);
            if entry.depth() >= depth {
                let score = entry.score();
                match entry.bound_type() {
                    BoundType::Exact => return Ok(score),
                    BoundType::LowerBound => alpha = alpha.max(score),
                    BoundType::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    return Ok(score);
                }
            }
        }

        let mover = self.view.to_move();
        let mut moves = MoveList::new();
        self.generate_for_mode(mover, &mut moves);
        if moves.is_empty() {
            // Restricted generators can leave a side without moves it
            // really has; only a full, unsuppressed list proves a trap.
            if self.focus.is_some() || self.view.has_suppressed(mover) {
                return self.quiesce(alpha, beta, ply, 0);
            }
            return Ok(TRAPPED_SCORE + ply as i32);
        }
        moves.push(Move::null());

        let mut scores = [0i32; MAX_MOVES];
        self.score_moves(&moves, &mut scores, tt_move, ply);

        let mut best = -INFINITY;
        let mut best_move = EMPTY_MOVE;
        for i in 0..moves.len() {
            pick_next(&mut moves, &mut scores, i);
            let mv = moves[i];
            let before = self.view.value();
            let undo = self.view.make_move(mv, ply);
            let after = self.view.value();
            let result = self.negamax(depth - 1, -beta, -alpha, ply + 1);
            self.view.unmake_move(undo);
            let score = -result?;

            if self.config.trace {
                self.trace(NodeTrace {
                    ply,
                    depth,
                    mv,
                    before,
                    after,
                    score,
                    mode: self.mode,
                });
            }

            if score > best {
                best = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                if !undo.is_attack() && !mv.is_null() {
                    self.state.killers.update(ply, mv);
                    self.state.history.update(mv, depth);
                }
                break;
            }
        }

        let bound = if best <= alpha_orig {
            BoundType::UpperBound
        } else if best >= beta {
            BoundType::LowerBound
        } else {
            BoundType::Exact
        };
        self.state
            .tt
            .store(hash, depth, best, bound, best_move, self.mode, self.state.epoch);
        Ok(best)
    }

    /// Ordering keys: TT move, then killers, then history. The pass goes
    /// last.
    pub(crate) fn score_moves(
        &self,
        moves: &MoveList,
        scores: &mut [i32; MAX_MOVES],
        tt_move: Move,
        ply: usize,
    ) {
        let killer1 = self.state.killers.primary(ply);
        let killer2 = self.state.killers.secondary(ply);
        for (slot, &mv) in scores.iter_mut().zip(moves.iter()) {
            *slot = if mv.is_null() {
                PASS_SCORE
            } else if mv == tt_move {
                TT_MOVE_SCORE
            } else if mv == killer1 {
                KILLER1_SCORE
            } else if mv == killer2 {
                KILLER2_SCORE
            } else {
                self.state.history.score(mv)
            };
        }
    }

    pub(crate) fn trace(&self, node: NodeTrace) {
        ::log::trace!(
            "{:?} ply {} depth {} {} {} -> {} = {}",
            node.mode,
            node.ply,
            node.depth,
            node.mv,
            node.before,
            node.after,
            node.score
        );
        if let Some(logger) = &self.config.logger {
            logger.trace(&node);
        }
    }
}

/// Swap the best-scored remaining move into slot `i`.
pub(crate) fn pick_next(moves: &mut MoveList, scores: &mut [i32; MAX_MOVES], i: usize) {
    let mut best = i;
    for j in i + 1..moves.len() {
        if scores[j] > scores[best] {
            best = j;
        }
    }
    if best != i {
        moves.swap(i, best);
        scores.swap(i, best);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    #[test]
    fn pick_next_selects_highest_remaining() {
        let sq = |s: &str| s.parse::<Square>().unwrap();
        let mut moves = MoveList::new();
        moves.push(Move::new(sq("a1"), sq("a2")));
        moves.push(Move::new(sq("b1"), sq("b2")));
        moves.push(Move::new(sq("c1"), sq("c2")));
        let mut scores = [0i32; MAX_MOVES];
        scores[..3].copy_from_slice(&[5, 40, 10]);

        pick_next(&mut moves, &mut scores, 0);
        assert_eq!(moves[0], Move::new(sq("b1"), sq("b2")));
        pick_next(&mut moves, &mut scores, 1);
        assert_eq!(moves[1], Move::new(sq("c1"), sq("c2")));
        assert_eq!(scores[2], 5);
    }
}
