use super::{SearchAborted, SearchContext};
use crate::board::{Move, MoveList, Square, MAX_PLY};

impl SearchContext<'_> {
    /// Attack-only search past the horizon.
    ///
    /// Standing pat is not free: the opponent would then play its best
    /// attack. If the piece it would hit can step away, only the best
    /// attack on some other cell still lands.
    pub(crate) fn quiesce(
        &mut self,
        mut alpha: i32,
        beta: i32,
        ply: usize,
        qdepth: u32,
    ) -> Result<i32, SearchAborted> {
        self.visit()?;

        let stand_pat = self.view.score_for_mover();
        if self.view.is_decided() || ply >= MAX_PLY - 1 {
            return Ok(stand_pat);
        }
        let mut best = stand_pat - self.threat_loss(ply);
        if qdepth >= self.params().max_qsearch_depth || best >= beta {
            return Ok(best);
        }
        alpha = alpha.max(best);

        let mover = self.view.to_move();
        let mut attacks = MoveList::new();
        self.view.generate_attacks(mover, &mut attacks);
        for &mv in attacks.iter() {
            let undo = self.view.make_move(mv, ply);
            let result = self.quiesce(-beta, -alpha, ply + 1, qdepth + 1);
            self.view.unmake_move(undo);
            let score = -result?;

            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }
        Ok(best)
    }

    /// What the side to move loses by making a quiet move: the
    /// opponent's best attack gain, or its best gain on another cell when
    /// the most threatened piece can flee.
    fn threat_loss(&mut self, ply: usize) -> i32 {
        let pass = self.view.make_move(Move::null(), ply);
        let attacker = self.view.to_move();
        let sign = if attacker == self.view.side() { 1 } else { -1 };
        let mut attacks = MoveList::new();
        self.view.generate_attacks(attacker, &mut attacks);

        let (mut first, mut second) = ((Square::NONE, 0), (Square::NONE, 0));
        for &mv in attacks.iter() {
            let before = self.view.value();
            let undo = self.view.make_move(mv, ply);
            let gain = sign * (self.view.value() - before);
            self.view.unmake_move(undo);

            let target = mv.to();
            if target == first.0 {
                first.1 = first.1.max(gain);
            } else if gain > first.1 {
                second = first;
                first = (target, gain);
            } else if gain > second.1 {
                second = (target, gain);
            }
        }
        self.view.unmake_move(pass);

        if first.1 <= 0 {
            0
        } else if self.can_flee(first.0) {
            second.1.max(0)
        } else {
            first.1
        }
    }

    fn can_flee(&self, sq: Square) -> bool {
        let Some(piece) = self.view.piece_at(sq) else {
            return false;
        };
        piece.rank().is_movable()
            && !self.view.is_suppressed(piece)
            && sq.neighbors().any(|n| self.view.piece_at(n).is_none())
    }
}
