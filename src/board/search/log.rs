use crate::board::Move;
use crate::tt::SearchMode;

/// Summary of one completed iteration.
#[derive(Clone, Debug)]
pub struct SearchInfo {
    pub depth: u32,
    pub score: i32,
    pub nodes: u64,
    pub nps: u64,
    pub hashfull: u32,
    pub time_ms: u128,
    pub best_move: Move,
    pub mode: SearchMode,
}

/// One candidate move examined at an interior node.
#[derive(Clone, Debug)]
pub struct NodeTrace {
    pub ply: usize,
    pub depth: u32,
    pub mv: Move,
    /// Evaluation before and after the move, searching side's view.
    pub before: i32,
    pub after: i32,
    /// Backed-up score for the side that played `mv`.
    pub score: i32,
    pub mode: SearchMode,
}

pub trait SearchLogger: Send + Sync {
    fn info(&self, info: &SearchInfo);

    /// Per-node diagnostics, only sent when tracing is enabled.
    fn trace(&self, _node: &NodeTrace) {}
}

pub struct StdoutLogger;

impl SearchLogger for StdoutLogger {
    fn info(&self, info: &SearchInfo) {
        println!(
            "info depth {} score {} nodes {} nps {} hashfull {} time {} mode {:?} pv {}",
            info.depth,
            info.score,
            info.nodes,
            info.nps,
            info.hashfull,
            info.time_ms,
            info.mode,
            info.best_move
        );
    }

    fn trace(&self, node: &NodeTrace) {
        println!(
            "trace ply {} depth {} {:?} {} {} -> {} score {}",
            node.ply, node.depth, node.mode, node.mv, node.before, node.after, node.score
        );
    }
}
