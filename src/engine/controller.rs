//! Engine controller implementation.

use std::fmt;
use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::board::search::{find_best_move, SearchConfig, SearchOutcome, SearchState};
use crate::board::{Board, Color, Move, MoveError, MoveResult};
use crate::sync::StopFlag;

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Why a search request produced no outcome.
#[derive(Debug)]
pub enum JobError {
    /// The worker thread could not be started
    Spawn(io::Error),
    /// The worker thread panicked
    Panicked,
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::Spawn(err) => write!(f, "Failed to spawn search thread: {err}"),
            JobError::Panicked => write!(f, "Search thread panicked"),
        }
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JobError::Spawn(err) => Some(err),
            JobError::Panicked => None,
        }
    }
}

/// Handle to a running search.
pub struct SearchJob {
    stop: StopFlag,
    handle: JoinHandle<SearchOutcome>,
}

impl SearchJob {
    /// Ask the search to finish now. It still returns a legal move.
    pub fn cancel(&self) {
        self.stop.stop();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the search is done.
    pub fn wait(self) -> Result<SearchOutcome, JobError> {
        self.handle.join().map_err(|_| JobError::Panicked)
    }

    /// Cancel, then wait.
    pub fn stop_and_wait(self) -> Result<SearchOutcome, JobError> {
        self.cancel();
        self.wait()
    }
}

/// Owns the authoritative board and runs searches against it.
///
/// A search worker holds the board lock for its whole run, so real moves
/// submitted meanwhile wait until the search has finished.
pub struct EngineController {
    board: Arc<Mutex<Board>>,
    search_state: Arc<Mutex<SearchState>>,
    config: SearchConfig,
}

impl EngineController {
    #[must_use]
    pub fn new(board: Board, config: SearchConfig) -> Self {
        EngineController {
            board: Arc::new(Mutex::new(board)),
            search_state: Arc::new(Mutex::new(SearchState::new(config.tt_mb))),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Settings for later requests.
    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Read the board, waiting for any running search.
    pub fn with_board<R>(&self, f: impl FnOnce(&Board) -> R) -> R {
        f(&self.board.lock())
    }

    /// Copy of the current board.
    #[must_use]
    pub fn snapshot(&self) -> Board {
        self.board.lock().clone()
    }

    /// Replace the board for a new game.
    pub fn new_game(&self, board: Board) {
        *self.board.lock() = board;
    }

    #[must_use]
    pub fn turn(&self) -> Color {
        self.board.lock().turn()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        self.board.lock().winner()
    }

    /// Play a real move on the authoritative board.
    pub fn apply_move(&self, mv: Move) -> Result<MoveResult, MoveError> {
        self.board.lock().apply_move(mv)
    }

    pub fn undo_last_move(&self) -> Result<Move, MoveError> {
        self.board.lock().undo_last_move()
    }

    /// Start searching for `side` on a worker thread. Returns once the
    /// worker holds the board.
    pub fn submit_search(&self, side: Color) -> Result<SearchJob, JobError> {
        let stop = StopFlag::new();
        let (ready_tx, ready_rx) = mpsc::channel();

        let board = Arc::clone(&self.board);
        let search_state = Arc::clone(&self.search_state);
        let config = self.config.clone();
        let worker_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("stratego-search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let board = board.lock();
                let _ = ready_tx.send(());
                let mut state = search_state.lock();
                find_best_move(&board, side, &mut state, &config, &worker_stop)
            })
            .map_err(JobError::Spawn)?;

        if ready_rx.recv().is_err() {
            return Err(JobError::Panicked);
        }
        log::debug!("search submitted for {side}");
        Ok(SearchJob { stop, handle })
    }

    /// Search for the side to move and wait for the answer.
    pub fn search(&self) -> Result<SearchOutcome, JobError> {
        let side = self.turn();
        self.submit_search(side)?.wait()
    }
}
