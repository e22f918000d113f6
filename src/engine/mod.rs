//! Engine controller for running searches beside the authoritative board.
//!
//! A request is a [`SearchJob`]: the worker owns the board for the length
//! of the search and the caller may cancel it or wait for the outcome.

mod controller;

pub use controller::{EngineController, JobError, SearchJob};
