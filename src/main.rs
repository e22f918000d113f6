use std::env;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use stratego_engine::board::search::{SearchConfig, SearchOutcome, StdoutLogger};
use stratego_engine::board::{Board, MoveResult, RuleConfig};
use stratego_engine::EngineController;

const MAX_TURNS: usize = 400;

fn main() {
    let args: Vec<String> = env::args().collect();
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(7u64);
    let time_ms = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(200u64);
    let verbose = args.iter().any(|a| a == "-v");

    let mut rng = StdRng::seed_from_u64(seed);
    let board = Board::random_setup(RuleConfig::default(), &mut rng);
    let config = SearchConfig {
        time_limit_ms: time_ms,
        seed,
        logger: if verbose {
            Some(Arc::new(StdoutLogger))
        } else {
            None
        },
        ..SearchConfig::default()
    };
    let engine = EngineController::new(board, config);

    for turn in 1..=MAX_TURNS {
        if let Some(winner) = engine.winner() {
            println!("{winner} wins after {} turns", turn - 1);
            return;
        }
        let side = engine.turn();
        let outcome = match engine.search() {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("{err}");
                return;
            }
        };
        let result = match outcome {
            SearchOutcome::Trapped => {
                println!("{side} is trapped and loses");
                return;
            }
            SearchOutcome::Best(result) => result,
        };
        match engine.apply_move(result.best_move) {
            Ok(MoveResult::Moved) => {
                println!("{turn:3} {side} {} ({})", result.best_move, result.value);
            }
            Ok(MoveResult::Attacked(outcome)) => println!(
                "{turn:3} {side} {} attacks: {outcome:?} ({})",
                result.best_move, result.value
            ),
            Err(err) => {
                eprintln!("engine chose an illegal move {}: {err}", result.best_move);
                return;
            }
        }
    }
    println!("no result after {MAX_TURNS} turns");
}
