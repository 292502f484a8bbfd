//! mcts-uci - chess engine front end
//!
//! A long-running process that:
//! 1. Loads the evaluation weights once at startup (fatal if missing)
//! 2. Reads protocol commands from stdin, one per line
//! 3. Runs an MCTS search for every `go` and answers on stdout
//!
//! Logs go to stderr so stdout carries protocol lines only.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mcts::{PieceSquareModel, StaticEvaluator};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info};

mod config;
mod protocol;
mod time_control;

use crate::config::Config;
use crate::protocol::{Flow, UciEngine};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let weights_path = config.weights_path();
    let model = PieceSquareModel::load(&weights_path).with_context(|| {
        format!(
            "failed to load evaluation weights from {}",
            weights_path.display()
        )
    })?;
    let evaluator = StaticEvaluator::new(Arc::new(model))
        .with_quiescence_depth(config.quiescence_max_depth);

    let rng = match config.seed() {
        Some(seed) => {
            info!(seed, "Using fixed search seed");
            ChaCha20Rng::seed_from_u64(seed)
        }
        None => ChaCha20Rng::from_entropy(),
    };

    info!(
        engine = %config.engine_name,
        exploration = config.exploration_constant,
        quiescence_max_depth = config.quiescence_max_depth,
        "Engine ready"
    );
    let mut engine = UciEngine::new(evaluator, config.engine_settings(), rng);

    let run_result = run(&mut engine).await;
    match run_result {
        Ok(()) => {
            info!("Engine stopped");
            Ok(())
        }
        Err(e) => {
            error!("Engine failed: {:#}", e);
            Err(e)
        }
    }
}

/// Read stdin line by line until `quit`, end of input, or ctrl-c.
async fn run<E>(engine: &mut UciEngine<E>) -> Result<()>
where
    E: mcts::Evaluator<engine_core::ChessPosition>,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    info!("Input closed");
                    break;
                };
                // Searches are CPU-bound; keep them off the async worker's budget
                let flow = tokio::task::block_in_place(|| engine.handle_line(&line, &mut stdout))?;
                if flow == Flow::Quit {
                    break;
                }
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    stdout.flush()?;
    Ok(())
}
