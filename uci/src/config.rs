//! Configuration for the protocol binary
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::protocol::EngineSettings;
use crate::time_control::TimeControl;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_weights_path() -> String {
    CENTRAL_CONFIG.common.weights_path.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_exploration_constant() -> f64 {
    CENTRAL_CONFIG.mcts.exploration_constant
}

fn default_quiescence_max_depth() -> u32 {
    CENTRAL_CONFIG.mcts.quiescence_max_depth
}

fn default_engine_name() -> String {
    CENTRAL_CONFIG.uci.engine_name.clone()
}

fn default_engine_author() -> String {
    CENTRAL_CONFIG.uci.engine_author.clone()
}

fn default_movetime_ms() -> u64 {
    CENTRAL_CONFIG.uci.default_movetime_ms
}

fn default_min_time_ms() -> u64 {
    CENTRAL_CONFIG.uci.min_time_ms
}

fn default_time_divisor() -> u64 {
    CENTRAL_CONFIG.uci.time_divisor
}

fn default_increment_bonus() -> u64 {
    CENTRAL_CONFIG.uci.increment_bonus
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "mcts-uci")]
#[command(about = "MCTS chess engine speaking the UCI line protocol")]
#[command(
    long_about = "Chess engine that picks moves with Monte Carlo Tree Search over a
static evaluation stabilised by quiescence search. Reads protocol commands on
stdin, answers on stdout, logs to stderr.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Evaluation weights file (TOML)
    #[arg(long, default_value_t = default_weights_path())]
    pub weights_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Exploration weight in best-child selection
    #[arg(long, default_value_t = default_exploration_constant())]
    pub exploration_constant: f64,

    /// Maximum capture depth of the quiescence search
    #[arg(long, default_value_t = default_quiescence_max_depth())]
    pub quiescence_max_depth: u32,

    /// Seed for tie-breaking randomness (config `mcts.seed`, entropy if unset)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Name reported by `uci`
    #[arg(long, default_value_t = default_engine_name())]
    pub engine_name: String,

    /// Author reported by `uci`
    #[arg(long, default_value_t = default_engine_author())]
    pub engine_author: String,

    /// Search time for a `go` without limits, in milliseconds
    #[arg(long, default_value_t = default_movetime_ms())]
    pub default_movetime_ms: u64,

    /// Lower bound on any time budget, in milliseconds
    #[arg(long, default_value_t = default_min_time_ms())]
    pub min_time_ms: u64,

    /// Fraction of the remaining clock spent per move
    #[arg(long, default_value_t = default_time_divisor())]
    pub time_divisor: u64,

    /// Increments credited ahead when the clock allows it
    #[arg(long, default_value_t = default_increment_bonus())]
    pub increment_bonus: u64,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.weights_path.is_empty() {
            return Err(anyhow!("weights_path cannot be empty"));
        }

        if self.engine_name.is_empty() {
            return Err(anyhow!("engine_name cannot be empty"));
        }

        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(anyhow!(
                "exploration_constant must be finite and non-negative, got {}",
                self.exploration_constant
            ));
        }

        if self.time_divisor == 0 {
            return Err(anyhow!("time_divisor must be greater than 0"));
        }

        if self.default_movetime_ms == 0 {
            return Err(anyhow!("default_movetime_ms must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Seed from the command line, falling back to the config file.
    pub fn seed(&self) -> Option<u64> {
        self.seed.or(CENTRAL_CONFIG.mcts.seed)
    }

    pub fn weights_path(&self) -> PathBuf {
        PathBuf::from(&self.weights_path)
    }

    pub fn time_control(&self) -> TimeControl {
        TimeControl {
            divisor: self.time_divisor,
            min_time: Duration::from_millis(self.min_time_ms),
            increment_bonus: self.increment_bonus,
            default_movetime: Duration::from_millis(self.default_movetime_ms),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            engine_name: self.engine_name.clone(),
            engine_author: self.engine_author.clone(),
            exploration_constant: self.exploration_constant,
            time_control: self.time_control(),
        }
    }
}
