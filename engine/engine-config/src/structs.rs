//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_weights_path() -> String {
    defaults::weights_path().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_exploration() -> f64 {
    defaults::exploration_constant()
}
fn d_qsearch_depth() -> u32 {
    defaults::quiescence_max_depth()
}
fn d_engine_name() -> String {
    defaults::engine_name().into()
}
fn d_engine_author() -> String {
    defaults::engine_author().into()
}
fn d_movetime() -> u64 {
    defaults::default_movetime_ms()
}
fn d_min_time() -> u64 {
    defaults::min_time_ms()
}
fn d_time_divisor() -> u64 {
    defaults::time_divisor()
}
fn d_increment_bonus() -> u64 {
    defaults::increment_bonus()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub uci: UciConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    /// Trained evaluation weights, loaded once at startup.
    #[serde(default = "d_weights_path")]
    pub weights_path: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            weights_path: defaults::weights_path().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_exploration")]
    pub exploration_constant: f64,
    /// Hard cap on capture-sequence length in quiescence search.
    #[serde(default = "d_qsearch_depth")]
    pub quiescence_max_depth: u32,
    /// Fixed seed for tie-breaking; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: defaults::exploration_constant(),
            quiescence_max_depth: defaults::quiescence_max_depth(),
            seed: None,
        }
    }
}

/// Text protocol and time management configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UciConfig {
    #[serde(default = "d_engine_name")]
    pub engine_name: String,
    #[serde(default = "d_engine_author")]
    pub engine_author: String,
    /// Budget used by a bare `go`.
    #[serde(default = "d_movetime")]
    pub default_movetime_ms: u64,
    /// Floor applied to every time budget.
    #[serde(default = "d_min_time")]
    pub min_time_ms: u64,
    /// Remaining clock is divided by this to get the per-move budget.
    #[serde(default = "d_time_divisor")]
    pub time_divisor: u64,
    /// Increments credited when the clock exceeds this many increments.
    #[serde(default = "d_increment_bonus")]
    pub increment_bonus: u64,
}

impl Default for UciConfig {
    fn default() -> Self {
        Self {
            engine_name: defaults::engine_name().into(),
            engine_author: defaults::engine_author().into(),
            default_movetime_ms: defaults::default_movetime_ms(),
            min_time_ms: defaults::min_time_ms(),
            time_divisor: defaults::time_divisor(),
            increment_bonus: defaults::increment_bonus(),
        }
    }
}
