//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the binary and the
//! checked-in documentation of every knob never drift apart.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    uci: UciDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    weights_path: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    exploration_constant: f64,
    quiescence_max_depth: u32,
}

#[derive(Debug, Deserialize)]
struct UciDefaults {
    engine_name: String,
    engine_author: String,
    default_movetime_ms: u64,
    min_time_ms: u64,
    time_divisor: u64,
    increment_bonus: u64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn weights_path() -> &'static str {
    &DEFAULTS.common.weights_path
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn exploration_constant() -> f64 {
    DEFAULTS.mcts.exploration_constant
}
pub fn quiescence_max_depth() -> u32 {
    DEFAULTS.mcts.quiescence_max_depth
}

// UCI
pub fn engine_name() -> &'static str {
    &DEFAULTS.uci.engine_name
}
pub fn engine_author() -> &'static str {
    &DEFAULTS.uci.engine_author
}
pub fn default_movetime_ms() -> u64 {
    DEFAULTS.uci.default_movetime_ms
}
pub fn min_time_ms() -> u64 {
    DEFAULTS.uci.min_time_ms
}
pub fn time_divisor() -> u64 {
    DEFAULTS.uci.time_divisor
}
pub fn increment_bonus() -> u64 {
    DEFAULTS.uci.increment_bonus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        // Just accessing these will verify the TOML parses correctly
        assert_eq!(weights_path(), "./data/weights.toml");
        assert_eq!(log_level(), "info");
    }

    #[test]
    fn test_mcts_defaults() {
        assert!((exploration_constant() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert_eq!(quiescence_max_depth(), 16);
    }

    #[test]
    fn test_uci_defaults() {
        assert_eq!(engine_name(), "MCTS NNUE Chess");
        assert_eq!(default_movetime_ms(), 1000);
        assert_eq!(min_time_ms(), 100);
        assert_eq!(time_divisor(), 25);
        assert_eq!(increment_bonus(), 5);
    }
}
