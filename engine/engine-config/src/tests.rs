//! Tests for the configuration module.

use super::*;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::Mutex;

/// Serializes tests that touch process environment variables
static ENV_TEST_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.weights_path, "./data/weights.toml");
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.mcts.quiescence_max_depth, 16);
    assert!(config.mcts.seed.is_none());
    assert_eq!(config.uci.engine_name, "MCTS NNUE Chess");
    assert_eq!(config.uci.engine_author, "Code Monkey King");
}

#[test]
fn test_time_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.uci.default_movetime_ms, 1000);
    assert_eq!(config.uci.min_time_ms, 100);
    assert_eq!(config.uci.time_divisor, 25);
    assert_eq!(config.uci.increment_bonus, 5);
}

#[test]
fn test_env_overrides() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("NNUE_MCTS_COMMON_LOG_LEVEL", "debug");
    std::env::set_var("NNUE_MCTS_MCTS_SEED", "7");
    std::env::set_var("NNUE_MCTS_UCI_TIME_DIVISOR", "30");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.mcts.seed, Some(7));
    assert_eq!(config.uci.time_divisor, 30);

    std::env::remove_var("NNUE_MCTS_COMMON_LOG_LEVEL");
    std::env::remove_var("NNUE_MCTS_MCTS_SEED");
    std::env::remove_var("NNUE_MCTS_UCI_TIME_DIVISOR");
}

#[test]
fn test_unparsable_env_override_is_ignored() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("NNUE_MCTS_MCTS_QUIESCENCE_MAX_DEPTH", "deep");
    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.mcts.quiescence_max_depth, 16);
    std::env::remove_var("NNUE_MCTS_MCTS_QUIESCENCE_MAX_DEPTH");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
weights_path = "/opt/weights.toml"

[mcts]
exploration_constant = 1.5
seed = 99

[uci]
engine_name = "Test Engine"
default_movetime_ms = 250
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.weights_path, "/opt/weights.toml");
    assert!((config.mcts.exploration_constant - 1.5).abs() < f64::EPSILON);
    assert_eq!(config.mcts.seed, Some(99));
    assert_eq!(config.uci.engine_name, "Test Engine");
    assert_eq!(config.uci.default_movetime_ms, 250);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[uci]
engine_author = "Someone"
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.uci.engine_author, "Someone");
    assert_eq!(config.uci.engine_name, "MCTS NNUE Chess"); // Default
    assert_eq!(config.common.log_level, "info"); // Default
    assert_eq!(config.mcts.quiescence_max_depth, 16); // Default
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let config = load_from_path(&PathBuf::from("/nonexistent/config.toml"));
    assert_eq!(config.uci.time_divisor, 25);
}

#[test]
fn test_load_from_existing_file() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let path = PathBuf::from(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../config.defaults.toml"
    ));
    let config = load_from_path(&path);
    assert_eq!(config.common.weights_path, "./data/weights.toml");
    assert_eq!(config.mcts.quiescence_max_depth, 16);
}

#[test]
fn test_locate_config_prefers_existing_explicit_path() {
    let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
    assert_eq!(locate_config(Some(manifest)), Some(PathBuf::from(manifest)));

    let missing = "/nonexistent/config.toml";
    assert_ne!(locate_config(Some(missing)), Some(PathBuf::from(missing)));
}
