//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "NNUE_MCTS_CONFIG";

/// Relative locations tried when no explicit path is given.
const SEARCH_PATHS: &[&str] = &["config.toml", "../config.toml", "data/config.toml"];

/// Load the central configuration, then apply environment overrides.
///
/// A missing or unreadable file is not an error: the engine runs on the
/// built-in defaults.
pub fn load_config() -> CentralConfig {
    match locate_config(std::env::var(CONFIG_PATH_VAR).ok().as_deref()) {
        Some(path) => load_from_path(&path),
        None => {
            debug!("No config.toml found, using built-in defaults");
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Pick the config file: an existing explicit path wins over the search list.
pub fn locate_config(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(explicit) = explicit {
        let path = PathBuf::from(explicit);
        if path.exists() {
            return Some(path);
        }
        warn!(path = %path.display(), "{} points nowhere, searching defaults", CONFIG_PATH_VAR);
    }
    SEARCH_PATHS.iter().map(PathBuf::from).find(|path| path.exists())
}

/// Load configuration from a specific path, falling back to defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    let config = match read_config(path) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded config");
            config
        }
        Err(reason) => {
            warn!(path = %path.display(), %reason, "Ignoring config file, using defaults");
            CentralConfig::default()
        }
    };
    apply_env_overrides(config)
}

fn read_config(path: &Path) -> Result<CentralConfig, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    toml::from_str(&content).map_err(|e| e.to_string())
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (i32, u64, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field (Option<i32>, Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: NNUE_MCTS_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.weights_path, "NNUE_MCTS_COMMON_WEIGHTS_PATH");
    env_override!(config, common.log_level, "NNUE_MCTS_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.exploration_constant,
        "NNUE_MCTS_MCTS_EXPLORATION_CONSTANT",
        parse
    );
    env_override!(
        config,
        mcts.quiescence_max_depth,
        "NNUE_MCTS_MCTS_QUIESCENCE_MAX_DEPTH",
        parse
    );
    env_override!(config, mcts.seed, "NNUE_MCTS_MCTS_SEED", optional_parse);

    // UCI
    env_override!(config, uci.engine_name, "NNUE_MCTS_UCI_ENGINE_NAME");
    env_override!(config, uci.engine_author, "NNUE_MCTS_UCI_ENGINE_AUTHOR");
    env_override!(
        config,
        uci.default_movetime_ms,
        "NNUE_MCTS_UCI_DEFAULT_MOVETIME_MS",
        parse
    );
    env_override!(config, uci.min_time_ms, "NNUE_MCTS_UCI_MIN_TIME_MS", parse);
    env_override!(config, uci.time_divisor, "NNUE_MCTS_UCI_TIME_DIVISOR", parse);
    env_override!(
        config,
        uci.increment_bonus,
        "NNUE_MCTS_UCI_INCREMENT_BONUS",
        parse
    );

    config
}
