//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! by the search library and the protocol binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`NNUE_MCTS_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! NNUE_MCTS_<SECTION>_<KEY>=value
//!
//! Examples:
//!     NNUE_MCTS_COMMON_WEIGHTS_PATH=/opt/engine/weights.toml
//!     NNUE_MCTS_COMMON_LOG_LEVEL=debug
//!     NNUE_MCTS_MCTS_EXPLORATION_CONSTANT=1.4
//!     NNUE_MCTS_MCTS_SEED=42
//!     NNUE_MCTS_UCI_TIME_DIVISOR=30
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, locate_config, CONFIG_PATH_VAR};
pub use structs::*;

#[cfg(test)]
mod tests;
