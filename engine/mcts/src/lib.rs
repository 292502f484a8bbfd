//! Monte Carlo Tree Search over a pluggable rules engine.
//!
//! This crate provides a UCT search that plays any two-player zero-sum game
//! exposed through [`engine_core::Position`], scored by an [`Evaluator`].
//!
//! # Algorithm
//!
//! Every round walks the tree once:
//!
//! 1. **Selection**: from the root, follow the best child (mean reward plus
//!    an exploration bonus) through fully expanded nodes
//! 2. **Expansion**: add a child for one legal move that has none yet
//! 3. **Evaluation**: score the new leaf, or the terminal leaf reached, once
//! 4. **Backpropagation**: push the score to the root, flipping its sign at
//!    every ply so each node holds reward for the player who moved into it
//!
//! When the budget runs out the root child with the best mean reward is the
//! answer. Ties anywhere are broken uniformly at random through the injected
//! `ChaCha20Rng`, so a fixed seed reproduces a search exactly.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use engine_core::ChessPosition;
//! use mcts::{search, MctsConfig, PieceSquareModel, SearchBudget, StaticEvaluator};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let model = PieceSquareModel::load("data/weights.toml".as_ref())?;
//! let evaluator = StaticEvaluator::new(Arc::new(model));
//! let config = MctsConfig::new(SearchBudget::iterations(400)?);
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = search(&evaluator, config, ChessPosition::startpos(), &mut rng)?;
//! println!("best {:?} score {}", result.best_move, result.score);
//! ```
//!
//! # Evaluators
//!
//! - [`StaticEvaluator`]: mate/draw handling, a [`ScoreModel`] score, and a
//!   capture-only [`Quiescence`] search when material is unbalanced
//! - [`ConstantEvaluator`]: fixed score, for exercising the search alone

pub mod config;
pub mod evaluator;
pub mod model;
pub mod node;
pub mod quiescence;
pub mod search;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export main types
pub use config::{ConfigError, MctsConfig, SearchBudget, DEFAULT_EXPLORATION};
pub use evaluator::{
    static_score, ConstantEvaluator, Evaluator, EvaluatorError, StaticEvaluator, DRAW_SCORE,
    MATE_SCORE, MAX_STATIC_SCORE, SCORE_INFINITY,
};
pub use model::{PieceSquareModel, ScoreModel};
pub use node::{NodeId, TreeNode};
pub use quiescence::{Quiescence, DEFAULT_QUIESCENCE_DEPTH};
pub use search::{search, MctsSearch, SearchError, SearchResult};
pub use tree::{MctsTree, TreeStats};
