//! MCTS search implementation.
//!
//! Each round runs the classic four steps:
//! 1. Selection: descend through fully expanded nodes by best-child score
//! 2. Expansion: add one child for a legal move that has none yet
//! 3. Evaluation: score the new leaf (or the terminal leaf reached) once
//! 4. Backpropagation: add the sign-alternating reward along the path
//!
//! The reported move is the root child with the best mean reward once the
//! budget is spent; exploration plays no part in that final choice.

use std::time::{Duration, Instant};

use engine_core::Position;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{ConfigError, MctsConfig, SearchBudget};
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid search configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    /// The tree and the rules engine disagree. Not recoverable.
    #[error("Search invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Move to play, `None` when the root is already game over.
    pub best_move: Option<M>,

    /// Centipawn score of `best_move` from the root side to move's
    /// perspective, or the evaluation of a game-over root.
    pub score: i32,

    /// Number of completed rounds
    pub rounds: u32,

    /// Nodes in the tree when the search stopped
    pub tree_size: usize,

    /// Wall-clock time spent
    pub elapsed: Duration,
}

/// MCTS search state.
pub struct MctsSearch<'a, P: Position, E: Evaluator<P>> {
    tree: MctsTree<P>,
    evaluator: &'a E,
    config: MctsConfig,
}

impl<'a, P: Position, E: Evaluator<P>> MctsSearch<'a, P, E> {
    /// Create a new MCTS search rooted at `root`.
    ///
    /// The config is validated before the tree is allocated.
    pub fn new(evaluator: &'a E, config: MctsConfig, root: P) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            tree: MctsTree::new(root),
            evaluator,
            config,
        })
    }

    /// Run rounds until the budget is spent, then pick the best root move.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult<P::Move>, SearchError> {
        let start = Instant::now();
        let root_id = self.tree.root();

        if self.tree.get(root_id).is_terminal {
            let score = self.evaluator.evaluate(&self.tree.get(root_id).position)?;
            debug!(score, "Root is game over, no search performed");
            return Ok(SearchResult {
                best_move: None,
                score,
                rounds: 0,
                tree_size: self.tree.len(),
                elapsed: start.elapsed(),
            });
        }

        let mut rounds = 0u32;
        match self.config.budget {
            SearchBudget::Iterations(n) => {
                for _ in 0..n {
                    self.execute_round(rng)?;
                    rounds += 1;
                }
            }
            SearchBudget::Deadline(limit) => {
                // At least one round, so a root move always exists
                loop {
                    self.execute_round(rng)?;
                    rounds += 1;
                    if start.elapsed() >= limit {
                        break;
                    }
                }
            }
        }

        let best_id = self.tree.best_child(root_id, 0.0, rng).ok_or_else(|| {
            SearchError::InvariantViolation("non-terminal root has no children".into())
        })?;
        let best_move = self.tree.move_to(root_id, best_id).ok_or_else(|| {
            SearchError::InvariantViolation(format!("node {} is not a root child", best_id.0))
        })?;
        let score = self.tree.get(best_id).mean_reward().round() as i32;

        let elapsed = start.elapsed();
        let stats = self.tree.stats();
        debug!(
            rounds,
            score,
            best_move = ?best_move,
            tree_size = stats.total_nodes,
            root_children = stats.root_children,
            max_depth = stats.max_depth,
            elapsed_ms = elapsed.as_millis() as u64,
            "MCTS search complete"
        );

        Ok(SearchResult {
            best_move: Some(best_move),
            score,
            rounds,
            tree_size: stats.total_nodes,
            elapsed,
        })
    }

    /// One select -> expand -> evaluate -> backpropagate round.
    fn execute_round(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let leaf_id = self.select(rng)?;
        let value = self.evaluator.evaluate(&self.tree.get(leaf_id).position)?;
        self.tree.backpropagate(leaf_id, value as f64);

        trace!(
            leaf = leaf_id.0,
            value,
            terminal = self.tree.get(leaf_id).is_terminal,
            "MCTS round complete"
        );
        Ok(())
    }

    /// Descend from the root to the node this round evaluates.
    ///
    /// Stops at a terminal node, or expands the first node that still has
    /// unexplored moves and returns the new child.
    fn select(&mut self, rng: &mut ChaCha20Rng) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.is_terminal {
                return Ok(current);
            }
            if !node.is_fully_expanded {
                return self.expand(current);
            }

            current = self
                .tree
                .best_child(current, self.config.exploration_constant, rng)
                .ok_or_else(|| {
                    SearchError::InvariantViolation(format!(
                        "fully expanded node {} has no children",
                        current.0
                    ))
                })?;
        }
    }

    /// Add a child for the first legal move without one.
    fn expand(&mut self, node_id: NodeId) -> Result<NodeId, SearchError> {
        let (mv, child_position, last_missing) = {
            let node = self.tree.get(node_id);
            let legal_moves = node.position.legal_moves();
            let mut missing = legal_moves.into_iter().filter(|mv| !node.has_child(*mv));

            let mv = missing.next().ok_or_else(|| {
                SearchError::InvariantViolation(format!(
                    "node {} is not terminal, not fully expanded and has no unexplored move",
                    node_id.0
                ))
            })?;
            let last_missing = missing.next().is_none();
            (mv, node.position.apply(mv), last_missing)
        };

        let child_id = self.tree.add_child(node_id, mv, child_position);
        if last_missing {
            self.tree.get_mut(node_id).is_fully_expanded = true;
        }
        Ok(child_id)
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<P> {
        &self.tree
    }
}

/// Convenience function to run a single MCTS search.
pub fn search<P, E>(
    evaluator: &E,
    config: MctsConfig,
    root: P,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<P::Move>, SearchError>
where
    P: Position,
    E: Evaluator<P>,
{
    let mut search = MctsSearch::new(evaluator, config, root)?;
    search.run(rng)
}
