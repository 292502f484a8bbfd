//! Evaluator trait for position evaluation.
//!
//! The evaluator turns a position into a single integer score from the side
//! to move's perspective. The search treats it as a black box; the only
//! production implementation is [`StaticEvaluator`], which handles game-over
//! positions itself and otherwise consults a [`ScoreModel`], running a
//! capture-only quiescence search when material is unbalanced.

use std::sync::Arc;

use engine_core::{GameStatus, Position};
use thiserror::Error;
use tracing::trace;

use crate::model::ScoreModel;
use crate::quiescence::{Quiescence, DEFAULT_QUIESCENCE_DEPTH};

/// Score of a position whose side to move is checkmated.
pub const MATE_SCORE: i32 = -10000;

/// Score of any drawn position.
pub const DRAW_SCORE: i32 = 0;

/// Bound applied to raw model output so it never reaches mate territory.
pub const MAX_STATIC_SCORE: i32 = 9999;

/// Window bound for the quiescence search.
pub const SCORE_INFINITY: i32 = 32000;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Weights file not found: {0}")]
    WeightsNotFound(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Model rejected position: {0}")]
    InvalidPosition(String),
}

/// Trait for position evaluators.
///
/// Implementations must be deterministic for a given position: the same
/// position always yields the same score.
pub trait Evaluator<P: Position>: Send + Sync {
    /// Score `position` from its side to move's perspective.
    fn evaluate(&self, position: &P) -> Result<i32, EvaluatorError>;
}

/// Evaluator returning the same score for every position.
/// Useful for testing the search core without a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantEvaluator(pub i32);

impl<P: Position> Evaluator<P> for ConstantEvaluator {
    fn evaluate(&self, _position: &P) -> Result<i32, EvaluatorError> {
        Ok(self.0)
    }
}

/// Model score of `position`, clamped to `±MAX_STATIC_SCORE`.
pub fn static_score<M, P>(model: &M, position: &P) -> Result<i32, EvaluatorError>
where
    M: ScoreModel + ?Sized,
    P: Position,
{
    let raw = model.score_position(&position.to_exchange_format())?;
    Ok(raw.clamp(-MAX_STATIC_SCORE, MAX_STATIC_SCORE))
}

/// Production evaluator: game-over handling, model score, quiescence.
#[derive(Debug)]
pub struct StaticEvaluator<M> {
    model: Arc<M>,
    quiescence_max_depth: u32,
}

impl<M> Clone for StaticEvaluator<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            quiescence_max_depth: self.quiescence_max_depth,
        }
    }
}

impl<M: ScoreModel> StaticEvaluator<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model,
            quiescence_max_depth: DEFAULT_QUIESCENCE_DEPTH,
        }
    }

    /// Builder pattern: bound the quiescence recursion depth.
    pub fn with_quiescence_depth(mut self, max_depth: u32) -> Self {
        self.quiescence_max_depth = max_depth;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<P: Position, M: ScoreModel> Evaluator<P> for StaticEvaluator<M> {
    fn evaluate(&self, position: &P) -> Result<i32, EvaluatorError> {
        match position.status() {
            GameStatus::Checkmate => return Ok(MATE_SCORE),
            GameStatus::Draw(_) => return Ok(DRAW_SCORE),
            GameStatus::Ongoing => {}
        }

        let score = static_score(self.model.as_ref(), position)?;
        if position.material_balance() == 0 {
            return Ok(score);
        }

        let mut quiescence = Quiescence::new(self.model.as_ref(), self.quiescence_max_depth);
        let settled = quiescence.search(position, -SCORE_INFINITY, SCORE_INFINITY)?;
        trace!(
            static_score = score,
            quiescence_score = settled,
            nodes = quiescence.nodes(),
            "Quiescence"
        );
        Ok(score.max(settled))
    }
}
