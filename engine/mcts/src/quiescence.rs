//! Capture-only alpha-beta search used to settle tactically unstable leaves.
//!
//! Negamax convention: every score is from the side to move at the position
//! being searched, and a child's score is negated with the window swapped.

use engine_core::Position;

use crate::evaluator::{static_score, EvaluatorError};
use crate::model::ScoreModel;

/// Default recursion bound, in plies of captures.
pub const DEFAULT_QUIESCENCE_DEPTH: u32 = 16;

/// One quiescence search over a fixed model.
pub struct Quiescence<'a, M: ScoreModel + ?Sized> {
    model: &'a M,
    max_depth: u32,
    nodes: u64,
}

impl<'a, M: ScoreModel + ?Sized> Quiescence<'a, M> {
    pub fn new(model: &'a M, max_depth: u32) -> Self {
        Self {
            model,
            max_depth,
            nodes: 0,
        }
    }

    /// Positions visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Search captures from `position` inside the window `(alpha, beta)`.
    ///
    /// Returns `beta` on a fail-high, otherwise the best of the stand-pat
    /// score, `alpha`, and the negated capture replies.
    pub fn search<P: Position>(
        &mut self,
        position: &P,
        alpha: i32,
        beta: i32,
    ) -> Result<i32, EvaluatorError> {
        self.search_at(position, alpha, beta, 0)
    }

    fn search_at<P: Position>(
        &mut self,
        position: &P,
        mut alpha: i32,
        beta: i32,
        depth: u32,
    ) -> Result<i32, EvaluatorError> {
        self.nodes += 1;

        let stand_pat = static_score(self.model, position)?;
        if stand_pat >= beta {
            return Ok(beta);
        }
        alpha = alpha.max(stand_pat);

        if depth >= self.max_depth {
            return Ok(alpha);
        }

        for mv in position.legal_moves() {
            if !position.is_capture(mv) {
                continue;
            }
            let child = position.apply(mv);
            let score = -self.search_at(&child, -beta, -alpha, depth + 1)?;
            if score >= beta {
                return Ok(beta);
            }
            alpha = alpha.max(score);
        }

        Ok(alpha)
    }
}
