//! Test doubles shared by the search unit tests.

use engine_core::{DrawReason, GameStatus, Position, Side};

use crate::evaluator::{Evaluator, EvaluatorError};
use crate::model::ScoreModel;

/// Synthetic game: a uniform tree of `branching` moves per ply that ends
/// after `depth` plies. Moves are `0..branching`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToyPosition {
    pub depth: u32,
    pub branching: u8,
    /// Moves played from the initial position.
    pub path: Vec<u8>,
    /// Claims to be ongoing while offering no moves.
    pub broken: bool,
}

impl ToyPosition {
    pub fn new(depth: u32, branching: u8) -> Self {
        Self {
            depth,
            branching,
            path: Vec::new(),
            broken: false,
        }
    }

    /// Non-terminal position with an empty move list.
    pub fn inconsistent() -> Self {
        Self {
            broken: true,
            ..Self::new(3, 2)
        }
    }
}

impl Position for ToyPosition {
    type Move = u8;

    fn side_to_move(&self) -> Side {
        if self.path.len() % 2 == 0 {
            Side::First
        } else {
            Side::Second
        }
    }

    fn legal_moves(&self) -> Vec<u8> {
        if self.broken || self.depth == 0 {
            return Vec::new();
        }
        (0..self.branching).collect()
    }

    fn apply(&self, mv: u8) -> Self {
        assert!(mv < self.branching && self.depth > 0, "illegal toy move {mv}");
        let mut next = self.clone();
        next.depth -= 1;
        next.path.push(mv);
        next
    }

    fn is_capture(&self, _mv: u8) -> bool {
        false
    }

    fn to_exchange_format(&self) -> String {
        format!("{:?}", self.path)
    }

    fn status(&self) -> GameStatus {
        if self.depth == 0 && !self.broken {
            GameStatus::Draw(DrawReason::Stalemate)
        } else {
            GameStatus::Ongoing
        }
    }

    fn material_balance(&self) -> i32 {
        0
    }
}

/// Evaluator backed by a closure, for hand-built score landscapes.
pub struct FnEvaluator<F>(pub F);

impl<P, F> Evaluator<P> for FnEvaluator<F>
where
    P: Position,
    F: Fn(&P) -> i32 + Send + Sync,
{
    fn evaluate(&self, position: &P) -> Result<i32, EvaluatorError> {
        Ok((self.0)(position))
    }
}

/// Plain material count read straight from the FEN placement field,
/// in centipawns from the side to move.
#[derive(Debug, Default)]
pub struct MaterialModel;

impl ScoreModel for MaterialModel {
    fn score_position(&self, fen: &str) -> Result<i32, EvaluatorError> {
        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or_else(|| EvaluatorError::InvalidPosition(fen.to_string()))?;
        let white_to_move = fields.next() != Some("b");

        let score: i32 = placement
            .chars()
            .map(|c| {
                let value = match c.to_ascii_lowercase() {
                    'p' => 100,
                    'n' => 300,
                    'b' => 300,
                    'r' => 500,
                    'q' => 900,
                    _ => 0,
                };
                if c.is_ascii_uppercase() {
                    value
                } else {
                    -value
                }
            })
            .sum();

        Ok(if white_to_move { score } else { -score })
    }
}
