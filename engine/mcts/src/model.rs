//! Static scoring model.
//!
//! The search treats the model as an opaque function from a serialized
//! position to a centipawn score for the side to move. The shipped model is
//! a single-phase piece-square evaluation whose weights live in a TOML file,
//! so they can be tuned without rebuilding the engine.

use std::path::Path;

use cozy_chess::{Board, Color, Piece, Square};
use serde::Deserialize;
use tracing::{debug, info};

use crate::evaluator::EvaluatorError;

/// Weights file format version understood by this build.
pub const WEIGHTS_VERSION: u32 = 1;

const PIECE_KINDS: usize = 6;

/// Opaque scoring function consumed by the evaluator and quiescence search.
pub trait ScoreModel: Send + Sync {
    /// Score `fen` in centipawns from the side to move's perspective.
    fn score_position(&self, fen: &str) -> Result<i32, EvaluatorError>;
}

impl<M: ScoreModel + ?Sized> ScoreModel for std::sync::Arc<M> {
    fn score_position(&self, fen: &str) -> Result<i32, EvaluatorError> {
        (**self).score_position(fen)
    }
}

#[derive(Debug, Deserialize)]
struct WeightsFile {
    version: u32,
    #[serde(default)]
    tempo: i32,
    pawn: PieceWeights,
    knight: PieceWeights,
    bishop: PieceWeights,
    rook: PieceWeights,
    queen: PieceWeights,
    king: PieceWeights,
}

#[derive(Debug, Deserialize)]
struct PieceWeights {
    value: i32,
    /// a1..h8 from the first player's side.
    table: Vec<i32>,
}

/// Material plus piece-square table evaluation.
#[derive(Debug, Clone)]
pub struct PieceSquareModel {
    tempo: i32,
    /// Indexed by `Piece as usize`, then by square (a1 = 0).
    tables: [[i32; 64]; PIECE_KINDS],
}

impl PieceSquareModel {
    /// Load weights from a TOML file.
    pub fn load(path: &Path) -> Result<Self, EvaluatorError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EvaluatorError::WeightsNotFound(format!("{}: {}", path.display(), e))
        })?;
        let model = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), tempo = model.tempo, "Loaded evaluation weights");
        Ok(model)
    }

    /// Parse weights from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, EvaluatorError> {
        let file: WeightsFile = toml::from_str(contents)
            .map_err(|e| EvaluatorError::InvalidWeights(e.to_string()))?;

        if file.version != WEIGHTS_VERSION {
            return Err(EvaluatorError::InvalidWeights(format!(
                "unsupported weights version {} (expected {})",
                file.version, WEIGHTS_VERSION
            )));
        }

        let mut tables = [[0i32; 64]; PIECE_KINDS];
        let pieces = [
            (Piece::Pawn, &file.pawn),
            (Piece::Knight, &file.knight),
            (Piece::Bishop, &file.bishop),
            (Piece::Rook, &file.rook),
            (Piece::Queen, &file.queen),
            (Piece::King, &file.king),
        ];
        for (piece, weights) in pieces {
            if weights.table.len() != 64 {
                return Err(EvaluatorError::InvalidWeights(format!(
                    "{:?} table has {} entries, expected 64",
                    piece,
                    weights.table.len()
                )));
            }
            // Fold the piece value into every square once at load time
            for (slot, bonus) in tables[piece as usize].iter_mut().zip(&weights.table) {
                *slot = weights.value + bonus;
            }
        }

        debug!(tempo = file.tempo, "Parsed piece-square weights");
        Ok(Self {
            tempo: file.tempo,
            tables,
        })
    }

    /// Score a board from the side to move's perspective.
    pub fn score_board(&self, board: &Board) -> i32 {
        let mut white_minus_black = 0;
        for color in Color::ALL {
            let sign = match color {
                Color::White => 1,
                Color::Black => -1,
            };
            for piece in Piece::ALL {
                let table = &self.tables[piece as usize];
                for square in board.colored_pieces(color, piece) {
                    white_minus_black += sign * table[table_index(color, square)];
                }
            }
        }

        let relative = match board.side_to_move() {
            Color::White => white_minus_black,
            Color::Black => -white_minus_black,
        };
        relative + self.tempo
    }
}

impl ScoreModel for PieceSquareModel {
    fn score_position(&self, fen: &str) -> Result<i32, EvaluatorError> {
        let board = Board::from_fen(fen, false)
            .map_err(|e| EvaluatorError::InvalidPosition(format!("{}: {:?}", fen, e)))?;
        Ok(self.score_board(&board))
    }
}

/// Tables are written from White's side; Black reads them rank-mirrored.
#[inline]
fn table_index(color: Color, square: Square) -> usize {
    match color {
        Color::White => square as usize,
        Color::Black => square as usize ^ 56,
    }
}
