//! Chess rules adapter backed by `cozy-chess`.
//!
//! `ChessPosition` pairs a board with the hashes of the positions seen since
//! the last irreversible move, which is what repetition detection needs.
//! Moves are exchanged on the wire in long algebraic notation with castling
//! written as the king's destination (`e1g1`), while `cozy-chess` internally
//! encodes castling as king-takes-own-rook.
//!
//! The board's own halfmove clock saturates at 100, so the position keeps a
//! separate count of plies since the last capture or pawn move for the
//! fifty- and seventy-five-move rules.

use std::fmt;

use cozy_chess::{BitBoard, Board, Color, File, Move, Piece, Square};
use thiserror::Error;
use tracing::trace;

use crate::position::{DrawReason, GameStatus, Position, Side};

/// Standard starting position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors raised while building positions from external input.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Illegal move '{mv}' in position {fen}")]
    IllegalMove { mv: String, fen: String },
}

/// A chess position plus the repetition history leading to it.
#[derive(Clone, Debug)]
pub struct ChessPosition {
    board: Board,
    /// Hashes of earlier positions since the last capture or pawn move.
    history: Vec<u64>,
    /// Plies since the last capture or pawn move, not capped.
    halfmoves: u32,
}

impl Default for ChessPosition {
    fn default() -> Self {
        Self::startpos()
    }
}

impl ChessPosition {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self {
            board: Board::default(),
            history: Vec::new(),
            halfmoves: 0,
        }
    }

    /// Parse a position from its six FEN fields.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let board = Board::from_fen(fen.trim(), false).map_err(|e| PositionError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{:?}", e),
        })?;
        let halfmoves = u32::from(board.halfmove_clock());
        Ok(Self {
            board,
            history: Vec::new(),
            halfmoves,
        })
    }

    /// Play a sequence of long-algebraic moves from this position.
    pub fn with_moves<S: AsRef<str>>(&self, moves: &[S]) -> Result<Self, PositionError> {
        let mut position = self.clone();
        for mv in moves {
            position = position.apply_uci(mv.as_ref())?;
        }
        Ok(position)
    }

    /// Play one long-algebraic move, validating it first.
    pub fn apply_uci(&self, uci: &str) -> Result<Self, PositionError> {
        let mv = self.parse_uci_move(uci)?;
        Ok(self.apply(mv))
    }

    /// Resolve a long-algebraic move string against the legal moves here.
    pub fn parse_uci_move(&self, uci: &str) -> Result<Move, PositionError> {
        self.legal_moves()
            .into_iter()
            .find(|mv| self.uci_move(*mv) == uci)
            .ok_or_else(|| PositionError::IllegalMove {
                mv: uci.to_string(),
                fen: self.fen(),
            })
    }

    /// Long-algebraic notation for a move legal in this position.
    pub fn uci_move(&self, mv: Move) -> String {
        let to = if self.is_castling(mv) {
            let file = if (mv.to.file() as u8) > (mv.from.file() as u8) {
                File::G
            } else {
                File::C
            };
            Square::new(file, mv.from.rank())
        } else {
            mv.to
        };

        let mut out = format!("{}{}", mv.from, to);
        if let Some(piece) = mv.promotion {
            out.push(promotion_char(piece));
        }
        out
    }

    /// FEN of the current board.
    pub fn fen(&self) -> String {
        format!("{}", self.board)
    }

    /// Underlying board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whether the side to move could claim a draw right now.
    pub fn can_claim_draw(&self) -> bool {
        matches!(self.status(), GameStatus::Draw(reason) if reason.is_claimable())
    }

    /// Plies since the last capture or pawn move.
    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    /// Forget repetition history and the fifty-move count.
    ///
    /// GUIs sometimes hand over positions that already carry a claimable draw
    /// from a synthetic move list. Searching from such a position would treat
    /// every line as drawn, so the claim state is dropped instead.
    pub fn clear_history(&mut self) -> Result<(), PositionError> {
        self.history.clear();
        if self.halfmoves >= 100 {
            let fen = self.fen();
            let mut fields: Vec<&str> = fen.split_whitespace().collect();
            if fields.len() == 6 {
                fields[4] = "0";
            }
            self.board = Self::from_fen(&fields.join(" "))?.board;
        }
        self.halfmoves = 0;
        Ok(())
    }

    /// How many earlier positions in the history equal the current one.
    fn repetitions(&self) -> usize {
        let current = self.board.hash();
        self.history.iter().filter(|&&h| h == current).count()
    }

    fn has_legal_moves(&self) -> bool {
        let mut any = false;
        self.board.generate_moves(|_| {
            any = true;
            true
        });
        any
    }

    fn is_castling(&self, mv: Move) -> bool {
        self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.colors(self.board.side_to_move()).has(mv.to)
    }

    fn has_insufficient_material(&self) -> bool {
        let heavy = self.board.pieces(Piece::Pawn)
            | self.board.pieces(Piece::Rook)
            | self.board.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }

        let knights = self.board.pieces(Piece::Knight);
        let bishops = self.board.pieces(Piece::Bishop);
        let minors = knights.len() + bishops.len();
        if minors <= 1 {
            return true;
        }

        // Only bishops left, all on one square colour: mate is impossible.
        knights.is_empty()
            && ((bishops & BitBoard::DARK_SQUARES).is_empty()
                || (bishops & BitBoard::LIGHT_SQUARES).is_empty())
    }
}

impl Position for ChessPosition {
    type Move = Move;

    fn side_to_move(&self) -> Side {
        match self.board.side_to_move() {
            Color::White => Side::First,
            Color::Black => Side::Second,
        }
    }

    fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|piece_moves| {
            moves.extend(piece_moves);
            false
        });
        moves
    }

    fn apply(&self, mv: Move) -> Self {
        let mut next = self.clone();
        next.board.play(mv);
        // The board clock only reads 0 straight after a capture or pawn move.
        if next.board.halfmove_clock() == 0 {
            next.history.clear();
            next.halfmoves = 0;
        } else {
            next.history.push(self.board.hash());
            next.halfmoves = self.halfmoves.saturating_add(1);
        }
        next
    }

    fn is_capture(&self, mv: Move) -> bool {
        let them = opponent(self.board.side_to_move());
        if self.board.colors(them).has(mv.to) {
            return true;
        }
        // En passant: a pawn changing file onto an empty square.
        self.board.piece_on(mv.from) == Some(Piece::Pawn)
            && mv.from.file() != mv.to.file()
            && !self.board.occupied().has(mv.to)
    }

    fn to_exchange_format(&self) -> String {
        self.fen()
    }

    fn status(&self) -> GameStatus {
        if !self.has_legal_moves() {
            return if self.board.checkers().is_empty() {
                GameStatus::Draw(DrawReason::Stalemate)
            } else {
                GameStatus::Checkmate
            };
        }
        if self.has_insufficient_material() {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }

        let halfmoves = self.halfmoves;
        if halfmoves >= 150 {
            return GameStatus::Draw(DrawReason::SeventyFiveMoves);
        }
        let repetitions = self.repetitions();
        if repetitions >= 4 {
            return GameStatus::Draw(DrawReason::FivefoldRepetition);
        }
        if halfmoves >= 100 {
            return GameStatus::Draw(DrawReason::FiftyMoves);
        }
        if repetitions >= 2 {
            trace!(fen = %self.fen(), "threefold repetition available");
            return GameStatus::Draw(DrawReason::ThreefoldRepetition);
        }
        GameStatus::Ongoing
    }

    fn material_balance(&self) -> i32 {
        const UNITS: [(Piece, i32); 5] = [
            (Piece::Pawn, 1),
            (Piece::Knight, 3),
            (Piece::Bishop, 3),
            (Piece::Rook, 5),
            (Piece::Queen, 9),
        ];

        UNITS
            .iter()
            .map(|&(piece, units)| {
                let white = self.board.colored_pieces(Color::White, piece).len() as i32;
                let black = self.board.colored_pieces(Color::Black, piece).len() as i32;
                units * (white - black)
            })
            .sum()
    }
}

impl fmt::Display for ChessPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

fn opponent(color: Color) -> Color {
    match color {
        Color::White => Color::Black,
        Color::Black => Color::White,
    }
}

fn promotion_char(piece: Piece) -> char {
    match piece {
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::Pawn => 'p',
        Piece::King => 'k',
    }
}
