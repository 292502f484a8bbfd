//! Rules-engine boundary for the MCTS chess engine.
//!
//! This crate provides the abstractions the search core is written against:
//! - `Position`: capability trait (terminal?, side to move, legal moves, apply)
//! - `GameStatus` / `DrawReason`: game-theoretic status including claimable draws
//! - `ChessPosition`: `cozy-chess` backed implementation with FEN and
//!   long-algebraic move I/O

pub mod chess;
pub mod position;

// Re-export main types for convenience
pub use chess::{ChessPosition, PositionError, STARTPOS_FEN};
pub use position::{DrawReason, GameStatus, Position, Side};
