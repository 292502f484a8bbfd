//! Capability trait the search core uses to talk to a rules engine.
//!
//! The search never looks inside a position. It only asks whether the game
//! is over, whose turn it is, which moves are legal, and what position a move
//! leads to. Keeping the surface this narrow lets tests swap in synthetic
//! games without touching the search code.

use std::fmt::Debug;
use std::hash::Hash;

/// The two players of a zero-sum game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// The player who moves after this one.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// +1 for the first player, -1 for the second.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Side::First => 1,
            Side::Second => -1,
        }
    }
}

/// Why a position is scored as a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
    /// Claimable by the side to move; the game continues otherwise.
    FiftyMoves,
    /// Claimable by the side to move; the game continues otherwise.
    ThreefoldRepetition,
}

impl DrawReason {
    /// Whether the draw only happens on request.
    #[inline]
    pub fn is_claimable(self) -> bool {
        matches!(self, DrawReason::FiftyMoves | DrawReason::ThreefoldRepetition)
    }
}

/// Game-theoretic status of a position from the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    /// The side to move is checkmated.
    Checkmate,
    Draw(DrawReason),
}

impl GameStatus {
    /// True when no further moves are played from this position.
    ///
    /// Claimable draws are not terminal: the game only ends if someone claims.
    #[inline]
    pub fn is_game_over(self) -> bool {
        match self {
            GameStatus::Ongoing => false,
            GameStatus::Checkmate => true,
            GameStatus::Draw(reason) => !reason.is_claimable(),
        }
    }
}

/// Snapshot of game state consumed by the search.
///
/// Implementations must be value types: `apply` returns a new position and
/// never mutates the receiver. The search tree keeps one position per node
/// and relies on that.
pub trait Position: Clone + Send + Sync + Debug + 'static {
    /// Token identifying a legal transition from a position.
    type Move: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Whether the game is over (no further moves are played).
    fn is_terminal(&self) -> bool {
        self.status().is_game_over()
    }

    /// Player to act in this position.
    fn side_to_move(&self) -> Side;

    /// Legal moves in rules-engine order.
    ///
    /// The order may change between calls, but a single returned list is
    /// internally consistent.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Position reached by playing `mv`. `mv` must be legal here.
    fn apply(&self, mv: Self::Move) -> Self;

    /// Whether `mv` captures material. Only used by quiescence search.
    fn is_capture(&self, mv: Self::Move) -> bool;

    /// Serialization handed to the static scoring model (FEN for chess).
    fn to_exchange_format(&self) -> String;

    /// Game status including claimable draws.
    fn status(&self) -> GameStatus;

    /// Cheap material count over the whole board, first player minus second.
    ///
    /// Zero means the material is balanced.
    fn material_balance(&self) -> i32;
}
