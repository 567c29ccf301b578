//! Error types for the Coral Clash engine
//!
//! Provides custom error types for rules-engine operations including
//! move validation, position loading, and search.

use thiserror::Error;

/// Errors that can occur in the Coral Clash engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Submitted move does not match any currently-legal move
    #[error("Invalid move: from {from} to {to}")]
    InvalidMove { from: i8, to: i8 },

    /// Submitted move matches more than one legal candidate; needs
    /// `whale_second` / `coral_removed` disambiguation
    #[error("Ambiguous move: from {from} to {to} matches {candidates} candidates")]
    AmbiguousMove { from: i8, to: i8, candidates: usize },

    /// Invalid square index (out of bounds)
    #[error("Invalid square index: {square} (must be 0-63)")]
    InvalidSquare { square: i8 },

    /// No piece at source square
    #[error("No piece at source square {square}")]
    NoPieceAtSquare { square: i8 },

    /// Piece at the source square belongs to the other side
    #[error("Piece at square {square} does not belong to the side to move")]
    WrongPieceColor { square: i8 },

    /// Move submitted while the game is already over
    #[error("Game is over; no further moves accepted")]
    GameOver,

    /// Undo requested with an empty move history
    #[error("No moves to undo")]
    NothingToUndo,

    /// Corrupt or inconsistent FEN string
    #[error("Malformed FEN: {reason}")]
    MalformedFen { reason: String },

    /// Corrupt or inconsistent snapshot
    #[error("Malformed snapshot: {reason}")]
    MalformedSnapshot { reason: String },

    /// Wall-clock budget exhausted mid-ply; the driver falls back to the
    /// deepest completed ply
    #[error("Search exceeded its time budget")]
    SearchTimeout,

    /// Search algorithm error - stack corruption or logic error
    #[error("Search algorithm error: {message}")]
    SearchError { message: String },
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
