//! Public API for the Coral Clash engine
//!
//! High-level functions for game management, move submission, and AI move
//! generation, with validation and error handling at the boundary.
//!
//! ## Module Organization
//!
//! - `game` - lifecycle (new_game, reset_game, FEN and snapshot I/O)
//! - `moves` - move submission with disambiguation, undo, resignation
//! - `state` - status queries and the AI `reply`

mod game;
mod moves;
mod state;

pub use game::{game_from_fen, game_from_snapshot, game_to_fen, new_game, reset_game, snapshot};
pub use moves::{legal_moves, moves_from, resign, try_move, undo_last};
pub use state::{game_status, in_check, is_game_over, reply};
