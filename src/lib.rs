//! Coral Clash rules engine and search AI
//!
//! A two-player abstract board game on an 8x8 board: chess-like pieces with
//! ocean theming, a two-square whale in place of a king, coral terrain that
//! gatherers place and hunters are stopped by, and an alternate win
//! condition scored by coral area control.
//!
//! The crate splits into:
//!
//! - `board` / `types` - position store and core data types
//! - `move_gen` - pseudo-legal move generation and the attack/check oracle,
//!   including the whale's mutual-legality attack rule
//! - `game` - turn management, make/unmake, history, terminal detection
//! - `evaluation` - static scoring (material, threats, coral area)
//! - `search` - explicit-stack negamax alpha-beta with iterative deepening,
//!   transposition table, and difficulty profiles
//! - `fen` - extended FEN, snapshots, PGN-like history text
//! - `api` - the high-level entry points hosts are expected to use
//!
//! ```no_run
//! use coral_clash::api;
//! use coral_clash::search::{DifficultyProfile, Searcher};
//! use coral_clash::types::MoveRequest;
//!
//! # futures_lite::future::block_on(async {
//! let mut game = api::new_game();
//! api::try_move(&mut game, &MoveRequest::new(8, 16))?;
//! let mut searcher = Searcher::new();
//! let reply = api::reply(&mut game, &mut searcher, &DifficultyProfile::medium()).await?;
//! println!("engine played {} -> {}", reply.from, reply.to);
//! # Ok::<(), coral_clash::error::EngineError>(())
//! # });
//! ```

pub mod api;
pub mod board;
pub mod constants;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod game;
pub mod hash;
pub mod move_gen;
pub mod search;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use game::Game;
pub use types::{Color, GameStatus, Move, MoveRequest, Piece, PieceKind, Role, Square};
