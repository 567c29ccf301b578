//! Game state queries and AI move generation
//!
//! [`reply`] runs the search for the side to move, validates the chosen
//! move against the current legal-move list exactly as a caller-submitted
//! move would be, and falls back to a uniform random legal move if the
//! search produced nothing usable. The chosen move is applied to the game.

use rand::prelude::*;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::game::Game;
use crate::move_gen::attack;
use crate::search::{DifficultyProfile, Searcher};
use crate::types::*;

/// Current game status (terminal states are absorbing)
pub fn game_status(game: &mut Game) -> GameStatus {
    game.status()
}

/// Is the side to move in check?
pub fn in_check(game: &Game) -> bool {
    attack::in_check(game.board(), game.turn())
}

/// Has the game reached a terminal state?
pub fn is_game_over(game: &mut Game) -> bool {
    game.status().is_game_over()
}

/// Compute and play the engine's reply for the side to move
///
/// # Errors
///
/// * [`EngineError::GameOver`] when the game has already ended
/// * [`EngineError::InvalidMove`] when no legal move exists at all
pub async fn reply(
    game: &mut Game,
    searcher: &mut Searcher,
    profile: &DifficultyProfile,
) -> EngineResult<Move> {
    if game.status().is_game_over() {
        return Err(EngineError::GameOver);
    }
    let color = game.turn();

    let result = searcher.find_best_move(game, profile).await;
    let turn = game.turn();
    let legal = game.legal_moves(turn);
    if legal.is_empty() {
        return Err(EngineError::InvalidMove { from: 0, to: 0 });
    }

    let chosen = match result.best {
        Some(best) if legal.contains(&best) => {
            debug!(
                depth = result.depth,
                score = result.score,
                nodes = result.nodes,
                "search reply"
            );
            best
        }
        other => {
            // search returned nothing usable; any legal move keeps the
            // game going
            warn!(had_candidate = other.is_some(), "falling back to a random legal move");
            let mut rng = rand::rng();
            let idx = rng.random_range(0..legal.len());
            legal[idx].clone()
        }
    };

    debug_assert_eq!(color, game.turn());
    game.apply_move(&chosen);
    Ok(chosen)
}
