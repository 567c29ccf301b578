//! Game lifecycle
//!
//! Constructors and serialization entry points. These are thin wrappers
//! over [`crate::game::Game`] and [`crate::fen`] so hosts only deal with
//! one import path.

use crate::error::EngineResult;
use crate::fen;
use crate::game::Game;

/// Fresh game from the standard starting position
pub fn new_game() -> Game {
    Game::new()
}

/// Reset an existing game to the starting position, clearing history and
/// any recorded resignation
pub fn reset_game(game: &mut Game) {
    game.reset();
}

/// Serialize the current position as one extended-FEN line
pub fn game_to_fen(game: &Game) -> String {
    fen::to_fen(game)
}

/// Load a position from an extended-FEN line
///
/// # Errors
///
/// Returns [`crate::error::EngineError::MalformedFen`] for syntax errors
/// always, and for internal inconsistencies unless `skip_validation`.
pub fn game_from_fen(text: &str, skip_validation: bool) -> EngineResult<Game> {
    fen::from_fen(text, skip_validation)
}

/// Capture the full game (position plus replayable history) as a snapshot
pub fn snapshot(game: &mut Game) -> fen::Snapshot {
    fen::game_to_snapshot(game)
}

/// Restore a game from a snapshot, replaying its move history so undo
/// works across the reload
///
/// # Errors
///
/// Returns [`crate::error::EngineError::MalformedSnapshot`] when the
/// history does not replay or does not reproduce the stored position
/// (the latter check is skipped with `skip_validation`).
pub fn game_from_snapshot(
    snapshot: &fen::Snapshot,
    skip_validation: bool,
) -> EngineResult<Game> {
    fen::game_from_snapshot(snapshot, skip_validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, GameStatus};

    #[test]
    fn lifecycle_round_trip() {
        let mut game = new_game();
        assert_eq!(game.turn(), Color::White);
        let fen = game_to_fen(&game);
        let restored = game_from_fen(&fen, false).unwrap();
        assert_eq!(restored.key(), game.key());
        let snap = snapshot(&mut game);
        assert_eq!(snap.status, GameStatus::InProgress);
        let mut from_snap = game_from_snapshot(&snap, false).unwrap();
        assert_eq!(from_snap.key(), game.key());
        reset_game(&mut from_snap);
        assert_eq!(from_snap.key(), new_game().key());
    }
}
