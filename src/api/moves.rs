//! Move submission and validation
//!
//! [`try_move`] is the single write path for caller-submitted moves. A
//! request is matched jointly against the current legal-move list: zero
//! matches is an invalid move, several matches means the caller must add
//! disambiguators (`whale_second`, `coral_placed`, `coral_removed`). A
//! rejected request mutates nothing.

use tracing::debug;

use crate::board::is_valid_square;
use crate::error::{EngineError, EngineResult};
use crate::game::Game;
use crate::types::*;

/// All legal moves for the side to move
pub fn legal_moves(game: &mut Game) -> Vec<Move> {
    let turn = game.turn();
    game.legal_moves(turn)
}

/// Legal moves of the side to move from one square
///
/// # Errors
///
/// Rejects out-of-range squares, empty squares, and pieces belonging to
/// the side not on move.
pub fn moves_from(game: &mut Game, sq: Square) -> EngineResult<Vec<Move>> {
    if !is_valid_square(sq) {
        return Err(EngineError::InvalidSquare { square: sq });
    }
    let piece = game
        .board()
        .get(sq)
        .ok_or(EngineError::NoPieceAtSquare { square: sq })?;
    if piece.color != game.turn() {
        return Err(EngineError::WrongPieceColor { square: sq });
    }
    Ok(game.moves_from(sq))
}

/// Validate a submitted move request and, if it names exactly one legal
/// move, execute that move. Returns the executed move.
///
/// # Errors
///
/// * [`EngineError::GameOver`] when the game has already ended
/// * [`EngineError::InvalidSquare`] / [`EngineError::NoPieceAtSquare`] /
///   [`EngineError::WrongPieceColor`] for malformed sources
/// * [`EngineError::InvalidMove`] when no legal move matches
/// * [`EngineError::AmbiguousMove`] when several legal moves match
pub fn try_move(game: &mut Game, request: &MoveRequest) -> EngineResult<Move> {
    if game.status().is_game_over() {
        return Err(EngineError::GameOver);
    }
    if !is_valid_square(request.from) || !is_valid_square(request.to) {
        return Err(EngineError::InvalidSquare {
            square: if is_valid_square(request.from) {
                request.to
            } else {
                request.from
            },
        });
    }
    let piece = game
        .board()
        .get(request.from)
        .ok_or(EngineError::NoPieceAtSquare {
            square: request.from,
        })?;
    if piece.color != game.turn() {
        return Err(EngineError::WrongPieceColor {
            square: request.from,
        });
    }

    let mut candidates: Vec<Move> = game
        .moves_from(request.from)
        .into_iter()
        .filter(|m| request.matches(m))
        .collect();

    match candidates.len() {
        0 => Err(EngineError::InvalidMove {
            from: request.from,
            to: request.to,
        }),
        1 => {
            let mv = candidates.swap_remove(0);
            game.apply_move(&mv);
            debug!(from = mv.from, to = mv.to, "move applied");
            Ok(mv)
        }
        n => Err(EngineError::AmbiguousMove {
            from: request.from,
            to: request.to,
            candidates: n,
        }),
    }
}

/// Take back the most recently applied move
pub fn undo_last(game: &mut Game) -> EngineResult<Move> {
    game.undo_move()
}

/// Record a resignation by `color`
pub fn resign(game: &mut Game, color: Color) {
    game.resign(color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::new_game;
    use crate::board::square_at;

    #[test]
    fn simple_request_executes() {
        let mut game = new_game();
        let mv = try_move(
            &mut game,
            &MoveRequest::new(square_at(0, 1), square_at(0, 2)),
        )
        .unwrap();
        assert_eq!(mv.piece, PieceKind::Crab);
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn gatherer_destination_requires_coral_disambiguation() {
        let mut game = new_game();
        // b2 octopus (gatherer) to c4 exists both plain and with placement
        let request = MoveRequest::new(square_at(1, 1), square_at(2, 3));
        let err = try_move(&mut game, &request).unwrap_err();
        assert_eq!(
            err,
            EngineError::AmbiguousMove {
                from: square_at(1, 1),
                to: square_at(2, 3),
                candidates: 2,
            }
        );
        // nothing changed
        assert_eq!(game.turn(), Color::White);
        assert!(game.history().is_empty());

        let placed = MoveRequest {
            coral_placed: Some(true),
            ..request
        };
        let mv = try_move(&mut game, &placed).unwrap();
        assert!(mv.coral_placed);
        assert_eq!(game.board().coral_at(mv.to), Some(Color::White));
    }

    #[test]
    fn rejects_wrong_side_and_empty_squares() {
        let mut game = new_game();
        assert_eq!(
            try_move(&mut game, &MoveRequest::new(square_at(0, 6), square_at(0, 5))),
            Err(EngineError::WrongPieceColor {
                square: square_at(0, 6)
            })
        );
        assert_eq!(
            try_move(&mut game, &MoveRequest::new(square_at(0, 3), square_at(0, 4))),
            Err(EngineError::NoPieceAtSquare {
                square: square_at(0, 3)
            })
        );
        assert_eq!(
            try_move(&mut game, &MoveRequest::new(-1, 5)),
            Err(EngineError::InvalidSquare { square: -1 })
        );
    }

    #[test]
    fn rejects_moves_after_game_end() {
        let mut game = new_game();
        resign(&mut game, Color::White);
        assert_eq!(
            try_move(&mut game, &MoveRequest::new(square_at(0, 1), square_at(0, 2))),
            Err(EngineError::GameOver)
        );
    }

    #[test]
    fn moves_from_validates_the_square() {
        let mut game = new_game();
        assert!(moves_from(&mut game, 64).is_err());
        assert!(moves_from(&mut game, square_at(3, 3)).is_err());
        let crab_moves = moves_from(&mut game, square_at(0, 1)).unwrap();
        assert!(!crab_moves.is_empty());
        assert!(crab_moves.iter().all(|m| m.from == square_at(0, 1)));
    }

    #[test]
    fn undo_after_try_move_restores_the_position() {
        let mut game = new_game();
        let before = game.key();
        try_move(
            &mut game,
            &MoveRequest::new(square_at(0, 1), square_at(0, 2)),
        )
        .unwrap();
        undo_last(&mut game).unwrap();
        assert_eq!(game.key(), before);
    }
}
