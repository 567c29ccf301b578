//! Static position evaluation
//!
//! `evaluate` scores an already-legal position from one side's perspective
//! (positive is good for that side). The score is the difference of the two
//! sides' partial scores: material with role adjustments, threat and
//! hanging-piece penalties, coral area control, and center occupation.
//! Weights are plain configuration with sensible defaults, not rules.

pub mod material;
pub mod threats;

use crate::game::Game;
use crate::move_gen::AttackMemo;
use crate::types::Color;

/// Tunable evaluation weights
#[derive(Debug, Clone)]
pub struct EvalWeights {
    /// Flat bonus per gatherer while its side still has reserve coral
    pub gatherer_bonus: i32,
    /// Percent of a hanging piece's value charged as a penalty
    pub hanging_percent: i32,
    /// Flat penalty per attacked-but-defended piece
    pub threatened_penalty: i32,
    /// Score per square of coral area control
    pub coral_area: i32,
    /// Bonus per piece on one of the four center squares
    pub center_bonus: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            gatherer_bonus: 15,
            hanging_percent: 50,
            threatened_penalty: 10,
            coral_area: 25,
            center_bonus: 12,
        }
    }
}

/// Score `game`'s position for `perspective`
pub fn evaluate(game: &Game, perspective: Color, weights: &EvalWeights) -> i32 {
    let board = game.board();
    let mut memo = AttackMemo::new();
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let mut side = 0;
        side += material::material_score(board, color, weights);
        side += threats::threat_score(board, color, weights, &mut memo);
        side += board.area_control(color) as i32 * weights.coral_area;
        side += center_occupancy(board, color) * weights.center_bonus;
        let sign = if color == perspective { 1 } else { -1 };
        score += sign * side;
    }
    score
}

/// Pieces on d4, e4, d5, e5 (whale halves included)
fn center_occupancy(board: &crate::board::Board, color: Color) -> i32 {
    use crate::board::square_at;
    [
        square_at(3, 3),
        square_at(4, 3),
        square_at(3, 4),
        square_at(4, 4),
    ]
    .into_iter()
    .filter(|&sq| board.get(sq).map(|p| p.color) == Some(color))
    .count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{square_at, Board};
    use crate::types::*;

    #[test]
    fn starting_position_is_balanced() {
        let game = Game::new();
        let weights = EvalWeights::default();
        let white = evaluate(&game, Color::White, &weights);
        let black = evaluate(&game, Color::Black, &weights);
        assert_eq!(white, -black);
        assert_eq!(white, 0);
    }

    #[test]
    fn extra_material_shows_up_in_the_score() {
        let mut board = Board::starting();
        board.remove(square_at(0, 6)); // black a7 crab
        let game = Game::from_position(board, Color::White);
        let weights = EvalWeights::default();
        assert!(evaluate(&game, Color::White, &weights) > 0);
        assert!(evaluate(&game, Color::Black, &weights) < 0);
    }

    #[test]
    fn coral_area_control_is_rewarded() {
        let mut board = Board::starting();
        board.set_coral_raw(square_at(3, 3), Some(Color::White));
        board.set_coral_raw(square_at(4, 3), Some(Color::White));
        let game = Game::from_position(board, Color::White);
        let weights = EvalWeights::default();
        assert!(evaluate(&game, Color::White, &weights) > 0);
    }
}
