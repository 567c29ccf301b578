//! Material counting
//!
//! Plain piece values by kind, plus a role adjustment: a gatherer is worth
//! a little extra while its side still has coral in reserve, since only
//! gatherers can convert reserve coral into board presence. The whale never
//! contributes material; it cannot be captured.

use crate::board::Board;
use crate::constants::PIECE_VALUE;
use crate::evaluation::EvalWeights;
use crate::types::Color;

pub fn material_score(board: &Board, color: Color, weights: &EvalWeights) -> i32 {
    let reserve_left = board.coral_remaining(color) > 0;
    board
        .pieces_of(color)
        .into_iter()
        .map(|(_, piece)| {
            let mut value = PIECE_VALUE[piece.kind.index()];
            if reserve_left && piece.is_gatherer() {
                value += weights.gatherer_bonus;
            }
            value
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::square_at;
    use crate::types::*;

    #[test]
    fn gatherers_outscore_hunters_while_reserve_lasts() {
        let weights = EvalWeights::default();
        let mut a = Board::empty();
        a.put(
            Piece::new(PieceKind::Crab, Color::White, Some(Role::Gatherer)),
            square_at(3, 3),
        );
        let mut b = Board::empty();
        b.put(
            Piece::new(PieceKind::Crab, Color::White, Some(Role::Hunter)),
            square_at(3, 3),
        );
        assert!(
            material_score(&a, Color::White, &weights)
                > material_score(&b, Color::White, &weights)
        );
        // bonus vanishes once the reserve is spent
        a.set_coral_remaining(Color::White, 0);
        assert_eq!(
            material_score(&a, Color::White, &weights),
            material_score(&b, Color::White, &weights)
        );
    }

    #[test]
    fn whale_contributes_no_material() {
        let weights = EvalWeights::default();
        let mut board = Board::empty();
        board.set_whale(Color::White, Some((square_at(3, 0), square_at(4, 0))));
        assert_eq!(material_score(&board, Color::White, &weights), 0);
    }
}
