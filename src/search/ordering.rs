//! Move ordering for alpha-beta pruning
//!
//! Tries the most promising moves first so cutoffs come early: the
//! transposition-table move, then captures by MVV-LVA (most valuable
//! victim, least valuable attacker), then coral interactions and center
//! control.

use crate::board::file_rank;
use crate::constants::PIECE_VALUE;
use crate::types::*;

fn move_score(mv: &Move, tt_best: Option<(Square, Square, Option<Square>)>) -> i32 {
    if let Some((from, to, second)) = tt_best {
        if mv.from == from && mv.to == to && mv.whale_second == second {
            return 1_000_000;
        }
    }

    let mut score = 0;

    if let Some((victim, _)) = mv.captured {
        let attacker = PIECE_VALUE[mv.piece.index()];
        score += PIECE_VALUE[victim.index()] * 10 - attacker;
    }

    // coral interactions usually change the area-control race
    if mv.coral_placed {
        score += 40;
    }
    score += mv.coral_removed.len() as i32 * 60;

    let (file, rank) = file_rank(mv.to);
    let center_dist = (2 * file - 7).abs() + (2 * rank - 7).abs();
    score += (14 - center_dist) as i32 * 3;

    score
}

/// Sort `moves` best-first
pub(super) fn order_moves(moves: &mut [Move], tt_best: Option<(Square, Square, Option<Square>)>) {
    moves.sort_by_cached_key(|mv| -move_score(mv, tt_best));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::square_at;

    fn capture(from: Square, to: Square, piece: PieceKind, victim: PieceKind) -> Move {
        let mut mv = Move::simple(from, to, piece);
        mv.captured = Some((victim, Some(Role::Hunter)));
        mv
    }

    #[test]
    fn captures_order_before_quiet_moves() {
        let mut moves = vec![
            Move::simple(square_at(0, 0), square_at(0, 1), PieceKind::Crab),
            capture(
                square_at(3, 3),
                square_at(3, 4),
                PieceKind::Crab,
                PieceKind::Turtle,
            ),
        ];
        order_moves(&mut moves, None);
        assert!(moves[0].is_capture());
    }

    #[test]
    fn mvv_lva_prefers_cheap_attacker_on_big_victim() {
        // crab takes turtle vs pufferfish takes crab
        let mut moves = vec![
            capture(
                square_at(0, 0),
                square_at(0, 1),
                PieceKind::Pufferfish,
                PieceKind::Crab,
            ),
            capture(
                square_at(7, 7),
                square_at(7, 6),
                PieceKind::Crab,
                PieceKind::Turtle,
            ),
        ];
        order_moves(&mut moves, None);
        assert_eq!(moves[0].piece, PieceKind::Crab);
        assert_eq!(moves[0].captured.map(|c| c.0), Some(PieceKind::Turtle));
    }

    #[test]
    fn tt_move_jumps_the_queue() {
        let quiet = Move::simple(square_at(0, 0), square_at(0, 1), PieceKind::Crab);
        let big = capture(
            square_at(3, 3),
            square_at(3, 4),
            PieceKind::Crab,
            PieceKind::Pufferfish,
        );
        let mut moves = vec![big, quiet.clone()];
        order_moves(&mut moves, Some((quiet.from, quiet.to, None)));
        assert_eq!(moves[0], quiet);
    }

    #[test]
    fn center_destinations_order_before_edge_destinations() {
        let mut moves = vec![
            Move::simple(square_at(0, 0), square_at(0, 7), PieceKind::Turtle),
            Move::simple(square_at(7, 0), square_at(3, 3), PieceKind::Turtle),
        ];
        order_moves(&mut moves, None);
        assert_eq!(moves[0].to, square_at(3, 3));
    }
}
