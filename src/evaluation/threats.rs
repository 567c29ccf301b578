//! Threat and hanging-piece terms
//!
//! A piece attacked by the opponent and not defended by its own side is
//! hanging: it is charged a percentage of its value, on the assumption the
//! opponent can usually collect it. A piece that is attacked but defended
//! costs only a small flat penalty. Attack queries use physical whale
//! semantics through [`AttackMemo`], which is accurate enough for a static
//! term and avoids the legality probe in the evaluation hot path.

use crate::board::Board;
use crate::constants::PIECE_VALUE;
use crate::evaluation::EvalWeights;
use crate::move_gen::AttackMemo;
use crate::types::Color;

/// Negative contribution of `color`'s threatened and hanging pieces
pub fn threat_score(
    board: &Board,
    color: Color,
    weights: &EvalWeights,
    memo: &mut AttackMemo,
) -> i32 {
    let opponent = color.opponent();
    let mut penalty = 0;
    for (sq, piece) in board.pieces_of(color) {
        if !memo.is_attacked(board, sq, opponent) {
            continue;
        }
        if memo.is_attacked(board, sq, color) {
            penalty += weights.threatened_penalty;
        } else {
            penalty += PIECE_VALUE[piece.kind.index()] * weights.hanging_percent / 100;
        }
    }
    -penalty
}
