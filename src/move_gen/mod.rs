//! Pseudo-legal move generation and the attack oracle
//!
//! `standard` covers the single-square pieces, `whale` the two-square whale,
//! `attack` the check/attack queries including whale mutual-legality.
//! Legality filtering (leaving one's own whale in check) happens in
//! [`crate::game::Game::legal_moves`], which plays each pseudo-legal move
//! out with make/unmake.

pub mod attack;
pub mod standard;
pub mod whale;

pub use attack::{in_check, is_square_attacked, is_square_attacked_physical, AttackMemo};

use crate::board::Board;
use crate::types::{Color, Move};

/// All pseudo-legal moves for `color`: every standard piece plus the whale
pub fn pseudo_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (sq, piece) in board.pieces_of(color) {
        standard::generate_piece_moves(board, sq, piece, &mut moves);
    }
    whale::generate_whale_moves(board, color, &mut moves);
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_quiet_moves_only() {
        let board = Board::starting();
        for color in [Color::White, Color::Black] {
            let moves = pseudo_legal_moves(&board, color);
            assert!(!moves.is_empty());
            assert!(moves.iter().all(|m| !m.is_capture()));
        }
    }

    #[test]
    fn whale_moves_always_carry_their_second_square() {
        let board = Board::starting();
        let moves = pseudo_legal_moves(&board, Color::White);
        for m in moves.iter().filter(|m| m.is_whale_move()) {
            assert!(m.whale_second.is_some());
        }
        for m in moves.iter().filter(|m| !m.is_whale_move()) {
            assert!(m.whale_second.is_none());
        }
    }
}
