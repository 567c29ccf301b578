//! Move generation for the standard (single-square) pieces
//!
//! Crabs step one square orthogonally in any of the four directions (their
//! attack set is exactly those four neighbors - no diagonals). Octopuses
//! jump the eight (1,2)-offsets. Turtles slide orthogonally, dolphins
//! diagonally, pufferfish in all eight directions.
//!
//! Coral interacts with movement through the mover's role: a hunter's slide
//! stops ON a coral square (landing and capturing there is fine, continuing
//! past is not) while a gatherer passes through coral as if it were not
//! there. A gatherer move whose destination carries no coral is emitted
//! twice when its side still has coral in reserve: once plain and once
//! placing a coral marker on the destination.

use crate::board::{step, Board};
use crate::constants::*;
use crate::types::*;

/// What a mover finds on a candidate destination square
enum Landing {
    Empty,
    Capture(PieceKind, Option<Role>),
    Blocked,
}

/// Whale squares block like friendly pieces: capturing a whale is forbidden
/// for every piece, so whale safety is enforced purely through check.
fn classify(board: &Board, to: Square, mover: Color) -> Landing {
    match board.get(to) {
        None => Landing::Empty,
        Some(p) if p.is_whale() => Landing::Blocked,
        Some(p) if p.color == mover => Landing::Blocked,
        Some(p) => Landing::Capture(p.kind, p.role),
    }
}

/// Emit `mv`, plus the coral-placement variant when the mover is a gatherer
/// with reserve coral and a coral-free destination
fn push_move(board: &Board, piece: Piece, mv: Move, moves: &mut Vec<Move>) {
    let place_option = piece.is_gatherer()
        && board.coral_at(mv.to).is_none()
        && board.coral_remaining(piece.color) > 0;
    if place_option {
        let mut placed = mv.clone();
        placed.coral_placed = true;
        moves.push(mv);
        moves.push(placed);
    } else {
        moves.push(mv);
    }
}

/// Generate all pseudo-legal moves for the non-whale piece at `from`
pub(crate) fn generate_piece_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    moves: &mut Vec<Move>,
) {
    match piece.kind {
        PieceKind::Crab => gen_steps(board, from, piece, &ORTHO_DIRS, moves),
        PieceKind::Octopus => gen_jumps(board, from, piece, moves),
        PieceKind::Turtle => gen_slides(board, from, piece, &ORTHO_DIRS, moves),
        PieceKind::Dolphin => gen_slides(board, from, piece, &DIAG_DIRS, moves),
        PieceKind::Pufferfish => gen_slides(board, from, piece, &ALL_DIRS, moves),
        PieceKind::Whale => debug_assert!(false, "whale moves come from move_gen::whale"),
    }
}

fn gen_steps(
    board: &Board,
    from: Square,
    piece: Piece,
    deltas: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &delta in deltas {
        let Some(to) = step(from, delta) else {
            continue;
        };
        match classify(board, to, piece.color) {
            Landing::Empty => {
                push_move(board, piece, Move::simple(from, to, piece.kind), moves);
            }
            Landing::Capture(kind, role) => {
                let mut mv = Move::simple(from, to, piece.kind);
                mv.captured = Some((kind, role));
                push_move(board, piece, mv, moves);
            }
            Landing::Blocked => {}
        }
    }
}

fn gen_jumps(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    for &offset in &OCTOPUS_OFFSETS {
        let Some(to) = step(from, offset) else {
            continue;
        };
        match classify(board, to, piece.color) {
            Landing::Empty => {
                push_move(board, piece, Move::simple(from, to, piece.kind), moves);
            }
            Landing::Capture(kind, role) => {
                let mut mv = Move::simple(from, to, piece.kind);
                mv.captured = Some((kind, role));
                push_move(board, piece, mv, moves);
            }
            Landing::Blocked => {}
        }
    }
}

fn gen_slides(
    board: &Board,
    from: Square,
    piece: Piece,
    dirs: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &dir in dirs {
        let mut current = from;
        loop {
            let Some(to) = step(current, dir) else {
                break;
            };
            match classify(board, to, piece.color) {
                Landing::Empty => {
                    push_move(board, piece, Move::simple(from, to, piece.kind), moves);
                }
                Landing::Capture(kind, role) => {
                    let mut mv = Move::simple(from, to, piece.kind);
                    mv.captured = Some((kind, role));
                    push_move(board, piece, mv, moves);
                    break;
                }
                Landing::Blocked => break,
            }
            // hunters stop on coral; gatherers slide through
            if piece.is_hunter() && board.coral_at(to).is_some() {
                break;
            }
            current = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::square_at;

    fn lone(board: &mut Board, kind: PieceKind, color: Color, role: Role, sq: Square) -> Piece {
        let piece = Piece::new(kind, color, Some(role));
        board.put(piece, sq);
        piece
    }

    #[test]
    fn crab_moves_are_the_four_orthogonal_neighbors() {
        let mut board = Board::empty();
        let d4 = square_at(3, 3);
        let piece = lone(&mut board, PieceKind::Crab, Color::White, Role::Hunter, d4);
        let mut moves = Vec::new();
        generate_piece_moves(&board, d4, piece, &mut moves);
        let mut dests: Vec<Square> = moves.iter().map(|m| m.to).collect();
        dests.sort_unstable();
        let mut expected = vec![
            square_at(3, 2), // d3
            square_at(2, 3), // c4
            square_at(4, 3), // e4
            square_at(3, 4), // d5
        ];
        expected.sort_unstable();
        assert_eq!(dests, expected);
    }

    #[test]
    fn hunter_turtle_stops_on_coral() {
        let mut board = Board::empty();
        let a1 = square_at(0, 0);
        let piece = lone(&mut board, PieceKind::Turtle, Color::White, Role::Hunter, a1);
        board.set_coral_raw(square_at(0, 3), Some(Color::Black)); // a4
        let mut moves = Vec::new();
        generate_piece_moves(&board, a1, piece, &mut moves);
        let north: Vec<Square> = moves
            .iter()
            .map(|m| m.to)
            .filter(|&to| to % 8 == 0)
            .collect();
        // a2, a3, a4 - may land on the coral but never pass it
        assert_eq!(north.len(), 3);
        assert!(north.contains(&square_at(0, 3)));
        assert!(!north.contains(&square_at(0, 4)));
    }

    #[test]
    fn gatherer_turtle_slides_through_coral() {
        let mut board = Board::empty();
        let a1 = square_at(0, 0);
        let piece = lone(
            &mut board,
            PieceKind::Turtle,
            Color::White,
            Role::Gatherer,
            a1,
        );
        board.set_coral_raw(square_at(0, 3), Some(Color::Black));
        let mut moves = Vec::new();
        generate_piece_moves(&board, a1, piece, &mut moves);
        assert!(moves.iter().any(|m| m.to == square_at(0, 7)));
    }

    #[test]
    fn gatherer_moves_come_in_placement_pairs() {
        let mut board = Board::empty();
        let d4 = square_at(3, 3);
        let piece = lone(&mut board, PieceKind::Crab, Color::White, Role::Gatherer, d4);
        let mut moves = Vec::new();
        generate_piece_moves(&board, d4, piece, &mut moves);
        // four destinations, each with a placed and an unplaced variant
        assert_eq!(moves.len(), 8);
        let placed = moves.iter().filter(|m| m.coral_placed).count();
        assert_eq!(placed, 4);
    }

    #[test]
    fn no_piece_may_capture_a_whale() {
        let mut board = Board::empty();
        let d4 = square_at(3, 3);
        let piece = lone(
            &mut board,
            PieceKind::Pufferfish,
            Color::White,
            Role::Hunter,
            d4,
        );
        board.set_whale(Color::Black, Some((square_at(3, 6), square_at(3, 7))));
        let mut moves = Vec::new();
        generate_piece_moves(&board, d4, piece, &mut moves);
        assert!(moves.iter().all(|m| m.captured.map(|c| c.0) != Some(PieceKind::Whale)));
        // the slide is blocked by the whale square, not allowed past it
        assert!(!moves.iter().any(|m| m.to == square_at(3, 6)));
        assert!(!moves.iter().any(|m| m.to == square_at(3, 7)));
    }

    #[test]
    fn jumper_ignores_blockers_on_the_way() {
        let mut board = Board::empty();
        let d4 = square_at(3, 3);
        let piece = lone(&mut board, PieceKind::Octopus, Color::White, Role::Hunter, d4);
        // ring of coral and pieces around the octopus
        for &delta in &ORTHO_DIRS {
            if let Some(sq) = step(d4, delta) {
                board.set_coral_raw(sq, Some(Color::Black));
            }
        }
        let mut moves = Vec::new();
        generate_piece_moves(&board, d4, piece, &mut moves);
        assert_eq!(moves.len(), 8);
    }
}
