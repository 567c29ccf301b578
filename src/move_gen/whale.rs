//! Whale move generation
//!
//! The whale occupies an ordered pair of orthogonally-adjacent squares and
//! has two geometric move classes:
//!
//! * **Parallel slide** - both halves translate by the same unit delta
//!   (orthogonal or diagonal), any distance until blocked. The slide is
//!   emitted once per half: `from`/`to` describe that half, `whale_second`
//!   the other half's destination. Physically identical slides therefore
//!   have two encodings which `whale_second` disambiguates.
//! * **Pivot** - one half moves to an orthogonal neighbor of the fixed
//!   half, which keeps the pair orthogonally adjacent by construction.
//!   Axis-changing pivots are the "rotation" case.
//!
//! The whale is a hunter-class mover: coral on a swept square blocks
//! continuing past it but never landing on it, and coral under the whale's
//! own current squares does not block its own slide. After landing, every
//! subset of the coral markers on the two occupied squares is offered as a
//! distinct move variant; removal returns each marker to its owner's
//! reserve. Only the `to` square of an emitted encoding may capture, and
//! never a whale.

use crate::board::{step, Board};
use crate::constants::ALL_DIRS;
use crate::constants::ORTHO_DIRS;
use crate::types::*;

/// Generate all pseudo-legal whale moves for `color`
pub(crate) fn generate_whale_moves(board: &Board, color: Color, moves: &mut Vec<Move>) {
    let Some(pair) = board.whale(color) else {
        return;
    };
    gen_pivots(board, color, pair, moves);
    gen_parallel_slides(board, color, pair, moves);
}

/// What the moving half finds on a destination square. The whale's own
/// current squares count as empty - it vacates them as it moves.
enum Landing {
    Empty,
    Capture(PieceKind, Option<Role>),
    Blocked,
}

fn classify(board: &Board, to: Square, color: Color, pair: (Square, Square)) -> Landing {
    if to == pair.0 || to == pair.1 {
        return Landing::Empty;
    }
    match board.get(to) {
        None => Landing::Empty,
        Some(p) if p.is_whale() => Landing::Blocked,
        Some(p) if p.color == color => Landing::Blocked,
        Some(p) => Landing::Capture(p.kind, p.role),
    }
}

/// Coral on `sq` blocks the whale's passage unless the whale itself is
/// already sitting on it
fn coral_blocks(board: &Board, sq: Square, pair: (Square, Square)) -> bool {
    sq != pair.0 && sq != pair.1 && board.coral_at(sq).is_some()
}

fn gen_pivots(
    board: &Board,
    color: Color,
    pair: (Square, Square),
    moves: &mut Vec<Move>,
) {
    for (mover, fixed) in [(pair.0, pair.1), (pair.1, pair.0)] {
        for &delta in &ORTHO_DIRS {
            let Some(to) = step(fixed, delta) else {
                continue;
            };
            if to == mover {
                continue;
            }
            let captured = match classify(board, to, color, pair) {
                Landing::Empty => None,
                Landing::Capture(kind, role) => Some((kind, role)),
                Landing::Blocked => continue,
            };
            let base = Move {
                from: mover,
                to,
                piece: PieceKind::Whale,
                captured,
                whale_second: Some(fixed),
                coral_placed: false,
                coral_removed: Vec::new(),
                promotion: None,
            };
            push_removal_variants(board, base, moves);
        }
    }
}

fn gen_parallel_slides(
    board: &Board,
    color: Color,
    pair: (Square, Square),
    moves: &mut Vec<Move>,
) {
    for (half, other) in [(pair.0, pair.1), (pair.1, pair.0)] {
        for &delta in &ALL_DIRS {
            let mut to = half;
            let mut second = other;
            loop {
                let (Some(next_to), Some(next_second)) = (step(to, delta), step(second, delta))
                else {
                    break;
                };
                to = next_to;
                second = next_second;

                // the trailing half may only pass through / land on squares
                // that are empty (its own vacated squares included)
                let second_open = second == pair.0
                    || second == pair.1
                    || board.get(second).is_none();
                if !second_open {
                    break;
                }

                let landing = classify(board, to, color, pair);
                let captured = match landing {
                    Landing::Empty => None,
                    Landing::Capture(kind, role) => Some((kind, role)),
                    Landing::Blocked => break,
                };
                let base = Move {
                    from: half,
                    to,
                    piece: PieceKind::Whale,
                    captured,
                    whale_second: Some(second),
                    coral_placed: false,
                    coral_removed: Vec::new(),
                    promotion: None,
                };
                let is_capture = base.captured.is_some();
                push_removal_variants(board, base, moves);

                if is_capture {
                    break;
                }
                // landing on coral is allowed, sliding past it is not
                if coral_blocks(board, to, pair) || coral_blocks(board, second, pair) {
                    break;
                }
            }
        }
    }
}

/// Emit `base` plus one variant per non-empty subset of the coral markers
/// on the two squares the whale ends on
fn push_removal_variants(board: &Board, base: Move, moves: &mut Vec<Move>) {
    let second = base.whale_second.unwrap_or(base.to);
    let mut removable: Vec<Square> = Vec::with_capacity(2);
    for sq in [base.to, second] {
        if board.coral_at(sq).is_some() {
            removable.push(sq);
        }
    }
    removable.sort_unstable();

    moves.push(base.clone());
    for mask in 1..(1u8 << removable.len()) {
        let mut variant = base.clone();
        variant.coral_removed = removable
            .iter()
            .enumerate()
            .filter(|&(i, _)| mask & (1 << i) != 0)
            .map(|(_, &sq)| sq)
            .collect();
        moves.push(variant);
    }
}
