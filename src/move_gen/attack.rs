//! Attack and check oracle
//!
//! Standard pieces attack exactly where they move, coral rules included.
//! Whale attacks use the mutual-legality rule: an opposing whale attacks a
//! square only if it has a whale move landing a half there whose execution
//! would not leave that whale itself in check. The nested self-check runs
//! with *physical* whale semantics (geometry only), so the recursion is
//! bounded to exactly one level - an intentional one-ply limit, not a
//! general fixed point.
//!
//! The legality simulation works on a cloned board snapshot rather than
//! mutating in place, so a failed probe can never corrupt the position.

use crate::board::{file_rank, step, Board};
use crate::constants::*;
use crate::types::*;

/// Whether whale attacks are resolved with the mutual-legality rule or by
/// geometry alone (the bounded inner level of the recursion)
#[derive(Clone, Copy, PartialEq, Eq)]
enum WhaleSemantics {
    Legal,
    Physical,
}

/// Is `sq` attacked by `by` under full (mutually-legal) attack semantics?
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    attacked_by_standard_piece(board, sq, by)
        || whale_attacks(board, by, sq, WhaleSemantics::Legal)
}

/// Geometric-only variant: whale attacks counted without the legality
/// probe. Used by the inner recursion level and by evaluation scans.
pub fn is_square_attacked_physical(board: &Board, sq: Square, by: Color) -> bool {
    attacked_by_standard_piece(board, sq, by)
        || whale_attacks(board, by, sq, WhaleSemantics::Physical)
}

/// True iff either of `color`'s whale squares is attacked by the opponent
/// under legal attack semantics
pub fn in_check(board: &Board, color: Color) -> bool {
    let Some((a, b)) = board.whale(color) else {
        return false;
    };
    let opponent = color.opponent();
    is_square_attacked(board, a, opponent) || is_square_attacked(board, b, opponent)
}

/// Check test with physical whale semantics; the bounded inner level
pub(crate) fn in_check_physical(board: &Board, color: Color) -> bool {
    let Some((a, b)) = board.whale(color) else {
        return false;
    };
    let opponent = color.opponent();
    is_square_attacked_physical(board, a, opponent)
        || is_square_attacked_physical(board, b, opponent)
}

/// Memo for repeated square-attack queries against one fixed position.
/// Evaluation and terminal-state scans probe many squares of the same
/// position; the memo collapses those to one computation per (side,
/// square). It must be discarded whenever the position changes.
pub struct AttackMemo {
    cached: [[Option<bool>; NUM_SQUARES]; 2],
}

impl AttackMemo {
    pub fn new() -> AttackMemo {
        AttackMemo {
            cached: [[None; NUM_SQUARES]; 2],
        }
    }

    /// Memoized physical-semantics attack query
    pub fn is_attacked(&mut self, board: &Board, sq: Square, by: Color) -> bool {
        if let Some(hit) = self.cached[by.index()][sq as usize] {
            return hit;
        }
        let result = is_square_attacked_physical(board, sq, by);
        self.cached[by.index()][sq as usize] = Some(result);
        result
    }
}

impl Default for AttackMemo {
    fn default() -> Self {
        AttackMemo::new()
    }
}

fn attacked_by_standard_piece(board: &Board, target: Square, by: Color) -> bool {
    board
        .pieces_of(by)
        .into_iter()
        .any(|(from, piece)| piece_attacks(board, from, piece, target))
}

fn piece_attacks(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    let (ff, fr) = file_rank(from);
    let (tf, tr) = file_rank(target);
    let (df, dr) = (tf - ff, tr - fr);
    match piece.kind {
        // crabs attack all four orthogonal neighbors - forward, backward,
        // left and right - and nothing diagonal
        PieceKind::Crab => df.abs() + dr.abs() == 1,
        PieceKind::Octopus => {
            (df.abs() == 1 && dr.abs() == 2) || (df.abs() == 2 && dr.abs() == 1)
        }
        PieceKind::Turtle => (df == 0) != (dr == 0) && ray_clear(board, from, target, piece),
        PieceKind::Dolphin => {
            df != 0 && df.abs() == dr.abs() && ray_clear(board, from, target, piece)
        }
        PieceKind::Pufferfish => {
            ((df == 0) != (dr == 0) || (df != 0 && df.abs() == dr.abs()))
                && ray_clear(board, from, target, piece)
        }
        PieceKind::Whale => false,
    }
}

/// Every square strictly between `from` and `target` must be free of
/// pieces, and free of coral when the slider is a hunter
fn ray_clear(board: &Board, from: Square, target: Square, piece: Piece) -> bool {
    let (ff, fr) = file_rank(from);
    let (tf, tr) = file_rank(target);
    let delta = ((tf - ff).signum(), (tr - fr).signum());
    let mut current = from;
    loop {
        let Some(next) = step(current, delta) else {
            return false;
        };
        if next == target {
            return true;
        }
        if board.get(next).is_some() {
            return false;
        }
        if piece.is_hunter() && board.coral_at(next).is_some() {
            return false;
        }
        current = next;
    }
}

/// Does `by`'s whale attack `target`? A candidate whale move counts when a
/// half lands on `target` (the occupant of `target` treated as capturable
/// for the probe). Under `Legal` semantics each candidate is additionally
/// played out on a snapshot and discarded if it would leave the attacking
/// whale in (physical) check.
fn whale_attacks(board: &Board, by: Color, target: Square, semantics: WhaleSemantics) -> bool {
    let Some(pair) = board.whale(by) else {
        return false;
    };
    if target == pair.0 || target == pair.1 {
        return false;
    }

    // pivots: a half lands on an orthogonal neighbor of the fixed half
    for (mover, fixed) in [(pair.0, pair.1), (pair.1, pair.0)] {
        for &delta in &ORTHO_DIRS {
            let Some(to) = step(fixed, delta) else {
                continue;
            };
            if to != target || to == mover {
                continue;
            }
            if candidate_is_attack(board, by, target, (to, fixed), semantics) {
                return true;
            }
        }
    }

    // parallel slides: walk each half's ray until blocked; the target
    // square itself acts as a capturable stop
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

                let second_open = second == pair.0
                    || second == pair.1
                    || (second != target && board.get(second).is_none());
                if !second_open {
                    break;
                }

                if to == target {
                    if candidate_is_attack(board, by, target, (to, second), semantics) {
                        return true;
                    }
                    break; // cannot slide past the target square
                }

                let passable = to == pair.0 || to == pair.1 || board.get(to).is_none();
                if !passable {
                    break;
                }
                let coral_stop = (to != pair.0 && to != pair.1 && board.coral_at(to).is_some())
                    || (second != pair.0
                        && second != pair.1
                        && board.coral_at(second).is_some());
                if coral_stop {
                    break;
                }
            }
        }
    }

    false
}

/// Play the candidate whale move out on a snapshot and test whether the
/// attacker would be left in check. Physical semantics short-circuits to
/// "yes, it attacks" - that is the bounded recursion floor.
fn candidate_is_attack(
    board: &Board,
    by: Color,
    target: Square,
    new_pair: (Square, Square),
    semantics: WhaleSemantics,
) -> bool {
    if semantics == WhaleSemantics::Physical {
        return true;
    }
    let mut sim = board.clone();
    sim.remove(target);
    let opponent = by.opponent();
    if let Some((a, b)) = sim.whale(opponent) {
        if target == a || target == b {
            // hypothetical occupation of an enemy whale square for the
            // probe only; actual whale capture is never generated
            sim.set_whale(opponent, None);
        }
    }
    sim.set_whale(by, Some(new_pair));
    !in_check_physical(&sim, by)
}
