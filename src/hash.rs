//! Position keys and the transposition table
//!
//! Zobrist hashing over (color, kind, role, square) plus coral terrain,
//! coral reserves, and side to move. The tables are process-wide immutable
//! constants generated once from a fixed-seed LCG, so identical positions
//! hash identically across runs and the tables are thread-safe by
//! construction. The position key doubles as the repetition-detection
//! identity and the transposition-table key.

use once_cell::sync::Lazy;

use crate::board::Board;
use crate::constants::*;
use crate::types::*;

struct ZobristTables {
    /// [color][kind][square]
    piece: [[[u64; NUM_SQUARES]; 6]; 2],
    /// XORed in addition to `piece` when the piece is a gatherer
    gatherer: [[u64; NUM_SQUARES]; 2],
    /// [color][square] coral marker
    coral: [[u64; NUM_SQUARES]; 2],
    /// [color][remaining 0..=STARTING_CORAL]
    reserve: [[u64; STARTING_CORAL as usize + 1]; 2],
    white_to_move: u64,
}

static ZOBRIST: Lazy<ZobristTables> = Lazy::new(|| {
    // Knuth MMIX LCG with a fixed seed: reproducible keys across runs
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        seed
    };

    let mut piece = [[[0u64; NUM_SQUARES]; 6]; 2];
    let mut gatherer = [[0u64; NUM_SQUARES]; 2];
    let mut coral = [[0u64; NUM_SQUARES]; 2];
    let mut reserve = [[0u64; STARTING_CORAL as usize + 1]; 2];
    for color in 0..2 {
        for kind in 0..6 {
            for sq in 0..NUM_SQUARES {
                piece[color][kind][sq] = next();
            }
        }
        for sq in 0..NUM_SQUARES {
            gatherer[color][sq] = next();
            coral[color][sq] = next();
        }
        for count in 0..=STARTING_CORAL as usize {
            reserve[color][count] = next();
        }
    }
    ZobristTables {
        piece,
        gatherer,
        coral,
        reserve,
        white_to_move: next(),
    }
});

/// Full position key: pieces with roles, whale pairs, coral terrain, coral
/// reserves, and side to move
pub fn position_key(board: &Board, turn: Color) -> u64 {
    let z = &*ZOBRIST;
    let mut key = 0u64;

    for sq in 0..NUM_SQUARES as i8 {
        if let Some(piece) = board.get(sq) {
            key ^= z.piece[piece.color.index()][piece.kind.index()][sq as usize];
            if piece.is_gatherer() {
                key ^= z.gatherer[piece.color.index()][sq as usize];
            }
        }
        if let Some(owner) = board.coral_at(sq) {
            key ^= z.coral[owner.index()][sq as usize];
        }
    }
    for color in [Color::White, Color::Black] {
        let remaining = board.coral_remaining(color).min(STARTING_CORAL) as usize;
        key ^= z.reserve[color.index()][remaining];
    }
    if turn == Color::White {
        key ^= z.white_to_move;
    }
    key
}

/// Score bound stored with a table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

/// Transposition table entry. The best move is stored as a compact
/// (from, to, whale_second) triple - enough to find the full move again for
/// ordering without carrying coral-removal vectors around.
#[derive(Debug, Clone, Copy)]
pub struct TtEntry {
    pub key: u64,
    pub depth: i32,
    pub score: i32,
    pub bound: Bound,
    pub best: Option<(Square, Square, Option<Square>)>,
}

/// Direct-mapped transposition table with depth-preferred replacement
pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    pub hits: u64,
    pub stores: u64,
}

impl TranspositionTable {
    pub fn new(size: usize) -> TranspositionTable {
        TranspositionTable {
            entries: vec![None; size.max(1024)],
            hits: 0,
            stores: 0,
        }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) % self.entries.len()
    }

    /// Probe for a usable score. Returns `(score, best)` when the stored
    /// depth suffices and the bound brackets `(alpha, beta)`; otherwise the
    /// stored best move alone may still be returned for move ordering.
    pub fn probe(
        &mut self,
        key: u64,
        depth: i32,
        alpha: i32,
        beta: i32,
    ) -> (Option<i32>, Option<(Square, Square, Option<Square>)>) {
        let idx = self.index(key);
        let entry = match self.entries[idx] {
            Some(e) if e.key == key => e,
            _ => return (None, None),
        };
        if entry.depth >= depth {
            let usable = match entry.bound {
                Bound::Exact => true,
                Bound::Lower => entry.score >= beta,
                Bound::Upper => entry.score <= alpha,
            };
            if usable {
                self.hits += 1;
                return (Some(entry.score), entry.best);
            }
        }
        (None, entry.best)
    }

    /// Store an entry, preferring deeper searches over shallow ones at the
    /// same slot; a same-key entry is always refreshed
    pub fn store(
        &mut self,
        key: u64,
        depth: i32,
        score: i32,
        bound: Bound,
        best: Option<(Square, Square, Option<Square>)>,
    ) {
        let idx = self.index(key);
        let replace = match self.entries[idx] {
            None => true,
            Some(existing) => existing.key == key || depth >= existing.depth,
        };
        if replace {
            self.stores += 1;
            self.entries[idx] = Some(TtEntry {
                key,
                depth,
                score,
                bound,
                best,
            });
        }
    }

    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = None);
        self.hits = 0;
        self.stores = 0;
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(TT_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn identical_positions_hash_identically() {
        let a = Board::starting();
        let b = Board::starting();
        assert_eq!(
            position_key(&a, Color::White),
            position_key(&b, Color::White)
        );
    }

    #[test]
    fn side_to_move_changes_the_key() {
        let board = Board::starting();
        assert_ne!(
            position_key(&board, Color::White),
            position_key(&board, Color::Black)
        );
    }

    #[test]
    fn coral_terrain_changes_the_key() {
        let mut board = Board::starting();
        let before = position_key(&board, Color::White);
        board.set_coral_raw(27, Some(Color::White));
        assert_ne!(before, position_key(&board, Color::White));
    }

    #[test]
    fn role_is_part_of_the_key() {
        let mut a = Board::empty();
        let mut b = Board::empty();
        a.put(
            Piece::new(PieceKind::Crab, Color::White, Some(Role::Hunter)),
            27,
        );
        b.put(
            Piece::new(PieceKind::Crab, Color::White, Some(Role::Gatherer)),
            27,
        );
        assert_ne!(
            position_key(&a, Color::White),
            position_key(&b, Color::White)
        );
    }

    #[test]
    fn tt_store_and_probe_round_trip() {
        let mut tt = TranspositionTable::new(2048);
        tt.store(42, 5, 120, Bound::Exact, Some((3, 11, None)));
        let (score, best) = tt.probe(42, 5, -100, 100);
        assert_eq!(score, Some(120));
        assert_eq!(best, Some((3, 11, None)));
        // shallower stored depth is not usable but still yields the move
        let (score, best) = tt.probe(42, 9, -100, 100);
        assert_eq!(score, None);
        assert_eq!(best, Some((3, 11, None)));
    }
}
