//! Board/Position store
//!
//! Holds piece placement, per-square coral markers, the remaining-coral
//! counters, and the two-square whale pair per color. Whales are stored only
//! as pairs; [`Board::get`] derives a whale piece view from pair membership
//! so the two halves can never fall out of sync.

use crate::constants::*;
use crate::types::*;

/// Convert file and rank to a linear square index
#[inline]
pub fn square_at(file: i8, rank: i8) -> Square {
    rank * BOARD_SIZE + file
}

/// Convert a square index to (file, rank)
#[inline]
pub fn file_rank(sq: Square) -> (i8, i8) {
    (sq % BOARD_SIZE, sq / BOARD_SIZE)
}

/// Check that file and rank are both on the board
#[inline]
pub fn on_board(file: i8, rank: i8) -> bool {
    (0..BOARD_SIZE).contains(&file) && (0..BOARD_SIZE).contains(&rank)
}

/// Check that a square index is valid
#[inline]
pub fn is_valid_square(sq: Square) -> bool {
    (0..NUM_SQUARES as i8).contains(&sq)
}

/// Step one unit in `(dfile, drank)`; `None` when the step leaves the board
#[inline]
pub fn step(sq: Square, delta: (i8, i8)) -> Option<Square> {
    let (file, rank) = file_rank(sq);
    let (nf, nr) = (file + delta.0, rank + delta.1);
    if on_board(nf, nr) {
        Some(square_at(nf, nr))
    } else {
        None
    }
}

/// True when two squares are orthogonally adjacent (never diagonal)
#[inline]
pub fn orthogonally_adjacent(a: Square, b: Square) -> bool {
    let (af, ar) = file_rank(a);
    let (bf, br) = file_rank(b);
    (af - bf).abs() + (ar - br).abs() == 1
}

/// Board state: pieces, coral terrain, coral reserves, whale pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Non-whale pieces only; whale halves are derived from `whales`
    squares: [Option<Piece>; NUM_SQUARES],
    coral: [Option<Color>; NUM_SQUARES],
    coral_remaining: [u8; 2],
    /// Ordered (low square, high square) pair per color
    whales: [Option<(Square, Square)>; 2],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    /// Board with no pieces, no coral, full coral reserves, no whales
    pub fn empty() -> Board {
        Board {
            squares: [None; NUM_SQUARES],
            coral: [None; NUM_SQUARES],
            coral_remaining: [STARTING_CORAL; 2],
            whales: [None; 2],
        }
    }

    /// Standard starting position. Back rank: turtle, dolphin, pufferfish,
    /// whale (two squares), pufferfish, dolphin, turtle; second rank: crab,
    /// octopus, crab, two empty squares in front of the whale, crab,
    /// octopus, crab. Roles follow [`starting_role`].
    pub fn starting() -> Board {
        let mut board = Board::empty();
        let back: [Option<PieceKind>; 8] = [
            Some(PieceKind::Turtle),
            Some(PieceKind::Dolphin),
            Some(PieceKind::Pufferfish),
            None, // whale d-file half
            None, // whale e-file half
            Some(PieceKind::Pufferfish),
            Some(PieceKind::Dolphin),
            Some(PieceKind::Turtle),
        ];
        let second: [Option<PieceKind>; 8] = [
            Some(PieceKind::Crab),
            Some(PieceKind::Octopus),
            Some(PieceKind::Crab),
            None,
            None,
            Some(PieceKind::Crab),
            Some(PieceKind::Octopus),
            Some(PieceKind::Crab),
        ];
        for color in [Color::White, Color::Black] {
            let home = color.home_rank();
            let pawn_rank = if color == Color::White { 1 } else { 6 };
            for file in 0..BOARD_SIZE {
                if let Some(kind) = back[file as usize] {
                    let sq = square_at(file, home);
                    board.put(Piece::new(kind, color, Some(starting_role(file))), sq);
                }
                if let Some(kind) = second[file as usize] {
                    let sq = square_at(file, pawn_rank);
                    board.put(Piece::new(kind, color, Some(starting_role(file))), sq);
                }
            }
            board.set_whale(color, Some((square_at(3, home), square_at(4, home))));
        }
        board
    }

    /// Piece at a square, deriving a whale view from pair membership
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if let Some(piece) = self.squares[sq as usize] {
            return Some(piece);
        }
        for color in [Color::White, Color::Black] {
            if let Some((a, b)) = self.whales[color.index()] {
                if sq == a || sq == b {
                    return Some(Piece::new(PieceKind::Whale, color, None));
                }
            }
        }
        None
    }

    /// Place a non-whale piece. Whale placement goes through [`set_whale`].
    pub fn put(&mut self, piece: Piece, sq: Square) {
        debug_assert!(!piece.is_whale(), "whales are stored as pairs");
        self.squares[sq as usize] = Some(piece);
    }

    /// Remove and return the non-whale piece at a square
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq as usize].take()
    }

    /// Set or clear a color's whale pair; the pair is stored low square
    /// first and must be orthogonally adjacent
    pub fn set_whale(&mut self, color: Color, pair: Option<(Square, Square)>) {
        if let Some((a, b)) = pair {
            debug_assert!(orthogonally_adjacent(a, b));
        }
        self.set_whale_raw(color, pair);
    }

    /// Set a whale pair without the adjacency check (lenient
    /// deserialization only)
    pub fn set_whale_raw(&mut self, color: Color, pair: Option<(Square, Square)>) {
        let ordered = pair.map(|(a, b)| if a <= b { (a, b) } else { (b, a) });
        self.whales[color.index()] = ordered;
    }

    /// A color's whale pair, low square first
    #[inline]
    pub fn whale(&self, color: Color) -> Option<(Square, Square)> {
        self.whales[color.index()]
    }

    /// True when `sq` is one of either color's whale squares
    pub fn is_whale_square(&self, sq: Square) -> bool {
        self.whales
            .iter()
            .flatten()
            .any(|&(a, b)| sq == a || sq == b)
    }

    /// Place coral from `color`'s reserve onto a square. Bulk-restore paths
    /// must NOT use this: it decrements the reserve counter. They set the
    /// terrain with [`set_coral_raw`] and the counters with
    /// [`set_coral_remaining`] independently.
    pub fn place_coral(&mut self, sq: Square, color: Color) {
        debug_assert!(self.coral[sq as usize].is_none());
        debug_assert!(self.coral_remaining[color.index()] > 0);
        self.coral[sq as usize] = Some(color);
        self.coral_remaining[color.index()] -= 1;
    }

    /// Remove coral from a square, returning it to its owner's reserve
    pub fn remove_coral(&mut self, sq: Square) -> Option<Color> {
        let owner = self.coral[sq as usize].take();
        if let Some(color) = owner {
            self.coral_remaining[color.index()] += 1;
        }
        owner
    }

    /// Set the coral marker on a square without touching the counters
    /// (deserialization / undo only)
    pub fn set_coral_raw(&mut self, sq: Square, owner: Option<Color>) {
        self.coral[sq as usize] = owner;
    }

    /// Overwrite a color's remaining-coral counter (deserialization only)
    pub fn set_coral_remaining(&mut self, color: Color, count: u8) {
        self.coral_remaining[color.index()] = count;
    }

    #[inline]
    pub fn coral_at(&self, sq: Square) -> Option<Color> {
        self.coral[sq as usize]
    }

    #[inline]
    pub fn coral_remaining(&self, color: Color) -> u8 {
        self.coral_remaining[color.index()]
    }

    /// All placed coral as (square, owner) pairs, square-ordered
    pub fn all_coral(&self) -> Vec<(Square, Color)> {
        self.coral
            .iter()
            .enumerate()
            .filter_map(|(sq, owner)| owner.map(|c| (sq as Square, c)))
            .collect()
    }

    /// Number of coral markers a color has placed on the board
    pub fn placed_coral_count(&self, color: Color) -> u8 {
        self.coral.iter().flatten().filter(|&&c| c == color).count() as u8
    }

    /// Coral area control: this color's placed coral squares not occupied
    /// by an opposing piece. A square under the owner's own piece (or own
    /// whale half) still counts; each whale half is checked independently.
    pub fn area_control(&self, color: Color) -> u32 {
        let mut count = 0;
        for sq in 0..NUM_SQUARES as Square {
            if self.coral[sq as usize] != Some(color) {
                continue;
            }
            let occupied_by_opponent = self
                .get(sq)
                .map(|p| p.color != color)
                .unwrap_or(false);
            if !occupied_by_opponent {
                count += 1;
            }
        }
        count
    }

    /// All non-whale pieces of a color as (square, piece) pairs
    pub fn pieces_of(&self, color: Color) -> Vec<(Square, Piece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(sq, p)| match p {
                Some(piece) if piece.color == color => Some((sq as Square, *piece)),
                _ => None,
            })
            .collect()
    }

    /// True when a color has no pieces left besides its whale
    pub fn has_only_whale(&self, color: Color) -> bool {
        self.whale(color).is_some()
            && !self
                .squares
                .iter()
                .flatten()
                .any(|p| p.color == color)
    }
}

/// Deterministic starting-role rule: pieces starting on an even file
/// (a, c, e, g) are hunters, odd files are gatherers. Applied whenever a
/// restored position is the starting position, so stale snapshots cannot
/// pin an outdated role assignment.
pub fn starting_role(file: i8) -> Role {
    if file % 2 == 0 {
        Role::Hunter
    } else {
        Role::Gatherer
    }
}
