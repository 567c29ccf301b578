//! Core data types for the Coral Clash engine
//!
//! The board is a 64-entry square-indexed array (file 0-7, rank 0-7; rank 0
//! is White's home rank). The whale is a first-class two-square piece: its
//! pair of squares lives on the [`crate::board::Board`] directly and square
//! lookups derive a whale piece view from pair membership, so whale identity
//! is never duplicated across two board cells.

use serde::{Deserialize, Serialize};

/// Linear square index, `rank * 8 + file`, valid range `0..64`
pub type Square = i8;

/// Side to move / piece ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Array index for per-color tables
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// The rank this color's pieces start on (whale rank)
    #[inline]
    pub fn home_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

/// Piece species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Crab,
    Turtle,
    Dolphin,
    Octopus,
    Pufferfish,
    Whale,
}

impl PieceKind {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PieceKind::Crab => 0,
            PieceKind::Turtle => 1,
            PieceKind::Dolphin => 2,
            PieceKind::Octopus => 3,
            PieceKind::Pufferfish => 4,
            PieceKind::Whale => 5,
        }
    }

    /// One-letter code used by FEN and move text
    pub fn letter(self) -> char {
        match self {
            PieceKind::Crab => 'c',
            PieceKind::Turtle => 't',
            PieceKind::Dolphin => 'd',
            PieceKind::Octopus => 'o',
            PieceKind::Pufferfish => 'p',
            PieceKind::Whale => 'w',
        }
    }

    pub fn from_letter(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'c' => Some(PieceKind::Crab),
            't' => Some(PieceKind::Turtle),
            'd' => Some(PieceKind::Dolphin),
            'o' => Some(PieceKind::Octopus),
            'p' => Some(PieceKind::Pufferfish),
            'w' => Some(PieceKind::Whale),
            _ => None,
        }
    }
}

/// Coral-interaction role, fixed per piece instance at game start.
/// Hunters stop on coral; gatherers pass through it and may place new coral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Hunter,
    Gatherer,
}

impl Role {
    pub fn letter(self) -> char {
        match self {
            Role::Hunter => 'h',
            Role::Gatherer => 'g',
        }
    }

    pub fn from_letter(ch: char) -> Option<Role> {
        match ch {
            'h' => Some(Role::Hunter),
            'g' => Some(Role::Gatherer),
            _ => None,
        }
    }
}

/// A piece on the board. `role` is `Some` for every non-whale piece and
/// `None` for whales; that invariant is preserved through moves, captures,
/// undo, and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub role: Option<Role>,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, role: Option<Role>) -> Piece {
        debug_assert_eq!(kind == PieceKind::Whale, role.is_none());
        Piece { kind, color, role }
    }

    #[inline]
    pub fn is_whale(&self) -> bool {
        self.kind == PieceKind::Whale
    }

    #[inline]
    pub fn is_gatherer(&self) -> bool {
        self.role == Some(Role::Gatherer)
    }

    #[inline]
    pub fn is_hunter(&self) -> bool {
        self.role == Some(Role::Hunter)
    }
}

/// A fully-specified move as produced by the move generator.
///
/// For whale moves `whale_second` is always present: it is the square the
/// *other* half occupies after the move, which is what distinguishes
/// physically-identical `(from, to)` pairs produced by different whale move
/// classes. `coral_removed` is kept sorted so candidate matching can compare
/// lists directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub captured: Option<(PieceKind, Option<Role>)>,
    pub whale_second: Option<Square>,
    pub coral_placed: bool,
    pub coral_removed: Vec<Square>,
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Plain piece move with no coral interaction
    pub fn simple(from: Square, to: Square, piece: PieceKind) -> Move {
        Move {
            from,
            to,
            piece,
            captured: None,
            whale_second: None,
            coral_placed: false,
            coral_removed: Vec::new(),
            promotion: None,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn is_whale_move(&self) -> bool {
        self.piece == PieceKind::Whale
    }
}

/// A caller-submitted move specification.
///
/// `from` and `to` are required; every optional field that *is* supplied
/// must match the candidate move exactly, and all supplied fields are
/// matched jointly - a candidate matching only a subset is rejected. A
/// request matching zero legal moves is invalid; one matching several is
/// ambiguous and needs more disambiguators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub whale_second: Option<Square>,
    pub coral_placed: Option<bool>,
    pub coral_removed: Option<Vec<Square>>,
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> MoveRequest {
        MoveRequest {
            from,
            to,
            ..MoveRequest::default()
        }
    }

    /// True if every supplied disambiguator matches `mv` (joint matching -
    /// never a subset)
    pub fn matches(&self, mv: &Move) -> bool {
        if self.from != mv.from || self.to != mv.to {
            return false;
        }
        if let Some(second) = self.whale_second {
            if mv.whale_second != Some(second) {
                return false;
            }
        }
        if let Some(placed) = self.coral_placed {
            if mv.coral_placed != placed {
                return false;
            }
        }
        if let Some(ref removed) = self.coral_removed {
            let mut want = removed.clone();
            want.sort_unstable();
            if want != mv.coral_removed {
                return false;
            }
        }
        if let Some(promo) = self.promotion {
            if mv.promotion != Some(promo) {
                return false;
            }
        }
        true
    }
}

/// Reason a game is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    Threefold,
    InsufficientMaterial,
}

/// Terminal and non-terminal game states. All variants other than
/// `InProgress` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
    /// Coral scoring fired; `winner` is `None` on an exact area-control tie
    CoralVictory { winner: Option<Color> },
    Resigned { winner: Color },
}

impl GameStatus {
    #[inline]
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}
