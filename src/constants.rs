//! Engine constants - piece values, direction tables, search parameters
//!
//! Direction deltas are `(dfile, drank)` pairs rather than raw index offsets
//! so ray stepping can never wrap around a board edge.

/// Board width/height
pub const BOARD_SIZE: i8 = 8;
/// Number of squares
pub const NUM_SQUARES: usize = 64;

/// Coral each side starts with in its reserve
pub const STARTING_CORAL: u8 = 17;

/// Orthogonal unit directions: E, W, N, S
pub const ORTHO_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Diagonal unit directions: NE, NW, SE, SW
pub const DIAG_DIRS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// All eight unit directions (whale slides, pufferfish rays)
pub const ALL_DIRS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Octopus jump offsets
pub const OCTOPUS_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Piece values in centicrabs, indexed by `PieceKind::index()`:
/// crab, turtle, dolphin, octopus, pufferfish, whale.
/// The whale's slot is only used for move-ordering; it is never counted
/// as material since it cannot be captured.
pub const PIECE_VALUE: [i32; 6] = [100, 500, 325, 300, 900, 20_000];

/// Alpha-beta infinity bound
pub const AB_INF: i32 = 1_000_000;

/// Score for delivering checkmate; distance-to-mate is subtracted so the
/// search prefers faster mates
pub const MATE_SCORE: i32 = 900_000;

/// Score threshold above which a score is treated as a forced mate
pub const MATE_THRESHOLD: i32 = 800_000;

/// Score for winning the coral-area scoring that ends the game
pub const CORAL_WIN_SCORE: i32 = 700_000;

/// Absolute ceiling on iterative-deepening depth
pub const MAX_SEARCH_DEPTH: u8 = 32;

/// Capture-only quiescence depth bound
pub const MAX_QUIESCENCE_DEPTH: i32 = 4;

/// How often (in visited nodes) the search polls its wall-clock deadline
pub const TIME_CHECK_INTERVAL: u64 = 256;

/// Transposition table size in entries (power of two not required)
pub const TT_ENTRIES: usize = 1 << 20;
