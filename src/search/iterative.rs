//! Iterative deepening driver
//!
//! Deepens one ply at a time under a wall-clock budget. Only a fully
//! completed ply may update the chosen move: when a ply times out partway
//! the in-flight result is discarded and the previous ply's move stands,
//! so a long think can never return a half-searched recommendation.
//!
//! Difficulty profiles bound depth and time and can add uniform noise to
//! root scores, which makes the easier settings play plausibly imperfect
//! moves instead of merely shallow ones.

use instant::Instant;
use rand::Rng;
use tracing::{debug, warn};

use super::alphabeta::alphabeta;
use super::ordering::order_moves;
use crate::constants::*;
use crate::error::EngineError;
use crate::evaluation::EvalWeights;
use crate::game::Game;
use crate::hash::TranspositionTable;
use crate::types::*;

/// Search strength settings
#[derive(Debug, Clone)]
pub struct DifficultyProfile {
    pub max_depth: u8,
    pub max_time_ms: u64,
    /// Half-width of the uniform noise added to root scores; 0 disables it
    pub noise: i32,
}

impl DifficultyProfile {
    pub fn easy() -> DifficultyProfile {
        DifficultyProfile {
            max_depth: 2,
            max_time_ms: 500,
            noise: 120,
        }
    }

    pub fn medium() -> DifficultyProfile {
        DifficultyProfile {
            max_depth: 4,
            max_time_ms: 2_000,
            noise: 30,
        }
    }

    pub fn hard() -> DifficultyProfile {
        DifficultyProfile {
            max_depth: 8,
            max_time_ms: 5_000,
            noise: 0,
        }
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        DifficultyProfile::medium()
    }
}

/// Outcome of one search invocation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// `None` when the side to move has no legal move at all
    pub best: Option<Move>,
    pub score: i32,
    /// Deepest fully completed ply
    pub depth: u8,
    pub nodes: u64,
}

/// Reusable search context: transposition table, evaluation weights, and
/// per-invocation timing state
pub struct Searcher {
    pub(super) tt: TranspositionTable,
    pub(super) weights: EvalWeights,
    pub(super) nodes: u64,
    start: Instant,
    budget_ms: u64,
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new()
    }
}

impl Searcher {
    pub fn new() -> Searcher {
        Searcher::with_weights(EvalWeights::default())
    }

    pub fn with_weights(weights: EvalWeights) -> Searcher {
        Searcher {
            tt: TranspositionTable::default(),
            weights,
            nodes: 0,
            start: Instant::now(),
            budget_ms: 0,
        }
    }

    /// Drop all cached search state (new game, changed weights)
    pub fn clear(&mut self) {
        self.tt.clear();
    }

    pub(super) fn out_of_time(&self) -> bool {
        self.start.elapsed().as_millis() as u64 >= self.budget_ms
    }

    /// Pick the best move for the side to move under `profile`
    pub async fn find_best_move(
        &mut self,
        game: &mut Game,
        profile: &DifficultyProfile,
    ) -> SearchResult {
        let color = game.turn();
        self.nodes = 0;
        self.start = Instant::now();
        self.budget_ms = profile.max_time_ms.max(1);

        let mut root_moves = game.legal_moves(color);
        if root_moves.is_empty() {
            return SearchResult {
                best: None,
                score: 0,
                depth: 0,
                nodes: self.nodes,
            };
        }
        order_moves(&mut root_moves, None);

        let mut rng = rand::rng();
        let mut committed: Option<(Move, i32, u8)> = None;

        'deepening: for depth in 1..=profile.max_depth.min(MAX_SEARCH_DEPTH) {
            let mut alpha = -AB_INF;
            let mut ply_best: Option<(Move, i32)> = None;

            for mv in &root_moves {
                let undo = game.make_move(mv);
                let result = alphabeta(
                    self,
                    game,
                    depth as i32 - 1,
                    -AB_INF,
                    -alpha,
                    color.opponent(),
                )
                .await;
                game.unmake_move(mv, undo);

                let mut score = match result {
                    Ok(child_score) => -child_score,
                    Err(EngineError::SearchTimeout) => {
                        debug!(depth, "ply timed out, keeping previous result");
                        break 'deepening;
                    }
                    Err(err) => {
                        warn!(%err, depth, "search error, keeping previous result");
                        break 'deepening;
                    }
                };
                if profile.noise > 0 {
                    score += rng.random_range(-profile.noise..=profile.noise);
                }

                if ply_best.as_ref().map(|&(_, s)| score > s).unwrap_or(true) {
                    ply_best = Some((mv.clone(), score));
                }
                alpha = alpha.max(score);
            }

            // the ply finished inside the budget; commit it
            if let Some((mv, score)) = ply_best {
                debug!(depth, score, nodes = self.nodes, "completed ply");
                // searching the committed move first helps the next ply
                if let Some(pos) = root_moves.iter().position(|m| *m == mv) {
                    root_moves.swap(0, pos);
                }
                let mate = score.abs() > MATE_THRESHOLD;
                committed = Some((mv, score, depth));
                if mate {
                    break;
                }
            }
            if self.out_of_time() {
                break;
            }
        }

        match committed {
            Some((mv, score, depth)) => SearchResult {
                best: Some(mv),
                score,
                depth,
                nodes: self.nodes,
            },
            None => {
                // depth 1 never finished; fall back to the ordered first move
                SearchResult {
                    best: root_moves.first().cloned(),
                    score: 0,
                    depth: 0,
                    nodes: self.nodes,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::block_on;

    fn quick_profile(depth: u8) -> DifficultyProfile {
        DifficultyProfile {
            max_depth: depth,
            max_time_ms: 2_000,
            noise: 0,
        }
    }

    #[test]
    fn finds_a_legal_move_from_the_start() {
        let mut game = Game::new();
        let mut searcher = Searcher::new();
        let result = block_on(searcher.find_best_move(&mut game, &quick_profile(2)));
        let best = result.best.expect("starting position has moves");
        let turn = game.turn();
        assert!(game.legal_moves(turn).contains(&best));
        assert!(result.depth >= 1);
        assert!(result.nodes > 0);
    }

    #[test]
    fn prefers_capturing_a_hanging_piece() {
        let mut board = crate::board::Board::empty();
        use crate::board::square_at;
        board.set_whale(Color::White, Some((square_at(3, 0), square_at(4, 0))));
        board.set_whale(Color::Black, Some((square_at(3, 7), square_at(4, 7))));
        // white turtle on a1, undefended black dolphin on a5; the spare
        // black crab keeps the capture from emptying black's army
        board.put(
            Piece::new(PieceKind::Turtle, Color::White, Some(Role::Hunter)),
            square_at(0, 0),
        );
        board.put(
            Piece::new(PieceKind::Dolphin, Color::Black, Some(Role::Hunter)),
            square_at(0, 4),
        );
        board.put(
            Piece::new(PieceKind::Crab, Color::Black, Some(Role::Hunter)),
            square_at(7, 5),
        );
        let mut game = Game::from_position(board, Color::White);
        let mut searcher = Searcher::new();
        let result = block_on(searcher.find_best_move(&mut game, &quick_profile(3)));
        let best = result.best.expect("white has moves");
        assert_eq!(best.from, square_at(0, 0));
        assert_eq!(best.to, square_at(0, 4));
        assert!(best.is_capture());
    }

    #[test]
    fn terminal_position_still_reports_a_move() {
        let mut game = Game::new();
        game.board_mut().set_coral_remaining(Color::White, 0);
        // coral scoring has fired but the side to move still has legal
        // moves; callers gate on status, the driver just answers
        let mut searcher = Searcher::new();
        let result = block_on(searcher.find_best_move(&mut game, &quick_profile(2)));
        assert!(result.best.is_some());
    }

    #[test]
    fn respects_a_tiny_time_budget() {
        let mut game = Game::new();
        let mut searcher = Searcher::new();
        let profile = DifficultyProfile {
            max_depth: MAX_SEARCH_DEPTH,
            max_time_ms: 50,
            noise: 0,
        };
        let start = Instant::now();
        let result = block_on(searcher.find_best_move(&mut game, &profile));
        assert!(result.best.is_some());
        // generous bound: budget plus one polling interval's worth of slack
        assert!(start.elapsed().as_millis() < 2_000);
    }
}
