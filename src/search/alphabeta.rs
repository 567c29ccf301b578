//! Explicit-stack negamax alpha-beta
//!
//! One [`SearchFrame`] per simulated recursive call; the `while let` loop
//! over the frame stack replaces recursion entirely, so search depth never
//! threatens the call stack. The function is async and yields after ~5 ms
//! of uninterrupted work so a host event loop keeps running.
//!
//! Timeout handling: the wall clock is polled every
//! [`TIME_CHECK_INTERVAL`] visited nodes. On expiry every made-but-not-yet
//! unmade move in the stack is unmade (deepest first) and the search
//! returns [`EngineError::SearchTimeout`], leaving the game untouched.

use futures_lite::future::yield_now;
use instant::Instant;

use super::iterative::Searcher;
use super::ordering::order_moves;
use super::quiescence::quiescence_search;
use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::game::{Game, Undo};
use crate::move_gen::{attack, pseudo_legal_moves};
use crate::types::*;

/// Bounded check extension: at most this many extra plies per line
const MAX_EXTENSIONS: i32 = 4;

/// Stack frame for one simulated recursive call
struct SearchFrame {
    depth: i32,
    from_root: i32,
    alpha: i32,
    alpha_orig: i32,
    beta: i32,
    color: Color,
    move_index: usize,
    moves: Vec<Move>,
    legal_tried: u32,
    best_score: i32,
    best_move: Option<Move>,
    in_check: bool,
    extensions_used: i32,
    made_move: Option<(Move, Undo)>,
    returning_score: Option<i32>,
}

impl SearchFrame {
    fn new(
        depth: i32,
        from_root: i32,
        alpha: i32,
        beta: i32,
        color: Color,
        extensions_used: i32,
    ) -> SearchFrame {
        SearchFrame {
            depth,
            from_root,
            alpha,
            alpha_orig: alpha,
            beta,
            color,
            move_index: 0,
            moves: Vec::new(),
            legal_tried: 0,
            best_score: -AB_INF,
            best_move: None,
            in_check: false,
            extensions_used,
            made_move: None,
            returning_score: None,
        }
    }
}

/// Unmake every move still held by a frame on the stack, deepest first
fn unwind(stack: &mut Vec<SearchFrame>, game: &mut Game) {
    while let Some(mut frame) = stack.pop() {
        if let Some((mv, undo)) = frame.made_move.take() {
            game.unmake_move(&mv, undo);
        }
    }
}

/// Pop the top frame and hand `score` (from the popped frame's own
/// perspective) to its parent; `Some(score)` is the root result.
fn return_to_parent(stack: &mut Vec<SearchFrame>, score: i32) -> Option<i32> {
    stack.pop();
    match stack.last_mut() {
        Some(parent) => {
            parent.returning_score = Some(score);
            None
        }
        None => Some(score),
    }
}

/// Negamax alpha-beta from `color`'s perspective
pub(super) async fn alphabeta(
    searcher: &mut Searcher,
    game: &mut Game,
    depth: i32,
    alpha: i32,
    beta: i32,
    color: Color,
) -> EngineResult<i32> {
    let mut stack: Vec<SearchFrame> = vec![SearchFrame::new(depth, 0, alpha, beta, color, 0)];

    // yield to the host loop after at most ~5ms of uninterrupted work
    let mut chunk_start = Instant::now();

    while let Some(frame) = stack.last_mut() {
        // === PHASE 1: frame initialization (first visit) ===
        if frame.moves.is_empty() && frame.move_index == 0 && frame.returning_score.is_none() {
            searcher.nodes += 1;

            if searcher.nodes % TIME_CHECK_INTERVAL == 0 {
                if searcher.out_of_time() {
                    unwind(&mut stack, game);
                    return Err(EngineError::SearchTimeout);
                }
                if chunk_start.elapsed().as_millis() > 5 {
                    yield_now().await;
                    chunk_start = Instant::now();
                }
            }

            // terminal: coral scoring fired somewhere below the root
            if game.coral_scoring_triggered() {
                let white = game.board().area_control(Color::White);
                let black = game.board().area_control(Color::Black);
                let (own, opp) = match frame.color {
                    Color::White => (white, black),
                    Color::Black => (black, white),
                };
                let score = match own.cmp(&opp) {
                    std::cmp::Ordering::Greater => CORAL_WIN_SCORE - frame.from_root,
                    std::cmp::Ordering::Less => -(CORAL_WIN_SCORE - frame.from_root),
                    std::cmp::Ordering::Equal => 0,
                };
                if let Some(result) = return_to_parent(&mut stack, score) {
                    return Ok(result);
                }
                continue;
            }

            // terminal: repetition draw
            if frame.from_root > 0 && game.repetition_count() >= 3 {
                if let Some(result) = return_to_parent(&mut stack, 0) {
                    return Ok(result);
                }
                continue;
            }

            // horizon: capture-only quiescence
            if frame.depth <= 0 {
                let (alpha, beta, color) = (frame.alpha, frame.beta, frame.color);
                let score = match quiescence_search(searcher, game, alpha, beta, color) {
                    Ok(score) => score,
                    Err(err) => {
                        unwind(&mut stack, game);
                        return Err(err);
                    }
                };
                if let Some(result) = return_to_parent(&mut stack, score) {
                    return Ok(result);
                }
                continue;
            }

            // transposition table probe
            let (cached, tt_best) =
                searcher
                    .tt
                    .probe(game.key(), frame.depth, frame.alpha, frame.beta);
            if let Some(score) = cached {
                if let Some(result) = return_to_parent(&mut stack, score) {
                    return Ok(result);
                }
                continue;
            }

            // bounded check extension
            frame.in_check = attack::in_check(game.board(), frame.color);
            if frame.in_check && frame.extensions_used < MAX_EXTENSIONS {
                frame.depth += 1;
                frame.extensions_used += 1;
            }

            frame.moves = pseudo_legal_moves(game.board(), frame.color);
            if frame.moves.is_empty() {
                // no pieces that can move at all
                let score = if frame.in_check {
                    -(MATE_SCORE - frame.from_root)
                } else {
                    0
                };
                if let Some(result) = return_to_parent(&mut stack, score) {
                    return Ok(result);
                }
                continue;
            }
            order_moves(&mut frame.moves, tt_best);
            continue;
        }

        // === PHASE 2: process returning score from child ===
        if let Some(child_score) = frame.returning_score.take() {
            if let Some((mv, undo)) = frame.made_move.take() {
                game.unmake_move(&mv, undo);
            }

            let score = -child_score;
            if score > frame.best_score {
                frame.best_score = score;
                if frame.move_index > 0 {
                    frame.best_move = Some(frame.moves[frame.move_index - 1].clone());
                }
            }
            frame.alpha = frame.alpha.max(score);

            // beta cutoff
            if frame.alpha >= frame.beta {
                let best = frame
                    .best_move
                    .as_ref()
                    .map(|m| (m.from, m.to, m.whale_second));
                searcher.tt.store(
                    game.key(),
                    frame.depth,
                    frame.best_score,
                    crate::hash::Bound::Lower,
                    best,
                );
                let score = frame.best_score;
                if let Some(result) = return_to_parent(&mut stack, score) {
                    return Ok(result);
                }
                continue;
            }
        }

        // === PHASE 3: try next move ===
        if frame.move_index < frame.moves.len() {
            let mv = frame.moves[frame.move_index].clone();
            let child_depth = frame.depth - 1;
            let child_alpha = -frame.beta;
            let child_beta = -frame.alpha;
            let child_color = frame.color.opponent();
            let child_from_root = frame.from_root + 1;
            let extensions = frame.extensions_used;
            let check_color = frame.color;
            frame.move_index += 1;

            let undo = game.make_move(&mv);
            if attack::in_check(game.board(), check_color) {
                game.unmake_move(&mv, undo);
                continue;
            }
            frame.legal_tried += 1;
            frame.made_move = Some((mv, undo));

            stack.push(SearchFrame::new(
                child_depth,
                child_from_root,
                child_alpha,
                child_beta,
                child_color,
                extensions,
            ));
            continue;
        }

        // === PHASE 4: all moves processed ===
        let score = if frame.legal_tried == 0 {
            // every pseudo-legal move left the whale in check
            if frame.in_check {
                -(MATE_SCORE - frame.from_root)
            } else {
                0
            }
        } else {
            frame.best_score
        };
        let bound = if score <= frame.alpha_orig {
            crate::hash::Bound::Upper
        } else if score >= frame.beta {
            crate::hash::Bound::Lower
        } else {
            crate::hash::Bound::Exact
        };
        let best = frame
            .best_move
            .as_ref()
            .map(|m| (m.from, m.to, m.whale_second));
        searcher.tt.store(game.key(), frame.depth, score, bound, best);

        if let Some(result) = return_to_parent(&mut stack, score) {
            return Ok(result);
        }
    }

    Err(EngineError::SearchError {
        message: format!("alphabeta: stack became empty unexpectedly at depth {depth}"),
    })
}
