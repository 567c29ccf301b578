//! Capture-only quiescence search at the horizon
//!
//! Same explicit-stack shape as the main search, restricted to capture
//! moves and bounded by [`MAX_QUIESCENCE_DEPTH`], so the static evaluation
//! is never taken in the middle of a capture exchange.

use super::iterative::Searcher;
use super::ordering::order_moves;
use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::evaluation::evaluate;
use crate::game::{Game, Undo};
use crate::move_gen::{attack, pseudo_legal_moves};
use crate::types::*;

struct QuiescenceFrame {
    alpha: i32,
    beta: i32,
    color: Color,
    qs_depth: i32,
    moves: Vec<Move>,
    move_index: usize,
    best_score: i32,
    initialized: bool,
    made_move: Option<(Move, Undo)>,
    returning_score: Option<i32>,
}

impl QuiescenceFrame {
    fn new(alpha: i32, beta: i32, color: Color, qs_depth: i32) -> QuiescenceFrame {
        QuiescenceFrame {
            alpha,
            beta,
            color,
            qs_depth,
            moves: Vec::new(),
            move_index: 0,
            best_score: alpha,
            initialized: false,
            made_move: None,
            returning_score: None,
        }
    }
}

fn unwind(stack: &mut Vec<QuiescenceFrame>, game: &mut Game) {
    while let Some(mut frame) = stack.pop() {
        if let Some((mv, undo)) = frame.made_move.take() {
            game.unmake_move(&mv, undo);
        }
    }
}

fn return_to_parent(stack: &mut Vec<QuiescenceFrame>, score: i32) -> Option<i32> {
    stack.pop();
    match stack.last_mut() {
        Some(parent) => {
            parent.returning_score = Some(score);
            None
        }
        None => Some(score),
    }
}

pub(super) fn quiescence_search(
    searcher: &mut Searcher,
    game: &mut Game,
    alpha: i32,
    beta: i32,
    color: Color,
) -> EngineResult<i32> {
    let mut stack: Vec<QuiescenceFrame> = vec![QuiescenceFrame::new(alpha, beta, color, 0)];

    while let Some(frame) = stack.last_mut() {
        // === PHASE 1: frame initialization ===
        if !frame.initialized {
            frame.initialized = true;
            searcher.nodes += 1;

            if searcher.nodes % TIME_CHECK_INTERVAL == 0 && searcher.out_of_time() {
                unwind(&mut stack, game);
                return Err(EngineError::SearchTimeout);
            }

            let stand_pat = evaluate(game, frame.color, &searcher.weights);

            if frame.qs_depth >= MAX_QUIESCENCE_DEPTH {
                if let Some(result) = return_to_parent(&mut stack, stand_pat) {
                    return Ok(result);
                }
                continue;
            }

            if stand_pat >= frame.beta {
                let beta = frame.beta;
                if let Some(result) = return_to_parent(&mut stack, beta) {
                    return Ok(result);
                }
                continue;
            }
            frame.best_score = stand_pat;
            if stand_pat > frame.alpha {
                frame.alpha = stand_pat;
            }

            frame.moves = pseudo_legal_moves(game.board(), frame.color);
            frame.moves.retain(|m| m.is_capture());
            if frame.moves.is_empty() {
                if let Some(result) = return_to_parent(&mut stack, stand_pat) {
                    return Ok(result);
                }
                continue;
            }
            order_moves(&mut frame.moves, None);
            continue;
        }

        // === PHASE 2: process child return ===
        if let Some(child_score) = frame.returning_score.take() {
            if let Some((mv, undo)) = frame.made_move.take() {
                game.unmake_move(&mv, undo);
            }
            let score = -child_score;

            if score >= frame.beta {
                let beta = frame.beta;
                if let Some(result) = return_to_parent(&mut stack, beta) {
                    return Ok(result);
                }
                continue;
            }
            if score > frame.alpha {
                frame.alpha = score;
            }
            if score > frame.best_score {
                frame.best_score = score;
            }
        }

        // === PHASE 3: try next capture ===
        if frame.move_index < frame.moves.len() {
            let mv = frame.moves[frame.move_index].clone();
            let child_alpha = -frame.beta;
            let child_beta = -frame.alpha;
            let child_color = frame.color.opponent();
            let child_depth = frame.qs_depth + 1;
            let check_color = frame.color;
            frame.move_index += 1;

            let undo = game.make_move(&mv);
            if attack::in_check(game.board(), check_color) {
                game.unmake_move(&mv, undo);
                continue;
            }
            frame.made_move = Some((mv, undo));

            stack.push(QuiescenceFrame::new(
                child_alpha,
                child_beta,
                child_color,
                child_depth,
            ));
            continue;
        }

        // === PHASE 4: all captures processed ===
        let best_score = frame.best_score;
        if let Some(result) = return_to_parent(&mut stack, best_score) {
            return Ok(result);
        }
    }

    Err(EngineError::SearchError {
        message: "quiescence_search: stack became empty unexpectedly".to_string(),
    })
}
