//! Alpha-beta search with iterative deepening
//!
//! The core search is a negamax alpha-beta converted to an explicit stack
//! of frames, so search depth never grows the call stack. On top of it:
//!
//! - `quiescence` - capture-only extension at the horizon
//! - `ordering` - MVV-LVA plus positional move ordering
//! - `iterative` - iterative deepening driver, time budget, difficulty
//!   profiles
//!
//! The search is async and cooperatively yields on a short time slice so a
//! host event loop stays responsive while the engine thinks. The wall-clock
//! deadline is polled on a node-count interval; when it fires, the search
//! unwinds its made moves and surfaces `SearchTimeout`, and the driver
//! falls back to the deepest fully-completed ply.

mod alphabeta;
mod iterative;
mod ordering;
mod quiescence;

pub use iterative::{DifficultyProfile, SearchResult, Searcher};
