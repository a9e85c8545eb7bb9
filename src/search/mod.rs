//! Exhaustive search players.
//!
//! ## Players
//!
//! - [`MiniMaxPlayer`]: two-role zero-sum search; chance transitions are
//!   valued by their expectation (expectiminimax)
//! - [`AlphaBetaPlayer`]: MiniMax with `[alpha, beta]` pruning
//! - [`MaxNPlayer`]: n-role search backing up one value per role
//!
//! ## Horizon
//!
//! Every search stops at terminal states (valued by the game result) and at
//! `depth >= horizon` (valued by the player's [`Heuristic`]). Root actions
//! lead to depth 1. A chance node is one step of the recursion: it sits one
//! level below the action that triggered it and its outcomes one level
//! below that. A chance node at the horizon values its outcomes directly.
//!
//! ## Tie-breaking
//!
//! Search returns a value per root action. The player then picks uniformly
//! among the maxima with its own RNG, so equal actions are not biased by
//! enumeration order.
//!
//! [`Heuristic`]: crate::players::Heuristic

pub mod alphabeta;
pub mod config;
pub mod maxn;
pub mod minimax;

pub use alphabeta::AlphaBetaPlayer;
pub use config::SearchConfig;
pub use maxn::MaxNPlayer;
pub use minimax::{Expectiminimax, MiniMaxPlayer};

use crate::core::Role;
use crate::players::PlayerError;

/// Node hook: receives each visited state and its computed value; returning
/// `Some(v)` replaces the value.
pub type SearchHook<S> = Box<dyn Fn(&S, f64) -> Option<f64> + Send + Sync>;

/// The single active role of a turn-based state, with its actions.
pub(crate) fn sole_mover<A>(mut moves: Vec<(Role, Vec<A>)>) -> Result<(Role, Vec<A>), PlayerError> {
    if moves.len() == 1 {
        Ok(moves.remove(0))
    } else {
        Err(PlayerError::Failed(format!(
            "turn-based search found {} active roles",
            moves.len()
        )))
    }
}
