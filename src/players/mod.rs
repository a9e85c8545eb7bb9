//! Player contract and the simple players built on it.
//!
//! ## Overview
//!
//! A [`Player`] answers one question: given a (possibly redacted) state and
//! the role it is seated in, which action does it take? Decisions are
//! asynchronous so the match engine can request every active role's
//! decision at once and join them before advancing.
//!
//! Search and simulation players live in [`crate::search`] and
//! [`crate::mcts`]; this module holds the contract plus the scaffolding they
//! share (action enumeration, state evaluation, caller-side tie-breaking).
//!
//! ## Usage
//!
//! ```rust
//! use futures::executor::block_on;
//! use ludorum::core::Game;
//! use ludorum::games::TicTacToe;
//! use ludorum::players::{Decision, Player, RandomPlayer};
//!
//! let game = TicTacToe::new();
//! let state = game.initial_state();
//! let xs = game.role_by_name("Xs").unwrap();
//!
//! let mut player = RandomPlayer::new(42);
//! let decision = block_on(player.decision(&game, &state, xs)).unwrap();
//! assert!(matches!(decision, Decision::Act(square) if square < 9));
//! ```

pub mod heuristic;
pub mod random;
pub mod stats;
pub mod trace;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Game, GameError, Role};

pub use heuristic::{
    best_actions, moves_for, select_best, state_value, successors, Heuristic, HeuristicPlayer,
    RandomHeuristic,
};
pub use random::RandomPlayer;
pub use stats::SearchStats;
pub use trace::TracePlayer;

/// What a player answers when asked to act.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision<A> {
    /// Take this action.
    Act(A),
    /// Abandon the match.
    Quit,
}

/// Errors raised while deciding.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("{player} cannot play {game}")]
    IncompatibleGame { player: String, game: String },

    #[error("{role} is not active in this state")]
    NotActive { role: Role },

    #[error("script for {role} is exhausted")]
    ScriptExhausted { role: Role },

    #[error("{0}")]
    Failed(String),
}

/// Player contract.
///
/// Players are stateless across decisions except for their configuration
/// (heuristic, horizon, RNG, ...).
#[async_trait]
pub trait Player<G: Game>: Send {
    /// Player name (for logging and display).
    fn name(&self) -> &str;

    /// Whether this player can play the given game at all.
    fn can_play(&self, _game: &G) -> bool {
        true
    }

    /// Called once when the player is seated in a match, before any ply.
    fn participate(&mut self, game: &G, _role: Role) -> Result<(), PlayerError> {
        if self.can_play(game) {
            Ok(())
        } else {
            Err(PlayerError::IncompatibleGame {
                player: self.name().to_string(),
                game: game.name().to_string(),
            })
        }
    }

    /// Choose an action for `role` in `state`.
    async fn decision(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
    ) -> Result<Decision<G::Action>, PlayerError>;
}
