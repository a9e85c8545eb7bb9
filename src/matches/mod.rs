//! Match execution engine.
//!
//! ## Overview
//!
//! A [`Match`] drives one game instance from its initial state to a
//! terminal state (or until a player quits). Each ply:
//!
//! 1. Every active role is asked for a decision on its own view of the
//!    state. The requests run concurrently and are joined.
//! 2. A quit aborts the match at once, without a result.
//! 3. The joint action is validated and applied; chance is sampled (chained
//!    chance included) until the next state is resolved.
//! 4. The ply is appended to the history and observers are notified.
//!
//! ## Usage
//!
//! ```rust
//! use futures::executor::block_on;
//! use ludorum::games::TicTacToe;
//! use ludorum::matches::{EventLog, Match};
//! use ludorum::players::{Player, RandomPlayer};
//!
//! let log = EventLog::new();
//! let players: Vec<Box<dyn Player<TicTacToe>>> =
//!     vec![Box::new(RandomPlayer::new(1)), Box::new(RandomPlayer::new(2))];
//!
//! let mut m = Match::new(TicTacToe::new(), players).unwrap().with_observer(log.clone());
//! let status = block_on(m.run(None)).unwrap();
//!
//! assert!(status.result().is_some());
//! assert_eq!(m.ply(), m.history().len() - 1);
//! assert_eq!(log.kinds().first(), Some(&"begin"));
//! ```

pub mod engine;
pub mod event;
pub mod history;

use thiserror::Error;

use crate::core::{GameError, Role};
use crate::players::PlayerError;

pub use engine::Match;
pub use event::{EventLog, GameEvent, MatchEvent, MatchObserver};
pub use history::{HistoryEntry, MatchStatus};

/// Errors that end a match run.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("{player} cannot play as {role}")]
    IncompatiblePlayer { role: Role, player: String },

    #[error("decision for {role} failed")]
    Decision {
        role: Role,
        #[source]
        source: PlayerError,
    },

    #[error("expected {expected} players, found {found}")]
    PlayerCount { expected: usize, found: usize },
}
