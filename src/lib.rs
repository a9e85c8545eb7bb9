//! # ludorum
//!
//! A game-agnostic engine for search and simulation based game-playing
//! agents.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: Players and the match engine only see the
//!    [`Game`](core::Game) contract: active roles, legal actions, results
//!    and chance variables. No player knows the rules of any game.
//!
//! 2. **N-Role First**: Results are per-role vectors ([`RoleMap`]). Nothing
//!    assumes two roles or zero-sum outcomes unless a player says so in
//!    `can_play`.
//!
//! 3. **Immutable States**: Transitions build new states. Chance is explicit:
//!    a transition that needs dice returns a contingent state that is
//!    sampled (matches, playouts) or enumerated (exhaustive search).
//!
//! ## Modules
//!
//! - `core`: roles, RNG, distributions, the game contract
//! - `players`: the async `Player` contract plus random, scripted and greedy players
//! - `search`: MiniMax (expectiminimax over chance), AlphaBeta, MaxN
//! - `mcts`: flat Monte Carlo and UCT
//! - `matches`: the match loop, its history and observers
//! - `games`: small reference games

pub mod core;
pub mod games;
pub mod matches;
pub mod mcts;
pub mod players;
pub mod search;

// Re-export commonly used types
pub use crate::core::{
    Aleatory, ContingentState, Distribution, Game, GameError, GameRng, GameRngState, Haps,
    JointAction, Role, RoleMap, Status, Transition,
};

pub use crate::players::{
    Decision, Heuristic, HeuristicPlayer, Player, PlayerError, RandomPlayer, SearchStats,
    TracePlayer,
};

pub use crate::search::{AlphaBetaPlayer, Expectiminimax, MaxNPlayer, MiniMaxPlayer, SearchConfig};

pub use crate::mcts::{MCTSConfig, MonteCarloPlayer, UCTPlayer};

pub use crate::matches::{Match, MatchError, MatchEvent, MatchStatus};
