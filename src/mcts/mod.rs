//! Simulation players: flat Monte Carlo and UCT.
//!
//! ## Overview
//!
//! Both players estimate action values from playouts: random (or
//! policy-driven) continuations of the game until a terminal state or the
//! configured horizon, where the heuristic takes over.
//!
//! - [`MonteCarloPlayer`]: round-robin simulations over the root actions
//! - [`UCTPlayer`]: open-loop tree search with UCB1 selection over an
//!   arena of [`MCTSNode`]s
//!
//! Decisions stop when the [`Budget`] runs out: a simulation count, a
//! wall-clock cap, or both (whichever comes first). A fixed seed makes a
//! count-limited decision reproducible.
//!
//! ## Usage
//!
//! ```rust
//! use ludorum::core::{Game, Role};
//! use ludorum::games::TicTacToe;
//! use ludorum::mcts::{MCTSConfig, UCTPlayer};
//!
//! let game = TicTacToe::new();
//! let state = TicTacToe::board_from("XX_OO____");
//!
//! let mut player = UCTPlayer::<TicTacToe>::new(MCTSConfig::default().with_simulations(200));
//! assert_eq!(player.choose(&game, &state, Role::new(0)).unwrap(), 2);
//!
//! for (square, visits) in player.action_visits() {
//!     println!("{square}: {visits}");
//! }
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! let player = UCTPlayer::new(config)
//!     .with_rollout(HeuristicPlayer::new(7).with_heuristic(TicTacToe::line_heuristic))
//!     .with_heuristic(TicTacToe::line_heuristic);
//! ```

pub mod config;
pub mod monte_carlo;
pub mod node;
pub mod policy;
pub mod tree;
pub mod uct;

pub use config::{Budget, MCTSConfig, DEFAULT_SIMULATIONS};
pub use monte_carlo::MonteCarloPlayer;
pub use node::{Edge, MCTSNode, NodeId};
pub use policy::{
    heuristic_values, playout, sample_joint, RandomRollout, RolloutPolicy, SelectionPolicy, UCB1,
};
pub use tree::{MCTSTree, TreeStats};
pub use uct::UCTPlayer;
