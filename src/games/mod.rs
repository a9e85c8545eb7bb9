//! Small reference games used by tests, benches and documentation.
//!
//! - [`TicTacToe`]: alternating, deterministic
//! - [`Pig`]: alternating, stochastic (a die roll per `Roll`)
//! - [`OddsEvens`]: simultaneous

pub mod odds_evens;
pub mod pig;
pub mod tictactoe;

pub use odds_evens::{OddsEvens, OddsEvensState};
pub use pig::{Pig, PigAction, PigState};
pub use tictactoe::{Board, TicTacToe};
