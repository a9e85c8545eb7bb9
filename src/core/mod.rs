//! Core types: roles, the game contract, chance and RNG.
//!
//! This module contains the fundamental building blocks that every player
//! and the match engine share. Concrete games plug in by implementing
//! [`Game`]; nothing here knows about any particular game.

pub mod contingent;
pub mod distribution;
pub mod error;
pub mod game;
pub mod rng;
pub mod role;

pub use contingent::{ContingentState, Transition};
pub use distribution::{Aleatory, Distribution, Haps, PROBABILITY_TOLERANCE};
pub use error::GameError;
pub use game::{ActiveRoles, Game, JointAction, Status};
pub use rng::{GameRng, GameRngState};
pub use role::{Role, RoleMap};
