//! Game contract violations.
//!
//! Every variant is a bug in a game implementation (or in a caller feeding
//! it malformed input). They are reported as errors so they surface at the
//! first call that observes them, and nothing in the crate recovers from
//! one.

use thiserror::Error;

use super::role::Role;

/// Violation of the game contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("state defines both legal actions and a result")]
    BothActionsAndResult,

    #[error("state defines neither legal actions nor a result")]
    NeitherActionsNorResult,

    #[error("active {role} has no legal actions")]
    NoActions { role: Role },

    #[error("distribution has no outcomes")]
    EmptyDistribution,

    #[error("distribution has a negative probability")]
    NegativeProbability,

    #[error("distribution probabilities sum to {sum}, expected 1")]
    InvalidDistribution { sum: f64 },

    #[error("illegal action for {role}")]
    IllegalAction { role: Role },

    #[error("missing action for active {role}")]
    MissingAction { role: Role },

    #[error("action supplied for inactive {role}")]
    UnexpectedAction { role: Role },

    #[error("missing value for hap `{name}`")]
    MissingHap { name: String },

    #[error("expected {expected} roles, found {found}")]
    RoleCount { expected: usize, found: usize },
}
