//! Match history and lifecycle status.

use serde::{Deserialize, Serialize};

use crate::core::{Haps, JointAction, Role, RoleMap};

/// One recorded ply of a match.
///
/// The first entry holds the initial state and no actions. Every later
/// entry holds the state reached, the joint action that produced it, and
/// the chance values sampled on the way (empty for deterministic plies).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry<S, A> {
    /// State after this ply.
    pub state: S,

    /// Joint action played (`None` for the initial entry).
    pub actions: Option<JointAction<A>>,

    /// Chance values resolved during this ply.
    pub haps: Haps,
}

impl<S, A> HistoryEntry<S, A> {
    /// The initial entry of a match.
    pub fn initial(state: S) -> Self {
        Self {
            state,
            actions: None,
            haps: Haps::new(),
        }
    }

    /// Entry for a played ply.
    pub fn new(state: S, actions: JointAction<A>, haps: Haps) -> Self {
        Self {
            state,
            actions: Some(actions),
            haps,
        }
    }
}

/// Where a match stands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Still being played; `ply` plies have been recorded.
    Active { ply: usize },

    /// Reached a terminal state.
    Finished { result: RoleMap<f64> },

    /// A role quit at `ply`. There is no result.
    Aborted { role: Role, ply: usize },

    /// `run` returned an error at `ply`: the failing role's decision, or
    /// a contract violation (`role` is `None`). There is no result and no
    /// further ply is played.
    Failed { role: Option<Role>, ply: usize },
}

impl MatchStatus {
    /// Check if the match can continue.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, MatchStatus::Active { .. })
    }

    /// The final result, if the match finished normally.
    #[must_use]
    pub fn result(&self) -> Option<&RoleMap<f64>> {
        match self {
            MatchStatus::Finished { result } => Some(result),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Active { ply } => write!(f, "active at ply {}", ply),
            MatchStatus::Finished { result } => {
                let values: Vec<String> = result.values().map(|v| v.to_string()).collect();
                write!(f, "finished [{}]", values.join(", "))
            }
            MatchStatus::Aborted { role, ply } => write!(f, "aborted by {} at ply {}", role, ply),
            MatchStatus::Failed { role: Some(role), ply } => write!(f, "failed by {} at ply {}", role, ply),
            MatchStatus::Failed { role: None, ply } => write!(f, "failed at ply {}", ply),
        }
    }
}
