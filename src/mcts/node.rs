//! Nodes and edges of the UCT search tree.
//!
//! The tree is open-loop: a node stands for the sequence of chosen actions
//! that reaches it, not for one concrete state. Chance and the actions of
//! co-acting roles are sampled afresh on every visit, so the state at a node
//! (and even the role choosing there) may differ between visits.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Role, RoleMap};

/// Index of a node in the [`MCTSTree`](super::MCTSTree) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One action tried at a node, with the rewards it has collected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge<A> {
    pub action: A,
    /// Node reached through this action, once expanded.
    pub child: Option<NodeId>,
    pub visits: u32,
    /// Sum of the reward vectors backed up through this edge.
    pub total_reward: RoleMap<f64>,
}

impl<A> Edge<A> {
    pub fn new(action: A, role_count: usize) -> Self {
        Self {
            action,
            child: None,
            visits: 0,
            total_reward: RoleMap::with_value(role_count, 0.0),
        }
    }

    /// Sample mean of `role`'s reward; 0 before the first visit.
    #[must_use]
    pub fn mean_reward(&self, role: Role) -> f64 {
        match self.visits {
            0 => 0.0,
            n => self.total_reward[role] / f64::from(n),
        }
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.child.is_some()
    }
}

/// A node of the search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode<A> {
    /// `None` at the root.
    pub parent: Option<NodeId>,
    pub depth: u32,
    pub visits: u32,
    /// Edges are added lazily, the first time an action is legal here.
    pub edges: SmallVec<[Edge<A>; 8]>,
}

impl<A> MCTSNode<A> {
    pub fn new(parent: Option<NodeId>, depth: u32) -> Self {
        Self {
            parent,
            depth,
            visits: 0,
            edges: SmallVec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(None, 0)
    }

    /// Position of `action`'s edge, if it has been seen.
    pub fn edge_index(&self, action: &A) -> Option<usize>
    where
        A: PartialEq,
    {
        self.edges.iter().position(|e| &e.action == action)
    }
}
