//! Arena storage for the UCT search tree.

use serde::{Deserialize, Serialize};

use super::node::{Edge, MCTSNode, NodeId};
use crate::core::RoleMap;

/// Search tree whose nodes live in one `Vec` and refer to each other by
/// [`NodeId`]. The root is always `NodeId(0)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree<A> {
    nodes: Vec<MCTSNode<A>>,
    role_count: usize,
}

impl<A> MCTSTree<A> {
    /// A tree holding only a root.
    pub fn new(role_count: usize) -> Self {
        Self {
            nodes: vec![MCTSNode::root()],
            role_count,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<A> {
        &self.nodes[0]
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<A> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<A> {
        &mut self.nodes[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the root always exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn role_count(&self) -> usize {
        self.role_count
    }

    /// Edge index for `action` at `node`, adding the edge on first sight.
    pub fn find_or_create_edge(&mut self, node: NodeId, action: &A) -> usize
    where
        A: Clone + PartialEq,
    {
        if let Some(index) = self.get(node).edge_index(action) {
            return index;
        }
        let role_count = self.role_count;
        let edges = &mut self.get_mut(node).edges;
        edges.push(Edge::new(action.clone(), role_count));
        edges.len() - 1
    }

    /// Node behind an edge, allocated the first time it is followed.
    pub fn ensure_child(&mut self, parent: NodeId, edge: usize) -> NodeId {
        if let Some(child) = self.get(parent).edges[edge].child {
            return child;
        }
        let child = NodeId(self.nodes.len() as u32);
        let depth = self.get(parent).depth + 1;
        self.nodes.push(MCTSNode::new(Some(parent), depth));
        self.get_mut(parent).edges[edge].child = Some(child);
        child
    }

    /// Count one visit and add `rewards` at every `(node, edge)` step of a
    /// simulated path.
    pub fn backpropagate(&mut self, path: &[(NodeId, usize)], rewards: &RoleMap<f64>) {
        for &(id, edge) in path.iter().rev() {
            let node = self.get_mut(id);
            node.visits += 1;

            let edge = &mut node.edges[edge];
            edge.visits += 1;
            for (role, total) in edge.total_reward.iter_mut() {
                *total += rewards[role];
            }
        }
    }

    /// Size and shape summary.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.nodes.len(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            edge_count: self.nodes.iter().map(|n| n.edges.len()).sum(),
        }
    }
}

/// Summary of an [`MCTSTree`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u32,
    /// Actions tried anywhere in the tree, expanded or not.
    pub edge_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;

    #[test]
    fn test_new_tree_is_a_root() {
        let tree = MCTSTree::<u8>::new(3);
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.role_count(), 3);
        assert_eq!(tree.root(), NodeId(0));
        assert_eq!(tree.root_node().parent, None);
    }

    #[test]
    fn test_edges_are_created_once() {
        let mut tree = MCTSTree::new(2);
        let root = tree.root();

        assert_eq!(tree.find_or_create_edge(root, &4u8), 0);
        assert_eq!(tree.find_or_create_edge(root, &0u8), 1);
        assert_eq!(tree.find_or_create_edge(root, &4u8), 0);
        assert_eq!(tree.root_node().edges.len(), 2);
    }

    #[test]
    fn test_children_are_allocated_once() {
        let mut tree = MCTSTree::new(2);
        let root = tree.root();
        let edge = tree.find_or_create_edge(root, &7u8);

        let child = tree.ensure_child(root, edge);
        assert_eq!(tree.ensure_child(root, edge), child);
        assert_eq!(tree.get(child).depth, 1);
        assert_eq!(tree.get(child).parent, Some(root));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_backpropagate_whole_reward_vector() {
        let mut tree = MCTSTree::new(2);
        let root = tree.root();
        let first = tree.find_or_create_edge(root, &'x');
        let child = tree.ensure_child(root, first);
        let reply = tree.find_or_create_edge(child, &'o');

        let xs_win = RoleMap::from_vec(vec![1.0, -1.0]);
        tree.backpropagate(&[(root, first), (child, reply)], &xs_win);
        tree.backpropagate(&[(root, first)], &xs_win);

        let edge = &tree.root_node().edges[first];
        assert_eq!(tree.root_node().visits, 2);
        assert_eq!(edge.visits, 2);
        assert_eq!(edge.total_reward[Role::new(1)], -2.0);
        assert_eq!(edge.mean_reward(Role::new(0)), 1.0);
        assert_eq!(tree.get(child).edges[reply].visits, 1);
    }

    #[test]
    fn test_stats() {
        let mut tree = MCTSTree::new(2);
        let root = tree.root();
        let roll = tree.find_or_create_edge(root, &'r');
        tree.find_or_create_edge(root, &'h');
        let child = tree.ensure_child(root, roll);
        tree.find_or_create_edge(child, &'r');

        assert_eq!(
            tree.stats(),
            TreeStats {
                node_count: 2,
                max_depth: 1,
                edge_count: 3,
            }
        );
    }

    #[test]
    fn test_depth_beyond_u16() {
        let mut tree = MCTSTree::new(2);
        let root = tree.root();
        tree.get_mut(root).depth = u32::from(u16::MAX);
        let edge = tree.find_or_create_edge(root, &'r');

        let child = tree.ensure_child(root, edge);
        assert_eq!(tree.get(child).depth, 65_536);
        assert_eq!(tree.stats().max_depth, 65_536);
    }

    #[test]
    fn test_tree_json() {
        let mut tree = MCTSTree::new(2);
        let root = tree.root();
        let edge = tree.find_or_create_edge(root, &3u8);
        tree.ensure_child(root, edge);

        let json = serde_json::to_string(&tree).unwrap();
        let back: MCTSTree<u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stats(), tree.stats());
    }
}
