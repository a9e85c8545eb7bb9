//! UCT: Monte Carlo Tree Search with UCB1 selection.
//!
//! The tree is open-loop. Each iteration replays from the root state,
//! sampling chance and the actions of co-acting roles, so a node only
//! records the choosing roles' actions that lead to it. At every node one
//! role chooses: the deciding role when it is active, otherwise the first
//! active role. Edges store a reward per role, so every chooser maximizes
//! its own coordinate.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::core::{Game, GameRng, Haps, Role, RoleMap, Status};
use crate::players::{
    moves_for, select_best, Decision, Heuristic, Player, PlayerError, RandomHeuristic, SearchStats,
};

use super::config::{Budget, MCTSConfig};
use super::node::NodeId;
use super::policy::{
    heuristic_values, playout, sample_joint, RandomRollout, RolloutPolicy, SelectionPolicy, UCB1,
};
use super::tree::MCTSTree;

/// UCT player.
///
/// Each iteration selects down the tree with UCB1, expands one unvisited
/// action, plays out, and backs the result vector up the path. The final
/// choice is the root action with the highest mean reward for the deciding
/// role, not the highest UCB1 score.
pub struct UCTPlayer<G: Game> {
    name: String,
    config: MCTSConfig,
    tree: MCTSTree<G::Action>,
    selection: Box<dyn SelectionPolicy<G::Action>>,
    rollout: Box<dyn RolloutPolicy<G>>,
    heuristic: Box<dyn Heuristic<G>>,
    rng: GameRng,
    stats: SearchStats,
}

impl<G: Game> UCTPlayer<G> {
    /// Create a player with UCB1 selection and random rollouts.
    pub fn new(config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            name: "UCTPlayer".to_string(),
            config,
            tree: MCTSTree::new(1),
            selection: Box::new(UCB1),
            rollout: Box::new(RandomRollout),
            heuristic: Box::new(RandomHeuristic),
            rng,
            stats: SearchStats::default(),
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy<G::Action> + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set the playout policy.
    pub fn with_rollout<R: RolloutPolicy<G> + 'static>(mut self, rollout: R) -> Self {
        self.rollout = Box::new(rollout);
        self
    }

    /// Set the heuristic used at the horizon.
    pub fn with_heuristic<H: Heuristic<G> + 'static>(mut self, heuristic: H) -> Self {
        self.heuristic = Box::new(heuristic);
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Get search statistics of the last decision.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree of the last decision.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree<G::Action> {
        &self.tree
    }

    /// Root action visit counts of the last decision.
    pub fn action_visits(&self) -> Vec<(G::Action, u32)> {
        self.tree
            .root_node()
            .edges
            .iter()
            .map(|e| (e.action.clone(), e.visits))
            .collect()
    }

    /// Grow a fresh tree for `role` at `state` until the budget runs out.
    ///
    /// Returns the mean reward for `role` of each of its legal actions.
    /// Actions never visited score `-inf`, so a tried action always wins
    /// over an untried one.
    pub fn evaluate_actions(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
    ) -> Result<Vec<(G::Action, f64)>, PlayerError> {
        let actions = moves_for(game, state, role)?;
        self.tree = MCTSTree::new(game.role_count());

        let mut budget = Budget::start(&self.config);
        while !budget.exhausted() {
            self.iteration(game, state, role)?;
            budget.record();
        }
        self.stats.iterations = budget.simulations();

        let root = self.tree.root_node();
        Ok(actions
            .into_iter()
            .map(|action| {
                let mean = root
                    .edge_index(&action)
                    .map(|i| &root.edges[i])
                    .filter(|edge| edge.visits > 0)
                    .map_or(f64::NEG_INFINITY, |edge| edge.mean_reward(role));
                (action, mean)
            })
            .collect())
    }

    /// Choose the action with the highest mean reward.
    pub fn choose(&mut self, game: &G, state: &G::State, role: Role) -> Result<G::Action, PlayerError> {
        let start = Instant::now();
        self.stats.reset();

        let actions = moves_for(game, state, role)?;
        if let [action] = actions.as_slice() {
            return Ok(action.clone());
        }

        let evaluations = self.evaluate_actions(game, state, role)?;

        let tree_stats = self.tree.stats();
        self.stats.nodes = tree_stats.node_count as u64;
        self.stats.max_depth = tree_stats.max_depth;
        self.stats.time_us = start.elapsed().as_micros() as u64;

        debug!(
            player = %self.name,
            iterations = self.stats.iterations,
            simulations = self.stats.simulations,
            nodes = self.stats.nodes,
            elapsed_us = self.stats.time_us,
            "uct decision"
        );

        select_best(&evaluations, &mut self.rng).ok_or(PlayerError::NotActive { role })
    }

    /// Single iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, game: &G, root_state: &G::State, role: Role) -> Result<(), PlayerError> {
        let mut state = root_state.clone();
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = self.tree.root();
        let mut depth = 0u32;

        loop {
            // === SELECTION ===
            let moves = match game.status(&state)? {
                Status::Terminal(result) => {
                    self.tree.backpropagate(&path, &result);
                    return Ok(());
                }
                Status::Playing(_) if depth >= self.config.horizon => {
                    let values = heuristic_values(game, &state, self.heuristic.as_ref(), &mut self.rng);
                    self.tree.backpropagate(&path, &values);
                    return Ok(());
                }
                Status::Playing(moves) => moves,
            };

            let (chooser, legal) = match moves.iter().find(|(r, _)| *r == role) {
                Some((r, actions)) => (*r, actions.clone()),
                None => (moves[0].0, moves[0].1.clone()),
            };

            let candidates: Vec<usize> = legal
                .iter()
                .map(|action| self.tree.find_or_create_edge(current, action))
                .collect();
            let unexpanded: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&i| !self.tree.get(current).edges[i].is_expanded())
                .collect();

            let (edge_idx, expanding) = match self.rng.choose(&unexpanded) {
                Some(&i) => (i, true),
                None => {
                    let node = self.tree.get(current);
                    let i = self.selection.select(node, &candidates, chooser, &self.config, &mut self.rng);
                    (i, false)
                }
            };
            path.push((current, edge_idx));

            let mut joint = sample_joint(&moves, Some(chooser), &mut self.rng);
            joint.insert(chooser, self.tree.get(current).edges[edge_idx].action.clone());
            let (next, _) = game
                .advance(&state, &joint, &Haps::new())?
                .settle(game, &mut self.rng)?;
            state = next;
            depth += 1;
            current = self.tree.ensure_child(current, edge_idx);

            // === EXPANSION + SIMULATION ===
            if expanding {
                trace!(node = %current, depth, "uct expand");
                let rewards = self.simulate(game, &state, depth)?;
                self.tree.backpropagate(&path, &rewards);
                return Ok(());
            }
        }
    }

    fn simulate(&mut self, game: &G, state: &G::State, depth: u32) -> Result<RoleMap<f64>, PlayerError> {
        self.stats.simulations += 1;
        playout(
            game,
            state,
            depth,
            self.config.horizon,
            self.rollout.as_mut(),
            self.heuristic.as_ref(),
            &mut self.rng,
        )
    }
}

#[async_trait]
impl<G: Game> Player<G> for UCTPlayer<G> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decision(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
    ) -> Result<Decision<G::Action>, PlayerError> {
        self.choose(game, state, role).map(Decision::Act)
    }
}
