//! MCTS policies for selection and playouts.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to choose which child to explore (UCB1)
//! - `RolloutPolicy`: How to pick actions during playouts (random, agent)

use crate::core::{Game, GameRng, Haps, JointAction, Role, RoleMap, Status};
use crate::players::{Heuristic, HeuristicPlayer, PlayerError, RandomPlayer};

use super::config::MCTSConfig;
use super::node::MCTSNode;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy<A>: Send + Sync {
    /// Select one of the `candidates` edge indices of `node` for `role`.
    fn select(
        &self,
        node: &MCTSNode<A>,
        candidates: &[usize],
        role: Role,
        config: &MCTSConfig,
        rng: &mut GameRng,
    ) -> usize;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Balances exploitation (high reward) with exploration (low visits).
/// Formula: Q(a) + c * sqrt(ln(N) / n(a)). Unvisited edges score infinity;
/// ties are broken uniformly at random.
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl UCB1 {
    /// UCB1 score of an edge with `visits` and `mean` under a parent with
    /// `parent_visits`.
    #[must_use]
    pub fn score(mean: f64, visits: u32, parent_visits: u32, c: f64) -> f64 {
        if visits == 0 {
            f64::INFINITY
        } else {
            let ln_parent = (parent_visits.max(1) as f64).ln();
            mean + c * (ln_parent / visits as f64).sqrt()
        }
    }
}

impl<A> SelectionPolicy<A> for UCB1 {
    fn select(
        &self,
        node: &MCTSNode<A>,
        candidates: &[usize],
        role: Role,
        config: &MCTSConfig,
        rng: &mut GameRng,
    ) -> usize {
        let scored: Vec<(usize, f64)> = candidates
            .iter()
            .map(|&i| {
                let edge = &node.edges[i];
                let score = Self::score(
                    edge.mean_reward(role),
                    edge.visits,
                    node.visits,
                    config.exploration_constant,
                );
                (i, score)
            })
            .collect();

        crate::players::select_best(&scored, rng)
            .or_else(|| candidates.first().copied())
            .unwrap_or(0)
    }
}

// =============================================================================
// Rollout Policy
// =============================================================================

/// Policy for picking actions during playouts.
pub trait RolloutPolicy<G: Game>: Send {
    /// Pick an action for `role` among its legal `actions`.
    fn choose(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
        actions: &[G::Action],
        rng: &mut GameRng,
    ) -> Result<G::Action, PlayerError>;
}

/// Uniformly random rollouts.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout;

impl<G: Game> RolloutPolicy<G> for RandomRollout {
    fn choose(
        &mut self,
        _game: &G,
        _state: &G::State,
        role: Role,
        actions: &[G::Action],
        rng: &mut GameRng,
    ) -> Result<G::Action, PlayerError> {
        rng.choose(actions)
            .cloned()
            .ok_or(PlayerError::NotActive { role })
    }
}

impl<G: Game> RolloutPolicy<G> for RandomPlayer {
    fn choose(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
        _actions: &[G::Action],
        _rng: &mut GameRng,
    ) -> Result<G::Action, PlayerError> {
        RandomPlayer::choose(self, game, state, role)
    }
}

impl<G: Game> RolloutPolicy<G> for HeuristicPlayer<G> {
    fn choose(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
        _actions: &[G::Action],
        _rng: &mut GameRng,
    ) -> Result<G::Action, PlayerError> {
        HeuristicPlayer::choose(self, game, state, role)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Heuristic value of a state for every role.
pub fn heuristic_values<G: Game>(
    game: &G,
    state: &G::State,
    heuristic: &dyn Heuristic<G>,
    rng: &mut GameRng,
) -> RoleMap<f64> {
    RoleMap::new(game.role_count(), |role| heuristic.evaluate(game, state, role, rng))
}

/// Sample an action for every active role except `skip`.
pub fn sample_joint<A: Clone>(
    moves: &[(Role, Vec<A>)],
    skip: Option<Role>,
    rng: &mut GameRng,
) -> JointAction<A> {
    moves
        .iter()
        .filter(|(role, _)| Some(*role) != skip)
        .filter_map(|(role, actions)| rng.choose(actions).map(|a| (*role, a.clone())))
        .collect()
}

/// Play from `state` until terminal or `horizon`, returning one value per role.
///
/// `depth` is the depth of `state` itself. Every active role acts through
/// `rollout`; chance is settled by sampling.
pub fn playout<G: Game>(
    game: &G,
    state: &G::State,
    depth: u32,
    horizon: u32,
    rollout: &mut dyn RolloutPolicy<G>,
    heuristic: &dyn Heuristic<G>,
    rng: &mut GameRng,
) -> Result<RoleMap<f64>, PlayerError> {
    let mut state = state.clone();
    let mut depth = depth;

    loop {
        let moves = match game.status(&state)? {
            Status::Terminal(result) => return Ok(result),
            Status::Playing(_) if depth >= horizon => {
                return Ok(heuristic_values(game, &state, heuristic, rng));
            }
            Status::Playing(moves) => moves,
        };

        let mut joint = JointAction::new();
        for (role, actions) in &moves {
            let action = rollout.choose(game, &state, *role, actions, rng)?;
            joint.insert(*role, action);
        }

        let (next, _) = game.transition(&state, &joint, &Haps::new())?.settle(game, rng)?;
        state = next;
        depth += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{OddsEvens, Pig, TicTacToe};
    use crate::mcts::node::Edge;
    use crate::players::RandomHeuristic;

    fn make_test_node() -> MCTSNode<u8> {
        let mut node = MCTSNode::root();

        // Edge 0: high reward, many visits
        let mut e0 = Edge::new(0, 2);
        e0.visits = 100;
        e0.total_reward[Role::new(0)] = 80.0;

        // Edge 1: lower reward, fewer visits
        let mut e1 = Edge::new(1, 2);
        e1.visits = 10;
        e1.total_reward[Role::new(0)] = 7.0;

        // Edge 2: unvisited (infinite exploration bonus)
        let e2 = Edge::new(2, 2);

        node.edges.push(e0);
        node.edges.push(e1);
        node.edges.push(e2);
        node.visits = 110;

        node
    }

    #[test]
    fn test_ucb1_selects_unvisited() {
        let node = make_test_node();
        let config = MCTSConfig::default();
        let mut rng = GameRng::new(1);

        let selected = UCB1.select(&node, &[0, 1, 2], Role::new(0), &config, &mut rng);
        assert_eq!(selected, 2);
    }

    #[test]
    fn test_ucb1_respects_candidates() {
        let node = make_test_node();
        let config = MCTSConfig::default().with_exploration(0.0);
        let mut rng = GameRng::new(1);

        // Pure exploitation: 0.8 beats 0.7.
        let selected = UCB1.select(&node, &[0, 1], Role::new(0), &config, &mut rng);
        assert_eq!(selected, 0);

        // Edge 0 unavailable in this visit.
        let selected = UCB1.select(&node, &[1], Role::new(0), &config, &mut rng);
        assert_eq!(selected, 1);
    }

    #[test]
    fn test_ucb1_breaks_ties_randomly() {
        let mut node = MCTSNode::root();
        node.edges.push(Edge::new('a', 2));
        node.edges.push(Edge::new('b', 2));
        let config = MCTSConfig::default();
        let mut rng = GameRng::new(3);

        let mut seen = [false; 2];
        for _ in 0..50 {
            seen[UCB1.select(&node, &[0, 1], Role::new(0), &config, &mut rng)] = true;
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn test_ucb1_score() {
        let c = std::f64::consts::SQRT_2;
        assert_eq!(UCB1::score(0.5, 0, 10, c), f64::INFINITY);

        let expected = 0.5 + c * ((10f64).ln() / 4.0).sqrt();
        assert!((UCB1::score(0.5, 4, 10, c) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_playout_reaches_terminal() {
        let game = TicTacToe::new();
        let mut rng = GameRng::new(11);

        for _ in 0..20 {
            let result = playout(&game, &game.initial_state(), 0, 500, &mut RandomRollout, &RandomHeuristic, &mut rng)
                .unwrap();
            assert_eq!(result.values().sum::<f64>(), 0.0);
            assert!(result.values().all(|v| [-1.0, 0.0, 1.0].contains(v)));
        }
    }

    #[test]
    fn test_playout_stops_at_horizon() {
        let game = Pig::new(100);
        let mut rng = GameRng::new(11);
        let heuristic = |_: &Pig, _: &crate::games::PigState, _: Role| 0.25;

        let result = playout(&game, &game.initial_state(), 0, 0, &mut RandomRollout, &heuristic, &mut rng).unwrap();
        assert_eq!(result, RoleMap::with_value(2, 0.25));
    }

    #[test]
    fn test_playout_simultaneous() {
        let game = OddsEvens::new(3);
        let mut rng = GameRng::new(2);

        let result = playout(&game, &game.initial_state(), 0, 500, &mut RandomRollout, &RandomHeuristic, &mut rng)
            .unwrap();
        assert_eq!(result.values().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_sample_joint_skips_role() {
        let moves = vec![(Role::new(0), vec![1u8, 2]), (Role::new(1), vec![1u8, 2])];
        let mut rng = GameRng::new(2);

        let joint = sample_joint(&moves, Some(Role::new(0)), &mut rng);
        assert_eq!(joint.len(), 1);
        assert!(joint.get(Role::new(1)).is_some());
    }
}
