//! MaxN search for games with any number of roles.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::core::{Game, GameRng, Haps, JointAction, Role, RoleMap, Status, Transition};
use crate::players::{
    moves_for, select_best, Decision, Heuristic, Player, PlayerError, RandomHeuristic, SearchStats,
};

use super::{sole_mover, SearchConfig};

/// MaxN player.
///
/// Backs up one value per role. At each node the role to move picks the
/// child maximizing its own coordinate; the first maximum wins. Horizon
/// states are valued by running the heuristic once per role.
pub struct MaxNPlayer<G: Game> {
    name: String,
    config: SearchConfig,
    heuristic: Box<dyn Heuristic<G>>,
    rng: GameRng,
    stats: SearchStats,
}

impl<G: Game> MaxNPlayer<G> {
    /// Create a player with the random heuristic.
    pub fn new(config: SearchConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            name: "MaxNPlayer".to_string(),
            config,
            heuristic: Box::new(RandomHeuristic),
            rng,
            stats: SearchStats::default(),
        }
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

    /// Statistics of the last decision.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Value for `role` of each of its actions.
    pub fn evaluate_actions(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
    ) -> Result<Vec<(G::Action, f64)>, PlayerError> {
        let actions = moves_for(game, state, role)?;
        let mut evaluations = Vec::with_capacity(actions.len());
        for action in actions {
            let values = self.action_values(game, state, role, &action, 0)?;
            evaluations.push((action, values[role]));
        }
        Ok(evaluations)
    }

    /// Choose the best action, breaking ties at random.
    pub fn choose(&mut self, game: &G, state: &G::State, role: Role) -> Result<G::Action, PlayerError> {
        let start = Instant::now();
        self.stats.reset();

        let evaluations = self.evaluate_actions(game, state, role)?;
        self.stats.iterations = evaluations.len() as u32;
        self.stats.time_us = start.elapsed().as_micros() as u64;

        debug!(
            player = %self.name,
            nodes = self.stats.nodes,
            max_depth = self.stats.max_depth,
            elapsed_us = self.stats.time_us,
            "maxn decision"
        );

        select_best(&evaluations, &mut self.rng).ok_or(PlayerError::NotActive { role })
    }

    /// Evaluation vector of `state`.
    pub fn maxn(&mut self, game: &G, state: &G::State, depth: u32) -> Result<RoleMap<f64>, PlayerError> {
        self.stats.visit(depth);

        let values = match game.status(state)? {
            Status::Terminal(result) => result,
            Status::Playing(_) if depth >= self.config.horizon => self.leaf_values(game, state),
            Status::Playing(moves) => {
                let (mover, actions) = sole_mover(moves)?;
                let mut best: Option<RoleMap<f64>> = None;
                for action in &actions {
                    let values = self.action_values(game, state, mover, action, depth)?;
                    if best.as_ref().map_or(true, |b| values[mover] > b[mover]) {
                        best = Some(values);
                    }
                }
                best.ok_or(PlayerError::NotActive { role: mover })?
            }
        };

        trace!(depth, values = ?values, "maxn node");
        Ok(values)
    }

    /// Expected evaluation vector of `mover` playing `action`.
    fn action_values(
        &mut self,
        game: &G,
        state: &G::State,
        mover: Role,
        action: &G::Action,
        depth: u32,
    ) -> Result<RoleMap<f64>, PlayerError> {
        let joint = JointAction::single(mover, action.clone());
        match game.advance(state, &joint, &Haps::new())? {
            Transition::Resolved(next) => self.maxn(game, &next, depth + 1),
            contingent => self.chance_values(game, contingent, depth + 1),
        }
    }

    /// Expected evaluation vector of a chance node at `depth`.
    fn chance_values(
        &mut self,
        game: &G,
        transition: Transition<G::State, G::Action>,
        depth: u32,
    ) -> Result<RoleMap<f64>, PlayerError> {
        self.stats.visit(depth);

        let mut expected = RoleMap::with_value(game.role_count(), 0.0);
        for (next, p) in transition.outcomes(game)? {
            let values = if depth >= self.config.horizon {
                self.leaf_values(game, &next)
            } else {
                self.maxn(game, &next, depth + 1)?
            };
            for (role, sum) in expected.iter_mut() {
                *sum += p * values[role];
            }
        }
        Ok(expected)
    }

    /// Result if terminal, heuristic vector otherwise.
    fn leaf_values(&mut self, game: &G, state: &G::State) -> RoleMap<f64> {
        if let Some(result) = game.result(state) {
            return result;
        }
        let heuristic = self.heuristic.as_ref();
        let rng = &mut self.rng;
        RoleMap::new(game.role_count(), |role| heuristic.evaluate(game, state, role, rng))
    }
}

#[async_trait]
impl<G: Game> Player<G> for MaxNPlayer<G> {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_play(&self, game: &G) -> bool {
        !game.is_simultaneous() && !game.is_stochastic()
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
