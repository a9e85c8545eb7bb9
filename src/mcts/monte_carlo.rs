//! Flat Monte Carlo player.

use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use crate::core::{Game, GameRng, Haps, Role, Status};
use crate::players::{
    moves_for, select_best, Decision, Heuristic, Player, PlayerError, RandomHeuristic, SearchStats,
};

use super::config::{Budget, MCTSConfig};
use super::policy::{playout, sample_joint, RandomRollout, RolloutPolicy};

/// Flat Monte Carlo player.
///
/// Simulations cycle round-robin over the deciding role's actions. Each
/// one plays the action, samples the other active roles' actions and any
/// chance, then plays out. An action scores the mean result of its
/// simulations, or 0 if it was never simulated.
pub struct MonteCarloPlayer<G: Game> {
    name: String,
    config: MCTSConfig,
    rollout: Box<dyn RolloutPolicy<G>>,
    heuristic: Box<dyn Heuristic<G>>,
    rng: GameRng,
    stats: SearchStats,
}

impl<G: Game> MonteCarloPlayer<G> {
    /// Create a player with random rollouts.
    pub fn new(config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            name: "MonteCarloPlayer".to_string(),
            config,
            rollout: Box::new(RandomRollout),
            heuristic: Box::new(RandomHeuristic),
            rng,
            stats: SearchStats::default(),
        }
    }

    /// Set the playout policy, e.g. a [`HeuristicPlayer`](crate::players::HeuristicPlayer).
    pub fn with_rollout<R: RolloutPolicy<G> + 'static>(mut self, rollout: R) -> Self {
        self.rollout = Box::new(rollout);
        self
    }

    /// Set the heuristic used at the playout horizon.
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

    /// Statistics of the last decision.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Mean simulated result of each of `role`'s actions.
    pub fn evaluate_actions(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
    ) -> Result<Vec<(G::Action, f64)>, PlayerError> {
        let moves = match game.status(state)? {
            Status::Playing(moves) => moves,
            Status::Terminal(_) => return Err(PlayerError::NotActive { role }),
        };
        let actions = moves
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, actions)| actions.clone())
            .ok_or(PlayerError::NotActive { role })?;

        let mut totals = vec![0.0; actions.len()];
        let mut counts = vec![0u32; actions.len()];
        let mut budget = Budget::start(&self.config);

        while !budget.exhausted() {
            let k = budget.simulations() as usize % actions.len();

            let mut joint = sample_joint(&moves, Some(role), &mut self.rng);
            joint.insert(role, actions[k].clone());
            let (next, _) = game
                .advance(state, &joint, &Haps::new())?
                .settle(game, &mut self.rng)?;

            let result = playout(
                game,
                &next,
                1,
                self.config.horizon,
                self.rollout.as_mut(),
                self.heuristic.as_ref(),
                &mut self.rng,
            )?;

            totals[k] += result[role];
            counts[k] += 1;
            budget.record();
        }

        self.stats.simulations = budget.simulations();
        self.stats.iterations = budget.simulations();

        Ok(actions
            .into_iter()
            .zip(totals.iter().zip(&counts))
            .map(|(action, (&total, &count))| {
                let score = if count == 0 { 0.0 } else { total / count as f64 };
                (action, score)
            })
            .collect())
    }

    /// Choose the best-scoring action, breaking ties at random.
    pub fn choose(&mut self, game: &G, state: &G::State, role: Role) -> Result<G::Action, PlayerError> {
        let start = Instant::now();
        self.stats.reset();

        let actions = moves_for(game, state, role)?;
        if let [action] = actions.as_slice() {
            return Ok(action.clone());
        }

        let evaluations = self.evaluate_actions(game, state, role)?;
        self.stats.time_us = start.elapsed().as_micros() as u64;

        debug!(
            player = %self.name,
            simulations = self.stats.simulations,
            elapsed_us = self.stats.time_us,
            per_second = self.stats.simulation_rate(),
            "monte carlo decision"
        );

        select_best(&evaluations, &mut self.rng).ok_or(PlayerError::NotActive { role })
    }
}

#[async_trait]
impl<G: Game> Player<G> for MonteCarloPlayer<G> {
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
