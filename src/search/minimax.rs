//! MiniMax search with expectation over chance nodes.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::core::{Game, GameRng, Haps, JointAction, Role, Status, Transition};
use crate::players::{
    moves_for, select_best, state_value, Decision, Heuristic, Player, PlayerError, RandomHeuristic,
    SearchStats,
};

use super::{sole_mover, SearchConfig, SearchHook};

/// Two-role MiniMax player.
///
/// Maximizes when the searching role is the one to move and minimizes
/// otherwise. A transition that depends on chance becomes a chance node one
/// level down, valued as `Σ p * value(outcome)` with its outcomes one level
/// further, so the same player is an expectiminimax player on stochastic
/// games.
pub struct MiniMaxPlayer<G: Game> {
    name: String,
    config: SearchConfig,
    heuristic: Box<dyn Heuristic<G>>,
    hook: Option<SearchHook<G::State>>,
    rng: GameRng,
    stats: SearchStats,
}

/// MiniMax on stochastic games.
pub type Expectiminimax<G> = MiniMaxPlayer<G>;

impl<G: Game> MiniMaxPlayer<G> {
    /// Create a player with the random heuristic.
    pub fn new(config: SearchConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            name: "MiniMaxPlayer".to_string(),
            config,
            heuristic: Box::new(RandomHeuristic),
            hook: None,
            rng,
            stats: SearchStats::default(),
        }
    }

    /// Set the heuristic used at the horizon.
    pub fn with_heuristic<H: Heuristic<G> + 'static>(mut self, heuristic: H) -> Self {
        self.heuristic = Box::new(heuristic);
        self
    }

    /// Set the node hook.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&G::State, f64) -> Option<f64> + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Statistics of the last decision.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// MiniMax value of each of `role`'s actions.
    pub fn evaluate_actions(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
    ) -> Result<Vec<(G::Action, f64)>, PlayerError> {
        let actions = moves_for(game, state, role)?;
        let mut evaluations = Vec::with_capacity(actions.len());
        for action in actions {
            let value = self.action_value(game, state, role, role, &action, 0)?;
            evaluations.push((action, value));
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
            "minimax decision"
        );

        select_best(&evaluations, &mut self.rng).ok_or(PlayerError::NotActive { role })
    }

    /// MiniMax value of `state` for `role`, at `depth` below the root.
    pub fn minimax(&mut self, game: &G, state: &G::State, role: Role, depth: u32) -> Result<f64, PlayerError> {
        self.stats.visit(depth);

        let value = match game.status(state)? {
            Status::Terminal(result) => result[role],
            Status::Playing(_) if depth >= self.config.horizon => {
                self.heuristic.evaluate(game, state, role, &mut self.rng)
            }
            Status::Playing(moves) => {
                let (mover, actions) = sole_mover(moves)?;
                let maximize = mover == role;
                let mut best = if maximize { f64::NEG_INFINITY } else { f64::INFINITY };
                for action in &actions {
                    let value = self.action_value(game, state, role, mover, action, depth)?;
                    best = if maximize { best.max(value) } else { best.min(value) };
                }
                best
            }
        };

        trace!(depth, value, "minimax node");
        Ok(self.hooked(state, value))
    }

    /// Expected value for `role` of `mover` playing `action`.
    fn action_value(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
        mover: Role,
        action: &G::Action,
        depth: u32,
    ) -> Result<f64, PlayerError> {
        let joint = JointAction::single(mover, action.clone());
        match game.advance(state, &joint, &Haps::new())? {
            Transition::Resolved(next) => self.minimax(game, &next, role, depth + 1),
            contingent => self.chance_value(game, contingent, role, depth + 1),
        }
    }

    /// Expected value of a chance node at `depth`. At the horizon its
    /// outcomes are valued without searching them.
    fn chance_value(
        &mut self,
        game: &G,
        transition: Transition<G::State, G::Action>,
        role: Role,
        depth: u32,
    ) -> Result<f64, PlayerError> {
        self.stats.visit(depth);

        let mut value = 0.0;
        for (next, p) in transition.outcomes(game)? {
            let outcome = if depth >= self.config.horizon {
                state_value(game, &next, role, self.heuristic.as_ref(), &mut self.rng)
            } else {
                self.minimax(game, &next, role, depth + 1)?
            };
            value += p * outcome;
        }

        trace!(depth, value, "chance node");
        Ok(value)
    }

    fn hooked(&self, state: &G::State, value: f64) -> f64 {
        match &self.hook {
            Some(hook) => hook(state, value).filter(|v| !v.is_nan()).unwrap_or(value),
            None => value,
        }
    }
}

#[async_trait]
impl<G: Game> Player<G> for MiniMaxPlayer<G> {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_play(&self, game: &G) -> bool {
        game.role_count() == 2 && !game.is_simultaneous()
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
