//! MiniMax with alpha-beta pruning.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::core::{Game, GameRng, Haps, JointAction, Role, Status, Transition};
use crate::players::{
    moves_for, select_best, state_value, Decision, Heuristic, Player, PlayerError, RandomHeuristic,
    SearchStats,
};

use super::{sole_mover, SearchConfig, SearchHook};

/// Two-role alpha-beta player.
///
/// Values agree with [`MiniMaxPlayer`](super::MiniMaxPlayer) while visiting
/// fewer nodes. Root actions are each searched with a full window so their
/// values are exact and ties can be broken fairly. Outcomes of a chance
/// transition are also searched with a full window, keeping the expectation
/// exact.
pub struct AlphaBetaPlayer<G: Game> {
    name: String,
    config: SearchConfig,
    heuristic: Box<dyn Heuristic<G>>,
    hook: Option<SearchHook<G::State>>,
    rng: GameRng,
    stats: SearchStats,
}

impl<G: Game> AlphaBetaPlayer<G> {
    /// Create a player with the random heuristic.
    pub fn new(config: SearchConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            name: "AlphaBetaPlayer".to_string(),
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

    /// Value of each of `role`'s actions.
    pub fn evaluate_actions(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
    ) -> Result<Vec<(G::Action, f64)>, PlayerError> {
        let actions = moves_for(game, state, role)?;
        let mut evaluations = Vec::with_capacity(actions.len());
        for action in actions {
            let value = self.action_value(
                game,
                state,
                role,
                role,
                &action,
                0,
                f64::NEG_INFINITY,
                f64::INFINITY,
            )?;
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
            "alphabeta decision"
        );

        select_best(&evaluations, &mut self.rng).ok_or(PlayerError::NotActive { role })
    }

    /// Value of `state` for `role` within the `[alpha, beta]` window.
    pub fn alphabeta(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<f64, PlayerError> {
        self.stats.visit(depth);

        let value = match game.status(state)? {
            Status::Terminal(result) => result[role],
            Status::Playing(_) if depth >= self.config.horizon => {
                self.heuristic.evaluate(game, state, role, &mut self.rng)
            }
            Status::Playing(moves) => {
                let (mover, actions) = sole_mover(moves)?;
                if mover == role {
                    let mut best = f64::NEG_INFINITY;
                    for action in &actions {
                        let value = self.action_value(game, state, role, mover, action, depth, alpha, beta)?;
                        best = best.max(value);
                        alpha = alpha.max(best);
                        if beta <= alpha {
                            break;
                        }
                    }
                    best
                } else {
                    let mut best = f64::INFINITY;
                    for action in &actions {
                        let value = self.action_value(game, state, role, mover, action, depth, alpha, beta)?;
                        best = best.min(value);
                        beta = beta.min(best);
                        if beta <= alpha {
                            break;
                        }
                    }
                    best
                }
            }
        };

        trace!(depth, value, alpha, beta, "alphabeta node");
        Ok(self.hooked(state, value))
    }

    #[allow(clippy::too_many_arguments)]
    fn action_value(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
        mover: Role,
        action: &G::Action,
        depth: u32,
        alpha: f64,
        beta: f64,
    ) -> Result<f64, PlayerError> {
        let joint = JointAction::single(mover, action.clone());
        match game.advance(state, &joint, &Haps::new())? {
            Transition::Resolved(next) => self.alphabeta(game, &next, role, depth + 1, alpha, beta),
            contingent => self.chance_value(game, contingent, role, depth + 1),
        }
    }

    /// Expected value of a chance node at `depth`, each outcome searched one
    /// level below with a full window. At the horizon outcomes are valued
    /// without searching them.
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
                self.alphabeta(game, &next, role, depth + 1, f64::NEG_INFINITY, f64::INFINITY)?
            };
            value += p * outcome;
        }

        trace!(depth, value, "alphabeta chance node");
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
impl<G: Game> Player<G> for AlphaBetaPlayer<G> {
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
