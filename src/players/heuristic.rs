//! Heuristics and the scaffolding shared by every evaluating player.
//!
//! - [`Heuristic`]: estimates how good a non-terminal state is for a role
//! - [`moves_for`]: legal actions of the deciding role, checked
//! - [`state_value`]: result if terminal, heuristic otherwise
//! - [`successors`]: resolved successor states of one action, weighted
//! - [`select_best`]: caller-side tie-breaking among equally good actions
//! - [`HeuristicPlayer`]: one-ply greedy player built from the above

use async_trait::async_trait;
use tracing::trace;

use crate::core::{Game, GameError, GameRng, Haps, JointAction, Role, Status};

use super::{Decision, Player, PlayerError};

/// State evaluation for a role.
///
/// Values should lie within the game's `result_bounds`.
pub trait Heuristic<G: Game>: Send + Sync {
    /// Estimate the value of `state` for `role`.
    fn evaluate(&self, game: &G, state: &G::State, role: Role, rng: &mut GameRng) -> f64;
}

/// Uniform random value in `[-0.5, 0.5)`.
///
/// Only useful to break determinism in tests; it carries no game knowledge.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomHeuristic;

impl<G: Game> Heuristic<G> for RandomHeuristic {
    fn evaluate(&self, _game: &G, _state: &G::State, _role: Role, rng: &mut GameRng) -> f64 {
        rng.gen_range_f64(-0.5, 0.5)
    }
}

impl<G, F> Heuristic<G> for F
where
    G: Game,
    F: Fn(&G, &G::State, Role) -> f64 + Send + Sync,
{
    fn evaluate(&self, game: &G, state: &G::State, role: Role, _rng: &mut GameRng) -> f64 {
        self(game, state, role)
    }
}

/// Legal actions of `role`, failing if the role is not active.
pub fn moves_for<G: Game>(
    game: &G,
    state: &G::State,
    role: Role,
) -> Result<Vec<G::Action>, PlayerError> {
    match game.status(state)? {
        Status::Terminal(_) => Err(PlayerError::NotActive { role }),
        Status::Playing(moves) => moves
            .into_iter()
            .find(|(r, _)| *r == role)
            .map(|(_, actions)| actions)
            .ok_or(PlayerError::NotActive { role }),
    }
}

/// Value of a state for a role: the result if terminal, else the heuristic.
pub fn state_value<G: Game>(
    game: &G,
    state: &G::State,
    role: Role,
    heuristic: &dyn Heuristic<G>,
    rng: &mut GameRng,
) -> f64 {
    match game.result(state) {
        Some(result) => result[role],
        None => heuristic.evaluate(game, state, role, rng),
    }
}

/// Resolved successors of `role` taking `action`, with probabilities.
///
/// Other active roles' actions are combined uniformly; chance outcomes are
/// weighted by their probability. Probabilities sum to 1.
pub fn successors<G: Game>(
    game: &G,
    state: &G::State,
    moves: &[(Role, Vec<G::Action>)],
    role: Role,
    action: &G::Action,
) -> Result<Vec<(G::State, f64)>, GameError> {
    let mut joints = vec![JointAction::single(role, action.clone())];
    for (other, actions) in moves.iter().filter(|(r, _)| *r != role) {
        joints = joints
            .into_iter()
            .flat_map(|joint| {
                actions.iter().map(move |a| {
                    let mut joint = joint.clone();
                    joint.insert(*other, a.clone());
                    joint
                })
            })
            .collect();
    }

    let weight = 1.0 / joints.len() as f64;
    let mut outcomes = Vec::new();
    for joint in &joints {
        for (next, p) in game.advance(state, joint, &Haps::new())?.outcomes(game)? {
            outcomes.push((next, p * weight));
        }
    }
    Ok(outcomes)
}

/// Every action whose evaluation equals the maximum. No tie-breaking.
pub fn best_actions<A: Clone>(evaluations: &[(A, f64)]) -> Vec<A> {
    let max = evaluations
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| !v.is_nan())
        .fold(f64::NEG_INFINITY, f64::max);

    evaluations
        .iter()
        .filter(|(_, v)| *v == max)
        .map(|(a, _)| a.clone())
        .collect()
}

/// Pick one of the best actions uniformly at random.
pub fn select_best<A: Clone>(evaluations: &[(A, f64)], rng: &mut GameRng) -> Option<A> {
    let best = best_actions(evaluations);
    rng.choose(&best).cloned()
}

/// Expected one-ply value of each of `role`'s actions.
pub fn greedy_evaluations<G: Game>(
    game: &G,
    state: &G::State,
    role: Role,
    heuristic: &dyn Heuristic<G>,
    rng: &mut GameRng,
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

    let mut evaluations = Vec::with_capacity(actions.len());
    for action in actions {
        let mut value = 0.0;
        for (next, p) in successors(game, state, &moves, role, &action)? {
            value += p * state_value(game, &next, role, heuristic, rng);
        }
        evaluations.push((action, value));
    }
    Ok(evaluations)
}

/// One-ply greedy player.
///
/// Evaluates each legal action by the expected heuristic value of its
/// successors and picks the best, breaking ties at random.
pub struct HeuristicPlayer<G: Game> {
    name: String,
    heuristic: Box<dyn Heuristic<G>>,
    rng: GameRng,
}

impl<G: Game> HeuristicPlayer<G> {
    /// Create a player using the random heuristic.
    pub fn new(seed: u64) -> Self {
        Self {
            name: "HeuristicPlayer".to_string(),
            heuristic: Box::new(RandomHeuristic),
            rng: GameRng::new(seed),
        }
    }

    /// Set the heuristic.
    pub fn with_heuristic<H: Heuristic<G> + 'static>(mut self, heuristic: H) -> Self {
        self.heuristic = Box::new(heuristic);
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The heuristic in use.
    pub fn heuristic(&self) -> &dyn Heuristic<G> {
        self.heuristic.as_ref()
    }

    /// Expected one-ply value of each of `role`'s actions.
    pub fn evaluate_actions(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
    ) -> Result<Vec<(G::Action, f64)>, PlayerError> {
        greedy_evaluations(game, state, role, self.heuristic.as_ref(), &mut self.rng)
    }

    /// Choose the best action, breaking ties at random.
    pub fn choose(&mut self, game: &G, state: &G::State, role: Role) -> Result<G::Action, PlayerError> {
        let evaluations = self.evaluate_actions(game, state, role)?;
        trace!(player = %self.name, actions = evaluations.len(), "greedy evaluations");
        select_best(&evaluations, &mut self.rng).ok_or(PlayerError::NotActive { role })
    }
}

#[async_trait]
impl<G: Game> Player<G> for HeuristicPlayer<G> {
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
