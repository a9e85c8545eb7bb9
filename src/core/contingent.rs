//! Contingent states: transitions waiting on chance.
//!
//! A [`ContingentState`] is not actionable. It remembers the state and joint
//! action that produced it, plus the chance variables that must be resolved.
//! Resolving it yields a [`Transition`], which may itself be contingent when
//! a game chains chance events (two dice, a reshuffle after a draw).

use super::distribution::{Aleatory, Haps};
use super::error::GameError;
use super::game::{Game, JointAction};
use super::rng::GameRng;

/// A pending transition with unresolved chance variables.
#[derive(Clone, Debug, PartialEq)]
pub struct ContingentState<S, A> {
    state: S,
    actions: JointAction<A>,
    resolved: Haps,
    aleatories: Vec<Aleatory>,
}

impl<S, A> ContingentState<S, A> {
    /// Create a contingent state. `resolved` holds haps already known.
    pub fn new(state: S, actions: JointAction<A>, resolved: Haps, aleatories: Vec<Aleatory>) -> Self {
        Self {
            state,
            actions,
            resolved,
            aleatories,
        }
    }

    /// The state the transition starts from.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// The joint action being applied.
    #[must_use]
    pub fn actions(&self) -> &JointAction<A> {
        &self.actions
    }

    /// Haps resolved by earlier links of a chance chain.
    #[must_use]
    pub fn resolved(&self) -> &Haps {
        &self.resolved
    }

    /// Chance variables still pending.
    #[must_use]
    pub fn aleatories(&self) -> &[Aleatory] {
        &self.aleatories
    }

    /// Every combination of pending hap values with its joint probability.
    ///
    /// The Cartesian product of the pending distributions; zero-probability
    /// values are skipped. Probabilities of the result sum to 1.
    #[must_use]
    pub fn possible_haps(&self) -> Vec<(Haps, f64)> {
        let mut combos = vec![(Haps::new(), 1.0)];

        for aleatory in &self.aleatories {
            let mut expanded = Vec::with_capacity(combos.len() * aleatory.distribution.len());
            for (haps, p) in &combos {
                for (value, q) in aleatory.distribution.iter() {
                    if q <= 0.0 {
                        continue;
                    }
                    let mut haps = haps.clone();
                    haps.insert(aleatory.name.clone(), *value);
                    expanded.push((haps, p * q));
                }
            }
            combos = expanded;
        }

        combos
    }

    /// Sample one value per pending chance variable.
    pub fn sample_haps(&self, rng: &mut GameRng) -> Haps {
        let mut haps = Haps::new();
        for aleatory in &self.aleatories {
            haps.insert(aleatory.name.clone(), *aleatory.distribution.sample(rng));
        }
        haps
    }

    /// Supply values for the pending chance variables and transition again.
    pub fn resolve<G>(&self, game: &G, haps: &Haps) -> Result<Transition<S, A>, GameError>
    where
        G: Game<State = S, Action = A> + ?Sized,
    {
        if let Some(missing) = self.aleatories.iter().find(|a| !haps.contains(&a.name)) {
            return Err(GameError::MissingHap {
                name: missing.name.clone(),
            });
        }

        let mut merged = self.resolved.clone();
        merged.merge(haps);
        game.advance(&self.state, &self.actions, &merged)
    }
}

/// Outcome of applying a joint action.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition<S, A> {
    /// Deterministic successor.
    Resolved(S),
    /// Successor depends on unresolved chance.
    Contingent(ContingentState<S, A>),
}

impl<S, A> Transition<S, A> {
    /// Check if chance still has to be resolved.
    #[must_use]
    pub fn is_contingent(&self) -> bool {
        matches!(self, Transition::Contingent(_))
    }

    /// Sample through every chained chance node.
    ///
    /// Returns the resolved state and all haps sampled on the way.
    pub fn settle<G>(self, game: &G, rng: &mut GameRng) -> Result<(S, Haps), GameError>
    where
        G: Game<State = S, Action = A> + ?Sized,
    {
        let mut haps = Haps::new();
        let mut current = self;

        loop {
            match current {
                Transition::Resolved(state) => return Ok((state, haps)),
                Transition::Contingent(contingent) => {
                    let sampled = contingent.sample_haps(rng);
                    haps.merge(&sampled);
                    current = contingent.resolve(game, &sampled)?;
                }
            }
        }
    }

    /// Enumerate every resolved successor with its probability.
    ///
    /// Follows chained chance nodes, multiplying probabilities along the way.
    pub fn outcomes<G>(self, game: &G) -> Result<Vec<(S, f64)>, GameError>
    where
        G: Game<State = S, Action = A> + ?Sized,
    {
        match self {
            Transition::Resolved(state) => Ok(vec![(state, 1.0)]),
            Transition::Contingent(contingent) => {
                let mut outcomes = Vec::new();
                for (haps, p) in contingent.possible_haps() {
                    for (state, q) in contingent.resolve(game, &haps)?.outcomes(game)? {
                        outcomes.push((state, p * q));
                    }
                }
                Ok(outcomes)
            }
        }
    }
}
