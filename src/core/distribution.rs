//! Chance variables: distributions, named aleatories and resolved haps.
//!
//! A transition that depends on chance (a die roll, a card draw) declares
//! its pending random variables as [`Aleatory`] values. Simulation players
//! *sample* one value per variable; exhaustive search *enumerates* every
//! combination with its joint probability.
//!
//! Hap values are `i64`, the same encoding games use for any other state
//! value: booleans as 0/1, enums as discriminants, indices as-is.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::GameError;
use super::rng::GameRng;

/// Tolerance on the sum of probabilities.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Finite discrete distribution over values of `T`.
///
/// Probabilities are non-negative and sum to 1 (within
/// [`PROBABILITY_TOLERANCE`]); construction fails otherwise.
///
/// ```
/// use ludorum::core::Distribution;
///
/// let coin = Distribution::uniform(vec!["heads", "tails"]).unwrap();
/// assert_eq!(coin.probability(&"heads"), 0.5);
///
/// let loaded = Distribution::new(vec![(1, 0.9), (2, 0.2)]);
/// assert!(loaded.is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution<T> {
    outcomes: SmallVec<[(T, f64); 6]>,
}

impl<T> Distribution<T> {
    /// Build a distribution from (value, probability) pairs.
    pub fn new(outcomes: Vec<(T, f64)>) -> Result<Self, GameError> {
        if outcomes.is_empty() {
            return Err(GameError::EmptyDistribution);
        }
        if outcomes.iter().any(|(_, p)| *p < 0.0 || p.is_nan()) {
            return Err(GameError::NegativeProbability);
        }

        let sum: f64 = outcomes.iter().map(|(_, p)| p).sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(GameError::InvalidDistribution { sum });
        }

        Ok(Self {
            outcomes: SmallVec::from_vec(outcomes),
        })
    }

    /// Equiprobable distribution over the given values.
    pub fn uniform(values: Vec<T>) -> Result<Self, GameError> {
        let p = 1.0 / values.len().max(1) as f64;
        Self::new(values.into_iter().map(|v| (v, p)).collect())
    }

    /// Iterate over (value, probability) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> {
        self.outcomes.iter().map(|(v, p)| (v, *p))
    }

    /// Number of outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Distributions are never empty; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Sample one value.
    pub fn sample(&self, rng: &mut GameRng) -> &T {
        let weights: SmallVec<[f64; 6]> = self.outcomes.iter().map(|(_, p)| *p).collect();
        let idx = rng.choose_weighted(&weights).unwrap_or(0);
        &self.outcomes[idx].0
    }

    /// Total probability of a value.
    #[must_use]
    pub fn probability(&self, value: &T) -> f64
    where
        T: PartialEq,
    {
        self.outcomes
            .iter()
            .filter(|(v, _)| v == value)
            .map(|(_, p)| p)
            .sum()
    }
}

impl Distribution<i64> {
    /// Fair die with faces `1..=sides`.
    pub fn die(sides: u32) -> Result<Self, GameError> {
        Self::uniform((1..=i64::from(sides)).collect())
    }
}

/// A named random variable that must be resolved before a transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aleatory {
    /// Hap name, unique within one transition.
    pub name: String,

    /// Distribution of the variable.
    pub distribution: Distribution<i64>,
}

impl Aleatory {
    /// Create a new aleatory.
    pub fn new(name: impl Into<String>, distribution: Distribution<i64>) -> Self {
        Self {
            name: name.into(),
            distribution,
        }
    }
}

/// Concrete values of resolved chance variables, by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Haps {
    values: FxHashMap<String, i64>,
}

impl Haps {
    /// No resolved haps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Haps with a single resolved value.
    pub fn single(name: impl Into<String>, value: i64) -> Self {
        let mut haps = Self::new();
        haps.insert(name, value);
        haps
    }

    /// Get a resolved value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    /// Get a resolved value, or fail with `MissingHap`.
    pub fn require(&self, name: &str) -> Result<i64, GameError> {
        self.get(name).ok_or_else(|| GameError::MissingHap {
            name: name.to_string(),
        })
    }

    /// Check if a hap has been resolved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Record a resolved value.
    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        self.values.insert(name.into(), value);
    }

    /// Copy every value of `other` into `self`, overwriting duplicates.
    pub fn merge(&mut self, other: &Haps) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), *value);
        }
    }

    /// Number of resolved haps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing has been resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (name, value) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
