//! Simulation player configuration and budgets.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Simulations run when neither a count nor a time cap is configured.
pub const DEFAULT_SIMULATIONS: u32 = 30;

/// Configuration shared by [`MonteCarloPlayer`](super::MonteCarloPlayer)
/// and [`UCTPlayer`](super::UCTPlayer).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// UCB1 exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Simulations per decision (`None` = no count limit).
    pub simulation_count: Option<u32>,

    /// Wall-clock cap per decision (`None` = no time limit).
    /// Checked only between complete simulations.
    pub time_cap: Option<Duration>,

    /// Playout depth at which non-terminal states are valued by the heuristic.
    pub horizon: u32,

    /// Random seed for sampling, playouts and tie-breaking.
    /// Same seed produces deterministic searches.
    pub seed: u64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            simulation_count: Some(DEFAULT_SIMULATIONS),
            time_cap: None,
            horizon: 500,
            seed: 42,
        }
    }
}

impl MCTSConfig {
    /// Set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Set the simulation count (`None` removes the limit).
    pub fn with_simulations(mut self, count: impl Into<Option<u32>>) -> Self {
        self.simulation_count = count.into();
        self
    }

    /// Set the time cap (`None` removes the limit).
    pub fn with_time_cap(mut self, cap: impl Into<Option<Duration>>) -> Self {
        self.time_cap = cap.into();
        self
    }

    /// Set the playout horizon.
    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Per-decision simulation budget.
///
/// Exhausted once the simulation count is reached or the time cap has
/// elapsed, whichever comes first. With neither configured it falls back to
/// [`DEFAULT_SIMULATIONS`].
#[derive(Clone, Debug)]
pub struct Budget {
    limit: Option<u32>,
    deadline: Option<Instant>,
    simulations: u32,
}

impl Budget {
    /// Start a budget now.
    pub fn start(config: &MCTSConfig) -> Self {
        let deadline = config.time_cap.map(|cap| Instant::now() + cap);
        let limit = match (config.simulation_count, deadline) {
            (None, None) => Some(DEFAULT_SIMULATIONS),
            (count, _) => count,
        };
        Self {
            limit,
            deadline,
            simulations: 0,
        }
    }

    /// Record a complete simulation.
    pub fn record(&mut self) {
        self.simulations += 1;
    }

    /// Simulations recorded so far.
    #[must_use]
    pub fn simulations(&self) -> u32 {
        self.simulations
    }

    /// Check if no further simulation should start.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.simulations >= limit)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
