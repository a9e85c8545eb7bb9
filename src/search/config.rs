//! Exhaustive search configuration.

use serde::{Deserialize, Serialize};

/// Exhaustive search configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Depth at which non-terminal states are valued by the heuristic.
    /// Root actions lead to depth 1. A chance node takes one level of its
    /// own, so outcomes of a root roll sit at depth 2.
    pub horizon: u32,

    /// Seed for the heuristic RNG and root tie-breaking.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            horizon: 4,
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Set the search horizon.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.horizon, 4);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default().with_horizon(9).with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
