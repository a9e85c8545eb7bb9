//! Counters filled in by search and simulation players on every decision.

use serde::{Deserialize, Serialize};

/// What the last decision cost.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// States visited (exhaustive search) or tree nodes built (UCT).
    pub nodes: u64,
    /// Root evaluations (exhaustive search) or tree iterations (UCT).
    pub iterations: u32,
    /// Playouts run.
    pub simulations: u32,
    pub max_depth: u32,
    pub time_us: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Count a state visited at `depth`.
    pub fn visit(&mut self, depth: u32) {
        self.nodes += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Playouts per second of decision time, 0 when no time was measured.
    #[must_use]
    pub fn simulation_rate(&self) -> f64 {
        if self.time_us == 0 {
            return 0.0;
        }
        f64::from(self.simulations) * 1e6 / self.time_us as f64
    }
}
