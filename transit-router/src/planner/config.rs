//! Search configuration for the routers.

use std::time::Duration;

use super::objective::BalancedWeights;

/// Configuration parameters shared by both routers.
///
/// The same values drive edge weights, the IDA* heuristic and route
/// scoring, so the routers agree on what "best" means.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Minutes added by the transfers objective when an edge's mode differs
    /// from the mode being ridden.
    pub mode_change_penalty_mins: f64,

    /// Weights of the balanced objective.
    pub weights: BalancedWeights,

    /// Minutes that count as one unit of time in the balanced objective.
    pub time_scale_mins: f64,

    /// Fare that counts as one unit of cost in the balanced objective.
    pub fare_scale: f64,

    /// Trips longer than this (straight line) are assumed to need a second
    /// boarding by the cost heuristic.
    pub long_trip_km: f64,

    /// Maximum IDA* bound-raising iterations.
    pub max_iterations: usize,

    /// Wall-clock limit for one IDA* search (seconds).
    pub timeout_secs: u64,
}

impl SearchConfig {
    /// Create a new configuration with the given limits and default
    /// objective parameters.
    pub fn new(max_iterations: usize, timeout_secs: u64) -> Self {
        Self {
            max_iterations,
            timeout_secs,
            ..Self::default()
        }
    }

    pub fn with_mode_change_penalty(mut self, minutes: f64) -> Self {
        self.mode_change_penalty_mins = minutes;
        self
    }

    pub fn with_weights(mut self, weights: BalancedWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Returns the search timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode_change_penalty_mins: 30.0,
            weights: BalancedWeights::default(),
            time_scale_mins: 60.0,
            fare_scale: 10_000.0,
            long_trip_km: 10.0,
            max_iterations: 1000,
            timeout_secs: 120,
        }
    }
}
