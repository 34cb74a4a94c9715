//! Remaining-cost estimates for IDA*.
//!
//! The time estimate is a true lower bound: no revenue mode is faster than
//! rail, and nothing beats a straight line. The cost estimate charges at
//! least one cheapest boarding, but transfer links are free and may reach
//! the goal without any ride, so it is a lower bound only when some revenue
//! mode is free (`cheapest_boarding() == 0`). The transfers estimate is a
//! banded guess from straight-line distance and can overestimate. Where an
//! estimate overshoots, IDA* is not guaranteed optimal; Dijkstra does not
//! use these estimates.

use super::config::SearchConfig;
use super::objective::OptimizationMode;
use crate::domain::{Stop, StopId, TransportMode};
use crate::fare::FareTable;
use crate::network::Network;

/// Minutes to cover `distance_km` at rail speed.
pub fn time_estimate(distance_km: f64) -> f64 {
    distance_km / TransportMode::fastest_speed_kmh() * 60.0
}

/// Fare estimate: one cheapest boarding, two on long trips.
pub fn cost_estimate(distance_km: f64, cheapest_boarding: u32, long_trip_km: f64) -> f64 {
    let boardings = if distance_km > long_trip_km { 2.0 } else { 1.0 };
    f64::from(cheapest_boarding) * boardings
}

/// Mode changes still needed, guessed from distance.
pub fn transfer_estimate(same_route: bool, distance_km: f64) -> f64 {
    if same_route {
        0.0
    } else if distance_km < 5.0 {
        1.0
    } else if distance_km < 15.0 {
        2.0
    } else {
        3.0
    }
}

/// Estimator towards a fixed goal.
#[derive(Debug, Clone, Copy)]
pub struct Heuristic<'a> {
    network: &'a Network,
    goal: &'a Stop,
    mode: OptimizationMode,
    config: &'a SearchConfig,
    cheapest_boarding: u32,
}

impl<'a> Heuristic<'a> {
    pub fn new(
        network: &'a Network,
        goal: &'a Stop,
        mode: OptimizationMode,
        config: &'a SearchConfig,
        fares: &FareTable,
    ) -> Self {
        Self {
            network,
            goal,
            mode,
            config,
            cheapest_boarding: fares.cheapest_boarding(),
        }
    }

    pub fn goal(&self) -> StopId {
        self.goal.id
    }

    /// Estimated remaining cost from `from` to the goal.
    ///
    /// Unknown stops and the goal itself estimate to zero.
    pub fn estimate(&self, from: StopId) -> f64 {
        let Some(stop) = self.network.stop(from) else {
            return 0.0;
        };
        if stop.id == self.goal.id {
            return 0.0;
        }

        let distance = stop.distance_km_to(self.goal);
        let same_route = stop.same_route(self.goal);
        match self.mode {
            OptimizationMode::Time => time_estimate(distance),
            OptimizationMode::Cost => self.cost(distance),
            OptimizationMode::Transfers => transfer_estimate(same_route, distance),
            OptimizationMode::Balanced => self.config.weights.combine(
                time_estimate(distance) / self.config.time_scale_mins,
                self.cost(distance) / self.config.fare_scale,
                transfer_estimate(same_route, distance),
            ),
        }
    }

    fn cost(&self, distance: f64) -> f64 {
        cost_estimate(distance, self.cheapest_boarding, self.config.long_trip_km)
    }
}
