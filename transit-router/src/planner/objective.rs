//! Optimization objectives and per-hop weights.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::SearchConfig;
use crate::domain::{Edge, Hop, TransferLink, TransportMode};

/// Error returned when parsing an unknown optimization mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid optimization mode: {0:?} (expected time, cost, transfers or balanced)")]
pub struct InvalidOptimizationMode(String);

/// What a search minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationMode {
    /// Total travel minutes.
    #[default]
    Time,
    /// Fare hints of ridden edges.
    Cost,
    /// Travel minutes plus a penalty per mode change.
    Transfers,
    /// Weighted blend of normalized time, fare and mode changes.
    Balanced,
}

impl OptimizationMode {
    pub const ALL: [OptimizationMode; 4] = [
        OptimizationMode::Time,
        OptimizationMode::Cost,
        OptimizationMode::Transfers,
        OptimizationMode::Balanced,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            OptimizationMode::Time => "time",
            OptimizationMode::Cost => "cost",
            OptimizationMode::Transfers => "transfers",
            OptimizationMode::Balanced => "balanced",
        }
    }
}

impl FromStr for OptimizationMode {
    type Err = InvalidOptimizationMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" | "fastest" => Ok(OptimizationMode::Time),
            "cost" | "fare" | "cheapest" => Ok(OptimizationMode::Cost),
            "transfers" => Ok(OptimizationMode::Transfers),
            "balanced" => Ok(OptimizationMode::Balanced),
            _ => Err(InvalidOptimizationMode(s.to_string())),
        }
    }
}

impl fmt::Display for OptimizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weights of the balanced objective. They need not sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedWeights {
    pub time: f64,
    pub cost: f64,
    pub transfers: f64,
}

impl BalancedWeights {
    pub fn new(time: f64, cost: f64, transfers: f64) -> Self {
        Self {
            time,
            cost,
            transfers,
        }
    }

    /// Combine normalized components.
    pub fn combine(&self, time_units: f64, cost_units: f64, transfer_units: f64) -> f64 {
        self.time * time_units + self.cost * cost_units + self.transfers * transfer_units
    }
}

impl Default for BalancedWeights {
    fn default() -> Self {
        Self::new(0.4, 0.3, 0.3)
    }
}

/// Per-hop weight function for one optimization mode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Objective<'a> {
    mode: OptimizationMode,
    config: &'a SearchConfig,
}

impl<'a> Objective<'a> {
    pub(crate) fn new(mode: OptimizationMode, config: &'a SearchConfig) -> Self {
        Self { mode, config }
    }

    /// Weight of taking `hop` while riding `current`.
    pub(crate) fn hop_weight(&self, hop: &Hop<'_>, current: TransportMode) -> f64 {
        match hop {
            Hop::Ride(edge) => self.edge_weight(edge, current),
            Hop::Walk(link) => self.link_weight(link),
        }
    }

    fn edge_weight(&self, edge: &Edge, current: TransportMode) -> f64 {
        let mode_change = edge.mode != current;
        match self.mode {
            OptimizationMode::Time => edge.duration_minutes,
            OptimizationMode::Cost => f64::from(edge.fare),
            OptimizationMode::Transfers => {
                let penalty = if mode_change {
                    self.config.mode_change_penalty_mins
                } else {
                    0.0
                };
                edge.duration_minutes + penalty
            }
            OptimizationMode::Balanced => self.config.weights.combine(
                edge.duration_minutes / self.config.time_scale_mins,
                f64::from(edge.fare) / self.config.fare_scale,
                if mode_change { 1.0 } else { 0.0 },
            ),
        }
    }

    fn link_weight(&self, link: &TransferLink) -> f64 {
        match self.mode {
            OptimizationMode::Time | OptimizationMode::Transfers => link.duration_minutes,
            OptimizationMode::Cost => 0.0,
            OptimizationMode::Balanced => {
                self.config.weights.time * link.duration_minutes / self.config.time_scale_mins
            }
        }
    }
}
