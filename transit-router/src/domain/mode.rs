//! Transportation modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown transport mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transport mode: {0:?}")]
pub struct InvalidTransportMode(String);

/// A way of moving between two stops.
///
/// `Rail`, `Bus` and `Minivan` are revenue modes: boarding one may cost a
/// fare. `Walk` covers door-to-door access and egress, `Transfer` covers
/// derived walking links between stops on different routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TransportMode {
    Rail,
    Bus,
    Minivan,
    Walk,
    Transfer,
}

impl TransportMode {
    /// Every mode, in table order.
    pub const ALL: [TransportMode; 5] = [
        TransportMode::Rail,
        TransportMode::Bus,
        TransportMode::Minivan,
        TransportMode::Walk,
        TransportMode::Transfer,
    ];

    /// Number of modes; size of per-mode lookup tables.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this mode in per-mode lookup tables.
    pub const fn index(self) -> usize {
        match self {
            TransportMode::Rail => 0,
            TransportMode::Bus => 1,
            TransportMode::Minivan => 2,
            TransportMode::Walk => 3,
            TransportMode::Transfer => 4,
        }
    }

    /// Whether boarding this mode can be charged.
    pub const fn is_revenue(self) -> bool {
        matches!(
            self,
            TransportMode::Rail | TransportMode::Bus | TransportMode::Minivan
        )
    }

    /// Nominal travel speed in km/h, used to derive edge durations and the
    /// time heuristic.
    pub const fn nominal_speed_kmh(self) -> f64 {
        match self {
            TransportMode::Rail => 40.0,
            TransportMode::Bus => 25.0,
            TransportMode::Minivan => 20.0,
            TransportMode::Walk | TransportMode::Transfer => 5.0,
        }
    }

    /// Default per-ride fare hint carried by edges of this mode.
    pub const fn default_fare_hint(self) -> u32 {
        match self {
            TransportMode::Rail | TransportMode::Bus => 5000,
            TransportMode::Minivan | TransportMode::Walk | TransportMode::Transfer => 0,
        }
    }

    /// The fastest revenue mode's nominal speed.
    pub fn fastest_speed_kmh() -> f64 {
        Self::ALL
            .iter()
            .filter(|m| m.is_revenue())
            .map(|m| m.nominal_speed_kmh())
            .fold(0.0, f64::max)
    }

    /// Infer a mode from a route name such as `"LRT Sumsel"` or
    /// `"Teman Bus Koridor 2"`. Anything unrecognised is a feeder minivan.
    pub fn from_route_name(route: &str) -> Self {
        let lower = route.to_lowercase();
        if lower.contains("lrt") || lower.contains("rail") {
            TransportMode::Rail
        } else if lower.contains("bus") {
            TransportMode::Bus
        } else {
            TransportMode::Minivan
        }
    }

    /// Lowercase name as used in network files and route output.
    pub const fn as_str(self) -> &'static str {
        match self {
            TransportMode::Rail => "rail",
            TransportMode::Bus => "bus",
            TransportMode::Minivan => "minivan",
            TransportMode::Walk => "walk",
            TransportMode::Transfer => "transfer",
        }
    }
}

impl FromStr for TransportMode {
    type Err = InvalidTransportMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rail" | "lrt" => Ok(TransportMode::Rail),
            "bus" | "teman_bus" => Ok(TransportMode::Bus),
            "minivan" | "feeder" | "feeder_angkot" | "angkot" => Ok(TransportMode::Minivan),
            "walk" => Ok(TransportMode::Walk),
            "transfer" => Ok(TransportMode::Transfer),
            _ => Err(InvalidTransportMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for TransportMode {
    type Error = InvalidTransportMode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
