//! Stop types.

use std::fmt;

use super::TransportMode;

/// Dense index of a stop within its graph.
///
/// Ids are assigned in load order starting from zero, so per-search state
/// can live in plain vectors indexed by `StopId`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub(crate) u32);

impl StopId {
    /// Returns the id as a vector index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        StopId(index as u32)
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A boarding/alighting point on one route.
///
/// Immutable once loaded. `code` is the stable external identifier from the
/// network data; `id` is the graph-local index.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub mode: TransportMode,
    pub route: String,
}

impl Stop {
    /// Straight-line distance to another stop in kilometres.
    pub fn distance_km_to(&self, other: &Stop) -> f64 {
        crate::geo::distance_km(self.lat, self.lon, other.lat, other.lon)
    }

    /// Straight-line distance to an arbitrary coordinate in kilometres.
    pub fn distance_km_to_point(&self, lat: f64, lon: f64) -> f64 {
        crate::geo::distance_km(self.lat, self.lon, lat, lon)
    }

    /// Whether both stops belong to the same route.
    pub fn same_route(&self, other: &Stop) -> bool {
        self.route == other.route
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.route, self.mode)
    }
}
