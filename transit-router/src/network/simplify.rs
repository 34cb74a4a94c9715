//! Search-space reduction around a query.
//!
//! IDA* re-expands the same subtree on every iteration, so on a large
//! network it pays to drop stops that are far from both ends of the trip
//! before searching. Stop ids are preserved: a route found on the
//! simplified network is a valid route on the full one.

use tracing::debug;

use super::Network;
use crate::domain::{StopId, TransportMode};
use crate::geo::distance_km;
use crate::walkable::TransferLinks;

/// Parameters for [`Network::simplified`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifyConfig {
    /// Search radius as a multiple of the longest origin/destination
    /// distance.
    pub radius_factor: f64,

    /// Lower bound on the search radius.
    pub min_radius_km: f64,

    /// Keep every rail stop regardless of distance.
    pub keep_rail: bool,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            radius_factor: 1.2,
            min_radius_km: 2.0,
            keep_rail: true,
        }
    }
}

impl SimplifyConfig {
    /// Radius around each endpoint within which stops are kept.
    pub fn radius_km(&self, longest_trip_km: f64) -> f64 {
        (longest_trip_km * self.radius_factor).max(self.min_radius_km)
    }
}

impl Network {
    /// Restrict the network to stops relevant to trips between `origins`
    /// and `destinations`.
    ///
    /// Kept: the endpoints themselves, every rail stop (if configured) and
    /// every stop strictly within the search radius of any endpoint.
    /// Transfer links are rebuilt over the kept stops only.
    pub fn simplified(
        &self,
        origins: &[StopId],
        destinations: &[StopId],
        config: &SimplifyConfig,
    ) -> Network {
        let coords = |ids: &[StopId]| -> Vec<(f64, f64)> {
            ids.iter()
                .filter_map(|id| self.graph.stop(*id))
                .map(|s| (s.lat, s.lon))
                .collect()
        };
        let origin_coords = coords(origins);
        let dest_coords = coords(destinations);

        let longest = origin_coords
            .iter()
            .flat_map(|o| dest_coords.iter().map(move |d| distance_km(o.0, o.1, d.0, d.1)))
            .fold(0.0, f64::max);
        let radius = config.radius_km(longest);

        let mut keep = vec![false; self.graph.stop_count()];
        for stop in self.graph.stops() {
            let near = origin_coords
                .iter()
                .chain(&dest_coords)
                .any(|&(lat, lon)| stop.distance_km_to_point(lat, lon) < radius);
            keep[stop.id.index()] = near || (config.keep_rail && stop.mode == TransportMode::Rail);
        }
        for id in origins.iter().chain(destinations) {
            if let Some(flag) = keep.get_mut(id.index()) {
                *flag = true;
            }
        }

        let graph = self.graph.restricted(&keep);
        let transfers = TransferLinks::build_masked(&graph, &self.transfer_config, Some(&keep));
        debug!(
            kept = keep.iter().filter(|k| **k).count(),
            total = keep.len(),
            radius_km = radius,
            "Simplified network"
        );

        Network {
            graph,
            transfers,
            transfer_config: self.transfer_config.clone(),
        }
    }
}
