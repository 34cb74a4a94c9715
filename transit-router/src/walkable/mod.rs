//! Walking transfers between stops on different routes.
//!
//! The network data has no explicit interchange edges. Two stops on
//! different routes that are close enough to walk between are joined by a
//! derived transfer link, computed once per graph and queried identically
//! by every router.

use tracing::debug;

use crate::domain::{StopId, TransferLink};
use crate::network::Graph;

/// Parameters for deriving transfer links.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferConfig {
    /// Maximum straight-line distance between linked stops.
    pub max_walk_km: f64,

    /// Walking speed used to turn distance into time.
    pub walking_speed_kmh: f64,

    /// Fixed time added to every transfer for finding the platform, waiting
    /// and so on.
    pub transfer_penalty_minutes: f64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_walk_km: 0.5,
            walking_speed_kmh: 5.0,
            transfer_penalty_minutes: 5.0,
        }
    }
}

impl TransferConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_walk_km(mut self, km: f64) -> Self {
        self.max_walk_km = km;
        self
    }

    pub fn with_transfer_penalty_minutes(mut self, minutes: f64) -> Self {
        self.transfer_penalty_minutes = minutes;
        self
    }

    /// Minutes to walk `distance_km`, without the transfer penalty.
    pub fn walking_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.walking_speed_kmh * 60.0
    }

    /// Minutes for a transfer over `distance_km`, penalty included.
    pub fn transfer_minutes(&self, distance_km: f64) -> f64 {
        self.walking_minutes(distance_km) + self.transfer_penalty_minutes
    }
}

/// Transfer links of a graph, grouped by origin stop.
#[derive(Debug, Clone, Default)]
pub struct TransferLinks {
    by_stop: Vec<Vec<TransferLink>>,
    count: usize,
}

impl TransferLinks {
    /// Link every pair of stops on different routes within walking range.
    pub fn build(graph: &Graph, config: &TransferConfig) -> Self {
        Self::build_masked(graph, config, None)
    }

    /// Like [`TransferLinks::build`], but only pairs stops whose `active`
    /// flag is set. Inactive stops get no links.
    pub fn build_masked(graph: &Graph, config: &TransferConfig, active: Option<&[bool]>) -> Self {
        let stops = graph.stops();
        let is_active = |index: usize| {
            active.is_none_or(|mask| mask.get(index).copied().unwrap_or(false))
        };

        let mut by_stop: Vec<Vec<TransferLink>> = vec![Vec::new(); stops.len()];
        let mut count = 0;

        // Distance is symmetric, so each unordered pair is measured once and
        // linked in both directions.
        for (i, a) in stops.iter().enumerate() {
            if !is_active(i) {
                continue;
            }
            for (j, b) in stops.iter().enumerate().skip(i + 1) {
                if !is_active(j) || a.same_route(b) {
                    continue;
                }

                let distance_km = a.distance_km_to(b);
                if distance_km.is_nan() || distance_km > config.max_walk_km {
                    continue;
                }

                let duration_minutes = config.transfer_minutes(distance_km);
                by_stop[i].push(TransferLink {
                    from: a.id,
                    to: b.id,
                    distance_km,
                    duration_minutes,
                });
                by_stop[j].push(TransferLink {
                    from: b.id,
                    to: a.id,
                    distance_km,
                    duration_minutes,
                });
                count += 2;
            }
        }

        // Keep each stop's links ordered by target id regardless of which
        // side of the pair loop produced them.
        for links in &mut by_stop {
            links.sort_by_key(|link| link.to);
        }

        debug!(
            stops = stops.len(),
            links = count,
            max_walk_km = config.max_walk_km,
            "Built transfer links"
        );

        Self { by_stop, count }
    }

    /// Transfer links leaving a stop, ordered by target id.
    pub fn from(&self, stop: StopId) -> &[TransferLink] {
        self.by_stop.get(stop.index()).map_or(&[], Vec::as_slice)
    }

    /// The link between two stops, if they are within walking range.
    pub fn get(&self, from: StopId, to: StopId) -> Option<&TransferLink> {
        self.from(from).iter().find(|link| link.to == to)
    }

    pub fn is_walkable(&self, from: StopId, to: StopId) -> bool {
        self.get(from, to).is_some()
    }

    /// Number of directed links.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportMode;
    use crate::geo::lat_offset_deg;
    use crate::network::NewStop;

    const BASE_LAT: f64 = -2.99;
    const LON: f64 = 104.76;

    fn graph(stops: &[(&str, f64, &str)]) -> Graph {
        let mut builder = Graph::builder();
        for (code, north_km, route) in stops {
            builder
                .add_stop(NewStop::new(
                    *code,
                    *code,
                    BASE_LAT + lat_offset_deg(*north_km),
                    LON,
                    TransportMode::from_route_name(route),
                    *route,
                ))
                .unwrap();
        }
        builder.build()
    }

    #[test]
    fn empty_graph_has_no_links() {
        let links = TransferLinks::build(&Graph::default(), &TransferConfig::default());
        assert!(links.is_empty());
        assert_eq!(links.len(), 0);
        assert!(links.from(StopId(0)).is_empty());
    }

    #[test]
    fn links_nearby_stops_on_different_routes() {
        let g = graph(&[("a", 0.0, "Koridor 1"), ("b", 0.3, "LRT Sumsel")]);
        let links = TransferLinks::build(&g, &TransferConfig::default());

        assert_eq!(links.len(), 2);
        let link = links.get(StopId(0), StopId(1)).unwrap();
        assert!((link.distance_km - 0.3).abs() < 1e-6);
        assert!((link.duration_minutes - 8.6).abs() < 1e-4);

        // Symmetric
        let back = links.get(StopId(1), StopId(0)).unwrap();
        assert_eq!(back.duration_minutes, link.duration_minutes);
    }

    #[test]
    fn same_route_is_never_linked() {
        let g = graph(&[("a", 0.0, "Koridor 1"), ("b", 0.3, "Koridor 1")]);
        let links = TransferLinks::build(&g, &TransferConfig::default());
        assert!(links.is_empty());
        assert!(!links.is_walkable(StopId(0), StopId(1)));
    }

    #[test]
    fn respects_radius() {
        let g = graph(&[("a", 0.0, "Koridor 1"), ("b", 0.6, "LRT Sumsel")]);
        assert!(TransferLinks::build(&g, &TransferConfig::default()).is_empty());

        let wide = TransferConfig::new().with_max_walk_km(1.0);
        assert_eq!(TransferLinks::build(&g, &wide).len(), 2);
    }

    #[test]
    fn mask_excludes_inactive_stops() {
        let g = graph(&[
            ("a", 0.0, "Koridor 1"),
            ("b", 0.1, "LRT Sumsel"),
            ("c", 0.2, "Feeder 3"),
        ]);
        let all = TransferLinks::build(&g, &TransferConfig::default());
        assert_eq!(all.len(), 6);

        let mask = [true, false, true];
        let masked = TransferLinks::build_masked(&g, &TransferConfig::default(), Some(&mask));
        assert_eq!(masked.len(), 2);
        assert!(masked.is_walkable(StopId(0), StopId(2)));
        assert!(masked.from(StopId(1)).is_empty());
    }

    #[test]
    fn links_are_ordered_by_target() {
        let g = graph(&[
            ("a", 0.0, "Koridor 1"),
            ("b", 0.1, "LRT Sumsel"),
            ("c", 0.2, "Feeder 3"),
        ]);
        let links = TransferLinks::build(&g, &TransferConfig::default());
        let targets: Vec<_> = links.from(StopId(1)).iter().map(|l| l.to).collect();
        assert_eq!(targets, vec![StopId(0), StopId(2)]);
    }

    #[test]
    fn penalty_is_configurable() {
        let config = TransferConfig::new().with_transfer_penalty_minutes(0.0);
        assert!((config.transfer_minutes(0.5) - 6.0).abs() < 1e-9);
        assert!((TransferConfig::default().transfer_minutes(0.5) - 11.0).abs() < 1e-9);
    }
}
