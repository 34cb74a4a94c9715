//! Scoring and ranking finished routes.
//!
//! Door-to-door planning produces one candidate route per origin and
//! destination stop pair; these functions pick the best one under the
//! requested objective.

use std::cmp::Ordering;

use super::config::SearchConfig;
use super::objective::OptimizationMode;
use crate::domain::Route;

/// Score of a complete route under `mode`. Lower is better.
///
/// Uses the same terms as the routers' hop weights, applied to the route's
/// totals: realized fare rather than per-edge hints, and counted transfers
/// rather than raw mode changes.
pub fn route_score(route: &Route, mode: OptimizationMode, config: &SearchConfig) -> f64 {
    let minutes = route.total_time_minutes();
    let fare = f64::from(route.total_fare());
    let transfers = route.num_transfers() as f64;
    match mode {
        OptimizationMode::Time => minutes,
        OptimizationMode::Cost => fare,
        OptimizationMode::Transfers => minutes + transfers * config.mode_change_penalty_mins,
        OptimizationMode::Balanced => config.weights.combine(
            minutes / config.time_scale_mins,
            fare / config.fare_scale,
            transfers,
        ),
    }
}

/// Rank routes by preference.
///
/// Routes are ranked by:
/// 1. Score under `mode` (lower is better)
/// 2. Arrival time (earlier is better)
/// 3. Number of transfers (fewer is better)
/// 4. Total fare (cheaper is better)
///
/// Returns routes sorted best-first. The sort is stable.
pub fn rank_routes(mut routes: Vec<Route>, mode: OptimizationMode, config: &SearchConfig) -> Vec<Route> {
    routes.sort_by(|a, b| compare(a, b, mode, config));
    routes
}

/// The best route under `mode`, if any.
pub fn best_route(routes: Vec<Route>, mode: OptimizationMode, config: &SearchConfig) -> Option<Route> {
    routes
        .into_iter()
        .min_by(|a, b| compare(a, b, mode, config))
}

fn compare(a: &Route, b: &Route, mode: OptimizationMode, config: &SearchConfig) -> Ordering {
    route_score(a, mode, config)
        .total_cmp(&route_score(b, mode, config))
        .then_with(|| a.arrival_time().cmp(&b.arrival_time()))
        .then_with(|| a.num_transfers().cmp(&b.num_transfers()))
        .then_with(|| a.total_fare().cmp(&b.total_fare()))
}


#[cfg(test)]
mod proptests {
    use super::tests::make_route;
    use super::*;
    use crate::domain::TransportMode;
    use proptest::prelude::*;

    fn mode() -> impl Strategy<Value = OptimizationMode> {
        prop::sample::select(OptimizationMode::ALL.to_vec())
    }

    fn route_strategy() -> impl Strategy<Value = Route> {
        (
            prop::collection::vec(
                (prop::sample::select(TransportMode::ALL.to_vec()), 1.0f64..60.0),
                1..5,
            ),
            0u32..30_000,
        )
            .prop_map(|(legs, fare)| make_route(&legs, fare))
    }

    proptest! {
        #[test]
        fn rank_routes_is_sorted(routes in prop::collection::vec(route_strategy(), 0..8), mode in mode()) {
            let config = SearchConfig::default();
            let ranked = rank_routes(routes, mode, &config);
            for pair in ranked.windows(2) {
                prop_assert!(
                    route_score(&pair[0], mode, &config) <= route_score(&pair[1], mode, &config)
                );
            }
        }

        #[test]
        fn rank_routes_preserves_elements(routes in prop::collection::vec(route_strategy(), 0..8), mode in mode()) {
            let config = SearchConfig::default();
            let ranked = rank_routes(routes.clone(), mode, &config);
            prop_assert_eq!(ranked.len(), routes.len());
            for route in &routes {
                prop_assert!(ranked.contains(route));
            }
        }

        #[test]
        fn best_route_is_first_ranked(routes in prop::collection::vec(route_strategy(), 1..8), mode in mode()) {
            let config = SearchConfig::default();
            let best = best_route(routes.clone(), mode, &config).unwrap();
            let ranked = rank_routes(routes, mode, &config);
            prop_assert_eq!(
                route_score(&best, mode, &config),
                route_score(&ranked[0], mode, &config)
            );
        }
    }
}
