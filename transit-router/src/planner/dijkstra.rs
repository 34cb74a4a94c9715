//! Best-first search over graph edges and transfer links.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use super::assemble::RouteAssembler;
use super::config::SearchConfig;
use super::objective::Objective;
use super::search::{Router, SearchError, SearchRequest, SearchResult};
use crate::domain::{Hop, StopId, TransportMode};
use crate::fare::FareTable;
use crate::network::Network;

/// Frontier entry. Ordered so the heap pops the cheapest entry first and,
/// among equal costs, the one pushed earliest.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f64,
    seq: u64,
    stop: StopId,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Dijkstra router.
///
/// Optimal for every objective: all hop weights are non-negative. The
/// mode-change terms make a stop's best cost depend on the mode it was
/// reached by; like the rest of the router this keeps one label per stop,
/// recording the mode of the hop that set its best cost.
pub struct DijkstraRouter<'a> {
    network: &'a Network,
    config: &'a SearchConfig,
    fares: &'a FareTable,
}

impl<'a> DijkstraRouter<'a> {
    pub fn new(network: &'a Network, config: &'a SearchConfig, fares: &'a FareTable) -> Self {
        Self {
            network,
            config,
            fares,
        }
    }
}

impl Router for DijkstraRouter<'_> {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        request.validate(self.network)?;

        let network = self.network;
        let n = network.graph().stop_count();
        let objective = Objective::new(request.mode, self.config);

        let mut best_cost = vec![f64::INFINITY; n];
        let mut predecessor: Vec<Option<Hop<'_>>> = vec![None; n];
        let mut arrival_mode: Vec<TransportMode> = network
            .graph()
            .stops()
            .iter()
            .map(|s| s.mode)
            .collect();
        let mut settled = vec![false; n];

        let mut frontier = BinaryHeap::new();
        let mut seq = 0u64;
        best_cost[request.origin.index()] = 0.0;
        frontier.push(QueueEntry {
            cost: 0.0,
            seq,
            stop: request.origin,
        });

        let mut nodes_explored = 0;

        while let Some(QueueEntry { cost, stop, .. }) = frontier.pop() {
            if settled[stop.index()] {
                continue;
            }
            settled[stop.index()] = true;
            nodes_explored += 1;

            if stop == request.destination {
                let hops = reconstruct(&predecessor, request.origin, stop);
                let route = RouteAssembler::new(network, self.fares).assemble(
                    &hops,
                    request.departure,
                    cost,
                )?;
                debug!(
                    origin = %request.origin,
                    destination = %request.destination,
                    mode = %request.mode,
                    cost,
                    nodes_explored,
                    "Dijkstra found route"
                );
                return Ok(SearchResult::found(route, nodes_explored, 1));
            }

            let current_mode = arrival_mode[stop.index()];
            for hop in network.hops_from(stop) {
                let next = hop.to().index();
                if settled[next] {
                    continue;
                }
                let next_cost = cost + objective.hop_weight(&hop, current_mode);
                if next_cost < best_cost[next] {
                    best_cost[next] = next_cost;
                    predecessor[next] = Some(hop);
                    arrival_mode[next] = hop.mode();
                    seq += 1;
                    frontier.push(QueueEntry {
                        cost: next_cost,
                        seq,
                        stop: hop.to(),
                    });
                    trace!(from = %stop, to = %hop.to(), cost = next_cost, "Relaxed");
                }
            }
        }

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            nodes_explored,
            "Dijkstra found no route"
        );
        Ok(SearchResult::unreachable(nodes_explored, 1))
    }
}

/// Walk predecessors back from `goal` to `origin`.
fn reconstruct<'n>(predecessor: &[Option<Hop<'n>>], origin: StopId, goal: StopId) -> Vec<Hop<'n>> {
    let mut hops = Vec::new();
    let mut at = goal;
    while at != origin {
        match predecessor[at.index()] {
            Some(hop) if hops.len() < predecessor.len() => {
                hops.push(hop);
                at = hop.from();
            }
            _ => break,
        }
    }
    hops.reverse();
    hops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Route;
    use crate::fare::palembang_fares;
    use crate::fixtures::{self, departure, id};
    use crate::planner::OptimizationMode;
    use crate::planner::search::SearchOutcome;

    fn find(network: &Network, from: &str, to: &str, mode: OptimizationMode) -> SearchResult {
        let config = SearchConfig::default();
        let fares = palembang_fares();
        let router = DijkstraRouter::new(network, &config, &fares);
        let request = SearchRequest::new(id(network, from), id(network, to), departure(), mode);
        router.search(&request).unwrap()
    }

    fn stop_names(route: &Route) -> Vec<String> {
        let mut names: Vec<String> = route
            .segments()
            .iter()
            .map(|s| s.from.name().to_string())
            .collect();
        if let Some(last) = route.segments().last() {
            names.push(last.to.name().to_string());
        }
        names
    }

    #[test]
    fn queue_pops_cheapest_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry { cost: 2.0, seq: 0, stop: StopId(0) });
        heap.push(QueueEntry { cost: 1.0, seq: 1, stop: StopId(1) });
        heap.push(QueueEntry { cost: 1.0, seq: 2, stop: StopId(2) });

        assert_eq!(heap.pop().unwrap().stop, StopId(1));
        assert_eq!(heap.pop().unwrap().stop, StopId(2));
        assert_eq!(heap.pop().unwrap().stop, StopId(0));
    }

    #[test]
    fn rides_the_rail_line() {
        let network = fixtures::city();
        let result = find(&network, "lrt_1", "lrt_4", OptimizationMode::Time);
        let route = result.into_route().unwrap();

        assert_eq!(
            stop_names(&route),
            vec!["Bandara SMB II", "Asrama Haji", "Punti Kayu", "DJKA"]
        );
        assert_eq!(route.modes(), vec![TransportMode::Rail]);
        assert_eq!(route.total_fare(), 5000);
        assert_eq!(route.num_transfers(), 0);
        assert!((route.score() - route.total_time_minutes()).abs() < 1e-9);
    }

    #[test]
    fn changes_mode_through_transfer_link() {
        let network = fixtures::city();
        let route = find(&network, "lrt_1", "bus_3", OptimizationMode::Time)
            .into_route()
            .unwrap();

        assert_eq!(
            route.segments().iter().map(|s| s.mode).collect::<Vec<_>>(),
            vec![
                TransportMode::Rail,
                TransportMode::Transfer,
                TransportMode::Bus,
                TransportMode::Bus
            ]
        );
        assert_eq!(route.num_transfers(), 1);
        assert_eq!(route.total_fare(), 15000);
    }

    #[test]
    fn same_stop_is_empty_route() {
        let network = fixtures::city();
        let result = find(&network, "bus_2", "bus_2", OptimizationMode::Balanced);
        let route = result.into_route().unwrap();
        assert!(route.is_empty());
        assert_eq!(route.departure_time(), departure());
    }

    #[test]
    fn unreachable_is_not_an_error() {
        let network = fixtures::city();
        let result = find(&network, "lrt_1", "iso_1", OptimizationMode::Time);
        assert_eq!(result.outcome, SearchOutcome::Unreachable);
        assert!(result.route().is_none());
        // Everything reachable from the origin got settled
        assert_eq!(result.nodes_explored, network.graph().stop_count() - 1);
    }

    #[test]
    fn unknown_stop_is_an_error() {
        let network = fixtures::city();
        let config = SearchConfig::default();
        let fares = palembang_fares();
        let router = DijkstraRouter::new(&network, &config, &fares);
        let request = SearchRequest::new(StopId(0), StopId(500), departure(), OptimizationMode::Time);
        assert_eq!(router.search(&request), Err(SearchError::UnknownStop(StopId(500))));
    }

    #[test]
    fn cost_mode_prefers_free_feeder() {
        let network = fixtures::city();
        let route = find(&network, "f_1", "f_2", OptimizationMode::Cost)
            .into_route()
            .unwrap();
        assert_eq!(route.total_fare(), 0);
        assert_eq!(route.score(), 0.0);
    }
}
