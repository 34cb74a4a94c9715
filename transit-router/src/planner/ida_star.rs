//! Iterative-deepening A* over graph edges and transfer links.
//!
//! Each iteration is a depth-first search that prunes any child whose
//! estimated total `g + h` exceeds the current bound. The next bound is the
//! smallest estimate that was pruned. The search runs on an explicit stack
//! so path length is not limited by the thread's stack.

use std::time::Instant;

use tracing::{debug, trace, warn};

use super::assemble::RouteAssembler;
use super::config::SearchConfig;
use super::heuristic::Heuristic;
use super::objective::Objective;
use super::search::{Router, SearchError, SearchOutcome, SearchRequest, SearchResult};
use crate::domain::{Edge, Hop, StopId, TransferLink, TransportMode};
use crate::fare::FareTable;
use crate::network::Network;

/// One stop on the current depth-first path.
struct Frame<'n> {
    stop: StopId,
    /// Cost from the origin to this stop along the current path.
    g: f64,
    /// Mode this stop was reached by.
    mode: TransportMode,
    /// Hop that led here; `None` for the origin.
    via: Option<Hop<'n>>,
    edges: &'n [Edge],
    links: &'n [TransferLink],
    /// Next neighbor to try: edges first, then transfer links.
    cursor: usize,
}

impl<'n> Frame<'n> {
    fn new(
        network: &'n Network,
        stop: StopId,
        g: f64,
        mode: TransportMode,
        via: Option<Hop<'n>>,
    ) -> Self {
        Self {
            stop,
            g,
            mode,
            via,
            edges: network.graph().neighbors(stop),
            links: network.transfers().from(stop),
            cursor: 0,
        }
    }

    fn next_hop(&mut self) -> Option<Hop<'n>> {
        let i = self.cursor;
        self.cursor += 1;
        if let Some(edge) = self.edges.get(i) {
            Some(Hop::Ride(edge))
        } else {
            self.links.get(i - self.edges.len()).map(Hop::Walk)
        }
    }
}

/// Outcome of one bounded depth-first pass.
enum Pass<'n> {
    Found { hops: Vec<Hop<'n>>, cost: f64 },
    /// Smallest pruned estimate, or infinity if nothing was pruned.
    Exceeded(f64),
}

/// IDA* router.
///
/// Optimal for the time objective, whose estimate never overestimates.
/// Optimal for cost only when some revenue mode is free, so that
/// `FareTable::cheapest_boarding() == 0`: otherwise the estimate charges a
/// boarding even where the goal is one free transfer link away. For
/// transfers and balanced the estimate can overshoot as well. In all these
/// cases the route found may cost more than Dijkstra's.
pub struct IdaStarRouter<'a> {
    network: &'a Network,
    config: &'a SearchConfig,
    fares: &'a FareTable,
}

impl<'a> IdaStarRouter<'a> {
    pub fn new(network: &'a Network, config: &'a SearchConfig, fares: &'a FareTable) -> Self {
        Self {
            network,
            config,
            fares,
        }
    }

    /// Depth-first pass from `origin` pruning at `bound`.
    ///
    /// `on_path` must be all false on entry and is all false again when the
    /// pass returns `Exceeded`.
    fn bounded_pass(
        &self,
        origin: StopId,
        bound: f64,
        objective: &Objective<'_>,
        heuristic: &Heuristic<'_>,
        on_path: &mut [bool],
        nodes_explored: &mut usize,
    ) -> Pass<'a> {
        let network = self.network;
        let goal = heuristic.goal();
        let origin_mode = network
            .stop(origin)
            .map_or(TransportMode::Walk, |s| s.mode);

        let mut stack = vec![Frame::new(network, origin, 0.0, origin_mode, None)];
        on_path[origin.index()] = true;
        let mut next_bound = f64::INFINITY;

        loop {
            let Some(top) = stack.last_mut() else {
                break;
            };
            let Some(hop) = top.next_hop() else {
                on_path[top.stop.index()] = false;
                stack.pop();
                continue;
            };
            let (g_parent, mode_parent) = (top.g, top.mode);

            let child = hop.to();
            if on_path[child.index()] {
                continue;
            }

            let g = g_parent + objective.hop_weight(&hop, mode_parent);
            let f = g + heuristic.estimate(child);
            *nodes_explored += 1;

            if f > bound {
                next_bound = next_bound.min(f);
                continue;
            }

            if child == goal {
                let hops = stack
                    .iter()
                    .filter_map(|frame| frame.via)
                    .chain(std::iter::once(hop))
                    .collect();
                return Pass::Found { hops, cost: g };
            }

            on_path[child.index()] = true;
            stack.push(Frame::new(network, child, g, hop.mode(), Some(hop)));
        }

        Pass::Exceeded(next_bound)
    }
}

impl Router for IdaStarRouter<'_> {
    fn name(&self) -> &'static str {
        "ida_star"
    }

    fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        request.validate(self.network)?;

        let started = Instant::now();
        let max_iterations = request
            .budget
            .max_iterations
            .unwrap_or(self.config.max_iterations);
        let timeout = request.budget.timeout.unwrap_or_else(|| self.config.timeout());
        let assembler = RouteAssembler::new(self.network, self.fares);

        if request.origin == request.destination {
            let route = assembler.assemble(&[], request.departure, 0.0)?;
            return Ok(SearchResult::found(route, 0, 0));
        }

        let Some(goal) = self.network.stop(request.destination) else {
            return Err(SearchError::UnknownStop(request.destination));
        };
        let objective = Objective::new(request.mode, self.config);
        let heuristic = Heuristic::new(self.network, goal, request.mode, self.config, self.fares);

        let mut on_path = vec![false; self.network.graph().stop_count()];
        let mut bound = heuristic.estimate(request.origin);
        let mut iterations = 0;
        let mut nodes_explored = 0;

        while iterations < max_iterations {
            if started.elapsed() >= timeout {
                break;
            }
            iterations += 1;
            trace!(iteration = iterations, bound, "IDA* iteration");

            match self.bounded_pass(
                request.origin,
                bound,
                &objective,
                &heuristic,
                &mut on_path,
                &mut nodes_explored,
            ) {
                Pass::Found { hops, cost } => {
                    let route = assembler.assemble(&hops, request.departure, cost)?;
                    debug!(
                        origin = %request.origin,
                        destination = %request.destination,
                        mode = %request.mode,
                        cost,
                        iterations,
                        nodes_explored,
                        "IDA* found route"
                    );
                    return Ok(SearchResult::found(route, nodes_explored, iterations));
                }
                Pass::Exceeded(next) if next.is_infinite() => {
                    debug!(
                        origin = %request.origin,
                        destination = %request.destination,
                        iterations,
                        nodes_explored,
                        "IDA* found no route"
                    );
                    return Ok(SearchResult::unreachable(nodes_explored, iterations));
                }
                Pass::Exceeded(next) => bound = next,
            }
        }

        let elapsed = started.elapsed();
        warn!(
            origin = %request.origin,
            destination = %request.destination,
            iterations,
            nodes_explored,
            elapsed_ms = elapsed.as_millis() as u64,
            bound,
            "IDA* search budget exhausted"
        );
        Ok(SearchResult {
            outcome: SearchOutcome::BudgetExceeded {
                iterations,
                elapsed,
            },
            nodes_explored,
            iterations,
        })
    }
}
