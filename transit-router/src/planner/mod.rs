//! Route search over a transit network.
//!
//! Two routers answer the same question, "what is the best way from this
//! stop to that one?", under a chosen optimization mode:
//!
//! - [`DijkstraRouter`] expands the cheapest frontier stop first and always
//!   runs to completion.
//! - [`IdaStarRouter`] runs depth-first passes under a rising cost bound
//!   guided by a distance heuristic, within an iteration and time budget.
//!
//! Both emit a chain of hops that [`RouteAssembler`] turns into a timed,
//! priced [`Route`](crate::domain::Route). [`DoorToDoorPlanner`] builds on
//! them to route between arbitrary coordinates.

mod assemble;
mod config;
mod dijkstra;
mod door_to_door;
mod heuristic;
mod ida_star;
mod objective;
mod rank;
mod search;


pub use assemble::RouteAssembler;
pub use config::SearchConfig;
pub use dijkstra::DijkstraRouter;
pub use door_to_door::{
    DoorToDoorConfig, DoorToDoorPlanner, DoorToDoorRequest, InvalidRouterKind, Location,
    RouterKind, WALK_ROUTE_NAME, nearest_stops,
};
pub use heuristic::{Heuristic, cost_estimate, time_estimate, transfer_estimate};
pub use ida_star::IdaStarRouter;
pub use objective::{BalancedWeights, InvalidOptimizationMode, OptimizationMode};
pub use rank::{best_route, rank_routes, route_score};
pub use search::{
    Router, SearchBudget, SearchError, SearchOutcome, SearchRequest, SearchResult,
};
