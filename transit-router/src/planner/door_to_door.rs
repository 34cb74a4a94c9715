//! Door-to-door planning between arbitrary coordinates.
//!
//! The planner walks from the origin to one of a few nearby stops, rides
//! the network, and walks from the alighting stop to the destination. Every
//! combination of candidate stops is searched, in parallel batches on the
//! blocking pool, and the best complete route wins.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::assemble::RouteAssembler;
use super::config::SearchConfig;
use super::dijkstra::DijkstraRouter;
use super::ida_star::IdaStarRouter;
use super::objective::OptimizationMode;
use super::rank::{best_route, route_score};
use super::search::{Router, SearchError, SearchRequest};
use crate::domain::{Route, Segment, StopId, TransportMode, Waypoint, advance};
use crate::fare::FareTable;
use crate::network::{Network, SimplifyConfig};

/// Route name of access and egress walks.
pub const WALK_ROUTE_NAME: &str = "Walking";

/// A named point that need not be a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    fn waypoint(&self) -> Waypoint {
        Waypoint::Place {
            name: self.name.clone(),
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Stops within `max_km` of a coordinate, nearest first, at most `limit`.
///
/// Ties in distance are broken by stop id.
pub fn nearest_stops(
    network: &Network,
    lat: f64,
    lon: f64,
    max_km: f64,
    limit: usize,
) -> Vec<(StopId, f64)> {
    let mut nearby: Vec<(StopId, f64)> = network
        .graph()
        .stops()
        .iter()
        .map(|stop| (stop.id, stop.distance_km_to_point(lat, lon)))
        .filter(|(_, d)| *d <= max_km)
        .collect();
    nearby.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    nearby.truncate(limit);
    nearby
}

/// Error returned when parsing an unknown router name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid router: {0:?} (expected dijkstra or ida_star)")]
pub struct InvalidRouterKind(String);

/// Which search strategy runs the stop-to-stop legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterKind {
    #[default]
    Dijkstra,
    IdaStar,
}

impl FromStr for RouterKind {
    type Err = InvalidRouterKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dijkstra" => Ok(RouterKind::Dijkstra),
            "ida_star" | "ida*" | "idastar" => Ok(RouterKind::IdaStar),
            _ => Err(InvalidRouterKind(s.to_string())),
        }
    }
}

impl fmt::Display for RouterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouterKind::Dijkstra => "dijkstra",
            RouterKind::IdaStar => "ida_star",
        })
    }
}

/// Door-to-door planning parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorToDoorConfig {
    /// Furthest a stop may be from the origin or destination.
    pub max_walk_km: f64,

    /// Nearest stops tried at each end.
    pub candidate_stops: usize,

    /// Stop pairs searched concurrently.
    pub batch_size: usize,

    pub walking_speed_kmh: f64,

    /// Search IDA* on a network restricted to the candidate stops'
    /// surroundings. Dijkstra always searches the full network.
    pub simplify: Option<SimplifyConfig>,
}

impl Default for DoorToDoorConfig {
    fn default() -> Self {
        Self {
            max_walk_km: 2.0,
            candidate_stops: 3,
            batch_size: 4,
            walking_speed_kmh: 5.0,
            simplify: None,
        }
    }
}

impl DoorToDoorConfig {
    pub fn with_max_walk_km(mut self, km: f64) -> Self {
        self.max_walk_km = km;
        self
    }

    pub fn with_candidate_stops(mut self, count: usize) -> Self {
        self.candidate_stops = count;
        self
    }

    pub fn with_simplify(mut self, config: SimplifyConfig) -> Self {
        self.simplify = Some(config);
        self
    }

    /// Minutes needed to walk `distance_km`.
    pub fn walking_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.walking_speed_kmh * 60.0
    }
}

/// Request for a door-to-door route.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorToDoorRequest {
    pub origin: Location,
    pub destination: Location,
    pub departure: NaiveDateTime,
    pub mode: OptimizationMode,
    pub router: RouterKind,
}

impl DoorToDoorRequest {
    pub fn new(
        origin: Location,
        destination: Location,
        departure: NaiveDateTime,
        mode: OptimizationMode,
    ) -> Self {
        Self {
            origin,
            destination,
            departure,
            mode,
            router: RouterKind::default(),
        }
    }

    pub fn with_router(mut self, router: RouterKind) -> Self {
        self.router = router;
        self
    }
}

/// One origin stop / destination stop combination.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    board: StopId,
    access_km: f64,
    alight: StopId,
    egress_km: f64,
}

/// Plans door-to-door routes over a shared network.
///
/// Cheap to clone; all state is behind `Arc`s so candidate searches can run
/// on the blocking pool.
#[derive(Debug, Clone)]
pub struct DoorToDoorPlanner {
    network: Arc<Network>,
    config: Arc<SearchConfig>,
    fares: Arc<FareTable>,
    door: DoorToDoorConfig,
}

impl DoorToDoorPlanner {
    pub fn new(network: Arc<Network>, config: SearchConfig, fares: FareTable) -> Self {
        Self {
            network,
            config: Arc::new(config),
            fares: Arc::new(fares),
            door: DoorToDoorConfig::default(),
        }
    }

    pub fn with_door_config(mut self, door: DoorToDoorConfig) -> Self {
        self.door = door;
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Plan the best route from `request.origin` to `request.destination`.
    ///
    /// Returns `Ok(None)` when either end has no stop within walking range
    /// or no candidate pair is connected.
    pub async fn plan(&self, request: &DoorToDoorRequest) -> Result<Option<Route>, SearchError> {
        let door = &self.door;
        let origins = nearest_stops(
            &self.network,
            request.origin.lat,
            request.origin.lon,
            door.max_walk_km,
            door.candidate_stops,
        );
        let destinations = nearest_stops(
            &self.network,
            request.destination.lat,
            request.destination.lon,
            door.max_walk_km,
            door.candidate_stops,
        );

        if origins.is_empty() || destinations.is_empty() {
            info!(
                origin = %request.origin.name,
                destination = %request.destination.name,
                origin_stops = origins.len(),
                destination_stops = destinations.len(),
                max_walk_km = door.max_walk_km,
                "No stops within walking range"
            );
            return Ok(None);
        }

        let candidates: Vec<Candidate> = origins
            .iter()
            .flat_map(|&(board, access_km)| {
                destinations.iter().map(move |&(alight, egress_km)| Candidate {
                    board,
                    access_km,
                    alight,
                    egress_km,
                })
            })
            .collect();

        let network = self.search_network(request.router, &origins, &destinations);

        let mut routes = Vec::new();
        for batch in candidates.chunks(door.batch_size.max(1)) {
            let futures: Vec<_> = batch
                .iter()
                .map(|&candidate| self.search_candidate(Arc::clone(&network), request, candidate))
                .collect();

            for result in join_all(futures).await {
                if let Some(route) = result? {
                    routes.push(route);
                }
            }
        }

        debug!(
            origin = %request.origin.name,
            destination = %request.destination.name,
            router = %request.router,
            candidates = candidates.len(),
            connected = routes.len(),
            "Door-to-door candidates searched"
        );

        Ok(best_route(routes, request.mode, &self.config))
    }

    /// Network the stop-to-stop legs search.
    fn search_network(
        &self,
        router: RouterKind,
        origins: &[(StopId, f64)],
        destinations: &[(StopId, f64)],
    ) -> Arc<Network> {
        match (router, &self.door.simplify) {
            (RouterKind::IdaStar, Some(simplify)) => {
                let ids = |stops: &[(StopId, f64)]| stops.iter().map(|(id, _)| *id).collect::<Vec<_>>();
                Arc::new(self.network.simplified(&ids(origins), &ids(destinations), simplify))
            }
            _ => Arc::clone(&self.network),
        }
    }

    /// Search one stop pair on the blocking pool and wrap the result in
    /// access and egress walks.
    async fn search_candidate(
        &self,
        network: Arc<Network>,
        request: &DoorToDoorRequest,
        candidate: Candidate,
    ) -> Result<Option<Route>, SearchError> {
        let access_minutes = self.door.walking_minutes(candidate.access_km);
        let search = SearchRequest::new(
            candidate.board,
            candidate.alight,
            advance(request.departure, access_minutes),
            request.mode,
        );
        let config = Arc::clone(&self.config);
        let fares = Arc::clone(&self.fares);
        let router = request.router;

        let transit = tokio::task::spawn_blocking(move || match router {
            RouterKind::Dijkstra => DijkstraRouter::new(&network, &config, &fares).find_route(&search),
            RouterKind::IdaStar => IdaStarRouter::new(&network, &config, &fares).find_route(&search),
        })
        .await
        .map_err(|e| SearchError::TaskFailed(e.to_string()))??;

        let Some(transit) = transit else {
            return Ok(None);
        };
        self.wrap(request, candidate, transit).map(Some)
    }

    /// Prefix the access walk and append the egress walk to a stop-to-stop
    /// route, then retime, re-price and re-score the whole itinerary.
    fn wrap(
        &self,
        request: &DoorToDoorRequest,
        candidate: Candidate,
        transit: Route,
    ) -> Result<Route, SearchError> {
        let board = self.stop_waypoint(candidate.board)?;
        let alight = self.stop_waypoint(candidate.alight)?;

        let mut segments = Vec::with_capacity(transit.segment_count() + 2);
        segments.push(self.walk(request.origin.waypoint(), board, candidate.access_km, request.departure));
        segments.extend(transit.into_segments());
        segments.push(self.walk(alight, request.destination.waypoint(), candidate.egress_km, request.departure));

        let assembler = RouteAssembler::new(&self.network, &self.fares);
        let route = assembler.chain(segments, request.departure, 0.0)?;
        let score = route_score(&route, request.mode, &self.config);
        Ok(route.with_score(score))
    }

    fn stop_waypoint(&self, id: StopId) -> Result<Waypoint, SearchError> {
        let stop = self.network.stop(id).ok_or(SearchError::UnknownStop(id))?;
        Ok(Waypoint::Stop {
            id,
            name: stop.name.clone(),
        })
    }

    /// An untimed walk; `chain` sets the times.
    fn walk(&self, from: Waypoint, to: Waypoint, distance_km: f64, at: NaiveDateTime) -> Segment {
        Segment {
            sequence: 0,
            mode: TransportMode::Walk,
            route_name: WALK_ROUTE_NAME.to_string(),
            from,
            to,
            departure: at,
            arrival: at,
            duration_minutes: self.door.walking_minutes(distance_km),
            fare: 0,
            distance_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::palembang_fares;
    use crate::fixtures::{self, at, departure, id};

    fn planner() -> DoorToDoorPlanner {
        DoorToDoorPlanner::new(Arc::new(fixtures::city()), SearchConfig::default(), palembang_fares())
    }

    fn place(name: &str, north_km: f64, east_km: f64) -> Location {
        let (lat, lon) = at(north_km, east_km);
        Location::new(name, lat, lon)
    }

    fn request(router: RouterKind) -> DoorToDoorRequest {
        DoorToDoorRequest::new(
            place("Home", -0.3, 0.0),
            place("Office", 6.3, 3.2),
            departure(),
            OptimizationMode::Time,
        )
        .with_router(router)
    }

    #[test]
    fn nearest_stops_sorted_and_limited() {
        let network = fixtures::city();
        let (lat, lon) = at(0.15, 3.0);
        let nearby = nearest_stops(&network, lat, lon, 2.0, 10);

        let ids: Vec<_> = nearby.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![id(&network, "bus_1"), id(&network, "lrt_2")]);
        assert!(nearby[0].1 <= nearby[1].1);

        assert_eq!(nearest_stops(&network, lat, lon, 2.0, 1).len(), 1);
        assert!(nearest_stops(&network, lat, lon, 0.01, 10).is_empty());
    }

    #[test]
    fn router_kind_parsing() {
        assert_eq!("Dijkstra".parse::<RouterKind>(), Ok(RouterKind::Dijkstra));
        assert_eq!("ida*".parse::<RouterKind>(), Ok(RouterKind::IdaStar));
        assert_eq!(RouterKind::IdaStar.to_string(), "ida_star");
        assert!("bfs".parse::<RouterKind>().is_err());
    }

    #[tokio::test]
    async fn walks_at_both_ends() {
        let planner = planner();
        let route = planner.plan(&request(RouterKind::Dijkstra)).await.unwrap().unwrap();
        let segments = route.segments();

        let first = segments.first().unwrap();
        let last = segments.last().unwrap();
        assert_eq!(first.mode, TransportMode::Walk);
        assert_eq!(first.from.name(), "Home");
        assert_eq!(first.to.name(), "Bandara SMB II");
        assert_eq!(last.mode, TransportMode::Walk);
        assert_eq!(last.from.name(), "Sukarami");
        assert_eq!(last.to.name(), "Office");

        assert_eq!(route.modes(), vec![TransportMode::Rail, TransportMode::Bus]);
        assert_eq!(route.num_transfers(), 1);
        assert_eq!(route.total_fare(), 15000);
        assert_eq!(route.departure_time(), departure());
    }

    #[tokio::test]
    async fn chaining_holds_across_walks() {
        let route = planner().plan(&request(RouterKind::Dijkstra)).await.unwrap().unwrap();
        for (i, pair) in route.segments().windows(2).enumerate() {
            assert_eq!(pair[0].to, pair[1].from);
            assert_eq!(pair[0].arrival, pair[1].departure);
            assert_eq!(pair[1].sequence, i + 2);
        }
        let minutes: f64 = route.segments().iter().map(|s| s.duration_minutes).sum();
        assert!((route.total_time_minutes() - minutes).abs() < 1e-9);
        assert!((route.score() - route.total_time_minutes()).abs() < 1e-9);
    }

    #[tokio::test]
    async fn routers_agree_door_to_door() {
        let planner = planner().with_door_config(DoorToDoorConfig::default().with_simplify(SimplifyConfig::default()));
        let dijkstra = planner.plan(&request(RouterKind::Dijkstra)).await.unwrap().unwrap();
        let ida = planner.plan(&request(RouterKind::IdaStar)).await.unwrap().unwrap();

        assert!((dijkstra.total_time_minutes() - ida.total_time_minutes()).abs() < 1e-6);
        assert_eq!(dijkstra.modes(), ida.modes());
    }

    #[tokio::test]
    async fn no_stops_in_range() {
        let planner = planner();
        let request = DoorToDoorRequest::new(
            place("Nowhere", -40.0, -40.0),
            place("Office", 6.3, 3.2),
            departure(),
            OptimizationMode::Time,
        );
        assert_eq!(planner.plan(&request).await.unwrap(), None);
    }

    #[tokio::test]
    async fn disconnected_candidates() {
        let planner = planner();
        let request = DoorToDoorRequest::new(
            place("Home", -0.3, 0.0),
            place("Island", -10.2, 20.0),
            departure(),
            OptimizationMode::Cost,
        );
        assert_eq!(planner.plan(&request).await.unwrap(), None);
    }

    #[test]
    fn walking_minutes() {
        let door = DoorToDoorConfig::default();
        assert_eq!(door.walking_minutes(1.0), 12.0);
        assert_eq!(door.walking_minutes(0.0), 0.0);
    }
}
