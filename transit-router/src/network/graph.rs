//! Stop registry and adjacency.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use super::NetworkError;
use crate::domain::{Edge, Stop, StopId, TransportMode};

/// A stop to register with a [`GraphBuilder`].
#[derive(Debug, Clone)]
pub struct NewStop {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub mode: TransportMode,
    pub route: String,
}

impl NewStop {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        mode: TransportMode,
        route: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            lat,
            lon,
            mode,
            route: route.into(),
        }
    }
}

/// Static stop registry plus outgoing edges per stop.
///
/// Every edge endpoint exists in the registry. Read-only after
/// [`GraphBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct Graph {
    stops: Vec<Stop>,
    by_code: HashMap<String, StopId>,
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Look up a stop by id.
    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(id.index())
    }

    /// Look up a stop by its external code.
    pub fn stop_by_code(&self, code: &str) -> Option<&Stop> {
        self.by_code.get(code).map(|id| &self.stops[id.index()])
    }

    pub fn contains(&self, id: StopId) -> bool {
        id.index() < self.stops.len()
    }

    /// All stops in id order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Graph-native outgoing edges of a stop, in load order.
    ///
    /// Unknown ids have no edges.
    pub fn neighbors(&self, id: StopId) -> &[Edge] {
        self.adjacency.get(id.index()).map_or(&[], Vec::as_slice)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops whose name contains `query`, ignoring case.
    pub fn find_stops_by_name(&self, query: &str) -> Vec<&Stop> {
        let needle = query.to_lowercase();
        self.stops
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Stops on the named route, in id order.
    pub fn route_stops(&self, route: &str) -> Vec<&Stop> {
        self.stops.iter().filter(|s| s.route == route).collect()
    }

    /// Distinct route names grouped by mode, sorted.
    pub fn routes_by_mode(&self) -> BTreeMap<TransportMode, Vec<String>> {
        let mut grouped: BTreeMap<TransportMode, BTreeSet<&str>> = BTreeMap::new();
        for stop in &self.stops {
            grouped.entry(stop.mode).or_default().insert(&stop.route);
        }
        grouped
            .into_iter()
            .map(|(mode, routes)| (mode, routes.into_iter().map(String::from).collect()))
            .collect()
    }

    /// Copy of this graph restricted to stops with `keep[id]` set.
    ///
    /// Ids are preserved: dropped stops stay in the registry but lose all
    /// incident edges, so routes found on the restricted graph are valid on
    /// the full one.
    pub(crate) fn restricted(&self, keep: &[bool]) -> Graph {
        let kept = |id: StopId| keep.get(id.index()).copied().unwrap_or(false);
        let adjacency = self
            .adjacency
            .iter()
            .enumerate()
            .map(|(index, edges)| {
                if !kept(StopId::from_index(index)) {
                    return Vec::new();
                }
                edges.iter().filter(|e| kept(e.to)).cloned().collect()
            })
            .collect();

        Graph {
            stops: self.stops.clone(),
            by_code: self.by_code.clone(),
            adjacency,
        }
    }
}

/// Incremental, validating graph constructor.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stop, assigning the next dense id.
    ///
    /// # Errors
    ///
    /// Returns an error if a stop with the same code is already registered.
    pub fn add_stop(&mut self, stop: NewStop) -> Result<StopId, NetworkError> {
        if self.graph.by_code.contains_key(&stop.code) {
            return Err(NetworkError::DuplicateStop(stop.code));
        }

        let id = StopId::from_index(self.graph.stops.len());
        self.graph.by_code.insert(stop.code.clone(), id);
        self.graph.stops.push(Stop {
            id,
            code: stop.code,
            name: stop.name,
            lat: stop.lat,
            lon: stop.lon,
            mode: stop.mode,
            route: stop.route,
        });
        self.graph.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Add a directed edge.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is unknown or the distance or
    /// duration is negative or non-finite.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), NetworkError> {
        for id in [edge.from, edge.to] {
            if !self.graph.contains(id) {
                return Err(NetworkError::UnknownStop(id));
            }
        }
        if !edge.distance_km.is_finite() || edge.distance_km < 0.0 {
            return Err(NetworkError::InvalidEdge {
                from: edge.from,
                to: edge.to,
                reason: "distance must be finite and non-negative",
            });
        }
        if !edge.duration_minutes.is_finite() || edge.duration_minutes < 0.0 {
            return Err(NetworkError::InvalidEdge {
                from: edge.from,
                to: edge.to,
                reason: "duration must be finite and non-negative",
            });
        }

        self.graph.adjacency[edge.from.index()].push(edge);
        Ok(())
    }

    /// Add a ride from `from` to `to` on the origin stop's route.
    ///
    /// Distance is the straight-line distance between the stops, duration
    /// follows from the mode's nominal speed and the fare is the mode's
    /// default hint.
    pub fn add_ride(&mut self, from: StopId, to: StopId) -> Result<(), NetworkError> {
        let (Some(a), Some(b)) = (self.graph.stop(from), self.graph.stop(to)) else {
            let missing = if self.graph.contains(from) { to } else { from };
            return Err(NetworkError::UnknownStop(missing));
        };

        let distance_km = a.distance_km_to(b);
        let edge = Edge {
            from,
            to,
            route: a.route.clone(),
            mode: a.mode,
            distance_km,
            duration_minutes: distance_km / a.mode.nominal_speed_kmh() * 60.0,
            fare: a.mode.default_fare_hint(),
        };
        self.add_edge(edge)
    }

    /// Chain rides along `stops` in both directions.
    pub fn add_line(&mut self, stops: &[StopId]) -> Result<(), NetworkError> {
        for pair in stops.windows(2) {
            self.add_ride(pair[0], pair[1])?;
            self.add_ride(pair[1], pair[0])?;
        }
        Ok(())
    }

    /// Id of an already registered stop.
    pub fn stop_id(&self, code: &str) -> Option<StopId> {
        self.graph.by_code.get(code).copied()
    }

    pub fn stop_count(&self) -> usize {
        self.graph.stop_count()
    }

    pub fn build(self) -> Graph {
        debug!(
            stops = self.graph.stop_count(),
            edges = self.graph.edge_count(),
            "Built graph"
        );
        self.graph
    }
}
