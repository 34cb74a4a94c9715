//! JSON network ingestion.
//!
//! The file holds already-extracted stop and edge records:
//!
//! ```json
//! {
//!   "stops": [{"id": "lrt_1", "name": "Bandara SMB II", "lat": -2.9, "lon": 104.7, "route": "LRT Sumsel"}],
//!   "edges": [{"from_id": "lrt_1", "to_id": "lrt_2", "route": "LRT Sumsel", "distance_meters": 1800.0}],
//!   "circuit_routes": []
//! }
//! ```
//!
//! `mode` is inferred from the route name when absent, `cost` defaults to
//! the mode's fare hint and `duration_minutes` to distance over the mode's
//! nominal speed. Records on circuit routes and edges flagged `is_return`
//! are skipped. Everything else is validated and rejected on the first
//! error.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::NetworkError;
use super::graph::{Graph, GraphBuilder, NewStop};
use crate::domain::{Edge, StopId, TransportMode};

/// External stop identifier. Files use either strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopCode {
    Text(String),
    Number(i64),
}

impl StopCode {
    fn into_string(self) -> String {
        match self {
            StopCode::Text(s) => s,
            StopCode::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for StopCode {
    fn from(s: &str) -> Self {
        StopCode::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub id: StopCode,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TransportMode>,
    pub route: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(alias = "from")]
    pub from_id: StopCode,
    #[serde(alias = "to")]
    pub to_id: StopCode,
    pub route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TransportMode>,
    #[serde(alias = "distance")]
    pub distance_meters: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_return: bool,
}

/// Top-level shape of a network file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFile {
    #[serde(alias = "nodes")]
    pub stops: Vec<StopRecord>,
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub circuit_routes: Vec<String>,
}

impl NetworkFile {
    /// Validate the records and build a graph.
    pub fn into_graph(self) -> Result<Graph, NetworkError> {
        let circuits: HashSet<&str> = self.circuit_routes.iter().map(String::as_str).collect();
        let mut builder = Graph::builder();
        let mut skipped_stops = 0;

        for record in &self.stops {
            if circuits.contains(record.route.as_str()) {
                skipped_stops += 1;
                continue;
            }
            let mode = record
                .mode
                .unwrap_or_else(|| TransportMode::from_route_name(&record.route));
            builder.add_stop(NewStop::new(
                record.id.clone().into_string(),
                record.name.clone(),
                record.lat,
                record.lon,
                mode,
                record.route.clone(),
            ))?;
        }

        let mut skipped_edges = 0;
        for (position, record) in self.edges.into_iter().enumerate() {
            if record.is_return || circuits.contains(record.route.as_str()) {
                skipped_edges += 1;
                continue;
            }
            let from = resolve(&builder, position, record.from_id)?;
            let to = resolve(&builder, position, record.to_id)?;

            let mode = record
                .mode
                .unwrap_or_else(|| TransportMode::from_route_name(&record.route));
            let distance_km = record.distance_meters / 1000.0;
            let duration_minutes = record
                .duration_minutes
                .unwrap_or(distance_km / mode.nominal_speed_kmh() * 60.0);

            builder.add_edge(Edge {
                from,
                to,
                route: record.route,
                mode,
                distance_km,
                duration_minutes,
                fare: record.cost.unwrap_or(mode.default_fare_hint()),
            })?;
        }

        if skipped_stops > 0 || skipped_edges > 0 {
            debug!(
                stops = skipped_stops,
                edges = skipped_edges,
                "Skipped circuit and return records"
            );
        }

        Ok(builder.build())
    }
}

fn resolve(builder: &GraphBuilder, edge: usize, code: StopCode) -> Result<StopId, NetworkError> {
    let code = code.into_string();
    builder
        .stop_id(&code)
        .ok_or(NetworkError::UnknownStopCode { edge, code })
}

/// Parse a network from JSON text.
pub fn parse_graph(json: &str) -> Result<Graph, NetworkError> {
    let file: NetworkFile = serde_json::from_str(json)?;
    file.into_graph()
}

/// Load a network file from disk.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph, NetworkError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_graph(&contents)?;
    info!(
        path = %path.display(),
        stops = graph.stop_count(),
        edges = graph.edge_count(),
        "Loaded network"
    );
    Ok(graph)
}
