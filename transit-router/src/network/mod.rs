//! The static transit network.
//!
//! A [`Network`] pairs a [`Graph`] with the transfer links derived from it.
//! It is built once, never mutated, and shared read-only (typically behind
//! an `Arc`) by any number of concurrent searches.

mod error;
mod graph;
mod loader;
mod simplify;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::{Hop, Stop, StopId, TransportMode};
use crate::walkable::{TransferConfig, TransferLinks};

pub use error::NetworkError;
pub use graph::{Graph, GraphBuilder, NewStop};
pub use loader::{EdgeRecord, NetworkFile, StopCode, StopRecord, load_graph, parse_graph};
pub use simplify::SimplifyConfig;

/// Counts describing a loaded network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub stops: usize,
    pub edges: usize,
    pub transfer_links: usize,
    pub stops_by_mode: BTreeMap<TransportMode, usize>,
    pub routes_by_mode: BTreeMap<TransportMode, Vec<String>>,
}

/// A graph plus its transfer links.
#[derive(Debug, Clone)]
pub struct Network {
    graph: Graph,
    transfers: TransferLinks,
    transfer_config: TransferConfig,
}

impl Network {
    /// Build a network with the default transfer parameters.
    pub fn new(graph: Graph) -> Self {
        Self::with_transfer_config(graph, TransferConfig::default())
    }

    pub fn with_transfer_config(graph: Graph, transfer_config: TransferConfig) -> Self {
        let transfers = TransferLinks::build(&graph, &transfer_config);
        info!(
            stops = graph.stop_count(),
            edges = graph.edge_count(),
            transfer_links = transfers.len(),
            "Network ready"
        );
        Self {
            graph,
            transfers,
            transfer_config,
        }
    }

    /// Load a network file and derive its transfer links.
    pub fn load(path: impl AsRef<Path>, transfer_config: TransferConfig) -> Result<Self, NetworkError> {
        let graph = load_graph(path)?;
        Ok(Self::with_transfer_config(graph, transfer_config))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn transfers(&self) -> &TransferLinks {
        &self.transfers
    }

    pub fn transfer_config(&self) -> &TransferConfig {
        &self.transfer_config
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.graph.stop(id)
    }

    /// Resolve an external stop code to its id.
    pub fn stop_id(&self, code: &str) -> Option<StopId> {
        self.graph.stop_by_code(code).map(|s| s.id)
    }

    pub fn contains(&self, id: StopId) -> bool {
        self.graph.contains(id)
    }

    /// Everything reachable in one step from `stop`: graph edges first, then
    /// transfer links.
    pub fn hops_from(&self, stop: StopId) -> impl Iterator<Item = Hop<'_>> {
        self.graph
            .neighbors(stop)
            .iter()
            .map(Hop::Ride)
            .chain(self.transfers.from(stop).iter().map(Hop::Walk))
    }

    pub fn summary(&self) -> NetworkSummary {
        let mut stops_by_mode = BTreeMap::new();
        for stop in self.graph.stops() {
            *stops_by_mode.entry(stop.mode).or_insert(0) += 1;
        }
        NetworkSummary {
            stops: self.graph.stop_count(),
            edges: self.graph.edge_count(),
            transfer_links: self.transfers.len(),
            stops_by_mode,
            routes_by_mode: self.graph.routes_by_mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn network_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Network>();
    }

    #[test]
    fn hops_list_edges_before_transfers() {
        let network = fixtures::city();
        let stop = network.stop_id("lrt_2").unwrap();
        let hops: Vec<_> = network.hops_from(stop).collect();

        let first_walk = hops
            .iter()
            .position(|h| matches!(h, Hop::Walk(_)))
            .unwrap();
        assert!(hops[..first_walk].iter().all(|h| matches!(h, Hop::Ride(_))));
        assert!(hops[first_walk..].iter().all(|h| matches!(h, Hop::Walk(_))));
        assert!(hops.iter().all(|h| h.from() == stop));
    }

    #[test]
    fn summary_counts() {
        let network = fixtures::city();
        let summary = network.summary();

        assert_eq!(summary.stops, network.graph().stop_count());
        assert_eq!(summary.edges, network.graph().edge_count());
        assert_eq!(summary.transfer_links, network.transfers().len());
        assert_eq!(summary.stops_by_mode[&TransportMode::Rail], 4);
        assert_eq!(
            summary.routes_by_mode[&TransportMode::Bus],
            vec!["Teman Bus Koridor 1".to_string()]
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["stops_by_mode"]["rail"], 4);
    }

    #[test]
    fn stop_lookup_by_code() {
        let network = fixtures::city();
        let id = network.stop_id("bus_3").unwrap();
        assert_eq!(network.stop(id).unwrap().name, "Sukarami");
        assert!(network.stop_id("missing").is_none());
    }
}
