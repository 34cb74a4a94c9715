//! Edges, transfer links, and the hops routers emit.

use super::{StopId, TransportMode};

/// Route name shown for derived walking transfers.
pub const TRANSFER_ROUTE_NAME: &str = "Transfer (Walking)";

/// A direct, scheduled connection between two stops on the same route.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: StopId,
    pub to: StopId,
    pub route: String,
    pub mode: TransportMode,
    pub distance_km: f64,
    pub duration_minutes: f64,
    /// Per-ride fare hint. The charged fare comes from the fare model.
    pub fare: u32,
}

/// A derived walking connection between nearby stops on different routes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferLink {
    pub from: StopId,
    pub to: StopId,
    pub distance_km: f64,
    /// Walking time plus the fixed transfer penalty.
    pub duration_minutes: f64,
}

/// One step of a raw path: either riding an edge or walking a transfer link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hop<'a> {
    Ride(&'a Edge),
    Walk(&'a TransferLink),
}

impl Hop<'_> {
    pub fn from(&self) -> StopId {
        match self {
            Hop::Ride(edge) => edge.from,
            Hop::Walk(link) => link.from,
        }
    }

    pub fn to(&self) -> StopId {
        match self {
            Hop::Ride(edge) => edge.to,
            Hop::Walk(link) => link.to,
        }
    }

    pub fn mode(&self) -> TransportMode {
        match self {
            Hop::Ride(edge) => edge.mode,
            Hop::Walk(_) => TransportMode::Transfer,
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        match self {
            Hop::Ride(edge) => edge.duration_minutes,
            Hop::Walk(link) => link.duration_minutes,
        }
    }

    pub fn distance_km(&self) -> f64 {
        match self {
            Hop::Ride(edge) => edge.distance_km,
            Hop::Walk(link) => link.distance_km,
        }
    }

    /// Fare hint of the hop; transfer links are always free.
    pub fn fare_hint(&self) -> u32 {
        match self {
            Hop::Ride(edge) => edge.fare,
            Hop::Walk(_) => 0,
        }
    }

    pub fn route_name(&self) -> &str {
        match self {
            Hop::Ride(edge) => &edge.route,
            Hop::Walk(_) => TRANSFER_ROUTE_NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge() -> Edge {
        Edge {
            from: StopId(0),
            to: StopId(1),
            route: "LRT Sumsel".to_string(),
            mode: TransportMode::Rail,
            distance_km: 2.0,
            duration_minutes: 3.0,
            fare: 5000,
        }
    }

    #[test]
    fn ride_hop_reads_edge() {
        let e = edge();
        let hop = Hop::Ride(&e);
        assert_eq!(hop.from(), StopId(0));
        assert_eq!(hop.to(), StopId(1));
        assert_eq!(hop.mode(), TransportMode::Rail);
        assert_eq!(hop.duration_minutes(), 3.0);
        assert_eq!(hop.distance_km(), 2.0);
        assert_eq!(hop.fare_hint(), 5000);
        assert_eq!(hop.route_name(), "LRT Sumsel");
    }

    #[test]
    fn walk_hop_is_free_transfer() {
        let link = TransferLink {
            from: StopId(4),
            to: StopId(2),
            distance_km: 0.3,
            duration_minutes: 8.6,
        };
        let hop = Hop::Walk(&link);
        assert_eq!(hop.from(), StopId(4));
        assert_eq!(hop.to(), StopId(2));
        assert_eq!(hop.mode(), TransportMode::Transfer);
        assert_eq!(hop.fare_hint(), 0);
        assert_eq!(hop.route_name(), TRANSFER_ROUTE_NAME);
    }
}
