//! Timed itinerary segments.

use std::fmt;

use chrono::NaiveDateTime;

use super::{StopId, TransportMode};

/// An endpoint of a segment.
///
/// Transit segments run between stops. Door-to-door access and egress walks
/// start or end at an arbitrary named place.
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint {
    Stop { id: StopId, name: String },
    Place { name: String, lat: f64, lon: f64 },
}

impl Waypoint {
    /// Display name of the waypoint.
    pub fn name(&self) -> &str {
        match self {
            Waypoint::Stop { name, .. } | Waypoint::Place { name, .. } => name,
        }
    }

    /// The stop id, if this waypoint is a stop.
    pub fn stop_id(&self) -> Option<StopId> {
        match self {
            Waypoint::Stop { id, .. } => Some(*id),
            Waypoint::Place { .. } => None,
        }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One traversed edge, transfer link, or walk, bound to concrete times.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// 1-based position within the route.
    pub sequence: usize,
    pub mode: TransportMode,
    pub route_name: String,
    pub from: Waypoint,
    pub to: Waypoint,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration_minutes: f64,
    /// Fare charged on this segment by the fare model (non-zero only where a
    /// revenue mode is entered).
    pub fare: u32,
    pub distance_km: f64,
}

impl Segment {
    /// Whether this segment is a derived transfer link.
    pub fn is_transfer(&self) -> bool {
        self.mode == TransportMode::Transfer
    }

    /// Whether this segment is a door-to-door walk.
    pub fn is_walk(&self) -> bool {
        self.mode == TransportMode::Walk
    }

    /// Whether this segment rides a revenue mode.
    pub fn is_ride(&self) -> bool {
        self.mode.is_revenue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waypoint_accessors() {
        let stop = Waypoint::Stop {
            id: StopId(2),
            name: "Ampera".into(),
        };
        assert_eq!(stop.name(), "Ampera");
        assert_eq!(stop.stop_id(), Some(StopId(2)));

        let place = Waypoint::Place {
            name: "Home".into(),
            lat: -2.98,
            lon: 104.73,
        };
        assert_eq!(place.to_string(), "Home");
        assert_eq!(place.stop_id(), None);
    }
}
