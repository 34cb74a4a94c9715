//! Serializable route records.

use serde::{Deserialize, Serialize};

use crate::domain::{Route, Segment, format_timestamp};

/// A route as handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub summary: SummaryRecord,
    pub segments: Vec<SegmentRecord>,
}

/// Route totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub total_time_minutes: f64,

    /// Total fare in whole currency units
    pub total_cost: u32,

    pub total_distance_km: f64,

    pub num_transfers: usize,

    /// ISO-8601 local time
    pub departure_time: String,

    /// ISO-8601 local time
    pub arrival_time: String,

    /// Score under the optimization mode that produced the route
    pub optimization_score: f64,
}

/// One segment of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// 1-based position in the route
    pub sequence: usize,

    /// Transport mode (e.g., "rail", "transfer")
    pub mode: String,

    pub route_name: String,

    /// Name of the stop or place the segment starts at
    pub from_stop: String,

    /// Name of the stop or place the segment ends at
    pub to_stop: String,

    pub departure_time: String,

    pub arrival_time: String,

    pub duration_minutes: f64,

    /// Fare charged on this segment
    pub cost: u32,

    pub distance_km: f64,
}

impl RouteRecord {
    pub fn from_route(route: &Route) -> Self {
        Self {
            summary: SummaryRecord {
                total_time_minutes: round2(route.total_time_minutes()),
                total_cost: route.total_fare(),
                total_distance_km: round2(route.total_distance_km()),
                num_transfers: route.num_transfers(),
                departure_time: format_timestamp(route.departure_time()),
                arrival_time: format_timestamp(route.arrival_time()),
                optimization_score: round2(route.score()),
            },
            segments: route.segments().iter().map(SegmentRecord::from_segment).collect(),
        }
    }
}

impl SegmentRecord {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            sequence: segment.sequence,
            mode: segment.mode.to_string(),
            route_name: segment.route_name.clone(),
            from_stop: segment.from.name().to_string(),
            to_stop: segment.to.name().to_string(),
            departure_time: format_timestamp(segment.departure),
            arrival_time: format_timestamp(segment.arrival),
            duration_minutes: round2(segment.duration_minutes),
            cost: segment.fare,
            distance_km: round2(segment.distance_km),
        }
    }
}

impl From<&Route> for RouteRecord {
    fn from(route: &Route) -> Self {
        Self::from_route(route)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
