//! Turning raw hop chains into timed, costed routes.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{DomainError, Hop, Route, Segment, StopId, Waypoint, advance};
use crate::fare::FareTable;
use crate::network::Network;

/// Builds [`Route`]s from router output.
#[derive(Debug, Clone, Copy)]
pub struct RouteAssembler<'a> {
    network: &'a Network,
    fares: &'a FareTable,
}

impl<'a> RouteAssembler<'a> {
    pub fn new(network: &'a Network, fares: &'a FareTable) -> Self {
        Self { network, fares }
    }

    /// Assemble a route leaving at `departure` along `hops`.
    ///
    /// `score` is the search cost the router accumulated along the path.
    pub fn assemble(
        &self,
        hops: &[Hop<'_>],
        departure: NaiveDateTime,
        score: f64,
    ) -> Result<Route, DomainError> {
        let segments = hops
            .iter()
            .enumerate()
            .map(|(i, hop)| Segment {
                sequence: i + 1,
                mode: hop.mode(),
                route_name: hop.route_name().to_string(),
                from: self.waypoint(hop.from()),
                to: self.waypoint(hop.to()),
                departure,
                arrival: departure,
                duration_minutes: hop.duration_minutes(),
                fare: 0,
                distance_km: hop.distance_km(),
            })
            .collect();

        self.chain(segments, departure, score)
    }

    /// Renumber, retime and re-price `segments` as one itinerary leaving at
    /// `departure`.
    ///
    /// Each segment departs when the previous one arrives; durations are
    /// kept. Fares are recomputed for the itinerary as a whole.
    pub fn chain(
        &self,
        mut segments: Vec<Segment>,
        departure: NaiveDateTime,
        score: f64,
    ) -> Result<Route, DomainError> {
        let mut at = departure;
        for (i, segment) in segments.iter_mut().enumerate() {
            segment.sequence = i + 1;
            segment.departure = at;
            segment.arrival = advance(at, segment.duration_minutes);
            at = segment.arrival;
        }

        let fares = self.fares.fare_breakdown(&segments);
        for (segment, fare) in segments.iter_mut().zip(&fares) {
            segment.fare = *fare;
        }
        let total_fare = fares.iter().sum();

        let route = Route::new(segments, total_fare, departure, score)?;
        debug!(
            segments = route.segment_count(),
            minutes = route.total_time_minutes(),
            fare = route.total_fare(),
            transfers = route.num_transfers(),
            "Assembled route"
        );
        Ok(route)
    }

    fn waypoint(&self, id: StopId) -> Waypoint {
        let name = self
            .network
            .stop(id)
            .map_or_else(|| id.to_string(), |s| s.name.clone());
        Waypoint::Stop { id, name }
    }
}
