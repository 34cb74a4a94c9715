//! Route types.
//!
//! A `Route` is a complete itinerary from origin to destination with its
//! aggregate metrics.

use chrono::NaiveDateTime;

use super::{DomainError, Segment, TransportMode};

/// A complete, timed, costed itinerary.
///
/// # Invariants
///
/// - Segments are numbered 1, 2, 3, ...
/// - Consecutive segments connect: `segments[i].to == segments[i + 1].from`
/// - Consecutive segments chain in time:
///   `segments[i + 1].departure == segments[i].arrival`
///
/// An empty route (origin equals destination) is valid; it departs and
/// arrives at the requested time.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    segments: Vec<Segment>,
    total_time_minutes: f64,
    total_fare: u32,
    total_distance_km: f64,
    num_transfers: usize,
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
    score: f64,
}

impl Route {
    /// Construct a route from chained segments.
    ///
    /// `total_fare` is the fare model's total for the itinerary and
    /// `score` the accumulated search cost under the active optimization
    /// mode. `departure` is used when there are no segments.
    pub(crate) fn new(
        segments: Vec<Segment>,
        total_fare: u32,
        departure: NaiveDateTime,
        score: f64,
    ) -> Result<Self, DomainError> {
        for (position, segment) in segments.iter().enumerate() {
            if segment.sequence != position + 1 {
                return Err(DomainError::SequenceMismatch {
                    position,
                    sequence: segment.sequence,
                });
            }
            if segment.arrival < segment.departure {
                return Err(DomainError::NegativeDuration {
                    sequence: segment.sequence,
                });
            }
        }

        for window in segments.windows(2) {
            if window[0].to != window[1].from {
                return Err(DomainError::SegmentsNotConnected {
                    sequence: window[1].sequence,
                });
            }
            if window[0].arrival != window[1].departure {
                return Err(DomainError::TimestampGap {
                    sequence: window[1].sequence,
                });
            }
        }

        let total_time_minutes = segments.iter().map(|s| s.duration_minutes).sum();
        let total_distance_km = segments.iter().map(|s| s.distance_km).sum();
        let num_transfers = count_transfers(&segments);
        let departure = segments.first().map_or(departure, |s| s.departure);
        let arrival = segments.last().map_or(departure, |s| s.arrival);

        Ok(Route {
            segments,
            total_time_minutes,
            total_fare,
            total_distance_km,
            num_transfers,
            departure,
            arrival,
            score,
        })
    }

    /// Replace the score, e.g. after re-scoring a door-to-door route.
    pub(crate) fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Returns the segments in travel order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Consumes the route, returning its segments.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Sum of segment durations.
    pub fn total_time_minutes(&self) -> f64 {
        self.total_time_minutes
    }

    /// Fare charged for the whole itinerary.
    pub fn total_fare(&self) -> u32 {
        self.total_fare
    }

    /// Sum of segment distances.
    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Number of mode changes between rides.
    pub fn num_transfers(&self) -> usize {
        self.num_transfers
    }

    pub fn departure_time(&self) -> NaiveDateTime {
        self.departure
    }

    pub fn arrival_time(&self) -> NaiveDateTime {
        self.arrival
    }

    /// Accumulated search cost under the optimization mode that found this
    /// route.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns true if origin and destination coincide.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Modes ridden, in order, collapsing consecutive repeats and skipping
    /// walks and transfers.
    pub fn modes(&self) -> Vec<TransportMode> {
        let mut modes: Vec<TransportMode> = Vec::new();
        for segment in self.segments.iter().filter(|s| s.is_ride()) {
            if modes.last() != Some(&segment.mode) {
                modes.push(segment.mode);
            }
        }
        modes
    }
}

/// Count adjacent segment pairs whose mode differs.
///
/// A pair is not counted when the entered segment is a transfer link or a
/// walk, or when the previous segment is a walk (door-to-door access). The
/// access and egress walks of a door-to-door route are therefore never
/// transfers: walk, rail, walk counts zero, not two.
pub fn count_transfers(segments: &[Segment]) -> usize {
    segments
        .windows(2)
        .filter(|w| {
            w[1].mode != w[0].mode
                && !w[1].is_transfer()
                && !w[1].is_walk()
                && !w[0].is_walk()
        })
        .count()
}
