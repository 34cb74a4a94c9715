//! Domain error types.
//!
//! These errors represent itinerary consistency failures in the domain
//! layer. They are distinct from network loading and query errors.

/// Domain-level errors for route construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Consecutive segments don't share an endpoint
    #[error("segment {sequence} does not start where the previous segment ended")]
    SegmentsNotConnected { sequence: usize },

    /// A segment departs at a different time than the previous one arrived
    #[error("segment {sequence} does not depart when the previous segment arrived")]
    TimestampGap { sequence: usize },

    /// A segment arrives before it departs
    #[error("segment {sequence} arrives before it departs")]
    NegativeDuration { sequence: usize },

    /// Sequence numbers are not 1, 2, 3, ...
    #[error("segment at position {position} has sequence number {sequence}")]
    SequenceMismatch { position: usize, sequence: usize },
}
