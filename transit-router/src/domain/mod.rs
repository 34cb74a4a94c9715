//! Domain types for the transit router.
//!
//! This module contains the core domain model types: stops, edges,
//! transport modes, and the timed segments and routes produced by the
//! planner. Routes enforce their chaining invariants at construction time,
//! so code that receives a `Route` can trust its consistency.

mod edge;
mod error;
mod mode;
mod route;
mod segment;
mod stop;
mod time;

pub use edge::{Edge, Hop, TRANSFER_ROUTE_NAME, TransferLink};
pub use error::DomainError;
pub use mode::{InvalidTransportMode, TransportMode};
pub use route::{Route, count_transfers};
pub use segment::{Segment, Waypoint};
pub use stop::{Stop, StopId};
pub use time::{TIMESTAMP_FORMAT, advance, format_timestamp, minutes_to_duration};
