//! Network loading error types.

use std::path::PathBuf;

use crate::domain::StopId;

/// Errors raised while loading or building a network.
///
/// All of these are detected before any search runs; routers assume a
/// validated graph.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Reading the network file failed
    #[error("failed to read network file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The network file is not valid JSON or has the wrong shape
    #[error("invalid network data: {0}")]
    Json(#[from] serde_json::Error),

    /// Two stops share the same external code
    #[error("duplicate stop id: {0}")]
    DuplicateStop(String),

    /// An edge references a stop code that was never loaded
    #[error("edge {edge} references unknown stop id {code:?}")]
    UnknownStopCode { edge: usize, code: String },

    /// An edge references a stop id outside the registry
    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    /// An edge has a negative or non-finite distance or duration
    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: StopId,
        to: StopId,
        reason: &'static str,
    },
}
