//! Router interface shared by both search strategies.

use std::time::Duration;

use chrono::NaiveDateTime;

use super::objective::OptimizationMode;
use crate::domain::{DomainError, Route, StopId};
use crate::network::Network;

/// Error from route search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// The origin or destination is not a stop of the network
    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    /// The found path could not be turned into a consistent route
    #[error("failed to assemble route: {0}")]
    Assembly(#[from] DomainError),

    /// A background search task panicked or was cancelled
    #[error("search task failed: {0}")]
    TaskFailed(String),
}

/// Per-request overrides of the configured IDA* limits.
///
/// Dijkstra always runs to completion and ignores the budget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchBudget {
    pub max_iterations: Option<usize>,
    pub timeout: Option<Duration>,
}

/// Request for a stop-to-stop route.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: StopId,
    pub destination: StopId,
    pub departure: NaiveDateTime,
    pub mode: OptimizationMode,
    pub budget: SearchBudget,
}

impl SearchRequest {
    /// Create a new search request with no budget overrides.
    pub fn new(
        origin: StopId,
        destination: StopId,
        departure: NaiveDateTime,
        mode: OptimizationMode,
    ) -> Self {
        Self {
            origin,
            destination,
            departure,
            mode,
            budget: SearchBudget::default(),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.budget.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.budget.timeout = Some(timeout);
        self
    }

    /// Validate the search request against a network.
    pub fn validate(&self, network: &Network) -> Result<(), SearchError> {
        for stop in [self.origin, self.destination] {
            if !network.contains(stop) {
                return Err(SearchError::UnknownStop(stop));
            }
        }
        Ok(())
    }
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Route),
    /// The destination cannot be reached from the origin.
    Unreachable,
    /// IDA* ran out of iterations or time before settling the question.
    BudgetExceeded {
        iterations: usize,
        elapsed: Duration,
    },
}

/// Result of route search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub outcome: SearchOutcome,

    /// Stops settled (Dijkstra) or children generated (IDA*).
    pub nodes_explored: usize,

    /// Bound-raising iterations; always 1 for Dijkstra.
    pub iterations: usize,
}

impl SearchResult {
    pub fn found(route: Route, nodes_explored: usize, iterations: usize) -> Self {
        Self {
            outcome: SearchOutcome::Found(route),
            nodes_explored,
            iterations,
        }
    }

    pub fn unreachable(nodes_explored: usize, iterations: usize) -> Self {
        Self {
            outcome: SearchOutcome::Unreachable,
            nodes_explored,
            iterations,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        match &self.outcome {
            SearchOutcome::Found(route) => Some(route),
            _ => None,
        }
    }

    /// The route, if one was found. Unreachable and budget-exceeded both
    /// mean no route.
    pub fn into_route(self) -> Option<Route> {
        match self.outcome {
            SearchOutcome::Found(route) => Some(route),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Found(_))
    }
}

/// A stop-to-stop search strategy.
///
/// Implementations are synchronous and single-threaded per call, and keep
/// all search state local to the call so one router can serve concurrent
/// requests.
pub trait Router {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError>;

    /// Convenience wrapper returning only the route.
    fn find_route(&self, request: &SearchRequest) -> Result<Option<Route>, SearchError> {
        Ok(self.search(request)?.into_route())
    }
}
