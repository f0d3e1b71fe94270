//! # Query Execution
//!
//! Collaborator contract for the analytics query service, the bounded
//! completion wait, the aggregation SQL and the result row reader.

pub mod replay;
pub mod results;
pub mod sql;
pub mod waiter;

pub use replay::FileReplayQueryExecutor;
pub use results::read_rows;
pub use waiter::{CompletionWaiter, Sleeper, TokioSleeper};

use crate::error::Result;
use crate::storage::StorageLocator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution state reported by the query service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl QueryState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            QueryState::Succeeded | QueryState::Failed | QueryState::Cancelled
        )
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryState::Queued => write!(f, "QUEUED"),
            QueryState::Running => write!(f, "RUNNING"),
            QueryState::Succeeded => write!(f, "SUCCEEDED"),
            QueryState::Failed => write!(f, "FAILED"),
            QueryState::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStatus {
    pub state: QueryState,
    /// Service-provided explanation for FAILED / CANCELLED
    pub reason: Option<String>,
}

impl QueryStatus {
    pub fn new(state: QueryState) -> Self {
        Self {
            state,
            reason: None,
        }
    }

    pub fn with_reason(state: QueryState, reason: impl Into<String>) -> Self {
        Self {
            state,
            reason: Some(reason.into()),
        }
    }
}

/// Query submission parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub sql: String,
    pub database: String,
    pub output_location: String,
}

/// Analytics query service
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Submit a query, returning its execution id
    async fn submit_query(&self, request: &QueryRequest) -> Result<String>;

    async fn get_status(&self, execution_id: &str) -> Result<QueryStatus>;

    /// Where the finished query wrote its tabular output
    async fn get_result_location(&self, execution_id: &str) -> Result<StorageLocator>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!QueryState::Queued.is_terminal());
        assert!(!QueryState::Running.is_terminal());
        assert!(QueryState::Succeeded.is_terminal());
        assert!(QueryState::Failed.is_terminal());
        assert!(QueryState::Cancelled.is_terminal());
    }

    #[test]
    fn test_state_serializes_like_service() {
        assert_eq!(
            serde_json::to_string(&QueryState::Succeeded).unwrap(),
            "\"SUCCEEDED\""
        );
        assert_eq!(QueryState::Cancelled.to_string(), "CANCELLED");
    }
}
