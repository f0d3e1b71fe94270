//! # Report Error Types
//!
//! Fatal error taxonomy for a report run. Row-level problems (malformed rows,
//! unresolved services) are not errors; they are recorded as
//! [`RowOutcome`](crate::aggregation::RowOutcome) values by the aggregator.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Query submission failed: {message}")]
    QuerySubmission { message: String },

    #[error("Query {execution_id} timed out after {}s", .waited.as_secs())]
    QueryTimeout {
        execution_id: String,
        waited: Duration,
    },

    #[error("Query {execution_id} {state}: {reason}")]
    QueryFailed {
        execution_id: String,
        state: String,
        reason: String,
    },

    #[error("Result fetch failed: {message}")]
    ResultFetch { message: String },

    #[error("Render failed: {message}")]
    Render { message: String },

    #[error("Publish failed: {operation}: {message}")]
    Publish { operation: String, message: String },
}

impl ReportError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn query_submission(message: impl Into<String>) -> Self {
        Self::QuerySubmission {
            message: message.into(),
        }
    }

    pub fn query_timeout(execution_id: impl Into<String>, waited: Duration) -> Self {
        Self::QueryTimeout {
            execution_id: execution_id.into(),
            waited,
        }
    }

    pub fn query_failed(
        execution_id: impl Into<String>,
        state: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::QueryFailed {
            execution_id: execution_id.into(),
            state: state.into(),
            reason: reason.into(),
        }
    }

    pub fn result_fetch(message: impl Into<String>) -> Self {
        Self::ResultFetch {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn publish(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Stable kind name reported in the invocation result
    pub fn error_kind(&self) -> &'static str {
        match self {
            ReportError::Configuration { .. } => "ConfigurationError",
            ReportError::QuerySubmission { .. } => "QuerySubmissionError",
            ReportError::QueryTimeout { .. } => "QueryTimeoutError",
            ReportError::QueryFailed { .. } => "QueryFailedError",
            ReportError::ResultFetch { .. } => "ResultFetchError",
            ReportError::Render { .. } => "RenderError",
            ReportError::Publish { .. } => "PublishError",
        }
    }

    /// Errors raised after aggregation completed, where the computed report
    /// is still available for diagnostics
    pub fn is_post_aggregation(&self) -> bool {
        matches!(self, ReportError::Render { .. } | ReportError::Publish { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
