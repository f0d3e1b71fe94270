//! Per-invocation context and the structured result returned to the caller.

use crate::aggregation::AggregationStats;
use crate::error::ReportError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and clock of one report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Unique per invocation; embedded in every output key
    pub run_id: String,
    pub report_date: NaiveDate,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    /// Context for a run starting now. A caller-supplied request id is used as
    /// the run id when present, otherwise a fresh UUID is minted.
    pub fn now(request_id: Option<String>) -> Self {
        let started_at = Utc::now();
        Self::at(request_id, started_at)
    }

    pub fn at(request_id: Option<String>, started_at: DateTime<Utc>) -> Self {
        let run_id = request_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            run_id,
            report_date: started_at.date_naive(),
            started_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSuccess {
    pub date: String,
    pub query_execution_id: String,
    pub total_requests_processed: u64,
    pub report_location: String,
    pub link_validity_hours: u64,
    pub notification_sent: bool,
    pub run_id: String,
    pub rows: RowCounts,
}

/// Row tallies surfaced in the result for operators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub processed: u64,
    pub skipped: u64,
    pub ignored: u64,
}

impl From<&AggregationStats> for RowCounts {
    fn from(stats: &AggregationStats) -> Self {
        Self {
            processed: stats.processed_rows,
            skipped: stats.skipped_rows(),
            ignored: stats.ignored_rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFailure {
    pub error_kind: String,
    pub message: String,
    pub run_id: String,
}

/// Outcome of a run, tagged by `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationResult {
    Success(RunSuccess),
    Error(RunFailure),
}

impl InvocationResult {
    pub fn failure(error: &ReportError, run_id: impl Into<String>) -> Self {
        InvocationResult::Error(RunFailure {
            error_kind: error.error_kind().to_string(),
            message: error.to_string(),
            run_id: run_id.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success(_))
    }

    pub fn run_id(&self) -> &str {
        match self {
            InvocationResult::Success(success) => &success.run_id,
            InvocationResult::Error(failure) => &failure.run_id,
        }
    }
}
