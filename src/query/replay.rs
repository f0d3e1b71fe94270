//! Query executor that serves a prepared CSV file as the query result.
//!
//! On submission the file is copied to the request's output location in the
//! object store under a fresh execution id, the way the managed service
//! writes its results. Executions succeed immediately.

use super::{QueryExecutor, QueryRequest, QueryState, QueryStatus};
use crate::error::{ReportError, Result};
use crate::storage::{ObjectStore, StorageLocator};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

pub struct FileReplayQueryExecutor {
    source: PathBuf,
    store: Arc<dyn ObjectStore>,
    executions: Mutex<HashMap<String, StorageLocator>>,
}

impl FileReplayQueryExecutor {
    pub fn new(source: impl Into<PathBuf>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            source: source.into(),
            store,
            executions: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, execution_id: &str) -> Option<StorageLocator> {
        self.executions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(execution_id)
            .cloned()
    }
}

#[async_trait]
impl QueryExecutor for FileReplayQueryExecutor {
    async fn submit_query(&self, request: &QueryRequest) -> Result<String> {
        let output = StorageLocator::parse_prefix(&request.output_location).ok_or_else(|| {
            ReportError::query_submission(format!(
                "Output location must be s3://bucket[/prefix], got {}",
                request.output_location
            ))
        })?;

        let body = tokio::fs::read(&self.source).await.map_err(|e| {
            ReportError::query_submission(format!(
                "Unable to read result source {}: {e}",
                self.source.display()
            ))
        })?;

        let execution_id = Uuid::new_v4().to_string();
        let locator = output.join(&format!("{execution_id}.csv"));

        self.store
            .put_object(&locator.bucket, &locator.key, body)
            .await
            .map_err(|e| ReportError::query_submission(format!("Unable to stage results: {e}")))?;

        info!(
            execution_id = %execution_id,
            database = %request.database,
            source = %self.source.display(),
            output = %locator,
            "Replayed query results"
        );

        self.executions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(execution_id.clone(), locator);

        Ok(execution_id)
    }

    async fn get_status(&self, execution_id: &str) -> Result<QueryStatus> {
        Ok(match self.lookup(execution_id) {
            Some(_) => QueryStatus::new(QueryState::Succeeded),
            None => QueryStatus::with_reason(QueryState::Failed, "Unknown execution id"),
        })
    }

    async fn get_result_location(&self, execution_id: &str) -> Result<StorageLocator> {
        self.lookup(execution_id).ok_or_else(|| {
            ReportError::result_fetch(format!("No results recorded for execution {execution_id}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryObjectStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn request(output: &str) -> QueryRequest {
        QueryRequest {
            sql: "SELECT 1".to_string(),
            database: "db".to_string(),
            output_location: output.to_string(),
        }
    }

    #[tokio::test]
    async fn test_bad_output_location_is_submission_error() {
        let executor =
            FileReplayQueryExecutor::new("/unused.csv", Arc::new(InMemoryObjectStore::new()));
        for location in ["results/queries/", "s3:///queries"] {
            let err = executor.submit_query(&request(location)).await.unwrap_err();
            assert_eq!(err.error_kind(), "QuerySubmissionError", "{location}");
        }
    }

    #[tokio::test]
    async fn test_submission_stages_results() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "target_group_arn,elb_status_code,error_count").unwrap();

        let store = InMemoryObjectStore::new();
        let executor = FileReplayQueryExecutor::new(file.path(), Arc::new(store.clone()));

        let id = executor.submit_query(&request("s3://results/queries/")).await.unwrap();
        assert_eq!(
            executor.get_status(&id).await.unwrap().state,
            QueryState::Succeeded
        );

        let locator = executor.get_result_location(&id).await.unwrap();
        assert_eq!(locator.bucket, "results");
        assert_eq!(locator.key, format!("queries/{id}.csv"));
        assert!(store.object("results", &locator.key).is_some());
    }

    #[tokio::test]
    async fn test_missing_source_is_submission_error() {
        let executor = FileReplayQueryExecutor::new(
            "/nonexistent/results.csv",
            Arc::new(InMemoryObjectStore::new()),
        );
        let err = executor
            .submit_query(&request("s3://results/queries/"))
            .await
            .unwrap_err();
        assert_eq!(err.error_kind(), "QuerySubmissionError");
    }

    #[tokio::test]
    async fn test_unknown_execution() {
        let executor =
            FileReplayQueryExecutor::new("/unused.csv", Arc::new(InMemoryObjectStore::new()));
        let status = executor.get_status("nope").await.unwrap();
        assert_eq!(status.state, QueryState::Failed);
        assert!(executor.get_result_location("nope").await.is_err());
    }
}
