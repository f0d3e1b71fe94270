//! # Report Job
//!
//! Sequences one report run: submit the query, wait for it, fetch and
//! aggregate the rows, render, store, link and notify. Every fatal error is
//! caught in [`ReportJob::run`] and turned into an
//! [`InvocationResult::Error`]; nothing escapes as a panic or `Err`.

use super::invocation::{InvocationResult, RowCounts, RunContext, RunSuccess};
use crate::aggregation::{
    AggregationOutcome, Aggregator, ReportSummary, ServiceRoutingTable, StatusOverrideSet,
};
use crate::config::ReportConfig;
use crate::constants::REPORT_FILE_STEM;
use crate::error::{ReportError, Result};
use crate::logging::{log_error, log_pipeline_stage};
use crate::notification::{NotificationMessage, Notifier};
use crate::query::sql::{status_code_query, LogTables};
use crate::query::{
    read_rows, CompletionWaiter, QueryExecutor, QueryRequest, Sleeper, TokioSleeper,
};
use crate::render::{RenderContext, ReportRenderer};
use crate::storage::{ObjectStore, StorageLocator};
use std::sync::Arc;
use tracing::{debug, error, info, warn, Instrument};

/// External services a run talks to
#[derive(Clone)]
pub struct Collaborators {
    pub query_executor: Arc<dyn QueryExecutor>,
    pub object_store: Arc<dyn ObjectStore>,
    pub notifier: Arc<dyn Notifier>,
    pub renderer: Arc<dyn ReportRenderer>,
}

/// Where the rendered report ended up
#[derive(Debug, Clone, PartialEq, Eq)]
struct PublishedReport {
    locator: StorageLocator,
    link: String,
    notification_sent: bool,
}

pub struct ReportJob<S = TokioSleeper> {
    config: ReportConfig,
    routing: ServiceRoutingTable,
    overrides: StatusOverrideSet,
    collaborators: Collaborators,
    waiter: CompletionWaiter<S>,
}

impl ReportJob<TokioSleeper> {
    pub fn new(config: ReportConfig, collaborators: Collaborators) -> Result<Self> {
        Self::with_sleeper(config, collaborators, TokioSleeper)
    }
}

impl<S: Sleeper> ReportJob<S> {
    /// Validate `config` and build the run-wide lookup structures once
    pub fn with_sleeper(config: ReportConfig, collaborators: Collaborators, sleeper: S) -> Result<Self> {
        config.validate()?;

        let routing = ServiceRoutingTable::new(&config.allowed_services);
        let overrides = StatusOverrideSet::new(config.redirect_overrides.iter().cloned());
        let waiter = CompletionWaiter::with_sleeper(config.poll_interval, config.max_wait, sleeper);

        Ok(Self {
            config,
            routing,
            overrides,
            collaborators,
            waiter,
        })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn routing(&self) -> &ServiceRoutingTable {
        &self.routing
    }

    /// Run the whole pipeline, mapping any failure to a structured result
    pub async fn run(&self, context: RunContext) -> InvocationResult {
        let span = tracing::info_span!(
            "report_run",
            run_id = %context.run_id,
            date = %context.report_date
        );

        async {
            log_pipeline_stage("run", &context.run_id, "started", None);

            match self.execute(&context).await {
                Ok(success) => {
                    info!(
                        total_requests = success.total_requests_processed,
                        report_location = %success.report_location,
                        "Report run completed"
                    );
                    InvocationResult::Success(success)
                }
                Err(e) => {
                    log_error("report_job", "run", &e.to_string(), Some(e.error_kind()));
                    InvocationResult::failure(&e, &context.run_id)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, context: &RunContext) -> Result<RunSuccess> {
        let execution_id = self.submit(context).await?;

        self.waiter
            .wait(self.collaborators.query_executor.as_ref(), &execution_id)
            .await?;
        log_pipeline_stage("wait", &context.run_id, "completed", Some(&execution_id));

        let outcome = self.fetch_and_aggregate(&execution_id).await?;
        let summary = outcome.report.summary();
        info!(
            total_requests = summary.total_requests,
            success = summary.totals.success,
            client_error = summary.totals.client_error,
            server_error = summary.totals.server_error,
            "Aggregated request totals"
        );

        let published = match self.publish(context, &summary).await {
            Ok(published) => published,
            Err(e) => {
                preserve_for_diagnostics(&summary, &e);
                return Err(e);
            }
        };
        debug!(link = %published.link, "Report download link issued");

        Ok(RunSuccess {
            date: context.report_date.format("%Y-%m-%d").to_string(),
            query_execution_id: execution_id,
            total_requests_processed: summary.total_requests,
            report_location: published.locator.to_string(),
            link_validity_hours: self.config.link_ttl_hours(),
            notification_sent: published.notification_sent,
            run_id: context.run_id.clone(),
            rows: RowCounts::from(&outcome.stats),
        })
    }

    async fn submit(&self, context: &RunContext) -> Result<String> {
        let tables = LogTables {
            partitioned: self.config.partitioned_table.clone(),
            internal: self.config.internal_table.clone(),
        };
        let request = QueryRequest {
            sql: status_code_query(&tables, context.report_date),
            database: self.config.database.clone(),
            output_location: self.config.query_output_location.clone(),
        };

        let execution_id = self
            .collaborators
            .query_executor
            .submit_query(&request)
            .await?;

        log_pipeline_stage("submit", &context.run_id, "completed", Some(&execution_id));
        Ok(execution_id)
    }

    async fn fetch_and_aggregate(&self, execution_id: &str) -> Result<AggregationOutcome> {
        let locator = self
            .collaborators
            .query_executor
            .get_result_location(execution_id)
            .await?;
        info!(location = %locator, "Fetching query results");

        let body = self.collaborators.object_store.get_object(&locator).await?;
        let rows = read_rows(body)?;

        Aggregator::new(&self.routing, &self.overrides).aggregate(rows)
    }

    async fn publish(&self, context: &RunContext, summary: &ReportSummary) -> Result<PublishedReport> {
        let document = self.collaborators.renderer.render(&RenderContext {
            report_date: context.report_date,
            generated_at: context.started_at,
            summary,
        })?;

        let key = report_key(&self.config.report_prefix, context, document.extension);
        let locator = StorageLocator::new(self.config.report_bucket.clone(), key);

        info!(location = %locator, pages = document.pages, "Uploading report");
        self.collaborators
            .object_store
            .put_object(&locator.bucket, &locator.key, document.body)
            .await?;

        let link = self
            .collaborators
            .object_store
            .presign_get(&locator.bucket, &locator.key, self.config.link_ttl)
            .await?;
        log_pipeline_stage("store", &context.run_id, "completed", Some(&locator.to_string()));

        let notification_sent = match &self.config.notification_topic {
            Some(topic) => {
                let message = NotificationMessage::for_report(
                    context.report_date,
                    summary,
                    &link,
                    self.config.link_ttl_hours(),
                );
                self.collaborators
                    .notifier
                    .publish(topic, &message.subject, &message.body)
                    .await?;
                info!(topic = %topic, "Notification sent");
                true
            }
            None => {
                warn!("No notification topic configured; skipping notification");
                false
            }
        };

        Ok(PublishedReport {
            locator,
            link,
            notification_sent,
        })
    }
}

/// Object key for the report, unique per run
pub fn report_key(prefix: &str, context: &RunContext, extension: &str) -> String {
    let file = format!(
        "{REPORT_FILE_STEM}_{}_{}.{extension}",
        context.report_date.format("%Y-%m-%d"),
        context.run_id
    );
    if prefix.is_empty() {
        file
    } else {
        format!("{prefix}/{file}")
    }
}

/// Keep the computed counts in the log when a later stage fails
fn preserve_for_diagnostics(summary: &ReportSummary, cause: &ReportError) {
    if !cause.is_post_aggregation() {
        return;
    }
    for (service, counts) in &summary.rows {
        error!(
            service = %service,
            success = counts.success,
            client_error = counts.client_error,
            server_error = counts.server_error,
            cause = cause.error_kind(),
            "Aggregated counts of unpublished report"
        );
    }
}
