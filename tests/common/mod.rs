//! Shared fakes and builders for integration tests.
#![allow(dead_code)]

use alb_status_report::config::ReportConfig;
use alb_status_report::error::{ReportError, Result};
use alb_status_report::models::{RawLogRow, ServiceId};
use alb_status_report::notification::{Notifier, RecordingNotifier};
use alb_status_report::orchestration::{Collaborators, ReportJob};
use alb_status_report::query::{QueryExecutor, QueryRequest, QueryState, QueryStatus, Sleeper};
use alb_status_report::render::{RenderContext, RenderedDocument, ReportRenderer, TextTableRenderer};
use alb_status_report::storage::{InMemoryObjectStore, StorageLocator};
use async_trait::async_trait;
use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const RESULTS_BUCKET: &str = "athena-results";
pub const REPORT_BUCKET: &str = "reports";
pub const TOPIC: &str = "arn:aws:sns:us-east-1:123456789012:alb-reports";

/// Target group ARN carrying the routing key of `service`
pub fn arn(service: &str) -> String {
    format!("arn:aws:elasticloadbalancing:us-east-1:123456789012:targetgroup/{service}-tg/50dc6c495c0c9188")
}

pub fn row(service: &str, status: &str, count: &str) -> RawLogRow {
    RawLogRow::new(arn(service), status, count)
}

pub fn services(names: &[&str]) -> Vec<ServiceId> {
    names.iter().map(|name| ServiceId::from(*name)).collect()
}

/// Query result CSV in the shape the query service writes
pub fn result_csv(rows: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut out = String::from("\"target_group_arn\",\"elb_status_code\",\"error_count\"\n");
    for (service, status, count) in rows {
        out.push_str(&format!("\"{}\",\"{status}\",\"{count}\"\n", arn(service)));
    }
    out.into_bytes()
}

pub fn test_config(allowed: &[&str], overrides: &[&str]) -> ReportConfig {
    ReportConfig {
        allowed_services: services(allowed),
        redirect_overrides: services(overrides).into_iter().collect::<BTreeSet<_>>(),
        report_bucket: REPORT_BUCKET.to_string(),
        notification_topic: Some(TOPIC.to_string()),
        max_wait: Duration::from_secs(10),
        poll_interval: Duration::from_secs(2),
        ..ReportConfig::default()
    }
}

/// Query executor that replays a fixed status script. The last status
/// repeats forever.
pub struct ScriptedQueryExecutor {
    statuses: Mutex<VecDeque<QueryStatus>>,
    last: QueryStatus,
    result_location: StorageLocator,
    submitted: Mutex<Vec<QueryRequest>>,
    polls: Mutex<u32>,
    reject_submission: bool,
}

impl ScriptedQueryExecutor {
    pub fn new(mut script: Vec<QueryStatus>, result_location: StorageLocator) -> Self {
        let last = script
            .pop()
            .unwrap_or_else(|| QueryStatus::new(QueryState::Succeeded));
        Self {
            statuses: Mutex::new(script.into()),
            last,
            result_location,
            submitted: Mutex::new(Vec::new()),
            polls: Mutex::new(0),
            reject_submission: false,
        }
    }

    pub fn succeeding(result_location: StorageLocator) -> Self {
        Self::new(vec![QueryStatus::new(QueryState::Succeeded)], result_location)
    }

    pub fn rejecting() -> Self {
        let mut executor = Self::succeeding(StorageLocator::new(RESULTS_BUCKET, "unused.csv"));
        executor.reject_submission = true;
        executor
    }

    pub fn submitted(&self) -> Vec<QueryRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn polls(&self) -> u32 {
        *self.polls.lock().unwrap()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedQueryExecutor {
    async fn submit_query(&self, request: &QueryRequest) -> Result<String> {
        if self.reject_submission {
            return Err(ReportError::query_submission("Access denied"));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        Ok(format!("exec-{}", submitted.len()))
    }

    async fn get_status(&self, _execution_id: &str) -> Result<QueryStatus> {
        *self.polls.lock().unwrap() += 1;
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone()))
    }

    async fn get_result_location(&self, _execution_id: &str) -> Result<StorageLocator> {
        Ok(self.result_location.clone())
    }
}

/// Records requested sleeps without waiting. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub struct FailingRenderer;

impl ReportRenderer for FailingRenderer {
    fn render(&self, _context: &RenderContext<'_>) -> Result<RenderedDocument> {
        Err(ReportError::render("font table missing"))
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn publish(&self, _topic: &str, _subject: &str, _body: &str) -> Result<()> {
        Err(ReportError::publish("publish", "topic does not exist"))
    }
}

/// A job wired to in-memory collaborators, with handles for inspection
pub struct Harness {
    pub job: ReportJob<RecordingSleeper>,
    pub executor: Arc<ScriptedQueryExecutor>,
    pub store: InMemoryObjectStore,
    pub notifier: RecordingNotifier,
    pub sleeper: RecordingSleeper,
}

pub struct HarnessBuilder {
    config: ReportConfig,
    executor: Option<ScriptedQueryExecutor>,
    results: Vec<u8>,
    renderer: Arc<dyn ReportRenderer>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl HarnessBuilder {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            executor: None,
            results: result_csv(&[]),
            renderer: Arc::new(TextTableRenderer::default()),
            notifier: None,
        }
    }

    pub fn results(mut self, body: Vec<u8>) -> Self {
        self.results = body;
        self
    }

    pub fn executor(mut self, executor: ScriptedQueryExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn renderer(mut self, renderer: impl ReportRenderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    pub fn build(self) -> Harness {
        let location = StorageLocator::new(RESULTS_BUCKET, "queries/exec-1.csv");
        let store = InMemoryObjectStore::new();
        store.insert(location.clone(), self.results);

        let executor = Arc::new(
            self.executor
                .unwrap_or_else(|| ScriptedQueryExecutor::succeeding(location)),
        );
        let recording = RecordingNotifier::new();
        let notifier: Arc<dyn Notifier> = self
            .notifier
            .unwrap_or_else(|| Arc::new(recording.clone()));
        let sleeper = RecordingSleeper::default();

        let job = ReportJob::with_sleeper(
            self.config,
            Collaborators {
                query_executor: executor.clone(),
                object_store: Arc::new(store.clone()),
                notifier,
                renderer: self.renderer,
            },
            sleeper.clone(),
        )
        .expect("test configuration is valid");

        Harness {
            job,
            executor,
            store,
            notifier: recording,
            sleeper,
        }
    }
}
