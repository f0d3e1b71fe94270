//! # ALB Status Report Runner
//!
//! Runs one report job against local collaborators and prints the structured
//! result as JSON on stdout.
//!
//! An optional invocation event is taken from the first argument, or from
//! stdin when the argument is `-`. A `request_id` field in the event becomes
//! the run id; everything else in it is only logged.

use alb_status_report::config::ReportConfig;
use alb_status_report::error::ReportError;
use alb_status_report::logging::init_structured_logging;
use alb_status_report::notification::LoggingNotifier;
use alb_status_report::orchestration::{Collaborators, InvocationResult, ReportJob, RunContext};
use alb_status_report::query::FileReplayQueryExecutor;
use alb_status_report::render::TextTableRenderer;
use alb_status_report::storage::{LocalObjectStore, ObjectStore};
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_STORE_DIR: &str = "./report-store";
const STDIN_MARKER: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "alb-status-report")]
#[command(about = "Run the daily ALB status-code report once")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Invocation event as JSON, or `-` to read it from stdin
    event: Option<String>,

    /// Query result CSV to replay (overrides RESULT_SOURCE_FILE)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Root directory of the local object store (overrides REPORT_STORE_DIR)
    #[arg(long)]
    store_dir: Option<PathBuf>,
}

/// Invocation event; unknown fields are accepted and ignored
#[derive(Debug, Default, Deserialize)]
struct InvocationEvent {
    #[serde(default)]
    request_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_structured_logging();

    let event = read_event(cli.event.as_deref()).context("Failed to read invocation event")?;
    let context = RunContext::now(event.request_id);
    info!(run_id = %context.run_id, date = %context.report_date, "🚀 Starting report run");

    let result = match build_job(&cli) {
        Ok(job) => job.run(context).await,
        Err(e) => {
            warn!(error = %e, "Report job could not be constructed");
            InvocationResult::failure(&e, context.run_id.clone())
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to serialize result")?
    );

    if !result.is_success() {
        process::exit(1);
    }
    Ok(())
}

fn read_event(arg: Option<&str>) -> anyhow::Result<InvocationEvent> {
    let raw = match arg {
        Some(STDIN_MARKER) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
        Some(arg) => arg.to_string(),
        None => return Ok(InvocationEvent::default()),
    };

    parse_event(&raw)
}

fn parse_event(raw: &str) -> anyhow::Result<InvocationEvent> {
    if raw.trim().is_empty() {
        return Ok(InvocationEvent::default());
    }

    let value: serde_json::Value = serde_json::from_str(raw).context("Event is not valid JSON")?;
    info!(event = %value, "Received invocation event");
    Ok(serde_json::from_value(value)?)
}

fn build_job(cli: &Cli) -> Result<ReportJob, ReportError> {
    let config = ReportConfig::from_env()?;

    let source = cli
        .source
        .clone()
        .or_else(|| config.result_source_file.clone())
        .ok_or_else(|| {
            ReportError::configuration(
                "RESULT_SOURCE_FILE or --source must name the query result CSV to replay",
            )
        })?;
    let store_dir = cli
        .store_dir
        .clone()
        .or_else(|| config.report_store_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));

    let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(store_dir));
    let collaborators = Collaborators {
        query_executor: Arc::new(FileReplayQueryExecutor::new(source, store.clone())),
        object_store: store,
        notifier: Arc::new(LoggingNotifier),
        renderer: Arc::new(TextTableRenderer::default()),
    };

    ReportJob::new(config, collaborators)
}
