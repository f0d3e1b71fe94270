#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # ALB Status Report
//!
//! Daily batch job that summarizes load balancer access logs into a
//! per-service success/error report.
//!
//! ## Overview
//!
//! One run submits an aggregation query over the current UTC day's access logs,
//! waits for it with a bounded polling loop, folds the result rows into
//! per-service bucket counts, renders a paginated table, stores it, mints a
//! time-limited download link and notifies subscribers. The run ends with a
//! structured [`orchestration::InvocationResult`] and never panics.
//!
//! ## Module Organization
//!
//! - [`aggregation`] - routing, status classification and per-service counts
//! - [`query`] - query service contract, completion wait, SQL and row reader
//! - [`storage`] - object store contract and local/in-memory stores
//! - [`render`] - report document rendering
//! - [`notification`] - subscriber notification
//! - [`orchestration`] - the report job and its result
//! - [`config`] - environment-driven configuration
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use alb_status_report::config::ReportConfig;
//! use alb_status_report::notification::LoggingNotifier;
//! use alb_status_report::orchestration::{Collaborators, ReportJob, RunContext};
//! use alb_status_report::query::FileReplayQueryExecutor;
//! use alb_status_report::render::TextTableRenderer;
//! use alb_status_report::storage::{LocalObjectStore, ObjectStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReportConfig::from_env()?;
//! let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new("./report-store"));
//! let collaborators = Collaborators {
//!     query_executor: Arc::new(FileReplayQueryExecutor::new("results.csv", store.clone())),
//!     object_store: store,
//!     notifier: Arc::new(LoggingNotifier),
//!     renderer: Arc::new(TextTableRenderer::default()),
//! };
//!
//! let job = ReportJob::new(config, collaborators)?;
//! let result = job.run(RunContext::now(None)).await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod notification;
pub mod orchestration;
pub mod query;
pub mod render;
pub mod storage;

pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use models::{LogRow, RawLogRow, ServiceId};
pub use orchestration::{Collaborators, InvocationResult, ReportJob, RunContext};
