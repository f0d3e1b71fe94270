//! # Orchestration
//!
//! Runs one daily report end to end and reports the outcome as a structured
//! result.
//!
//! - [`invocation`] - run identity and the success/error result shape
//! - [`report_job`] - the sequencing of query, aggregation, render and publish

pub mod invocation;
pub mod report_job;

pub use invocation::{InvocationResult, RowCounts, RunContext, RunFailure, RunSuccess};
pub use report_job::{report_key, Collaborators, ReportJob};
