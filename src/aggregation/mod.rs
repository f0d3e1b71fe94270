//! # Aggregation
//!
//! Turns raw per-status-code query rows into a per-service success/error
//! summary.
//!
//! - [`routing`] - target group ARN → service resolution
//! - [`classifier`] - status code → bucket
//! - [`aggregator`] - single-pass accumulation with per-row outcomes
//! - [`report`] - per-service counts and the derived summary

pub mod aggregator;
pub mod classifier;
pub mod report;
pub mod routing;

pub use aggregator::{AggregationOutcome, AggregationStats, Aggregator, RowOutcome, SkipReason};
pub use classifier::{classify, StatusBucket, StatusOverrideSet};
pub use report::{AggregationReport, BucketCounts, ReportSummary};
pub use routing::{routing_key_for, Resolution, ServiceRoutingTable};
