//! # Aggregator
//!
//! Single pass over query result rows that fills an [`AggregationReport`].
//!
//! Each row produces a [`RowOutcome`]. Malformed rows and rows for unknown
//! target groups are skipped and tallied; rows whose status falls outside
//! every bucket are tallied as ignored. None of these stop the run. Only an
//! `Err` yielded by the row source itself (the input could not be read at
//! all) is returned to the caller.

use super::classifier::{classify, StatusBucket, StatusOverrideSet};
use super::report::AggregationReport;
use super::routing::{Resolution, ServiceRoutingTable};
use crate::error::Result;
use crate::models::{RawLogRow, RowParseError, ServiceId};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Why a row was discarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Malformed(RowParseError),
    UnresolvedService,
}

/// What happened to one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome<'a> {
    Counted {
        service: &'a ServiceId,
        bucket: StatusBucket,
        count: u64,
        /// More than one service's routing key matched the row
        ambiguous: bool,
    },
    Ignored {
        service: &'a ServiceId,
        status_code: i64,
        ambiguous: bool,
    },
    Skipped(SkipReason),
}

/// Row tallies kept for observability; not part of the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    /// Rows that parsed and resolved to a service, counted or ignored
    pub processed_rows: u64,
    pub malformed_rows: u64,
    pub unresolved_rows: u64,
    pub ignored_rows: u64,
    pub ambiguous_rows: u64,
    pub saturated_additions: u64,
}

impl AggregationStats {
    pub fn skipped_rows(&self) -> u64 {
        self.malformed_rows + self.unresolved_rows
    }

    fn note_ambiguous(&mut self, raw: &RawLogRow, service: &ServiceId) {
        self.ambiguous_rows += 1;
        warn!(
            target_group_arn = raw.target_group_arn.as_deref().unwrap_or_default(),
            service = %service,
            "Target group matches more than one service; using first in allow-list order"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationOutcome {
    pub report: AggregationReport,
    pub stats: AggregationStats,
}

/// Classifies rows against a routing table and override set
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    routing: &'a ServiceRoutingTable,
    overrides: &'a StatusOverrideSet,
}

impl<'a> Aggregator<'a> {
    pub fn new(routing: &'a ServiceRoutingTable, overrides: &'a StatusOverrideSet) -> Self {
        Self { routing, overrides }
    }

    /// Decide the outcome of a single row without touching any report
    pub fn process_row(&self, raw: &RawLogRow) -> RowOutcome<'a> {
        let row = match raw.parse() {
            Ok(row) => row,
            Err(e) => return RowOutcome::Skipped(SkipReason::Malformed(e)),
        };

        let service = match self.routing.resolve(&row.routing_arn) {
            Resolution::Resolved(service) => service,
            Resolution::Unresolved => return RowOutcome::Skipped(SkipReason::UnresolvedService),
        };

        let ambiguous = self.routing.matches(&row.routing_arn).len() > 1;

        match classify(row.status_code, service, self.overrides) {
            StatusBucket::Ignored => RowOutcome::Ignored {
                service,
                status_code: row.status_code,
                ambiguous,
            },
            bucket => RowOutcome::Counted {
                service,
                bucket,
                count: row.occurrence_count,
                ambiguous,
            },
        }
    }

    /// Consume `rows` once and build the report
    pub fn aggregate<I>(&self, rows: I) -> Result<AggregationOutcome>
    where
        I: IntoIterator<Item = Result<RawLogRow>>,
    {
        let mut report = AggregationReport::zeroed(self.routing.services());
        let mut stats = AggregationStats::default();

        for item in rows {
            let raw = item?;

            match self.process_row(&raw) {
                RowOutcome::Counted {
                    service,
                    bucket,
                    count,
                    ambiguous,
                } => {
                    stats.processed_rows += 1;
                    if ambiguous {
                        stats.note_ambiguous(&raw, service);
                    }
                    if report.record(service, bucket, count) == Some(false) {
                        stats.saturated_additions += 1;
                        warn!(service = %service, bucket = ?bucket, "Bucket count saturated");
                    }
                }
                RowOutcome::Ignored {
                    service,
                    status_code,
                    ambiguous,
                } => {
                    stats.processed_rows += 1;
                    stats.ignored_rows += 1;
                    if ambiguous {
                        stats.note_ambiguous(&raw, service);
                    }
                    debug!(service = %service, status_code, "Status code outside reported buckets");
                }
                RowOutcome::Skipped(SkipReason::Malformed(e)) => {
                    stats.malformed_rows += 1;
                    warn!(row = ?raw, error = %e, "Skipping malformed row");
                }
                RowOutcome::Skipped(SkipReason::UnresolvedService) => {
                    stats.unresolved_rows += 1;
                    debug!(
                        target_group_arn = raw.target_group_arn.as_deref().unwrap_or_default(),
                        "Skipping row for unmonitored target group"
                    );
                }
            }
        }

        info!(
            processed = stats.processed_rows,
            skipped = stats.skipped_rows(),
            malformed = stats.malformed_rows,
            unresolved = stats.unresolved_rows,
            ignored = stats.ignored_rows,
            ambiguous = stats.ambiguous_rows,
            "Aggregation complete"
        );

        Ok(AggregationOutcome { report, stats })
    }
}
