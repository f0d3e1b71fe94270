//! Aggregated per-service counts and the summary derived from them.

use super::classifier::StatusBucket;
use crate::models::ServiceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts for one service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketCounts {
    pub success: u64,
    pub client_error: u64,
    pub server_error: u64,
}

impl BucketCounts {
    pub fn new(success: u64, client_error: u64, server_error: u64) -> Self {
        Self {
            success,
            client_error,
            server_error,
        }
    }

    /// Add `count` to the bucket's cell. Returns `false` when the cell
    /// saturated at `u64::MAX` instead of holding the exact sum.
    pub fn add(&mut self, bucket: StatusBucket, count: u64) -> bool {
        let cell = match bucket {
            StatusBucket::Success => &mut self.success,
            StatusBucket::ClientError => &mut self.client_error,
            StatusBucket::ServerError => &mut self.server_error,
            StatusBucket::Ignored => return true,
        };

        match cell.checked_add(count) {
            Some(sum) => {
                *cell = sum;
                true
            }
            None => {
                *cell = u64::MAX;
                false
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.success
            .saturating_add(self.client_error)
            .saturating_add(self.server_error)
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    fn accumulate(&mut self, other: &BucketCounts) {
        self.success = self.success.saturating_add(other.success);
        self.client_error = self.client_error.saturating_add(other.client_error);
        self.server_error = self.server_error.saturating_add(other.server_error);
    }
}

/// Per-service counts. The key set is fixed at construction to the
/// allow-list and never grows or shrinks afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationReport {
    services: BTreeMap<ServiceId, BucketCounts>,
}

impl AggregationReport {
    /// A report with a zeroed entry for every listed service
    pub fn zeroed<'a>(services: impl IntoIterator<Item = &'a ServiceId>) -> Self {
        Self {
            services: services
                .into_iter()
                .map(|service| (service.clone(), BucketCounts::default()))
                .collect(),
        }
    }

    /// Add `count` to `service`'s bucket. Unknown services are left alone and
    /// reported as not recorded. Returns `Some(false)` on saturation.
    pub fn record(&mut self, service: &ServiceId, bucket: StatusBucket, count: u64) -> Option<bool> {
        self.services
            .get_mut(service)
            .map(|counts| counts.add(bucket, count))
    }

    pub fn get(&self, service: &ServiceId) -> Option<&BucketCounts> {
        self.services.get(service)
    }

    /// Entries in alphabetical service order
    pub fn iter(&self) -> impl Iterator<Item = (&ServiceId, &BucketCounts)> {
        self.services.iter()
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceId> {
        self.services.keys()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary::derive(self)
    }
}

/// Grand totals and alphabetical rows for rendering and notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub totals: BucketCounts,
    pub total_requests: u64,
    pub rows: Vec<(ServiceId, BucketCounts)>,
}

impl ReportSummary {
    pub fn derive(report: &AggregationReport) -> Self {
        let mut totals = BucketCounts::default();
        let mut rows: Vec<(ServiceId, BucketCounts)> = Vec::with_capacity(report.len());

        for (service, counts) in report.iter() {
            totals.accumulate(counts);
            rows.push((service.clone(), *counts));
        }
        rows.sort_by(|(a, _), (b, _)| a.cmp(b));

        Self {
            total_requests: totals.total(),
            totals,
            rows,
        }
    }
}
