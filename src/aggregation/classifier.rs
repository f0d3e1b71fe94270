//! Status code classification.

use crate::constants::status_ranges;
use crate::models::ServiceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Classification outcome for one status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    Success,
    ClientError,
    ServerError,
    /// Recognised but intentionally excluded from every bucket
    Ignored,
}

/// Services whose redirect-class responses are folded into success
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusOverrideSet {
    services: BTreeSet<ServiceId>,
}

impl StatusOverrideSet {
    pub fn new(services: impl IntoIterator<Item = ServiceId>) -> Self {
        Self {
            services: services.into_iter().collect(),
        }
    }

    pub fn includes_redirects(&self, service: &ServiceId) -> bool {
        self.services.contains(service)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Map a status code to its bucket. Total and side-effect free.
pub fn classify(status_code: i64, service: &ServiceId, overrides: &StatusOverrideSet) -> StatusBucket {
    if status_ranges::SUCCESS.contains(&status_code) {
        StatusBucket::Success
    } else if status_ranges::REDIRECT.contains(&status_code) {
        if overrides.includes_redirects(service) {
            StatusBucket::Success
        } else {
            StatusBucket::Ignored
        }
    } else if status_ranges::CLIENT_ERROR.contains(&status_code) {
        StatusBucket::ClientError
    } else if status_ranges::SERVER_ERROR.contains(&status_code) {
        StatusBucket::ServerError
    } else {
        StatusBucket::Ignored
    }
}
