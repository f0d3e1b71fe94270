//! # Service Routing
//!
//! Resolves a target group ARN to one of the allow-listed services.
//!
//! Every service owns a routing key `<service>-tg`. An ARN belongs to a service
//! when it contains the key delimited by `/` on both sides, so
//! `api-service-1` never claims `.../targetgroup/api-service-10-tg/...`.
//! When several services match, the first one in allow-list order wins; the
//! full match set stays available through [`ServiceRoutingTable::matches`] so
//! callers can flag ambiguous configurations.

use crate::constants::{ROUTING_KEY_DELIMITER, ROUTING_KEY_SUFFIX};
use crate::models::ServiceId;

/// Outcome of resolving a routing identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Resolved(&'a ServiceId),
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RoutingEntry {
    service: ServiceId,
    routing_key: String,
    /// Routing key wrapped in delimiters, built once
    needle: String,
}

/// Ordered service → routing key table, built once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRoutingTable {
    entries: Vec<RoutingEntry>,
}

impl ServiceRoutingTable {
    pub fn new(services: &[ServiceId]) -> Self {
        let entries = services
            .iter()
            .map(|service| {
                let routing_key = routing_key_for(service);
                let needle =
                    format!("{ROUTING_KEY_DELIMITER}{routing_key}{ROUTING_KEY_DELIMITER}");
                RoutingEntry {
                    service: service.clone(),
                    routing_key,
                    needle,
                }
            })
            .collect();

        Self { entries }
    }

    /// Services in allow-list order
    pub fn services(&self) -> impl Iterator<Item = &ServiceId> {
        self.entries.iter().map(|entry| &entry.service)
    }

    pub fn routing_key(&self, service: &ServiceId) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| &entry.service == service)
            .map(|entry| entry.routing_key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First service in allow-list order whose delimited key occurs in `identifier`
    pub fn resolve(&self, identifier: &str) -> Resolution<'_> {
        self.entries
            .iter()
            .find(|entry| identifier.contains(&entry.needle))
            .map_or(Resolution::Unresolved, |entry| {
                Resolution::Resolved(&entry.service)
            })
    }

    /// Every service whose delimited key occurs in `identifier`, in allow-list order
    pub fn matches(&self, identifier: &str) -> Vec<&ServiceId> {
        self.entries
            .iter()
            .filter(|entry| identifier.contains(&entry.needle))
            .map(|entry| &entry.service)
            .collect()
    }
}

/// Routing key derived from a service name
pub fn routing_key_for(service: &ServiceId) -> String {
    format!("{}{ROUTING_KEY_SUFFIX}", service.as_str())
}
