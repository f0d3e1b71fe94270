//! # Report Configuration
//!
//! Environment-driven configuration for a report run. The value object is
//! built once at process start, validated, and passed by reference to every
//! component; nothing reads the environment after that.

use crate::constants::{defaults, MAX_LINK_TTL_HOURS};
use crate::error::{ReportError, Result};
use crate::models::ServiceId;
use crate::storage::StorageLocator;
use config::{Config, Environment};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub database: String,
    pub query_output_location: String,
    pub max_wait: Duration,
    pub poll_interval: Duration,
    pub report_bucket: String,
    pub report_prefix: String,
    /// Absent topic disables notification
    pub notification_topic: Option<String>,
    /// Ordered allow-list; order drives routing precedence
    pub allowed_services: Vec<ServiceId>,
    /// Services whose 3xx responses count as success
    pub redirect_overrides: BTreeSet<ServiceId>,
    pub link_ttl: Duration,
    pub partitioned_table: String,
    pub internal_table: String,
    /// CSV file served by the local query executor
    pub result_source_file: Option<PathBuf>,
    /// Root directory of the local object store
    pub report_store_dir: Option<PathBuf>,
}

/// Raw settings as read from the environment. Keys are lower-cased by the
/// `config` environment source.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    athena_db: Option<String>,
    athena_output: Option<String>,
    max_wait_seconds: Option<String>,
    poll_interval_seconds: Option<String>,
    pdf_bucket: Option<String>,
    pdf_prefix: Option<String>,
    sns_topic_arn: Option<String>,
    allowed_apis: Option<String>,
    include_3xx_apis: Option<String>,
    link_ttl_hours: Option<String>,
    partitioned_table: Option<String>,
    internal_table: Option<String>,
    result_source_file: Option<String>,
    report_store_dir: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            database: defaults::DATABASE.to_string(),
            query_output_location: defaults::QUERY_OUTPUT_LOCATION.to_string(),
            max_wait: Duration::from_secs(defaults::MAX_WAIT_SECONDS),
            poll_interval: Duration::from_secs(defaults::POLL_INTERVAL_SECONDS),
            report_bucket: defaults::REPORT_BUCKET.to_string(),
            report_prefix: defaults::REPORT_PREFIX.to_string(),
            notification_topic: None,
            allowed_services: parse_service_list(defaults::ALLOWED_SERVICES),
            redirect_overrides: BTreeSet::new(),
            link_ttl: Duration::from_secs(defaults::LINK_TTL_HOURS * 3600),
            partitioned_table: defaults::PARTITIONED_TABLE.to_string(),
            internal_table: defaults::INTERNAL_TABLE.to_string(),
            result_source_file: None,
            report_store_dir: None,
        }
    }
}

impl ReportConfig {
    /// Load and validate configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::default())
    }

    /// Load and validate configuration from an explicit key/value map.
    /// Keys use the same names as the environment variables.
    pub fn from_source(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(Environment::default().source(Some(vars)))
    }

    fn load(environment: Environment) -> Result<Self> {
        let raw: RawSettings = Config::builder()
            .add_source(environment)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| ReportError::configuration(format!("Unable to read settings: {e}")))?;

        let config = Self::from_raw(raw)?;
        config.validate()?;

        tracing::debug!(
            database = %config.database,
            services = config.allowed_services.len(),
            overrides = config.redirect_overrides.len(),
            max_wait_seconds = config.max_wait.as_secs(),
            notification_enabled = config.notification_topic.is_some(),
            "Configuration loaded"
        );

        Ok(config)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        let mut config = Self::default();

        if let Some(database) = raw.athena_db {
            config.database = database.trim().to_string();
        }
        if let Some(location) = raw.athena_output {
            config.query_output_location = location.trim().to_string();
        }
        if let Some(max_wait) = raw.max_wait_seconds {
            config.max_wait = Duration::from_secs(parse_u64("MAX_WAIT_SECONDS", &max_wait)?);
        }
        if let Some(interval) = raw.poll_interval_seconds {
            config.poll_interval =
                Duration::from_secs(parse_u64("POLL_INTERVAL_SECONDS", &interval)?);
        }
        if let Some(bucket) = raw.pdf_bucket {
            config.report_bucket = bucket.trim().to_string();
        }
        if let Some(prefix) = raw.pdf_prefix {
            config.report_prefix = prefix.trim().trim_end_matches('/').to_string();
        }
        config.notification_topic = raw
            .sns_topic_arn
            .map(|topic| topic.trim().to_string())
            .filter(|topic| !topic.is_empty());
        if let Some(services) = raw.allowed_apis {
            config.allowed_services = parse_service_list(&services);
        }
        if let Some(overrides) = raw.include_3xx_apis {
            config.redirect_overrides = parse_service_list(&overrides).into_iter().collect();
        }
        if let Some(ttl) = raw.link_ttl_hours {
            let hours = parse_u64("LINK_TTL_HOURS", &ttl)?;
            config.link_ttl = Duration::from_secs(hours.saturating_mul(3600));
        }
        if let Some(table) = raw.partitioned_table {
            config.partitioned_table = table.trim().to_string();
        }
        if let Some(table) = raw.internal_table {
            config.internal_table = table.trim().to_string();
        }
        config.result_source_file = non_empty_path(raw.result_source_file);
        config.report_store_dir = non_empty_path(raw.report_store_dir);

        Ok(config)
    }

    /// Check the configuration for values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(ReportError::configuration("ATHENA_DB must not be empty"));
        }
        if StorageLocator::parse_prefix(&self.query_output_location).is_none() {
            return Err(ReportError::configuration(format!(
                "ATHENA_OUTPUT must be an s3:// location, got {:?}",
                self.query_output_location
            )));
        }
        if self.report_bucket.is_empty() {
            return Err(ReportError::configuration("PDF_BUCKET must not be empty"));
        }
        if self.allowed_services.is_empty() {
            return Err(ReportError::configuration(
                "ALLOWED_APIS must list at least one service",
            ));
        }

        let mut seen = HashSet::new();
        for service in &self.allowed_services {
            if service.as_str().contains(crate::constants::ROUTING_KEY_DELIMITER) {
                return Err(ReportError::configuration(format!(
                    "Service name {service:?} must not contain '/'"
                )));
            }
            if !seen.insert(service) {
                return Err(ReportError::configuration(format!(
                    "Service {service} is listed more than once in ALLOWED_APIS"
                )));
            }
        }

        if let Some(unknown) = self
            .redirect_overrides
            .iter()
            .find(|service| !seen.contains(service))
        {
            return Err(ReportError::configuration(format!(
                "INCLUDE_3XX_APIS entry {unknown} is not in ALLOWED_APIS"
            )));
        }

        if self.max_wait.is_zero() {
            return Err(ReportError::configuration("MAX_WAIT_SECONDS must be positive"));
        }
        if self.poll_interval.is_zero() {
            return Err(ReportError::configuration(
                "POLL_INTERVAL_SECONDS must be positive",
            ));
        }
        if self.poll_interval > self.max_wait {
            return Err(ReportError::configuration(
                "POLL_INTERVAL_SECONDS must not exceed MAX_WAIT_SECONDS",
            ));
        }
        if self.link_ttl.is_zero() {
            return Err(ReportError::configuration("LINK_TTL_HOURS must be positive"));
        }
        if self.link_ttl > Duration::from_secs(MAX_LINK_TTL_HOURS * 3600) {
            return Err(ReportError::configuration(format!(
                "LINK_TTL_HOURS must not exceed {MAX_LINK_TTL_HOURS}"
            )));
        }

        Ok(())
    }

    pub fn link_ttl_hours(&self) -> u64 {
        self.link_ttl.as_secs() / 3600
    }
}

/// Split a comma-separated service list, trimming blanks
fn parse_service_list(raw: &str) -> Vec<ServiceId> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ServiceId::from)
        .collect()
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| ReportError::configuration(format!("Invalid {key} {value:?}: {e}")))
}

fn non_empty_path(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
