//! # System Constants
//!
//! Status-code bucket boundaries, input column names and configuration
//! defaults for the report job.
//!
//! The bucket ranges are deliberately narrower than the textbook HTTP classes
//! and must stay exactly as written.

use std::ops::RangeInclusive;

/// Inclusive status-code ranges used by the classifier
pub mod status_ranges {
    use super::RangeInclusive;

    pub const SUCCESS: RangeInclusive<i64> = 200..=214;
    pub const REDIRECT: RangeInclusive<i64> = 300..=314;
    pub const CLIENT_ERROR: RangeInclusive<i64> = 400..=415;
    pub const SERVER_ERROR: RangeInclusive<i64> = 500..=515;
}

/// Column names expected in the query result header
pub mod columns {
    pub const TARGET_GROUP_ARN: &str = "target_group_arn";
    pub const ELB_STATUS_CODE: &str = "elb_status_code";
    pub const ERROR_COUNT: &str = "error_count";
}

/// Suffix appended to a service name to form its target-group routing key
pub const ROUTING_KEY_SUFFIX: &str = "-tg";

/// Separator that must delimit a routing key inside a target group ARN
pub const ROUTING_KEY_DELIMITER: char = '/';

/// Configuration defaults
pub mod defaults {
    pub const DATABASE: &str = "alb_logs_database";
    pub const QUERY_OUTPUT_LOCATION: &str = "s3://athena-results-bucket/queries/";
    pub const MAX_WAIT_SECONDS: u64 = 180;
    pub const POLL_INTERVAL_SECONDS: u64 = 2;
    pub const REPORT_BUCKET: &str = "report-storage-bucket";
    pub const REPORT_PREFIX: &str = "alb-reports";
    pub const ALLOWED_SERVICES: &str =
        "api-service-1,api-service-2,api-service-3,api-gateway-prod,api-gateway-staging";
    pub const LINK_TTL_HOURS: u64 = 24;
    pub const PARTITIONED_TABLE: &str = "alb_log_partition_projection";
    pub const INTERNAL_TABLE: &str = "alb_access_logs_internal";
}

/// Longest download link lifetime accepted, matching the object store's
/// presigning limit of seven days
pub const MAX_LINK_TTL_HOURS: u64 = 168;

/// Base name of the stored report object
pub const REPORT_FILE_STEM: &str = "alb_api_status_report";

/// Title printed on the rendered report and used in the notification subject
pub const REPORT_TITLE: &str = "Daily ALB API Status Report";
