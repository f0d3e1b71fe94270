//! Query result rows, before and after numeric parsing.

use serde::Deserialize;
use thiserror::Error;

/// A row exactly as read from the query output. Every field is optional so
/// that a missing column is a row-level problem rather than a read failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawLogRow {
    #[serde(default)]
    pub target_group_arn: Option<String>,
    #[serde(default)]
    pub elb_status_code: Option<String>,
    #[serde(default)]
    pub error_count: Option<String>,
}

/// A row whose numeric fields parsed successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub routing_arn: String,
    pub status_code: i64,
    pub occurrence_count: u64,
}

/// Why a raw row could not be turned into a [`LogRow`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowParseError {
    #[error("missing field {0}")]
    MissingField(&'static str),

    #[error("field {field} is not an integer: {value:?}")]
    NotAnInteger { field: &'static str, value: String },
}

impl RawLogRow {
    pub fn new(
        target_group_arn: impl Into<String>,
        elb_status_code: impl Into<String>,
        error_count: impl Into<String>,
    ) -> Self {
        Self {
            target_group_arn: Some(target_group_arn.into()),
            elb_status_code: Some(elb_status_code.into()),
            error_count: Some(error_count.into()),
        }
    }

    pub fn parse(&self) -> Result<LogRow, RowParseError> {
        use crate::constants::columns;

        let routing_arn = self
            .target_group_arn
            .as_deref()
            .ok_or(RowParseError::MissingField(columns::TARGET_GROUP_ARN))?;
        let status_code = parse_field(columns::ELB_STATUS_CODE, self.elb_status_code.as_deref())?;
        let occurrence_count = parse_field(columns::ERROR_COUNT, self.error_count.as_deref())?;

        Ok(LogRow {
            routing_arn: routing_arn.to_string(),
            status_code,
            occurrence_count,
        })
    }
}

fn parse_field<T: std::str::FromStr>(
    field: &'static str,
    value: Option<&str>,
) -> Result<T, RowParseError> {
    let value = value.ok_or(RowParseError::MissingField(field))?;
    value
        .trim()
        .parse::<T>()
        .map_err(|_| RowParseError::NotAnInteger {
            field,
            value: value.to_string(),
        })
}
