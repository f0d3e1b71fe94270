//! Query result reader.
//!
//! Results are CSV with a header row. Rows come back lazily, one
//! `Result<RawLogRow>` at a time. Numeric fields stay text here so the
//! aggregator can treat bad values as row-level problems; only records the
//! CSV reader cannot decode at all are errors.

use crate::constants::columns;
use crate::error::{ReportError, Result};
use crate::models::RawLogRow;
use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::warn;

const REQUIRED_COLUMNS: [&str; 3] = [
    columns::TARGET_GROUP_ARN,
    columns::ELB_STATUS_CODE,
    columns::ERROR_COUNT,
];

/// Parse a result object into a lazy row sequence
pub fn read_rows(body: Vec<u8>) -> Result<impl Iterator<Item = Result<RawLogRow>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(body));

    let headers = reader
        .headers()
        .map_err(|e| ReportError::result_fetch(format!("Unreadable result header: {e}")))?;

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header.trim() == *column))
        .collect();
    if !missing.is_empty() {
        warn!(
            missing = ?missing,
            "Result header lacks required columns; affected rows will be skipped as malformed"
        );
    }

    Ok(reader.into_deserialize::<RawLogRow>().map(|record| {
        record.map_err(|e| ReportError::result_fetch(format!("Unreadable result record: {e}")))
    }))
}
