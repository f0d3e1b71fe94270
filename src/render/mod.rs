//! # Report Rendering
//!
//! Document renderer collaborator and the helpers shared by the renderer and
//! the notification message.

pub mod text_table;

pub use text_table::TextTableRenderer;

use crate::aggregation::ReportSummary;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};

/// Column headers of the report table
pub const TABLE_HEADER: [&str; 4] = ["Service", "Success", "ClientError", "ServerError"];

/// Everything a renderer needs for one document
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub report_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub summary: &'a ReportSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// File extension without the leading dot
    pub extension: &'static str,
    pub pages: usize,
    pub body: Vec<u8>,
}

pub trait ReportRenderer: Send + Sync {
    fn render(&self, context: &RenderContext<'_>) -> Result<RenderedDocument>;
}

/// Format a count with `,` thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
