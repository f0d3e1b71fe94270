//! Paginated plain-text table renderer.
//!
//! Pages are separated by a form feed. Every page starts with the title block
//! and the table header, and ends with a `Page n of m` footer. Column widths
//! are computed over the whole report so they line up across pages.

use super::{format_count, RenderContext, RenderedDocument, ReportRenderer, TABLE_HEADER};
use crate::constants::REPORT_TITLE;
use crate::error::{ReportError, Result};
use std::fmt::Write as _;

const PAGE_BREAK: char = '\u{0C}';
const DEFAULT_ROWS_PER_PAGE: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextTableRenderer {
    rows_per_page: usize,
}

impl Default for TextTableRenderer {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl TextTableRenderer {
    pub fn new(rows_per_page: usize) -> Self {
        Self { rows_per_page }
    }
}

impl ReportRenderer for TextTableRenderer {
    fn render(&self, context: &RenderContext<'_>) -> Result<RenderedDocument> {
        if self.rows_per_page == 0 {
            return Err(ReportError::render("rows_per_page must be positive"));
        }

        let cells: Vec<[String; 4]> = context
            .summary
            .rows
            .iter()
            .map(|(service, counts)| {
                [
                    service.to_string(),
                    format_count(counts.success),
                    format_count(counts.client_error),
                    format_count(counts.server_error),
                ]
            })
            .collect();

        let mut widths = TABLE_HEADER.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let chunks: Vec<&[[String; 4]]> = if cells.is_empty() {
            vec![&cells[..0]]
        } else {
            cells.chunks(self.rows_per_page).collect()
        };
        let pages = chunks.len();

        let mut out = String::new();
        for (index, chunk) in chunks.iter().enumerate() {
            if index > 0 {
                out.push(PAGE_BREAK);
                out.push('\n');
            }
            write_page(&mut out, context, &widths, chunk, index + 1, pages)
                .map_err(|e| ReportError::render(format!("Unable to format page: {e}")))?;
        }

        Ok(RenderedDocument {
            extension: "txt",
            pages,
            body: out.into_bytes(),
        })
    }
}

fn write_page(
    out: &mut String,
    context: &RenderContext<'_>,
    widths: &[usize; 4],
    rows: &[[String; 4]],
    page: usize,
    pages: usize,
) -> std::fmt::Result {
    writeln!(out, "{REPORT_TITLE}")?;
    writeln!(out, "Report Date: {}", context.report_date.format("%Y-%m-%d"))?;
    writeln!(
        out,
        "Generated: {} UTC",
        context.generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out)?;

    let header = TABLE_HEADER.map(str::to_string);
    write_row(out, widths, &header)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;

    for row in rows {
        write_row(out, widths, row)?;
    }

    writeln!(out)?;
    writeln!(out, "Page {page} of {pages}")
}

/// Service column left-aligned, counts right-aligned
fn write_row(out: &mut String, widths: &[usize; 4], cells: &[String; 4]) -> std::fmt::Result {
    write!(out, "{:<width$}", cells[0], width = widths[0])?;
    for (cell, width) in cells.iter().zip(widths.iter().copied()).skip(1) {
        write!(out, " | {cell:>width$}")?;
    }
    writeln!(out)
}
