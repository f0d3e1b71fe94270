use crate::aggregation::ReportSummary;
use crate::constants::REPORT_TITLE;
use crate::render::format_count;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    /// Plain-text summary message with the download link
    pub fn for_report(
        report_date: NaiveDate,
        summary: &ReportSummary,
        link: &str,
        link_validity_hours: u64,
    ) -> Self {
        let date = report_date.format("%Y-%m-%d");
        let subject = format!("{REPORT_TITLE} | {date}");

        let body = format!(
            "{REPORT_TITLE}\n\
             \n\
             Date: {date}\n\
             \n\
             === SUMMARY ===\n\
             Total 2xx (Success): {success}\n\
             Total 4xx (Client Errors): {client}\n\
             Total 5xx (Server Errors): {server}\n\
             \n\
             The consolidated API status report has been generated successfully.\n\
             \n\
             Download Report (valid for {hours} hours):\n\
             {link}\n\
             \n\
             NOTE: This link expires in {hours} hours. Download the report for your records.",
            success = format_count(summary.totals.success),
            client = format_count(summary.totals.client_error),
            server = format_count(summary.totals.server_error),
            hours = link_validity_hours,
        );

        Self { subject, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{AggregationReport, StatusBucket};
    use crate::models::ServiceId;

    #[test]
    fn test_message_contains_totals_and_link() {
        let services = vec![ServiceId::from("svc1"), ServiceId::from("svc2")];
        let mut report = AggregationReport::zeroed(&services);
        report.record(&services[0], StatusBucket::Success, 12_000);
        report.record(&services[1], StatusBucket::Success, 500);
        report.record(&services[1], StatusBucket::ServerError, 3);

        let message = NotificationMessage::for_report(
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            &report.summary(),
            "https://example.com/report",
            24,
        );

        assert_eq!(message.subject, "Daily ALB API Status Report | 2024-03-07");
        assert!(message.body.contains("Total 2xx (Success): 12,500"));
        assert!(message.body.contains("Total 4xx (Client Errors): 0"));
        assert!(message.body.contains("Total 5xx (Server Errors): 3"));
        assert!(message.body.contains("valid for 24 hours"));
        assert!(message.body.contains("\nhttps://example.com/report\n"));
    }
}
