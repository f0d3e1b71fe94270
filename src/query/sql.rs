//! Aggregation SQL for the daily status report.
//!
//! Both access-log tables are grouped per target group and status code for a
//! single day, unioned, and summed again so each (target group, status) pair
//! appears once in the output.

use chrono::NaiveDate;

/// Tables that hold load balancer access logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTables {
    pub partitioned: String,
    pub internal: String,
}

impl Default for LogTables {
    fn default() -> Self {
        use crate::constants::defaults;

        Self {
            partitioned: defaults::PARTITIONED_TABLE.to_string(),
            internal: defaults::INTERNAL_TABLE.to_string(),
        }
    }
}

/// Build the status-code aggregation query for `day`
pub fn status_code_query(tables: &LogTables, day: NaiveDate) -> String {
    let partition = day.format("%Y/%m/%d");

    format!(
        "SELECT
    target_group_arn,
    elb_status_code,
    SUM(error_count) AS error_count
FROM (
{partitioned}

    UNION ALL

{internal}
) combined
GROUP BY target_group_arn, elb_status_code",
        partitioned = per_table_select(&tables.partitioned, &partition.to_string()),
        internal = per_table_select(&tables.internal, &partition.to_string()),
    )
}

fn per_table_select(table: &str, partition: &str) -> String {
    format!(
        "    SELECT
        target_group_arn,
        elb_status_code,
        COUNT(elb_status_code) AS error_count
    FROM {table}
    WHERE day = '{partition}'
    GROUP BY target_group_arn, elb_status_code"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_targets_both_tables_for_the_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let sql = status_code_query(&LogTables::default(), day);

        assert!(sql.contains("FROM alb_log_partition_projection"));
        assert!(sql.contains("FROM alb_access_logs_internal"));
        assert_eq!(sql.matches("WHERE day = '2024/03/07'").count(), 2);
        assert!(sql.contains("UNION ALL"));
        assert!(sql.trim_end().ends_with("GROUP BY target_group_arn, elb_status_code"));
    }

    #[test]
    fn test_query_uses_configured_tables() {
        let tables = LogTables {
            partitioned: "logs_a".to_string(),
            internal: "logs_b".to_string(),
        };
        let sql = status_code_query(&tables, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(sql.contains("FROM logs_a"));
        assert!(sql.contains("FROM logs_b"));
    }
}
