mod common;

use alb_status_report::config::ReportConfig;
use alb_status_report::models::ServiceId;
use alb_status_report::notification::LoggingNotifier;
use alb_status_report::orchestration::{Collaborators, ReportJob};
use alb_status_report::render::TextTableRenderer;
use alb_status_report::storage::{InMemoryObjectStore, StorageLocator};
use common::ScriptedQueryExecutor;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn collaborators() -> Collaborators {
    Collaborators {
        query_executor: Arc::new(ScriptedQueryExecutor::succeeding(StorageLocator::new(
            "b", "k",
        ))),
        object_store: Arc::new(InMemoryObjectStore::new()),
        notifier: Arc::new(LoggingNotifier),
        renderer: Arc::new(TextTableRenderer::default()),
    }
}

#[test]
fn test_empty_source_yields_defaults() {
    let config = ReportConfig::from_source(HashMap::new()).unwrap();
    assert_eq!(config, ReportConfig::default());
}

#[test]
fn test_full_source_is_applied() {
    let config = ReportConfig::from_source(vars(&[
        ("ATHENA_DB", "logs"),
        ("ATHENA_OUTPUT", "s3://results/q/"),
        ("MAX_WAIT_SECONDS", "60"),
        ("POLL_INTERVAL_SECONDS", "5"),
        ("PDF_BUCKET", "reports"),
        ("PDF_PREFIX", "daily/"),
        ("ALLOWED_APIS", "orders, payments"),
        ("INCLUDE_3XX_APIS", "payments"),
        ("LINK_TTL_HOURS", "48"),
        ("PARTITIONED_TABLE", "alb_pp"),
        ("INTERNAL_TABLE", "alb_internal"),
        ("RESULT_SOURCE_FILE", "/data/results.csv"),
        ("REPORT_STORE_DIR", " "),
    ]))
    .unwrap();

    assert_eq!(config.database, "logs");
    assert_eq!(config.query_output_location, "s3://results/q/");
    assert_eq!(config.max_wait, Duration::from_secs(60));
    assert_eq!(config.poll_interval, Duration::from_secs(5));
    assert_eq!(config.report_bucket, "reports");
    assert_eq!(config.report_prefix, "daily");
    assert_eq!(
        config.allowed_services,
        vec![ServiceId::from("orders"), ServiceId::from("payments")]
    );
    assert!(config.redirect_overrides.contains(&ServiceId::from("payments")));
    assert_eq!(config.link_ttl_hours(), 48);
    assert_eq!(config.partitioned_table, "alb_pp");
    assert_eq!(config.internal_table, "alb_internal");
    assert_eq!(
        config.result_source_file,
        Some(PathBuf::from("/data/results.csv"))
    );
    assert_eq!(config.report_store_dir, None);
}

#[test]
fn test_invalid_settings_are_configuration_errors() {
    let cases: &[&[(&str, &str)]] = &[
        &[("ALLOWED_APIS", " , ")],
        &[("ALLOWED_APIS", "svc/1")],
        &[("MAX_WAIT_SECONDS", "0")],
        &[("POLL_INTERVAL_SECONDS", "0")],
        &[("LINK_TTL_HOURS", "0")],
        &[("ATHENA_OUTPUT", "results/q")],
        &[("PDF_BUCKET", "")],
        &[("ATHENA_DB", " ")],
    ];

    for case in cases {
        let err = ReportConfig::from_source(vars(case)).unwrap_err();
        assert_eq!(err.error_kind(), "ConfigurationError", "case {case:?}");
    }
}

#[test]
fn test_job_rejects_invalid_config() {
    let config = ReportConfig {
        allowed_services: Vec::new(),
        ..ReportConfig::default()
    };

    let err = ReportJob::new(config, collaborators()).err().unwrap();
    assert_eq!(err.error_kind(), "ConfigurationError");
}

#[test]
fn test_job_builds_routing_in_allow_list_order() {
    let config = ReportConfig {
        allowed_services: vec![ServiceId::from("zeta"), ServiceId::from("alpha")],
        ..ReportConfig::default()
    };

    let job = ReportJob::new(config, collaborators()).unwrap();
    let order: Vec<&str> = job.routing().services().map(ServiceId::as_str).collect();
    assert_eq!(order, vec!["zeta", "alpha"]);
}
