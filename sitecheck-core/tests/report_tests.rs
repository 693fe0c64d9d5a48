// Tests for report assembly, serialization and exit-status rules

use chrono::{TimeZone, Utc};
use sitecheck_core::logs::RunWindow;
use sitecheck_core::report::RunReport;
use sitecheck_scanner::{PageResult, RequestFailure};
use url::Url;

fn base() -> Url {
    Url::parse("http://localhost:8080/").unwrap()
}

fn window() -> RunWindow {
    RunWindow {
        started_at: Utc.with_ymd_and_hms(2026, 8, 25, 10, 0, 0).unwrap(),
        finished_at: Utc.with_ymd_and_hms(2026, 8, 25, 10, 2, 30).unwrap(),
    }
}

fn passing_page(url: &str) -> PageResult {
    let mut page = PageResult::new(url.to_string());
    page.status = Some(200);
    page.finalize()
}

fn failing_page(url: &str) -> PageResult {
    let mut page = PageResult::new(url.to_string());
    page.status = Some(200);
    page.request_failures.push(RequestFailure {
        url: format!("{}missing.png", url),
        reason: "net::ERR_ABORTED".to_string(),
    });
    page.finalize()
}

// ============================================================================
// Summary and exit code
// ============================================================================

#[test]
fn test_summary_counts() {
    let report = RunReport::new(
        &base(),
        vec![
            passing_page("http://localhost:8080/"),
            passing_page("http://localhost:8080/about/"),
            failing_page("http://localhost:8080/contact/"),
        ],
        vec!["PHP Fatal error: oops".to_string()],
        window(),
    );

    assert_eq!(report.summary.visited, 3);
    assert_eq!(report.summary.passed, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.log_errors, 1);
}

#[test]
fn test_exit_code_zero_on_clean_run() {
    let report = RunReport::new(
        &base(),
        vec![passing_page("http://localhost:8080/")],
        Vec::new(),
        window(),
    );
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_exit_code_one_on_page_failure() {
    let report = RunReport::new(
        &base(),
        vec![failing_page("http://localhost:8080/contact/")],
        Vec::new(),
        window(),
    );
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_exit_code_one_on_log_errors_alone() {
    let report = RunReport::new(
        &base(),
        vec![passing_page("http://localhost:8080/")],
        vec!["ERROR: db gone".to_string()],
        window(),
    );
    assert_eq!(report.exit_code(), 1);
}

// ============================================================================
// Fatal report (unreachable base URL path)
// ============================================================================

#[test]
fn test_fatal_report_has_zero_visits_and_fails() {
    let report = RunReport::fatal(
        &base(),
        "browser launch failed: executable not found".to_string(),
        window(),
    );
    assert_eq!(report.summary.visited, 0);
    assert_eq!(report.summary.passed, 0);
    assert!(report.fatal_error.is_some());
    assert_eq!(report.exit_code(), 1);
}

// ============================================================================
// File output
// ============================================================================

#[test]
fn test_filename_is_timestamp_derived() {
    let report = RunReport::new(&base(), Vec::new(), Vec::new(), window());
    assert_eq!(report.filename(), "smoke-20260825-100000.json");
}

#[test]
fn test_write_creates_dir_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("reports");

    let report = RunReport::new(
        &base(),
        vec![failing_page("http://localhost:8080/contact/")],
        vec!["log source 'docker logs site' unavailable: not found".to_string()],
        window(),
    );
    let path = report.write(&nested).unwrap();
    assert!(path.exists());

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: RunReport = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.summary.visited, 1);
    assert_eq!(parsed.pages[0].request_failures.len(), 1);
    assert_eq!(parsed.log_error_lines.len(), 1);

    // camelCase on the wire, matching the historical report format
    assert!(raw.contains("\"baseUrl\""));
    assert!(raw.contains("\"requestFailures\""));
    assert!(raw.contains("\"logErrorLines\""));
    assert!(!raw.contains("\"fatalError\""));
}

#[test]
fn test_fatal_report_serializes_fatal_field() {
    let report = RunReport::fatal(&base(), "connection refused".to_string(), window());
    let raw = serde_json::to_string(&report).unwrap();
    assert!(raw.contains("\"fatalError\":\"connection refused\""));
}
