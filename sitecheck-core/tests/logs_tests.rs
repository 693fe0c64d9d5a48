// Tests for the pluggable log source

use chrono::{TimeZone, Utc};
use sitecheck_core::logs::{ContainerLogSource, LogSource, RunWindow, is_error_line};

fn window() -> RunWindow {
    RunWindow {
        started_at: Utc.with_ymd_and_hms(2026, 8, 25, 10, 0, 0).unwrap(),
        finished_at: Utc.with_ymd_and_hms(2026, 8, 25, 10, 5, 0).unwrap(),
    }
}

#[test]
fn test_marker_is_case_insensitive() {
    assert!(is_error_line("PHP Fatal error: Uncaught Error"));
    assert!(is_error_line("error: connect failed"));
    assert!(is_error_line("[FATAL] out of memory"));
    assert!(!is_error_line("INFO ready to handle connections"));
}

#[test]
fn test_missing_program_yields_synthetic_line() {
    // Run failure is recorded, never thrown
    let source = ContainerLogSource::new("site-wordpress-1")
        .with_program("sitecheck-test-no-such-binary");
    let lines = source.error_lines(&window());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("unavailable"), "got: {}", lines[0]);
    assert!(lines[0].contains("site-wordpress-1"));
}

#[test]
fn test_failing_command_yields_synthetic_line() {
    // `false` exits non-zero without output; /bin/false is POSIX-standard
    let source = ContainerLogSource::new("whatever").with_program("false");
    let lines = source.error_lines(&window());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("failed"), "got: {}", lines[0]);
}

#[test]
fn test_label_names_program_and_container() {
    let source = ContainerLogSource::new("site-wordpress-1").with_program("podman");
    assert_eq!(source.label(), "podman logs site-wordpress-1");
}
