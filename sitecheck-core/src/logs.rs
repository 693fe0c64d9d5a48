use chrono::{DateTime, SecondsFormat, Utc};
use std::process::Command;
use tracing::{debug, warn};

/// The time window of one crawl run, used to scope the log cross-check.
#[derive(Debug, Clone, Copy)]
pub struct RunWindow {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Where the deployment's server-side logs come from.
///
/// The crawl only sees the browser's view of the site; PHP notices and fatal
/// errors land in the container log instead. Keeping this behind a trait
/// avoids hard-wiring the tool to one container runtime's log command.
pub trait LogSource {
    fn label(&self) -> String;

    /// Lines matching the error marker within the run window. Source
    /// failures must come back as a synthetic line, never as a panic or an
    /// abort of the run.
    fn error_lines(&self, window: &RunWindow) -> Vec<String>;
}

/// Marker for lines worth surfacing in the report.
pub fn is_error_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    lowered.contains("error") || lowered.contains("fatal")
}

/// Log source for when no container is configured.
pub struct NullLogSource;

impl LogSource for NullLogSource {
    fn label(&self) -> String {
        "none".to_string()
    }

    fn error_lines(&self, _window: &RunWindow) -> Vec<String> {
        Vec::new()
    }
}

/// Reads logs from a container runtime via `<program> logs --since --until`.
pub struct ContainerLogSource {
    container: String,
    program: String,
}

impl ContainerLogSource {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            program: "docker".to_string(),
        }
    }

    /// Override the runtime binary (podman, or a stub in tests).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl LogSource for ContainerLogSource {
    fn label(&self) -> String {
        format!("{} logs {}", self.program, self.container)
    }

    fn error_lines(&self, window: &RunWindow) -> Vec<String> {
        let since = window.started_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let until = window.finished_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        debug!("Collecting {} between {} and {}", self.label(), since, until);

        let output = Command::new(&self.program)
            .args(["logs", "--since", &since, "--until", &until, &self.container])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                // Container runtimes split app output across both streams.
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                stdout
                    .lines()
                    .chain(stderr.lines())
                    .filter(|line| is_error_line(line))
                    .map(|line| line.to_string())
                    .collect()
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!("Log command exited with {}", output.status);
                vec![format!(
                    "log source '{}' failed ({}): {}",
                    self.label(),
                    output.status,
                    stderr.trim()
                )]
            }
            Err(e) => {
                warn!("Log command could not run: {}", e);
                vec![format!("log source '{}' unavailable: {}", self.label(), e)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_marker_matches() {
        assert!(is_error_line(
            "[Tue Aug 25 10:01:02 2026] PHP Fatal error: Uncaught Error: Call to undefined function"
        ));
        assert!(is_error_line("ERROR: something broke"));
        assert!(is_error_line("WordPress database error near 'SELECT'"));
        assert!(!is_error_line("GET /contact/ 200 12ms"));
        assert!(!is_error_line(""));
    }

    #[test]
    fn test_null_source_is_silent() {
        let window = RunWindow {
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        assert!(NullLogSource.error_lines(&window).is_empty());
    }
}
