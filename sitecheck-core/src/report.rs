use crate::logs::RunWindow;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use sitecheck_scanner::PageResult;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub base_url: String,
    pub visited: usize,
    pub passed: usize,
    pub failed: usize,
    pub log_errors: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// The full output of one run: summary, per-page results, the external log
/// lines that matched the error marker and, if the run blew up, what killed
/// it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub summary: RunSummary,
    pub pages: Vec<PageResult>,
    pub log_error_lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal_error: Option<String>,
}

impl RunReport {
    pub fn new(
        base_url: &Url,
        pages: Vec<PageResult>,
        log_error_lines: Vec<String>,
        window: RunWindow,
    ) -> Self {
        let passed = pages.iter().filter(|p| p.ok).count();
        let summary = RunSummary {
            base_url: base_url.as_str().to_string(),
            visited: pages.len(),
            passed,
            failed: pages.len() - passed,
            log_errors: log_error_lines.len(),
            started_at: window.started_at,
            finished_at: window.finished_at,
        };
        Self {
            summary,
            pages,
            log_error_lines,
            fatal_error: None,
        }
    }

    /// Best-effort report for a run that died before (or while) crawling.
    pub fn fatal(base_url: &Url, error: String, window: RunWindow) -> Self {
        let mut report = Self::new(base_url, Vec::new(), Vec::new(), window);
        report.fatal_error = Some(error);
        report
    }

    /// 0 only when every page passed, no external log lines matched and
    /// nothing fatal happened.
    pub fn exit_code(&self) -> i32 {
        if self.summary.failed == 0 && self.summary.log_errors == 0 && self.fatal_error.is_none() {
            0
        } else {
            1
        }
    }

    pub fn filename(&self) -> String {
        format!(
            "smoke-{}.json",
            self.summary.started_at.format("%Y%m%d-%H%M%S")
        )
    }

    /// Serialize to `<dir>/smoke-<timestamp>.json`, creating the directory
    /// on demand. Returns the path written.
    pub fn write(&self, dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.filename());
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let mut file = fs::File::create(&path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(path)
    }

    /// Human summary for stdout.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "\n{}\n",
            "━".repeat(52)
        ));
        out.push_str(&format!("Smoke test of {}\n", self.summary.base_url.bold()));
        out.push_str(&format!(
            "  Visited: {}   Passed: {}   Failed: {}   Log errors: {}\n",
            self.summary.visited,
            self.summary.passed.to_string().green(),
            colorize_count(self.summary.failed),
            colorize_count(self.summary.log_errors),
        ));

        for page in self.pages.iter().filter(|p| !p.ok) {
            let status = page
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "---".to_string());
            out.push_str(&format!("  {} {} {}\n", "✗".red(), status, page.url));
            if let Some(ref error) = page.error {
                out.push_str(&format!("      {}\n", error));
            }
            for line in &page.console_errors {
                out.push_str(&format!("      console: {}\n", line));
            }
            for line in &page.exceptions {
                out.push_str(&format!("      exception: {}\n", line));
            }
            for failure in &page.request_failures {
                out.push_str(&format!("      request: {} ({})\n", failure.url, failure.reason));
            }
        }

        if !self.log_error_lines.is_empty() {
            out.push_str(&format!("\n{}\n", "External log errors:".yellow().bold()));
            for line in &self.log_error_lines {
                out.push_str(&format!("  {}\n", line));
            }
        }

        if let Some(ref fatal) = self.fatal_error {
            out.push_str(&format!("\n{} {}\n", "FATAL:".red().bold(), fatal));
        }

        let verdict = if self.exit_code() == 0 {
            "PASS".green().bold().to_string()
        } else {
            "FAIL".red().bold().to_string()
        };
        out.push_str(&format!("\nResult: {}\n", verdict));
        out.push_str(&format!("{}\n", "━".repeat(52)));
        out
    }
}

fn colorize_count(n: usize) -> String {
    if n == 0 {
        n.to_string().green().to_string()
    } else {
        n.to_string().red().to_string()
    }
}
