use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_NAV_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_SETTLE_MILLIS: u64 = 1000;
pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Resolved settings for one run. CLI flags override environment variables,
/// which override the defaults above.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: Url,
    pub max_pages: usize,
    /// Container name for the log cross-check; None disables it.
    pub container: Option<String>,
    /// Headless-browser executable override; None lets the browser crate
    /// autodetect an installed Chrome/Chromium.
    pub chrome: Option<PathBuf>,
    pub report_dir: PathBuf,
    pub nav_timeout: Duration,
    pub settle: Duration,
}

impl RunConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Environment lookup is injected so config resolution stays testable
    /// without touching process globals.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("SITECHECK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("SITECHECK_BASE_URL is not a valid URL: {}", base_url))?;
        if base_url.host_str().is_none() {
            bail!("SITECHECK_BASE_URL has no host: {}", base_url);
        }

        let max_pages = match lookup("SITECHECK_MAX_PAGES") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("SITECHECK_MAX_PAGES is not a number: {}", raw))?,
            None => DEFAULT_MAX_PAGES,
        };

        let container = lookup("SITECHECK_CONTAINER").filter(|s| !s.trim().is_empty());
        let chrome = lookup("SITECHECK_CHROME")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            base_url,
            max_pages,
            container,
            chrome,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            nav_timeout: Duration::from_secs(DEFAULT_NAV_TIMEOUT_SECS),
            settle: Duration::from_millis(DEFAULT_SETTLE_MILLIS),
        })
    }
}
