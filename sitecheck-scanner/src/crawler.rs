use crate::browser::{BrowserSession, PageProbe};
use crate::filter::UrlFilter;
use crate::frontier::Frontier;
use crate::result::PageResult;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Sequential breadth-first smoke crawler.
///
/// One page at a time: pop the next frontier URL, load it in a fresh tab,
/// record console/exception/network failures, enqueue unseen same-origin
/// links from the rendered DOM. Stops when the frontier drains or the page
/// cap is hit. Per-page failures never abort the run.
pub struct Crawler {
    filter: UrlFilter,
    max_pages: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(base: &Url) -> Self {
        Self {
            filter: UrlFilter::new(base),
            max_pages: 50,
            progress_callback: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn filter(&self) -> &UrlFilter {
        &self.filter
    }

    pub async fn crawl(&self, session: &BrowserSession, seeds: Vec<Url>) -> Vec<PageResult> {
        let mut frontier = Frontier::new(self.max_pages);
        for seed in &seeds {
            frontier.push(seed);
        }
        info!(
            "Starting crawl: {} seeds, page cap {}",
            frontier.pending(),
            self.max_pages
        );

        let mut results = Vec::new();

        while let Some(url) = frontier.pop() {
            if let Some(ref callback) = self.progress_callback {
                callback(frontier.visited(), url.clone());
            }

            let probe = match session.probe(&url).await {
                Ok(probe) => probe,
                Err(e) => {
                    // Browser-level fault; record it and keep draining.
                    warn!("Probe failed for {}: {}", url, e);
                    results.push(
                        PageResult::with_error(url.clone(), format!("probe failed: {}", e))
                            .finalize(),
                    );
                    continue;
                }
            };

            let (result, discovered) = self.result_from_probe(&url, probe);
            for link in &discovered {
                if frontier.push(link) {
                    debug!("Queued {}", link);
                }
            }
            results.push(result);
        }

        info!(
            "Crawl complete: {} pages visited, {} still queued",
            frontier.visited(),
            frontier.pending()
        );
        results
    }

    /// Turn a raw probe into an immutable page result plus the filtered
    /// same-origin links worth queueing.
    fn result_from_probe(&self, url: &str, probe: PageProbe) -> (PageResult, Vec<Url>) {
        let mut result = PageResult::new(url.to_string());
        result.status = probe.status;
        result.console_errors = probe.console_errors;
        result.exceptions = probe.exceptions;
        result.request_failures = probe.request_failures;
        result.error = probe.error;

        let discovered: Vec<Url> = probe
            .links
            .iter()
            .filter_map(|href| self.filter.accept(href))
            .collect();
        result.links = discovered.iter().map(|u| u.as_str().to_string()).collect();

        (result.finalize(), discovered)
    }
}
