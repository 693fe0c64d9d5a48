use crate::error::{Result, ScanError};
use crate::result::RequestFailure;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventRequestWillBeSent, RequestId,
};
use chromiumoxide::cdp::js_protocol::runtime::{
    ConsoleApiCalledType, EventConsoleApiCalled, EventExceptionThrown, RemoteObject,
};
use futures::StreamExt;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const EXTRACT_LINKS_JS: &str =
    "Array.from(document.querySelectorAll('a[href]')).map(a => a.href)";

/// Everything observed while one page loaded.
#[derive(Debug, Default)]
pub struct PageProbe {
    pub status: Option<u16>,
    pub console_errors: Vec<String>,
    pub exceptions: Vec<String>,
    pub request_failures: Vec<RequestFailure>,
    /// Raw absolute hrefs from the rendered DOM, unfiltered.
    pub links: Vec<String>,
    pub error: Option<String>,
}

/// A running headless Chrome instance plus its CDP event pump.
///
/// The browser is an external process; callers must run [`close`] on every
/// exit path so it does not outlive the crawl. One `probe` call opens a fresh
/// tab, watches console/exception/network events through navigation plus a
/// settle delay, extracts the rendered anchor hrefs and closes the tab.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    nav_timeout: Duration,
    settle: Duration,
}

impl BrowserSession {
    pub async fn launch(
        executable: Option<PathBuf>,
        nav_timeout: Duration,
        settle: Duration,
    ) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1366, 900);
        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ScanError::Other)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        info!("Headless browser launched");

        // Pump CDP messages until the browser goes away.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
            nav_timeout,
            settle,
        })
    }

    /// Load one page in a fresh tab and record what happened. Per-page
    /// navigation failures and timeouts come back inside the probe; only
    /// browser-level faults (cannot open a tab, listeners gone) are `Err`.
    pub async fn probe(&self, url: &str) -> Result<PageProbe> {
        debug!("Probing {}", url);
        let page = self.browser.new_page("about:blank").await?;

        let console_errors: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let exceptions: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let request_failures: Arc<Mutex<Vec<RequestFailure>>> = Arc::new(Mutex::new(Vec::new()));
        let request_urls: Arc<Mutex<HashMap<RequestId, String>>> =
            Arc::new(Mutex::new(HashMap::new()));

        // Listeners attach before navigation so load-time events are caught.
        let mut console_events = page.event_listener::<EventConsoleApiCalled>().await?;
        let console_sink = console_errors.clone();
        let console_task = tokio::spawn(async move {
            while let Some(event) = console_events.next().await {
                if matches!(event.r#type, ConsoleApiCalledType::Error) {
                    console_sink
                        .lock()
                        .unwrap()
                        .push(format_remote_objects(&event.args));
                }
            }
        });

        let mut exception_events = page.event_listener::<EventExceptionThrown>().await?;
        let exception_sink = exceptions.clone();
        let exception_task = tokio::spawn(async move {
            while let Some(event) = exception_events.next().await {
                let details = &event.exception_details;
                let text = details
                    .exception
                    .as_ref()
                    .and_then(|obj| obj.description.clone())
                    .unwrap_or_else(|| details.text.clone());
                exception_sink.lock().unwrap().push(text);
            }
        });

        let mut request_events = page.event_listener::<EventRequestWillBeSent>().await?;
        let url_map = request_urls.clone();
        let request_task = tokio::spawn(async move {
            while let Some(event) = request_events.next().await {
                url_map
                    .lock()
                    .unwrap()
                    .insert(event.request_id.clone(), event.request.url.clone());
            }
        });

        let mut failure_events = page.event_listener::<EventLoadingFailed>().await?;
        let failure_sink = request_failures.clone();
        let failure_urls = request_urls.clone();
        let failure_task = tokio::spawn(async move {
            while let Some(event) = failure_events.next().await {
                // Cancelled requests (e.g. navigation away) are not failures.
                if event.canceled == Some(true) {
                    continue;
                }
                let url = failure_urls
                    .lock()
                    .unwrap()
                    .get(&event.request_id)
                    .cloned()
                    .unwrap_or_else(|| "(unknown request)".to_string());
                failure_sink.lock().unwrap().push(RequestFailure {
                    url,
                    reason: event.error_text.clone(),
                });
            }
        });

        let mut probe = PageProbe::default();

        let navigation = tokio::time::timeout(self.nav_timeout, async {
            page.goto(url).await?;
            page.wait_for_navigation_response().await
        })
        .await;

        match navigation {
            Ok(Ok(response)) => {
                probe.status = response
                    .and_then(|req| req.response.as_ref().map(|resp| resp.status as u16));

                // Give late console output and async requests time to land.
                tokio::time::sleep(self.settle).await;

                match page.evaluate(EXTRACT_LINKS_JS).await {
                    Ok(result) => {
                        probe.links = result.into_value().unwrap_or_default();
                    }
                    Err(e) => {
                        debug!("Link extraction failed on {}: {}", url, e);
                    }
                }
            }
            Ok(Err(e)) => {
                probe.error = Some(format!("navigation failed: {}", e));
            }
            Err(_) => {
                probe.error = Some(format!(
                    "navigation timed out after {}s",
                    self.nav_timeout.as_secs()
                ));
            }
        }

        console_task.abort();
        exception_task.abort();
        request_task.abort();
        failure_task.abort();

        if let Err(e) = page.close().await {
            debug!("Closing tab for {} failed: {}", url, e);
        }

        probe.console_errors = std::mem::take(&mut *console_errors.lock().unwrap());
        probe.exceptions = std::mem::take(&mut *exceptions.lock().unwrap());
        probe.request_failures = std::mem::take(&mut *request_failures.lock().unwrap());

        Ok(probe)
    }

    /// Shut the browser down and stop the event pump. Must run on every exit
    /// path or the Chrome process leaks.
    pub async fn close(mut self) -> Result<()> {
        let close_result = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        close_result?;
        info!("Headless browser closed");
        Ok(())
    }
}

/// Render console call arguments the way devtools would, best-effort.
fn format_remote_objects(args: &[RemoteObject]) -> String {
    let parts: Vec<String> = args
        .iter()
        .map(|obj| {
            obj.value
                .as_ref()
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .or_else(|| obj.description.clone())
                .unwrap_or_else(|| "<object>".to_string())
        })
        .collect();
    parts.join(" ")
}
