use serde::{Deserialize, Serialize};

/// A network request that failed to complete while a page was loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestFailure {
    pub url: String,
    pub reason: String,
}

/// Outcome of visiting a single page. Recorded once when the page finishes
/// loading (or times out) and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub url: String,
    /// HTTP status of the main document, or None when navigation failed.
    pub status: Option<u16>,
    pub console_errors: Vec<String>,
    pub exceptions: Vec<String>,
    pub request_failures: Vec<RequestFailure>,
    pub ok: bool,
    /// Same-origin links discovered in the rendered DOM.
    pub links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    pub fn new(url: String) -> Self {
        Self {
            url,
            status: None,
            console_errors: Vec::new(),
            exceptions: Vec::new(),
            request_failures: Vec::new(),
            ok: false,
            links: Vec::new(),
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url)
        }
    }

    /// A page passes only with an exact 200 and all three error
    /// collections empty.
    pub fn compute_ok(&self) -> bool {
        self.status == Some(200)
            && self.console_errors.is_empty()
            && self.exceptions.is_empty()
            && self.request_failures.is_empty()
    }

    pub fn finalize(mut self) -> Self {
        self.ok = self.compute_ok();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_page(url: &str) -> PageResult {
        let mut r = PageResult::new(url.to_string());
        r.status = Some(200);
        r
    }

    #[test]
    fn test_clean_200_passes() {
        let r = clean_page("http://localhost:8080/contact/").finalize();
        assert!(r.ok);
    }

    #[test]
    fn test_non_200_fails() {
        for status in [Some(301), Some(404), Some(500), None] {
            let mut r = clean_page("http://localhost:8080/");
            r.status = status;
            assert!(!r.finalize().ok, "status {:?} should fail", status);
        }
    }

    #[test]
    fn test_console_error_fails() {
        let mut r = clean_page("http://localhost:8080/");
        r.console_errors
            .push("Uncaught ReferenceError: jQuery is not defined".to_string());
        assert!(!r.finalize().ok);
    }

    #[test]
    fn test_exception_fails() {
        let mut r = clean_page("http://localhost:8080/");
        r.exceptions.push("TypeError: x is undefined".to_string());
        assert!(!r.finalize().ok);
    }

    #[test]
    fn test_broken_image_fails() {
        // 200 page with one failed subresource request must not pass
        let mut r = clean_page("http://localhost:8080/contact/");
        r.request_failures.push(RequestFailure {
            url: "http://localhost:8080/wp-content/uploads/hero.jpg".to_string(),
            reason: "net::ERR_ABORTED".to_string(),
        });
        let r = r.finalize();
        assert!(!r.request_failures.is_empty());
        assert!(!r.ok);
    }

    #[test]
    fn test_navigation_error_has_no_status() {
        let r = PageResult::with_error(
            "http://localhost:8080/slow/".to_string(),
            "navigation timed out after 15s".to_string(),
        )
        .finalize();
        assert_eq!(r.status, None);
        assert!(!r.ok);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(clean_page("http://localhost:8080/").finalize()).unwrap();
        assert!(json.get("consoleErrors").is_some());
        assert!(json.get("requestFailures").is_some());
        assert!(json.get("error").is_none());
    }
}
