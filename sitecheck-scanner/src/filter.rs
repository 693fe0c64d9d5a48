use tracing::trace;
use url::Url;

/// Path substrings that must never be crawled. Hitting the login/logout
/// endpoints from an automated crawl can invalidate sessions on the target.
const SKIP_PATH_PATTERNS: &[&str] = &["/wp-admin", "/wp-login"];
const SKIP_QUERY_PATTERNS: &[&str] = &["action=logout"];

/// Decides which candidate URLs are eligible for the crawl frontier.
///
/// A candidate is accepted only if it parses, shares the configured origin
/// (scheme + host + port), is not a pure in-page anchor, is not a
/// `mailto:`/`tel:`/`javascript:` pseudo-link and does not match the
/// admin/login/logout patterns. Accepted URLs come back normalized with the
/// fragment stripped, so anchor variants of a page collapse to one frontier
/// entry. Malformed input is rejected, never fatal.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    origin: url::Origin,
}

impl UrlFilter {
    pub fn new(base: &Url) -> Self {
        Self {
            origin: base.origin(),
        }
    }

    pub fn accept(&self, candidate: &str) -> Option<Url> {
        let trimmed = candidate.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("mailto:")
            || trimmed.starts_with("tel:")
            || trimmed.starts_with("javascript:")
        {
            return None;
        }

        let mut url = Url::parse(trimmed).ok()?;
        url.set_fragment(None);

        if url.origin() != self.origin {
            trace!("rejecting cross-origin url: {}", url);
            return None;
        }

        let path = url.path();
        if SKIP_PATH_PATTERNS.iter().any(|p| path.contains(p)) {
            return None;
        }
        if let Some(query) = url.query()
            && SKIP_QUERY_PATTERNS.iter().any(|p| query.contains(p))
        {
            return None;
        }

        Some(url)
    }
}
