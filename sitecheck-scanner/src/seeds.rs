use crate::filter::UrlFilter;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Paths crawled on every run regardless of what the sitemap says.
pub const FIXED_SEED_PATHS: &[&str] = &["/", "/about/", "/skills/", "/portfolio/", "/contact/"];

/// Build the initial seed list: every `<loc>` from `{base}/sitemap.xml`
/// (best-effort, failures are swallowed) merged with the fixed seed paths,
/// all passed through the URL filter. Order is sitemap entries first, then
/// fixed paths; the frontier deduplicates overlaps.
pub async fn discover_seeds(base: &Url, filter: &UrlFilter) -> Vec<Url> {
    let mut seeds = Vec::new();

    for loc in fetch_sitemap_locs(base).await {
        if let Some(url) = filter.accept(&loc) {
            seeds.push(url);
        }
    }

    for path in FIXED_SEED_PATHS {
        if let Ok(url) = base.join(path)
            && let Some(url) = filter.accept(url.as_str())
        {
            seeds.push(url);
        }
    }

    info!("Seed discovery produced {} candidate URLs", seeds.len());
    seeds
}

/// Fetch and parse the sitemap. Any failure (network, non-2xx, bad body)
/// just yields an empty list; the fixed seed paths still cover the run.
async fn fetch_sitemap_locs(base: &Url) -> Vec<String> {
    let sitemap_url = match base.join("/sitemap.xml") {
        Ok(u) => u,
        Err(_) => return Vec::new(),
    };

    let client = match Client::builder()
        .user_agent("sitecheck/0.2 (smoke-test crawler)")
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let body = match client.get(sitemap_url.clone()).send().await {
        Ok(resp) if resp.status().is_success() => match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Sitemap body unreadable: {}", e);
                return Vec::new();
            }
        },
        Ok(resp) => {
            debug!("Sitemap fetch returned {}", resp.status());
            return Vec::new();
        }
        Err(e) => {
            debug!("Sitemap fetch failed: {}", e);
            return Vec::new();
        }
    };

    extract_locs(&body)
}

/// Pull the text of every `<loc>` element. The lenient HTML parser handles
/// sitemap XML fine since we only care about element names and text.
fn extract_locs(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let loc_selector = Selector::parse("loc").unwrap();

    document
        .select(&loc_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}
