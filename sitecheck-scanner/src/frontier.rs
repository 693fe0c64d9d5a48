use std::collections::{HashSet, VecDeque};
use url::Url;

/// FIFO crawl frontier with exact-string deduplication and a hard visit cap.
///
/// Lives only for the duration of one run; nothing is persisted.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
    visited: usize,
    max_pages: usize,
}

impl Frontier {
    pub fn new(max_pages: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            visited: 0,
            max_pages,
        }
    }

    /// Enqueue a URL unless it has been seen before. Returns whether it was
    /// actually queued.
    pub fn push(&mut self, url: &Url) -> bool {
        let key = url.as_str().to_string();
        if self.seen.contains(&key) {
            return false;
        }
        self.seen.insert(key.clone());
        self.queue.push_back(key);
        true
    }

    /// Next URL to visit, or None when the queue is drained or the page cap
    /// has been reached. Each returned URL counts against the cap.
    pub fn pop(&mut self) -> Option<String> {
        if self.visited >= self.max_pages {
            return None;
        }
        let url = self.queue.pop_front()?;
        self.visited += 1;
        Some(url)
    }

    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut f = Frontier::new(10);
        f.push(&url("http://localhost:8080/"));
        f.push(&url("http://localhost:8080/about/"));
        assert_eq!(f.pop().unwrap(), "http://localhost:8080/");
        assert_eq!(f.pop().unwrap(), "http://localhost:8080/about/");
        assert!(f.pop().is_none());
    }

    #[test]
    fn test_dedup() {
        let mut f = Frontier::new(10);
        assert!(f.push(&url("http://localhost:8080/contact/")));
        assert!(!f.push(&url("http://localhost:8080/contact/")));
        assert_eq!(f.pending(), 1);
    }

    #[test]
    fn test_never_exceeds_page_cap() {
        let mut f = Frontier::new(3);
        for i in 0..20 {
            f.push(&url(&format!("http://localhost:8080/page{}/", i)));
        }
        let mut visited = 0;
        while f.pop().is_some() {
            visited += 1;
        }
        assert_eq!(visited, 3);
        assert_eq!(f.visited(), 3);
    }

    #[test]
    fn test_zero_cap_visits_nothing() {
        let mut f = Frontier::new(0);
        f.push(&url("http://localhost:8080/"));
        assert!(f.pop().is_none());
    }
}
