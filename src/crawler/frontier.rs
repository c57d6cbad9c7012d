//! Crawl frontier for breadth-first traversal
//!
//! This module handles:
//! - The FIFO queue of pages still to be fetched, with their depth
//! - The visited set, so a page is fetched at most once per crawl
//! - The set of PDF links already emitted, for de-duplication
//! - The depth bound

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A page waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPage {
    pub url: Url,

    /// Link hops from the seed (the seed is depth 0)
    pub depth: u32,
}

/// Frontier owned by a single crawl
///
/// Pages are returned in breadth-first order. Every URL is keyed by its
/// normalized string form.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<QueuedPage>,

    /// Pages handed out by [`Frontier::next_page`]
    visited: HashSet<String>,

    /// Pages currently waiting in `queue`
    queued: HashSet<String>,

    /// PDF links already emitted
    seen_pdfs: HashSet<String>,

    max_depth: u32,
    deduplicate: bool,
}

impl Frontier {
    /// Creates a frontier holding only the seed at depth 0
    pub fn new(seed: Url, max_depth: u32, deduplicate: bool) -> Self {
        let mut frontier = Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            queued: HashSet::new(),
            seen_pdfs: HashSet::new(),
            max_depth,
            deduplicate,
        };
        frontier.push(seed, 0);
        frontier
    }

    /// Pops the next unvisited page and marks it visited
    pub fn next_page(&mut self) -> Option<QueuedPage> {
        while let Some(page) = self.queue.pop_front() {
            let key = page.url.as_str().to_string();
            self.queued.remove(&key);
            if self.visited.insert(key) {
                return Some(page);
            }
        }
        None
    }

    /// Queues a page found on a page at `parent_depth`
    ///
    /// Returns false when the page would exceed the depth bound, was already
    /// visited or is already waiting.
    pub fn enqueue(&mut self, url: Url, parent_depth: u32) -> bool {
        let depth = parent_depth + 1;
        if depth > self.max_depth {
            return false;
        }
        if self.visited.contains(url.as_str()) || self.queued.contains(url.as_str()) {
            return false;
        }
        self.push(url, depth);
        true
    }

    /// Records a PDF link, returning false if it should be dropped as a repeat
    pub fn record_pdf(&mut self, url: &Url) -> bool {
        !self.deduplicate || self.seen_pdfs.insert(url.as_str().to_string())
    }

    /// True if `depth` still allows following links to further pages
    pub fn can_descend(&self, depth: u32) -> bool {
        depth < self.max_depth
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn push(&mut self, url: Url, depth: u32) {
        self.queued.insert(url.as_str().to_string());
        self.queue.push_back(QueuedPage { url, depth });
    }
}
