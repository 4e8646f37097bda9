//! Breadth-first frontier over a pending queue and a visited set
//!
//! Invariants:
//! - no URL in `pending` is also in `visited`
//! - `pending` never holds the same URL twice
//! - `visited` only grows
//!
//! The frontier itself enforces no bounds; the coordinator decides when to stop.

use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Returned by `dequeue_next` when nothing is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Frontier is empty")]
pub struct FrontierEmpty;

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    pending: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier whose only pending entry is `start_url`
    pub fn new(start_url: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(start_url);
        frontier
    }

    /// Queues `url` unless it was already visited or is already pending
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains(&url) || self.pending.contains(&url) {
            return false;
        }
        self.pending.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the earliest-queued URL
    pub fn dequeue_next(&mut self) -> Result<String, FrontierEmpty> {
        let url = self.queue.pop_front().ok_or(FrontierEmpty)?;
        self.pending.remove(&url);
        Ok(url)
    }

    /// Records `url` as visited; idempotent
    ///
    /// A URL marked visited while still pending is dropped from the queue.
    pub fn mark_visited(&mut self, url: &str) {
        if self.pending.remove(url) {
            self.queue.retain(|queued| queued != url);
        }
        if !self.is_visited(url) {
            self.visited.insert(url.to_string());
        }
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    /// Number of URLs waiting to be processed
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
