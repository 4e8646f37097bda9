//! Selector inference for Doc-Harvester
//!
//! This module contains everything between a page's raw markup and the set
//! of CSS selectors worth clicking on it:
//! - Chunk splitting of the markup into overlapping windows
//! - The HTTP client for the external selector-inference service
//! - Lenient parsing of the service's free-text responses
//! - Concurrent fan-out over chunks and deduplication of the results

mod chunker;
mod client;
mod merge;
mod response;

pub use chunker::{chunk_html, Chunk};
pub use client::{HttpOracle, InferenceResult, SelectorOracle};
pub use merge::{merge_selectors, union_candidates, SelectorCandidate};
pub use response::{parse_selectors, SelectorSet};
