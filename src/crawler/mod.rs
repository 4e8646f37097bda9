//! Crawler module for oracle-guided page processing
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first frontier (pending queue plus visited set)
//! - Page snapshots
//! - Clicking oracle-proposed elements
//! - Link and document discovery on the mutated page
//! - Overall crawl coordination

mod coordinator;
mod discover;
mod frontier;
mod interact;
mod snapshot;

pub use coordinator::{run_crawl, Coordinator};
pub use discover::{discover, discover_in_html, DiscoveredLinks};
pub use frontier::{Frontier, FrontierEmpty};
pub use interact::{execute_interactions, InteractionReport};
pub use snapshot::{save_snapshot, PageSnapshot};
