// src/crawl/mod.rs
// =============================================================================
// This module walks a CVSweb repository and mirrors it to disk.
//
// Features:
// - Breadth-first walk of the directory listings, starting from one URL
// - Each listing page is fetched at most once per run
// - The latest revision of every file is downloaded and saved
// - Files that already exist (and aren't empty) are skipped, so a run can be
//   repeated to fill in whatever failed last time
// - Per-item failures are recorded, never fatal
//
// Rust concepts:
// - Collections: HashSet for tracking visited URLs, VecDeque for the queue
// =============================================================================

mod queue;
mod stats;

// Re-export the crawler and its report
pub use queue::Mirror;
pub use stats::{ErrorKind, RunStatistics};
