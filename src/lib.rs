//! # urlscope
//!
//! Bulk reconnaissance over a list of network targets: for each target the
//! page is fetched concurrently, its title extracted, a full-page screenshot
//! captured in an isolated headless browser session, and the results are
//! assembled into paginated HTML reports.
//!
//! The pipeline runs one batch at a time; within a batch, targets are
//! processed under a bounded concurrency limit with per-target failure
//! isolation. A failed fetch or capture degrades that target's report row and
//! never disturbs its siblings.
//!
//! ## CLI Usage
//!
//! ```bash
//! urlscope -i targets.txt -o url_report -c 5 -H "X-Scan: 1"
//! ```

/// Run configuration and request header handling
pub mod config;

/// Fatal and per-unit error types
pub mod error;

/// Target list loading
pub mod loader;

/// Partitioning of targets into report-sized batches
pub mod batcher;

/// Page fetching and title extraction
pub mod fetch;

/// Screenshot capture through isolated browser sessions
pub mod capture;

/// Bounded-concurrency fetch+capture coordination
pub mod pipeline;

/// Per-batch HTML report emission
pub mod report;

/// Command-line interface and run wiring
pub mod cli;

/// URL synthesis and filename helpers
pub mod utils;

#[cfg(test)]
mod tests;

pub use batcher::*;
pub use capture::*;
pub use cli::*;
pub use config::*;
pub use error::*;
pub use fetch::*;
pub use loader::*;
pub use pipeline::*;
pub use report::*;
pub use utils::*;
