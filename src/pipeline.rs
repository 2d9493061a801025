//! Bounded-concurrency fetch+capture coordination within one batch.
//!
//! The coordinator dispatches one task per target, gated by a semaphore, and
//! drains completions over an mpsc channel. It owns the only mutable result
//! collection; the spawned units communicate exclusively by sending their
//! finished [`FetchResult`] back, so there are no concurrent writers to
//! shared state.

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, warn};

use crate::batcher::Batch;
use crate::capture::Screenshotter;
use crate::config::Mode;
use crate::fetch::{FetchResult, PageFetcher};
use crate::utils::target_url;

pub struct Coordinator {
    fetcher: Arc<dyn PageFetcher>,
    capturer: Arc<dyn Screenshotter>,
    concurrency: usize,
    mode: Mode,
}

impl Coordinator {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        capturer: Arc<dyn Screenshotter>,
        concurrency: usize,
        mode: Mode,
    ) -> Self {
        Self {
            fetcher,
            capturer,
            concurrency,
            mode,
        }
    }

    /// Process every target in the batch and return one result per target.
    ///
    /// Results arrive in completion order, not submission order; report
    /// content is order-insensitive per target. An individual failure never
    /// cancels or delays sibling units, and there is no batch-level deadline
    /// beyond each unit's own operation timeouts.
    pub async fn process_batch(&self, batch: &Batch) -> Vec<FetchResult> {
        let total = batch.targets.len();
        debug!("processing batch {} ({} targets)", batch.ordinal, total);

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let (tx, mut rx) = mpsc::channel::<FetchResult>(total.max(1));

        for target in batch.targets.clone() {
            let fetcher = self.fetcher.clone();
            let capturer = self.capturer.clone();
            let semaphore = semaphore.clone();
            let tx = tx.clone();
            let mode = self.mode;

            tokio::spawn(async move {
                let url = target_url(&target, mode);

                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => run_unit(&*fetcher, &*capturer, target, url).await,
                    // The semaphore lives as long as every unit; closure here
                    // would mean the batch was torn down mid-flight.
                    Err(_) => FetchResult::failed(target, url),
                };

                let _ = tx.send(result).await;
            });
        }

        // Drop the coordinator's sender so the channel closes once every
        // dispatched unit has reported in.
        drop(tx);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = rx.recv().await {
            results.push(result);
        }

        debug!(
            "batch {} complete: {} fetched, {} captured, {} failed",
            batch.ordinal,
            results.iter().filter(|r| r.is_fetched()).count(),
            results.iter().filter(|r| r.screenshot.is_some()).count(),
            results.iter().filter(|r| !r.is_fetched()).count(),
        );

        results
    }
}

/// One unit of work: fetch the page, then capture it only if the fetch
/// reached it. Failure at either step is recorded, never propagated.
async fn run_unit(
    fetcher: &dyn PageFetcher,
    capturer: &dyn Screenshotter,
    target: String,
    url: String,
) -> FetchResult {
    match fetcher.fetch_title(&url).await {
        Ok(title) => {
            let mut result = FetchResult::fetched(target, url, title);
            result.screenshot = capturer.capture(&result.url).await;
            result
        }
        Err(e) => {
            warn!("failed to fetch {}: {}", url, e);
            FetchResult::failed(target, url)
        }
    }
}

/// Aggregate counts across all batches of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub targets: usize,
    pub fetched: usize,
    pub captured: usize,
    pub failed: usize,
    pub reports: usize,
}

impl RunSummary {
    pub fn absorb(&mut self, results: &[FetchResult]) {
        self.targets += results.len();
        self.fetched += results.iter().filter(|r| r.is_fetched()).count();
        self.captured += results.iter().filter(|r| r.screenshot.is_some()).count();
        self.failed += results.iter().filter(|r| !r.is_fetched()).count();
        self.reports += 1;
    }
}
