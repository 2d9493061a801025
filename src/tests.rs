#[cfg(test)]
mod pipeline_tests {
    use crate::{
        Batch, Coordinator, FetchError, FetchResult, Mode, PageFetcher, RunSummary, Screenshotter,
        FETCH_FAILED,
    };
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Fetcher that fails any URL containing the marker and titles the rest.
    struct MarkedFetcher {
        fail_marker: Option<&'static str>,
        delay: Duration,
    }

    impl MarkedFetcher {
        fn ok() -> Self {
            Self {
                fail_marker: None,
                delay: Duration::ZERO,
            }
        }

        fn failing_on(marker: &'static str) -> Self {
            Self {
                fail_marker: Some(marker),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl PageFetcher for MarkedFetcher {
        async fn fetch_title(&self, url: &str) -> Result<Option<String>, FetchError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if let Some(marker) = self.fail_marker {
                if url.contains(marker) {
                    return Err(FetchError::Timeout);
                }
            }
            Ok(Some(format!("title of {url}")))
        }
    }

    /// Capturer that counts invocations and optionally produces a path.
    struct CountingCapture {
        calls: AtomicUsize,
        succeed: bool,
    }

    impl CountingCapture {
        fn new(succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                succeed,
            })
        }
    }

    #[async_trait]
    impl Screenshotter for CountingCapture {
        async fn capture(&self, url: &str) -> Option<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.succeed
                .then(|| PathBuf::from(format!("screenshots/{}.png", url.replace("://", "_"))))
        }
    }

    /// Fetcher tracking the peak number of concurrently active units.
    struct GaugeFetcher {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for GaugeFetcher {
        async fn fetch_title(&self, _url: &str) -> Result<Option<String>, FetchError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(Some("ok".to_string()))
        }
    }

    fn batch(targets: &[&str]) -> Batch {
        Batch {
            ordinal: 1,
            targets: targets.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_every_target_yields_exactly_one_result() {
        let capturer = CountingCapture::new(true);
        let coordinator = Coordinator::new(
            Arc::new(MarkedFetcher::ok()),
            capturer.clone(),
            3,
            Mode::Subdomain,
        );

        let targets: Vec<String> = (0..10).map(|i| format!("host{i}.example")).collect();
        let target_refs: Vec<&str> = targets.iter().map(String::as_str).collect();
        let results = coordinator.process_batch(&batch(&target_refs)).await;

        assert_eq!(results.len(), 10);
        let seen: HashSet<&str> = results.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(seen.len(), 10);
        assert!(results.iter().all(|r| r.is_fetched()));
        assert!(results.iter().all(|r| r.screenshot.is_some()));
    }

    #[tokio::test]
    async fn test_failed_fetch_skips_capture_and_isolates_siblings() {
        let capturer = CountingCapture::new(true);
        let coordinator = Coordinator::new(
            Arc::new(MarkedFetcher::failing_on("bad")),
            capturer.clone(),
            2,
            Mode::Subdomain,
        );

        let results = coordinator
            .process_batch(&batch(&["good-a.example", "bad.example", "good-b.example"]))
            .await;

        assert_eq!(results.len(), 3);

        let failed = results.iter().find(|r| r.target == "bad.example").unwrap();
        assert_eq!(failed.title, FETCH_FAILED);
        assert!(failed.screenshot.is_none());

        for r in results.iter().filter(|r| r.target != "bad.example") {
            assert!(r.is_fetched());
            assert!(r.screenshot.is_some());
        }

        // Capture is only attempted for targets whose fetch succeeded.
        assert_eq!(capturer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_capture_failure_keeps_title() {
        let capturer = CountingCapture::new(false);
        let coordinator = Coordinator::new(
            Arc::new(MarkedFetcher::ok()),
            capturer.clone(),
            2,
            Mode::Url,
        );

        let results = coordinator
            .process_batch(&batch(&["https://example.com"]))
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "title of https://example.com");
        assert!(results[0].screenshot.is_none());
        assert_eq!(capturer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        let fetcher = Arc::new(GaugeFetcher {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let coordinator =
            Coordinator::new(fetcher.clone(), CountingCapture::new(false), 2, Mode::Subdomain);

        let targets: Vec<String> = (0..8).map(|i| format!("host{i}.example")).collect();
        let target_refs: Vec<&str> = targets.iter().map(String::as_str).collect();
        let results = coordinator.process_batch(&batch(&target_refs)).await;

        assert_eq!(results.len(), 8);
        let peak = fetcher.peak.load(Ordering::SeqCst);
        assert!(peak <= 2, "peak concurrency {peak} exceeded limit 2");
        assert!(peak >= 1);
    }

    #[tokio::test]
    async fn test_subdomain_mode_synthesizes_urls() {
        let coordinator = Coordinator::new(
            Arc::new(MarkedFetcher::ok()),
            CountingCapture::new(false),
            1,
            Mode::Subdomain,
        );

        let results = coordinator.process_batch(&batch(&["api.example.com"])).await;
        assert_eq!(results[0].url, "http://api.example.com");
        assert_eq!(results[0].target, "api.example.com");
    }

    #[test]
    fn test_run_summary_accumulates_across_batches() {
        let mut summary = RunSummary::default();

        let first = vec![
            FetchResult {
                target: "a".into(),
                url: "http://a".into(),
                title: "A".into(),
                screenshot: Some(PathBuf::from("screenshots/a.png")),
            },
            FetchResult::failed("b".into(), "http://b".into()),
        ];
        let second = vec![FetchResult::fetched("c".into(), "http://c".into(), None)];

        summary.absorb(&first);
        summary.absorb(&second);

        assert_eq!(summary.targets, 3);
        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.captured, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.reports, 2);
    }
}

#[cfg(test)]
mod run_tests {
    use crate::{batches, write_report, FetchResult, HtmlReportRenderer};

    /// 250 targets at batch size 100 produce reports 1..=3 sized 100/100/50.
    #[tokio::test]
    async fn test_batched_reports_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let targets: Vec<String> = (0..250).map(|i| format!("host{i}.example")).collect();

        let mut sizes = Vec::new();
        for batch in batches(&targets, 100) {
            let results: Vec<FetchResult> = batch
                .targets
                .iter()
                .map(|t| FetchResult::fetched(t.clone(), format!("http://{t}"), None))
                .collect();

            let path = dir.path().join(format!("prefix_{}.html", batch.ordinal));
            write_report(&HtmlReportRenderer, &results, &path).await.unwrap();
            sizes.push(results.len());
        }

        assert_eq!(sizes, vec![100, 100, 50]);
        for n in 1..=3 {
            assert!(dir.path().join(format!("prefix_{n}.html")).exists());
        }
        assert!(!dir.path().join("prefix_4.html").exists());
    }
}
