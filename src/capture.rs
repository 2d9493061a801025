//! Screenshot capture through isolated headless browser sessions.
//!
//! Every capture launches its own Chrome instance: automation sessions are
//! not safely shared across concurrent callers, and an isolated session makes
//! teardown trivially complete. The session is closed on every exit path —
//! success, navigation timeout, or renderer error — since each one holds a
//! child process and a temp profile.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::CaptureError;
use crate::utils::screenshot_filename;

/// Capability interface for rendering a page and persisting a snapshot image.
#[async_trait]
pub trait Screenshotter: Send + Sync {
    /// Capture the page at `url`, returning where the image was stored.
    ///
    /// Any failure yields `None`; capture problems never fail the target's
    /// overall fetch result.
    async fn capture(&self, url: &str) -> Option<PathBuf>;
}

/// Production capturer backed by `chromiumoxide`.
pub struct BrowserCapture {
    screenshot_dir: PathBuf,
    navigation_timeout: Duration,
    chrome_path: Option<String>,
}

impl BrowserCapture {
    pub fn new(
        screenshot_dir: PathBuf,
        navigation_timeout: Duration,
        chrome_path: Option<String>,
    ) -> Self {
        Self {
            screenshot_dir,
            navigation_timeout,
            chrome_path,
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, CaptureError> {
        let mut builder = BrowserConfig::builder().args(headless_chrome_args());

        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(CaptureError::Launch)
    }

    async fn try_capture(&self, url: &str) -> Result<PathBuf, CaptureError> {
        fs::create_dir_all(&self.screenshot_dir).await?;

        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| CaptureError::Launch(e.to_string()))?;

        // The handler drives Chrome DevTools Protocol traffic and must be
        // polled for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let capture = tokio::time::timeout(
            self.navigation_timeout,
            navigate_and_snap(&browser, url),
        )
        .await;

        // Teardown runs before the outcome is inspected so the session never
        // outlives this call, whichever branch was taken.
        let _ = browser.close().await;
        let _ = browser.wait().await;
        handler_task.abort();

        let image = match capture {
            Ok(Ok(image)) => image,
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(CaptureError::Timeout),
        };

        let path = self.screenshot_dir.join(screenshot_filename(url));
        fs::write(&path, &image).await?;
        debug!("screenshot saved as {}", path.display());

        Ok(path)
    }
}

#[async_trait]
impl Screenshotter for BrowserCapture {
    async fn capture(&self, url: &str) -> Option<PathBuf> {
        match self.try_capture(url).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("failed to take screenshot for {}: {}", url, e);
                None
            }
        }
    }
}

async fn navigate_and_snap(browser: &Browser, url: &str) -> Result<Vec<u8>, CaptureError> {
    let page = browser
        .new_page(url)
        .await
        .map_err(|e| CaptureError::Navigation(e.to_string()))?;

    // Best effort: some pages never fire a clean load event but still render.
    let _ = page.wait_for_navigation().await;

    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(true)
        .build();

    let image = page
        .screenshot(params)
        .await
        .map_err(|e| CaptureError::Capture(e.to_string()))?;

    let _ = page.close().await;
    Ok(image)
}

/// Chrome flags for one-shot headless rendering.
fn headless_chrome_args() -> Vec<String> {
    [
        "--headless",
        "--no-sandbox",
        "--disable-gpu",
        "--disable-dev-shm-usage",
        "--disable-extensions",
        "--disable-default-apps",
        "--disable-sync",
        "--no-first-run",
        "--allow-running-insecure-content",
        "--ignore-certificate-errors",
        "--window-size=1920,1080",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Relative location a capture for `url` would be stored at under `dir`.
pub fn screenshot_path(dir: &Path, url: &str) -> PathBuf {
    dir.join(screenshot_filename(url))
}
