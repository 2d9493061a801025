use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort the run.
///
/// Per-target problems are never represented here; those are recovered
/// locally and surface as degraded [`crate::FetchResult`] rows instead.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("failed to read target list {path}: {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed header argument {0:?}, expected \"Name: value\"")]
    MalformedHeader(String),

    #[error("invalid header {0:?}: {1}")]
    InvalidHeader(String, String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("report rendering failed: {0}")]
    Render(String),

    #[error("failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Outcome of a single page fetch that did not produce a document.
///
/// One attempt per target, so every variant is terminal for that fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

/// Failure while driving a browser session for one capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("screenshot capture failed: {0}")]
    Capture(String),

    #[error("navigation timed out")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
