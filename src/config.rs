//! Run configuration and request header handling.
//!
//! A [`Config`] is assembled from an optional JSON file plus CLI overrides and
//! validated once before any processing starts. Everything in it is read-only
//! for the rest of the run.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ReconError;

/// Input interpretation mode.
///
/// URL mode passes targets through untouched; subdomain mode treats each
/// target as a bare hostname and synthesizes an `http://` URL from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Url,
    Subdomain,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Url
    }
}

/// Main configuration for a reconnaissance run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Path to the line-delimited target list.
    pub input: PathBuf,

    /// Prefix for report filenames; defaults per [`Mode`] when unset.
    pub output_prefix: Option<String>,

    /// How target lines are interpreted.
    pub mode: Mode,

    /// Maximum concurrent fetch+capture units within a batch (default: 5).
    pub concurrency: usize,

    /// Number of targets per report (default: 100).
    pub batch_size: usize,

    /// Timeout for each HTTP fetch (default: 5 seconds).
    pub http_timeout: Duration,

    /// Overall deadline for each browser navigation and capture (default: 10 seconds).
    pub browser_timeout: Duration,

    /// Directory screenshots are written into.
    pub screenshot_dir: PathBuf,

    /// Path to the Chrome/Chromium executable (default: auto-detect).
    pub chrome_path: Option<String>,

    /// Extra request headers as `(name, value)` pairs, applied to every fetch.
    pub headers: Vec<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_prefix: None,
            mode: Mode::default(),
            concurrency: 5,
            batch_size: 100,
            http_timeout: Duration::from_secs(5),
            browser_timeout: Duration::from_secs(10),
            screenshot_dir: PathBuf::from("screenshots"),
            chrome_path: None,
            headers: Vec::new(),
        }
    }
}

impl Config {
    /// Report filename prefix, falling back to the mode-specific default.
    pub fn report_prefix(&self) -> &str {
        match &self.output_prefix {
            Some(prefix) => prefix,
            None => match self.mode {
                Mode::Url => "url_report",
                Mode::Subdomain => "subdomain_report",
            },
        }
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.input.as_os_str().is_empty() {
            return Err(ReconError::Configuration("input file is required".into()));
        }
        if self.concurrency == 0 {
            return Err(ReconError::Configuration(
                "concurrency must be greater than 0".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ReconError::Configuration(
                "batch size must be greater than 0".into(),
            ));
        }
        if self.http_timeout.is_zero() || self.browser_timeout.is_zero() {
            return Err(ReconError::Configuration(
                "timeouts must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Parse raw `-H "Name: value"` arguments into header pairs.
///
/// An argument without a `:` separator is a fatal configuration error.
pub fn parse_header_args(args: &[String]) -> Result<Vec<(String, String)>, ReconError> {
    args.iter()
        .map(|raw| {
            let (name, value) = raw
                .split_once(':')
                .ok_or_else(|| ReconError::MalformedHeader(raw.clone()))?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Convert parsed header pairs into the map shared by every outgoing fetch.
pub fn build_header_map(pairs: &[(String, String)]) -> Result<HeaderMap, ReconError> {
    let mut map = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ReconError::InvalidHeader(name.clone(), e.to_string()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ReconError::InvalidHeader(name.clone(), e.to_string()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
