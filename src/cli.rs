//! Command-line surface and run wiring.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::info;

use crate::batcher::batches;
use crate::capture::{BrowserCapture, Screenshotter};
use crate::config::{build_header_map, parse_header_args, Config, Mode};
use crate::error::ReconError;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::loader::load_targets;
use crate::pipeline::{Coordinator, RunSummary};
use crate::report::{write_report, HtmlReportRenderer, ReportRenderer};

#[derive(Parser)]
#[command(name = "urlscope")]
#[command(about = "Bulk target reconnaissance: titles, screenshots, batched HTML reports")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, help = "Input file containing targets (one per line)")]
    pub input: PathBuf,

    #[arg(short, long, help = "Prefix for the output HTML reports")]
    pub output: Option<String>,

    #[arg(short, long, help = "Concurrency level")]
    pub concurrency: Option<usize>,

    #[arg(
        short = 'H',
        long = "header",
        value_name = "NAME: VALUE",
        help = "Custom request header, repeatable"
    )]
    pub header: Vec<String>,

    #[arg(short, long, value_enum, help = "Interpret targets as full URLs or bare subdomains")]
    pub mode: Option<Mode>,

    #[arg(long, help = "Configuration file path (JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "HTTP fetch timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Browser navigation timeout in seconds")]
    pub browser_timeout: Option<u64>,

    #[arg(long, help = "Directory screenshots are written into")]
    pub screenshot_dir: Option<PathBuf>,

    #[arg(long, help = "Chrome executable path")]
    pub chrome_path: Option<String>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}

/// Merge the optional config file with CLI overrides and validate the result.
pub async fn load_config(args: &Cli) -> Result<Config, ReconError> {
    let mut config = if let Some(path) = &args.config {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ReconError::Configuration(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| ReconError::Configuration(format!("{}: {e}", path.display())))?
    } else {
        Config::default()
    };

    config.input = args.input.clone();

    if let Some(output) = &args.output {
        config.output_prefix = Some(output.clone());
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(secs) = args.timeout {
        config.http_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = args.browser_timeout {
        config.browser_timeout = Duration::from_secs(secs);
    }
    if let Some(dir) = &args.screenshot_dir {
        config.screenshot_dir = dir.clone();
    }
    if let Some(path) = &args.chrome_path {
        config.chrome_path = Some(path.clone());
    }

    config.headers.extend(parse_header_args(&args.header)?);
    config.validate()?;

    Ok(config)
}

/// Owns the wired pipeline for one run: loader, batcher, coordinator, emitter.
pub struct Runner {
    config: Config,
    coordinator: Coordinator,
    renderer: Box<dyn ReportRenderer>,
}

impl Runner {
    pub fn new(config: Config) -> Result<Self, ReconError> {
        let header_map = build_header_map(&config.headers)?;

        let fetcher: Arc<dyn PageFetcher> =
            Arc::new(HttpFetcher::new(header_map, config.http_timeout)?);
        let capturer: Arc<dyn Screenshotter> = Arc::new(BrowserCapture::new(
            config.screenshot_dir.clone(),
            config.browser_timeout,
            config.chrome_path.clone(),
        ));

        let coordinator = Coordinator::new(fetcher, capturer, config.concurrency, config.mode);

        Ok(Self {
            config,
            coordinator,
            renderer: Box::new(HtmlReportRenderer),
        })
    }

    /// Process all batches sequentially, emitting one report per batch.
    ///
    /// A report-write failure aborts the run; reports already written stay on
    /// disk. Per-target failures only ever degrade their own row.
    pub async fn run(&self) -> Result<RunSummary, ReconError> {
        let targets = load_targets(&self.config.input).await?;
        info!(
            "loaded {} targets from {}",
            targets.len(),
            self.config.input.display()
        );

        let prefix = self.config.report_prefix();
        let mut summary = RunSummary::default();

        for batch in batches(&targets, self.config.batch_size) {
            let results = self.coordinator.process_batch(&batch).await;

            let path = PathBuf::from(format!("{}_{}.html", prefix, batch.ordinal));
            write_report(self.renderer.as_ref(), &results, &path).await?;

            summary.absorb(&results);
        }

        Ok(summary)
    }
}

pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
