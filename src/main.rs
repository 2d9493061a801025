use clap::Parser;
use tokio::signal;
use tracing::info;
use urlscope::{load_config, setup_logging, Cli, Runner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    setup_logging(args.verbose);
    info!("Starting urlscope v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args).await?;
    info!(
        "mode: {:?}, concurrency: {}, batch size: {}",
        config.mode, config.concurrency, config.batch_size
    );

    let runner = Runner::new(config)?;

    tokio::select! {
        result = runner.run() => {
            let summary = result?;
            info!(
                "run complete: {} targets, {} fetched, {} captured, {} failed, {} reports",
                summary.targets, summary.fetched, summary.captured, summary.failed, summary.reports
            );
        }
        _ = signal::ctrl_c() => {
            info!("received interrupt, stopping run");
        }
    }

    Ok(())
}
