mod args;

use std::process;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flacsweep_core::{validate_config, FfmpegTools, RunSummary, TreeProcessor};

use args::Cli;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            // Usage errors share the exit code of every other failure.
            let _ = e.print();
            process::exit(1);
        }
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if !cli.dir.is_dir() {
        error!(path = %cli.dir.display(), "Invalid folder path");
        eprintln!("{}", Cli::command().render_usage());
        process::exit(1);
    }

    match run(&cli).await {
        Ok(summary) => {
            if let Err(e) = print_summary(&summary, cli.json) {
                error!("Fatal error: {:#}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Fatal error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<RunSummary> {
    let config = cli.to_config();
    validate_config(&config).context("Invalid options")?;

    info!(
        ffmpeg = %config.converter.ffmpeg_path.display(),
        ffprobe = %config.converter.ffprobe_path.display(),
        "Using external tools"
    );

    let tools = FfmpegTools::new(config.converter.clone());
    let processor = TreeProcessor::new(config.processor.clone(), tools);

    processor
        .run(&cli.dir)
        .await
        .with_context(|| format!("Sweep of {} aborted", cli.dir.display()))
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
        println!("{}", rendered);
    } else {
        println!("Summary: {}", summary);
    }
    Ok(())
}
