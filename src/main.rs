//! cf-whitelist CLI - whitelist a file of IP addresses in a Cloudflare zone.
//!
//! Run `cf-whitelist --help` for usage information.

use anyhow::Result;
use cf_whitelist::{Args, Config, EXIT_FAILURE, Processor, Prompt, WhitelistError, ask};
use console::style;
use indicatif::ProgressBar;
use std::time::Duration;
use tracing::{Level, debug, error};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = Args::parse_args();

    // Setup logging
    setup_logging(&args);
    debug!(version = cf_whitelist::VERSION, "Starting cf-whitelist");

    // Missing credentials are fatal before any network call
    let config = match Config::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = run(&args, &config).await {
        error!(error = %e, "Whitelist run failed");
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        let code = e
            .downcast_ref::<WhitelistError>()
            .map_or(EXIT_FAILURE, WhitelistError::exit_code);
        std::process::exit(code);
    }

    std::process::exit(0);
}

async fn run(args: &Args, config: &Config) -> Result<()> {
    let processor = Processor::new(config)?;
    let prompt = Prompt::stdio();

    let (prompt, zone) = match &args.zone {
        Some(zone) => (prompt, zone.clone()),
        None => {
            let choices =
                with_spinner("Fetching zones...", !args.json_logs, processor.zone_choices()).await?;
            let (prompt, choice) = ask(prompt, move |p| p.select_zone(&choices)).await?;
            (prompt, choice.value)
        }
    };

    let notes = match &args.notes {
        Some(notes) => notes.clone(),
        None => ask(prompt, |p| p.notes()).await?.1,
    };

    let result = processor
        .process_file(&zone, Some(&notes), &config.input)
        .await?;

    if !args.json_logs {
        result.print_summary();
    }

    Ok(())
}

async fn with_spinner<F, T>(message: &'static str, visible: bool, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let spinner = if visible {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    spinner.finish_and_clear();
    output
}

fn setup_logging(args: &Args) {
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cf_whitelist={level}")));

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .compact(),
            )
            .init();
    }
}
