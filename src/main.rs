mod builder;
mod chain;
mod config;
mod confirmation;
mod contracts;
mod decoder;
mod error;
mod keystore;
mod metrics;
mod relayer;
mod scanner;
mod submitter;
mod types;

use config::Config;
use relayer::Relayer;
use types::Direction;

fn main() -> eyre::Result<()> {
    // Install color-eyre for better error reporting
    color_eyre::install()?;

    let direction = parse_direction_arg();

    // Run the async main
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(direction))
}

/// One positional argument selects the chain to watch. Each invocation
/// is a single pass; repeated runs come from an external scheduler.
fn parse_direction_arg() -> Direction {
    let arg = std::env::args().nth(1);
    match arg.as_deref().map(str::parse) {
        Some(Ok(direction)) => direction,
        Some(Err(reason)) => {
            eprintln!("{}", reason);
            eprintln!("Usage: wrapbridge-relayer [source|destination]");
            std::process::exit(2);
        }
        None => {
            eprintln!("Usage: wrapbridge-relayer [source|destination]");
            std::process::exit(2);
        }
    }
}

async fn async_main(direction: Direction) -> eyre::Result<()> {
    // Initialize logging
    init_logging();

    tracing::info!(direction = %direction, "Starting WrapBridge relayer pass");

    // Load configuration and the signing key
    let config = Config::load()?;
    tracing::info!(
        source_chain_id = config.source.chain_id,
        destination_chain_id = config.destination.chain_id,
        lookback_blocks = config.relayer.lookback_blocks,
        wait_for_confirmation = config.relayer.wait_for_confirmation,
        "Configuration loaded"
    );

    let signer = keystore::load_signing_key(&config.relayer.private_key_file)?;
    tracing::info!(account = %signer.address(), "Signing account loaded");

    let metrics_textfile = config.relayer.metrics_textfile.clone();

    // Run one relay pass
    let relayer = Relayer::new(config, signer);
    let result = relayer.run(direction).await;

    if let Some(path) = metrics_textfile {
        if let Err(e) = metrics::write_textfile(&path) {
            tracing::warn!(path = %path, error = %e, "Failed to write metrics textfile");
        }
    }

    let summary = result?;
    tracing::info!(
        events_found = summary.events_found,
        relayed = summary.relayed,
        unconfirmed = summary.unconfirmed,
        failed = summary.failed,
        malformed = summary.malformed,
        "Relay pass complete: {}",
        summary
    );

    if !summary.is_clean() {
        return Err(eyre::eyre!(
            "{} event(s) failed to relay, {} malformed",
            summary.failed,
            summary.malformed
        ));
    }

    Ok(())
}

/// Initialize tracing/logging with structured output
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wrapbridge_relayer=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}
