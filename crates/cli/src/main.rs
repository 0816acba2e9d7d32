mod config;
mod session;

use std::process::ExitCode;

use crypto_tracker_core::CryptoTracker;
use session::{display_path, Session};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Keep the prompt readable unless RUST_LOG asks for more.
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Config first: it loads .env, which may set RUST_LOG.
    let config = config::from_env();
    init_tracing();

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            eprintln!("Invalid configuration: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    println!("Reading from {}", display_path(&config.portfolio_path));
    let mut tracker = match CryptoTracker::load(config) {
        Ok(tracker) => tracker,
        Err(err) => {
            error!(error = %err, "cannot start");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    info!(source = tracker.source_name(), holdings = tracker.holdings().len(), "crypto-tracker starting");

    let stdout = std::io::stdout();
    let mut session = Session::new(&mut tracker, stdout.lock());

    if let Err(err) = session.refresh().await {
        eprintln!("{err}");
    }

    let stdin = std::io::stdin();
    if let Err(err) = session.run(stdin.lock()).await {
        error!(error = %err, "terminal I/O failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
