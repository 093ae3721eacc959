//! Antenna TUI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Join a room on a local backend
//! antenna-tui --url 'http://localhost:3000/?room=general'
//!
//! # Single-room deployment over TLS, logging to a file
//! antenna-tui --url https://chat.example.org/ --mode global --log-file antenna.log
//! ```

use std::{fs::File, io, sync::Mutex};

use antenna_client::{SystemEnv, transport::WsEngine};
use antenna_tui::{Args, Runtime, TerminalDriver};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let location = args.location()?;
    let config = args.chat_config(&location);

    tracing::info!(url = %location.url(), deployment = ?config.deployment, "Antenna TUI starting");

    let engine = WsEngine::new(args.engine_config());
    let driver = TerminalDriver::new()?;
    let mut runtime = Runtime::new(engine, driver, SystemEnv::new(), location, config);

    runtime.run().await?;

    tracing::info!("Antenna TUI stopped");
    Ok(())
}

/// Install the file logger. The terminal belongs to the UI, so without
/// `--log-file` nothing is logged.
fn init_logging(args: &Args) -> io::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();

    Ok(())
}
