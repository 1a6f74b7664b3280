//! `netpulse`: terminal network monitor.
//!
//! Built on [ratatui](https://ratatui.rs) with state from
//! `netpulse-core`'s [`Monitor`](netpulse_core::Monitor): download/upload
//! throughput, latency, network type, IP address and the Wi-Fi link of the
//! active interface, refreshed every interval or on demand with `r`.
//!
//! Logs are written to a file (default `/tmp/netpulse.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Live network statistics in your terminal.
#[derive(Parser, Debug)]
#[command(name = "netpulse", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long, env = "NETPULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Log file path (defaults to /tmp/netpulse.log)
    #[arg(long, default_value = "/tmp/netpulse.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr; that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("netpulse={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("netpulse.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ratatui chains its terminal-restoring panic hook onto this one
    color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .install()?;

    let config = netpulse_config::load_config(cli.config.as_deref())?;
    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }
    let monitor_config = config.to_monitor_config()?;

    // Tracing to file: hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(
        interval_ms = monitor_config.interval.as_millis(),
        target = %monitor_config.probe_target,
        "starting netpulse"
    );

    let mut app = App::new(monitor_config);
    app.run().await?;

    Ok(())
}
