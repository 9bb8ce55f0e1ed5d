mod cli;
mod serial;

use anyhow::{Context, Result, anyhow};
use bootmon_lib::{LinkConfig, Monitor, MonitorSummary, SerialLink};
use clap::Parser;
use cli::Cli;
use std::process;
use std::sync::atomic::Ordering;

/// Conventional exit status for a run ended by SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

fn run(args: &Cli) -> Result<MonitorSummary> {
    let port_path = args.port_path();
    let monitor = Monitor::default();

    let stop = monitor.stop_flag();
    ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
        .context("Failed to set Ctrl+C handler")?;

    let link = SerialLink::open(LinkConfig::new(&port_path))
        .map_err(|e| anyhow!("{}. {}", e, serial::available_ports_hint()))?;

    let mut stdout = std::io::stdout().lock();
    monitor
        .run(link, &mut stdout)
        .with_context(|| format!("Monitoring {} failed", port_path))
}

fn main() {
    // Log level can be controlled by setting the RUST_LOG environment variable, e.g.:
    // RUST_LOG=debug, RUST_LOG=bootmon_lib=trace, RUST_LOG=info
    // Diagnostics go to stderr, stdout carries only device output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match run(&args) {
        Ok(summary) if summary.interrupted => process::exit(EXIT_INTERRUPTED),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
