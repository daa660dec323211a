//! Website watchdog.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────── site-watchdog ────────────────────────────┐
//!   │                                                                       │
//!   │  ┌────────┐   ┌──────────┐   UP/DOWN   ┌──────────────┐               │
//!   │  │ config │──▶│  prober  │────────────▶│ monitor loop │──── sleep ───┐│
//!   │  └────────┘   │ (health) │             │  + backoff   │              ││
//!   │               └────▲─────┘             └──────┬───────┘              ││
//!   │                    │                          │ DOWN                 ││
//!   │                    │                          ▼                      ││
//!   │                    │                   ┌─────────────┐               ││
//!   │                    │                   │ remediation │               ││
//!   │                    │                   └─────────────┘               ││
//!   │                    └─────────────────── next cycle ◀─────────────────┘│
//!   └───────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;

use site_watchdog::config::Cli;
use site_watchdog::lifecycle::shutdown_signal;
use site_watchdog::observability::{logging, metrics};
use site_watchdog::{MonitorConfig, SiteMonitor};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    logging::init(&config.observability);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run(config));

    // A remediation may still be running on the blocking pool; it has no
    // timeout, so do not wait for it.
    runtime.shutdown_background();
    code
}

async fn run(config: MonitorConfig) -> ExitCode {
    tracing::info!(url = %config.target.url, "Starting website monitor");
    tracing::info!(
        executable = %config.remediation.executable.display(),
        "Will execute remediation when website is down"
    );
    tracing::info!(
        interval_secs = config.interval_secs,
        timeout_secs = config.target.timeout_secs,
        retries = config.target.retries,
        backoff_initial_secs = config.backoff.initial_secs,
        backoff_factor = config.backoff.factor,
        backoff_max_secs = config.backoff.max_secs,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        match addr.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(metrics_address = %addr, error = %e, "Failed to parse metrics address"),
        }
    }

    let monitor = match SiteMonitor::from_config(&config) {
        Ok(monitor) => monitor,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    tokio::select! {
        _ = monitor.run() => {}
        _ = shutdown_signal() => {}
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
