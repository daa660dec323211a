//! Command-line interface.
//!
//! Flags override values read from the optional `--config` file, which in
//! turn override the built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::MonitorConfig;
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "site-watchdog")]
#[command(
    about = "Probe a website and run a remediation executable when it goes down",
    long_about = None
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// URL to monitor
    #[arg(long)]
    pub url: Option<String>,

    /// Executable to run when the website is down
    #[arg(long, visible_alias = "remediation")]
    pub elf: Option<PathBuf>,

    /// Check interval in seconds [default: 60]
    #[arg(long)]
    pub interval: Option<u64>,

    /// HTTP request timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Attempts per check before the site is considered down [default: 3]
    #[arg(long)]
    pub retries: Option<u32>,

    /// Pause between failed attempts in seconds [default: 2]
    #[arg(long)]
    pub retry_delay: Option<u64>,

    /// Initial backoff delay in seconds [default: 60]
    #[arg(long)]
    pub backoff_initial: Option<u64>,

    /// Backoff multiplier [default: 2.0]
    #[arg(long)]
    pub backoff_factor: Option<f64>,

    /// Maximum backoff delay in seconds [default: 3600]
    #[arg(long)]
    pub backoff_max: Option<u64>,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9090)
    #[arg(long)]
    pub metrics_address: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the final configuration and validate it.
    pub fn into_config(self) -> Result<MonitorConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => MonitorConfig::default(),
        };

        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(self, config: &mut MonitorConfig) {
        if let Some(url) = self.url {
            config.target.url = url;
        }
        if let Some(elf) = self.elf {
            config.remediation.executable = elf;
        }
        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        if let Some(timeout) = self.timeout {
            config.target.timeout_secs = timeout;
        }
        if let Some(retries) = self.retries {
            config.target.retries = retries;
        }
        if let Some(delay) = self.retry_delay {
            config.target.retry_delay_secs = delay;
        }
        if let Some(initial) = self.backoff_initial {
            config.backoff.initial_secs = initial;
        }
        if let Some(factor) = self.backoff_factor {
            config.backoff.factor = factor;
        }
        if let Some(max) = self.backoff_max {
            config.backoff.max_secs = max;
        }
        if let Some(addr) = self.metrics_address {
            config.observability.metrics_address = Some(addr);
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if self.verbose {
            config.observability.verbose = true;
        }
    }
}
