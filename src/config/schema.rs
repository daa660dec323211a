//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the watchdog.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the watchdog.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Target to probe and the per-cycle retry policy.
    pub target: TargetConfig,

    /// Base check interval in seconds (used while the target is up and
    /// after the first failure).
    pub interval_secs: u64,

    /// Backoff schedule applied while failures persist.
    pub backoff: BackoffConfig,

    /// Executable launched when the target is down.
    pub remediation: RemediationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            interval_secs: 60,
            backoff: BackoffConfig::default(),
            remediation: RemediationConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Base check interval.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Target configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TargetConfig {
    /// URL probed with HTTP GET.
    pub url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Attempts per cycle before the target is considered down.
    pub retries: u32,

    /// Pause between failed attempts within one cycle, in seconds.
    pub retry_delay_secs: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 10,
            retries: 3,
            retry_delay_secs: 2,
        }
    }
}

impl TargetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Exponential backoff configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackoffConfig {
    /// Starting delay in seconds.
    pub initial_secs: u64,

    /// Multiplier applied on each consecutive failure past the first.
    pub factor: f64,

    /// Upper bound on the delay in seconds.
    pub max_secs: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_secs: 60,
            factor: 2.0,
            max_secs: 3600,
        }
    }
}

/// Remediation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RemediationConfig {
    /// Path to the executable (run with no arguments).
    pub executable: PathBuf,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log every attempt failure and every UP confirmation.
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus exporter bind address; disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
