//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (retries >= 1, factor >= 1, initial <= max)
//! - Check that the remediation executable exists and can be launched
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before the monitor loop starts; any error is fatal

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::config::schema::MonitorConfig;

/// A single violated configuration rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("target URL is required")]
    MissingUrl,

    #[error("target URL '{url}' is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("target URL scheme '{0}' is not supported (expected http or https)")]
    UnsupportedScheme(String),

    #[error("retries must be at least 1")]
    ZeroRetries,

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("check interval must be greater than zero")]
    ZeroInterval,

    #[error("backoff factor must be a finite number >= 1.0, got {0}")]
    InvalidFactor(f64),

    #[error("initial backoff delay must be greater than zero")]
    ZeroInitialDelay,

    #[error("initial backoff delay ({initial}s) exceeds maximum delay ({max}s)")]
    InitialExceedsMax { initial: u64, max: u64 },

    #[error("remediation executable path is required")]
    MissingExecutable,

    #[error("cannot access remediation executable {}: {reason}", path.display())]
    InaccessibleExecutable { path: PathBuf, reason: String },

    #[error("remediation executable {} is not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("remediation executable {} is not executable", .0.display())]
    NotExecutable(PathBuf),

    #[error("metrics address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("log level '{0}' is not one of off, error, warn, info, debug, trace")]
    InvalidLogLevel(String),
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_url(&config.target.url, &mut errors);

    if config.target.retries == 0 {
        errors.push(ValidationError::ZeroRetries);
    }
    if config.target.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    let backoff = &config.backoff;
    if !backoff.factor.is_finite() || backoff.factor < 1.0 {
        errors.push(ValidationError::InvalidFactor(backoff.factor));
    }
    if backoff.initial_secs == 0 {
        errors.push(ValidationError::ZeroInitialDelay);
    }
    if backoff.initial_secs > backoff.max_secs {
        errors.push(ValidationError::InitialExceedsMax {
            initial: backoff.initial_secs,
            max: backoff.max_secs,
        });
    }

    validate_executable(&config.remediation.executable, &mut errors);

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    let log_level = &config.observability.log_level;
    if log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_url(raw: &str, errors: &mut Vec<ValidationError>) {
    if raw.trim().is_empty() {
        errors.push(ValidationError::MissingUrl);
        return;
    }

    match Url::parse(raw) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn validate_executable(path: &Path, errors: &mut Vec<ValidationError>) {
    if path.as_os_str().is_empty() {
        errors.push(ValidationError::MissingExecutable);
        return;
    }

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            errors.push(ValidationError::InaccessibleExecutable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };

    if !metadata.is_file() {
        errors.push(ValidationError::NotAFile(path.to_path_buf()));
        return;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            errors.push(ValidationError::NotExecutable(path.to_path_buf()));
        }
    }
}
