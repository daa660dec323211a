//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Pick the default level from configuration
//!
//! # Design Decisions
//! - `RUST_LOG` always wins over configuration
//! - Verbose mode raises the crate's default level to `debug`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    let level = if config.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    format!("site_watchdog={}", level)
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        let mut config = ObservabilityConfig::default();
        assert_eq!(default_directive(&config), "site_watchdog=info");

        config.log_level = "warn".into();
        assert_eq!(default_directive(&config), "site_watchdog=warn");

        config.verbose = true;
        assert_eq!(default_directive(&config), "site_watchdog=debug");
    }
}
