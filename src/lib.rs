//! Website watchdog library.
//!
//! Probes one HTTP endpoint, runs a local executable when it is down, and
//! backs off exponentially while the outage lasts.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod monitor;
pub mod observability;
pub mod remediation;
pub mod resilience;

pub use config::MonitorConfig;
pub use monitor::{Monitor, SiteMonitor};
