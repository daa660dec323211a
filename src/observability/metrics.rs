//! Metrics collection and exposition.
//!
//! # Metrics
//! - `watchdog_probe_attempts_total` (counter): HTTP attempts by `result`
//! - `watchdog_cycles_total` (counter): monitoring cycles by `outcome`
//! - `watchdog_remediations_total` (counter): remediation runs by `result`
//! - `watchdog_consecutive_failures` (gauge): current DOWN streak
//! - `watchdog_next_check_seconds` (gauge): sleep before the next cycle
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! [`init_metrics`] installs the Prometheus exporter.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe_attempt(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("watchdog_probe_attempts_total", "result" => result).increment(1);
}

pub fn record_cycle(up: bool) {
    let outcome = if up { "up" } else { "down" };
    counter!("watchdog_cycles_total", "outcome" => outcome).increment(1);
}

/// `result` is one of `completed`, `nonzero_exit` or `launch_failed`.
pub fn record_remediation(result: &'static str) {
    counter!("watchdog_remediations_total", "result" => result).increment(1);
}

pub fn record_schedule(consecutive_failures: u32, next_check: Duration) {
    gauge!("watchdog_consecutive_failures").set(f64::from(consecutive_failures));
    gauge!("watchdog_next_check_seconds").set(next_check.as_secs_f64());
}
