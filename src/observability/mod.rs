//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probe attempts, cycle outcomes, remediation runs, backoff changes:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
