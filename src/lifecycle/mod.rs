//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse flags → Load config → Validate → Init logging/metrics → Run loop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop polling the loop → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal before the loop starts
//! - No graceful drain; a running remediation is abandoned on exit

pub mod signals;

pub use signals::shutdown_signal;
