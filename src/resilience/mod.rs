//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Probe attempt fails:
//!     → sleeper.rs (fixed pause before the next attempt)
//!
//! Cycle ends DOWN:
//!     → backoff.rs (grow the delay before the next cycle, capped)
//!     → sleeper.rs (wait it out)
//! ```
//!
//! # Design Decisions
//! - The inter-attempt pause and the inter-cycle backoff are separate tunables
//! - Backoff is deterministic (no jitter)
//! - All waiting goes through the `Sleeper` trait

pub mod backoff;
pub mod sleeper;

pub use backoff::BackoffPolicy;
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
