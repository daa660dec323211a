//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active probing (probe.rs):
//!     HTTP GET attempts with a fixed pause between them
//!     → UP on first status in [200, 400)
//!     → DOWN when every attempt failed
//!
//! State machine (state.rs):
//!     Nominal ←→ Degraded
//!     Consecutive DOWNs grow the delay; any UP resets it
//! ```
//!
//! # Design Decisions
//! - Transport errors and bad statuses are treated alike
//! - The state machine is pure; all waiting happens in the monitor loop

pub mod probe;
pub mod state;

pub use probe::{HttpTarget, ProbeError, ProbeOutcome, Prober, Target};
pub use state::{BackoffState, Phase, Transition};
