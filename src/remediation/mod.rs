//! Remediation subsystem.
//!
//! # Responsibilities
//! - Launch the configured executable when a cycle ends DOWN
//! - Capture its combined output and exit status
//!
//! # Design Decisions
//! - Success means "launched and ran to completion"; the exit code is
//!   reported but never feeds back into backoff
//! - No timeout on the child process
//! - Blocking process I/O runs on Tokio's blocking pool

pub mod executable;

pub use executable::{ExecutableRemediation, Remediation, RemediationError, RemediationReport};
