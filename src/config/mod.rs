//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line (cli.rs)
//!     → optional TOML file (loader.rs)
//!     → flag overrides
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//!     → passed by reference to the monitor loop
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, ConfigError};
pub use schema::{
    BackoffConfig, MonitorConfig, ObservabilityConfig, RemediationConfig, TargetConfig,
};
pub use validation::ValidationError;
