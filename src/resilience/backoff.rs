//! Multiplicative backoff with an upper bound.

use std::time::Duration;

use crate::config::BackoffConfig;

/// Growth rule for the delay between checks while failures persist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    initial: Duration,
    factor: f64,
    max: Duration,
}

impl BackoffPolicy {
    /// Create a policy. `factor` below 1.0 (or NaN) is raised to 1.0 and
    /// `initial` is capped at `max` so the delay can never shrink.
    pub fn new(initial: Duration, factor: f64, max: Duration) -> Self {
        let factor = if factor.is_finite() && factor >= 1.0 { factor } else { 1.0 };
        Self {
            initial: initial.min(max),
            factor,
            max,
        }
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Next delay after `current`: `min(current * factor, max)`, never below
    /// `initial`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        let grown = Duration::try_from_secs_f64(current.as_secs_f64() * self.factor)
            .unwrap_or(self.max);
        grown.min(self.max).max(self.initial)
    }
}

impl From<&BackoffConfig> for BackoffPolicy {
    fn from(config: &BackoffConfig) -> Self {
        Self::new(
            Duration::from_secs(config.initial_secs),
            config.factor,
            Duration::from_secs(config.max_secs),
        )
    }
}
