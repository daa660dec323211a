//! Backoff state machine.
//!
//! # States
//! - Nominal: no failures since the last UP; checks run at the base interval
//! - Degraded: at least one consecutive DOWN
//!
//! # State Transitions
//! ```text
//! any     --UP-->   Nominal  (failures = 0, delay = initial, sleep = interval)
//! Nominal --DOWN--> Degraded (failures = 1, sleep = interval)
//! Degraded --DOWN--> Degraded (failures += 1, delay = min(delay * factor, max), sleep = delay)
//! ```
//!
//! The machine performs no I/O; the monitor loop feeds it outcomes and
//! sleeps for whatever it returns.

use std::time::Duration;

use crate::health::probe::ProbeOutcome;
use crate::resilience::BackoffPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Nominal,
    Degraded,
}

/// Result of feeding one outcome into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    /// How long to wait before the next cycle.
    pub sleep: Duration,
    /// True when the backoff delay was used instead of the base interval.
    pub backing_off: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffState {
    consecutive_failures: u32,
    current_delay: Duration,
}

impl BackoffState {
    pub fn new(policy: &BackoffPolicy) -> Self {
        Self {
            consecutive_failures: 0,
            current_delay: policy.initial(),
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn current_delay(&self) -> Duration {
        self.current_delay
    }

    pub fn phase(&self) -> Phase {
        if self.consecutive_failures == 0 {
            Phase::Nominal
        } else {
            Phase::Degraded
        }
    }

    /// Apply one cycle's outcome and return the sleep before the next cycle.
    pub fn record(
        &mut self,
        outcome: ProbeOutcome,
        policy: &BackoffPolicy,
        interval: Duration,
    ) -> Transition {
        let from = self.phase();

        let (sleep, backing_off) = match outcome {
            ProbeOutcome::Up => {
                self.reset(policy);
                (interval, false)
            }
            ProbeOutcome::Down => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures == 1 {
                    (interval, false)
                } else {
                    self.current_delay = policy.next_delay(self.current_delay);
                    (self.current_delay, true)
                }
            }
        };

        Transition {
            from,
            to: self.phase(),
            sleep,
            backing_off,
        }
    }

    pub fn reset(&mut self, policy: &BackoffPolicy) {
        self.consecutive_failures = 0;
        self.current_delay = policy.initial();
    }
}
