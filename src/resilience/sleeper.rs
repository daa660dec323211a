//! Injectable sleep.
//!
//! Every wait in the watchdog (the pause between probe attempts and the
//! pause between cycles) goes through a [`Sleeper`], so tests can observe
//! the schedule without waiting for it.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested durations and returns immediately.
///
/// Clones share the same log, so one handle can be given to the prober and
/// another to the monitor loop.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    log: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, oldest first.
    pub fn recorded(&self) -> Vec<Duration> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut log) = self.log.lock() {
            log.push(duration);
        }
    }
}
