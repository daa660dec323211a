//! Active probing of the monitored website.
//!
//! # Responsibilities
//! - Issue HTTP GET attempts against the target, each bounded by a timeout
//! - Classify one cycle as UP or DOWN using the retry policy

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::observability::metrics;
use crate::resilience::Sleeper;

/// Classification of one monitoring cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Up,
    Down,
}

impl ProbeOutcome {
    pub fn is_up(self) -> bool {
        self == ProbeOutcome::Up
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Up => write!(f, "UP"),
            ProbeOutcome::Down => write!(f, "DOWN"),
        }
    }
}

/// Why a single attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("bad status code: {0}")]
    BadStatus(u16),
}

/// Statuses in [200, 400) count as the site being up.
pub fn is_up_status(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Something that can be asked for a status code once.
///
/// Only transport failures are errors here; status classification happens
/// in [`Prober`].
pub trait Target {
    fn url(&self) -> &str;

    fn fetch_status(&self) -> impl Future<Output = Result<u16, ProbeError>> + Send;
}

/// Plain HTTP GET via `reqwest`. No custom headers, body or auth.
#[derive(Debug, Clone)]
pub struct HttpTarget {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpTarget {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url, timeout))
    }

    /// Use a preconfigured client. `timeout` should match the client's own
    /// timeout; it is only used to report [`ProbeError::Timeout`].
    pub fn with_client(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

impl Target for HttpTarget {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_status(&self) -> Result<u16, ProbeError> {
        match self.client.get(&self.url).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) if e.is_timeout() => Err(ProbeError::Timeout(self.timeout)),
            Err(e) if e.is_connect() => Err(ProbeError::Connect(error_chain(&e))),
            Err(e) => Err(ProbeError::Request(error_chain(&e))),
        }
    }
}

// reqwest's top-level message hides the cause (DNS, refused, ...).
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Applies the per-cycle retry policy to a [`Target`].
#[derive(Debug, Clone)]
pub struct Prober<T, S> {
    target: T,
    sleeper: S,
    max_attempts: u32,
    retry_delay: Duration,
    verbose: bool,
}

impl<T: Target, S: Sleeper> Prober<T, S> {
    /// `max_attempts` of zero is treated as one.
    pub fn new(target: T, sleeper: S, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            target,
            sleeper,
            max_attempts: max_attempts.max(1),
            retry_delay,
            verbose: false,
        }
    }

    /// Log every failed attempt.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// UP on the first successful attempt, DOWN once every attempt failed.
    pub async fn probe(&self) -> ProbeOutcome {
        for attempt in 1..=self.max_attempts {
            match self.attempt().await {
                Ok(status) => {
                    metrics::record_probe_attempt(true);
                    tracing::debug!(
                        url = %self.target.url(),
                        attempt,
                        status,
                        "Probe attempt succeeded"
                    );
                    return ProbeOutcome::Up;
                }
                Err(e) => {
                    metrics::record_probe_attempt(false);
                    if self.verbose {
                        tracing::warn!(
                            url = %self.target.url(),
                            attempt,
                            max_attempts = self.max_attempts,
                            error = %e,
                            "Probe attempt failed"
                        );
                    }
                    if attempt < self.max_attempts {
                        self.sleeper.sleep(self.retry_delay).await;
                    }
                }
            }
        }

        ProbeOutcome::Down
    }

    async fn attempt(&self) -> Result<u16, ProbeError> {
        let status = self.target.fetch_status().await?;
        if is_up_status(status) {
            Ok(status)
        } else {
            Err(ProbeError::BadStatus(status))
        }
    }
}
