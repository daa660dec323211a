//! Monitor loop.
//!
//! # Data Flow
//! ```text
//! loop:
//!     Prober → ProbeOutcome
//!     DOWN → Remediation (side effect only)
//!     BackoffState::record → sleep duration
//!     Sleeper → wait
//! ```
//!
//! One cycle runs strictly in sequence. Nothing inside a cycle can end the
//! loop; it stops only when the process does.

use std::time::Duration;

use crate::config::MonitorConfig;
use crate::health::{BackoffState, HttpTarget, Phase, ProbeOutcome, Prober, Target, Transition};
use crate::observability::metrics;
use crate::remediation::{ExecutableRemediation, Remediation, RemediationReport};
use crate::resilience::{BackoffPolicy, Sleeper, TokioSleeper};

/// Summary of one completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub outcome: ProbeOutcome,
    pub transition: Transition,
    /// True when the remediation was attempted (whether or not it launched).
    pub remediated: bool,
}

/// Watchdog for a single target.
pub struct Monitor<T, R, S> {
    prober: Prober<T, S>,
    remediation: R,
    sleeper: S,
    policy: BackoffPolicy,
    interval: Duration,
    verbose: bool,
    state: BackoffState,
}

/// The production wiring: HTTP target, executable remediation, Tokio timer.
pub type SiteMonitor = Monitor<HttpTarget, ExecutableRemediation, TokioSleeper>;

impl SiteMonitor {
    pub fn from_config(config: &MonitorConfig) -> Result<Self, reqwest::Error> {
        let target = HttpTarget::new(config.target.url.clone(), config.target.timeout())?;
        let prober = Prober::new(
            target,
            TokioSleeper,
            config.target.retries,
            config.target.retry_delay(),
        )
        .verbose(config.observability.verbose);

        Ok(Monitor::new(
            prober,
            ExecutableRemediation::new(&config.remediation.executable),
            TokioSleeper,
            BackoffPolicy::from(&config.backoff),
            config.interval(),
        )
        .verbose(config.observability.verbose))
    }
}

impl<T, R, S> Monitor<T, R, S>
where
    T: Target,
    R: Remediation,
    S: Sleeper,
{
    pub fn new(
        prober: Prober<T, S>,
        remediation: R,
        sleeper: S,
        policy: BackoffPolicy,
        interval: Duration,
    ) -> Self {
        Self {
            state: BackoffState::new(&policy),
            prober,
            remediation,
            sleeper,
            policy,
            interval,
            verbose: false,
        }
    }

    /// Log UP confirmations on every cycle.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn state(&self) -> &BackoffState {
        &self.state
    }

    /// Run cycles until the process is terminated.
    pub async fn run(mut self) {
        tracing::info!(
            url = %self.prober.target().url(),
            interval_secs = self.interval.as_secs(),
            max_attempts = self.prober.max_attempts(),
            "Monitor loop starting"
        );

        loop {
            self.run_cycle().await;
        }
    }

    /// Probe once, react, and sleep until the next cycle is due.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let outcome = self.prober.probe().await;
        metrics::record_cycle(outcome.is_up());

        let remediated = match outcome {
            ProbeOutcome::Up => {
                if self.verbose {
                    tracing::info!(url = %self.prober.target().url(), "Website is UP");
                }
                false
            }
            ProbeOutcome::Down => {
                tracing::warn!(
                    url = %self.prober.target().url(),
                    attempts = self.prober.max_attempts(),
                    "Website is DOWN, executing remediation"
                );
                self.remediate().await;
                true
            }
        };

        let failures_before = self.state.consecutive_failures();
        let transition = self.state.record(outcome, &self.policy, self.interval);
        self.log_transition(&transition, failures_before);
        metrics::record_schedule(self.state.consecutive_failures(), transition.sleep);

        self.sleeper.sleep(transition.sleep).await;

        CycleReport {
            outcome,
            transition,
            remediated,
        }
    }

    async fn remediate(&self) {
        match self.remediation.invoke().await {
            Ok(report) => log_report(&report),
            Err(e) => {
                metrics::record_remediation("launch_failed");
                tracing::error!(error = %e, "Failed to execute remediation");
            }
        }
    }

    fn log_transition(&self, transition: &Transition, failures_before: u32) {
        match (transition.from, transition.to) {
            (Phase::Degraded, Phase::Nominal) => {
                tracing::info!(
                    url = %self.prober.target().url(),
                    consecutive_failures = failures_before,
                    "Website recovered, backoff reset"
                );
            }
            (_, Phase::Degraded) if transition.backing_off => {
                tracing::warn!(
                    consecutive_failures = self.state.consecutive_failures(),
                    delay_secs = transition.sleep.as_secs_f64(),
                    max_delay_secs = self.policy.max().as_secs(),
                    "Backing off before next check"
                );
            }
            (_, Phase::Degraded) => {
                tracing::info!(
                    consecutive_failures = self.state.consecutive_failures(),
                    next_check_secs = transition.sleep.as_secs(),
                    "First failure, next check at base interval"
                );
            }
            (_, Phase::Nominal) => {
                tracing::debug!(next_check_secs = transition.sleep.as_secs(), "Next check scheduled");
            }
        }
    }
}

fn log_report(report: &RemediationReport) {
    let elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX);
    if report.success() {
        metrics::record_remediation("completed");
        tracing::info!(elapsed_ms, output = %report.output.trim_end(), "Remediation completed");
    } else {
        metrics::record_remediation("nonzero_exit");
        tracing::warn!(
            exit_code = ?report.exit_code(),
            elapsed_ms,
            output = %report.output.trim_end(),
            "Remediation exited with non-zero status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::ProbeError;
    use crate::remediation::RemediationError;
    use crate::resilience::RecordingSleeper;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// Each entry is one attempt; exhausted scripts keep answering 200.
    #[derive(Clone, Default)]
    struct ScriptedTarget {
        responses: Arc<Mutex<VecDeque<Result<u16, ProbeError>>>>,
    }

    impl ScriptedTarget {
        fn push(&self, response: Result<u16, ProbeError>) {
            self.responses.lock().unwrap().push_back(response);
        }
    }

    impl Target for ScriptedTarget {
        fn url(&self) -> &str {
            "http://scripted.test/"
        }

        async fn fetch_status(&self) -> Result<u16, ProbeError> {
            self.responses.lock().unwrap().pop_front().unwrap_or(Ok(200))
        }
    }

    #[derive(Clone, Default)]
    struct CountingRemediation {
        calls: Arc<AtomicU32>,
        fail_launch: bool,
    }

    impl CountingRemediation {
        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Remediation for CountingRemediation {
        async fn invoke(&self) -> Result<RemediationReport, RemediationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_launch {
                return Err(RemediationError::Launch {
                    path: "/missing".into(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            Ok(RemediationReport {
                output: String::new(),
                status: exit_status(0),
                elapsed: Duration::ZERO,
            })
        }
    }

    #[cfg(unix)]
    fn exit_status(code: i32) -> std::process::ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[cfg(windows)]
    fn exit_status(code: i32) -> std::process::ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code as u32)
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    struct Harness {
        monitor: Monitor<ScriptedTarget, CountingRemediation, RecordingSleeper>,
        target: ScriptedTarget,
        remediation: CountingRemediation,
        sleeper: RecordingSleeper,
    }

    fn harness(retries: u32, remediation: CountingRemediation) -> Harness {
        harness_with_verbosity(retries, remediation, true)
    }

    fn harness_with_verbosity(
        retries: u32,
        remediation: CountingRemediation,
        verbose: bool,
    ) -> Harness {
        let target = ScriptedTarget::default();
        let sleeper = RecordingSleeper::new();
        let prober =
            Prober::new(target.clone(), sleeper.clone(), retries, secs(2)).verbose(verbose);
        let monitor = Monitor::new(
            prober,
            remediation.clone(),
            sleeper.clone(),
            BackoffPolicy::new(secs(60), 2.0, secs(300)),
            secs(60),
        )
        .verbose(verbose);

        Harness {
            monitor,
            target,
            remediation,
            sleeper,
        }
    }

    fn timeout() -> Result<u16, ProbeError> {
        Err(ProbeError::Timeout(secs(10)))
    }

    #[tokio::test]
    async fn test_recovers_within_cycle_without_remediation() {
        let mut h = harness(3, CountingRemediation::default());
        h.target.push(Err(ProbeError::Connect("refused".into())));
        h.target.push(Ok(503));
        h.target.push(Ok(200));

        let report = h.monitor.run_cycle().await;

        assert_eq!(report.outcome, ProbeOutcome::Up);
        assert!(!report.remediated);
        assert_eq!(h.remediation.calls(), 0);
        assert_eq!(h.sleeper.recorded(), vec![secs(2), secs(2), secs(60)]);
    }

    #[tokio::test]
    async fn test_down_runs_remediation_once() {
        let mut h = harness(2, CountingRemediation::default());
        h.target.push(timeout());
        h.target.push(timeout());

        let report = h.monitor.run_cycle().await;

        assert_eq!(report.outcome, ProbeOutcome::Down);
        assert!(report.remediated);
        assert_eq!(h.remediation.calls(), 1);
        assert_eq!(h.monitor.state().consecutive_failures(), 1);
        assert_eq!(h.sleeper.recorded(), vec![secs(2), secs(60)]);
    }

    #[tokio::test]
    async fn test_escalating_backoff_then_reset() {
        let mut h = harness(1, CountingRemediation::default());
        for _ in 0..4 {
            h.target.push(timeout());
        }

        let mut sleeps = Vec::new();
        for _ in 0..4 {
            sleeps.push(h.monitor.run_cycle().await.transition.sleep);
        }
        assert_eq!(sleeps, vec![secs(60), secs(120), secs(240), secs(300)]);
        assert_eq!(h.remediation.calls(), 4);
        assert_eq!(h.monitor.state().current_delay(), secs(300));

        // Script exhausted: next cycle is UP.
        let report = h.monitor.run_cycle().await;
        assert_eq!(report.outcome, ProbeOutcome::Up);
        assert_eq!(report.transition.from, Phase::Degraded);
        assert_eq!(report.transition.sleep, secs(60));
        assert_eq!(h.monitor.state().consecutive_failures(), 0);
        assert_eq!(h.monitor.state().current_delay(), secs(60));
        assert_eq!(h.remediation.calls(), 4);

        assert_eq!(
            h.sleeper.recorded(),
            vec![secs(60), secs(120), secs(240), secs(300), secs(60)]
        );
    }

    #[tokio::test]
    async fn test_launch_failure_does_not_change_backoff() {
        let remediation = CountingRemediation {
            fail_launch: true,
            ..Default::default()
        };
        let mut h = harness(1, remediation);
        h.target.push(timeout());
        h.target.push(Ok(500));

        assert_eq!(h.monitor.run_cycle().await.transition.sleep, secs(60));
        assert_eq!(h.monitor.run_cycle().await.transition.sleep, secs(120));
        assert_eq!(h.remediation.calls(), 2);
        assert_eq!(h.monitor.state().consecutive_failures(), 2);
    }

    mod log_events {
        use super::*;
        use std::fmt;
        use tracing::field::{Field, Visit};
        use tracing::{Event, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        /// Collects the message of every event emitted while installed.
        #[derive(Clone, Default)]
        struct CaptureLayer {
            messages: Arc<Mutex<Vec<String>>>,
        }

        impl CaptureLayer {
            fn messages(&self) -> Vec<String> {
                self.messages.lock().unwrap().clone()
            }

            fn contains(&self, needle: &str) -> bool {
                self.messages().iter().any(|m| m.contains(needle))
            }
        }

        struct MessageVisitor(String);

        impl Visit for MessageVisitor {
            fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                if field.name() == "message" {
                    self.0 = format!("{:?}", value);
                }
            }
        }

        impl<S: Subscriber> Layer<S> for CaptureLayer {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                let mut visitor = MessageVisitor(String::new());
                event.record(&mut visitor);
                self.messages.lock().unwrap().push(visitor.0);
            }
        }

        fn capture() -> (CaptureLayer, tracing::subscriber::DefaultGuard) {
            let layer = CaptureLayer::default();
            let subscriber = tracing_subscriber::registry().with(layer.clone());
            let guard = tracing::subscriber::set_default(subscriber);
            (layer, guard)
        }

        async fn flaky_then_up(verbose: bool) -> CaptureLayer {
            let (layer, _guard) = capture();
            let mut h = harness_with_verbosity(2, CountingRemediation::default(), verbose);
            h.target.push(Err(ProbeError::Connect("refused".into())));
            h.target.push(Ok(200));

            assert_eq!(h.monitor.run_cycle().await.outcome, ProbeOutcome::Up);
            layer
        }

        #[tokio::test]
        async fn test_verbose_reports_attempt_failures_and_up() {
            let layer = flaky_then_up(true).await;
            assert!(layer.contains("attempt failed"), "{:?}", layer.messages());
            assert!(layer.contains("Website is UP"), "{:?}", layer.messages());
        }

        #[tokio::test]
        async fn test_quiet_mode_suppresses_attempt_failures_and_up() {
            let layer = flaky_then_up(false).await;
            assert!(!layer.contains("attempt failed"), "{:?}", layer.messages());
            assert!(!layer.contains("Website is UP"), "{:?}", layer.messages());
        }

        #[tokio::test]
        async fn test_down_cycles_log_remediation_and_backoff() {
            let (layer, _guard) = capture();
            let mut h = harness_with_verbosity(1, CountingRemediation::default(), false);
            h.target.push(timeout());
            h.target.push(timeout());
            h.target.push(Ok(200));

            h.monitor.run_cycle().await;
            assert!(layer.contains("Website is DOWN, executing remediation"));
            assert!(layer.contains("Remediation completed"));
            assert!(layer.contains("First failure, next check at base interval"));
            assert!(!layer.contains("Backing off before next check"));

            h.monitor.run_cycle().await;
            assert!(layer.contains("Backing off before next check"));

            h.monitor.run_cycle().await;
            assert!(layer.contains("Website recovered, backoff reset"));
            assert!(!layer.contains("Website is UP"), "{:?}", layer.messages());
        }
    }
}
